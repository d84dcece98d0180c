use ndarray::{Array2, Zip};

pub struct StatsHelper;

impl StatsHelper {
    /// Maximum that lets NaN win, so malformed cells stay visible downstream.
    #[inline]
    pub fn nan_max(a: f64, b: f64) -> f64 {
        if a.is_nan() || b.is_nan() {
            f64::NAN
        } else {
            a.max(b)
        }
    }

    /// Folds `field` into `acc` with [`StatsHelper::nan_max`], cell by cell.
    pub fn fold_max(acc: &mut Array2<f64>, field: &Array2<f64>) {
        Zip::from(acc)
            .and(field)
            .for_each(|current, &value| *current = Self::nan_max(*current, value));
    }

    /// Largest finite value and its index; first occurrence wins ties.
    pub fn peak(grid: &Array2<f64>) -> Option<(f64, (usize, usize))> {
        grid.indexed_iter()
            .filter(|(_, value)| value.is_finite())
            .fold(None, |best, (index, &value)| match best {
                Some((current, _)) if current >= value => best,
                _ => Some((value, index)),
            })
    }

    pub fn nan_count(grid: &Array2<f64>) -> usize {
        grid.iter().filter(|value| value.is_nan()).count()
    }
}
