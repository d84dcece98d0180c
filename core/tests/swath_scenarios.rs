//! End-to-end scenarios across the b-deck reader, swath engine and writers.

use swathcore::bdeck::{convert_records, filter_inside_area, parse_bdeck};
use swathcore::math::StatsHelper;
use swathcore::output::{render_swath, write_png, write_swath_netcdf, RenderOptions};
use swathcore::telemetry::MetricsRecorder;
use swathcore::{generate_swath, AreaOfInterest, SwathAggregator, TrackObservation};

// Two precursor rows, then Maria crossing Puerto Rico. The 2017092003 row has
// no RMW and must be skipped by the swath engine.
const MARIA_DECK: &str = "\
AL, 15, 2017091212,   , BEST,   0, 123N,  412W,  20, 1010, LO,  34, NEQ,    0,    0,    0,    0, 1012,  150,  40,
AL, 15, 2017091218,   , BEST,   0, 125N,  425W,  25, 1009, LO,  34, NEQ,    0,    0,    0,    0, 1012,  150,  40,
AL, 15, 2017091918,   , BEST,   0, 167N,  637W, 150,  909, HU,  34, NEQ,  130,  110,   80,  100, 1006,  200,  10,
AL, 15, 2017092000,   , BEST,   0, 171N,  643W, 150,  913, HU,  34, NEQ,  130,  110,   80,  100, 1006,  200,  10,
AL, 15, 2017092003,   , BEST,   0, 174N,  648W, 145,  915, HU,  34, NEQ,  130,  110,   80,  100, 1006,  200,    ,
AL, 15, 2017092006,   , BEST,   0, 178N,  653W, 135,  917, HU,  34, NEQ,  130,  120,   80,  100, 1006,  200,  15,
AL, 15, 2017092012,   , BEST,   0, 183N,  662W, 120,  935, HU,  34, NEQ,  140,  120,   80,  100, 1006,  210,  20,
AL, 15, 2017092018,   , BEST,   0, 188N,  671W, 100,  957, HU,  34, NEQ,  150,  130,   90,  110, 1006,  220,  25,
AL, 15, 2017092100,   , BEST,   0, 192N,  678W,  95,  959, HU,  34, NEQ,  150,  130,   90,  110, 1006,  220,  25,
";

fn puerto_rico() -> AreaOfInterest {
    AreaOfInterest::new(17.0, 19.0, -68.0, -65.0).unwrap()
}

fn observations() -> Vec<TrackObservation> {
    let records = parse_bdeck(MARIA_DECK.as_bytes(), 2).unwrap();
    convert_records(&records).unwrap()
}

#[test]
fn deck_to_swath_skips_rows_without_radius() {
    let observations = observations();
    assert_eq!(observations.len(), 7);

    let points = TrackObservation::points(&observations);
    let metrics = MetricsRecorder::new();
    let output = SwathAggregator::new(0.1)
        .generate(&points, &puerto_rico(), &metrics)
        .unwrap();

    assert_eq!(output.skipped.len(), 1);
    assert_eq!(output.skipped[0].index, 2);
    assert_eq!(metrics.snapshot(), (6, 1));

    let peak = output.peak().unwrap();
    let strongest = points
        .iter()
        .map(|p| p.v_max)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(peak.speed <= strongest);
    // the 135 kt landfall point puts grid cells on its eyewall
    assert!(peak.speed > 60.0);
    assert_eq!(StatsHelper::nan_count(&output.swath), 0);
}

#[test]
fn filtering_to_the_area_only_drops_distant_points() {
    let observations = observations();
    let inside = filter_inside_area(&observations, &puerto_rico());
    assert_eq!(inside.len(), 3);
    assert!(inside
        .iter()
        .all(|obs| puerto_rico().contains(obs.point.latitude, obs.point.longitude)));
}

#[test]
fn writes_netcdf_and_png() {
    let observations = observations();
    let output = generate_swath(
        &TrackObservation::points(&observations),
        &puerto_rico(),
        0.1,
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let nc_path = dir.path().join("swath.nc");
    write_swath_netcdf(&nc_path, &output, &TrackObservation::times(&observations)).unwrap();
    let nc = netcdf::open(&nc_path).unwrap();
    assert_eq!(nc.dimension("time").unwrap().len(), observations.len());
    let wind: Vec<f32> = nc.variable("wind_speed").unwrap().get_values(..).unwrap();
    let (n_lat, n_lon) = output.grid.shape();
    assert_eq!(wind.len(), observations.len() * n_lat * n_lon);

    let mut options = RenderOptions::new(puerto_rico().extent());
    options.pixels_per_degree = 50.0;
    options.track = observations
        .iter()
        .map(|obs| (obs.point.latitude, obs.point.longitude))
        .collect();
    let image = render_swath(&output, &options).unwrap();
    let png_path = dir.path().join("figures").join("swath.png");
    write_png(&png_path, &image).unwrap();
    let png = std::fs::read(&png_path).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
