pub mod config;
pub mod intermediate;
pub mod runner;
