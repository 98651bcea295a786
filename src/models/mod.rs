pub mod category;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod series;
