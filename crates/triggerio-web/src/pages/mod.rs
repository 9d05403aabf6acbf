//! Full pages assembled from components

pub mod dashboard;

pub use dashboard::render_dashboard;
