//! Broadphase: sort-and-sweep over body bounds, feeding the SAT narrowphase

pub mod detector;

pub use detector::Detector;
