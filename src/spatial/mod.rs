//! Grid geometry

pub mod distance;

pub use distance::distance;
