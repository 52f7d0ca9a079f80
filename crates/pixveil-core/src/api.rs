//! File based entry points, each a builder started by `prepare()`.

pub mod capacity;
pub mod hide;
pub mod unveil;
