pub mod series;
pub mod snapshot;
pub mod universe;
