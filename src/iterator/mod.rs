mod angle;
mod distance;

pub use angle::{AngleIterator2D, AngleIterator3D};
pub use distance::{DistanceIterator2D, DistanceIterator3D};
