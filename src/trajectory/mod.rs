mod point;
mod reconstruct;

pub use point::TrajectoryPoint;
pub use reconstruct::reconstruct;
