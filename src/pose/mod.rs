pub mod angle;
pub mod keypoint;

pub use angle::{joint_angle, AngleExtractor};
pub use keypoint::{Landmark, LandmarkIndex, Landmarks};
