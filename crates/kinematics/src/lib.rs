//! Kinematics for the two animated frames: body-fixed rotation and the satellite's circular orbit.
//!
//! Everything here is a pure function of its inputs; the animation
//! controller holds the running values.

pub mod frame_rotation;
pub mod orbit;

pub use orbit::OrbitModel;
