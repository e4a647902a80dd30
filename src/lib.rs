//! Dual-frame animation engine: a simulated clock, a rotating body-fixed
//! frame inside an inertial one, and a satellite on a tilted circular orbit.
//!
//! Absolute seeds (body rotation angle, sun direction) and geodetic
//! directions come from an external ephemeris service; everything that
//! moves per frame is integrated locally by [`controller::AnimationController`].

pub mod clock;
pub mod completion;
pub mod controller;
pub mod geodetic;
pub mod scene;
pub mod sync;

pub use frames_config as config;
pub use frames_core::vector;
pub use frames_ephem as ephemeris;
pub use frames_export as export;
pub use frames_kinematics as kinematics;
