//! The scene side of the per-frame loop: what gets handed to a redraw.

use frames_core::vector::Vector3;

/// Everything a redraw needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub timestamp: String,
    pub elapsed_s: f64,
    pub running: bool,
    pub rate: f64,
    /// Body-fixed frame rotation about the inertial vertical axis (radians).
    pub orientation: f64,
    /// Wrapped anomaly used for placement.
    pub anomaly: f64,
    /// Unwrapped total anomaly advanced since startup.
    pub accumulated_anomaly: f64,
    /// Satellite position in the orbital plane's local coordinates.
    pub satellite_local: (f64, f64),
    pub satellite_inertial: Vector3,
    pub surface_direction: Option<Vector3>,
    pub surface_point: Option<Vector3>,
    pub line_endpoint: Option<Vector3>,
    pub sun_direction: Option<Vector3>,
    pub sun_position: Option<Vector3>,
    /// A startup seed failed; the frame shows default values.
    pub degraded: bool,
}

/// Geometry that does not change during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub earth_radius: f64,
    pub sun_radius: f64,
    pub sun_distance: f64,
    pub line_length: f64,
    pub orbit_radius: f64,
    /// Closed polyline of the orbit in inertial scene coordinates.
    pub orbit_path: Vec<Vector3>,
}

/// Host-side scene hooks.
pub trait Scene {
    /// Build static geometry. Called once before the first refresh.
    fn setup(&mut self, _layout: &SceneLayout) {}

    /// Refresh camera and interaction state before drawing.
    fn update_controls(&mut self) {}

    fn redraw(&mut self, frame: &FrameSnapshot);
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScene;

impl Scene for NullScene {
    fn redraw(&mut self, _frame: &FrameSnapshot) {}
}

/// Keeps every frame it is asked to draw.
#[derive(Debug, Default, Clone)]
pub struct RecordingScene {
    pub layout: Option<SceneLayout>,
    pub frames: Vec<FrameSnapshot>,
    pub control_updates: u64,
}

impl RecordingScene {
    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }
}

impl Scene for RecordingScene {
    fn setup(&mut self, layout: &SceneLayout) {
        self.layout = Some(layout.clone());
    }

    fn update_controls(&mut self) {
        self.control_updates += 1;
    }

    fn redraw(&mut self, frame: &FrameSnapshot) {
        self.frames.push(frame.clone());
    }
}
