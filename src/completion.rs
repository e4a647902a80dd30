//! Results of ephemeris requests, queued for the animation loop to apply.

use std::future::Future;

use frames_core::vector::Vector3;
use frames_ephem::EphemerisError;
use log::debug;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::geodetic::GeodeticQuery;

/// A finished request. Only the loop's update step turns these into state changes.
#[derive(Debug)]
pub enum Completion {
    Direction {
        generation: u64,
        query: GeodeticQuery,
        result: Result<Vector3, EphemerisError>,
    },
    RotationSeed(Result<f64, EphemerisError>),
    SunSeed(Result<Vector3, EphemerisError>),
}

pub type CompletionSender = UnboundedSender<Completion>;
pub type CompletionReceiver = UnboundedReceiver<Completion>;

pub fn channel() -> (CompletionSender, CompletionReceiver) {
    unbounded_channel()
}

/// Run `request` as an independent task and queue its result.
///
/// Must be called from within a tokio runtime. Nothing cancels the task;
/// a completion whose receiver is gone is dropped.
pub(crate) fn spawn_request<F>(tx: &CompletionSender, request: F)
where
    F: Future<Output = Completion> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        if tx.send(request.await).is_err() {
            debug!("completion dropped: animation loop has shut down");
        }
    });
}
