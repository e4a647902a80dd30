#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use frame_sync::ephemeris::{EphemerisError, EphemerisSource};
use tokio::sync::oneshot;

/// A canned answer, optionally held back until its gate is released.
pub struct Reply<T> {
    pub value: Result<T, String>,
    pub gate: Option<oneshot::Receiver<()>>,
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value: Ok(value),
            gate: None,
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            value: Err(message.to_string()),
            gate: None,
        }
    }

    /// Hold this reply until the returned sender fires.
    pub fn gated(mut self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        self.gate = Some(rx);
        (self, tx)
    }
}

#[derive(Default)]
struct Script {
    ecef: HashMap<String, Reply<[f64; 3]>>,
    rotation: Option<Reply<f64>>,
    sun: Option<Reply<[f64; 3]>>,
    calls: Vec<String>,
}

/// In-memory ephemeris service that records every request it receives.
#[derive(Clone, Default)]
pub struct ScriptedEphemeris {
    script: Arc<Mutex<Script>>,
}

fn ecef_key(lat: f64, lon: f64) -> String {
    format!("lat={lat}&lon={lon}")
}

impl ScriptedEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ecef(self, lat: f64, lon: f64, reply: Reply<[f64; 3]>) -> Self {
        self.script.lock().unwrap().ecef.insert(ecef_key(lat, lon), reply);
        self
    }

    pub fn with_rotation(self, reply: Reply<f64>) -> Self {
        self.script.lock().unwrap().rotation = Some(reply);
        self
    }

    pub fn with_sun(self, reply: Reply<[f64; 3]>) -> Self {
        self.script.lock().unwrap().sun = Some(reply);
        self
    }

    /// Requests seen so far, formatted like the service's query paths.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }
}

async fn deliver<T>(reply: Option<Reply<T>>, what: &str) -> Result<T, EphemerisError> {
    let Some(reply) = reply else {
        return Err(EphemerisError::Unavailable(format!("no scripted reply for {what}")));
    };
    if let Some(gate) = reply.gate {
        let _ = gate.await;
    }
    reply.value.map_err(EphemerisError::Unavailable)
}

impl EphemerisSource for ScriptedEphemeris {
    async fn ecef_position(&self, lat: f64, lon: f64) -> Result<[f64; 3], EphemerisError> {
        let key = ecef_key(lat, lon);
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(format!("get_ecef_position?{key}"));
            script.ecef.remove(&key)
        };
        deliver(reply, &key).await
    }

    async fn earth_rotation_angle(&self, timestamp: &str) -> Result<f64, EphemerisError> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script
                .calls
                .push(format!("get_earth_rotation_angle?timestamp={timestamp}"));
            script.rotation.take()
        };
        deliver(reply, "rotation").await
    }

    async fn sun_position(&self, timestamp: &str) -> Result<[f64; 3], EphemerisError> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(format!("get_sun_position?timestamp={timestamp}"));
            script.sun.take()
        };
        deliver(reply, "sun").await
    }
}
