//! Time must be read through an injectable clock (§9 Design Notes) so
//! tests can freeze it instead of racing wall-clock time.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

pub type Timestamp = DateTime<Utc>;

/// Source of "now" for every component. Production uses [`SystemClock`];
/// tests use [`FrozenClock`] so turn-phase and reservation-TTL math is
/// deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock whose value is set explicitly and only moves when told to.
#[derive(Debug, Clone)]
pub struct FrozenClock {
    inner: Arc<Mutex<Timestamp>>,
}

impl FrozenClock {
    pub fn at(ts: Timestamp) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ts)),
        }
    }

    pub fn advance(&self, delta: chrono::Duration) {
        let mut guard = self.inner.lock().expect("clock mutex poisoned");
        *guard += delta;
    }

    pub fn set(&self, ts: Timestamp) {
        *self.inner.lock().expect("clock mutex poisoned") = ts;
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> Timestamp {
        *self.inner.lock().expect("clock mutex poisoned")
    }
}
