use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Serializes calls to the device and keeps them apart in time.
///
/// Every section passed to [`Throttle::run`] holds the gate exclusively. When
/// it finishes, its cooldown decides how long the *next* section has to wait
/// before it may start.
#[derive(Debug, Default)]
pub struct Throttle {
    not_before: Mutex<Option<Instant>>,
}

/// Records the cooldown when the section ends, also if it returns early or unwinds.
struct CooldownGuard<'a> {
    not_before: &'a mut Option<Instant>,
    cooldown: Duration,
}

impl Drop for CooldownGuard<'_> {
    fn drop(&mut self) {
        *self.not_before = Some(Instant::now() + self.cooldown);
    }
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<T>(&self, cooldown: Duration, body: impl FnOnce() -> T) -> T {
        let mut not_before = self
            .not_before
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(wait) = (*not_before).and_then(|t| t.checked_duration_since(Instant::now())) {
            tracing::trace!("throttling for {:?}", wait);
            std::thread::sleep(wait);
        }

        let _guard = CooldownGuard {
            not_before: &mut *not_before,
            cooldown,
        };
        body()
    }
}
