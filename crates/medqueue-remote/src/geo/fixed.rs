//! Position sources that do not talk to hardware

use medqueue_core::prelude::*;
use medqueue_core::Coordinates;

use super::PositionSource;

/// Position taken from configuration.
///
/// A terminal has no positioning hardware, so the "device" position is
/// whatever `[location]` says. Without one, reads fail as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition {
    coords: Option<Coordinates>,
}

impl FixedPosition {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }

    pub fn is_available(&self) -> bool {
        self.coords.is_some()
    }
}

impl PositionSource for FixedPosition {
    async fn current_position(&self, _high_accuracy: bool) -> Result<Coordinates> {
        self.coords.ok_or(Error::GeolocationUnavailable)
    }
}

/// Replays a fixed script of read outcomes, for tests.
///
/// Each read pops the next step. Once the script runs out the last fix is
/// repeated (or the source reports unavailable if there never was one).
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct ScriptedPosition {
    state: std::sync::Arc<std::sync::Mutex<ScriptState>>,
}

#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Copy)]
enum Step {
    Fix(Coordinates),
    Fail(fn() -> Error),
    /// A read that never completes
    Stall,
}

#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
struct ScriptState {
    steps: std::collections::VecDeque<Step>,
    last: Option<Coordinates>,
    reads: usize,
}

#[cfg(any(test, feature = "test-helpers"))]
impl ScriptedPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fix
    pub fn then_fix(self, latitude: f64, longitude: f64) -> Self {
        self.push(Step::Fix(Coordinates::new(latitude, longitude)))
    }

    /// Queue a failing read
    pub fn then_error(self, make: fn() -> Error) -> Self {
        self.push(Step::Fail(make))
    }

    /// Queue a read that never completes
    pub fn then_stall(self) -> Self {
        self.push(Step::Stall)
    }

    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    fn push(self, step: Step) -> Self {
        self.lock().steps.push_back(step);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl PositionSource for ScriptedPosition {
    async fn current_position(&self, _high_accuracy: bool) -> Result<Coordinates> {
        let step = {
            let mut state = self.lock();
            state.reads += 1;
            let fallback = match state.last {
                Some(coords) => Step::Fix(coords),
                None => Step::Fail(|| Error::GeolocationUnavailable),
            };
            let step = state.steps.pop_front().unwrap_or(fallback);
            if let Step::Fix(coords) = step {
                state.last = Some(coords);
            }
            step
        };

        match step {
            Step::Fix(coords) => Ok(coords),
            Step::Fail(make) => Err(make()),
            Step::Stall => std::future::pending().await,
        }
    }
}
