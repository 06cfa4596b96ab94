/*!

The `lifecycle` module defines the [`Lifecycle`] object which drives one provisioning run of a
test end-to-end: apply, record the result, destroy.

!*/

use crate::guard::DestroyGuard;
use crate::provider::{Create, Destroy, ProviderError, ProviderResult};
use log::{debug, error, info, warn};
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};

/// Held for the whole of a [`Parallelism::Serial`] run.
static SERIAL: Mutex<()> = Mutex::new(());

/// Whether a run may execute concurrently with other runs in the same test binary.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Parallelism {
    /// The run shares no mutable state with other runs. The test framework's thread pool decides
    /// how many run at once.
    #[default]
    Parallel,

    /// The run must not overlap any other serial run in the process.
    Serial,
}

impl Parallelism {
    fn acquire(self) -> Option<MutexGuard<'static, ()>> {
        match self {
            Parallelism::Parallel => None,
            // A panicking serial run poisons the lock but leaves nothing to repair.
            Parallelism::Serial => Some(SERIAL.lock().unwrap_or_else(|e| e.into_inner())),
        }
    }
}

/// The stages a run passes through, in order:
/// `NotStarted -> Applying -> (Succeeded | Failed) -> Destroying -> Done`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    NotStarted,
    Applying,
    Succeeded,
    Failed,
    Destroying,
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::NotStarted => "not started",
            Stage::Applying => "applying",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
            Stage::Destroying => "destroying",
            Stage::Done => "done",
        };
        Display::fmt(s, f)
    }
}

/// The result of a [`Lifecycle::run`]. The run passed if and only if `apply` is `Ok`; a failed
/// `destroy` is reported separately and never turns a passed run into a failed one.
#[derive(Debug)]
pub struct Outcome<R> {
    pub apply: ProviderResult<R>,
    pub destroy: ProviderResult<()>,
    pub stages: Vec<Stage>,
}

impl<R> Outcome<R> {
    pub fn passed(&self) -> bool {
        self.apply.is_ok()
    }

    /// The apply result. A destroy failure has already been logged by the run.
    pub fn into_result(self) -> ProviderResult<R> {
        self.apply
    }

    pub fn destroy_error(&self) -> Option<&ProviderError> {
        self.destroy.as_ref().err()
    }

    /// Returns the resource, or fails the calling test if the apply step failed.
    #[track_caller]
    pub fn unwrap_applied(self) -> R {
        match self.apply {
            Ok(resource) => resource,
            Err(e) => panic!("Provisioning failed: {}", e),
        }
    }
}

/// `Lifecycle` drives a single provisioning run of a test. It takes a `Creator` (see [`Create`])
/// and a `Destroyer` (see [`Destroy`]) that agree on `Config` and `Resource` types. These are
/// often the same type, e.g. a client for a provisioning tool, passed twice.
///
/// The run registers cleanup before it provisions anything, so the `Destroyer` is called exactly
/// once whether the apply succeeds, fails, or panics.
pub struct Lifecycle<Creator, Destroyer>
where
    Creator: Create,
    Destroyer: Destroy<Config = Creator::Config, Resource = Creator::Resource>,
{
    creator: Creator,
    destroyer: Destroyer,
    config: Creator::Config,
    parallelism: Parallelism,
}

impl<Creator, Destroyer> Lifecycle<Creator, Destroyer>
where
    Creator: Create,
    Destroyer: Destroy<Config = Creator::Config, Resource = Creator::Resource>,
{
    pub fn new(creator: Creator, destroyer: Destroyer, config: Creator::Config) -> Self {
        Self {
            creator,
            destroyer,
            config,
            parallelism: Parallelism::default(),
        }
    }

    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Apply the infrastructure, then destroy it. Blocks until both steps have finished.
    pub fn run(self) -> Outcome<Creator::Resource> {
        let _serial = self.parallelism.acquire();
        let mut stages = vec![Stage::NotStarted];
        let guard = DestroyGuard::new(&self.destroyer, &self.config);

        stages.push(Stage::Applying);
        info!("Stage: {}", Stage::Applying);
        let apply = self.creator.create(&self.config);
        let stage = match &apply {
            Ok(_) => Stage::Succeeded,
            Err(e) => {
                error!("Apply failed: {}", e);
                if e.resources().may_remain() {
                    warn!("Infrastructure may have been left behind by the failed apply");
                }
                Stage::Failed
            }
        };
        stages.push(stage);
        info!("Stage: {}", stage);

        stages.push(Stage::Destroying);
        info!("Stage: {}", Stage::Destroying);
        let destroy = guard.destroy(apply.as_ref().ok());
        if let Err(e) = &destroy {
            error!("Destroy failed: {}", e);
        }

        stages.push(Stage::Done);
        debug!("Stages: {:?}", stages);
        Outcome {
            apply,
            destroy,
            stages,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serial_runs_share_one_lock() {
        let first = Parallelism::Serial.acquire();
        assert!(first.is_some());
        assert!(SERIAL.try_lock().is_err());
        drop(first);
        assert!(Parallelism::Parallel.acquire().is_none());
    }
}
