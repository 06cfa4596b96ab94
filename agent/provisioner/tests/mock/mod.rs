/*!

This test module provides a mock provisioning tool so that the [`Lifecycle`] and [`DestroyGuard`]
can be tested without real infrastructure. The mock counts how often each operation is called and
can be told to fail or panic.

!*/

use provisioner::provider::{ProviderError, ProviderResult, Resources};
use provisioner::{Configuration, Create, Destroy};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub definitions: String,
    pub upgrade: bool,
}

impl Configuration for ClusterConfig {}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreatedCluster {
    pub cluster_id: String,
}

impl Configuration for CreatedCluster {}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ApplyBehavior {
    Succeed,
    Fail,
    Panic,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub apply_attempts: AtomicUsize,
    pub destroys: AtomicUsize,
    /// The config and resource that each destroy call received.
    pub destroyed: Mutex<Vec<(ClusterConfig, Option<CreatedCluster>)>>,
}

impl Calls {
    pub fn destroys(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }

    pub fn apply_attempts(&self) -> usize {
        self.apply_attempts.load(Ordering::SeqCst)
    }
}

/// Counts how many runs are between their apply and their destroy at the same time, across every
/// tool that shares it.
#[derive(Debug, Default)]
pub struct Concurrency {
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

/// MockTool pretends to be a provisioning tool. Cloning it shares the call counters.
#[derive(Clone, Debug)]
pub struct MockTool {
    pub apply: ApplyBehavior,
    pub destroy_fails: bool,
    /// How many times the tool retries apply internally before reporting a result.
    pub internal_attempts: usize,
    pub calls: Arc<Calls>,
    /// How long apply takes.
    pub apply_delay: Duration,
    pub concurrency: Option<Arc<Concurrency>>,
}

impl MockTool {
    pub fn new(apply: ApplyBehavior) -> Self {
        Self {
            apply,
            destroy_fails: false,
            internal_attempts: 1,
            calls: Arc::new(Calls::default()),
            apply_delay: Duration::ZERO,
            concurrency: None,
        }
    }
}

impl Create for MockTool {
    type Config = ClusterConfig;
    type Resource = CreatedCluster;

    fn create(&self, config: &ClusterConfig) -> ProviderResult<CreatedCluster> {
        if let Some(concurrency) = &self.concurrency {
            concurrency.enter();
        }
        thread::sleep(self.apply_delay);
        for _ in 0..self.internal_attempts {
            self.calls.apply_attempts.fetch_add(1, Ordering::SeqCst);
        }
        match self.apply {
            ApplyBehavior::Succeed => Ok(CreatedCluster {
                cluster_id: format!("j-{}", config.definitions),
            }),
            ApplyBehavior::Fail => Err(ProviderError::new_with_context(
                Resources::Unknown,
                format!("Error: invalid definitions in '{}'", config.definitions),
            )),
            ApplyBehavior::Panic => panic!("apply blew up"),
        }
    }
}

impl Destroy for MockTool {
    type Config = ClusterConfig;
    type Resource = CreatedCluster;

    fn destroy(
        &self,
        config: &ClusterConfig,
        resource: Option<&CreatedCluster>,
    ) -> ProviderResult<()> {
        self.calls.destroys.fetch_add(1, Ordering::SeqCst);
        if let Some(concurrency) = &self.concurrency {
            concurrency.exit();
        }
        self.calls
            .destroyed
            .lock()
            .unwrap()
            .push((config.clone(), resource.cloned()));
        if self.destroy_fails {
            return Err(ProviderError::new_with_context(
                Resources::Remaining,
                "Error: timed out waiting for cluster to terminate",
            ));
        }
        Ok(())
    }
}

pub fn config(definitions: &str) -> ClusterConfig {
    ClusterConfig {
        definitions: definitions.to_string(),
        upgrade: true,
    }
}
