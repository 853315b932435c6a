// ============================================================================
// UserHub Replication - Supervisor
// File: crates/userhub-replication/src/supervisor.rs
// ============================================================================
//! Startup/shutdown lifecycle around the replication process
//!
//! ```text
//! Init --prepare_store--> StoreReady --start_replication--> Replicating
//!                                                              |
//!                              Stopped <--------shutdown-------+
//! ```
//!
//! Restore and launch failures are logged and never abort startup; the only
//! fatal step is creating a fresh schema when the store file is missing.
//! A child that exits on its own while `Replicating` is not noticed.

use std::time::Duration;

use tracing::{error, info, warn};
use userhub_core::repositories::StoreBootstrap;
use userhub_shared::config::ReplicationSettings;
use userhub_shared::constants::DEFAULT_SHUTDOWN_TIMEOUT_SECS;

use crate::error::ReplicationError;
use crate::litestream::LitestreamCli;
use crate::process::{ReplicaProcess, Replicator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Init,
    StoreReady,
    Replicating,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Skipped,
    Restored,
    Failed,
}

/// What `prepare_store` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub restore: RestoreOutcome,
    pub schema_created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// No replication process was held.
    NotRunning,
    /// The process exited within the timeout after the termination request.
    Graceful { exit_code: Option<i32> },
    /// The process outlived the timeout and was killed.
    ForceKilled,
}

/// Owns the replication process for the lifetime of the server
pub struct ReplicationSupervisor<R: Replicator> {
    replicator: R,
    recover_on_start: bool,
    replication_enabled: bool,
    shutdown_timeout: Duration,
    state: LifecycleState,
    process: Option<Box<dyn ReplicaProcess>>,
}

impl ReplicationSupervisor<LitestreamCli> {
    pub fn from_settings(settings: &ReplicationSettings) -> Self {
        Self::new(LitestreamCli::from_settings(settings), settings.recover_on_start)
            .with_replication_enabled(settings.enabled)
            .with_shutdown_timeout(settings.shutdown_timeout())
    }
}

impl<R: Replicator> ReplicationSupervisor<R> {
    pub fn new(replicator: R, recover_on_start: bool) -> Self {
        Self {
            replicator,
            recover_on_start,
            replication_enabled: true,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            state: LifecycleState::Init,
            process: None,
        }
    }

    pub fn with_replication_enabled(mut self, enabled: bool) -> Self {
        self.replication_enabled = enabled;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn replica_pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|p| p.id())
    }

    /// Init -> StoreReady
    ///
    /// Optionally restores the store from the remote replica (no timeout),
    /// then creates a fresh schema if the store file is still missing.
    pub async fn prepare_store(
        &mut self,
        store: &dyn StoreBootstrap,
    ) -> Result<StartupReport, ReplicationError> {
        let restore = if self.recover_on_start {
            info!("Attempting to recover database from remote replica");
            match self.replicator.restore(store.store_path()).await {
                Ok(()) => {
                    info!("Database recovery completed successfully");
                    RestoreOutcome::Restored
                }
                Err(e) => {
                    error!("Database recovery failed: {}", e);
                    RestoreOutcome::Failed
                }
            }
        } else {
            RestoreOutcome::Skipped
        };

        let schema_created = if store.store_exists() {
            false
        } else {
            info!("Creating new database at {}", store.store_path().display());
            store.create_schema().await?;
            true
        };

        self.state = LifecycleState::StoreReady;
        info!("Store ready: restore={:?} schema_created={}", restore, schema_created);

        Ok(StartupReport { restore, schema_created })
    }

    /// StoreReady -> Replicating
    ///
    /// Returns the PID of the replication process, or `None` when it was not
    /// started. A launch failure leaves the supervisor in `StoreReady`.
    pub fn start_replication(&mut self) -> Option<u32> {
        if let Some(pid) = self.replica_pid() {
            return Some(pid);
        }
        if !self.replication_enabled {
            info!("Replication disabled by configuration");
            return None;
        }
        if self.state != LifecycleState::StoreReady {
            warn!("Replication not started: store is not ready (state {:?})", self.state);
            return None;
        }

        info!("Starting replication");
        match self.replicator.replicate() {
            Ok(process) => {
                let pid = process.id();
                info!("Replication started with PID {:?}", pid);
                self.process = Some(process);
                self.state = LifecycleState::Replicating;
                pid
            }
            Err(e) => {
                error!("Failed to start replication: {}", e);
                None
            }
        }
    }

    /// Any state -> Stopped
    ///
    /// Requests graceful termination and waits up to the shutdown timeout,
    /// then kills the process.
    pub async fn shutdown(&mut self) -> ShutdownOutcome {
        self.state = LifecycleState::Stopped;

        let Some(mut process) = self.process.take() else {
            return ShutdownOutcome::NotRunning;
        };

        info!("Stopping replication (PID {:?})", process.id());
        if let Err(e) = process.terminate() {
            warn!("{}", ReplicationError::Signal(e));
        }

        match tokio::time::timeout(self.shutdown_timeout, process.wait()).await {
            Ok(Ok(exit_code)) => {
                info!("Replication stopped (exit code {:?})", exit_code);
                ShutdownOutcome::Graceful { exit_code }
            }
            Ok(Err(e)) => {
                warn!("Waiting for replication failed ({}), force killing", e);
                Self::force_kill(process.as_mut()).await
            }
            Err(_) => {
                warn!(
                    "Replication did not terminate within {:?}, force killing",
                    self.shutdown_timeout
                );
                Self::force_kill(process.as_mut()).await
            }
        }
    }

    async fn force_kill(process: &mut dyn ReplicaProcess) -> ShutdownOutcome {
        if let Err(e) = process.kill().await {
            error!("Failed to kill replication process: {}", e);
        }
        ShutdownOutcome::ForceKilled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockReplicator;
    use async_trait::async_trait;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use userhub_core::error::DomainError;

    /// Store whose existence is a flag flipped by `create_schema`
    struct FakeStore {
        path: PathBuf,
        exists: AtomicBool,
        fail_create: bool,
        creates: AtomicUsize,
    }

    impl FakeStore {
        fn new(exists: bool) -> Self {
            Self {
                path: PathBuf::from("/tmp/userhub-test.db"),
                exists: AtomicBool::new(exists),
                fail_create: false,
                creates: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StoreBootstrap for FakeStore {
        fn store_path(&self) -> &Path {
            &self.path
        }

        fn store_exists(&self) -> bool {
            self.exists.load(Ordering::SeqCst)
        }

        async fn create_schema(&self) -> Result<(), DomainError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(DomainError::DatabaseError("disk full".into()));
            }
            self.exists.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Process that either honours termination or ignores it forever
    #[derive(Clone, Default)]
    struct FakeProcess {
        honours_terminate: bool,
        terminated: Arc<AtomicBool>,
        kills: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ReplicaProcess for FakeProcess {
        fn id(&self) -> Option<u32> {
            Some(4242)
        }

        fn terminate(&mut self) -> io::Result<()> {
            self.terminated.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn wait(&mut self) -> io::Result<Option<i32>> {
            if self.honours_terminate && self.terminated.load(Ordering::SeqCst) {
                return Ok(Some(0));
            }
            std::future::pending().await
        }

        async fn kill(&mut self) -> io::Result<()> {
            self.kills.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn replicator_spawning(process: FakeProcess) -> MockReplicator {
        let mut replicator = MockReplicator::new();
        replicator
            .expect_replicate()
            .times(1)
            .returning(move || Ok(Box::new(process.clone()) as Box<dyn ReplicaProcess>));
        replicator
    }

    #[tokio::test]
    async fn test_recovery_disabled_creates_missing_store() {
        let mut replicator = MockReplicator::new();
        replicator.expect_restore().never();
        let store = FakeStore::new(false);

        let mut supervisor = ReplicationSupervisor::new(replicator, false);
        let report = supervisor.prepare_store(&store).await.unwrap();

        assert_eq!(report, StartupReport { restore: RestoreOutcome::Skipped, schema_created: true });
        assert_eq!(supervisor.state(), LifecycleState::StoreReady);
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovery_disabled_keeps_existing_store() {
        let store = FakeStore::new(true);

        let mut supervisor = ReplicationSupervisor::new(MockReplicator::new(), false);
        let report = supervisor.prepare_store(&store).await.unwrap();

        assert!(!report.schema_created);
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_restore_falls_back_to_fresh_schema() {
        let mut replicator = MockReplicator::new();
        replicator
            .expect_restore()
            .withf(|path| path == Path::new("/tmp/userhub-test.db"))
            .times(1)
            .returning(|_| Err(ReplicationError::RestoreFailed { code: Some(1) }));
        let store = FakeStore::new(false);

        let mut supervisor = ReplicationSupervisor::new(replicator, true);
        let report = supervisor.prepare_store(&store).await.unwrap();

        assert_eq!(report, StartupReport { restore: RestoreOutcome::Failed, schema_created: true });
        assert_eq!(supervisor.state(), LifecycleState::StoreReady);
    }

    #[tokio::test]
    async fn test_failed_restore_keeps_existing_store() {
        let mut replicator = MockReplicator::new();
        replicator
            .expect_restore()
            .returning(|_| Err(ReplicationError::Spawn(io::Error::from(io::ErrorKind::NotFound))));
        let store = FakeStore::new(true);

        let mut supervisor = ReplicationSupervisor::new(replicator, true);
        let report = supervisor.prepare_store(&store).await.unwrap();

        assert_eq!(report.restore, RestoreOutcome::Failed);
        assert!(!report.schema_created);
    }

    #[tokio::test]
    async fn test_successful_restore_skips_schema_creation() {
        let mut replicator = MockReplicator::new();
        replicator.expect_restore().times(1).returning(|_| Ok(()));
        // The restore itself produced the file.
        let store = FakeStore::new(true);

        let mut supervisor = ReplicationSupervisor::new(replicator, true);
        let report = supervisor.prepare_store(&store).await.unwrap();

        assert_eq!(report, StartupReport { restore: RestoreOutcome::Restored, schema_created: false });
    }

    #[tokio::test]
    async fn test_schema_creation_failure_is_fatal() {
        let mut store = FakeStore::new(false);
        store.fail_create = true;

        let mut supervisor = ReplicationSupervisor::new(MockReplicator::new(), false);
        let result = supervisor.prepare_store(&store).await;

        assert!(matches!(result, Err(ReplicationError::Store(_))));
        assert_eq!(supervisor.state(), LifecycleState::Init);
    }

    #[tokio::test]
    async fn test_replication_requires_ready_store() {
        let mut replicator = MockReplicator::new();
        replicator.expect_replicate().never();

        let mut supervisor = ReplicationSupervisor::new(replicator, false);

        assert_eq!(supervisor.start_replication(), None);
        assert_eq!(supervisor.state(), LifecycleState::Init);
    }

    #[tokio::test]
    async fn test_launch_failure_does_not_block_startup() {
        let mut replicator = MockReplicator::new();
        replicator
            .expect_replicate()
            .times(1)
            .returning(|| Err(ReplicationError::Spawn(io::Error::from(io::ErrorKind::NotFound))));

        let mut supervisor = ReplicationSupervisor::new(replicator, false);
        supervisor.prepare_store(&FakeStore::new(true)).await.unwrap();

        assert_eq!(supervisor.start_replication(), None);
        assert_eq!(supervisor.state(), LifecycleState::StoreReady);
        assert_eq!(supervisor.shutdown().await, ShutdownOutcome::NotRunning);
    }

    #[tokio::test]
    async fn test_disabled_replication_is_not_launched() {
        let mut replicator = MockReplicator::new();
        replicator.expect_replicate().never();

        let mut supervisor = ReplicationSupervisor::new(replicator, false).with_replication_enabled(false);
        supervisor.prepare_store(&FakeStore::new(true)).await.unwrap();

        assert_eq!(supervisor.start_replication(), None);
    }

    #[tokio::test]
    async fn test_graceful_shutdown_does_not_kill() {
        let process = FakeProcess { honours_terminate: true, ..Default::default() };
        let kills = process.kills.clone();

        let mut supervisor = ReplicationSupervisor::new(replicator_spawning(process), false);
        supervisor.prepare_store(&FakeStore::new(true)).await.unwrap();

        assert_eq!(supervisor.start_replication(), Some(4242));
        // A second call reuses the running process.
        assert_eq!(supervisor.start_replication(), Some(4242));
        assert_eq!(supervisor.state(), LifecycleState::Replicating);

        let outcome = supervisor.shutdown().await;

        assert_eq!(outcome, ShutdownOutcome::Graceful { exit_code: Some(0) });
        assert_eq!(kills.load(Ordering::SeqCst), 0);
        assert_eq!(supervisor.state(), LifecycleState::Stopped);
        assert_eq!(supervisor.replica_pid(), None);
    }

    #[tokio::test]
    async fn test_stuck_process_is_killed_exactly_once() {
        let process = FakeProcess { honours_terminate: false, ..Default::default() };
        let kills = process.kills.clone();
        let terminated = process.terminated.clone();

        let mut supervisor = ReplicationSupervisor::new(replicator_spawning(process), false)
            .with_shutdown_timeout(Duration::from_millis(50));
        supervisor.prepare_store(&FakeStore::new(true)).await.unwrap();
        supervisor.start_replication();

        let outcome = supervisor.shutdown().await;

        assert_eq!(outcome, ShutdownOutcome::ForceKilled);
        assert!(terminated.load(Ordering::SeqCst));
        assert_eq!(kills.load(Ordering::SeqCst), 1);

        // Nothing left to stop.
        assert_eq!(supervisor.shutdown().await, ShutdownOutcome::NotRunning);
        assert_eq!(kills.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_timeout_is_five_seconds() {
        let process = FakeProcess { honours_terminate: false, ..Default::default() };
        let kills = process.kills.clone();

        let mut supervisor = ReplicationSupervisor::new(replicator_spawning(process), false);
        supervisor.prepare_store(&FakeStore::new(true)).await.unwrap();
        supervisor.start_replication();

        let started = tokio::time::Instant::now();
        assert_eq!(supervisor.shutdown().await, ShutdownOutcome::ForceKilled);

        assert_eq!(started.elapsed(), Duration::from_secs(5));
        assert_eq!(kills.load(Ordering::SeqCst), 1);
    }
}
