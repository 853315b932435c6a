//! Ports to the external replication binary and its running process

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::process::Child;

use crate::error::ReplicationError;

/// A running replication process.
#[async_trait]
pub trait ReplicaProcess: Send {
    fn id(&self) -> Option<u32>;

    /// Request a graceful exit without waiting for it.
    fn terminate(&mut self) -> io::Result<()>;

    /// Wait for exit; yields the exit code, `None` when ended by a signal.
    async fn wait(&mut self) -> io::Result<Option<i32>>;

    /// Force the process to stop and reap it.
    async fn kill(&mut self) -> io::Result<()>;
}

/// The two invocations of the replication binary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Replicator: Send + Sync {
    /// Populate `db_path` from the remote replica, blocking until done.
    async fn restore(&self, db_path: &Path) -> Result<(), ReplicationError>;

    /// Launch continuous replication in the background.
    fn replicate(&self) -> Result<Box<dyn ReplicaProcess>, ReplicationError>;
}

/// `ReplicaProcess` backed by an OS child process
pub struct ChildProcess {
    child: Child,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self { child }
    }
}

#[async_trait]
impl ReplicaProcess for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        // `id()` is None once the child has been reaped.
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        self.child.wait().await.map(|status| status.code())
    }

    async fn kill(&mut self) -> io::Result<()> {
        self.child.kill().await
    }
}
