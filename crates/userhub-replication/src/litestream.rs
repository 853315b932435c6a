//! Litestream command-line adapter

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use userhub_shared::config::ReplicationSettings;

use crate::error::ReplicationError;
use crate::process::{ChildProcess, ReplicaProcess, Replicator};

/// Runs `<binary> restore` and `<binary> replicate` against one config file
#[derive(Debug, Clone)]
pub struct LitestreamCli {
    binary: PathBuf,
    config_path: PathBuf,
}

impl LitestreamCli {
    pub fn new(binary: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            config_path: config_path.into(),
        }
    }

    pub fn from_settings(settings: &ReplicationSettings) -> Self {
        Self::new(&settings.binary, &settings.config_path)
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(subcommand)
            .arg("-config")
            .arg(&self.config_path)
            .stdin(Stdio::null());
        command
    }
}

#[async_trait]
impl Replicator for LitestreamCli {
    async fn restore(&self, db_path: &Path) -> Result<(), ReplicationError> {
        debug!("Running {} restore into {}", self.binary.display(), db_path.display());

        let status = self
            .command("restore")
            .arg(db_path)
            .status()
            .await
            .map_err(ReplicationError::Spawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(ReplicationError::RestoreFailed { code: status.code() })
        }
    }

    fn replicate(&self) -> Result<Box<dyn ReplicaProcess>, ReplicationError> {
        let child = self
            .command("replicate")
            .kill_on_drop(true)
            .spawn()
            .map_err(ReplicationError::Spawn)?;

        Ok(Box::new(ChildProcess::new(child)))
    }
}
