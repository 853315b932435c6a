//! # UserHub Replication
//! 
//! Lifecycle of the replication sidecar that streams the SQLite store to
//! remote storage: restore on startup, continuous replication while serving,
//! and a bounded graceful stop on shutdown.

pub mod error;
pub mod process;
pub mod litestream;
pub mod supervisor;

pub use error::ReplicationError;
pub use litestream::LitestreamCli;
pub use process::{ChildProcess, ReplicaProcess, Replicator};
pub use supervisor::{LifecycleState, ReplicationSupervisor, RestoreOutcome, ShutdownOutcome, StartupReport};
