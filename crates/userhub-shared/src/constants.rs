//! Application-wide constants

pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 100;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://database.db";
pub const DEFAULT_REPLICATION_BINARY: &str = "litestream";
pub const DEFAULT_REPLICATION_CONFIG: &str = "/app/config/litestream.yml";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;
