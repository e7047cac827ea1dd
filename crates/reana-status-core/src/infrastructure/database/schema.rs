use std::str::FromStr;
use std::time::Duration;

use reana_status_api::{
    StatusError,
    StatusResult,
};
#[cfg(feature = "postgres")]
use sqlx::postgres::{
    PgPool,
    PgPoolOptions,
};
use sqlx::sqlite::{
    SqliteConnectOptions,
    SqlitePoolOptions,
};
use sqlx::SqlitePool;

#[cfg(feature = "postgres")]
pub async fn init_postgres_pool(url: &str, max_connections: u32) -> StatusResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .connect(url)
        .await
        .map_err(|e| StatusError::DatabaseError(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Open a read-only pool on an existing SQLite database
pub async fn init_sqlite_pool(url: &str, max_connections: u32) -> StatusResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| StatusError::InvalidConfig(format!("Invalid SQLite URL {}: {}", url, e)))?
        .read_only(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(|e| StatusError::DatabaseError(format!("Failed to open SQLite database: {}", e)))
}

/// Tables the status queries read, in their SQLite shape
#[cfg(test)]
const SQLITE_TEST_SCHEMA: &str = r#"
CREATE TABLE user_ (
    id_ TEXT PRIMARY KEY,
    email TEXT NOT NULL
);
CREATE TABLE resource (
    id_ TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    type_ TEXT NOT NULL,
    unit TEXT NOT NULL
);
CREATE TABLE user_resource (
    user_id TEXT NOT NULL REFERENCES user_ (id_),
    resource_id TEXT NOT NULL REFERENCES resource (id_),
    quota_limit INTEGER NOT NULL DEFAULT 0,
    quota_used INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, resource_id)
);
CREATE TABLE workflow (
    id_ TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    restart BOOLEAN NOT NULL DEFAULT 0,
    git_repo TEXT,
    run_started_at TEXT,
    updated TEXT
);
CREATE TABLE job (
    id_ TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    compute_backend TEXT
);
CREATE TABLE interactive_session (
    id_ TEXT PRIMARY KEY,
    status TEXT NOT NULL
);
CREATE TABLE accounts_user_session_activity (
    sid_s TEXT PRIMARY KEY,
    user_id INTEGER
);
"#;

/// Writable pool on a fresh database file with the REANA tables created
#[cfg(test)]
pub(crate) async fn create_sqlite_test_schema(path: &std::path::Path) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open test database");

    sqlx::raw_sql(SQLITE_TEST_SCHEMA)
        .execute(&pool)
        .await
        .expect("create test schema");

    pool
}
