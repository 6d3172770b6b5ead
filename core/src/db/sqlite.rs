// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use async_trait::async_trait;
use sqlx::Transaction;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use time::OffsetDateTime;

/// Number of nanoseconds in a second.
const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Creates a new connection pool against the database identified by `conn_str`.
///
/// Passing `:memory:` yields an in-memory database shared by all connections of the pool.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let pool = SqlitePool::connect(conn_str).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A generic database executor implementation for SQLite.
#[derive(Debug)]
pub enum SqliteExecutor {
    /// An executor backed by a pooled connection.
    PoolExec(PoolConnection<Sqlite>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Sqlite>),
}

impl SqliteExecutor {
    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            SqliteExecutor::PoolExec(_) => unreachable!("Do not call commit on direct executors"),
            SqliteExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }

    /// Returns the raw connection to pass to `sqlx` queries, regardless of whether this executor
    /// is backed by a plain connection or by a transaction.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        match self {
            SqliteExecutor::PoolExec(conn) => &mut **conn,
            SqliteExecutor::TxExec(tx) => &mut **tx,
        }
    }
}

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<SqliteExecutor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(SqliteExecutor::PoolExec(conn))
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        Ok(Executor::Sqlite(self.typed_ex().await?))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::Sqlite(SqliteExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a `schema` that may contain multiple
/// statements.
pub async fn run_schema(e: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(e.conn()).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Converts a timestamp as extracted from the database into an `OffsetDateTime`.
///
/// SQLite lacks a native timestamp type so we store timestamps as a pair of integers: the whole
/// seconds since the epoch (which may be negative) and the nanoseconds within that second (which
/// must be in the `[0, 1e9)` range).  This representation sorts correctly when ordering by both
/// columns.
pub fn build_timestamp(timestamp_sec: i64, timestamp_nsec: i64) -> DbResult<OffsetDateTime> {
    if !(0..1_000_000_000).contains(&timestamp_nsec) {
        return Err(DbError::DataIntegrityError(format!(
            "Timestamp nanoseconds out of range: sec={}, nsec={}",
            timestamp_sec, timestamp_nsec
        )));
    }

    OffsetDateTime::from_unix_timestamp_nanos(
        (i128::from(timestamp_sec) * NANOS_PER_SEC) + i128::from(timestamp_nsec),
    )
    .map_err(|e| DbError::DataIntegrityError(format!("Invalid timestamp: {}", e)))
}

/// Converts a timestamp into the seconds and nanoseconds pair needed by the database.
pub fn unpack_timestamp(ts: OffsetDateTime) -> (i64, i64) {
    let nanos = ts.unix_timestamp_nanos();
    let sec = i64::try_from(nanos.div_euclid(NANOS_PER_SEC))
        .expect("Seconds of any valid OffsetDateTime fit in an i64");
    let nsec = i64::try_from(nanos.rem_euclid(NANOS_PER_SEC)).expect("Must be below 1e9");
    (sec, nsec)
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes the test database.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        connect(":memory:").await.unwrap()
    }
}
