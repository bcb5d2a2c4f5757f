//! A bounded pool of [`tokio_rusqlite`] connections.
//!
//! Each connection owns a dedicated thread. A semaphore caps how many are
//! checked out at once; callers wait for a free connection up to the
//! acquisition ceiling and then fail with [`Error::PoolTimeout`].

use std::{
  ops::Deref,
  path::Path,
  sync::{Arc, Mutex, PoisonError},
  time::Duration,
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rusqlite::Connection;

use crate::{Error, Result, schema::CONNECTION_PRAGMAS};

// ─── Options ─────────────────────────────────────────────────────────────────

/// Sizing and timeout ceilings for a [`Pool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
  pub max_connections:   usize,
  /// How long [`Pool::get`] waits for a free connection.
  pub acquire_timeout:   Duration,
  /// SQLite busy timeout: how long a statement waits on a locked database.
  pub busy_timeout:      Duration,
}

impl Default for PoolOptions {
  fn default() -> Self {
    Self {
      max_connections:   20,
      acquire_timeout:   Duration::from_secs(5),
      busy_timeout:      Duration::from_secs(10),
    }
  }
}

// ─── Pool ────────────────────────────────────────────────────────────────────

struct Inner {
  idle:            Mutex<Vec<Connection>>,
  permits:         Arc<Semaphore>,
  acquire_timeout: Duration,
}

/// Cloning is cheap; clones share the same connections.
#[derive(Clone)]
pub struct Pool {
  inner: Arc<Inner>,
}

impl Pool {
  /// Open `options.max_connections` connections to the database at `path`.
  pub async fn open(path: impl AsRef<Path>, options: PoolOptions) -> Result<Self> {
    let size = options.max_connections.max(1);
    let mut conns = Vec::with_capacity(size);
    for _ in 0..size {
      let conn = Connection::open(path.as_ref()).await?;
      configure(&conn, options.busy_timeout).await?;
      conns.push(conn);
    }
    Ok(Self::from_connections(conns, options.acquire_timeout))
  }

  /// A single-connection pool over a private in-memory database.
  pub async fn open_in_memory(options: PoolOptions) -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    configure(&conn, options.busy_timeout).await?;
    Ok(Self::from_connections(vec![conn], options.acquire_timeout))
  }

  fn from_connections(conns: Vec<Connection>, acquire_timeout: Duration) -> Self {
    let permits = Arc::new(Semaphore::new(conns.len()));
    Self {
      inner: Arc::new(Inner { idle: Mutex::new(conns), permits, acquire_timeout }),
    }
  }

  /// Check out a connection, waiting up to the acquisition ceiling.
  pub async fn get(&self) -> Result<PooledConnection> {
    let wait = self.inner.acquire_timeout;
    let permit =
      match tokio::time::timeout(wait, self.inner.permits.clone().acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(_)) => return Err(Error::PoolClosed),
        Err(_) => {
          tracing::warn!(?wait, "connection pool exhausted");
          return Err(Error::PoolTimeout(wait));
        }
      };

    let conn = self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop()
      .ok_or(Error::PoolClosed)?;

    Ok(PooledConnection { conn, inner: Arc::clone(&self.inner), _permit: permit })
  }

  /// Connections not currently checked out.
  pub fn available(&self) -> usize { self.inner.permits.available_permits() }

  /// Refuse further checkouts and close every idle connection.
  pub async fn close(&self) -> Result<()> {
    self.inner.permits.close();
    let idle = std::mem::take(
      &mut *self.inner.idle.lock().unwrap_or_else(PoisonError::into_inner),
    );
    for conn in idle {
      conn.close().await?;
    }
    Ok(())
  }
}

async fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
  conn
    .call(move |conn| {
      conn.busy_timeout(busy_timeout)?;
      conn.execute_batch(CONNECTION_PRAGMAS)?;
      Ok(())
    })
    .await?;
  Ok(())
}

// ─── Checked-out connection ──────────────────────────────────────────────────

/// A connection on loan from a [`Pool`]; returned when dropped.
pub struct PooledConnection {
  conn:    Connection,
  inner:   Arc<Inner>,
  // Released after `Drop::drop` has put the connection back.
  _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
  type Target = Connection;

  fn deref(&self) -> &Connection { &self.conn }
}

impl Drop for PooledConnection {
  fn drop(&mut self) {
    if self.inner.permits.is_closed() {
      return;
    }
    self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(self.conn.clone());
  }
}
