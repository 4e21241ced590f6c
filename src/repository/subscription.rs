//! Live table queries
//!
//! A [`Subscription`] yields the current rows on its first `next()` and a
//! fresh snapshot after every committed change to its table.

use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::debug;

use crate::db::{Database, DbResult};
use super::error::RepositoryResult;
use super::run_blocking;

/// Tables that publish change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Macros,
    Foods,
    Meals,
    Targets,
}

type SnapshotQuery<T> = Arc<dyn Fn(&Connection) -> DbResult<Vec<T>> + Send + Sync>;

/// A live query over one table. Dropping it unsubscribes.
pub struct Subscription<T> {
    db: Database,
    table: Table,
    query: SnapshotQuery<T>,
    changes: broadcast::Receiver<Table>,
    primed: bool,
}

impl<T: Send + 'static> Subscription<T> {
    pub(crate) fn new<F>(
        db: Database,
        table: Table,
        changes: broadcast::Receiver<Table>,
        query: F,
    ) -> Self
    where
        F: Fn(&Connection) -> DbResult<Vec<T>> + Send + Sync + 'static,
    {
        Self {
            db,
            table,
            query: Arc::new(query),
            changes,
            primed: false,
        }
    }

    /// Wait for the next snapshot.
    ///
    /// The first call returns immediately. Later calls wait for a change to
    /// the table. Returns `None` once the repository is gone.
    pub async fn next(&mut self) -> Option<RepositoryResult<Vec<T>>> {
        if self.primed {
            loop {
                match self.changes.recv().await {
                    Ok(table) if table == self.table => break,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(table = ?self.table, skipped, "subscription lagged, re-reading");
                        break;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        } else {
            self.discard_pending();
        }

        self.primed = true;
        Some(self.snapshot().await)
    }

    /// Drop notifications for changes the priming snapshot already covers
    fn discard_pending(&mut self) {
        loop {
            match self.changes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    /// Read the current rows without waiting for a change
    pub async fn snapshot(&self) -> RepositoryResult<Vec<T>> {
        let db = self.db.clone();
        let query = Arc::clone(&self.query);
        run_blocking(move || Ok(db.with_conn(|conn| query(conn))?)).await
    }
}
