// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Persistence for problems.
//!
//! The application talks to a [`Store`], which wraps a primary [`Backend`]
//! (normally [`SqliteStore`]) and a [`LocalStore`] fallback. Transient
//! failures of the primary switch the store to offline mode, where all
//! operations go to the fallback. Every successful write is announced on the
//! store's change feed.

pub mod feed;
pub mod local;
pub mod sqlite;

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use rusqlite::ErrorCode;
use tokio::task::JoinHandle;

use crate::config::BackendKind;
use crate::config::Config;
use crate::store::feed::ChangeEvent;
use crate::store::feed::ChangeFeed;
use crate::store::feed::Subscription;
use crate::store::local::LocalStore;
use crate::store::sqlite::SqliteStore;
use crate::types::date::Date;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StoreError {
    /// The backend is temporarily unusable; the operation may succeed
    /// elsewhere or later.
    Transient(String),
    /// The operation cannot succeed, e.g. corrupt data.
    Fatal(String),
    NotFound(ProblemId),
    Duplicate(ProblemId),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Transient(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::Fatal(msg) => write!(f, "store failure: {msg}"),
            StoreError::NotFound(id) => write!(f, "no problem with id {id}"),
            StoreError::Duplicate(id) => write!(f, "a problem with id {id} already exists"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, _) = &value {
            match e.code {
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
                | ErrorCode::DiskFull => return StoreError::Transient(value.to_string()),
                _ => {}
            }
        }
        StoreError::Fatal(value.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        StoreError::Transient(value.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Fatal(format!("malformed data: {value}"))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A place problems can be persisted.
pub trait Backend: Send + Sync {
    /// Every problem, newest first.
    fn list(&self) -> StoreResult<Vec<Problem>>;

    fn add(&self, problem: &Problem) -> StoreResult<Problem>;

    /// Record a completion. Adding a date that is already recorded changes
    /// nothing and still succeeds.
    fn mark_completed(&self, id: &ProblemId, date: Date, now: Timestamp) -> StoreResult<Problem>;

    /// Returns whether a problem was removed.
    fn remove(&self, id: &ProblemId) -> StoreResult<bool>;

    /// Returns how many problems were removed.
    fn clear_all(&self) -> StoreResult<usize>;

    fn replace_all(&self, problems: &[Problem]) -> StoreResult<()>;

    /// A counter that changes when another process modifies the data, if the
    /// backend can tell.
    fn data_version(&self) -> StoreResult<Option<i64>> {
        Ok(None)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Source {
    Primary,
    Local,
}

pub struct Store<P: Backend = SqliteStore> {
    primary: Option<P>,
    local: LocalStore,
    offline: AtomicBool,
    seen_version: Mutex<Option<i64>>,
    feed: ChangeFeed,
}

impl Store<SqliteStore> {
    /// Open the store for a data directory. If the database can't be opened
    /// the store starts in offline mode.
    pub fn open(directory: &Path, config: &Config) -> Self {
        let local = LocalStore::in_directory(directory);
        let primary = match config.backend {
            BackendKind::Local => None,
            BackendKind::Sqlite => match SqliteStore::open(&directory.join(&config.database)) {
                Ok(db) => Some(db),
                Err(e) => {
                    log::warn!("Failed to open database ({e}). Using offline mode.");
                    None
                }
            },
        };
        Store::new(primary, local)
    }
}

impl<P: Backend> Store<P> {
    pub fn new(primary: Option<P>, local: LocalStore) -> Self {
        let store = Self {
            offline: AtomicBool::new(primary.is_none()),
            primary,
            local,
            seen_version: Mutex::new(None),
            feed: ChangeFeed::new(),
        };
        if let Some(primary) = store.online_primary() {
            store.reconcile(primary);
            store.mirror(primary);
            match primary.data_version() {
                Ok(version) => *store.acquire_version() = version,
                Err(e) => log::warn!("Failed to read data version: {e}"),
            }
        }
        store
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> Subscription {
        self.feed.subscribe()
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    pub fn list(&self) -> StoreResult<Vec<Problem>> {
        let (problems, _) = self.run("list", |b| b.list())?;
        Ok(problems)
    }

    pub fn add(&self, problem: &Problem) -> StoreResult<Problem> {
        let added = self.write("add", |b| b.add(problem))?;
        self.feed.publish(ChangeEvent::Inserted(added.id.clone()));
        Ok(added)
    }

    pub fn mark_completed(
        &self,
        id: &ProblemId,
        date: Date,
        now: Timestamp,
    ) -> StoreResult<Problem> {
        let problem = self.write("mark completed", |b| b.mark_completed(id, date, now))?;
        self.feed.publish(ChangeEvent::Updated(problem.id.clone()));
        Ok(problem)
    }

    pub fn remove(&self, id: &ProblemId) -> StoreResult<bool> {
        let removed = self.write("remove", |b| b.remove(id))?;
        if removed {
            self.feed.publish(ChangeEvent::Deleted(id.clone()));
        }
        Ok(removed)
    }

    pub fn clear_all(&self) -> StoreResult<usize> {
        let count = self.write("clear", |b| b.clear_all())?;
        self.feed.publish(ChangeEvent::Cleared);
        Ok(count)
    }

    /// Check whether another process changed the data since the last call.
    /// Publishes `ChangeEvent::External` and returns `true` if so.
    pub fn poll_external(&self) -> StoreResult<bool> {
        let Some(primary) = self.online_primary() else {
            return Ok(false);
        };
        let version = match primary.data_version() {
            Ok(version) => version,
            Err(e) if e.is_transient() => {
                log::debug!("Skipping change poll: {e}");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        let changed = {
            let mut seen = self.acquire_version();
            let changed = version.is_some() && *seen != version;
            *seen = version;
            changed
        };
        if changed {
            self.mirror(primary);
            self.feed.publish(ChangeEvent::External);
        }
        Ok(changed)
    }

    fn online_primary(&self) -> Option<&P> {
        if self.is_offline() {
            None
        } else {
            self.primary.as_ref()
        }
    }

    /// Run an operation on the primary, falling back to the local blob if
    /// the primary is unavailable.
    fn run<T>(
        &self,
        op: &str,
        f: impl Fn(&dyn Backend) -> StoreResult<T>,
    ) -> StoreResult<(T, Source)> {
        if let Some(primary) = self.online_primary() {
            match f(primary) {
                Ok(value) => return Ok((value, Source::Primary)),
                Err(e) if e.is_transient() => {
                    log::warn!("Failed to {op} ({e}). Switching to offline mode.");
                    self.offline.store(true, Ordering::SeqCst);
                }
                Err(e) => return Err(e),
            }
        }
        let value = f(&self.local)?;
        Ok((value, Source::Local))
    }

    fn write<T>(&self, op: &str, f: impl Fn(&dyn Backend) -> StoreResult<T>) -> StoreResult<T> {
        let (value, source) = self.run(op, f)?;
        if source == Source::Primary {
            if let Some(primary) = &self.primary {
                self.mirror(primary);
            }
        }
        Ok(value)
    }

    /// Copy the primary's contents to the local blob.
    fn mirror(&self, primary: &P) {
        let result = primary
            .list()
            .and_then(|problems| self.local.replace_all(&problems));
        if let Err(e) = result {
            log::warn!("Failed to update local copy: {e}");
        }
    }

    /// Push work done while offline back to the primary. Problems only in
    /// the local blob are added; completion dates are merged by union.
    /// Deletions made offline are not replayed.
    fn reconcile(&self, primary: &P) {
        let result = (|| -> StoreResult<()> {
            let local = self.local.list()?;
            if local.is_empty() {
                return Ok(());
            }
            let remote = primary.list()?;
            for problem in local.iter().rev() {
                match remote.iter().find(|p| p.id == problem.id) {
                    None => {
                        log::debug!("Restoring offline problem {}", problem.id);
                        primary.add(problem)?;
                    }
                    Some(existing) => {
                        for date in problem.completed_dates.iter() {
                            if !existing.completed_dates.contains(date) {
                                primary.mark_completed(&problem.id, *date, problem.updated_at)?;
                            }
                        }
                    }
                }
            }
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("Failed to reconcile local copy: {e}");
        }
    }

    fn acquire_version(&self) -> std::sync::MutexGuard<'_, Option<i64>> {
        self.seen_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Poll the store for changes made by other processes until the returned
/// task is aborted.
pub fn watch<P: Backend + 'static>(store: Arc<Store<P>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = store.poll_external() {
                log::error!("Change poll failed: {e}");
            }
        }
    })
}
