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

use std::fs::read_to_string;
use std::fs::rename;
use std::fs::write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::store::Backend;
use crate::store::StoreError;
use crate::store::StoreResult;
use crate::types::date::Date;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

/// The fixed key under which the fallback copy is stored.
pub const LOCAL_KEY: &str = "codeTracker_problems";

/// A single JSON file holding every problem, newest first. Used when the
/// database is unavailable, and kept as a mirror of it otherwise.
pub struct LocalStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// The blob for a data directory.
    pub fn in_directory(directory: &Path) -> Self {
        Self::new(directory.join(format!("{LOCAL_KEY}.json")))
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Vec<Problem>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, problems: &[Problem]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(problems)?;
        let tmp = self.path.with_extension("json.tmp");
        write(&tmp, json)?;
        rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Problem>) -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut problems = self.read()?;
        let result = f(&mut problems)?;
        self.write(&problems)?;
        Ok(result)
    }
}

impl Backend for LocalStore {
    fn list(&self) -> StoreResult<Vec<Problem>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read()
    }

    fn add(&self, problem: &Problem) -> StoreResult<Problem> {
        self.modify(|problems| {
            if problems.iter().any(|p| p.id == problem.id) {
                return Err(StoreError::Duplicate(problem.id.clone()));
            }
            problems.insert(0, problem.clone());
            Ok(problem.clone())
        })
    }

    fn mark_completed(&self, id: &ProblemId, date: Date, now: Timestamp) -> StoreResult<Problem> {
        self.modify(|problems| {
            let problem = problems
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            problem.complete(date, now);
            Ok(problem.clone())
        })
    }

    fn remove(&self, id: &ProblemId) -> StoreResult<bool> {
        self.modify(|problems| {
            let before = problems.len();
            problems.retain(|p| &p.id != id);
            Ok(problems.len() < before)
        })
    }

    fn clear_all(&self) -> StoreResult<usize> {
        self.modify(|problems| {
            let count = problems.len();
            problems.clear();
            Ok(count)
        })
    }

    fn replace_all(&self, problems: &[Problem]) -> StoreResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(problems)
    }
}
