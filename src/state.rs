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

use std::collections::HashSet;

use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

/// The in-memory snapshot of every problem, newest first.
#[derive(Clone, Default, Debug)]
pub struct AppState {
    problems: Vec<Problem>,
}

/// A change to apply to the snapshot, usually the result of a store write.
#[derive(Clone, Debug)]
pub enum Update {
    /// Replace the snapshot with a fresh listing from the store.
    Loaded(Vec<Problem>),
    /// Insert a new problem, or replace the one with the same id.
    Saved(Problem),
    Removed(ProblemId),
    Cleared,
}

impl AppState {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn get(&self, id: &ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|p| &p.id == id)
    }

    pub fn apply(self, update: Update) -> AppState {
        let mut problems = self.problems;
        match update {
            Update::Loaded(fresh) => {
                problems = fresh;
            }
            Update::Saved(problem) => {
                match problems.iter_mut().find(|p| p.id == problem.id) {
                    Some(existing) => *existing = problem,
                    None => problems.insert(0, problem),
                }
            }
            Update::Removed(id) => {
                problems.retain(|p| p.id != id);
            }
            Update::Cleared => {
                problems.clear();
            }
        }
        AppState { problems }
    }

    /// An id derived from the current time that no problem uses yet.
    pub fn fresh_id(&self, now: Timestamp) -> ProblemId {
        let taken: HashSet<&str> = self.problems.iter().map(|p| p.id.as_str()).collect();
        let mut millis = now.as_millis();
        loop {
            let id = ProblemId::from_millis(millis);
            if !taken.contains(id.as_str()) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::types::date::Date;
    use crate::types::difficulty::Difficulty;
    use crate::types::problem::NewProblem;

    fn problem(id: &str) -> Problem {
        NewProblem::new(&format!("Problem {id}"), None, Difficulty::Medium, "Graphs", "LeetCode")
            .unwrap()
            .into_problem(
                ProblemId::new(id),
                Date::parse("2024-01-01").unwrap(),
                Timestamp::now(),
            )
    }

    fn ids(state: &AppState) -> Vec<&str> {
        state.problems().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_saved_inserts_newest_first() {
        let state = AppState::default()
            .apply(Update::Saved(problem("1")))
            .apply(Update::Saved(problem("2")));
        assert_eq!(ids(&state), vec!["2", "1"]);
    }

    #[test]
    fn test_saved_replaces_in_place() {
        let state = AppState::new(vec![problem("2"), problem("1")]);
        let mut changed = problem("1");
        changed.complete(Date::parse("2024-01-04").unwrap(), Timestamp::now());
        let state = state.apply(Update::Saved(changed));
        assert_eq!(ids(&state), vec!["2", "1"]);
        assert_eq!(state.get(&ProblemId::new("1")).unwrap().completed_dates.len(), 1);
    }

    #[test]
    fn test_removed_and_cleared() {
        let state = AppState::new(vec![problem("2"), problem("1")]);
        let state = state.apply(Update::Removed(ProblemId::new("2")));
        assert_eq!(ids(&state), vec!["1"]);
        let state = state.apply(Update::Removed(ProblemId::new("404")));
        assert_eq!(ids(&state), vec!["1"]);
        let state = state.apply(Update::Cleared);
        assert!(state.problems().is_empty());
    }

    #[test]
    fn test_loaded_replaces_snapshot() {
        let state = AppState::new(vec![problem("1")]);
        let state = state.apply(Update::Loaded(vec![problem("7"), problem("8")]));
        assert_eq!(ids(&state), vec!["7", "8"]);
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let now = Timestamp::new(Utc.timestamp_millis_opt(1000).unwrap());
        let state = AppState::new(vec![problem("1000"), problem("1001")]);
        assert_eq!(state.fresh_id(now), ProblemId::new("1002"));
        assert_eq!(AppState::default().fresh_id(now), ProblemId::new("1000"));
    }
}
