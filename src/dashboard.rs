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

//! Read-only views derived from the problem snapshot.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::schedule::is_due_today;
use crate::streak::calculate_streak;
use crate::types::date::Date;
use crate::types::difficulty::Difficulty;
use crate::types::problem::Problem;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_problems: usize,
    pub due_today: usize,
    pub streak: usize,
}

impl Stats {
    pub fn compute(problems: &[Problem], today: Date) -> Self {
        Self::with_streak(problems, today, calculate_streak(problems, today))
    }

    /// Like `compute`, for callers that already know the streak.
    pub fn with_streak(problems: &[Problem], today: Date, streak: usize) -> Self {
        Self {
            total_problems: problems.len(),
            due_today: problems.iter().filter(|p| is_due_today(p, today)).count(),
            streak,
        }
    }
}

/// Restricts the due list. `None` fields match everything.
#[derive(Clone, Default, Debug)]
pub struct DueFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl DueFilter {
    fn matches(&self, problem: &Problem) -> bool {
        let category = self
            .category
            .as_ref()
            .is_none_or(|c| problem.category == *c);
        let difficulty = self.difficulty.is_none_or(|d| problem.difficulty == d);
        category && difficulty
    }
}

/// Problems whose name, category or platform contains `query`, ignoring case.
pub fn search<'a>(problems: &'a [Problem], query: &str) -> Vec<&'a Problem> {
    let query = query.trim().to_lowercase();
    problems
        .iter()
        .filter(|p| {
            query.is_empty()
                || p.name.to_lowercase().contains(&query)
                || p.category.to_lowercase().contains(&query)
                || p.platform.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn due_today<'a>(problems: &'a [Problem], today: Date, filter: &DueFilter) -> Vec<&'a Problem> {
    problems
        .iter()
        .filter(|p| is_due_today(p, today) && filter.matches(p))
        .collect()
}

/// Distinct categories, sorted.
pub fn categories(problems: &[Problem]) -> Vec<String> {
    let set: BTreeSet<&str> = problems
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::problem::NewProblem;
    use crate::types::problem::ProblemId;
    use crate::types::timestamp::Timestamp;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn problem(id: &str, name: &str, difficulty: Difficulty, category: &str, added: &str) -> Problem {
        NewProblem::new(name, None, difficulty, category, "LeetCode")
            .unwrap()
            .into_problem(ProblemId::new(id), date(added), Timestamp::now())
    }

    fn sample() -> Vec<Problem> {
        vec![
            problem("1", "Two Sum", Difficulty::Easy, "Arrays", "2024-01-01"),
            problem("2", "Word Ladder", Difficulty::Hard, "Graphs", "2024-01-01"),
            problem("3", "Course Schedule", Difficulty::Medium, "Graphs", "2024-01-02"),
        ]
    }

    #[test]
    fn test_stats() {
        let mut problems = sample();
        problems[0].complete(date("2024-01-04"), Timestamp::now());
        let stats = Stats::compute(&problems, date("2024-01-04"));
        assert_eq!(
            stats,
            Stats {
                total_problems: 3,
                due_today: 1,
                streak: 1
            }
        );
    }

    #[test]
    fn test_search_ignores_case() {
        let problems = sample();
        let found: Vec<&str> = search(&problems, "GRAPH").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(found, vec!["2", "3"]);
        assert_eq!(search(&problems, "ladder").len(), 1);
        assert_eq!(search(&problems, "leetcode").len(), 3);
        assert_eq!(search(&problems, "").len(), 3);
        assert!(search(&problems, "dynamic").is_empty());
    }

    #[test]
    fn test_due_today_with_filters() {
        let problems = sample();
        let today = date("2024-01-04");
        assert_eq!(due_today(&problems, today, &DueFilter::default()).len(), 2);
        let graphs = DueFilter {
            category: Some("Graphs".to_string()),
            difficulty: None,
        };
        let found = due_today(&problems, today, &graphs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "2");
        let easy_graphs = DueFilter {
            category: Some("Graphs".to_string()),
            difficulty: Some(Difficulty::Easy),
        };
        assert!(due_today(&problems, today, &easy_graphs).is_empty());
    }

    #[test]
    fn test_categories() {
        assert_eq!(categories(&sample()), vec!["Arrays", "Graphs"]);
    }
}
