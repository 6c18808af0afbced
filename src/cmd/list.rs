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

use crate::collection::Collection;
use crate::dashboard::DueFilter;
use crate::dashboard::due_today;
use crate::dashboard::search;
use crate::error::Fallible;
use crate::schedule::review_day;
use crate::schedule::schedule;
use crate::types::date::Date;
use crate::types::problem::Problem;

pub fn list_problems(coll: &Collection, query: &str) -> Fallible<()> {
    let state = coll.state()?;
    let found = search(state.problems(), query);
    print!("{}", format_problems(&found, coll.today));
    Ok(())
}

pub fn list_due(coll: &Collection, filter: &DueFilter) -> Fallible<()> {
    let state = coll.state()?;
    let due = due_today(state.problems(), coll.today, filter);
    print!("{}", format_due(&due, coll.today));
    Ok(())
}

fn headline(problem: &Problem) -> String {
    format!(
        "[{}] {} ({}, {}, {})",
        problem.id, problem.name, problem.difficulty, problem.category, problem.platform
    )
}

/// One line per scheduled review, e.g. `Jan 4, 2024 ✓`.
pub fn format_schedule(problem: &Problem, today: Date) -> String {
    schedule(problem, today)
        .iter()
        .map(|review| {
            let marker = review.status.marker();
            if marker.is_empty() {
                review.date.long_format()
            } else {
                format!("{} {}", review.date.long_format(), marker)
            }
        })
        .collect::<Vec<_>>()
        .join("   ")
}

pub fn format_problems(problems: &[&Problem], today: Date) -> String {
    if problems.is_empty() {
        return "No problems found!\n".to_string();
    }
    let mut out = String::new();
    for problem in problems {
        out.push_str(&headline(problem));
        out.push_str(&format!(" added {}\n", problem.date_added.long_format()));
        out.push_str(&format!("    {}\n", format_schedule(problem, today)));
    }
    out
}

pub fn format_due(problems: &[&Problem], today: Date) -> String {
    if problems.is_empty() {
        return "No problems due today!\n".to_string();
    }
    let mut out = String::new();
    for problem in problems {
        out.push_str(&format!(
            "{} - Day {}\n",
            headline(problem),
            review_day(problem, today)
        ));
        if let Some(link) = &problem.link {
            out.push_str(&format!("    {link}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::difficulty::Difficulty;
    use crate::types::problem::NewProblem;
    use crate::types::problem::ProblemId;
    use crate::types::timestamp::Timestamp;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn problem() -> Problem {
        let mut p = NewProblem::new(
            "Two Sum",
            Some("https://leetcode.com/problems/two-sum"),
            Difficulty::Easy,
            "Arrays",
            "LeetCode",
        )
        .unwrap()
        .into_problem(ProblemId::new("1"), date("2024-01-01"), Timestamp::now());
        p.complete(date("2024-01-04"), Timestamp::now());
        p
    }

    #[test]
    fn test_format_schedule() {
        let p = problem();
        assert_eq!(
            format_schedule(&p, date("2024-01-08")),
            "Jan 4, 2024 ✓   Jan 8, 2024 ⏰   Jan 16, 2024"
        );
        assert_eq!(
            format_schedule(&p, date("2024-01-10")),
            "Jan 4, 2024 ✓   Jan 8, 2024 ❌   Jan 16, 2024"
        );
    }

    #[test]
    fn test_format_problems() {
        let p = problem();
        let out = format_problems(&[&p], date("2024-01-08"));
        assert!(out.starts_with("[1] Two Sum (Easy, Arrays, LeetCode) added Jan 1, 2024\n"));
        assert_eq!(format_problems(&[], date("2024-01-08")), "No problems found!\n");
    }

    #[test]
    fn test_format_due() {
        let p = problem();
        let out = format_due(&[&p], date("2024-01-08"));
        assert_eq!(
            out,
            "[1] Two Sum (Easy, Arrays, LeetCode) - Day 7\n    https://leetcode.com/problems/two-sum\n"
        );
        assert_eq!(format_due(&[], date("2024-01-08")), "No problems due today!\n");
    }
}
