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
use crate::error::Fallible;
use crate::schedule::is_due_today;
use crate::types::date::Date;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

/// Mark a problem reviewed on `date` (default: today). Marking the same date
/// twice is harmless.
pub fn mark_done(coll: &Collection, id: &ProblemId, date: Option<Date>) -> Fallible<Problem> {
    let date = date.unwrap_or(coll.today);
    let problem = coll.store.mark_completed(id, date, Timestamp::now())?;
    println!("Marked {} as completed on {}.", problem.name, date.long_format());
    if is_due_today(&problem, coll.today) {
        println!("It is still due today.");
    }
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::add::add_problem;
    use crate::helper::create_tmp_directory;
    use crate::streak::calculate_streak;
    use crate::types::difficulty::Difficulty;
    use crate::types::problem::NewProblem;

    #[test]
    fn test_mark_done_is_idempotent() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let path = Some(dir.path().display().to_string());
        let added = {
            let coll = Collection::new(path.clone(), Some(Date::parse("2024-01-01")?))?;
            let input = NewProblem::new("Two Sum", None, Difficulty::Easy, "Arrays", "LeetCode")?;
            add_problem(&coll, input)?
        };
        let today = Date::parse("2024-01-04")?;
        let coll = Collection::new(path, Some(today))?;
        assert!(is_due_today(&coll.state()?.problems()[0], today));
        mark_done(&coll, &added.id, None)?;
        let after_first = coll.state()?;
        mark_done(&coll, &added.id, None)?;
        let after_second = coll.state()?;
        let problem = &after_second.problems()[0];
        assert_eq!(problem.completed_dates.len(), 1);
        assert!(!is_due_today(problem, today));
        assert_eq!(
            calculate_streak(after_first.problems(), today),
            calculate_streak(after_second.problems(), today)
        );
        Ok(())
    }

    #[test]
    fn test_mark_done_unknown_id() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let coll = Collection::new(Some(dir.path().display().to_string()), None)?;
        let result = mark_done(&coll, &ProblemId::new("404"), None);
        assert_eq!(result.unwrap_err().to_string(), "error: no problem with id 404");
        Ok(())
    }
}
