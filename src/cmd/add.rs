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
use crate::schedule::schedule_dates;
use crate::types::problem::NewProblem;
use crate::types::problem::Problem;
use crate::types::timestamp::Timestamp;

pub fn add_problem(coll: &Collection, input: NewProblem) -> Fallible<Problem> {
    let now = Timestamp::now();
    let id = coll.state()?.fresh_id(now);
    let problem = input.into_problem(id, coll.today, now);
    let problem = coll.store.add(&problem)?;
    let dates: Vec<String> = schedule_dates(problem.date_added)
        .iter()
        .map(|d| d.long_format())
        .collect();
    println!("Added {} [{}].", problem.name, problem.id);
    println!("Reviews: {}", dates.join(", "));
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;
    use crate::types::date::Date;
    use crate::types::difficulty::Difficulty;

    #[test]
    fn test_add_problem() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let today = Date::parse("2024-01-01")?;
        let coll = Collection::new(Some(dir.path().display().to_string()), Some(today))?;
        let input = NewProblem::new("Two Sum", None, Difficulty::Easy, "Arrays", "LeetCode")?;
        let first = add_problem(&coll, input.clone())?;
        let second = add_problem(&coll, input)?;
        assert_ne!(first.id, second.id);
        assert_eq!(first.date_added, today);
        assert_eq!(coll.state()?.problems().len(), 2);
        Ok(())
    }
}
