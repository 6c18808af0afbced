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

use crate::cmd::list::format_schedule;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;

pub fn show_problem(coll: &Collection, id: &ProblemId) -> Fallible<()> {
    let state = coll.state()?;
    match state.get(id) {
        Some(problem) => {
            print!("{}", format_detail(problem, coll.today));
            Ok(())
        }
        None => fail(format!("no problem with id {id}")),
    }
}

pub fn format_detail(problem: &Problem, today: Date) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", problem.name));
    if let Some(link) = &problem.link {
        out.push_str(&format!("{link}\n"));
    }
    out.push_str(&format!("Difficulty: {}\n", problem.difficulty));
    out.push_str(&format!("Category:   {}\n", problem.category));
    out.push_str(&format!("Platform:   {}\n", problem.platform));
    out.push_str(&format!("Added:      {}\n", problem.date_added.long_format()));
    out.push_str(&format!("Schedule:   {}\n", format_schedule(problem, today)));
    let sessions = &problem.completed_dates;
    out.push_str(&format!("Completed Sessions: {}\n", sessions.len()));
    if sessions.is_empty() {
        out.push_str("No sessions completed yet\n");
    }
    if let Some(last) = sessions.last() {
        out.push_str(&format!("Last completed: {}\n", last.long_format()));
    }
    out
}
