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

use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::difficulty::Difficulty;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

pub fn export_problems(coll: &Collection) -> Fallible<()> {
    let state = coll.state()?;
    let json = export_json(state.problems())?;
    println!("{json}");
    Ok(())
}

/// The persisted row shape, one per problem.
#[derive(Serialize)]
struct ProblemRow<'a> {
    id: &'a ProblemId,
    name: &'a str,
    link: Option<&'a str>,
    difficulty: Difficulty,
    category: &'a str,
    platform: &'a str,
    date_added: Date,
    completed_dates: Vec<Date>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl<'a> From<&'a Problem> for ProblemRow<'a> {
    fn from(p: &'a Problem) -> Self {
        Self {
            id: &p.id,
            name: &p.name,
            link: p.link.as_deref(),
            difficulty: p.difficulty,
            category: &p.category,
            platform: &p.platform,
            date_added: p.date_added,
            completed_dates: p.completed_dates.iter().copied().collect(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

pub fn export_json(problems: &[Problem]) -> Fallible<String> {
    let rows: Vec<ProblemRow> = problems.iter().map(ProblemRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
