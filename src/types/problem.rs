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

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::difficulty::Difficulty;
use crate::types::timestamp::Timestamp;

/// Stable identifier of a problem. Assigned at creation, never reassigned.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProblemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for ProblemId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for ProblemId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Ok(Self(string))
    }
}

/// The dates on which a review session was completed, in the order they were
/// recorded. Never contains the same date twice.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct CompletedDates(Vec<Date>);

impl CompletedDates {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a completion. Returns `false`, changing nothing, if the date
    /// was already recorded.
    pub fn insert(&mut self, date: Date) -> bool {
        if self.0.contains(&date) {
            false
        } else {
            self.0.push(date);
            true
        }
    }

    pub fn contains(&self, date: &Date) -> bool {
        self.0.contains(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recently recorded completion.
    pub fn last(&self) -> Option<Date> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Date> {
        self.0.iter()
    }
}

impl FromIterator<Date> for CompletedDates {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        let mut dates = CompletedDates::new();
        for date in iter {
            dates.insert(date);
        }
        dates
    }
}

impl<'de> Deserialize<'de> for CompletedDates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let dates: Vec<Date> = Vec::deserialize(deserializer)?;
        Ok(dates.into_iter().collect())
    }
}

/// One practice item.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: ProblemId,
    pub name: String,
    pub link: Option<String>,
    pub difficulty: Difficulty,
    pub category: String,
    pub platform: String,
    pub date_added: Date,
    #[serde(default)]
    pub completed_dates: CompletedDates,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Problem {
    /// Mark a review session done on `date`. Returns whether anything changed.
    pub fn complete(&mut self, date: Date, now: Timestamp) -> bool {
        let changed = self.completed_dates.insert(date);
        if changed {
            self.updated_at = now;
        }
        changed
    }
}

/// A validated user submission, before an id and add-date are assigned.
#[derive(Clone, Debug)]
pub struct NewProblem {
    name: String,
    link: Option<String>,
    difficulty: Difficulty,
    category: String,
    platform: String,
}

impl NewProblem {
    pub fn new(
        name: &str,
        link: Option<&str>,
        difficulty: Difficulty,
        category: &str,
        platform: &str,
    ) -> Fallible<Self> {
        let name = name.trim();
        if name.is_empty() {
            return fail("Please enter a problem name.");
        }
        let link = link
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(str::to_string);
        if let Some(link) = &link {
            if !is_web_link(link) {
                return fail("Please enter a link starting with http:// or https://.");
            }
        }
        Ok(Self {
            name: name.to_string(),
            link,
            difficulty,
            category: category.trim().to_string(),
            platform: platform.trim().to_string(),
        })
    }

    pub fn into_problem(self, id: ProblemId, today: Date, now: Timestamp) -> Problem {
        Problem {
            id,
            name: self.name,
            link: self.link,
            difficulty: self.difficulty,
            category: self.category,
            platform: self.platform,
            date_added: today,
            completed_dates: CompletedDates::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Links end up in `href` attributes, so only web URLs are accepted.
fn is_web_link(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    ["http://", "https://"]
        .into_iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}
