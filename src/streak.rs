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

//! Consecutive-day practice streaks.

use std::collections::HashSet;

use crate::types::date::Date;
use crate::types::problem::Problem;

/// The number of consecutive days, ending today, on which at least one
/// review was completed across all problems. Zero if nothing was completed
/// today.
pub fn calculate_streak(problems: &[Problem], today: Date) -> usize {
    let completed: HashSet<Date> = problems
        .iter()
        .flat_map(|problem| problem.completed_dates.iter().copied())
        .collect();
    let mut streak = 0;
    let mut day = today;
    while completed.contains(&day) {
        streak += 1;
        day = day.pred();
    }
    streak
}

/// Remembers the last computed streak until the problem set changes.
#[derive(Default, Debug)]
pub struct StreakCache {
    cached: Option<(Date, usize)>,
}

impl StreakCache {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// The cached value is reused for the same date regardless of `problems`,
    /// so callers must `invalidate` whenever the set changes.
    pub fn get(&mut self, problems: &[Problem], today: Date) -> usize {
        match self.cached {
            Some((day, streak)) if day == today => streak,
            _ => {
                let streak = calculate_streak(problems, today);
                self.cached = Some((today, streak));
                streak
            }
        }
    }

    /// Must be called whenever any problem's completion dates change.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
