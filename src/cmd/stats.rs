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

use clap::ValueEnum;

use crate::collection::Collection;
use crate::dashboard::Stats;
use crate::error::Fallible;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(coll: &Collection, format: StatsFormat) -> Fallible<()> {
    let state = coll.state()?;
    let stats = Stats::compute(state.problems(), coll.today);
    println!("{}", format_stats(&stats, format)?);
    Ok(())
}

pub fn format_stats(stats: &Stats, format: StatsFormat) -> Fallible<String> {
    match format {
        StatsFormat::Text => Ok(format!(
            "Total problems: {}\nDue today: {}\nStreak: {} days",
            stats.total_problems, stats.due_today, stats.streak
        )),
        StatsFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_json() -> Fallible<()> {
        let stats = Stats {
            total_problems: 4,
            due_today: 1,
            streak: 2,
        };
        let json = format_stats(&stats, StatsFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["totalProblems"], 4);
        assert_eq!(value["dueToday"], 1);
        assert_eq!(value["streak"], 2);
        Ok(())
    }

    #[test]
    fn test_format_text() -> Fallible<()> {
        let stats = Stats {
            total_problems: 4,
            due_today: 1,
            streak: 2,
        };
        assert_eq!(
            format_stats(&stats, StatsFormat::Text)?,
            "Total problems: 4\nDue today: 1\nStreak: 2 days"
        );
        Ok(())
    }
}
