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

use clap::Parser;
use clap::Subcommand;

use crate::cmd::add::add_problem;
use crate::cmd::complete::mark_done;
use crate::cmd::export::export_problems;
use crate::cmd::list::list_due;
use crate::cmd::list::list_problems;
use crate::cmd::remove::clear_problems;
use crate::cmd::remove::remove_problem;
use crate::cmd::serve::server::ServeOptions;
use crate::cmd::serve::server::start_server;
use crate::cmd::show::show_problem;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::dashboard::DueFilter;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::difficulty::Difficulty;
use crate::types::problem::NewProblem;
use crate::types::problem::ProblemId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the data directory. Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    /// Compute schedules as of this date (YYYY-MM-DD) instead of today.
    #[arg(long, global = true, value_parser = Date::parse)]
    today: Option<Date>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a solved problem and schedule its reviews.
    Add {
        /// The problem's name.
        name: String,
        /// URL of the problem.
        #[arg(long)]
        link: Option<String>,
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        #[arg(long, default_value = "General")]
        category: String,
        #[arg(long, default_value = "LeetCode")]
        platform: String,
    },
    /// List all problems with their review schedule.
    List {
        /// Only show problems whose name, category or platform contains this.
        #[arg(long)]
        search: Option<String>,
    },
    /// List the problems due for review today.
    Due {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
    },
    /// Mark a problem as reviewed.
    Done {
        id: String,
        /// The date of the review. Defaults to today.
        #[arg(long, value_parser = Date::parse)]
        date: Option<Date>,
    },
    /// Show a problem in detail.
    Show { id: String },
    /// Delete a problem.
    Remove { id: String },
    /// Delete every problem.
    Clear {
        /// Confirm that all progress should be removed.
        #[arg(long)]
        yes: bool,
    },
    /// Print statistics.
    Stats {
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Export every problem as JSON.
    Export,
    /// Serve the dashboard in the browser.
    Serve {
        /// Port to listen on. Overrides the config file.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open a browser tab.
        #[arg(long)]
        no_open: bool,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let coll = Collection::new(cli.directory, cli.today)?;
    match cli.command {
        Command::Add {
            name,
            link,
            difficulty,
            category,
            platform,
        } => {
            let input = NewProblem::new(&name, link.as_deref(), difficulty, &category, &platform)?;
            add_problem(&coll, input)?;
            Ok(())
        }
        Command::List { search } => list_problems(&coll, search.as_deref().unwrap_or("")),
        Command::Due {
            category,
            difficulty,
        } => list_due(
            &coll,
            &DueFilter {
                category,
                difficulty,
            },
        ),
        Command::Done { id, date } => {
            mark_done(&coll, &ProblemId::new(id), date)?;
            Ok(())
        }
        Command::Show { id } => show_problem(&coll, &ProblemId::new(id)),
        Command::Remove { id } => remove_problem(&coll, &ProblemId::new(id)),
        Command::Clear { yes } => clear_problems(&coll, yes),
        Command::Stats { format } => print_stats(&coll, format),
        Command::Export => export_problems(&coll),
        Command::Serve { port, no_open } => {
            let options = ServeOptions {
                port: port.unwrap_or(coll.config.port),
                open_browser: coll.config.open_browser && !no_open,
            };
            start_server(coll, options).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "codetracker",
            "add",
            "Two Sum",
            "--difficulty",
            "easy",
            "--today",
            "2024-01-01",
        ])
        .unwrap();
        assert_eq!(cli.today, Some(Date::parse("2024-01-01").unwrap()));
        match cli.command {
            Command::Add {
                name, difficulty, ..
            } => {
                assert_eq!(name, "Two Sum");
                assert_eq!(difficulty, Difficulty::Easy);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let result = Cli::try_parse_from(["codetracker", "done", "1", "--date", "01/04/2024"]);
        assert!(result.is_err());
    }
}
