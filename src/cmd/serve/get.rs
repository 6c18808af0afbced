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

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::view::add_form;
use crate::cmd::serve::view::confirm_page;
use crate::cmd::serve::view::due_filter_form;
use crate::cmd::serve::view::due_item;
use crate::cmd::serve::view::empty_state;
use crate::cmd::serve::view::flash_message;
use crate::cmd::serve::view::problem_detail;
use crate::cmd::serve::view::problem_item;
use crate::cmd::serve::view::search_form;
use crate::cmd::serve::view::stats_bar;
use crate::dashboard::DueFilter;
use crate::dashboard::Stats;
use crate::dashboard::categories;
use crate::dashboard::due_today;
use crate::dashboard::search;
use crate::types::difficulty::Difficulty;
use crate::types::problem::ProblemId;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    difficulty: String,
}

impl DashboardQuery {
    /// Empty form fields mean "no filter". Unknown difficulties are ignored.
    fn due_filter(&self) -> DueFilter {
        let category = Some(self.category.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let difficulty = self.difficulty.parse::<Difficulty>().ok();
        DueFilter {
            category,
            difficulty,
        }
    }
}

fn render(status: StatusCode, body: Markup) -> (StatusCode, Html<String>) {
    (status, Html(page_template(body).into_string()))
}

pub async fn get_handler(
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> (StatusCode, Html<String>) {
    let today = state.today();
    let offline = state.store.is_offline();
    let mut guard = state.acquire();
    let mutable = &mut *guard;
    let flash = mutable.flash.take();
    let streak = mutable.streak.get(mutable.app.problems(), today);
    let problems = mutable.app.problems();
    let stats = Stats::with_streak(problems, today, streak);
    let categories = categories(problems);
    let filter = query.due_filter();
    let due = due_today(problems, today, &filter);
    let found = search(problems, &query.q);
    let body = html! {
        div.container {
            header {
                h1 { "Code Tracker" }
                p.subtitle { "Practice on the 3-7-15 rule" }
            }
            (flash_message(&flash))
            @if offline {
                div.offline-notice { "Working offline. Changes are kept locally." }
            }
            (stats_bar(&stats))
            section.add-problem {
                h2 { "Add Problem" }
                (add_form(&categories))
            }
            section.due-today {
                h2 { "Due Today" }
                (due_filter_form(&categories, filter.category.as_deref(), filter.difficulty, &query.q))
                div #dueList {
                    @if due.is_empty() {
                        (empty_state("No problems due today!", "Great job staying on track"))
                    } @else {
                        @for problem in &due {
                            (due_item(problem, today))
                        }
                    }
                }
            }
            section.all-problems {
                h2 { "All Problems" }
                (search_form(&query.q))
                div #problemsList {
                    @if found.is_empty() {
                        (empty_state("No problems found!", "Add a problem to get started"))
                    } @else {
                        @for problem in &found {
                            (problem_item(problem, today))
                        }
                    }
                }
                @if !problems.is_empty() {
                    a.clear-link href="/clear" { "Clear all problems" }
                }
            }
        }
    };
    render(StatusCode::OK, body)
}

pub async fn problem_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    let today = state.today();
    let mutable = state.acquire();
    match mutable.app.get(&ProblemId::new(id)) {
        Some(problem) => render(StatusCode::OK, problem_detail(problem, today)),
        None => not_found(),
    }
}

pub async fn confirm_delete_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    let mutable = state.acquire();
    match mutable.app.get(&ProblemId::new(id)) {
        Some(problem) => {
            let message = format!("Are you sure you want to delete \"{}\"?", problem.name);
            let action = format!("/delete/{}", problem.id);
            render(
                StatusCode::OK,
                confirm_page("Delete Problem", &message, "Delete", &action),
            )
        }
        None => not_found(),
    }
}

pub async fn confirm_clear_handler() -> (StatusCode, Html<String>) {
    render(
        StatusCode::OK,
        confirm_page(
            "Clear All Problems",
            "Are you sure you want to delete all problems? This cannot be undone.",
            "Clear All",
            "/clear",
        ),
    )
}

pub fn not_found() -> (StatusCode, Html<String>) {
    render(
        StatusCode::NOT_FOUND,
        html! {
            div.container {
                h1 { "Not Found" }
                a href="/" { "Back" }
            }
        },
    )
}
