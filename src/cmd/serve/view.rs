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

use maud::Markup;
use maud::html;

use crate::cmd::serve::state::Flash;
use crate::cmd::serve::state::FlashKind;
use crate::dashboard::Stats;
use crate::schedule::review_day;
use crate::schedule::schedule;
use crate::types::date::Date;
use crate::types::difficulty::Difficulty;
use crate::types::problem::Problem;

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

pub fn flash_message(flash: &Option<Flash>) -> Markup {
    html! {
        @if let Some(flash) = flash {
            @match flash.kind {
                FlashKind::Success => { div.celebration { (flash.message) } }
                FlashKind::Error => { div.error-message { (flash.message) } }
            }
        }
    }
}

pub fn stats_bar(stats: &Stats) -> Markup {
    html! {
        div.stats {
            div.stat {
                span.value id="totalProblems" { (stats.total_problems) }
                span.label { "Total Problems" }
            }
            div.stat {
                span.value id="dueToday" { (stats.due_today) }
                span.label { "Due Today" }
            }
            div.stat {
                span.value id="streakCount" { (stats.streak) }
                span.label { "Day Streak" }
            }
        }
    }
}

pub fn add_form(categories: &[String]) -> Markup {
    html! {
        form #problemForm action="/add" method="post" {
            input name="name" type="text" placeholder="Problem name" required;
            input name="link" type="url" placeholder="Link (optional)";
            select name="difficulty" {
                @for d in DIFFICULTIES {
                    @if d == Difficulty::Medium {
                        option value=(d.as_str()) selected { (d.as_str()) }
                    } @else {
                        option value=(d.as_str()) { (d.as_str()) }
                    }
                }
            }
            input name="category" type="text" placeholder="Category" list="categories";
            datalist #categories {
                @for c in categories {
                    option value=(c) {}
                }
            }
            input name="platform" type="text" placeholder="Platform" value="LeetCode";
            input type="submit" value="Add Problem";
        }
    }
}

pub fn due_filter_form(
    categories: &[String],
    category: Option<&str>,
    difficulty: Option<Difficulty>,
    query: &str,
) -> Markup {
    html! {
        form.filters action="/" method="get" {
            input type="hidden" name="q" value=(query);
            select #filterCategory name="category" {
                option value="" { "All categories" }
                @for c in categories {
                    @if Some(c.as_str()) == category {
                        option value=(c) selected { (c) }
                    } @else {
                        option value=(c) { (c) }
                    }
                }
            }
            select #filterDifficulty name="difficulty" {
                option value="" { "All difficulties" }
                @for d in DIFFICULTIES {
                    @if Some(d) == difficulty {
                        option value=(d.as_str()) selected { (d.as_str()) }
                    } @else {
                        option value=(d.as_str()) { (d.as_str()) }
                    }
                }
            }
            input type="submit" value="Filter";
        }
    }
}

pub fn search_form(query: &str) -> Markup {
    html! {
        form.search action="/" method="get" {
            input #searchInput type="search" name="q" value=(query) placeholder="Search problems";
            input type="submit" value="Search";
        }
    }
}

fn details(problem: &Problem, last: Markup) -> Markup {
    html! {
        div.problem-details {
            div.detail-item {
                span.detail-label { "Difficulty" }
                span class=(format!("detail-value difficulty-{}", problem.difficulty.slug())) {
                    (problem.difficulty)
                }
            }
            div.detail-item {
                span.detail-label { "Category" }
                span.detail-value { (problem.category) }
            }
            div.detail-item {
                span.detail-label { "Platform" }
                span.detail-value { (problem.platform) }
            }
            (last)
        }
    }
}

fn problem_link(problem: &Problem) -> Markup {
    html! {
        @if let Some(link) = &problem.link {
            a.problem-link href=(link) target="_blank" rel="noopener" { "View Problem" }
        }
    }
}

fn complete_button(problem: &Problem, label: &str) -> Markup {
    html! {
        form.inline action=(format!("/complete/{}", problem.id)) method="post" {
            input.action-btn.complete-btn type="submit" value=(label);
        }
    }
}

pub fn schedule_markup(problem: &Problem, today: Date) -> Markup {
    html! {
        div.problem-schedule {
            div.schedule-title { "Practice Schedule (3-7-15 Rule)" }
            div.schedule-dates {
                @for review in schedule(problem, today) {
                    div class=(format!("schedule-date {}", review.status.as_str())) {
                        (review.date.long_format()) " " (review.status.marker())
                    }
                }
            }
        }
    }
}

pub fn due_item(problem: &Problem, today: Date) -> Markup {
    let day = html! {
        div.detail-item {
            span.detail-label { "Review Day" }
            span.detail-value { "Day " (review_day(problem, today)) }
        }
    };
    html! {
        div.problem-item {
            div.problem-header {
                div {
                    div.problem-title { (problem.name) }
                    (problem_link(problem))
                }
                div.problem-actions {
                    (complete_button(problem, "Mark Done"))
                }
            }
            (details(problem, day))
        }
    }
}

pub fn problem_item(problem: &Problem, today: Date) -> Markup {
    let added = html! {
        div.detail-item {
            span.detail-label { "Added" }
            span.detail-value { (problem.date_added.long_format()) }
        }
    };
    let done_today = problem.completed_dates.contains(&today);
    html! {
        div class=(if done_today { "problem-item completed" } else { "problem-item" }) {
            div.problem-header {
                div {
                    div.problem-title { (problem.name) }
                    (problem_link(problem))
                }
                div.problem-actions {
                    a.action-btn.view-btn href=(format!("/problem/{}", problem.id)) { "View" }
                    (complete_button(problem, "Complete"))
                    a.action-btn.delete-btn href=(format!("/delete/{}", problem.id)) { "Delete" }
                }
            }
            (details(problem, added))
            (schedule_markup(problem, today))
        }
    }
}

pub fn empty_state(message: &str, hint: &str) -> Markup {
    html! {
        div.empty-state {
            p { (message) }
            small { (hint) }
        }
    }
}

pub fn problem_detail(problem: &Problem, today: Date) -> Markup {
    let added = html! {
        div.detail-item {
            span.detail-label { "Added" }
            span.detail-value { (problem.date_added.long_format()) }
        }
    };
    html! {
        div.detail {
            h2 { (problem.name) }
            (problem_link(problem))
            (details(problem, added))
            (schedule_markup(problem, today))
            div.sessions {
                strong { "Completed Sessions: " } (problem.completed_dates.len())
                br;
                @match problem.completed_dates.last() {
                    Some(last) => { small { "Last completed: " (last.long_format()) } }
                    None => { small { "No sessions completed yet" } }
                }
            }
            a href="/" { "Back" }
        }
    }
}

/// A yes/cancel page guarding a destructive action.
pub fn confirm_page(title: &str, message: &str, button: &str, action: &str) -> Markup {
    html! {
        div.confirm {
            h2 { (title) }
            p { (message) }
            form action=(action) method="post" {
                a.cancel href="/" { "Cancel" }
                input.confirm-btn type="submit" value=(button);
            }
        }
    }
}
