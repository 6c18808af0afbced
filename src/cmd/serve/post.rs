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

use axum::Form;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;
use crate::error::Fallible;
use crate::state::Update;
use crate::store::StoreError;
use crate::types::difficulty::Difficulty;
use crate::types::problem::NewProblem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

#[derive(Deserialize)]
pub struct AddForm {
    name: String,
    #[serde(default)]
    link: String,
    difficulty: Difficulty,
    #[serde(default)]
    category: String,
    #[serde(default)]
    platform: String,
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

pub async fn add_handler(State(state): State<ServerState>, Form(form): Form<AddForm>) -> Redirect {
    let result = add_action(&state, form);
    finish(&state, "add", result, "Problem added successfully! 🎉")
}

fn add_action(state: &ServerState, form: AddForm) -> Fallible<()> {
    let input = NewProblem::new(
        &form.name,
        Some(&form.link),
        form.difficulty,
        or_default(&form.category, "General"),
        or_default(&form.platform, "LeetCode"),
    )?;
    let now = Timestamp::now();
    let mut mutable = state.acquire();
    let id = mutable.app.fresh_id(now);
    let problem = input.into_problem(id, state.today(), now);
    let problem = state.store.add(&problem)?;
    log::debug!("Added problem {}", problem.id);
    mutable.apply(Update::Saved(problem));
    Ok(())
}

pub async fn complete_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Redirect {
    let result = complete_action(&state, ProblemId::new(id));
    finish(
        &state,
        "complete",
        result,
        "Great job! Problem marked as completed! 🎯",
    )
}

fn complete_action(state: &ServerState, id: ProblemId) -> Fallible<()> {
    let mut mutable = state.acquire();
    let problem = state
        .store
        .mark_completed(&id, state.today(), Timestamp::now())?;
    mutable.apply(Update::Saved(problem));
    Ok(())
}

pub async fn delete_handler(State(state): State<ServerState>, Path(id): Path<String>) -> Redirect {
    let result = delete_action(&state, ProblemId::new(id));
    finish(&state, "delete", result, "Problem deleted successfully")
}

fn delete_action(state: &ServerState, id: ProblemId) -> Fallible<()> {
    let mut mutable = state.acquire();
    if !state.store.remove(&id)? {
        return Err(StoreError::NotFound(id).into());
    }
    mutable.apply(Update::Removed(id));
    Ok(())
}

pub async fn clear_handler(State(state): State<ServerState>) -> Redirect {
    let result = clear_action(&state);
    finish(&state, "clear", result, "All problems cleared")
}

fn clear_action(state: &ServerState) -> Fallible<()> {
    let mut mutable = state.acquire();
    let count = state.store.clear_all()?;
    log::debug!("Cleared {count} problems");
    mutable.apply(Update::Cleared);
    Ok(())
}

/// Record the outcome as a flash message and go back to the dashboard.
fn finish(state: &ServerState, action: &str, result: Fallible<()>, success: &str) -> Redirect {
    let mut mutable = state.acquire();
    match result {
        Ok(()) => mutable.success(success),
        Err(e) => {
            log::error!("{action} failed: {e}");
            mutable.error(e.message());
        }
    }
    Redirect::to("/")
}
