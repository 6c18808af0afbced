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
use crate::error::fail;
use crate::types::problem::ProblemId;

pub fn remove_problem(coll: &Collection, id: &ProblemId) -> Fallible<()> {
    if coll.store.remove(id)? {
        println!("Problem deleted.");
        Ok(())
    } else {
        fail(format!("no problem with id {id}"))
    }
}

pub fn clear_problems(coll: &Collection, confirmed: bool) -> Fallible<()> {
    if !confirmed {
        return fail(
            "this removes every problem and all your progress. Pass --yes to confirm.",
        );
    }
    let count = coll.store.clear_all()?;
    println!("Cleared {count} problems.");
    Ok(())
}
