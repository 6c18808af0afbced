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

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::state::AppState;
use crate::store::Store;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

/// An opened data directory.
pub struct Collection {
    pub config: Config,
    pub store: Store,
    /// The date all scheduling is computed against.
    pub today: Date,
    /// Set when the user pinned the date instead of using the clock.
    pub today_override: Option<Date>,
}

impl Collection {
    pub fn new(directory: Option<String>, today: Option<Date>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };
        let config = Config::load(&directory)?;
        let store = Store::open(&directory, &config);
        if store.is_offline() {
            log::info!("Working offline from the local copy.");
        }
        let today_override = today;
        let today = today.unwrap_or_else(|| Timestamp::now().local_date());
        Ok(Self {
            config,
            store,
            today,
            today_override,
        })
    }

    /// Load the current snapshot of every problem.
    pub fn state(&self) -> Fallible<AppState> {
        Ok(AppState::new(self.store.list()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()), None);
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_empty_directory() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let today = Date::parse("2024-01-04")?;
        let coll = Collection::new(Some(dir.path().display().to_string()), Some(today))?;
        assert_eq!(coll.today, today);
        assert!(coll.state()?.problems().is_empty());
        assert!(!coll.store.is_offline());
        Ok(())
    }
}
