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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::state::AppState;
use crate::state::Update;
use crate::store::Store;
use crate::streak::StreakCache;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct ServerState {
    pub port: u16,
    /// Pinned date, if any. Otherwise the clock is read on every request.
    pub today: Option<Date>,
    pub store: Arc<Store>,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub app: AppState,
    pub streak: StreakCache,
    /// A message to show once, on the next page render.
    pub flash: Option<Flash>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl ServerState {
    pub fn today(&self) -> Date {
        self.today.unwrap_or_else(|| Timestamp::now().local_date())
    }

    pub fn acquire(&self) -> MutexGuard<'_, MutableState> {
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MutableState {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            streak: StreakCache::new(),
            flash: None,
        }
    }

    pub fn apply(&mut self, update: Update) {
        let app = std::mem::take(&mut self.app);
        self.app = app.apply(update);
        self.streak.invalidate();
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Success,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Error,
            message: message.into(),
        });
    }
}
