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

use std::fs::read_to_string;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Fallible;

/// Name of the optional config file in the data directory.
pub const CONFIG_FILE: &str = "codetracker.toml";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Keep data in the SQLite database, mirrored to the local blob.
    #[default]
    Sqlite,
    /// Keep data only in the local blob.
    Local,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Port for `serve`.
    pub port: u16,
    /// Whether `serve` opens a browser tab.
    pub open_browser: bool,
    /// How often `serve` checks for changes made by other processes.
    pub poll_interval_ms: u64,
    pub backend: BackendKind,
    /// Database file name, relative to the data directory.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            open_browser: true,
            poll_interval_ms: 1000,
            backend: BackendKind::Sqlite,
            database: "codetracker.db".to_string(),
        }
    }
}

impl Config {
    /// Load the config for a data directory. A missing file means defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        log::debug!("Loading config from {}", path.display());
        let content = read_to_string(path)?;
        Config::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_is_default() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "port = 9000\nbackend = \"local\"\n")?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.port, 9000);
        assert_eq!(config.backend, BackendKind::Local);
        assert!(config.open_browser);
        assert_eq!(config.database, "codetracker.db");
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Config::parse("prot = 9000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_poll_interval() -> Fallible<()> {
        let config = Config::parse("poll_interval_ms = 250\n")?;
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        Ok(())
    }
}
