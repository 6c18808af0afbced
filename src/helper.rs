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

use std::fs::write;

use tempfile::TempDir;
use tempfile::tempdir;

use crate::config::CONFIG_FILE;
use crate::error::Fallible;

/// A scratch data directory, deleted when dropped.
pub fn create_tmp_directory() -> Fallible<TempDir> {
    Ok(tempdir()?)
}

/// A scratch data directory with a config file.
pub fn create_tmp_directory_with_config(config: &str) -> Fallible<TempDir> {
    let dir = tempdir()?;
    write(dir.path().join(CONFIG_FILE), config)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_directory_with_config() -> Fallible<()> {
        let dir = create_tmp_directory_with_config("port = 1234\n")?;
        assert!(dir.path().join(CONFIG_FILE).exists());
        Ok(())
    }
}
