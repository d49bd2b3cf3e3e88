// Copyright 2025 eraflo
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

pub mod probe;
pub mod simulate;
pub mod watch;

use anyhow::{Context, Result};
use std::path::Path;
use vista_core::OptimizerConfig;

/// Loads the optimizer configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<OptimizerConfig> {
    match path {
        Some(path) => OptimizerConfig::load(path)
            .with_context(|| format!("loading optimizer config from {}", path.display())),
        None => Ok(OptimizerConfig::default()),
    }
}
