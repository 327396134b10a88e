// Copyright 2017 Dmytro Milinevskyi <dmilinevskyi@gmail.com>

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

// http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::env;

/// Environment variable that toggles the mirror thread.
pub const ENV_THREAD: &str = "LOGPANE_THREAD";

/// Environment variable holding the mirror filter [spec](../spec/index.html).
pub const ENV_MIRROR: &str = "LOGPANE_MIRROR";

/// Recorder configuration.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Config {
    /// Mirror records from a dedicated thread instead of the calling one.
    pub thread: bool,
    /// Mirror records to stderr.
    pub stderr: bool,
    /// Mirror filter [spec](../spec/index.html), everything is mirrored if not set.
    pub filter: Option<String>,
}

impl Config {
    /// Applies the environment overrides on top of the configuration.
    ///
    /// `LOGPANE_THREAD` accepts `1`, `true`, `yes`, `on` and their opposites,
    /// other values are ignored.
    /// `LOGPANE_MIRROR` replaces the filter spec.
    pub fn with_env(&self) -> Config {
        let mut config = self.clone();
        if let Ok(thread) = env::var(ENV_THREAD) {
            if let Some(thread) = parse_flag(&thread) {
                config.thread = thread;
            }
        }
        if let Ok(spec) = env::var(ENV_MIRROR) {
            config.filter = Some(spec);
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
