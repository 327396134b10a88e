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


//! The mirror filter decides which records are copied to the mirror
//! [handlers](../handlers/index.html).
//! The store itself always receives every record.
//!
//! The filter spec is either a simple comma separated list or a JSON string.
//!
//! # Simple spec
//!
//! ```ignore
//! [severity],[subsystem[=severity]],...
//! ```
//!
//! A bare severity sets the global minimum severity.
//!
//! If a token doesn't match any known severity it's treated as a subsystem name.
//! In this case if severity is not specified every record of the subsystem is mirrored.
//!
//! # JSON spec
//!
//! ```json
//! {
//!     "level": "<global minimum severity>",
//!     "subsystems": [
//!         {
//!             "name": "<subsystem>",
//!             "level": "<subsystem minimum severity>"
//!         },
//!         ...
//!     ]
//! }
//! ```
//!
//! The `name` field is mandatory while `level` defaults to `debug`.
//!
//! In both forms a later rule for the same subsystem overrides an earlier one.
//!
//! # Example
//!
//! ```rust
//! use logpane::spec;
//! use logpane::Severity;
//!
//! let filter = spec::parse("error,net=debug").unwrap();
//! assert_eq!(filter.level, Some(Severity::ERROR));
//! assert_eq!(filter.level_of("net"), Severity::DEBUG);
//! assert_eq!(filter.level_of("ui"), Severity::ERROR);
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::levels::Severity;
use crate::record::Record;

/// Minimum severity of one subsystem.
#[derive(PartialEq, Clone, Debug)]
pub struct Rule {
    /// Subsystem name, matched exactly.
    pub subsystem: String,
    /// Minimum severity.
    pub level: Severity,
}

impl Rule {
    fn new(subsystem: &str, level: Severity) -> Self {
        Rule {
            subsystem: subsystem.to_string(),
            level: level,
        }
    }
}

/// Mirror filter.
///
/// The default filter lets everything through.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Filter {
    /// Global minimum severity, `DEBUG` if not set.
    pub level: Option<Severity>,
    /// Per subsystem overrides.
    pub subsystems: Vec<Rule>,
}

impl Filter {
    /// Minimum severity for the subsystem.
    pub fn level_of(&self, subsystem: &str) -> Severity {
        self.subsystems.iter()
            .find(|rule| rule.subsystem == subsystem)
            .map(|rule| rule.level)
            .or(self.level)
            .unwrap_or(Severity::DEBUG)
    }

    /// Checks whether the record should be mirrored.
    pub fn allows(&self, record: &Record) -> bool {
        record.severity() >= self.level_of(record.source().subsystem())
    }

    fn rule(&mut self, subsystem: &str, level: Severity) {
        match self.subsystems.iter_mut().find(|rule| rule.subsystem == subsystem) {
            Some(rule) => rule.level = level,
            None => self.subsystems.push(Rule::new(subsystem, level)),
        }
    }
}

/// JSON filter spec parse failure.
#[derive(PartialEq, Clone, Copy, Debug, Error)]
pub enum JsonError {
    /// Invalid JSON string.
    #[error("invalid JSON")]
    Json,
    /// The root is invalid.
    #[error("invalid root object")]
    Root,
    /// The array of subsystems is invalid.
    #[error("invalid subsystem list")]
    Subsystem,
    /// The severity of the root is invalid.
    #[error("invalid global severity")]
    RootSeverity,
    /// The severity of a subsystem is invalid.
    #[error("invalid subsystem severity")]
    SubsystemSeverity,
}

/// Filter spec parse failure.
#[derive(PartialEq, Clone, Copy, Debug, Error)]
pub enum ParseError {
    /// Invalid spec.
    #[error("invalid filter spec")]
    Spec,
    /// Invalid severity.
    #[error("invalid severity")]
    Severity,
    /// JSON parse error.
    #[error("invalid JSON filter spec: {0}")]
    Json(#[from] JsonError),
}

fn parse_json(json: &str) -> Result<Filter, ParseError> {
    let spec: Value = serde_json::from_str(json)
        .or(Err(JsonError::Json))?;
    let spec = spec.as_object()
        .ok_or(JsonError::Root)?;
    if spec.is_empty() {
        return Err(JsonError::Root.into());
    }

    let mut filter = Filter::default();

    if let Some(level) = spec.get("level") {
        filter.level = Some(
            level.as_str()
                .ok_or(JsonError::RootSeverity)?.parse()
                .or(Err(JsonError::RootSeverity))?
        );
    }

    if let Some(subsystems) = spec.get("subsystems") {
        let subsystems = subsystems.as_array()
            .ok_or(JsonError::Subsystem)?;
        if subsystems.is_empty() {
            return Err(JsonError::Subsystem.into());
        }
        for subsystem in subsystems {
            let subsystem = subsystem.as_object()
                .ok_or(JsonError::Subsystem)?;
            let name = subsystem.get("name")
                .ok_or(JsonError::Subsystem)?.as_str()
                .ok_or(JsonError::Subsystem)?;
            if name.is_empty() {
                return Err(JsonError::Subsystem.into());
            }
            let level = match subsystem.get("level") {
                Some(level) => {
                    level.as_str()
                        .ok_or(JsonError::SubsystemSeverity)?.parse()
                        .or(Err(JsonError::SubsystemSeverity))?
                },
                None => Severity::DEBUG,
            };
            filter.rule(name, level);
        }
    }

    Ok(filter)
}

fn parse_token(filter: &mut Filter, token: &str) -> Result<(), ParseError> {
    let mut kv = token.split('=');
    let (k, v) = (kv.next().unwrap_or("").trim(), kv.next());

    if kv.next().is_some() || k.is_empty() {
        return Err(ParseError::Spec);
    }

    match v {
        // `k` is either the global severity or a subsystem mirrored entirely
        None => match k.parse() {
            Ok(level) => filter.level = Some(level),
            Err(_) => filter.rule(k, Severity::DEBUG),
        },
        Some(v) => {
            let v = v.trim();
            if v.is_empty() {
                return Err(ParseError::Spec);
            }
            let level = v.parse().or(Err(ParseError::Severity))?;
            filter.rule(k, level);
        },
    }

    Ok(())
}

/// Parses a filter spec.
pub fn parse(spec: &str) -> Result<Filter, ParseError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(ParseError::Spec);
    }

    if spec.starts_with('{') {
        return parse_json(spec);
    }

    let mut filter = Filter::default();
    for token in spec.split(',') {
        parse_token(&mut filter, token)?;
    }

    Ok(filter)
}
