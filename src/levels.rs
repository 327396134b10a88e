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


use std::fmt;
use std::str::FromStr;

/// Severity tag of a log record.
///
/// The set is closed: `DEBUG < DEFAULT < ERROR`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum Severity {
    /// Developer chatter.
    DEBUG,
    /// Anything that is neither debug nor error.
    DEFAULT,
    /// Something went wrong.
    ERROR,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::DEFAULT
    }
}

/// All severities in ascending order.
pub const SEVERITIES: [Severity; 3] = [
    Severity::DEBUG,
    Severity::DEFAULT,
    Severity::ERROR,
];

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::DEBUG),
            "DEFAULT" | "INFO" => Ok(Severity::DEFAULT),
            "ERROR" => Ok(Severity::ERROR),
            _ => Err(format!("Unsupported severity {}", s)),
        }
    }
}

impl fmt::Display for Severity {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Severity::DEBUG => write!(f, "DEBUG"),
            Severity::DEFAULT => write!(f, "DEFAULT"),
            Severity::ERROR => write!(f, "ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::DEBUG < Severity::DEFAULT);
        assert!(Severity::DEFAULT < Severity::ERROR);
        let mut sorted = SEVERITIES.to_vec();
        sorted.sort();
        assert_eq!(sorted, SEVERITIES.to_vec());
    }

    #[test]
    fn test_severity_parse() {
        for s in SEVERITIES.iter() {
            assert_eq!(Ok(*s), s.to_string().parse());
            assert_eq!(Ok(*s), s.to_string().to_lowercase().parse());
        }
        assert_eq!(Ok(Severity::DEFAULT), "info".parse());
        assert_eq!(Ok(Severity::ERROR), " Error ".parse());
        assert_eq!(Err("Unsupported severity warn".to_string()), "warn".parse::<Severity>());
    }

    #[test]
    fn test_severity_default() {
        assert_eq!(Severity::default(), Severity::DEFAULT);
    }
}
