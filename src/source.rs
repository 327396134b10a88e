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

/// Subsystem used when the caller does not identify itself.
pub const DEFAULT_SUBSYSTEM: &str = "Default";

/// Logical origin of a record: a `(subsystem, category)` pair.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct Source {
    subsystem: String,
    category: String,
}

impl Source {
    /// Creates a source from a subsystem and a category.
    pub fn new<S, C>(subsystem: S, category: C) -> Self
        where S: Into<String>, C: Into<String>
    {
        Source {
            subsystem: subsystem.into(),
            category: category.into(),
        }
    }

    /// Subsystem name.
    #[inline]
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Category name, possibly empty.
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::new(DEFAULT_SUBSYSTEM, "")
    }
}

impl<S, C> From<(S, C)> for Source
    where S: Into<String>, C: Into<String>
{
    fn from((subsystem, category): (S, C)) -> Self {
        Source::new(subsystem, category)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.category.is_empty() {
            write!(f, "{}", self.subsystem)
        } else {
            write!(f, "{}:{}", self.subsystem, self.category)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_default() {
        let source = Source::default();
        assert_eq!(source.subsystem(), "Default");
        assert_eq!(source.category(), "");
        assert_eq!(source.to_string(), "Default");
    }

    #[test]
    fn test_source_display() {
        let source: Source = ("net", "http").into();
        assert_eq!(source, Source::new("net".to_string(), "http"));
        assert_eq!(source.to_string(), "net:http");
    }
}
