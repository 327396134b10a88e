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


use chrono::{DateTime, Utc};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::levels::Severity;
use crate::source::Source;

/// Message body of a record and the stringification contract.
pub mod body;
#[doc(inline)]
pub use self::body::{Body, Dbg, Disp, Loggable};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a record.
///
/// Unique within the process, carries no meaning beyond identity.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        RecordId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value of the identifier.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logged event.
///
/// A record never changes once it's stored.
#[derive(PartialEq, Clone, Debug)]
pub struct Record {
    id: RecordId,
    pub(crate) timestamp: DateTime<Utc>,
    severity: Severity,
    source: Source,
    body: String,
}

impl Record {
    /// Creates a record stamped with the current time.
    pub fn new<B>(severity: Severity, source: Source, body: B) -> Self
        where B: Into<String>
    {
        Record {
            id: RecordId::next(),
            timestamp: Utc::now(),
            severity: severity,
            source: source,
            body: body.into(),
        }
    }

    /// Identity of the record.
    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Creation time.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Severity tag.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Logical origin.
    #[inline]
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Rendered message text.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_record_fields() {
        let before = Utc::now();
        let record = Record::new(Severity::ERROR, Source::new("net", "tcp"), "boom");
        assert_eq!(record.severity(), Severity::ERROR);
        assert_eq!(record.source().subsystem(), "net");
        assert_eq!(record.source().category(), "tcp");
        assert_eq!(record.body(), "boom");
        assert!(record.timestamp() >= before);
    }

    #[test]
    fn test_record_unique_ids() {
        let mut threads = Vec::new();
        for _ in 0..8 {
            threads.push(thread::spawn(|| {
                (0..100)
                    .map(|_| Record::new(Severity::DEBUG, Source::default(), "").id())
                    .collect::<Vec<_>>()
            }));
        }
        let mut ids = HashSet::new();
        for th in threads {
            for id in th.join().unwrap() {
                assert!(ids.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(ids.len(), 800);
    }
}
