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


//! Glue for a viewer panel.
//!
//! A viewer subscribes to the [store](../store/struct.LogStore.html),
//! re-snapshots on every change and renders the rows returned by [rows](fn.rows.html).

use crate::formatters::default::time;
use crate::levels::Severity;
use crate::record::{Record, RecordId};
use crate::store::Snapshot;

/// Visual indicator of a record's severity.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Marker {
    /// Debug records.
    Neutral,
    /// Error records.
    Alert,
    /// Anything else.
    Warning,
}

impl From<Severity> for Marker {
    fn from(severity: Severity) -> Marker {
        match severity {
            Severity::DEBUG => Marker::Neutral,
            Severity::ERROR => Marker::Alert,
            Severity::DEFAULT => Marker::Warning,
        }
    }
}

/// One rendered line of the viewer.
#[derive(PartialEq, Clone, Debug)]
pub struct Row {
    /// Stable identity of the row.
    pub id: RecordId,
    /// Severity indicator.
    pub marker: Marker,
    /// `HH:MM:SS.ffffff`, local time.
    pub time: String,
    /// `subsystem:category`.
    pub source: String,
    /// Message text.
    pub body: String,
}

impl<'a> From<&'a Record> for Row {
    fn from(record: &'a Record) -> Row {
        Row {
            id: record.id(),
            marker: record.severity().into(),
            time: time(record),
            source: record.source().to_string(),
            body: record.body().to_string(),
        }
    }
}

/// Rows of the snapshot, most recent first.
pub fn rows(snapshot: &Snapshot) -> Vec<Row> {
    snapshot.latest_first().map(|record| Row::from(&**record)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::source::Source;
    use crate::store::LogStore;

    #[test]
    fn test_markers() {
        assert_eq!(Marker::from(Severity::DEBUG), Marker::Neutral);
        assert_eq!(Marker::from(Severity::ERROR), Marker::Alert);
        assert_eq!(Marker::from(Severity::DEFAULT), Marker::Warning);
    }

    #[test]
    fn test_rows_latest_first() {
        let store = LogStore::new();
        let a = store.append(Record::new(Severity::DEBUG, Source::default(), "start"));
        let b = store.append(Record::new(Severity::ERROR, Source::new("net", "tcp"), "failure"));

        let rows = rows(&store.snapshot());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, b.id());
        assert_eq!(rows[0].marker, Marker::Alert);
        assert_eq!(rows[0].source, "net:tcp");
        assert_eq!(rows[0].body, "failure");
        assert_eq!(rows[1].id, a.id());
        assert_eq!(rows[1].marker, Marker::Neutral);
        assert_eq!(rows[1].time.len(), "00:00:00.000000".len());

        store.clear();
        assert!(super::rows(&store.snapshot()).is_empty());
    }
}
