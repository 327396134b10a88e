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


use chrono::Local;

use crate::record::Record;

/// Layout of the record timestamp, microsecond precision.
pub const TIME_FORMAT: &str = "%H:%M:%S%.6f";

/// Formats the timestamp of the record in local time.
pub fn time(record: &Record) -> String {
    record.timestamp().with_timezone(&Local).format(TIME_FORMAT).to_string()
}

/// The default formatter.
///
/// Produces `HH:MM:SS.ffffff |SEVERITY| source body` terminated by a new line.
pub fn formatter(record: &Record) -> String {
    format!(
        "{} |{}| {} {}\n",
        time(record),
        record.severity(),
        record.source(),
        record.body(),
    )
}
