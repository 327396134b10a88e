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


use lazy_static::lazy_static;

use std::sync::Arc;

use crate::recorder::Recorder;
use crate::store::LogStore;

lazy_static! {
    static ref RECORDER: Recorder = Recorder::new(Arc::new(LogStore::new()));
}

/// The process-wide recorder used by the logging macros.
#[inline]
pub fn recorder() -> &'static Recorder {
    &RECORDER
}

/// The store of the process-wide recorder.
#[inline]
pub fn store() -> &'static Arc<LogStore> {
    RECORDER.store()
}
