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


#![warn(missing_docs)]

//! # Logpane - in-process log recorder for a live viewer panel
//!
//! `logpane` keeps the log records of the running application in memory so
//! that a viewer panel embedded into the application can show them live,
//! without any external log collection service.
//!
//! Every logging call produces exactly one immutable [Record](record/struct.Record.html)
//! which is appended to a [LogStore](store/struct.LogStore.html) before the call returns.
//! The store keeps the records in call order, can be cleared and notifies its
//! observers about every change.
//!
//! Logging never fails: whatever is passed is turned into text and
//! whatever goes wrong while mirroring the record to external
//! [handlers](handlers/index.html) is swallowed.
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! logpane = "0.1"
//! ```
//!
//! # Example
//!
//! ```rust
//! #[macro_use]
//! extern crate logpane;
//! use logpane as lp;
//!
//! fn main() {
//!     let changes = lp::store().watch();
//!
//!     debug!("start");
//!     error!(lp::Source::new("net", "tcp") => ["failure", 42]);
//!
//!     let snapshot = lp::store().snapshot();
//!     assert_eq!(snapshot.len(), 2);
//!     assert_eq!(snapshot[1].body(), "failure, 42");
//!     assert_eq!(changes.try_iter().count(), 2);
//!
//!     lp::store().clear();
//!     assert!(lp::store().snapshot().is_empty());
//!     assert_eq!(changes.try_recv(), Ok(lp::Change::Cleared));
//! }
//! ```
//!
//! The process-wide store behind the macros is only a convenience,
//! any number of isolated [Recorder](recorder/struct.Recorder.html)s
//! and stores may be created explicitly.
//!
//! Mirroring may be done in a dedicated thread, see [init](fn.init.html).

#[doc(hidden)]
#[macro_use]
pub mod helpers;

#[macro_use]
mod macros;

/// Definition of the severities.
pub mod levels;
#[doc(inline)]
pub use crate::levels::Severity;

/// Origin of a record.
pub mod source;
#[doc(inline)]
pub use crate::source::Source;

/// Definition of the log record.
pub mod record;
#[doc(inline)]
pub use crate::record::{Body, Dbg, Disp, Loggable, Record, RecordId};

/// The record store.
pub mod store;
#[doc(inline)]
pub use crate::store::{Change, LogStore, Observer, Snapshot, SubscriptionId};

/// The logging entry point.
pub mod recorder;
#[doc(inline)]
pub use crate::recorder::Recorder;

/// Recorder configuration.
pub mod config;
#[doc(inline)]
pub use crate::config::Config;

pub mod spec;

/// Collection of mirror handlers.
pub mod handlers;

/// Collection of record formatters.
pub mod formatters;

pub mod view;

mod global;
pub use crate::global::{recorder, store};

/// Configures the process-wide recorder.
///
/// Environment overrides are applied on top of the configuration,
/// see [Config::with_env](config/struct.Config.html#method.with_env).
pub fn init(config: &Config) -> Result<(), spec::ParseError> {
    recorder().configure(&config.with_env())
}

/// Waits until the process-wide recorder has mirrored every record.
///
/// Does nothing unless the mirror thread is activated.
pub fn sync() {
    recorder().sync();
}
