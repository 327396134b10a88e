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


/// Sets the mirror filter of the process-wide recorder.
///
/// Takes either a parsed [Filter](spec/struct.Filter.html) or a
/// filter [spec](spec/index.html) string wrapped into `spec(...)`.
///
/// Returns `Result<(), ParseError>`.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
/// use logpane as lp;
///
/// use std::sync::{Arc, Mutex};
///
/// fn main() {
///     let out = Arc::new(Mutex::new(Vec::new()));
///     {
///         let out = out.clone();
///         lp_register_handler!(Box::new(move |record, _| {
///             out.lock().unwrap().push(record.body().to_string());
///         }));
///     }
///
///     lp_set_filter!(spec("error,net=debug")).unwrap();
///     debug!("hidden");
///     debug!(lp::Source::new("net", "") => "shown");
///     error!("shown too");
///     assert_eq!(*out.lock().unwrap(), vec!["shown", "shown too"]);
///
///     lp_set_filter!(lp::spec::Filter::default()).unwrap();
///     debug!("visible again");
///     assert_eq!(out.lock().unwrap().len(), 3);
///
///     // The store always gets everything.
///     assert_eq!(lp::store().len(), 4);
/// }
/// ```
#[macro_export]
macro_rules! lp_set_filter {
    (spec($spec:expr)) => {{
        match $crate::spec::parse($spec) {
            Ok(filter) => {
                $crate::recorder().set_filter(filter);
                Ok(())
            },
            Err(err) => Err(err),
        }
    }};

    ($filter:expr) => {{
        $crate::recorder().set_filter($filter);
        let ok: Result<(), $crate::spec::ParseError> = Ok(());
        ok
    }};
}

/// Registers a mirror handler on the process-wide recorder.
///
/// The handler takes a record and its formatted line and pushes it
/// into a custom sink.
///
/// See the definition of the [`Handler`](handlers/type.Handler.html) type for the details.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
/// use logpane as lp;
///
/// use std::sync::{Arc, Mutex};
///
/// fn main() {
///     lp_register_handler!(lp::handlers::stdout::handler());
///
///     let out = Arc::new(Mutex::new(String::new()));
///     {
///         let out = out.clone();
///         lp_register_handler!(Box::new(move |_, formatted| {
///             out.lock().unwrap().push_str(formatted);
///         }));
///     }
///     error!("foo");
///     assert!(out.lock().unwrap().ends_with("|ERROR| Default foo\n"));
/// }
/// ```
#[macro_export]
macro_rules! lp_register_handler {
    ($handler:expr) => {{
        $crate::recorder().register_handler($handler);
    }};
}

/// Sets the formatter of the mirrored lines on the process-wide recorder.
///
/// A [default](formatters/default/fn.formatter.html) formatter is used if not set explicitly.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
/// use logpane as lp;
///
/// use std::sync::{Arc, Mutex};
///
/// fn main() {
///     lp_set_formatter!(Box::new(|record: &lp::Record| {
///         format!("{}:{}", record.severity(), record.body())
///     }));
///     let out = Arc::new(Mutex::new(String::new()));
///     {
///         let out = out.clone();
///         lp_register_handler!(Box::new(move |_, formatted| {
///             out.lock().unwrap().push_str(formatted);
///         }));
///     }
///     error!("foo");
///     assert_eq!(*out.lock().unwrap(), "ERROR:foo");
/// }
/// ```
#[macro_export]
macro_rules! lp_set_formatter {
    ($formatter:expr) => {{
        $crate::recorder().set_formatter($formatter);
    }};
}
