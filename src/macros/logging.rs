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


/// The main log entry.
///
/// Renders the message, appends exactly one record to the
/// process-wide [store](fn.store.html) and mirrors it if mirroring is set up.
///
/// The message is either a format string with its arguments or a list of
/// [values](record/body/trait.Loggable.html) in square brackets which are
/// joined with `", "`.
///
/// An optional [source](source/struct.Source.html) goes first, followed by `=>`.
/// The [default](source/struct.Source.html#impl-Default) source is used otherwise.
///
/// # Example
///
/// ```rust
/// #[macro_use]
/// extern crate logpane;
/// use logpane as lp;
///
/// fn main() {
///     let net = lp::Source::new("net", "tcp");
///
///     log!(lp::Severity::DEBUG, "{} is saying hello", "logpane");
///     log!(lp::Severity::ERROR, net => "connection reset");
///     log!(lp::Severity::DEFAULT, ["a", 1, true]);
///     log!(lp::Severity::DEFAULT, net => [1.5, vec![1, 2]]);
///
///     let snapshot = lp::store().snapshot();
///     let bodies: Vec<_> = snapshot.iter().map(|r| r.body()).collect();
///     assert_eq!(bodies, vec!["logpane is saying hello", "connection reset",
///                             "a, 1, true", "1.5, [1, 2]"]);
///     assert_eq!(snapshot[1].source().to_string(), "net:tcp");
///     assert_eq!(*snapshot[2].source(), lp::Source::default());
/// }
/// ```
#[macro_export]
macro_rules! log {
    ($severity:expr, $source:expr => [$($value:expr),* $(,)?]) => {{
        $crate::recorder().log(
            $severity,
            Some(&$source),
            $crate::Body::Values(&[$(&$value as &dyn $crate::Loggable),*]),
        );
    }};

    ($severity:expr, $source:expr => $($arg:tt)+) => {{
        $crate::recorder().log($severity, Some(&$source), format_args!($($arg)+));
    }};

    ($severity:expr, [$($value:expr),* $(,)?]) => {{
        $crate::recorder().log(
            $severity,
            None,
            $crate::Body::Values(&[$(&$value as &dyn $crate::Loggable),*]),
        );
    }};

    ($severity:expr, $($arg:tt)+) => {{
        $crate::recorder().log($severity, None, format_args!($($arg)+));
    }};
}

/// Produces a record with the `DEBUG` severity.
///
/// See the [log](macro.log.html) macro for the details.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::DEBUG, $($arg)+)
    };
}

/// Produces a record with the `DEFAULT` severity.
///
/// See the [log](macro.log.html) macro for the details.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::DEFAULT, $($arg)+)
    };
}

/// Produces a record with the `ERROR` severity.
///
/// See the [log](macro.log.html) macro for the details.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::ERROR, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;

    use std::sync::{Arc, Mutex};
    use std::thread;

    use crate::{Dbg, Severity, Source};

    lazy_static! {
        static ref GLOBAL: Mutex<()> = Mutex::new(());
    }

    // NOTE: the tests share the process-wide store and must not run in //
    fn run_test<T: FnOnce()>(test: T) {
        let _lock = GLOBAL.lock().unwrap_or_else(|err| err.into_inner());
        crate::store().clear();
        test();
    }

    fn bodies() -> Vec<String> {
        crate::store().snapshot().iter().map(|r| r.body().to_string()).collect()
    }

    #[test]
    fn test_macros_severity() {
        run_test(|| {
            debug!("d");
            info!("i");
            error!("e");
            let severities: Vec<_> = crate::store().snapshot().iter().map(|r| r.severity()).collect();
            assert_eq!(severities, vec![Severity::DEBUG, Severity::DEFAULT, Severity::ERROR]);
        });
    }

    #[test]
    fn test_macros_values() {
        run_test(|| {
            #[derive(Debug)]
            struct Point(i32, i32);

            debug!(["a", 1, true]);
            debug!([]);
            error!(["x", Dbg(Point(1, 2)), Some(3), vec!["p", "q"],]);
            assert_eq!(bodies(), vec!["a, 1, true", "", "x, Point(1, 2), 3, [p, q]"]);
        });
    }

    #[test]
    fn test_macros_source() {
        run_test(|| {
            let db = Source::new("db", "pool");
            error!(db => "exhausted after {} tries", 3);
            debug!(db => ["size", 0]);
            info!(source!("ui") => "redraw");
            let snapshot = crate::store().snapshot();
            assert_eq!(snapshot[0].source(), &db);
            assert_eq!(snapshot[0].body(), "exhausted after 3 tries");
            assert_eq!(snapshot[1].body(), "size, 0");
            assert_eq!(snapshot[2].source().subsystem(), "ui");
            assert_eq!(snapshot[2].source().category(), module_path!());
        });
    }

    #[test]
    fn test_macros_values_captured_eagerly() {
        run_test(|| {
            let mut counter = 1;
            debug!(["counter", counter]);
            counter += 1;
            debug!("counter {}", counter);
            assert_eq!(bodies(), vec!["counter, 1", "counter 2"]);
        });
    }

    #[test]
    fn test_macros_threads() {
        run_test(|| {
            let thqty = 50;
            let out = Arc::new(Mutex::new(0));
            let mut threads = Vec::new();
            for idx in 0..thqty {
                threads.push(thread::spawn(move || {
                    thread::yield_now();
                    if idx % 2 == 0 {
                        error!("{}", idx);
                    } else {
                        debug!([idx]);
                    }
                }));
            }
            for th in threads {
                th.join().unwrap();
            }
            let snapshot = crate::store().snapshot();
            assert_eq!(snapshot.len(), thqty);
            for record in snapshot.iter() {
                let idx: usize = record.body().parse().unwrap();
                let expected = if idx % 2 == 0 { Severity::ERROR } else { Severity::DEBUG };
                assert_eq!(record.severity(), expected);
                *out.lock().unwrap() += idx;
            }
            assert_eq!(*out.lock().unwrap(), (0..thqty).sum::<usize>());
        });
    }
}
