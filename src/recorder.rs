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


use crossbeam::channel::{self, Sender};
use parking_lot::RwLock;

use std::io;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::formatters::{self, Formatter};
use crate::handlers::{stderr, Handler};
use crate::levels::Severity;
use crate::record::{Body, Record};
use crate::source::Source;
use crate::spec::{self, Filter, ParseError};
use crate::store::LogStore;

type SharedHandler = Arc<dyn Fn(&Record, &str) + Send + Sync>;
type SharedFormatter = Arc<dyn Fn(&Record) -> String + Send + Sync>;

enum Job {
    Record(Arc<Record>),
    Sync(Sender<()>),
}

struct Mirror {
    handlers: RwLock<Vec<SharedHandler>>,
    formatter: RwLock<SharedFormatter>,
    filter: RwLock<Filter>,
    stderr: AtomicBool,
}

impl Mirror {
    fn new() -> Self {
        let formatter: Formatter = Box::new(formatters::default::formatter);
        Mirror {
            handlers: RwLock::new(Vec::new()),
            formatter: RwLock::new(Arc::from(formatter)),
            filter: RwLock::new(Filter::default()),
            stderr: AtomicBool::new(false),
        }
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.stderr.load(Ordering::Relaxed) || !self.handlers.read().is_empty()
    }

    fn emit(&self, record: &Record) {
        if !self.filter.read().allows(record) {
            return;
        }
        // No lock is held while handlers run, they may reconfigure the recorder.
        let handlers = self.handlers.read().clone();
        let stderr = self.stderr.load(Ordering::Relaxed);
        if handlers.is_empty() && !stderr {
            return;
        }

        let formatter = self.formatter.read().clone();
        let formatted = match panic::catch_unwind(AssertUnwindSafe(|| formatter(record))) {
            Ok(formatted) => formatted,
            Err(_) => return,
        };
        if stderr {
            stderr::emit(&formatted);
        }
        for handler in handlers.iter() {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| handler(record, &formatted)));
        }
    }
}

struct Worker {
    tx: Sender<Job>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(mirror: Arc<Mirror>) -> io::Result<Self> {
        let (tx, rx) = channel::unbounded();
        let handle = thread::Builder::new()
            .name("logpane-mirror".to_string())
            .spawn(move || {
                for job in rx.iter() {
                    match job {
                        Job::Record(record) => mirror.emit(&record),
                        Job::Sync(done) => {
                            let _ = done.send(());
                        },
                    }
                }
            })?;
        Ok(Worker {
            tx: tx,
            handle: handle,
        })
    }

    #[inline]
    fn is_current(&self) -> bool {
        thread::current().id() == self.handle.thread().id()
    }

    // Lets the thread drain the queue and waits for it.
    fn stop(self) {
        let current = self.is_current();
        drop(self.tx);
        if !current {
            let _ = self.handle.join();
        }
    }
}

enum Mode {
    Inline,
    Thread(Worker),
}

/// The entry point application code logs through.
///
/// Every call appends exactly one record to the store before returning.
/// Records may additionally be mirrored to external
/// [handlers](../handlers/index.html), either from the calling thread or
/// from a dedicated one.
/// Nothing that happens while mirroring reaches the caller.
///
/// # Example
///
/// ```rust
/// use logpane::{LogStore, Loggable, Recorder, Severity, Source};
/// use std::sync::Arc;
///
/// let recorder = Recorder::new(Arc::new(LogStore::new()));
/// recorder.debug(None, "start");
/// let values: [&dyn Loggable; 3] = [&"a", &1, &true];
/// recorder.error(Some(&Source::new("net", "tcp")), &values[..]);
///
/// let snapshot = recorder.store().snapshot();
/// assert_eq!(snapshot[0].body(), "start");
/// assert_eq!(snapshot[1].body(), "a, 1, true");
/// assert_eq!(snapshot[1].severity(), Severity::ERROR);
/// ```
pub struct Recorder {
    store: Arc<LogStore>,
    mirror: Arc<Mirror>,
    mode: RwLock<Mode>,
}

impl Recorder {
    /// Creates a recorder that logs into the store and mirrors nowhere.
    pub fn new(store: Arc<LogStore>) -> Self {
        Recorder {
            store: store,
            mirror: Arc::new(Mirror::new()),
            mode: RwLock::new(Mode::Inline),
        }
    }

    /// Creates a configured recorder.
    pub fn with_config(store: Arc<LogStore>, config: &Config) -> Result<Self, ParseError> {
        let recorder = Recorder::new(store);
        recorder.configure(config)?;
        Ok(recorder)
    }

    /// The store the recorder appends to.
    #[inline]
    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Records a message.
    ///
    /// The [default](../source/struct.Source.html#impl-Default) source is used if none is given.
    pub fn log<'a, B>(&self, severity: Severity, source: Option<&Source>, body: B)
        where B: Into<Body<'a>>
    {
        let body = body.into().render();
        let source = source.cloned().unwrap_or_default();
        let record = self.store.append(Record::new(severity, source, body));
        if self.mirror.is_active() {
            self.mirror(record);
        }
    }

    /// Records a message with the `DEBUG` severity.
    #[inline]
    pub fn debug<'a, B>(&self, source: Option<&Source>, body: B)
        where B: Into<Body<'a>>
    {
        self.log(Severity::DEBUG, source, body);
    }

    /// Records a message with the `DEFAULT` severity.
    #[inline]
    pub fn info<'a, B>(&self, source: Option<&Source>, body: B)
        where B: Into<Body<'a>>
    {
        self.log(Severity::DEFAULT, source, body);
    }

    /// Records a message with the `ERROR` severity.
    #[inline]
    pub fn error<'a, B>(&self, source: Option<&Source>, body: B)
        where B: Into<Body<'a>>
    {
        self.log(Severity::ERROR, source, body);
    }

    fn mirror(&self, record: Arc<Record>) {
        let record = match *self.mode.read() {
            Mode::Thread(ref worker) => match worker.tx.send(Job::Record(record)) {
                Ok(()) => return,
                Err(err) => match err.into_inner() {
                    Job::Record(record) => record,
                    Job::Sync(_) => return,
                },
            },
            Mode::Inline => record,
        };
        self.mirror.emit(&record);
    }

    /// Registers a mirror handler.
    pub fn register_handler(&self, handler: Handler) {
        self.mirror.handlers.write().push(Arc::from(handler));
    }

    /// Drops all mirror handlers.
    pub fn reset_handlers(&self) {
        self.mirror.handlers.write().clear();
    }

    /// Sets the formatter of the lines passed to the mirror handlers.
    pub fn set_formatter(&self, formatter: Formatter) {
        *self.mirror.formatter.write() = Arc::from(formatter);
    }

    /// Sets the mirror filter.
    pub fn set_filter(&self, filter: Filter) {
        *self.mirror.filter.write() = filter;
    }

    /// Applies the configuration.
    ///
    /// The configuration is taken as is, environment overrides are
    /// applied by [init](../fn.init.html) only.
    ///
    /// If the mirror thread can't be started mirroring stays inline.
    pub fn configure(&self, config: &Config) -> Result<(), ParseError> {
        let filter = match config.filter {
            Some(ref filter) => spec::parse(filter)?,
            None => Filter::default(),
        };
        self.set_filter(filter);
        self.mirror.stderr.store(config.stderr, Ordering::Relaxed);

        let old = {
            let mut mode = self.mode.write();
            let threaded = match *mode {
                Mode::Thread(_) => true,
                Mode::Inline => false,
            };
            match (threaded, config.thread) {
                (true, true) | (false, false) => None,
                (false, true) => match Worker::spawn(self.mirror.clone()) {
                    Ok(worker) => Some(mem::replace(&mut *mode, Mode::Thread(worker))),
                    Err(_) => None,
                },
                (true, false) => Some(mem::replace(&mut *mode, Mode::Inline)),
            }
        };
        if let Some(Mode::Thread(worker)) = old {
            worker.stop();
        }

        Ok(())
    }

    /// Checks whether mirroring runs in a dedicated thread.
    pub fn is_threaded(&self) -> bool {
        match *self.mode.read() {
            Mode::Thread(_) => true,
            Mode::Inline => false,
        }
    }

    /// Waits until every record logged so far is mirrored.
    ///
    /// Returns immediately when mirroring is inline or when called
    /// from a mirror handler.
    pub fn sync(&self) {
        let done = match *self.mode.read() {
            Mode::Thread(ref worker) if !worker.is_current() => {
                let (tx, rx) = channel::bounded(1);
                if worker.tx.send(Job::Sync(tx)).is_err() {
                    return;
                }
                rx
            },
            _ => return,
        };
        let _ = done.recv();
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Mode::Thread(worker) = mem::replace(self.mode.get_mut(), Mode::Inline) {
            worker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::record::Loggable;
    use crate::source::DEFAULT_SUBSYSTEM;

    fn recorder() -> Recorder {
        Recorder::new(Arc::new(LogStore::new()))
    }

    fn capture(recorder: &Recorder) -> Arc<Mutex<Vec<String>>> {
        let out = Arc::new(Mutex::new(Vec::new()));
        {
            let out = out.clone();
            recorder.register_handler(Box::new(move |_, formatted| {
                out.lock().unwrap().push(formatted.to_string());
            }));
        }
        out
    }

    fn plain(record: &Record) -> String {
        format!("{}:{}", record.severity(), record.body())
    }

    #[test]
    fn test_recorder_default_source() {
        let recorder = recorder();
        recorder.debug(None, "x");
        let snapshot = recorder.store().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(*snapshot[0].source(), Source::default());
        assert_eq!(snapshot[0].source().subsystem(), DEFAULT_SUBSYSTEM);
        assert_eq!(snapshot[0].source().category(), "");
    }

    #[test]
    fn test_recorder_severities() {
        let recorder = recorder();
        let source = Source::new("net", "tcp");
        recorder.debug(Some(&source), "a");
        recorder.info(None, "b");
        recorder.error(Some(&source), "c");

        let snapshot = recorder.store().snapshot();
        let got: Vec<_> = snapshot.iter()
            .map(|r| (r.severity(), r.source().to_string(), r.body().to_string()))
            .collect();
        assert_eq!(got, vec![
            (Severity::DEBUG, "net:tcp".to_string(), "a".to_string()),
            (Severity::DEFAULT, "Default".to_string(), "b".to_string()),
            (Severity::ERROR, "net:tcp".to_string(), "c".to_string()),
        ]);
    }

    #[test]
    fn test_recorder_values() {
        let recorder = recorder();
        let values: [&dyn Loggable; 4] = [&"a", &1, &true, &vec![1, 2]];
        recorder.debug(None, &values[..]);
        recorder.debug(None, format_args!("{}+{}", 1, 2));
        let owned = String::from("owned");
        recorder.debug(None, &owned);

        let snapshot = recorder.store().snapshot();
        assert_eq!(snapshot[0].body(), "a, 1, true, [1, 2]");
        assert_eq!(snapshot[1].body(), "1+2");
        assert_eq!(snapshot[2].body(), "owned");
    }

    #[test]
    fn test_recorder_threads() {
        let thqty = 32;
        let recorder = Arc::new(recorder());
        let mut threads = Vec::new();
        for idx in 0..thqty {
            let recorder = recorder.clone();
            threads.push(thread::spawn(move || {
                thread::yield_now();
                recorder.error(None, format!("{}", idx));
            }));
        }
        for th in threads {
            th.join().unwrap();
        }
        let sum: usize = recorder.store().snapshot().iter()
            .map(|r| r.body().parse::<usize>().unwrap())
            .sum();
        assert_eq!(sum, (0..thqty).sum::<usize>());
    }

    #[test]
    fn test_recorder_mirror() {
        let recorder = recorder();
        let out = capture(&recorder);
        recorder.set_formatter(Box::new(plain));

        recorder.debug(None, "a");
        recorder.error(None, "b");
        assert_eq!(*out.lock().unwrap(), vec!["DEBUG:a", "ERROR:b"]);
    }

    #[test]
    fn test_recorder_mirror_default_format() {
        let recorder = recorder();
        let out = capture(&recorder);
        recorder.error(Some(&Source::new("db", "")), "gone");
        let out = out.lock().unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].ends_with(" |ERROR| db gone\n"));
    }

    #[test]
    fn test_recorder_mirror_filter() {
        let recorder = recorder();
        let out = capture(&recorder);
        recorder.set_formatter(Box::new(plain));
        recorder.set_filter(spec::parse("error,net=debug").unwrap());

        recorder.debug(None, "dropped");
        recorder.debug(Some(&Source::new("net", "")), "kept");
        recorder.error(None, "kept too");

        assert_eq!(*out.lock().unwrap(), vec!["DEBUG:kept", "ERROR:kept too"]);
        // The store gets everything regardless of the filter.
        assert_eq!(recorder.store().len(), 3);
    }

    #[test]
    fn test_recorder_mirror_failures() {
        let recorder = recorder();
        recorder.register_handler(Box::new(|_: &Record, _: &str| panic!("sink is down")));
        let out = capture(&recorder);
        recorder.set_formatter(Box::new(plain));

        recorder.debug(None, "a");
        assert_eq!(*out.lock().unwrap(), vec!["DEBUG:a"]);

        recorder.set_formatter(Box::new(|_: &Record| -> String { panic!("bad formatter") }));
        recorder.debug(None, "b");
        assert_eq!(out.lock().unwrap().len(), 1);
        assert_eq!(recorder.store().len(), 2);

        recorder.reset_handlers();
        recorder.debug(None, "c");
        assert_eq!(recorder.store().len(), 3);
    }

    #[test]
    fn test_recorder_handler_reconfigures() {
        let recorder = Arc::new(recorder());
        let out = capture(&recorder);
        {
            let weak = Arc::downgrade(&recorder);
            recorder.register_handler(Box::new(move |_: &Record, _: &str| {
                if let Some(recorder) = weak.upgrade() {
                    recorder.reset_handlers();
                    recorder.set_formatter(Box::new(plain));
                }
            }));
        }

        recorder.debug(None, "a");
        recorder.debug(None, "b");

        // Both handlers saw the first record, none is left for the second one.
        assert_eq!(out.lock().unwrap().len(), 1);
        assert_eq!(recorder.store().len(), 2);
    }

    #[test]
    fn test_recorder_thread() {
        let recorder = recorder();
        recorder.configure(&Config { thread: true, ..Default::default() }).unwrap();
        assert!(recorder.is_threaded());
        let out = capture(&recorder);
        recorder.set_formatter(Box::new(plain));

        for idx in 0..100 {
            recorder.debug(None, format!("{}", idx));
        }
        // The store is up to date even before the mirror catches up.
        assert_eq!(recorder.store().len(), 100);

        recorder.sync();
        let expected: Vec<_> = (0..100).map(|idx| format!("DEBUG:{}", idx)).collect();
        assert_eq!(*out.lock().unwrap(), expected);

        recorder.configure(&Config::default()).unwrap();
        assert!(!recorder.is_threaded());
        recorder.debug(None, "inline");
        assert_eq!(out.lock().unwrap().last().unwrap(), "DEBUG:inline");
    }

    #[test]
    fn test_recorder_thread_drop_flushes() {
        let out;
        {
            let recorder = Recorder::with_config(Arc::new(LogStore::new()),
                                                 &Config { thread: true, ..Default::default() }).unwrap();
            out = capture(&recorder);
            recorder.debug(None, "a");
            recorder.debug(None, "b");
        }
        assert_eq!(out.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_recorder_sync_inline() {
        let recorder = recorder();
        // Nothing to wait for.
        recorder.sync();
        assert!(!recorder.is_threaded());
    }

    #[test]
    fn test_recorder_configure_invalid() {
        let recorder = recorder();
        let config = Config { filter: Some("net=loud".to_string()), ..Default::default() };
        assert_eq!(recorder.configure(&config), Err(ParseError::Severity));
        assert!(Recorder::with_config(Arc::new(LogStore::new()), &config).is_err());
    }
}
