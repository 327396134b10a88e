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


use crossbeam::channel::{self, Receiver};
use parking_lot::{Mutex, RwLock};

use std::cell::RefCell;
use std::cmp;
use std::collections::VecDeque;
use std::iter::Rev;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::slice;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::handlers::stderr;
use crate::record::Record;

/// A mutation of the store as seen by observers.
#[derive(PartialEq, Clone, Debug)]
pub enum Change {
    /// The record became the last element of the sequence.
    Appended(Arc<Record>),
    /// The sequence became empty.
    Cleared,
}

/// Type of the store observer function.
///
/// Called once per mutation, in mutation order, never under the store lock.
/// An observer may log or take a snapshot.
pub type Observer = Box<dyn Fn(&Change) + Send + Sync>;

// Returns `false` once the observer wants no more changes.
type Notify = dyn Fn(&Change) -> bool + Send + Sync;

/// Handle of a registered observer.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    since: u64,
    observer: Arc<Notify>,
}

struct Records {
    records: Vec<Arc<Record>>,
    seq: u64,
}

thread_local! {
    // Stores this thread is dispatching for, with the last change to deliver.
    static DISPATCHING: RefCell<Vec<(usize, u64)>> = RefCell::new(Vec::new());
}

/// Ordered, append-only (except for full clears) collection of records.
///
/// All mutations go through a single mutex which is held only while the
/// sequence itself changes.
/// Change notifications are dispatched after the mutex is released, each
/// caller delivers its own change and the ones queued before it.
pub struct LogStore {
    records: Mutex<Records>,
    observers: RwLock<Vec<Subscription>>,
    next_subscription: AtomicU64,
    pending: Mutex<VecDeque<(u64, Change)>>,
    dispatch: Mutex<()>,
}

impl LogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        LogStore {
            records: Mutex::new(Records {
                records: Vec::new(),
                seq: 0,
            }),
            observers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            pending: Mutex::new(VecDeque::new()),
            dispatch: Mutex::new(()),
        }
    }

    /// Appends a record to the end of the sequence.
    ///
    /// If the record is older than the current last one its timestamp is
    /// raised to match so that timestamps never decrease in append order.
    ///
    /// Returns the record as it was stored.
    pub fn append(&self, mut record: Record) -> Arc<Record> {
        let (record, seq) = {
            let mut state = self.records.lock();
            if let Some(last) = state.records.last() {
                if record.timestamp < last.timestamp {
                    record.timestamp = last.timestamp;
                }
            }
            let record = Arc::new(record);
            state.records.push(record.clone());
            let seq = self.commit(&mut state, Change::Appended(record.clone()));
            (record, seq)
        };
        if let Some(seq) = seq {
            self.dispatch(seq);
        }
        record
    }

    /// Drops all records.
    ///
    /// Clearing an empty store is still a mutation and is notified as such.
    pub fn clear(&self) {
        let seq = {
            let mut state = self.records.lock();
            state.records.clear();
            self.commit(&mut state, Change::Cleared)
        };
        if let Some(seq) = seq {
            self.dispatch(seq);
        }
    }

    /// Returns a point-in-time copy of the sequence.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.records.lock();
        Snapshot {
            records: state.records.clone(),
        }
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.lock().records.len()
    }

    /// Checks whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.lock().records.is_empty()
    }

    /// Registers an observer.
    ///
    /// The observer is notified about every mutation that happens after
    /// this call returns and about none that happened before.
    pub fn subscribe(&self, observer: Observer) -> SubscriptionId {
        self.register(Arc::new(move |change: &Change| {
            observer(change);
            true
        }))
    }

    /// Removes an observer.
    ///
    /// Returns `false` if the observer is not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let len = observers.len();
        observers.retain(|sub| sub.id != id);
        observers.len() != len
    }

    /// Returns a channel that receives every subsequent change.
    ///
    /// The subscription goes away with the first change that finds the
    /// receiver dropped.
    pub fn watch(&self) -> Receiver<Change> {
        let (tx, rx) = channel::unbounded();
        self.register(Arc::new(move |change: &Change| tx.send(change.clone()).is_ok()));
        rx
    }

    fn register(&self, observer: Arc<Notify>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let state = self.records.lock();
        self.observers.write().push(Subscription {
            id: id,
            since: state.seq,
            observer: observer,
        });
        id
    }

    // Must be called with the records lock held so that the queue order
    // matches the mutation order.
    // Returns the sequence number of the change if there is anybody to notify.
    fn commit(&self, state: &mut Records, change: Change) -> Option<u64> {
        state.seq += 1;
        if self.observers.read().is_empty() {
            return None;
        }
        self.pending.lock().push_back((state.seq, change));
        Some(state.seq)
    }

    // Delivers queued changes up to and including `seq`.
    // Changes queued later are left to the threads that made them, except
    // those made by this thread's own observers.
    fn dispatch(&self, seq: u64) {
        let key = self as *const LogStore as usize;
        let nested = DISPATCHING.with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.iter_mut().find(|entry| entry.0 == key) {
                Some(entry) => {
                    entry.1 = cmp::max(entry.1, seq);
                    true
                },
                None => {
                    stack.push((key, seq));
                    false
                },
            }
        });
        if nested {
            // The outer call on this thread delivers it.
            return;
        }

        let guard = self.dispatch.lock();
        loop {
            let target = DISPATCHING.with(|stack| {
                stack.borrow().iter().find(|entry| entry.0 == key).map_or(seq, |entry| entry.1)
            });
            let next = {
                let mut pending = self.pending.lock();
                match pending.front() {
                    Some(&(next, _)) if next <= target => pending.pop_front(),
                    _ => None,
                }
            };
            match next {
                Some((next, change)) => self.deliver(next, &change),
                None => break,
            }
        }
        drop(guard);

        DISPATCHING.with(|stack| stack.borrow_mut().retain(|entry| entry.0 != key));
    }

    fn deliver(&self, seq: u64, change: &Change) {
        let observers: Vec<_> = self.observers.read()
            .iter()
            .filter(|sub| sub.since < seq)
            .map(|sub| (sub.id, sub.observer.clone()))
            .collect();
        let gone: Vec<_> = observers.into_iter()
            .filter(|&(_, ref observer)| !notify(&**observer, change))
            .map(|(id, _)| id)
            .collect();
        if !gone.is_empty() {
            self.observers.write().retain(|sub| !gone.contains(&sub.id));
        }
    }
}

impl Default for LogStore {
    fn default() -> Self {
        LogStore::new()
    }
}

fn notify(observer: &Notify, change: &Change) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| observer(change))) {
        Ok(keep) => keep,
        Err(_) => {
            stderr::emit("logpane: store observer panicked\n");
            true
        },
    }
}

/// Immutable point-in-time copy of the store's records, oldest first.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Snapshot {
    records: Vec<Arc<Record>>,
}

impl Snapshot {
    /// Iterates from the oldest record to the newest one.
    pub fn iter(&self) -> slice::Iter<'_, Arc<Record>> {
        self.records.iter()
    }

    /// Iterates from the newest record to the oldest one.
    pub fn latest_first(&self) -> Rev<slice::Iter<'_, Arc<Record>>> {
        self.records.iter().rev()
    }
}

impl Deref for Snapshot {
    type Target = [Arc<Record>];

    fn deref(&self) -> &[Arc<Record>] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Arc<Record>;
    type IntoIter = slice::Iter<'a, Arc<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
