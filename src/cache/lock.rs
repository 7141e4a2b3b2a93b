//! Writer-preference reader/writer lock guarding the published snapshot.
//!
//! Any number of readers may hold the lock at once. A writer first announces
//! itself, and from that point no new reader is admitted until the writer has
//! acquired and released the lock, so a steady stream of readers cannot starve
//! a refresh that is waiting to publish.
//!
//! Acquisition returns a guard; dropping the guard releases the lock on every
//! exit path. The lock is not re-entrant: a thread holding a read guard that
//! asks for another one while a writer is waiting will deadlock.
//!
//! Critical sections are expected to be tiny (an `Arc` clone or swap), which
//! is why blocking on a condition variable is acceptable even when called
//! from async tasks.

use parking_lot::{Condvar, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Default)]
struct LockState {
    readers: usize,
    writers_waiting: usize,
    writer_active: bool,
}

impl LockState {
    fn admits_reader(&self) -> bool {
        !self.writer_active && self.writers_waiting == 0
    }

    fn admits_writer(&self) -> bool {
        !self.writer_active && self.readers == 0
    }
}

/// Reader and writer bookkeeping. Decides who may touch the value; the inner
/// `RwLock` is only taken once admitted, so it never contends.
#[derive(Default)]
struct Admission {
    state: Mutex<LockState>,
    changed: Condvar,
}

impl Admission {
    fn admit_reader(&self) -> AdmittedReader<'_> {
        let mut state = self.state.lock();
        self.changed
            .wait_while(&mut state, |state| !state.admits_reader());
        state.readers += 1;
        AdmittedReader { admission: self }
    }

    fn try_admit_reader(&self) -> Option<AdmittedReader<'_>> {
        let mut state = self.state.lock();
        if !state.admits_reader() {
            return None;
        }
        state.readers += 1;
        Some(AdmittedReader { admission: self })
    }

    fn admit_writer(&self) -> AdmittedWriter<'_> {
        let mut state = self.state.lock();
        state.writers_waiting += 1;
        self.changed
            .wait_while(&mut state, |state| !state.admits_writer());
        state.writers_waiting -= 1;
        state.writer_active = true;
        AdmittedWriter { admission: self }
    }
}

struct AdmittedReader<'a> {
    admission: &'a Admission,
}

impl Drop for AdmittedReader<'_> {
    fn drop(&mut self) {
        let mut state = self.admission.state.lock();
        state.readers -= 1;
        if state.readers == 0 {
            self.admission.changed.notify_all();
        }
    }
}

struct AdmittedWriter<'a> {
    admission: &'a Admission,
}

impl Drop for AdmittedWriter<'_> {
    fn drop(&mut self) {
        self.admission.state.lock().writer_active = false;
        self.admission.changed.notify_all();
    }
}

pub struct SnapshotLock<T> {
    admission: Admission,
    value: RwLock<T>,
}

impl<T> SnapshotLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            admission: Admission::default(),
            value: RwLock::new(value),
        }
    }

    /// Block until read access is granted.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let admitted = self.admission.admit_reader();
        ReadGuard {
            value: self.value.read(),
            _admitted: admitted,
        }
    }

    /// Take read access only if it can be granted without waiting.
    pub fn try_read(&self) -> Option<ReadGuard<'_, T>> {
        let admitted = self.admission.try_admit_reader()?;
        Some(ReadGuard {
            value: self.value.read(),
            _admitted: admitted,
        })
    }

    /// Announce a writer, then block until every active reader and any other
    /// writer has released.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let admitted = self.admission.admit_writer();
        WriteGuard {
            value: self.value.write(),
            _admitted: admitted,
        }
    }

    /// Run `f` with shared access, releasing afterwards.
    pub fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.read();
        f(&guard)
    }

    /// Run `f` with exclusive access, releasing afterwards.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.write();
        f(&mut guard)
    }

    pub fn active_readers(&self) -> usize {
        self.admission.state.lock().readers
    }

    pub fn waiting_writers(&self) -> usize {
        self.admission.state.lock().writers_waiting
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T> fmt::Debug for SnapshotLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.admission.state.lock();
        f.debug_struct("SnapshotLock")
            .field("readers", &state.readers)
            .field("writers_waiting", &state.writers_waiting)
            .field("writer_active", &state.writer_active)
            .finish_non_exhaustive()
    }
}

// Fields drop in declaration order: the value guard is released before the
// admission, so the next admitted writer finds the `RwLock` free.

/// Shared access; released on drop.
#[must_use = "the read lock is released as soon as the guard is dropped"]
pub struct ReadGuard<'a, T> {
    value: RwLockReadGuard<'a, T>,
    _admitted: AdmittedReader<'a>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Exclusive access; released on drop.
#[must_use = "the write lock is released as soon as the guard is dropped"]
pub struct WriteGuard<'a, T> {
    value: RwLockWriteGuard<'a, T>,
    _admitted: AdmittedWriter<'a>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}
