//! Bounded single-producer/single-consumer integer queues.
//!
//! A pipe is split into a [`PipeWriter`] and a [`PipeReader`]. Pushing onto
//! a full pipe blocks the writer until the reader frees a slot; popping never
//! blocks. The reader's waiting flag is kept under the same lock as the
//! queue, so "the reader found nothing and nothing has arrived since" can be
//! observed as a single consistent fact from the writer side. The same goes
//! for a writer parked on a full pipe, which lets two writers stuck on each
//! other's full pipes find out instead of waiting forever.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::trace;

/// Capacity used when a run does not configure one.
pub const DEFAULT_CAPACITY: usize = 100;

/// Errors from pipe endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipeError {
    /// The other endpoint has been dropped and no more values can move.
    #[error("pipe disconnected")]
    Disconnected,
    /// The pipe is full and the writer that would drain it by reading is
    /// itself parked on a full pipe.
    #[error("both writers blocked on full pipes")]
    Deadlock,
}

#[derive(Debug)]
struct State {
    queue: VecDeque<i64>,
    reader_waiting: bool,
    writer_blocked: bool,
    reader_alive: bool,
    writer_alive: bool,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    not_full: Condvar,
    capacity: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create a pipe holding at most `capacity` values (at least one).
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let capacity = capacity.max(1);
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            queue: VecDeque::with_capacity(capacity),
            reader_waiting: false,
            writer_blocked: false,
            reader_alive: true,
            writer_alive: true,
        }),
        not_full: Condvar::new(),
        capacity,
    });
    (
        PipeWriter {
            shared: Arc::clone(&shared),
        },
        PipeReader { shared },
    )
}

/// Sending half of a pipe.
#[derive(Debug)]
pub struct PipeWriter {
    shared: Arc<Shared>,
}

impl PipeWriter {
    /// Append a value, blocking while the pipe is full.
    ///
    /// A pipe whose reader is gone still accepts values while it has room.
    /// Once it is full and the reader is gone the push fails instead of
    /// blocking; a writer already blocked is woken when the reader drops.
    pub fn push(&self, value: i64) -> Result<(), PipeError> {
        self.push_unless(value, || false)
    }

    /// Like [`push`](Self::push), but gives up with [`PipeError::Deadlock`]
    /// when the pipe is full and `reader_stuck` reports that the reader can
    /// never drain it.
    ///
    /// `reader_stuck` runs with this pipe unlocked, after the writer has
    /// been marked blocked, so it may lock the reader's own inbox. Two
    /// writers that do this against each other cannot both miss the other's
    /// mark.
    pub fn push_unless<F>(&self, value: i64, reader_stuck: F) -> Result<(), PipeError>
    where
        F: Fn() -> bool,
    {
        let mut state = self.shared.lock();
        while state.reader_alive && state.queue.len() >= self.shared.capacity {
            state.writer_blocked = true;
            drop(state);
            let stuck = reader_stuck();
            state = self.shared.lock();
            if stuck {
                state.writer_blocked = false;
                return Err(PipeError::Deadlock);
            }
            if !state.reader_alive || state.queue.len() < self.shared.capacity {
                break;
            }
            trace!(capacity = self.shared.capacity, "pipe full, writer waiting");
            state = self
                .shared
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.writer_blocked = false;
        if state.queue.len() >= self.shared.capacity {
            return Err(PipeError::Disconnected);
        }
        state.queue.push_back(value);
        Ok(())
    }

    /// True when the reader's last pop found the pipe empty and nothing has
    /// been pushed since.
    pub fn peer_idle(&self) -> bool {
        let state = self.shared.lock();
        state.reader_waiting && state.queue.is_empty()
    }

    /// Number of values currently queued.
    pub fn len(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// True if no values are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued values.
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.shared.lock().writer_alive = false;
    }
}

/// Receiving half of a pipe.
#[derive(Debug)]
pub struct PipeReader {
    shared: Arc<Shared>,
}

impl PipeReader {
    /// Remove the oldest value without blocking.
    ///
    /// `Ok(None)` means the pipe is empty right now and marks the reader as
    /// waiting; a hit clears the mark. Values still queued after the writer
    /// is dropped are delivered before `Disconnected` is reported.
    pub fn try_pop(&self) -> Result<Option<i64>, PipeError> {
        let mut state = self.shared.lock();
        match state.queue.pop_front() {
            Some(value) => {
                state.reader_waiting = false;
                self.shared.not_full.notify_one();
                Ok(Some(value))
            }
            None => {
                state.reader_waiting = true;
                if state.writer_alive {
                    Ok(None)
                } else {
                    Err(PipeError::Disconnected)
                }
            }
        }
    }

    /// True while the writer is parked on this pipe being full.
    ///
    /// Only the reader can free a slot, so a reader that is itself blocked
    /// sending will never release this writer.
    pub fn writer_stuck(&self) -> bool {
        let state = self.shared.lock();
        state.writer_blocked && state.queue.len() >= self.shared.capacity
    }

    /// True if the last `try_pop` found the pipe empty.
    pub fn is_waiting(&self) -> bool {
        self.shared.lock().reader_waiting
    }

    /// Number of values currently queued.
    pub fn len(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// True if no values are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        self.shared.lock().reader_alive = false;
        self.shared.not_full.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let (tx, rx) = pipe(4);
        for v in [3, -1, 7] {
            tx.push(v).unwrap();
        }
        assert_eq!(rx.try_pop(), Ok(Some(3)));
        assert_eq!(rx.try_pop(), Ok(Some(-1)));
        assert_eq!(rx.try_pop(), Ok(Some(7)));
        assert_eq!(rx.try_pop(), Ok(None));
    }

    #[test]
    fn empty_pop_sets_waiting() {
        let (tx, rx) = pipe(2);
        assert!(!rx.is_waiting());
        assert_eq!(rx.try_pop(), Ok(None));
        assert!(rx.is_waiting());
        assert!(tx.peer_idle());

        tx.push(1).unwrap();
        // Still flagged, but no longer idle: a value is pending.
        assert!(rx.is_waiting());
        assert!(!tx.peer_idle());

        assert_eq!(rx.try_pop(), Ok(Some(1)));
        assert!(!rx.is_waiting());
        assert!(!tx.peer_idle());
    }

    #[test]
    fn filling_to_capacity_does_not_block() {
        let (tx, rx) = pipe(DEFAULT_CAPACITY);
        for v in 0..DEFAULT_CAPACITY as i64 {
            tx.push(v).unwrap();
        }
        assert_eq!(tx.len(), DEFAULT_CAPACITY);
        assert_eq!(rx.len(), DEFAULT_CAPACITY);
    }

    #[test]
    fn full_pipe_blocks_until_pop() {
        let (tx, rx) = pipe(1);
        tx.push(1).unwrap();

        let writer = thread::spawn(move || {
            tx.push(2).unwrap();
            tx
        });

        thread::sleep(Duration::from_millis(50));
        assert_eq!(rx.len(), 1, "second push must wait for space");

        assert_eq!(rx.try_pop(), Ok(Some(1)));
        let _tx = writer.join().unwrap();
        assert_eq!(rx.try_pop(), Ok(Some(2)));
    }

    #[test]
    fn dropped_reader_wakes_blocked_writer() {
        let (tx, rx) = pipe(1);
        tx.push(1).unwrap();

        let writer = thread::spawn(move || tx.push(2));
        thread::sleep(Duration::from_millis(50));
        drop(rx);

        assert_eq!(writer.join().unwrap(), Err(PipeError::Disconnected));
    }

    #[test]
    fn dropped_reader_still_takes_values_while_room() {
        let (tx, rx) = pipe(2);
        drop(rx);
        assert_eq!(tx.push(1), Ok(()));
        assert_eq!(tx.push(2), Ok(()));
        assert_eq!(tx.push(3), Err(PipeError::Disconnected));
    }

    #[test]
    fn dropped_writer_drains_then_disconnects() {
        let (tx, rx) = pipe(3);
        tx.push(9).unwrap();
        drop(tx);
        assert_eq!(rx.try_pop(), Ok(Some(9)));
        assert_eq!(rx.try_pop(), Err(PipeError::Disconnected));
    }

    #[test]
    fn parked_writer_is_visible_to_reader() {
        let (tx, rx) = pipe(1);
        tx.push(1).unwrap();
        assert!(!rx.writer_stuck());

        let writer = thread::spawn(move || {
            tx.push(2).unwrap();
            tx
        });
        while !rx.writer_stuck() {
            thread::yield_now();
        }

        assert_eq!(rx.try_pop(), Ok(Some(1)));
        let _tx = writer.join().unwrap();
        assert!(!rx.writer_stuck());
        assert_eq!(rx.try_pop(), Ok(Some(2)));
    }

    #[test]
    fn cross_blocked_writers_detect_deadlock() {
        let (a_tx, a_rx) = pipe(1);
        let (b_tx, b_rx) = pipe(1);
        a_tx.push(0).unwrap();
        b_tx.push(0).unwrap();

        // Each side pushes onto its full pipe while checking the other's.
        let (ra, rb) = thread::scope(|s| {
            let ha = s.spawn(|| {
                let res = a_tx.push_unless(1, || b_rx.writer_stuck());
                drop(b_rx);
                res
            });
            let hb = s.spawn(|| {
                let res = b_tx.push_unless(1, || a_rx.writer_stuck());
                drop(a_rx);
                res
            });
            (ha.join().unwrap(), hb.join().unwrap())
        });

        // One side sees the deadlock. Its reader goes away, so the other is
        // released with a disconnect.
        let outcomes = [ra, rb];
        assert!(outcomes.contains(&Err(PipeError::Deadlock)));
        assert!(outcomes
            .iter()
            .all(|r| matches!(r, Err(PipeError::Deadlock | PipeError::Disconnected))));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let (tx, rx) = pipe(0);
        assert_eq!(tx.capacity(), 1);
        tx.push(5).unwrap();
        assert_eq!(rx.try_pop(), Ok(Some(5)));
    }
}
