//! Replay over an already-recorded trace
//!
//! Playback is pure indexing: the engine is never re-invoked.
//! The cursor always points at a valid step, so rendering
//! `cursor.current()` needs nothing but that step's own snapshot.

use super::{Step, StepEvent, Trace};
use crate::{EngineError, Result};
use std::time::Duration;

/// Seekable position inside a trace
#[derive(Debug)]
pub struct TraceCursor<'a, E: StepEvent> {
    trace: &'a Trace<E>,
    position: usize,
}

impl<'a, E: StepEvent> TraceCursor<'a, E> {
    /// Cursor on the begin step
    pub fn new(trace: &'a Trace<E>) -> Self {
        Self { trace, position: 0 }
    }

    /// Index of the current step
    pub fn position(&self) -> usize {
        self.position
    }

    /// Step under the cursor
    pub fn current(&self) -> &'a Step<E> {
        &self.trace.steps[self.position]
    }

    /// Advance one step; `None` when already on the terminal step
    pub fn forward(&mut self) -> Option<&'a Step<E>> {
        if self.is_at_end() {
            return None;
        }
        self.position += 1;
        Some(self.current())
    }

    /// Go back one step; `None` when already on the begin step
    pub fn back(&mut self) -> Option<&'a Step<E>> {
        if self.is_at_start() {
            return None;
        }
        self.position -= 1;
        Some(self.current())
    }

    /// Jump to `index`
    pub fn seek(&mut self, index: usize) -> Result<&'a Step<E>> {
        if index >= self.trace.len() {
            return Err(EngineError::OutOfRange {
                index,
                len: self.trace.len(),
            });
        }
        self.position = index;
        Ok(self.current())
    }

    /// Jump to the begin step
    pub fn rewind(&mut self) -> &'a Step<E> {
        self.position = 0;
        self.current()
    }

    /// Jump to the terminal step
    pub fn to_end(&mut self) -> &'a Step<E> {
        self.position = self.trace.len() - 1;
        self.current()
    }

    /// On the begin step
    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    /// On the terminal step
    pub fn is_at_end(&self) -> bool {
        self.position + 1 == self.trace.len()
    }

    /// Steps left after the current one
    pub fn remaining(&self) -> usize {
        self.trace.len() - 1 - self.position
    }
}

/// Fixed-interval auto-play timing
///
/// Step `i` is shown at `i × interval`; the terminal step is held for one
/// extra interval before playback ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSchedule {
    interval: Duration,
}

impl PlaybackSchedule {
    /// Schedule advancing every `interval`
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Time between two steps
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When step `index` is shown
    pub fn offset_of(&self, index: usize) -> Duration {
        let factor = u32::try_from(index).unwrap_or(u32::MAX);
        self.interval.saturating_mul(factor)
    }

    /// Wall time to play a trace of `len` steps
    pub fn total_for(&self, len: usize) -> Duration {
        self.offset_of(len)
    }

    /// Index of the step visible after `elapsed`, for a trace of `len` steps
    pub fn step_at(&self, elapsed: Duration, len: usize) -> usize {
        let last = len.saturating_sub(1);
        if self.interval.is_zero() {
            return last;
        }
        let index = elapsed.as_nanos() / self.interval.as_nanos();
        usize::try_from(index).map_or(last, |index| index.min(last))
    }

    /// `(offset, index)` pairs for every step of `trace`
    pub fn frames<E: StepEvent>(&self, trace: &Trace<E>) -> Vec<(Duration, usize)> {
        (0..trace.len()).map(|i| (self.offset_of(i), i)).collect()
    }
}
