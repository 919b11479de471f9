//! Capacity-doubling array with traced insert/delete
//!
//! Slots are an explicit boxed buffer so that capacity is a visible,
//! deterministic quantity: it starts at the configured size and doubles
//! whenever an insert finds the buffer full.
//!
//! Traced operations mutate eagerly while they record; each shift of one
//! element is its own step.

use crate::trace::{StepEvent, Terminal, Trace, TraceRecorder};
use crate::{EngineConfig, EngineError, Result, Value, DEFAULT_ARRAY_CAPACITY};
use tracing::debug;

/// Kind-specific payload of an array step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum ArrayEvent {
    /// Capacity check that opens an insert
    Check {
        /// Size before the insert
        len: usize,
        /// Capacity before any growth
        capacity: usize,
    },
    /// Elements from `from` onwards are about to shift right
    Prepare {
        /// First index that moves
        from: usize,
    },
    /// Slot selected for deletion; opens a delete
    Mark {
        /// Index being deleted
        index: usize,
        /// Value stored there
        value: Value,
    },
    /// One element shifted by one slot
    Move {
        /// Source index
        from: usize,
        /// Destination index
        to: usize,
        /// Element moved
        value: Value,
    },
    /// New element written into its slot
    Insert {
        /// Target index
        index: usize,
        /// Inserted value
        value: Value,
    },
    /// Operation finished
    Complete {
        /// Index the operation targeted
        index: usize,
        /// Value inserted or removed
        value: Value,
        /// Size after the operation
        len: usize,
    },
}

impl StepEvent for ArrayEvent {
    type Snapshot = Vec<Value>;

    fn tag(&self) -> &'static str {
        match self {
            ArrayEvent::Check { .. } => "check",
            ArrayEvent::Prepare { .. } => "prepare",
            ArrayEvent::Mark { .. } => "mark",
            ArrayEvent::Move { .. } => "move",
            ArrayEvent::Insert { .. } => "insert",
            ArrayEvent::Complete { .. } => "complete",
        }
    }

    fn terminal(&self) -> Option<Terminal> {
        matches!(self, ArrayEvent::Complete { .. }).then_some(Terminal::Complete)
    }

    fn snapshot_cells(snapshot: &Vec<Value>) -> usize {
        snapshot.len()
    }
}

/// Growable indexed array
#[derive(Debug, Clone)]
pub struct DynamicArray {
    /// Backing buffer; `slots.len()` is the capacity
    slots: Box<[Value]>,

    /// Number of live elements at the front of `slots`
    len: usize,
}

impl DynamicArray {
    /// Empty array with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ARRAY_CAPACITY)
    }

    /// Empty array sized from `config`
    pub fn with_config(config: &EngineConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Empty array with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// No elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots currently allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Result<Value> {
        self.check_index(index, self.len)?;
        Ok(self.slots[index])
    }

    /// Live elements
    pub fn as_slice(&self) -> &[Value] {
        &self.slots[..self.len]
    }

    /// Copy of the live elements
    pub fn to_vec(&self) -> Vec<Value> {
        self.as_slice().to_vec()
    }

    /// Append without tracing
    pub fn push(&mut self, value: Value) {
        self.ensure_capacity();
        self.slots[self.len] = value;
        self.len += 1;
    }

    /// Insert at `index` without tracing
    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        self.check_index(index, self.len + 1)?;
        self.ensure_capacity();
        self.slots.copy_within(index..self.len, index + 1);
        self.slots[index] = value;
        self.len += 1;
        Ok(())
    }

    /// Remove at `index` without tracing
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        self.check_index(index, self.len)?;
        let value = self.slots[index];
        self.slots.copy_within(index + 1..self.len, index);
        self.len -= 1;
        Ok(value)
    }

    /// Insert `value` at `index`, recording every shift
    ///
    /// Produces `len − index` move steps, highest index first.
    /// Fails with [`EngineError::OutOfRange`] before touching anything when
    /// `index > len`.
    pub fn insert_traced(&mut self, index: usize, value: Value) -> Result<Trace<ArrayEvent>> {
        self.check_index(index, self.len + 1)?;
        debug!(index, value, len = self.len, "array insert started");

        let mut recorder = TraceRecorder::new("array_insert");
        recorder.record_with(
            ArrayEvent::Check {
                len: self.len,
                capacity: self.capacity(),
            },
            format!(
                "check capacity: size {}, capacity {}",
                self.len,
                self.capacity()
            ),
            self.to_vec(),
        );

        self.ensure_capacity();

        if index < self.len {
            recorder.record_with(
                ArrayEvent::Prepare { from: index },
                format!(
                    "elements from index {} onwards shift one slot right",
                    index
                ),
                self.to_vec(),
            );

            for i in (index..self.len).rev() {
                let moved = self.slots[i];
                self.slots[i + 1] = moved;
                recorder.record_with(
                    ArrayEvent::Move {
                        from: i,
                        to: i + 1,
                        value: moved,
                    },
                    format!("move {} from index {} to index {}", moved, i, i + 1),
                    self.slots[..=self.len].to_vec(),
                );
            }
        }

        let description = if self.len == 0 {
            format!("insert first element {}", value)
        } else {
            format!("insert {} at index {}", value, index)
        };
        self.slots[index] = value;
        self.len += 1;
        recorder.record_with(ArrayEvent::Insert { index, value }, description, self.to_vec());

        recorder.record_with(
            ArrayEvent::Complete {
                index,
                value,
                len: self.len,
            },
            format!("insert complete, size is now {}", self.len),
            self.to_vec(),
        );

        let trace = recorder.finish();
        debug!(index, value, steps = trace.len(), "array insert finished");
        Ok(trace)
    }

    /// Delete the element at `index`, recording every shift
    ///
    /// Produces `len − index − 1` move steps, lowest index first.
    pub fn delete_traced(&mut self, index: usize) -> Result<Trace<ArrayEvent>> {
        self.check_index(index, self.len)?;
        let removed = self.slots[index];
        debug!(index, value = removed, len = self.len, "array delete started");

        let mut recorder = TraceRecorder::new("array_delete");
        recorder.record_with(
            ArrayEvent::Mark {
                index,
                value: removed,
            },
            format!("mark {} at index {} for deletion", removed, index),
            self.to_vec(),
        );

        for i in index..self.len - 1 {
            let moved = self.slots[i + 1];
            self.slots[i] = moved;
            recorder.record_with(
                ArrayEvent::Move {
                    from: i + 1,
                    to: i,
                    value: moved,
                },
                format!("move {} from index {} to index {}", moved, i + 1, i),
                self.to_vec(),
            );
        }

        self.len -= 1;
        recorder.record_with(
            ArrayEvent::Complete {
                index,
                value: removed,
                len: self.len,
            },
            format!("deleted {}, size is now {}", removed, self.len),
            self.to_vec(),
        );

        let trace = recorder.finish();
        debug!(index, value = removed, steps = trace.len(), "array delete finished");
        Ok(trace)
    }

    /// `index < bound`, else `OutOfRange` against the current length
    fn check_index(&self, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(EngineError::OutOfRange {
                index,
                len: self.len,
            })
        }
    }

    /// Double the buffer when full (a zero capacity grows to one slot)
    fn ensure_capacity(&mut self) {
        if self.len < self.slots.len() {
            return;
        }
        let grown = (self.slots.len() * 2).max(1);
        let mut slots = vec![0; grown].into_boxed_slice();
        slots[..self.len].copy_from_slice(&self.slots[..self.len]);
        debug!(from = self.slots.len(), to = grown, "array capacity doubled");
        self.slots = slots;
    }
}

impl Default for DynamicArray {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Value> for DynamicArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut array = Self::new();
        for value in iter {
            array.push(value);
        }
        array
    }
}
