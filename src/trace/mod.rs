//! Step log shared by every engine
//!
//! A traced operation owns a [`TraceRecorder`] for the duration of one call,
//! appends one [`Step`] per micro-action and hands back an immutable [`Trace`].
//!
//! Shape guaranteed by [`TraceRecorder::finish`]:
//!   first step: the operation's begin step
//!   last step:  a terminal kind ([`Terminal`])
//!
//! Snapshots are deep copies owned by their step, so replaying step *i* never
//! observes mutations performed while recording step *j > i*.

mod cursor;

pub use cursor::{PlaybackSchedule, TraceCursor};

use std::fmt;
use std::ops::Index;
use tracing::trace;

/// Terminal kinds a trace can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Terminal {
    /// Operation ran to completion
    Complete,
    /// Searched value is absent
    NotFound,
    /// Structure had nothing to operate on
    Empty,
}

impl Terminal {
    /// Stable tag
    pub fn tag(self) -> &'static str {
        match self {
            Terminal::Complete => "complete",
            Terminal::NotFound => "not_found",
            Terminal::Empty => "empty",
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kind-specific payload of a step
///
/// Implemented by each engine's event enum.
pub trait StepEvent: Clone + fmt::Debug {
    /// Deep-copied structural state attached to a step
    type Snapshot: Clone + fmt::Debug;

    /// Stable kind tag (e.g. `"move"`, `"check_balance"`)
    fn tag(&self) -> &'static str;

    /// Terminal kind, if this event closes a trace
    fn terminal(&self) -> Option<Terminal> {
        None
    }

    /// Number of cells retained by one snapshot
    fn snapshot_cells(snapshot: &Self::Snapshot) -> usize;
}

/// One immutable micro-state of an operation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[cfg_attr(
    feature = "visualize",
    serde(bound(serialize = "E: serde::Serialize, E::Snapshot: serde::Serialize"))
)]
pub struct Step<E: StepEvent> {
    event: E,
    description: String,
    snapshot: Option<E::Snapshot>,
}

impl<E: StepEvent> Step<E> {
    /// Kind tag of the event
    pub fn tag(&self) -> &'static str {
        self.event.tag()
    }

    /// Kind-specific payload
    pub fn event(&self) -> &E {
        &self.event
    }

    /// Human-readable narration
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Structural snapshot taken when the step was recorded
    pub fn snapshot(&self) -> Option<&E::Snapshot> {
        self.snapshot.as_ref()
    }

    /// Terminal kind, if any
    pub fn terminal(&self) -> Option<Terminal> {
        self.event.terminal()
    }

    /// Whether this step closes its trace
    pub fn is_terminal(&self) -> bool {
        self.terminal().is_some()
    }
}

impl<E: StepEvent> fmt::Display for Step<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag(), self.description)
    }
}

/// Ordered steps produced by exactly one operation invocation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[cfg_attr(
    feature = "visualize",
    serde(bound(serialize = "E: serde::Serialize, E::Snapshot: serde::Serialize"))
)]
pub struct Trace<E: StepEvent> {
    operation: &'static str,
    steps: Vec<Step<E>>,
}

impl<E: StepEvent> Trace<E> {
    /// Name of the operation that produced the trace
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Number of steps (never zero)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`
    pub fn get(&self, index: usize) -> Option<&Step<E>> {
        self.steps.get(index)
    }

    /// Begin step
    pub fn first(&self) -> &Step<E> {
        &self.steps[0]
    }

    /// Terminal step
    pub fn last(&self) -> &Step<E> {
        &self.steps[self.steps.len() - 1]
    }

    /// All steps in order
    pub fn steps(&self) -> &[Step<E>] {
        &self.steps
    }

    /// Iterate over steps in order
    pub fn iter(&self) -> std::slice::Iter<'_, Step<E>> {
        self.steps.iter()
    }

    /// Consume the trace, keeping its steps
    pub fn into_steps(self) -> Vec<Step<E>> {
        self.steps
    }

    /// How the operation ended
    pub fn outcome(&self) -> Terminal {
        self.last().terminal().unwrap_or(Terminal::Complete)
    }

    /// Number of steps carrying `tag`
    pub fn count(&self, tag: &str) -> usize {
        self.steps.iter().filter(|step| step.tag() == tag).count()
    }

    /// Index of the first step carrying `tag`
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.tag() == tag)
    }

    /// Kind tags in order
    pub fn tags(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::tag).collect()
    }

    /// Replay cursor positioned on the begin step
    pub fn cursor(&self) -> TraceCursor<'_, E> {
        TraceCursor::new(self)
    }

    /// Digest over operation name, tags and descriptions
    ///
    /// Equal inputs must yield equal fingerprints across runs.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.operation.as_bytes());
        for step in &self.steps {
            hasher.update(b"\n");
            hasher.update(step.tag().as_bytes());
            hasher.update(b"\t");
            hasher.update(step.description.as_bytes());
        }
        hasher.finalize()
    }

    /// Cells held by all snapshots of this trace
    ///
    /// Grows with steps × snapshot size. Dropping the trace frees them.
    pub fn retained_snapshot_cells(&self) -> usize {
        self.steps
            .iter()
            .filter_map(|step| step.snapshot.as_ref())
            .map(E::snapshot_cells)
            .sum()
    }
}

impl<E: StepEvent> Index<usize> for Trace<E> {
    type Output = Step<E>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl<'a, E: StepEvent> IntoIterator for &'a Trace<E> {
    type Item = &'a Step<E>;
    type IntoIter = std::slice::Iter<'a, Step<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Append-only builder used inside one traced call
#[derive(Debug)]
pub struct TraceRecorder<E: StepEvent> {
    operation: &'static str,
    steps: Vec<Step<E>>,
}

impl<E: StepEvent> TraceRecorder<E> {
    /// Start recording `operation`
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            steps: Vec::new(),
        }
    }

    /// Append a step without a snapshot
    pub fn record(&mut self, event: E, description: impl Into<String>) {
        self.push(event, description.into(), None);
    }

    /// Append a step with a snapshot
    pub fn record_with(&mut self, event: E, description: impl Into<String>, snapshot: E::Snapshot) {
        self.push(event, description.into(), Some(snapshot));
    }

    fn push(&mut self, event: E, description: String, snapshot: Option<E::Snapshot>) {
        debug_assert!(
            self.steps.last().map_or(true, |step| !step.is_terminal()),
            "step recorded after terminal step in {}",
            self.operation
        );
        trace!(
            operation = self.operation,
            index = self.steps.len(),
            tag = event.tag(),
            description = %description,
            "step recorded"
        );
        self.steps.push(Step {
            event,
            description,
            snapshot,
        });
    }

    /// Steps recorded so far
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Seal the trace
    ///
    /// Panics if the trace is empty or does not end with a terminal step;
    /// either is a bug in the engine, not a caller error.
    pub fn finish(self) -> Trace<E> {
        assert!(
            self.steps.last().is_some_and(Step::is_terminal),
            "trace for {} must end with a terminal step",
            self.operation
        );
        Trace {
            operation: self.operation,
            steps: self.steps,
        }
    }
}
