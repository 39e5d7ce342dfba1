//! Error types and the diagnostic channel.
//!
//! Structural and value errors never escape a [`Chart`](crate::Chart):
//! they are recorded once in [`Diagnostics`] and the trace is marked
//! non-renderable.

use thiserror::Error;

/// Errors raised while turning flat rows into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The same id is claimed by more than one row.
    #[error("ambiguous: {0}")]
    AmbiguousHierarchy(String),

    /// More than one parent id is referenced but never defined.
    #[error("Multiple implied roots, cannot build hierarchy: {}", .0.join(", "))]
    MultipleImpliedRoots(Vec<String>),

    /// A parent chain loops back on itself and never reaches a root.
    #[error("cycle: {0}")]
    Cycle(String),

    /// No rows to build from.
    #[error("no rows to build a hierarchy from")]
    EmptyInput,

    /// A column is shorter than the label/parent columns.
    #[error("column '{column}' has {found} entries, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },
}

/// A `total` node whose explicit value is smaller than its children's sum.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Total value for node {id} is smaller than the sum of its children. \nparent value = {parent_value} \nchildren sum = {child_sum}"
)]
pub struct ValueInconsistency {
    pub id: String,
    pub parent_value: f64,
    pub child_sum: f64,
}

/// Every problem a trace can report through [`Diagnostics`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    #[error("Failed to build hierarchy. Error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Value(#[from] ValueInconsistency),

    /// The requested entry id does not exist. Not fatal: the root is used.
    #[error("entry '{0}' not found, falling back to the root")]
    InvalidEntry(String),
}

impl TraceError {
    /// Whether this error makes the trace non-renderable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TraceError::InvalidEntry(_))
    }
}

/// Collects trace problems so they are reported once instead of thrown.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    reported: Vec<TraceError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log an error, skipping exact repeats.
    pub fn report(&mut self, error: TraceError) {
        if self.reported.contains(&error) {
            return;
        }
        log::warn!("{}", error);
        self.reported.push(error);
    }

    pub fn errors(&self) -> &[TraceError] {
        &self.reported
    }

    /// True if any recorded error blocks rendering.
    pub fn has_fatal(&self) -> bool {
        self.reported.iter().any(TraceError::is_fatal)
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn clear(&mut self) {
        self.reported.clear();
    }
}
