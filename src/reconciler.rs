//! # Request reconciliation
//!
//! Position requests are issued from the frame clock and from user input, and their
//! asynchronous resolutions may complete in any order. [`RequestReconciler`] stamps every
//! request with a strictly increasing sequence number and admits a result only when its
//! sequence is at least the highest one already admitted. A late response computed for
//! older elements is therefore discarded instead of rolling the displayed position back.
//!
//! ## Invariants
//!
//! - Sequence numbers start at 1 and never go backwards, not even across spawns.
//! - `highest_admitted` is monotonically non-decreasing.
//! - Each outstanding request is admitted at most once; a duplicate or unknown sequence is
//!   discarded.
//! - [`RequestReconciler::invalidate_outstanding`] makes every request issued so far stale.
//!
//! ## Example
//!
//! ```rust
//! use neotrack::constants::{Position, EARTH_ELEMENTS};
//! use neotrack::reconciler::{AdmitResult, RequestReconciler};
//!
//! let mut reconciler = RequestReconciler::new();
//! let first = reconciler.issue(EARTH_ELEMENTS);
//! let second = reconciler.issue(EARTH_ELEMENTS);
//!
//! let newer = Position::new(0.0, 1.0, 0.0);
//! assert_eq!(reconciler.admit(second.sequence, newer), AdmitResult::Applied(newer));
//! assert_eq!(
//!     reconciler.admit(first.sequence, Position::new(1.0, 0.0, 0.0)),
//!     AdmitResult::Discarded
//! );
//! ```

use std::collections::BTreeMap;

use crate::orbit_type::keplerian_element::OrbitalElements;

pub type SequenceId = u64;

/// A position request waiting for its resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRequest {
    pub sequence: SequenceId,
    /// Element snapshot the request was issued for
    pub elements: OrbitalElements,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdmitResult<T> {
    /// The result is the newest known one and may be displayed
    Applied(T),
    /// The result is stale, unknown or already consumed
    Discarded,
}

impl<T> AdmitResult<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, AdmitResult::Applied(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestReconciler {
    last_issued: SequenceId,
    highest_admitted: Option<SequenceId>,
    outstanding: BTreeMap<SequenceId, OrbitalElements>,
}

impl RequestReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request for `elements` and return it with its sequence number.
    pub fn issue(&mut self, elements: OrbitalElements) -> PendingRequest {
        self.last_issued += 1;
        self.outstanding.insert(self.last_issued, elements);
        PendingRequest {
            sequence: self.last_issued,
            elements,
        }
    }

    /// Decide whether the resolution of request `sequence` may be displayed.
    ///
    /// The request leaves the outstanding set whatever the outcome. Requests older than
    /// an admitted one are dropped at the same time, since they can never win anymore.
    pub fn admit<T>(&mut self, sequence: SequenceId, value: T) -> AdmitResult<T> {
        if self.outstanding.remove(&sequence).is_none() {
            return AdmitResult::Discarded;
        }
        if self.highest_admitted.is_some_and(|highest| sequence < highest) {
            return AdmitResult::Discarded;
        }

        self.highest_admitted = Some(sequence);
        self.outstanding = self.outstanding.split_off(&sequence);
        AdmitResult::Applied(value)
    }

    /// Forget request `sequence` after its resolution failed.
    pub fn reject(&mut self, sequence: SequenceId) -> Option<PendingRequest> {
        self.outstanding
            .remove(&sequence)
            .map(|elements| PendingRequest { sequence, elements })
    }

    /// Make every request issued so far stale.
    pub fn invalidate_outstanding(&mut self) {
        self.outstanding.clear();
    }

    pub fn last_issued(&self) -> SequenceId {
        self.last_issued
    }

    pub fn highest_admitted(&self) -> Option<SequenceId> {
        self.highest_admitted
    }

    pub fn outstanding_len(&self) -> usize {
        self.outstanding.len()
    }
}
