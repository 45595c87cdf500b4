// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cut-point reconciliation of server-supplied sequences.
//!
//! The server answers every sync with an offset and a batch: "everything
//! from `at_index` onward is superseded by this batch". The client never
//! merges; it truncates to the cut point and appends. Elements before the
//! cut keep their position, so anything holding an index into the sequence
//! keeps resolving to the same element.
//!
//! Rules:
//! - An empty batch is a no-op (nothing is truncated).
//! - `at_index == 0` replaces the whole sequence; it is not special-cased.
//! - `at_index` beyond the current length is clamped to the length.
//!
//! Applying the same `(at_index, batch)` twice yields the same sequence as
//! applying it once.

use tracing::warn;

/// Describes what a single reconciliation did to a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Splice {
    /// Cut point the server asked for.
    pub requested: usize,
    /// Cut point actually used after clamping.
    pub cut: usize,
    /// Number of local elements discarded.
    pub removed: usize,
    /// Number of elements appended from the batch.
    pub appended: usize,
}

impl Splice {
    /// Returns true if the sequence was left untouched.
    pub fn is_noop(&self) -> bool {
        self.appended == 0 && self.removed == 0
    }

    /// Returns true if the requested cut point was out of range.
    pub fn was_clamped(&self) -> bool {
        self.requested != self.cut
    }
}

/// Returns the cut point to use for a sequence of length `len`.
pub fn cut_point(len: usize, at_index: usize) -> usize {
    at_index.min(len)
}

/// Trait for sequences that accept server-authoritative batches.
pub trait Reconcile {
    /// The raw element type received from the server.
    type Incoming;

    /// Collection name used in log messages.
    const COLLECTION: &'static str;

    /// Current number of elements.
    fn reconciled_len(&self) -> usize;

    /// Drops every element at or after `len`.
    fn truncate_to(&mut self, len: usize);

    /// Appends one incoming element, decorating it as needed.
    fn append_one(&mut self, item: Self::Incoming);

    /// Replaces everything from `at_index` onward with `incoming`.
    fn apply(&mut self, at_index: usize, incoming: Vec<Self::Incoming>) -> Splice {
        let len = self.reconciled_len();
        if incoming.is_empty() {
            return Splice { requested: at_index, cut: len, removed: 0, appended: 0 };
        }

        let cut = cut_point(len, at_index);
        if cut != at_index {
            warn!(
                "{} cut point {} beyond local length {}, clamping",
                Self::COLLECTION,
                at_index,
                len
            );
        }

        self.truncate_to(cut);
        let appended = incoming.len();
        for item in incoming {
            self.append_one(item);
        }

        Splice { requested: at_index, cut, removed: len - cut, appended }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
