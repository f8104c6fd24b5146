//! Merge accumulator for one search request.
//!
//! Collects result groups as providers respond, in either order, and
//! re-derives the final group ordering on every read: descending
//! priority, groups without a priority after any with one, ties broken
//! by first-insertion order. Arrival timing never influences the order,
//! which makes the merge commutative across providers.

use std::cmp::Reverse;

use crate::types::ResultGroup;

/// Accumulated groups for the current request, tagged with the owning
/// provider so a more-results response can replace exactly that
/// provider's contribution.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    entries: Vec<Entry>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    provider_id: String,
    /// Insertion sequence, the tie-breaker for equal priorities. Stable
    /// across a replace: the replacement inherits the replaced groups'
    /// earliest slot.
    seq: u64,
    group: ResultGroup,
}

impl Accumulator {
    /// Drop everything; the previous request's groups are abandoned.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_seq = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge one provider delivery.
    ///
    /// `incremental = true` appends to whatever the provider already
    /// contributed. `incremental = false` first removes every group this
    /// provider contributed, then inserts the new ones — full-replace
    /// semantics for the more-results path. Other providers' groups are
    /// never touched.
    pub fn merge(&mut self, provider_id: &str, groups: Vec<ResultGroup>, incremental: bool) {
        let mut replaced_seq = None;
        if !incremental {
            replaced_seq = self
                .entries
                .iter()
                .filter(|e| e.provider_id == provider_id)
                .map(|e| e.seq)
                .min();
            self.entries.retain(|e| e.provider_id != provider_id);
        }

        for group in groups {
            let seq = match replaced_seq.take() {
                Some(seq) => seq,
                None => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    seq
                }
            };
            self.entries.push(Entry {
                provider_id: provider_id.to_owned(),
                seq,
                group,
            });
        }
    }

    /// The merged groups in final display order.
    pub fn sorted_groups(&self) -> Vec<ResultGroup> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|e| match e.group.priority {
            Some(p) => (0u8, Reverse(p), e.seq),
            None => (1u8, Reverse(0), e.seq),
        });
        entries.into_iter().map(|e| e.group.clone()).collect()
    }
}
