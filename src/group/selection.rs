//! Selection state: the roster and the currently chosen candidate.
//!
//! # Invariants
//! - The roster is non-empty and never changes after construction
//! - `current` always indexes into the roster
//! - At most one probe guard exists at a time
//!
//! The selection is stored as an index, so a torn or foreign value cannot
//! be observed by readers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::group::types::{GroupError, GroupResult};
use crate::outbound::Candidate;

/// Roster plus the active selection.
pub struct Selection {
    roster: Vec<Arc<dyn Candidate>>,
    current: AtomicUsize,
    probing: AtomicBool,
}

impl Selection {
    /// Build a selection over `roster`, starting at its first member.
    pub fn new(roster: Vec<Arc<dyn Candidate>>) -> GroupResult<Self> {
        if roster.is_empty() {
            return Err(GroupError::InvalidConfiguration(
                "the number of candidates cannot be 0".into(),
            ));
        }
        Ok(Self {
            roster,
            current: AtomicUsize::new(0),
            probing: AtomicBool::new(false),
        })
    }

    pub fn roster(&self) -> &[Arc<dyn Candidate>] {
        &self.roster
    }

    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    pub fn current(&self) -> Arc<dyn Candidate> {
        self.roster[self.current_index()].clone()
    }

    /// Make `candidate` current if it belongs to the roster.
    ///
    /// Returns `None` for a foreign candidate, otherwise whether the selection changed.
    pub fn adopt(&self, candidate: &Arc<dyn Candidate>) -> Option<bool> {
        let index = self
            .roster
            .iter()
            .position(|member| std::ptr::addr_eq(Arc::as_ptr(member), Arc::as_ptr(candidate)))?;
        Some(self.current.swap(index, Ordering::AcqRel) != index)
    }

    /// Reselect from cached alive/delay attributes without probing.
    ///
    /// Picks the alive candidate with the lowest last delay, earliest roster
    /// position on ties, or the first roster member when nobody is alive.
    pub fn local_fallback(&self) -> Arc<dyn Candidate> {
        let index = self
            .roster
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.alive())
            .min_by_key(|(index, candidate)| (candidate.last_delay(), *index))
            .map(|(index, _)| index)
            .unwrap_or(0);

        self.current.store(index, Ordering::Release);
        self.roster[index].clone()
    }

    /// Try to take the probe flag without blocking.
    pub fn try_begin_probe(&self) -> Option<ProbeGuard<'_>> {
        self.probing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProbeGuard {
                flag: &self.probing,
            })
    }

    pub fn is_probing(&self) -> bool {
        self.probing.load(Ordering::Acquire)
    }
}

/// Holds the probe flag; releases it on drop, including when the cycle is cancelled.
#[derive(Debug)]
pub struct ProbeGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
