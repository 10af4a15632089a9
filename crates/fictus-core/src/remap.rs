//! Per-run identifier remapping.
//!
//! A generation run mints fresh lab-result keys while cloning, and the
//! old→new mapping must survive long enough to rewrite the measurements
//! that reference them. `RemapContext` is that mapping: built while
//! remapping lab results, consulted while remapping measurements, and
//! dropped when the run ends. It is scoped to one generation call and
//! never persisted — no cross-run leakage.

use std::collections::HashMap;

use fictus_contracts::ids::LabResultId;

/// The old→new lab-result key table for a single generation run.
#[derive(Debug, Default)]
pub struct RemapContext {
    mapping: HashMap<LabResultId, LabResultId>,
    dropped: usize,
}

impl RemapContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh key for `old` and record the pair.
    ///
    /// Remapping the same old key twice reuses the first minted key, so a
    /// template with duplicate lab-result rows stays internally consistent.
    pub fn remap(&mut self, old: &LabResultId) -> LabResultId {
        self.mapping
            .entry(old.clone())
            .or_insert_with(LabResultId::mint)
            .clone()
    }

    /// The minted key for `old`, if a lab result with that key was remapped
    /// this run. A `None` means the referencing measurement must be dropped,
    /// never emitted with a dangling reference.
    pub fn lookup(&self, old: &LabResultId) -> Option<&LabResultId> {
        self.mapping.get(old)
    }

    /// Note one measurement dropped for lack of a mapping.
    pub fn note_dropped(&mut self) {
        self.dropped += 1;
    }

    /// Measurements dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of remapped lab results.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remapped_keys_are_fresh_and_stable() {
        let mut ctx = RemapContext::new();
        let old = LabResultId::new("lr-1");

        let new_a = ctx.remap(&old);
        let new_b = ctx.remap(&old);

        assert_ne!(new_a, old, "a remapped key is never the old key");
        assert_eq!(new_a, new_b, "remapping twice reuses the minted key");
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn distinct_old_keys_get_distinct_new_keys() {
        let mut ctx = RemapContext::new();
        let a = ctx.remap(&LabResultId::new("lr-1"));
        let b = ctx.remap(&LabResultId::new("lr-2"));
        assert_ne!(a, b);
    }

    #[test]
    fn lookup_misses_for_unmapped_keys() {
        let mut ctx = RemapContext::new();
        ctx.remap(&LabResultId::new("lr-1"));

        assert!(ctx.lookup(&LabResultId::new("lr-1")).is_some());
        assert!(ctx.lookup(&LabResultId::new("lr-unknown")).is_none());
    }

    #[test]
    fn dropped_counter_tallies() {
        let mut ctx = RemapContext::new();
        assert_eq!(ctx.dropped(), 0);
        ctx.note_dropped();
        ctx.note_dropped();
        assert_eq!(ctx.dropped(), 2);
    }

    #[test]
    fn separate_runs_share_nothing() {
        let old = LabResultId::new("lr-1");
        let first = RemapContext::new().remap(&old);
        let second = RemapContext::new().remap(&old);
        // Fresh context, fresh mint — identifiers are never reused across
        // cloned patients.
        assert_ne!(first, second);
    }
}
