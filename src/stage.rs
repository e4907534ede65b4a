//! Stage selection
//!
//! The ordered set of at most two source identifiers composited into the
//! preview. Adding a third evicts the oldest (FIFO of capacity two).

use crate::capture::SourceId;

/// Maximum number of sources on stage
pub const STAGE_CAPACITY: usize = 2;

/// Ordered, duplicate-free selection of up to [`STAGE_CAPACITY`] ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSelection {
    ids: Vec<SourceId>,
}

impl StageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle an identifier on or off stage.
    ///
    /// No check is made that the id names a live source.
    pub fn toggle(&mut self, id: SourceId) {
        if let Some(pos) = self.ids.iter().position(|s| s == &id) {
            self.ids.remove(pos);
        } else if self.ids.len() < STAGE_CAPACITY {
            self.ids.push(id);
        } else {
            self.ids.remove(0);
            self.ids.push(id);
        }
    }

    /// Remove an id if present
    pub fn remove(&mut self, id: &SourceId) {
        self.ids.retain(|s| s != id);
    }

    pub fn contains(&self, id: &SourceId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[SourceId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SourceId {
        SourceId::from(s)
    }

    fn ids(sel: &StageSelection) -> Vec<&str> {
        sel.ids().iter().map(SourceId::as_str).collect()
    }

    #[test]
    fn test_toggle_appends_until_full() {
        let mut sel = StageSelection::new();
        sel.toggle(id("a"));
        assert_eq!(ids(&sel), ["a"]);
        sel.toggle(id("b"));
        assert_eq!(ids(&sel), ["a", "b"]);
    }

    #[test]
    fn test_toggle_full_evicts_oldest() {
        let mut sel = StageSelection::new();
        sel.toggle(id("a"));
        sel.toggle(id("b"));
        sel.toggle(id("c"));
        assert_eq!(ids(&sel), ["b", "c"]);
    }

    #[test]
    fn test_toggle_selected_removes_preserving_order() {
        let mut sel = StageSelection::new();
        sel.toggle(id("a"));
        sel.toggle(id("b"));
        sel.toggle(id("a"));
        assert_eq!(ids(&sel), ["b"]);

        let mut sel = StageSelection::new();
        sel.toggle(id("a"));
        sel.toggle(id("b"));
        sel.toggle(id("b"));
        assert_eq!(ids(&sel), ["a"]);
    }

    #[test]
    fn test_toggle_sequences_keep_invariants() {
        let pool = ["camera", "screen", "x", "y"];
        let mut sel = StageSelection::new();
        // Deterministic pseudo-random walk over the id pool
        let mut seed: u32 = 17;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let pick = pool[(seed >> 16) as usize % pool.len()];
            let before = sel.clone();
            sel.toggle(id(pick));

            assert!(sel.len() <= STAGE_CAPACITY);
            let mut seen = sel.ids().to_vec();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), sel.len(), "duplicate in {:?}", sel);

            if before.contains(&id(pick)) {
                let expected: Vec<SourceId> =
                    before.ids().iter().filter(|s| s.as_str() != pick).cloned().collect();
                assert_eq!(sel.ids(), expected.as_slice());
            }
        }
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut sel = StageSelection::new();
        sel.toggle(id("a"));
        sel.remove(&id("zzz"));
        assert_eq!(ids(&sel), ["a"]);
    }
}
