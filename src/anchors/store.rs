//! Ordered collection of labeled anchors.
//!
//! Mutated only by the frame loop (append a batch per drained result, clear
//! on reset, refresh labels every frame). Other threads may read snapshots
//! through the lock at any time.

use std::sync::OnceLock;
use std::thread::{self, ThreadId};

use parking_lot::RwLock;

use crate::tracking::AnchorHandle;

use super::label::AnchorLabel;

/// An anchor in the tracking subsystem plus its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledAnchor {
    pub handle: AnchorHandle,
    pub label: AnchorLabel,
}

impl LabeledAnchor {
    pub fn new(handle: AnchorHandle, label: AnchorLabel) -> Self {
        Self { handle, label }
    }
}

#[derive(Debug, Default)]
pub struct AnchorStore {
    anchors: RwLock<Vec<LabeledAnchor>>,
    /// Thread that owns mutation, bound on first write.
    writer: OnceLock<ThreadId>,
}

impl AnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, anchor: LabeledAnchor) {
        self.check_writer();
        self.anchors.write().push(anchor);
    }

    /// Append a batch under a single lock.
    pub fn extend(&self, batch: Vec<LabeledAnchor>) {
        if batch.is_empty() {
            return;
        }
        self.check_writer();
        self.anchors.write().extend(batch);
    }

    /// Remove every anchor. Returns how many were removed.
    pub fn clear(&self) -> usize {
        self.check_writer();
        let mut anchors = self.anchors.write();
        let removed = anchors.len();
        anchors.clear();
        removed
    }

    /// Apply `f` to each anchor in insertion order.
    pub fn update_each<F>(&self, mut f: F)
    where
        F: FnMut(&mut LabeledAnchor),
    {
        self.check_writer();
        for anchor in self.anchors.write().iter_mut() {
            f(anchor);
        }
    }

    /// Copy of the anchors in insertion order.
    pub fn snapshot_for_render(&self) -> Vec<LabeledAnchor> {
        self.anchors.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.anchors.read().len()
    }

    fn check_writer(&self) {
        let writer = self.writer.get_or_init(|| thread::current().id());
        debug_assert_eq!(
            *writer,
            thread::current().id(),
            "anchor store mutated outside the frame loop thread"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn anchor(id: u64, text: &str) -> LabeledAnchor {
        LabeledAnchor::new(AnchorHandle(id), AnchorLabel::new(text, "1.00 cm"))
    }

    #[test]
    fn test_add_and_snapshot_order() {
        let store = AnchorStore::new();
        assert!(store.is_empty());

        store.add(anchor(1, "cup"));
        store.extend(vec![anchor(2, "plant"), anchor(3, "chair")]);

        let names: Vec<_> = store
            .snapshot_for_render()
            .iter()
            .map(|a| a.label.base_text().to_string())
            .collect();
        assert_eq!(names, vec!["cup", "plant", "chair"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_clear() {
        let store = AnchorStore::new();
        store.extend(vec![anchor(1, "cup"), anchor(2, "plant")]);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_len_monotonic_between_clears() {
        let store = AnchorStore::new();
        let mut last = 0;
        for i in 0..20u64 {
            let batch: Vec<_> = (0..(i % 3)).map(|j| anchor(i * 10 + j, "x")).collect();
            store.extend(batch);
            let len = store.snapshot_for_render().len();
            assert!(len >= last);
            last = len;
        }
        store.clear();
        assert_eq!(store.snapshot_for_render().len(), 0);
    }

    #[test]
    fn test_update_each() {
        let store = AnchorStore::new();
        store.extend(vec![anchor(1, "cup"), anchor(2, "plant")]);
        store.update_each(|a| a.label.update(5, "2.00 cm"));

        for a in store.snapshot_for_render() {
            assert_eq!(a.label.rotation_degrees(), Some(5));
            assert_eq!(a.label.distance_text(), "2.00 cm");
        }
    }

    #[test]
    fn test_readers_on_other_threads() {
        let store = Arc::new(AnchorStore::new());
        store.extend(vec![anchor(1, "cup")]);

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.snapshot_for_render().len())
            })
            .collect();
        store.add(anchor(2, "plant"));

        for reader in readers {
            let seen = reader.join().unwrap();
            assert!(seen == 1 || seen == 2);
        }
    }
}
