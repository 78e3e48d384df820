//! Shared set of observed card IDs.

use std::collections::HashSet;
use std::mem;
use std::sync::Mutex;

/// Deduplicated card IDs observed since the last drain.
///
/// This is the only state shared between the monitor thread and the prompt
/// loop. The container is never exposed; every operation takes the lock
/// exactly once, so a check-then-insert cannot race a drain and no
/// suspension ever happens while the lock is held.
#[derive(Debug, Default)]
pub struct SampleSet {
    seen: Mutex<HashSet<u32>>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` if it has not been seen since the last drain.
    ///
    /// Returns `true` when the ID is new. Zero means "no card present" and
    /// is never inserted.
    pub fn insert_if_absent(&self, id: u32) -> bool {
        if id == 0 {
            return false;
        }
        self.seen.lock().unwrap().insert(id)
    }

    /// Take a snapshot of all current members and reset the set to empty.
    ///
    /// Snapshot and reset happen under one lock acquisition: an ID inserted
    /// concurrently lands either in this snapshot or in the next
    /// accumulation period, never both and never neither. Draining an empty
    /// set yields an empty snapshot.
    pub fn drain(&self) -> Vec<u32> {
        let mut guard = self.seen.lock().unwrap();
        mem::take(&mut *guard).into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn deduplicates_repeat_observations() {
        let set = SampleSet::new();
        assert!(set.insert_if_absent(15057));
        assert!(!set.insert_if_absent(15057));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn zero_is_never_inserted() {
        let set = SampleSet::new();
        assert!(!set.insert_if_absent(0));
        assert!(set.is_empty());
    }

    #[test]
    fn drain_empties_the_set() {
        let set = SampleSet::new();
        set.insert_if_absent(15057);
        set.insert_if_absent(17066);

        let mut snapshot = set.drain();
        snapshot.sort_unstable();
        assert_eq!(snapshot, vec![15057, 17066]);
        assert!(set.is_empty());

        // Values are accepted again after a drain.
        assert!(set.insert_if_absent(15057));
    }

    #[test]
    fn drain_from_empty_yields_empty_snapshot() {
        let set = SampleSet::new();
        assert!(set.drain().is_empty());
    }

    #[test]
    fn concurrent_inserts_land_in_exactly_one_snapshot() {
        let set = Arc::new(SampleSet::new());
        let total: u32 = 1000;

        let inserter = {
            let set = Arc::clone(&set);
            thread::spawn(move || {
                for id in 1..=total {
                    set.insert_if_absent(id);
                }
            })
        };

        // Drain repeatedly while the inserter runs.
        let mut snapshots: Vec<Vec<u32>> = Vec::new();
        for _ in 0..50 {
            snapshots.push(set.drain());
            thread::sleep(Duration::from_micros(100));
        }
        inserter.join().unwrap();
        snapshots.push(set.drain());

        let mut seen = HashSet::new();
        for snapshot in &snapshots {
            for id in snapshot {
                assert!(seen.insert(*id), "id {id} appeared in two snapshots");
            }
        }
        assert_eq!(seen.len(), total as usize, "some ids were lost");
    }
}
