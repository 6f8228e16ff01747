//! A bounded min-ordered multiset keyed by energy.
//!
//! Both suboptimal enumerators keep their frontier and their finished
//! structures in one of these. Ties are broken by insertion order, so
//! iteration is deterministic. Inserting above the energy bound is a
//! no-op; inserting into a full set evicts the strictly worse maximum,
//! or drops the candidate if nothing is worse.

use std::collections::BTreeMap;

use tf_energy::Energy;

pub(crate) struct BoundedSet<V> {
    map: BTreeMap<(Energy, u64), V>,
    next_id: u64,
    capacity: usize,
    max_energy: Energy,
}

impl<V> BoundedSet<V> {
    pub fn new(capacity: usize, max_energy: Energy) -> Self {
        BoundedSet { map: BTreeMap::new(), next_id: 0, capacity, max_energy }
    }

    /// Returns true if the value was kept.
    pub fn insert(&mut self, energy: Energy, value: V) -> bool {
        if energy > self.max_energy {
            return false;
        }
        if self.map.len() >= self.capacity {
            match self.map.last_entry() {
                Some(worst) if worst.key().0 > energy => {
                    worst.remove();
                }
                _ => {}
            }
        }
        if self.map.len() < self.capacity {
            self.map.insert((energy, self.next_id), value);
            self.next_id += 1;
            true
        } else {
            false
        }
    }

    pub fn pop_first(&mut self) -> Option<(Energy, V)> {
        self.map.pop_first().map(|((energy, _), value)| (energy, value))
    }

    pub fn worst_energy(&self) -> Option<Energy> {
        self.map.last_key_value().map(|((energy, _), _)| *energy)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Values in ascending (energy, insertion) order.
    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.map.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_energy_then_insertion() {
        let mut s = BoundedSet::new(8, 100);
        s.insert(3, "a");
        s.insert(1, "b");
        s.insert(3, "c");
        assert_eq!(s.pop_first(), Some((1, "b")));
        assert_eq!(s.pop_first(), Some((3, "a")));
        assert_eq!(s.pop_first(), Some((3, "c")));
        assert_eq!(s.pop_first(), None);
    }

    #[test]
    fn test_rejects_above_bound() {
        let mut s = BoundedSet::new(8, 10);
        assert!(!s.insert(11, ()));
        assert!(s.insert(10, ()));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_evicts_strictly_worse_when_full() {
        let mut s = BoundedSet::new(2, 100);
        assert!(s.insert(5, "a"));
        assert!(s.insert(7, "b"));
        // Equal to the worst: dropped.
        assert!(!s.insert(7, "c"));
        // Better than the worst: evicts it.
        assert!(s.insert(2, "d"));
        assert_eq!(s.worst_energy(), Some(5));
        let vals: Vec<_> = s.into_values().collect();
        assert_eq!(vals, vec!["d", "a"]);
    }
}
