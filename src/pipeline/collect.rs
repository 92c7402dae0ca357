//! Ordered result collection.
//!
//! Chunk transforms finish in any order. [`OrderedSlots`] holds one slot per
//! chunk index; each completion fills exactly its own slot and the values are
//! only handed out, in index order, once every slot is filled.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot {index} is out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },

    #[error("slot {index} was already filled")]
    AlreadyFilled { index: usize },

    #[error("{missing} of {capacity} slots are still empty")]
    Incomplete { missing: usize, capacity: usize },
}

/// A fixed-size, write-once slot array.
#[derive(Debug)]
pub struct OrderedSlots<T> {
    slots: Vec<Option<T>>,
    filled: usize,
}

impl<T> OrderedSlots<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.slots.len()
    }

    /// Store `value` at `index`. A slot can be written once.
    pub fn fill(&mut self, index: usize, value: T) -> Result<(), SlotError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SlotError::OutOfRange { index, capacity })?;
        if slot.is_some() {
            return Err(SlotError::AlreadyFilled { index });
        }
        *slot = Some(value);
        self.filled += 1;
        Ok(())
    }

    /// All values in index order. Fails while any slot is empty.
    pub fn into_ordered(self) -> Result<Vec<T>, SlotError> {
        if !self.is_complete() {
            return Err(SlotError::Incomplete {
                missing: self.capacity() - self.filled,
                capacity: self.capacity(),
            });
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn fill_in(order: &[usize]) -> Vec<String> {
        let mut slots = OrderedSlots::new(order.len());
        for &i in order {
            slots.fill(i, format!("s{i}")).unwrap();
        }
        slots.into_ordered().unwrap()
    }

    #[test]
    fn empty_store_is_complete() {
        let slots: OrderedSlots<String> = OrderedSlots::new(0);
        assert_eq!(slots.capacity(), 0);
        assert!(slots.is_complete());
        assert!(slots.into_ordered().unwrap().is_empty());
    }

    #[test]
    fn completion_order_does_not_matter() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for n in [1, 2, 3, 8, 33] {
            let forward: Vec<usize> = (0..n).collect();
            let reversed: Vec<usize> = (0..n).rev().collect();
            let mut shuffled = forward.clone();
            shuffled.shuffle(&mut rng);

            let expected = fill_in(&forward);
            assert_eq!(fill_in(&reversed), expected, "n = {n}");
            assert_eq!(fill_in(&shuffled), expected, "n = {n}");
        }
    }

    #[test]
    fn slots_are_write_once() {
        let mut slots = OrderedSlots::new(2);
        slots.fill(1, "a").unwrap();
        assert_eq!(slots.fill(1, "b"), Err(SlotError::AlreadyFilled { index: 1 }));
        assert_eq!(slots.filled(), 1);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut slots = OrderedSlots::new(2);
        assert_eq!(
            slots.fill(2, ()),
            Err(SlotError::OutOfRange {
                index: 2,
                capacity: 2
            })
        );
    }

    #[test]
    fn incomplete_store_cannot_be_read() {
        let mut slots = OrderedSlots::new(3);
        slots.fill(0, 'a').unwrap();
        assert_eq!((slots.filled(), slots.capacity()), (1, 3));
        assert_eq!(
            slots.into_ordered(),
            Err(SlotError::Incomplete {
                missing: 2,
                capacity: 3
            })
        );
    }
}
