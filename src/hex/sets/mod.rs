mod bitset;

pub use bitset::{Bitset, BitsetIterator};

/// Common set operations shared by every fixed-capacity bitset in this crate.
///
/// WARNING: it is highly recommended that `len` is constant time, since it is
/// used internally to back optimizations on the pairwise set operations (e.g.
/// choosing the smaller operand first in an intersection).
pub trait SetOps {
    fn contains(&self, value: usize) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> BitsetIterator<'_>;

    fn insert(&mut self, value: usize) -> &mut Self;

    fn remove(&mut self, value: usize) -> &mut Self;

    fn intersect(&self, other: &Self) -> Self;

    fn intersect_inplace(&mut self, other: &Self) -> &mut Self;

    fn union(&self, other: &Self) -> Self;

    fn union_inplace(&mut self, other: &Self) -> &mut Self;

    fn difference(&self, other: &Self) -> Self;

    fn difference_inplace(&mut self, other: &Self) -> &mut Self;

    fn intersects(&self, other: &Self) -> bool;
}
