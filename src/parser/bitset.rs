use std::fmt::{self, Debug, Formatter};

type BitBlock = u64;

const BLOCK_NBITS: usize = std::mem::size_of::<BitBlock>() * 8;

/// Fixed-capacity set of small integers, used for lookahead sets.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct BitSet {
  slice: Box<[BitBlock]>,
}

impl BitSet {
  pub(crate) fn new(num_bits: usize) -> Self {
    let len = (num_bits + BLOCK_NBITS - 1) / BLOCK_NBITS;
    Self {
      slice: vec![0; len].into_boxed_slice(),
    }
  }

  pub(crate) fn clear(&mut self) {
    for x in self.slice.iter_mut() {
      *x = 0;
    }
  }

  /// Returns whether the bit was newly inserted.
  pub(crate) fn insert(&mut self, bit: usize) -> bool {
    let block = &mut self.slice[bit / BLOCK_NBITS];
    let mask = 1 << (bit % BLOCK_NBITS);
    let fresh = *block & mask == 0;
    *block |= mask;
    fresh
  }

  /// Returns whether the set has changed.
  pub(crate) fn union_with(&mut self, other: &BitSet) -> bool {
    let mut changed = false;
    for (x, &y) in self.slice.iter_mut().zip(other.slice.iter()) {
      let old = *x;
      *x |= y;
      changed |= old != *x;
    }
    changed
  }

  #[cfg(test)]
  pub(crate) fn contains(&self, bit: usize) -> bool {
    self.slice[bit / BLOCK_NBITS] & (1 << (bit % BLOCK_NBITS)) != 0
  }

  pub(crate) fn iter(&self) -> Iter {
    Iter {
      slice: &*self.slice,
      bit: 0,
      index: 0,
    }
  }
}

pub(crate) struct Iter<'a> {
  slice: &'a [BitBlock],
  bit: usize,
  index: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    while self.index < self.slice.len() {
      if self.bit < BLOCK_NBITS {
        let bit = (self.slice[self.index] & !((1 << self.bit) - 1))
          .trailing_zeros() as usize;
        if bit < BLOCK_NBITS {
          self.bit = bit + 1;
          return Some(self.index * BLOCK_NBITS + bit);
        }
      }

      self.index += 1;
      self.bit = 0;
    }
    None
  }
}

impl Debug for BitSet {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter()).finish()
  }
}
