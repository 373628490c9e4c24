use std::ops::RangeInclusive;

/// An ordered sequence of bits; index 0 is the least-significant bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitVector {
    bits: Vec<bool>,
}

impl BitVector {
    /// A vector of `len` cleared bits.
    pub fn zeroed(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    pub(crate) fn fill(&mut self, range: RangeInclusive<usize>, value: bool) {
        self.bits[range].fill(value);
    }

    pub(crate) fn toggle(&mut self, range: RangeInclusive<usize>) {
        for b in &mut self.bits[range] {
            *b = !*b;
        }
    }

    pub(crate) fn any(&self, range: RangeInclusive<usize>, value: bool) -> bool {
        self.bits[range].iter().any(|&b| b == value)
    }

    pub(crate) fn set_all(&mut self, value: bool) {
        self.bits.fill(value);
    }

    pub(crate) fn invert(&mut self) {
        for b in &mut self.bits {
            *b = !*b;
        }
    }

    /// Combine `other` into `self` index by index. Both vectors must be the same length.
    pub(crate) fn combine(&mut self, other: &BitVector, f: impl Fn(bool, bool) -> bool) {
        for (a, &b) in self.bits.iter_mut().zip(&other.bits) {
            *a = f(*a, b);
        }
    }

    /// Bits from index 0 upward.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = bool> + ExactSizeIterator + '_ {
        self.bits.iter().copied()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}
