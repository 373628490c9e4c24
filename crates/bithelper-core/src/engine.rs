use std::ops::RangeInclusive;

use tracing::debug;

use crate::bits::BitVector;
use crate::codec::{from_hex, to_hex};
use crate::parse::Operation;
use crate::Error;

/// Smallest vector size, in bytes.
pub const MIN_BYTES: usize = 1;
/// Largest vector size, in bytes.
pub const MAX_BYTES: usize = 32;
/// Size of a fresh session, in bytes.
pub const DEFAULT_BYTES: usize = 4;

/// Owns the bit vector and applies operations to it.
///
/// Every operation validates its bounds before touching the vector, so a failed
/// operation leaves the state exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    bits: BitVector,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            bits: BitVector::zeroed(DEFAULT_BYTES * 8),
        }
    }
}

impl Engine {
    /// A zeroed engine of `bytes` bytes.
    pub fn new(bytes: usize) -> Result<Self, Error> {
        check_size(bytes)?;
        Ok(Self {
            bits: BitVector::zeroed(bytes * 8),
        })
    }

    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    pub fn size_bytes(&self) -> usize {
        self.bits.len() / 8
    }

    /// Current contents as uppercase hex, one digit per nibble.
    pub fn to_hex(&self) -> Result<String, Error> {
        to_hex(&self.bits)
    }

    pub fn apply(&mut self, op: &Operation) -> Result<(), Error> {
        match op {
            Operation::ToggleBit(pos) => {
                let pos = self.check_index(*pos)?;
                self.bits.toggle(pos..=pos);
            }
            Operation::SetBit(pos) => {
                let pos = self.check_index(*pos)?;
                self.bits.set(pos, true);
            }
            Operation::ClearBit(pos) => {
                let pos = self.check_index(*pos)?;
                self.bits.set(pos, false);
            }
            Operation::ToggleRange(lo, hi) => {
                let r = self.check_range(*lo, *hi)?;
                self.bits.toggle(r);
            }
            Operation::SetRange(lo, hi) => {
                let r = self.check_range(*lo, *hi)?;
                self.bits.fill(r, true);
            }
            Operation::ClearRange(lo, hi) => {
                let r = self.check_range(*lo, *hi)?;
                self.bits.fill(r, false);
            }
            Operation::StickySetRange(lo, hi) => {
                let r = self.check_range(*lo, *hi)?;
                let value = self.bits.any(r.clone(), false);
                self.bits.fill(r, value);
            }
            Operation::StickyClearRange(lo, hi) => {
                let r = self.check_range(*lo, *hi)?;
                let value = !self.bits.any(r.clone(), true);
                self.bits.fill(r, value);
            }
            Operation::Resize(bytes) => {
                check_size(*bytes)?;
                self.bits = BitVector::zeroed(bytes * 8);
            }
            Operation::Or(hex) => self.combine(hex, |a, b| a | b)?,
            Operation::Xor(hex) => self.combine(hex, |a, b| a ^ b)?,
            Operation::And(hex) => self.combine(hex, |a, b| a & b)?,
            Operation::SetAll => self.bits.set_all(true),
            Operation::ClearAll => self.bits.set_all(false),
            Operation::Invert => self.bits.invert(),
        }
        debug!(?op, bits = self.bits.len(), "applied operation");
        Ok(())
    }

    fn check_index(&self, pos: usize) -> Result<usize, Error> {
        if pos >= self.bits.len() {
            return Err(Error::IndexOutOfRange {
                index: pos,
                len: self.bits.len(),
            });
        }
        Ok(pos)
    }

    fn check_range(&self, x: usize, y: usize) -> Result<RangeInclusive<usize>, Error> {
        let (lo, hi) = (x.min(y), x.max(y));
        if hi >= self.bits.len() {
            return Err(Error::RangeOutOfBounds {
                hi,
                len: self.bits.len(),
            });
        }
        Ok(lo..=hi)
    }

    /// Left-pad `hex` to the vector's width and fold it in with `f`.
    fn combine(&mut self, hex: &str, f: impl Fn(bool, bool) -> bool) -> Result<(), Error> {
        let width = self.bits.len() / 4;
        let digits = hex.chars().count();
        if digits > width {
            return Err(Error::OperandTooLarge { digits, max: width });
        }
        let operand = from_hex(&format!("{hex:0>width$}"))?;
        if operand.len() != self.bits.len() {
            return Err(Error::UnalignedLength(operand.len()));
        }
        self.bits.combine(&operand, f);
        Ok(())
    }
}

fn check_size(bytes: usize) -> Result<(), Error> {
    if !(MIN_BYTES..=MAX_BYTES).contains(&bytes) {
        return Err(Error::InputOutOfRange(bytes));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(hex: &str) -> Engine {
        let mut eng = Engine::new(hex.len() / 2).unwrap();
        eng.apply(&Operation::Or(hex.to_string())).unwrap();
        eng
    }

    fn hex(eng: &Engine) -> String {
        eng.to_hex().unwrap()
    }

    #[test]
    fn new_validates_size() {
        assert_eq!(Engine::new(0), Err(Error::InputOutOfRange(0)));
        assert_eq!(Engine::new(33), Err(Error::InputOutOfRange(33)));
        assert_eq!(Engine::new(32).unwrap().bits().len(), 256);
        assert_eq!(Engine::default().size_bytes(), DEFAULT_BYTES);
    }

    #[test]
    fn single_bit_ops() {
        let mut eng = Engine::new(1).unwrap();
        eng.apply(&Operation::SetBit(7)).unwrap();
        eng.apply(&Operation::ToggleBit(0)).unwrap();
        assert_eq!(hex(&eng), "81");
        eng.apply(&Operation::ToggleBit(0)).unwrap();
        eng.apply(&Operation::ClearBit(7)).unwrap();
        assert_eq!(hex(&eng), "00");
    }

    #[test]
    fn index_past_end_leaves_vector_unchanged() {
        let mut eng = engine_with("A5A5");
        let before = eng.clone();
        let err = eng.apply(&Operation::ToggleBit(16)).unwrap_err();
        assert_eq!(err, Error::IndexOutOfRange { index: 16, len: 16 });
        assert_eq!(eng, before);
        assert!(eng.apply(&Operation::SetBit(100)).is_err());
        assert!(eng.apply(&Operation::ClearBit(16)).is_err());
        assert_eq!(eng, before);
    }

    #[test]
    fn range_ops_inclusive() {
        let mut eng = Engine::new(2).unwrap();
        eng.apply(&Operation::SetRange(4, 11)).unwrap();
        assert_eq!(hex(&eng), "0FF0");
        eng.apply(&Operation::ToggleRange(0, 7)).unwrap();
        assert_eq!(hex(&eng), "0F0F");
        eng.apply(&Operation::ClearRange(8, 15)).unwrap();
        assert_eq!(hex(&eng), "000F");
    }

    #[test]
    fn range_order_does_not_matter() {
        for (lo, hi) in [(0, 5), (3, 12), (9, 9), (0, 15)] {
            let mut a = Engine::new(2).unwrap();
            let mut b = Engine::new(2).unwrap();
            a.apply(&Operation::SetRange(lo, hi)).unwrap();
            b.apply(&Operation::SetRange(hi, lo)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn range_past_end_leaves_vector_unchanged() {
        let mut eng = engine_with("00FF");
        let before = eng.clone();
        let err = eng.apply(&Operation::SetRange(20, 3)).unwrap_err();
        assert_eq!(err, Error::RangeOutOfBounds { hi: 20, len: 16 });
        assert!(eng.apply(&Operation::StickySetRange(0, 16)).is_err());
        assert_eq!(eng, before);
    }

    #[test]
    fn sticky_set_toggles_uniform_range() {
        let mut eng = Engine::new(1).unwrap();
        eng.apply(&Operation::SetBit(5)).unwrap();
        eng.apply(&Operation::StickySetRange(4, 7)).unwrap();
        assert_eq!(hex(&eng), "F0");
        eng.apply(&Operation::StickySetRange(4, 7)).unwrap();
        assert_eq!(hex(&eng), "00");
        eng.apply(&Operation::StickySetRange(7, 4)).unwrap();
        assert_eq!(hex(&eng), "F0");
    }

    #[test]
    fn sticky_clear_toggles_uniform_range() {
        let mut eng = engine_with("FF");
        eng.apply(&Operation::ClearBit(1)).unwrap();
        eng.apply(&Operation::StickyClearRange(0, 3)).unwrap();
        assert_eq!(hex(&eng), "F0");
        eng.apply(&Operation::StickyClearRange(0, 3)).unwrap();
        assert_eq!(hex(&eng), "FF");
        eng.apply(&Operation::StickyClearRange(0, 3)).unwrap();
        assert_eq!(hex(&eng), "F0");
    }

    #[test]
    fn resize_discards_contents() {
        let mut eng = engine_with("FFFFFFFF");
        eng.apply(&Operation::Resize(3)).unwrap();
        assert_eq!(eng.bits().len(), 24);
        assert_eq!(eng.bits().count_ones(), 0);
        assert_eq!(hex(&eng), "000000");
    }

    #[test]
    fn resize_out_of_domain_is_rejected() {
        let mut eng = engine_with("FF");
        assert_eq!(eng.apply(&Operation::Resize(0)), Err(Error::InputOutOfRange(0)));
        assert_eq!(eng.apply(&Operation::Resize(33)), Err(Error::InputOutOfRange(33)));
        assert_eq!(hex(&eng), "FF");
    }

    #[test]
    fn operands_are_left_padded() {
        let mut eng = Engine::new(4).unwrap();
        eng.apply(&Operation::Or("1".into())).unwrap();
        assert_eq!(hex(&eng), "00000001");
        eng.apply(&Operation::Xor("ff".into())).unwrap();
        assert_eq!(hex(&eng), "000000FE");
        eng.apply(&Operation::Or("A0000000".into())).unwrap();
        eng.apply(&Operation::And("F00000F0".into())).unwrap();
        assert_eq!(hex(&eng), "A00000F0");
    }

    #[test]
    fn operand_wider_than_vector_is_rejected() {
        let mut eng = engine_with("0F");
        let err = eng.apply(&Operation::Or("100".into())).unwrap_err();
        assert_eq!(err, Error::OperandTooLarge { digits: 3, max: 2 });
        assert_eq!(hex(&eng), "0F");
    }

    #[test]
    fn undecodable_operand_is_reported() {
        let mut eng = engine_with("0F");
        assert_eq!(eng.apply(&Operation::Xor("1٣".into())), Err(Error::HexDecodeFailure));
        assert_eq!(hex(&eng), "0F");
    }

    #[test]
    fn whole_vector_ops() {
        let mut eng = engine_with("0F");
        eng.apply(&Operation::Invert).unwrap();
        assert_eq!(hex(&eng), "F0");
        eng.apply(&Operation::SetAll).unwrap();
        assert_eq!(hex(&eng), "FF");
        eng.apply(&Operation::ClearAll).unwrap();
        assert_eq!(hex(&eng), "00");
    }
}
