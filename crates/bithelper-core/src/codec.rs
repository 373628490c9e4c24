use crate::bits::BitVector;
use crate::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render `bits` as uppercase hex, most significant nibble first.
///
/// The highest index is the top bit of the first digit. Fails when the length is
/// not a whole number of nibbles.
pub fn to_hex(bits: &BitVector) -> Result<String, Error> {
    if bits.len() % 4 != 0 {
        return Err(Error::UnalignedLength(bits.len()));
    }
    let mut out = String::with_capacity(bits.len() / 4);
    let mut nibble = 0usize;
    for (i, b) in bits.iter().enumerate().rev() {
        nibble = (nibble << 1) | usize::from(b);
        if i % 4 == 0 {
            out.push(char::from(HEX_DIGITS[nibble]));
            nibble = 0;
        }
    }
    Ok(out)
}

/// Decode a hex string into a bit vector of `4 * hex.len()` bits.
///
/// The leftmost digit lands in the highest four indices. Digits are
/// case-insensitive; anything else is a [`Error::HexDecodeFailure`].
pub fn from_hex(hex: &str) -> Result<BitVector, Error> {
    let nibbles = hex
        .chars()
        .map(|c| c.to_digit(16).ok_or(Error::HexDecodeFailure))
        .collect::<Result<Vec<u32>, Error>>()?;

    // Lowest index first: walk digits right to left, each from bit 0 to bit 3.
    Ok(nibbles
        .iter()
        .rev()
        .flat_map(|&n| (0..4).map(move |k| n & (1 << k) != 0))
        .collect())
}

/// Group a hex string with `_` every four digits, counting from the right.
///
/// Strings whose length is two past a group boundary get an `xx` marker in front
/// so the leading half group lines up with the others.
pub fn format_display(hex: &str) -> String {
    let n = hex.chars().count();
    let mut out = String::with_capacity(n + n / 4 + 2);
    if n % 4 == 2 {
        out.push_str("xx");
    }
    for (i, c) in hex.chars().enumerate() {
        if i > 0 && (n - i) % 4 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}
