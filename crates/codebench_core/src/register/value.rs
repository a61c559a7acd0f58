//! 128-bit register storage with radix-aware parsing and formatting.

use super::{RegisterFormat, RegisterKind};
use crate::constants::INACCESSIBLE_REGISTER_TEXT;

/// Raw register content: an unsigned 128-bit integer kept as two words.
///
/// `known == false` marks a register the debugger could not read. Equality
/// only compares the bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegisterValue {
    low: u64,
    high: u64,
    known: bool,
}

impl PartialEq for RegisterValue {
    fn eq(&self, other: &Self) -> bool {
        self.low == other.low && self.high == other.high
    }
}

impl Eq for RegisterValue {}

impl RegisterValue {
    /// Build a readable value from its two words.
    pub fn from_words(low: u64, high: u64) -> Self {
        Self {
            low,
            high,
            known: true,
        }
    }

    /// Build a readable value that fits in the low word.
    pub fn from_u64(low: u64) -> Self {
        Self::from_words(low, 0)
    }

    /// Low 64 bits.
    pub fn low(&self) -> u64 {
        self.low
    }

    /// High 64 bits.
    pub fn high(&self) -> u64 {
        self.high
    }

    /// Whether the debugger could read this value.
    pub fn is_known(&self) -> bool {
        self.known
    }

    /// Value interpreted as a memory address.
    pub fn address(&self) -> u64 {
        self.low
    }

    /// Both words joined into one `u128`.
    pub fn as_u128(&self) -> u128 {
        (u128::from(self.high) << 64) | u128::from(self.low)
    }

    /// Parse register text in the given radix.
    ///
    /// An optional `0x` prefix and then an optional `-` are skipped. Parsing
    /// stops silently at the first character that is not a hex digit, so
    /// malformed input yields a partial value. For
    /// [`RegisterFormat::Character`] every character code is shifted in as
    /// one byte. `known` reflects whether `text` was non-empty.
    pub fn parse(text: &str, format: RegisterFormat) -> Self {
        let mut value = Self {
            known: !text.is_empty(),
            ..Self::default()
        };

        let mut rest = text.strip_prefix("0x").unwrap_or(text);
        let negative = rest.starts_with('-');
        if negative {
            rest = &rest[1..];
        }

        for ch in rest.chars() {
            let digit = if format == RegisterFormat::Character {
                u64::from(u32::from(ch))
            } else {
                match ch.to_digit(16) {
                    Some(digit) => u64::from(digit),
                    None => break,
                }
            };
            value.shift_one_digit(digit, format);
        }

        if negative {
            value.negate();
        }
        value
    }

    /// Render the value for display (`for_editing == false`) or for an edit
    /// field.
    ///
    /// Unknown values always render as `[inaccessible]`. Float registers of
    /// 4 or 8 bytes reinterpret the low bits as IEEE-754. Values wider than
    /// eight bytes render the high word first, separated by `,` unless the
    /// format is hexadecimal. Edit text carries no space padding.
    pub fn to_text(
        &self,
        kind: RegisterKind,
        size: usize,
        format: RegisterFormat,
        for_editing: bool,
    ) -> String {
        if !self.known {
            return INACCESSIBLE_REGISTER_TEXT.to_string();
        }
        if kind == RegisterKind::Float {
            if size == 4 {
                return f32::from_bits(self.low as u32).to_string();
            }
            if size == 8 {
                return f64::from_bits(self.low).to_string();
            }
        }

        let mut result = String::new();
        let mut size = size;
        if size > 8 {
            result.push_str(&format_word(self.high, size - 8, format, for_editing));
            size = 8;
            if format != RegisterFormat::Hexadecimal {
                result.push(',');
            }
        }
        result.push_str(&format_word(self.low, size, format, for_editing));
        result
    }

    /// Extract element `index` of a little-endian array of `size`-byte
    /// elements. Only sizes 1, 2, 4 and 8 are supported; anything else, or an
    /// index past the end, yields zero.
    pub fn sub_value(&self, size: usize, index: usize) -> Self {
        let mut value = Self {
            known: self.known,
            ..Self::default()
        };
        let Some(range) = element_range(size, index) else {
            return value;
        };
        let bytes = self.to_le_bytes();
        let mut word = [0u8; 8];
        word[..size].copy_from_slice(&bytes[range]);
        value.low = u64::from_le_bytes(word);
        value
    }

    /// Overwrite element `index` with the low `size` bytes of `sub`.
    ///
    /// Unsupported sizes and out-of-range indices leave the value untouched.
    pub fn set_sub_value(&mut self, size: usize, index: usize, sub: RegisterValue) {
        let Some(range) = element_range(size, index) else {
            return;
        };
        let mut bytes = self.to_le_bytes();
        bytes[range].copy_from_slice(&sub.low.to_le_bytes()[..size]);
        self.set_le_bytes(bytes);
    }

    fn to_le_bytes(self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.low.to_le_bytes());
        bytes[8..].copy_from_slice(&self.high.to_le_bytes());
        bytes
    }

    fn set_le_bytes(&mut self, bytes: [u8; 16]) {
        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        low.copy_from_slice(&bytes[..8]);
        high.copy_from_slice(&bytes[8..]);
        self.low = u64::from_le_bytes(low);
        self.high = u64::from_le_bytes(high);
    }

    // `amount` stays within 1..=8.
    fn shift_bits_left(&mut self, amount: u32) {
        self.high = (self.high << amount) | (self.low >> (64 - amount));
        self.low <<= amount;
    }

    fn add_with_carry(&mut self, low: u64, high: u64) {
        let (sum, carry) = self.low.overflowing_add(low);
        self.low = sum;
        self.high = self
            .high
            .wrapping_add(high)
            .wrapping_add(u64::from(carry));
    }

    fn negate(&mut self) {
        self.low = !self.low;
        self.high = !self.high;
        self.add_with_carry(1, 0);
    }

    fn shift_one_digit(&mut self, digit: u64, format: RegisterFormat) {
        match format {
            RegisterFormat::Hexadecimal => {
                self.shift_bits_left(4);
                self.low |= digit;
            }
            RegisterFormat::Octal => {
                self.shift_bits_left(3);
                self.low |= digit;
            }
            RegisterFormat::Binary => {
                self.shift_bits_left(1);
                self.low |= digit;
            }
            RegisterFormat::Decimal | RegisterFormat::SignedDecimal => {
                // x * 10 == (x << 1) + (x << 3)
                self.shift_bits_left(1);
                let (doubled_low, doubled_high) = (self.low, self.high);
                self.shift_bits_left(2);
                self.add_with_carry(doubled_low, doubled_high);
                self.add_with_carry(digit, 0);
            }
            RegisterFormat::Character => {
                self.shift_bits_left(8);
                self.low |= digit;
            }
        }
    }
}

fn element_range(size: usize, index: usize) -> Option<std::ops::Range<usize>> {
    if !matches!(size, 1 | 2 | 4 | 8) {
        return None;
    }
    let start = size.checked_mul(index)?;
    let end = start.checked_add(size)?;
    (end <= 16).then_some(start..end)
}

fn sign_extend(word: u64, size: usize) -> i64 {
    if size >= 8 {
        word as i64
    } else if size >= 4 {
        i64::from(word as u32 as i32)
    } else if size >= 2 {
        i64::from(word as u16 as i16)
    } else {
        i64::from(word as u8 as i8)
    }
}

// Edit text has no space padding; zero-padded radices keep their digits.
fn format_word(word: u64, size: usize, format: RegisterFormat, for_editing: bool) -> String {
    let width = if for_editing { 0 } else { 2 * size };
    match format {
        RegisterFormat::Hexadecimal => format!("{word:0digits$x}", digits = 2 * size),
        RegisterFormat::Decimal => format!("{word:>width$}"),
        RegisterFormat::SignedDecimal => format!("{:>width$}", sign_extend(word, size)),
        RegisterFormat::Binary => format!("{word:0bits$b}", bits = 8 * size),
        RegisterFormat::Octal => format!("{word:0digits$o}", digits = (8 * size).div_ceil(3)),
        RegisterFormat::Character => {
            if !(32..127).contains(&word) {
                if for_editing {
                    return String::new();
                }
                return format!("{:>width$}", "   ");
            }
            let ch = char::from(word as u8);
            let text = if for_editing {
                ch.to_string()
            } else {
                format!("'{ch}'")
            };
            format!("{text:>width$}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_carries_into_high_word() {
        let mut value = RegisterValue::from_words(0x8000_0000_0000_0001, 0);
        value.shift_bits_left(1);
        assert_eq!(value.low(), 2);
        assert_eq!(value.high(), 1);
    }

    #[test]
    fn add_with_carry_wraps_at_128_bits() {
        let mut value = RegisterValue::from_words(u64::MAX, u64::MAX);
        value.add_with_carry(1, 0);
        assert_eq!((value.low(), value.high()), (0, 0));
    }

    #[test]
    fn negate_is_twos_complement() {
        let mut value = RegisterValue::from_u64(1);
        value.negate();
        assert_eq!(value.as_u128(), u128::MAX);
        value.negate();
        assert_eq!(value.as_u128(), 1);
    }

    #[test]
    fn element_range_rejects_odd_sizes_and_overflow() {
        assert_eq!(element_range(4, 3), Some(12..16));
        assert_eq!(element_range(4, 4), None);
        assert_eq!(element_range(3, 0), None);
        assert_eq!(element_range(8, usize::MAX), None);
    }

    #[test]
    fn sign_extend_picks_width_from_size() {
        assert_eq!(sign_extend(0xff, 1), -1);
        assert_eq!(sign_extend(0xffff, 2), -1);
        assert_eq!(sign_extend(0xffff, 4), 65_535);
        assert_eq!(sign_extend(0xffff_ffff, 4), -1);
        assert_eq!(sign_extend(u64::MAX, 8), -1);
    }
}
