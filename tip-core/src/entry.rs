//! Bill amount entry buffer driven by the numeric keypad.
//!
//! The buffer is a calculator tape: typed digits are always read as cents,
//! so `1`, `2`, `3` shows `1.23`, and every new digit shifts the value one
//! place left while Delete shifts it one place right. The decimal key only
//! marks the amount as having a point; the displayed amount always has one,
//! so the mark never changes how the digits are read.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{MAX_ENTRY_DIGITS, MIN_ENTRY_DIGITS};

/// Digits typed for the amount being entered, read as cents.
///
/// `digits` holds only ASCII digits and never starts with `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBuffer {
    digits: String,
    point: bool,
    max_digits: usize,
}

impl Default for EntryBuffer {
    fn default() -> Self {
        Self::new(MAX_ENTRY_DIGITS)
    }
}

impl EntryBuffer {
    /// Creates an empty buffer. `max_digits` is clamped to the supported range.
    pub fn new(max_digits: usize) -> Self {
        Self {
            digits: String::new(),
            point: false,
            max_digits: max_digits.clamp(MIN_ENTRY_DIGITS, MAX_ENTRY_DIGITS),
        }
    }

    /// The typed digits, without the point mark.
    pub fn raw(&self) -> &str {
        &self.digits
    }

    pub fn max_digits(&self) -> usize {
        self.max_digits
    }

    pub fn is_blank(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn has_decimal_point(&self) -> bool {
        self.point
    }

    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Shifts a digit onto the tape. Returns `false` when nothing changed: the
    /// digit is out of range, the buffer is full, or it is a leading zero.
    pub fn push_digit(
        &mut self,
        digit: u8,
    ) -> bool {
        if digit > 9 {
            debug!(digit, "ignoring non-decimal digit");
            return false;
        }
        if self.digit_count() >= self.max_digits {
            debug!(max_digits = self.max_digits, "entry buffer full");
            return false;
        }
        if digit == 0 && self.is_blank() {
            return false;
        }
        self.digits.push(char::from(b'0' + digit));
        true
    }

    /// Marks the amount as having a decimal point when the buffer is
    /// non-blank and not yet marked. The value is unchanged either way.
    pub fn push_decimal_point(&mut self) -> bool {
        if self.is_blank() || self.point {
            return false;
        }
        self.point = true;
        true
    }

    /// Drops the last digit, dividing the value by ten (truncating to cents).
    pub fn pop(&mut self) -> bool {
        let popped = self.digits.pop().is_some();
        if self.digits.is_empty() {
            self.point = false;
        }
        popped
    }

    pub fn clear(&mut self) {
        self.digits.clear();
        self.point = false;
    }

    /// The amount on the tape. `None` when blank.
    pub fn parse(&self) -> Option<Decimal> {
        if self.is_blank() {
            return None;
        }
        self.digits
            .parse::<i64>()
            .ok()
            .map(|cents| Decimal::new(cents, 2))
    }

    /// Current value, zero when blank.
    pub fn value(&self) -> Decimal {
        self.parse().unwrap_or(Decimal::ZERO)
    }

    /// Validates the tape for Confirm and marks it as a finished amount.
    /// The digits stay on the tape, so later digits keep shifting it.
    /// Returns `None` and changes nothing when the buffer is blank.
    pub fn commit(&mut self) -> Option<Decimal> {
        let value = self.parse()?;
        self.point = true;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn typed(keys: &[u8]) -> EntryBuffer {
        let mut buffer = EntryBuffer::default();
        for &key in keys {
            buffer.push_digit(key);
        }
        buffer
    }

    // =========================================================================
    // tape entry
    // =========================================================================

    #[test]
    fn digits_shift_in_as_cents() {
        let buffer = typed(&[1, 2, 3]);

        assert_eq!(buffer.value(), dec!(1.23));
    }

    #[test]
    fn each_digit_shifts_previous_value() {
        let mut buffer = EntryBuffer::default();
        let mut expected = Decimal::ZERO;

        for digit in [4u8, 0, 7, 9, 1] {
            buffer.push_digit(digit);
            expected = expected * dec!(10) + Decimal::new(i64::from(digit), 2);
            assert_eq!(buffer.value(), expected);
        }
    }

    #[test]
    fn leading_zero_is_ignored() {
        let mut buffer = EntryBuffer::default();

        assert!(!buffer.push_digit(0));
        assert!(buffer.is_blank());
        assert!(buffer.push_digit(5));
        assert!(buffer.push_digit(0));
        assert_eq!(buffer.value(), dec!(0.50));
    }

    #[test]
    fn digit_above_nine_is_rejected() {
        let mut buffer = EntryBuffer::default();

        assert!(!buffer.push_digit(10));
        assert!(buffer.is_blank());
    }

    #[test]
    fn buffer_stops_at_max_digits() {
        let mut buffer = EntryBuffer::new(8);
        for _ in 0..8 {
            assert!(buffer.push_digit(9));
        }

        assert!(!buffer.push_digit(1));
        assert_eq!(buffer.digit_count(), 8);
        assert_eq!(buffer.value(), dec!(999999.99));
    }

    #[test]
    fn full_tape_at_largest_cap_parses() {
        let mut buffer = EntryBuffer::new(MAX_ENTRY_DIGITS);
        for _ in 0..MAX_ENTRY_DIGITS {
            buffer.push_digit(9);
        }

        assert_eq!(buffer.value(), dec!(99999999.99));
    }

    #[test]
    fn max_digits_is_clamped() {
        assert_eq!(EntryBuffer::new(3).max_digits(), MIN_ENTRY_DIGITS);
        assert_eq!(EntryBuffer::new(40).max_digits(), MAX_ENTRY_DIGITS);
    }

    // =========================================================================
    // delete
    // =========================================================================

    #[test]
    fn pop_after_digit_restores_prior_value() {
        let mut buffer = typed(&[5, 2, 8]);
        let before = buffer.value();

        buffer.push_digit(6);
        buffer.pop();

        assert_eq!(buffer.value(), before);
    }

    #[test]
    fn pop_divides_tape_by_ten() {
        let mut buffer = typed(&[1, 2, 3]);

        buffer.pop();

        assert_eq!(buffer.value(), dec!(0.12));
    }

    #[test]
    fn pop_after_decimal_point_still_divides_by_ten() {
        let mut buffer = typed(&[1, 2]);
        buffer.push_decimal_point();
        buffer.push_digit(5);
        assert_eq!(buffer.value(), dec!(1.25));

        buffer.pop();
        assert_eq!(buffer.value(), dec!(0.12));

        buffer.pop();
        assert_eq!(buffer.value(), dec!(0.01));
    }

    #[test]
    fn pop_to_blank_drops_point_mark() {
        let mut buffer = typed(&[7]);
        buffer.push_decimal_point();

        buffer.pop();

        assert!(buffer.is_blank());
        assert!(!buffer.has_decimal_point());
    }

    #[test]
    fn pop_on_blank_is_noop() {
        let mut buffer = EntryBuffer::default();

        assert!(!buffer.pop());
        assert_eq!(buffer.value(), Decimal::ZERO);
    }

    // =========================================================================
    // decimal point
    // =========================================================================

    #[test]
    fn decimal_point_needs_a_digit_first() {
        let mut buffer = EntryBuffer::default();

        assert!(!buffer.push_decimal_point());
        assert!(!buffer.has_decimal_point());
    }

    #[test]
    fn decimal_point_is_idempotent() {
        let mut buffer = typed(&[1, 2]);

        assert!(buffer.push_decimal_point());
        let once = buffer.clone();
        assert!(!buffer.push_decimal_point());

        assert_eq!(buffer, once);
    }

    #[test]
    fn decimal_point_leaves_value_alone() {
        let mut buffer = typed(&[1, 2]);

        buffer.push_decimal_point();

        assert_eq!(buffer.value(), dec!(0.12));
        assert_eq!(buffer.raw(), "12");
    }

    #[test]
    fn digits_after_point_keep_shifting() {
        let mut buffer = typed(&[3]);
        buffer.push_decimal_point();
        buffer.push_digit(0);
        buffer.push_digit(5);

        assert_eq!(buffer.value(), dec!(3.05));
    }

    // =========================================================================
    // parse / commit
    // =========================================================================

    #[test]
    fn parse_blank_is_none() {
        assert_eq!(EntryBuffer::default().parse(), None);
    }

    #[test]
    fn commit_keeps_tape_value() {
        let mut buffer = typed(&[1, 2, 3]);

        let value = buffer.commit();

        assert_eq!(value, Some(dec!(1.23)));
        assert_eq!(buffer.raw(), "123");
        assert_eq!(buffer.value(), dec!(1.23));
    }

    #[test]
    fn digit_after_commit_shifts_tape() {
        let mut buffer = typed(&[1, 2, 3]);
        buffer.commit();

        buffer.push_digit(4);

        assert_eq!(buffer.value(), dec!(12.34));
    }

    #[test]
    fn commit_on_blank_leaves_buffer_untouched() {
        let mut buffer = EntryBuffer::default();

        assert_eq!(buffer.commit(), None);
        assert!(buffer.is_blank());
        assert!(!buffer.has_decimal_point());
    }
}
