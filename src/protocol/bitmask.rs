//! Multiplexed button status decoding.
//!
//! One short-status value carries four buttons:
//! ```text
//!  bit:   4     3     2     1     0
//!        btn3  btn2  btn1  btn0  valid
//! ```
//! A button reads as pressed only when its own bit AND bit 0 are set.

/// Highest button index on one multiplexed value.
pub const MAX_BUTTON_INDEX: u8 = 3;

/// Whether button `index` (0..=3) is pressed in `value`.
///
/// Indices past the width of `value` read as released.
pub const fn is_bit_set(value: u32, index: u8) -> bool {
    match (value & 1).checked_shl(index as u32 + 1) {
        Some(current_bit) => value & current_bit != 0,
        None => false,
    }
}
