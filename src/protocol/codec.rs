//! XTalk text-frame codec.
//!
//! Inbound grammar (letters case-insensitive), tried in order:
//! ```text
//! X ddd A [ d{0,3} ]        short status       → Addressable{Short}
//! X ddd B [ .{0,30} ]       long status        → Addressable{Long}
//! X R [ (PU|PB) ddd ]       antenna announce   → Antenna
//! ```
//!
//! `.` in the long shape is any char except a line break (`\r`, `\n`),
//! which cannot sit inside a line-delimited frame.
//!
//! Outbound frames are the two poll requests a device may write:
//! `X{addr:03}A[]` and `X{addr:03}B[]`.
//!
//! Frames arrive already split by the transport; nothing here buffers.

use core::fmt::Write;

use crate::error::DecodeError;

use super::command::{
    AddressableCommand, AntennaAction, AntennaCommand, Command, CommandKind, Format,
    MAX_LONG_PAYLOAD_CHARS, Payload,
};

/// Highest address the 3-digit field can carry.
pub const MAX_ADDRESS: u16 = 999;

/// Number of tag slots on one antenna reader.
pub const TAG_SLOTS: usize = 4;

/// Outbound frame buffer. `X999B[]` is the longest request.
pub type RequestFrame = heapless::String<16>;

/// Header shared by both addressed shapes: `X` + 3 digits + format letter + `[`.
const ADDRESSED_HEADER_LEN: usize = 6;

const SHORT_MAX_DIGITS: usize = 3;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode one text frame.
///
/// Total over `&str`: every input yields a command or a [`DecodeError`].
pub fn decode(frame: &str) -> Result<Command, DecodeError> {
    if frame.is_empty() {
        return Err(DecodeError::Empty);
    }

    decode_short(frame)
        .or_else(|| decode_long(frame))
        .or_else(|| decode_antenna(frame))
        .ok_or(DecodeError::Unrecognized)
}

fn decode_short(frame: &str) -> Option<Command> {
    let address = addressed_header(frame, b'A')?;
    let digits = frame.as_bytes().get(ADDRESSED_HEADER_LEN..frame.len() - 1)?;

    if digits.len() > SHORT_MAX_DIGITS || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    // Digits are ASCII, so the byte range is a char range.
    let payload = payload_from(&frame[ADDRESSED_HEADER_LEN..frame.len() - 1])?;
    Some(addressed(address, Format::Short, payload))
}

/// Up to 30 chars of anything but `\r` or `\n` between the brackets.
fn decode_long(frame: &str) -> Option<Command> {
    let address = addressed_header(frame, b'B')?;
    // The header and the trailing `]` are ASCII, so both ends are char boundaries.
    let contents = frame.get(ADDRESSED_HEADER_LEN..frame.len() - 1)?;

    let mut count = 0;
    for c in contents.chars() {
        if c == '\n' || c == '\r' {
            return None;
        }
        count += 1;
        if count > MAX_LONG_PAYLOAD_CHARS {
            return None;
        }
    }

    Some(addressed(address, Format::Long, payload_from(contents)?))
}

fn decode_antenna(frame: &str) -> Option<Command> {
    let b = frame.as_bytes();
    if b.len() != 9
        || !b[0].eq_ignore_ascii_case(&b'X')
        || !b[1].eq_ignore_ascii_case(&b'R')
        || b[2] != b'['
        || !b[3].eq_ignore_ascii_case(&b'P')
        || b[8] != b']'
    {
        return None;
    }

    let action = match b[4].to_ascii_uppercase() {
        b'U' => AntennaAction::PickUp,
        b'B' => AntennaAction::PickDown,
        _ => return None,
    };
    let tag_slot = parse_digits(&b[5..8])?;

    Some(Command::Antenna(AntennaCommand { action, tag_slot }))
}

/// Validate `X ddd <format> [ ... ]` and return the address.
fn addressed_header(frame: &str, format: u8) -> Option<u16> {
    let b = frame.as_bytes();
    if b.len() < ADDRESSED_HEADER_LEN + 1
        || !b[0].eq_ignore_ascii_case(&b'X')
        || !b[4].eq_ignore_ascii_case(&format)
        || b[5] != b'['
        || b[b.len() - 1] != b']'
    {
        return None;
    }
    parse_digits(&b[1..4])
}

/// Numeric value of an all-digit field. Leading zeros fall away naturally.
fn parse_digits(digits: &[u8]) -> Option<u16> {
    digits.iter().try_fold(0u16, |acc, d| {
        d.is_ascii_digit().then(|| acc * 10 + u16::from(d - b'0'))
    })
}

fn payload_from(s: &str) -> Option<Payload> {
    let mut payload = Payload::new();
    payload.push_str(s).ok()?;
    Some(payload)
}

fn addressed(address: u16, format: Format, payload: Payload) -> Command {
    Command::Addressable(AddressableCommand {
        kind: CommandKind::XTalk,
        address,
        format,
        payload,
    })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// `X{addr:03}A[]`: ask a device to report its short status.
pub fn poll_frame(address: u16) -> RequestFrame {
    request(address, Format::Short)
}

/// `X{addr:03}B[]`: ask an antenna for its placed-tag snapshot.
pub fn snapshot_request_frame(address: u16) -> RequestFrame {
    request(address, Format::Long)
}

fn request(address: u16, format: Format) -> RequestFrame {
    debug_assert!(address <= MAX_ADDRESS, "address {address} exceeds 3 digits");
    let mut frame = RequestFrame::new();
    // Fits by construction: 1 + 3 + 1 + 2 bytes.
    let _ = write!(frame, "X{:03}{}[]", address, format.tag());
    frame
}

// ---------------------------------------------------------------------------
// Tag snapshot replies
// ---------------------------------------------------------------------------

/// Parse a long-format snapshot payload: four `d` + 3-digit groups, each
/// optionally preceded by spaces or tabs, e.g. `" d004 d002 d000 d000"`.
///
/// Returns the raw per-slot values (0 = empty slot), or `None` if the
/// payload is not a snapshot.
pub fn parse_tag_snapshot(payload: &str) -> Option<[u16; TAG_SLOTS]> {
    let b = payload.as_bytes();
    let mut pos = 0;
    let mut slots = [0u16; TAG_SLOTS];

    for slot in &mut slots {
        while pos < b.len() && (b[pos] == b' ' || b[pos] == b'\t') {
            pos += 1;
        }
        if b.get(pos) != Some(&b'd') {
            return None;
        }
        *slot = parse_digits(b.get(pos + 1..pos + 4)?)?;
        pos += 4;
    }

    (pos == b.len()).then_some(slots)
}

/// Non-zero slot values in left-to-right order.
pub fn placed_tags(snapshot: &[u16; TAG_SLOTS]) -> heapless::Vec<u16, TAG_SLOTS> {
    snapshot.iter().copied().filter(|&tag| tag != 0).collect()
}
