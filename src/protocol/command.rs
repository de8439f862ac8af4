//! Decoded XTalk command types.
//!
//! One frame decodes into exactly one [`Command`]: either an addressed
//! status/settings message or an address-less antenna announce.

use core::fmt;

/// Longest payload the long format carries, in characters.
pub const MAX_LONG_PAYLOAD_CHARS: usize = 30;

/// Payload storage. Sized for 30 characters of any UTF-8 width.
pub type Payload = heapless::String<{ MAX_LONG_PAYLOAD_CHARS * 4 }>;

/// Bus command family, keyed by the leading letter on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    XTalk,
    Generic,
    System,
    Diagnostic,
}

impl CommandKind {
    pub const fn tag(self) -> char {
        match self {
            Self::XTalk => 'X',
            Self::Generic => 'G',
            Self::System => 'S',
            Self::Diagnostic => 'D',
        }
    }
}

/// Payload-size class of an addressed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `A` token: 0-3 digit status value.
    Short,
    /// `B` token: up to 30 characters of free text.
    Long,
    /// `S` token: device settings.
    Setting,
}

impl Format {
    pub const fn tag(self) -> char {
        match self {
            Self::Short => 'A',
            Self::Long => 'B',
            Self::Setting => 'S',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressableCommand {
    pub kind: CommandKind,
    pub address: u16,
    pub format: Format,
    pub payload: Payload,
}

/// What the antenna reader announced for a tag slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntennaAction {
    /// `PU` on the wire.
    PickUp,
    /// `PB` on the wire.
    PickDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntennaCommand {
    pub action: AntennaAction,
    pub tag_slot: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Addressable(AddressableCommand),
    Antenna(AntennaCommand),
}

impl Command {
    /// Payload of an XTalk command for `address` in `format`, if this is one.
    ///
    /// Every device filters on exactly this triple before looking at the
    /// payload.
    pub fn xtalk_payload(&self, address: u16, format: Format) -> Option<&str> {
        match self {
            Self::Addressable(cmd)
                if cmd.kind == CommandKind::XTalk
                    && cmd.address == address
                    && cmd.format == format =>
            {
                Some(cmd.payload.as_str())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addressable(cmd) => write!(
                f,
                "{}{:03}{}[{}]",
                cmd.kind.tag(),
                cmd.address,
                cmd.format.tag(),
                cmd.payload
            ),
            Self::Antenna(cmd) => {
                let action = match cmd.action {
                    AntennaAction::PickUp => "PU",
                    AntennaAction::PickDown => "PB",
                };
                write!(f, "XR[{action}{:03}]", cmd.tag_slot)
            }
        }
    }
}
