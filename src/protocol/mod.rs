//! XTalk wire protocol: command types, text-frame codec, button bitmask.
//!
//! ```text
//! ┌────────────┐  &str   ┌─────────┐  Command   ┌───────────────┐
//! │ Transport  │────────▶│  codec  │───────────▶│ device filter │
//! │ (external) │◀────────│ encode  │◀───────────│ (by address)  │
//! └────────────┘ request └─────────┘            └───────────────┘
//! ```

pub mod bitmask;
pub mod codec;
pub mod command;

pub use codec::decode;
pub use command::{
    AddressableCommand, AntennaAction, AntennaCommand, Command, CommandKind, Format,
};
