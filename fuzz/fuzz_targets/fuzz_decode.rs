//! Fuzz target: `xtalk::decode`
//!
//! Drives arbitrary text into the frame decoder and checks that it never
//! panics, that addresses stay within three digits, and that a decoded
//! command re-encodes to a frame that decodes to the same command.
//!
//! cargo fuzz run fuzz_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use xtalk::protocol::Command;
use xtalk::protocol::codec::MAX_ADDRESS;

fuzz_target!(|data: &[u8]| {
    let Ok(frame) = core::str::from_utf8(data) else {
        return;
    };

    let Ok(command) = xtalk::decode(frame) else {
        return;
    };

    if let Command::Addressable(cmd) = &command {
        assert!(cmd.address <= MAX_ADDRESS, "address exceeds 3 digits");
    }

    let canonical = command.to_string();
    assert_eq!(xtalk::decode(&canonical), Ok(command), "canonical form must decode back");
});
