//! RFID antenna scenarios: announce/confirm pairing and snapshot queries.

use futures_lite::future::{block_on, poll_once};
use futures_lite::pin;
use xtalk::{AntennaEvent, RfidAntenna};

use crate::mock_bus::{MockBus, Recorded};

// ── Announce + confirmation ───────────────────────────────────

#[test]
fn announce_then_confirm_picks() {
    let mock = MockBus::new();
    let antenna = RfidAntenna::attach(&mock.bus, 1).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    mock.feed(&["XR[PU002]", "X001A[1]"]);

    assert_eq!(seen.events(), [AntennaEvent::Picked(2)]);
}

#[test]
fn confirmation_for_another_antenna_is_ignored() {
    let mock = MockBus::new();
    let antenna = RfidAntenna::attach(&mock.bus, 1).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    mock.feed(&["XR[PU002]", "X002A[1]"]);

    assert!(seen.is_empty());
}

#[test]
fn raw_antenna_emits_every_confirmation() {
    let mock = MockBus::new();
    let antenna = RfidAntenna::attach(&mock.bus, 1).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    mock.feed(&["XR[PU002]", "X001A[1]", "XR[PU002]", "X001A[1]"]);

    assert_eq!(seen.events(), [AntennaEvent::Picked(2), AntennaEvent::Picked(2)]);
}

#[test]
fn orphan_confirmation_emits_nothing() {
    let mock = MockBus::new();
    let antenna = RfidAntenna::attach(&mock.bus, 1).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    mock.feed(&["X001A[1]", "X001A[0]"]);

    assert!(seen.is_empty());
}

// ── getPlacedTags ─────────────────────────────────────────────

fn placed_after(reply: &str) -> Vec<u16> {
    let mock = MockBus::new();
    let antenna = RfidAntenna::attach(&mock.bus, 7).unwrap();

    let query = antenna.get_placed_tags();
    pin!(query);
    assert!(block_on(poll_once(&mut query)).is_none(), "waits for the reply");
    assert_eq!(mock.sent(), ["X007B[]"]);

    mock.feed(&[reply]);
    block_on(query).unwrap().to_vec()
}

#[test]
fn placed_tags_drop_empty_slots() {
    assert_eq!(placed_after("X007B[ d004 d002 d000 d000]"), [4, 2]);
}

#[test]
fn placed_tags_all_occupied() {
    assert_eq!(placed_after("X007B[d001 d002 d003 d004]"), [1, 2, 3, 4]);
}

#[test]
fn placed_tags_all_empty() {
    assert!(placed_after("X007B[d000\td000 d000 d000]").is_empty());
}
