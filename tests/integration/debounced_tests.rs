//! Debounced aggregator scenarios driven by the manual clock.

use xtalk::{AntennaEvent, BusConfig, DebouncedAntenna, TagState};

use crate::mock_bus::{MockBus, Recorded};

fn pick(mock: &MockBus, slot: u16) {
    let announce = format!("XR[PU{slot:03}]");
    mock.feed(&[announce.as_str(), "X001A[1]"]);
}

fn place(mock: &MockBus, slot: u16) {
    let announce = format!("XR[PB{slot:03}]");
    mock.feed(&[announce.as_str(), "X001A[0]"]);
}

#[test]
fn rapid_picks_settle_to_one_event() {
    let mock = MockBus::new();
    let antenna = DebouncedAntenna::attach(&mock.bus, 1, 50).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    for _ in 0..3 {
        pick(&mock, 2);
        mock.advance(5);
    }
    assert!(seen.is_empty());

    mock.advance(50);
    assert_eq!(seen.events(), [AntennaEvent::Picked(2)]);

    // Re-confirming the current state after the window is silent.
    pick(&mock, 2);
    mock.advance(60);
    assert_eq!(seen.events(), [AntennaEvent::Picked(2)]);
}

#[test]
fn toggling_burst_reports_the_final_state() {
    let mock = MockBus::new();
    let antenna = DebouncedAntenna::attach(&mock.bus, 1, 50).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    place(&mock, 3);
    mock.advance(60);
    pick(&mock, 3);
    mock.advance(10);
    place(&mock, 3);
    mock.advance(60);

    assert_eq!(seen.events(), [AntennaEvent::Placed(3)]);
    assert_eq!(antenna.antenna_state().get(3), Some(TagState::Placed));
}

#[test]
fn state_map_tracks_each_slot() {
    let mock = MockBus::new();
    let antenna = DebouncedAntenna::attach(&mock.bus, 1, 50).unwrap();

    place(&mock, 1);
    mock.advance(50);
    place(&mock, 4);
    mock.advance(50);
    pick(&mock, 2);
    mock.advance(50);

    let state = antenna.antenna_state();
    assert_eq!(state.placed().as_slice(), [1, 4]);
    assert_eq!(state.get(2), Some(TagState::Picked));
    assert_eq!(state.get(3), None);
}

#[test]
fn raw_events_still_reach_the_inner_antenna() {
    let mock = MockBus::new();
    let antenna = DebouncedAntenna::attach(&mock.bus, 1, 50).unwrap();
    let raw = Recorded::new();
    antenna.antenna().on_event(raw.sink());

    pick(&mock, 2);
    pick(&mock, 2);

    assert_eq!(raw.events().len(), 2);
}

#[test]
fn from_config_uses_the_window() {
    let mock = MockBus::new();
    let config = BusConfig {
        debounce_window_ms: 200,
        ..BusConfig::default()
    };
    let antenna = DebouncedAntenna::from_config(&mock.bus, 1, &config).unwrap();
    let seen = Recorded::new();
    antenna.on_event(seen.sink());

    pick(&mock, 1);
    mock.advance(150);
    assert!(seen.is_empty());
    mock.advance(50);
    assert_eq!(seen.events(), [AntennaEvent::Picked(1)]);
}
