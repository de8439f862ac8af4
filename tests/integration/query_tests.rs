//! Poll-and-wait queries: fail-fast on overlap, timeouts, concurrency.

use futures_lite::future::{block_on, poll_once};
use futures_lite::pin;
use xtalk::{Bus, BusConfig, Button, DebouncedAntenna, QueryError, RfidAntenna, TransportError};

use crate::mock_bus::{FailingTransport, MockBus};

#[test]
fn is_pressed_resolves_on_the_next_edge() {
    let mock = MockBus::new();
    let button = Button::attach(&mock.bus, 1, 0).unwrap();

    let query = button.is_pressed();
    pin!(query);
    assert!(block_on(poll_once(&mut query)).is_none());
    assert_eq!(mock.sent(), ["X001A[]"]);

    // Same state as before: no edge, keep waiting.
    mock.feed(&["X001A[0]"]);
    assert!(block_on(poll_once(&mut query)).is_none());

    mock.feed(&["X001A[3]"]);
    assert_eq!(block_on(query), Ok(true));
}

#[test]
fn second_query_fails_fast() {
    let mock = MockBus::new();
    let antenna = RfidAntenna::attach(&mock.bus, 7).unwrap();

    let first = antenna.get_placed_tags();
    pin!(first);
    assert!(block_on(poll_once(&mut first)).is_none());

    assert_eq!(block_on(antenna.get_placed_tags()), Err(QueryError::AlreadyPending));
    assert_eq!(mock.sent().len(), 1, "the rejected query writes nothing");

    mock.feed(&["X007B[d001 d000 d000 d000]"]);
    assert_eq!(block_on(first).unwrap().as_slice(), [1]);
}

#[test]
fn slot_is_released_when_the_query_is_dropped() {
    let mock = MockBus::new();
    let button = Button::attach(&mock.bus, 1, 0).unwrap();

    {
        let query = button.is_pressed();
        pin!(query);
        assert!(block_on(poll_once(&mut query)).is_none());
    }

    let again = button.is_pressed();
    pin!(again);
    assert!(block_on(poll_once(&mut again)).is_none());
}

#[test]
fn query_times_out_on_tick() {
    let mock = MockBus::new();
    let button = Button::attach(&mock.bus, 1, 0).unwrap();

    let query = button.is_pressed_within(100);
    pin!(query);
    assert!(block_on(poll_once(&mut query)).is_none());

    mock.advance(99);
    assert!(block_on(poll_once(&mut query)).is_none());
    mock.advance(1);
    assert_eq!(block_on(query), Err(QueryError::TimedOut));
}

#[test]
fn configured_timeout_bounds_debounced_snapshot() {
    let mock = MockBus::new();
    let config = BusConfig {
        query_timeout_ms: Some(250),
        ..BusConfig::default()
    };
    let antenna = DebouncedAntenna::from_config(&mock.bus, 3, &config).unwrap();

    let query = antenna.get_placed_tags();
    pin!(query);
    assert!(block_on(poll_once(&mut query)).is_none());
    mock.advance(250);
    assert_eq!(block_on(query), Err(QueryError::TimedOut));
}

#[test]
fn send_failure_completes_the_query_and_frees_the_slot() {
    let bus = Bus::new(FailingTransport);
    let button = Button::attach(&bus, 1, 0).unwrap();
    let antenna = RfidAntenna::attach(&bus, 7).unwrap();
    let closed = QueryError::Transport(TransportError::Closed);

    assert_eq!(block_on(button.is_pressed()), Err(closed));
    assert_eq!(block_on(button.is_pressed()), Err(closed), "slot must be free again");
    assert_eq!(block_on(antenna.get_placed_tags_within(100)), Err(closed));
    assert_eq!(block_on(antenna.get_placed_tags()), Err(closed));
}

#[test]
fn queries_fail_once_the_bus_is_gone() {
    let mock = MockBus::new();
    let button = Button::attach(&mock.bus, 1, 0).unwrap();
    drop(mock);
    assert_eq!(block_on(button.is_pressed()), Err(QueryError::BusClosed));
}

#[test]
fn concurrent_queries_on_an_executor() {
    let mock = MockBus::new();
    let left = Button::attach(&mock.bus, 1, 0).unwrap();
    let right = Button::attach(&mock.bus, 1, 1).unwrap();
    let antenna = RfidAntenna::attach(&mock.bus, 7).unwrap();

    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();
    let left_task = executor.spawn(left.is_pressed());
    let right_task = executor.spawn(right.is_pressed());
    let tags_task = executor.spawn(antenna.get_placed_tags());

    while executor.try_tick() {}
    assert_eq!(mock.sent(), ["X001A[]", "X001A[]", "X007B[]"]);

    mock.feed(&["X001A[7]", "X007B[d000 d003 d000 d002]"]);

    let (l, r, tags) = block_on(executor.run(async {
        (left_task.await, right_task.await, tags_task.await)
    }));
    assert_eq!(l, Ok(true));
    assert_eq!(r, Ok(true));
    assert_eq!(tags.unwrap().as_slice(), [3, 2]);
}
