//! Stateless sensor scenarios.

use xtalk::devices::{AirEvent, AlarmEvent, LightEvent, PresenceEvent, RotaryEvent};
use xtalk::{AirButton, AlarmSensor, DomainEvent, LightSensor, PresenceSensor, RotaryButton};

use crate::mock_bus::{MockBus, Recorded};

#[test]
fn mixed_sensors_share_one_bus() {
    let mock = MockBus::new();
    let alarm = AlarmSensor::attach(&mock.bus, 10).unwrap();
    let light = LightSensor::attach(&mock.bus, 11).unwrap();
    let presence = PresenceSensor::attach(&mock.bus, 12).unwrap();
    let rotary = RotaryButton::attach(&mock.bus, 13).unwrap();
    let air = AirButton::attach(&mock.bus, 14).unwrap();

    let alarms = Recorded::<AlarmEvent>::new();
    let lights = Recorded::<LightEvent>::new();
    let presences = Recorded::<PresenceEvent>::new();
    let rotaries = Recorded::<RotaryEvent>::new();
    let airs = Recorded::<AirEvent>::new();
    alarm.on_event(alarms.sink());
    light.on_event(lights.sink());
    presence.on_event(presences.sink());
    rotary.on_event(rotaries.sink());
    air.on_event(airs.sink());

    mock.feed(&[
        "X010A[3]",
        "X011A[3]",
        "X012B[Dz=120]",
        "X013B[Dr=5]",
        "X014B[Bs=NEAR]",
        "XR[PU001]",
        "X010A[7]",
        "X011A[0]",
        "X012B[Dz=XX]",
        "X014B[Bs=IDLE]",
    ]);

    assert_eq!(alarms.events(), [AlarmEvent::PhonePicked, AlarmEvent::AlarmPicked]);
    assert_eq!(lights.events(), [LightEvent::Open, LightEvent::Off]);
    assert_eq!(
        presences.events(),
        [PresenceEvent::Distanced("120".try_into().unwrap()), PresenceEvent::Vanished]
    );
    assert_eq!(rotaries.events().len(), 1);
    assert_eq!(airs.events(), [AirEvent::Near, AirEvent::Idle]);
}

#[test]
fn human_readable_payloads() {
    assert_eq!(AlarmEvent::PhonePlaced.name(), "phonePlaced");
    assert_eq!(AlarmEvent::PhonePlaced.to_string(), "phone placed");
    assert_eq!(LightEvent::Off.name(), "Off");
    assert_eq!(PresenceEvent::Close.to_string(), "very close");
    assert_eq!(AirEvent::Far.name(), "far");
}

#[test]
fn rejects_out_of_range_address() {
    let mock = MockBus::new();
    assert!(AlarmSensor::attach(&mock.bus, 1000).is_err());
}
