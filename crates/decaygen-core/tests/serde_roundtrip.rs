use decaygen_core::{Event, FourMomentum, RawState};

#[test]
fn events_round_trip_json() {
    let event = Event::new(
        [
            FourMomentum::new(10.0, 1.0, 2.0, 3.0),
            FourMomentum::new(5.0, -1.0, -2.0, -3.0),
        ],
        0.25,
    );
    let json = serde_json::to_string_pretty(&event).expect("serialize");
    let decoded: Event<[FourMomentum; 2]> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, event);
}

#[test]
fn raw_state_serializes_as_plain_sequence() {
    let raw = RawState([0.1, 0.5, 0.9]);
    let json = serde_json::to_string(&raw).expect("serialize");
    assert_eq!(json, "[0.1,0.5,0.9]");
    let decoded: RawState<3> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, raw);
}

#[test]
fn raw_state_rejects_wrong_dimension() {
    let result: Result<RawState<3>, _> = serde_json::from_str("[0.1,0.2]");
    assert!(result.is_err());
}
