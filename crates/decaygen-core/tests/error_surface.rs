use decaygen_core::errors::{DecayError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("id", "1")
        .with_context("reason", "example")
}

#[test]
fn configuration_error_surface() {
    let err = DecayError::InvalidConfiguration(sample_info("C001", "unknown variant"));
    assert_eq!(err.info().code, "C001");
    assert!(err.info().context.contains_key("id"));
}

#[test]
fn bias_error_surface() {
    let err = DecayError::InvalidBias(sample_info("B001", "negative"));
    assert_eq!(err.info().code, "B001");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn rng_error_surface() {
    let err = DecayError::Rng(sample_info("RN001", "poisoned"));
    assert_eq!(err.info().code, "RN001");
}

#[test]
fn reduction_error_surface() {
    let err = DecayError::Reduction(sample_info("RD001", "peer gone"));
    assert_eq!(err.info().code, "RD001");
}

#[test]
fn serde_error_surface() {
    let err = DecayError::Serde(sample_info("S001", "schema mismatch"));
    assert_eq!(err.info().code, "S001");
}

#[test]
fn unknown_selector_lists_known_values() {
    let err = DecayError::unknown_selector("variant", "bogus", &["flat", "v-a"]);
    assert!(matches!(err, DecayError::InvalidConfiguration(_)));
    assert_eq!(err.info().context.get("value").map(String::as_str), Some("bogus"));
    let rendered = err.to_string();
    assert!(rendered.contains("flat, v-a"), "{rendered}");
}

#[test]
fn negative_bias_records_value() {
    let err = DecayError::negative_bias(-1.0);
    assert!(matches!(err, DecayError::InvalidBias(_)));
    assert_eq!(err.info().code, "negative-bias");
    assert_eq!(err.info().context.get("value").map(String::as_str), Some("-1"));
}

#[test]
fn errors_round_trip_json() {
    let err = DecayError::InvalidBias(sample_info("B002", "nan"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"InvalidBias\""));
    let decoded: DecayError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
