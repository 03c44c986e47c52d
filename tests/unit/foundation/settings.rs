use super::*;

#[test]
fn default_is_accelerated() {
    assert!(RasterSettings::default().accelerated);
    assert!(!RasterSettings::software().accelerated);
}

#[test]
fn accel_value_parsing() {
    let on = RasterSettings::default();
    assert!(!on.with_accel_value("0").accelerated);
    assert!(!on.with_accel_value(" Off ").accelerated);
    assert!(!on.with_accel_value("false").accelerated);
    let off = RasterSettings::software();
    assert!(off.with_accel_value("1").accelerated);
    assert!(off.with_accel_value("yes").accelerated);
}

#[test]
fn unrecognized_accel_value_keeps_current_setting() {
    assert!(RasterSettings::default().with_accel_value("maybe").accelerated);
    assert!(!RasterSettings::software().with_accel_value("maybe").accelerated);
}

#[test]
fn missing_fields_deserialize_to_default() {
    let s: RasterSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(s, RasterSettings::default());
}
