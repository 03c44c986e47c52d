use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RasterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RasterError::conversion("x")
            .to_string()
            .contains("conversion error:")
    );
    assert!(
        RasterError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn out_of_bounds_names_coordinates_and_extent() {
    let msg = RasterError::out_of_bounds(12, 3, 10, 10).to_string();
    assert_eq!(msg, "pixel (12, 3) out of bounds for 10x10");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
