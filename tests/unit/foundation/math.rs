use super::*;

#[test]
fn mul_div255_rounds_half_up() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 200), 0);
    assert_eq!(mul_div255_u16(191, 64), 48);
    assert_eq!(mul_div255_u16(128, 128), 64);
    assert_eq!(mul_div255_u8(255, 64), 64);
}

#[test]
fn luminance_maps_grays_to_themselves() {
    for v in 0..=255u8 {
        assert_eq!(luminance(v, v, v), v);
    }
}

#[test]
fn luminance_weights_green_heaviest() {
    assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
    assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
}

#[test]
fn premul_with_opaque_alpha_is_identity() {
    for c in 0..=255u8 {
        assert_eq!(premul(c, 255), c);
        assert_eq!(unpremul(c, 255), c);
    }
}

#[test]
fn unpremul_of_zero_alpha_is_zero() {
    assert_eq!(unpremul(37, 0), 0);
}
