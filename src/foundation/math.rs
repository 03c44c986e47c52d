/// `x * y / 255` rounded half up, the fixed-point product used by every 8-bit blend.
pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Integer luma. Weights sum to 256 so grays map to themselves.
pub(crate) fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 76 + u32::from(g) * 151 + u32::from(b) * 29) >> 8) as u8
}

pub(crate) fn premul(c: u8, a: u8) -> u8 {
    mul_div255_u8(u16::from(c), u16::from(a))
}

pub(crate) fn unpremul(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
