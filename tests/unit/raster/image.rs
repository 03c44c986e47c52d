use super::*;

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

#[test]
fn from_color_stores_premultiplied_pixels() {
    let img = AcceleratedImage::from_color(size(2, 2), Color::rgba(255, 0, 0, 128)).unwrap();
    assert_eq!(img.premul_pixel(1, 1).unwrap(), [128, 0, 0, 128]);
    assert_eq!(img.premul_bytes().len(), 16);
}

#[test]
fn buffer_upload_and_download_preserve_opaque_pixels() {
    let mut buf = PixelBuffer::filled(size(3, 3), BitDepth::Bits24, Color::RED);
    buf.set_color(1, 2, Color::BLUE).unwrap();
    let img = AcceleratedImage::from_buffer(&buf).unwrap();
    assert_eq!(img.pixel(1, 2).unwrap(), Color::BLUE);
    assert_eq!(img.to_buffer(BitDepth::Bits24), buf);
}

#[test]
fn download_to_eight_bit_quantizes() {
    let img = AcceleratedImage::from_color(size(2, 2), Color::gray(34)).unwrap();
    let buf = img.to_buffer(BitDepth::Bits8);
    assert_eq!(buf.get_index(0, 0).unwrap(), 34);
}

#[test]
fn convert_produces_a_new_handle() {
    let img = AcceleratedImage::from_color(size(2, 2), Color::RED).unwrap();
    let gray = img.convert(BitDepth::Bits8).unwrap();
    assert!(!gray.ptr_eq(&img));
    assert_eq!(gray.pixel(0, 0).unwrap(), Color::gray(Color::RED.luminance()));
    assert!(img.clone().ptr_eq(&img));
}

#[test]
fn oversized_images_are_rejected() {
    let err = AcceleratedImage::from_color(size(70_000, 1), Color::RED).unwrap_err();
    assert!(matches!(err, RasterError::Conversion(_)));
    assert!(!AcceleratedImage::fits(size(70_000, 1)));
    assert!(AcceleratedImage::fits(size(65_535, 1)));
}
