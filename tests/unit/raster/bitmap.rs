use super::*;

fn bitmap(bits: u16) -> LazyBitmap {
    LazyBitmap::from_dimensions(10, 10, bits).unwrap()
}

#[test]
fn fresh_bitmap_holds_nothing() {
    let b = bitmap(24);
    assert_eq!(b.state(), BitmapState::default());
    assert_eq!(b.erase_color(), None);
}

#[test]
fn construction_fails_fast_on_bad_input() {
    assert!(matches!(
        LazyBitmap::from_dimensions(0, 10, 24),
        Err(RasterError::Validation(_))
    ));
    assert!(matches!(
        LazyBitmap::from_dimensions(10, 10, 16),
        Err(RasterError::Validation(_))
    ));
}

#[test]
fn erase_allocates_nothing() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    assert!(b.has_erase_color());
    assert!(!b.has_buffer());
    assert!(!b.has_image());
    assert_eq!(b.erase_color(), Some(Color::RED));
}

#[test]
fn erase_stores_color_quantized_to_depth() {
    let mut b = bitmap(8);
    b.erase(Color::RED);
    assert_eq!(b.erase_color(), Some(Color::gray(Color::RED.luminance())));
}

#[test]
fn read_materializes_buffer_and_clears_erase_color() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    assert_eq!(b.read_pixel(0, 0).unwrap(), Color::RED);
    assert!(b.has_buffer());
    assert!(!b.has_erase_color());
    assert!(!b.has_image());
}

#[test]
fn reading_an_empty_bitmap_yields_zero_pixels() {
    let mut b = bitmap(24);
    assert_eq!(b.read_pixel(9, 9).unwrap(), Color::BLACK);
    assert!(b.has_buffer());
}

#[test]
fn out_of_bounds_read_does_not_materialize() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    assert!(matches!(
        b.read_pixel(10, 0),
        Err(RasterError::OutOfBounds { .. })
    ));
    assert!(b.has_erase_color());
    assert!(!b.has_buffer());
}

#[test]
fn image_from_erase_color_keeps_erase_color() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    let img = b.accelerated_image().unwrap();
    assert_eq!(img.pixel(5, 5).unwrap(), Color::RED);
    assert!(b.has_image());
    assert!(b.has_erase_color());
    assert!(!b.has_buffer());
}

#[test]
fn image_request_is_cached() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    b.read_pixel(0, 0).unwrap();
    let first = b.accelerated_image().unwrap();
    let second = b.accelerated_image().unwrap();
    assert!(first.ptr_eq(&second));
    assert!(b.has_buffer());
    assert!(b.has_image());
}

#[test]
fn write_invalidates_cached_image() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    b.accelerated_image().unwrap();
    b.set_pixel(1, 1, Color::BLUE).unwrap();
    assert!(!b.has_image());
    assert!(!b.has_erase_color());
    assert_eq!(b.read_pixel(1, 1).unwrap(), Color::BLUE);
    assert_eq!(b.read_pixel(0, 0).unwrap(), Color::RED);
}

#[test]
fn erase_drops_buffer_and_image() {
    let mut b = bitmap(24);
    b.read_pixel(0, 0).unwrap();
    b.accelerated_image().unwrap();
    b.erase(Color::GREEN);
    assert_eq!(
        b.state(),
        BitmapState {
            has_buffer: false,
            has_image: false,
            has_erase_color: true,
        }
    );
}

#[test]
fn fill_rect_writes_clipped_region() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    b.fill_rect(8, 8, 5, 5, Color::BLUE).unwrap();
    assert_eq!(b.read_pixel(7, 7).unwrap(), Color::RED);
    assert_eq!(b.read_pixel(9, 9).unwrap(), Color::BLUE);
}

#[test]
fn convert_erase_color_stays_erase_color() {
    let mut b = bitmap(24);
    b.erase(Color::gray(33));
    b.convert(BitDepth::Bits8).unwrap();
    assert!(b.has_erase_color());
    assert_eq!(b.bit_depth(), BitDepth::Bits8);
    assert_eq!(b.pixel_index(0, 0).unwrap(), 33);
}

#[test]
fn convert_erase_color_drops_preview_image() {
    let mut b = bitmap(24);
    b.erase(Color::gray(200));
    b.accelerated_image().unwrap();
    b.convert(BitDepth::Bits1).unwrap();
    assert!(b.has_erase_color());
    assert!(!b.has_image());
    assert_eq!(b.erase_color(), Some(Color::WHITE));
}

#[test]
fn convert_with_cached_image_converts_buffer_and_rebuilds_image() {
    let mut b = bitmap(24);
    b.erase(Color::gray(34));
    b.read_pixel(0, 0).unwrap();
    let before = b.accelerated_image().unwrap();
    b.convert(BitDepth::Bits8).unwrap();
    assert!(b.has_buffer());
    assert!(b.has_image());
    let after = b.accelerated_image().unwrap();
    assert!(!after.ptr_eq(&before));
    assert_eq!(after.pixel(0, 0).unwrap(), Color::gray(34));
    assert_eq!(b.pixel_index(0, 0).unwrap(), 34);
}

#[test]
fn convert_of_translucent_pixels_ignores_cached_image() {
    let pixels = [Color::rgba(201, 0, 0, 3), Color::rgba(200, 100, 50, 0)];
    for depth in [BitDepth::Bits24, BitDepth::Bits8] {
        let mut plain = bitmap(32);
        let mut cached = bitmap(32);
        for (x, c) in pixels.iter().enumerate() {
            plain.set_pixel(x as u32, 0, *c).unwrap();
            cached.set_pixel(x as u32, 0, *c).unwrap();
        }
        cached.accelerated_image().unwrap();

        plain.convert(depth).unwrap();
        cached.convert(depth).unwrap();
        for x in 0..2 {
            assert_eq!(
                cached.read_pixel(x, 0).unwrap(),
                plain.read_pixel(x, 0).unwrap()
            );
        }
    }

    let mut b = bitmap(32);
    b.set_pixel(0, 0, Color::rgba(200, 100, 50, 0)).unwrap();
    b.accelerated_image().unwrap();
    b.convert(BitDepth::Bits8).unwrap();
    assert_eq!(b.pixel_index(0, 0).unwrap(), Color::rgb(200, 100, 50).luminance());
}

#[test]
fn read_after_image_build_keeps_translucent_colors() {
    let c = Color::rgba(201, 0, 0, 3);
    let mut b = bitmap(32);
    b.set_pixel(4, 4, c).unwrap();
    b.accelerated_image().unwrap();
    assert_eq!(b.read_pixel(4, 4).unwrap(), c);
    assert!(b.has_image());
}

#[test]
fn image_backed_bitmap_converts_its_image() {
    let img = AcceleratedImage::from_color(Size::new(4, 4).unwrap(), Color::gray(90)).unwrap();
    let mut b = LazyBitmap::from_image(img);
    assert_eq!(b.bit_depth(), BitDepth::Bits32);
    assert!(b.has_image());
    assert!(!b.has_buffer());
    assert!(b.prefer_accelerated_path());

    b.convert(BitDepth::Bits8).unwrap();
    assert!(matches!(b.repr, Repr::Image(_)));
    assert_eq!(b.pixel_index(1, 1).unwrap(), 90);
    assert!(b.has_buffer());
    assert!(b.has_image());
}

#[test]
fn convert_buffer_only_is_per_pixel() {
    let mut b = bitmap(24);
    b.erase(Color::gray(10));
    b.set_pixel(3, 4, Color::gray(220)).unwrap();
    b.convert(BitDepth::Bits8).unwrap();
    assert!(b.has_buffer());
    assert!(!b.has_image());
    assert_eq!(b.pixel_index(0, 0).unwrap(), 10);
    assert_eq!(b.pixel_index(3, 4).unwrap(), 220);
}

#[test]
fn convert_to_same_depth_is_noop() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    b.accelerated_image().unwrap();
    b.convert(BitDepth::Bits24).unwrap();
    assert!(b.has_image());
    assert!(b.has_erase_color());
}

#[test]
fn pixel_index_requires_palette() {
    let mut b = bitmap(24);
    b.erase(Color::RED);
    assert!(matches!(b.pixel_index(0, 0), Err(RasterError::Conversion(_))));
    assert!(b.has_erase_color());
}

#[test]
fn prefer_accelerated_path_tracks_representation() {
    let mut b = bitmap(24);
    assert!(!b.prefer_accelerated_path());
    b.erase(Color::RED);
    assert!(b.prefer_accelerated_path());
    b.read_pixel(0, 0).unwrap();
    assert!(!b.prefer_accelerated_path());
    b.accelerated_image().unwrap();
    assert!(b.prefer_accelerated_path());

    let mut large = LazyBitmap::from_dimensions(1000, 1000, 24).unwrap();
    large.erase(Color::RED);
    assert!(large.prefer_accelerated_path());
}

#[test]
fn software_settings_only_prefer_erase_colors() {
    let mut b = LazyBitmap::with_settings(
        Size::new(4, 4).unwrap(),
        BitDepth::Bits24,
        RasterSettings::software(),
    );
    b.erase(Color::RED);
    assert!(b.prefer_accelerated_path());
    b.read_pixel(0, 0).unwrap();
    b.accelerated_image().unwrap();
    assert!(!b.prefer_accelerated_path());
}

#[test]
fn sampler_does_not_materialize_erase_colors() {
    let mut b = bitmap(24);
    b.erase(Color::BLUE);
    assert!(matches!(b.sampler().unwrap(), Sampler::Solid(c) if c == Color::BLUE));
    assert!(!b.has_buffer());
    assert!(!b.has_image());
}

#[test]
fn rgba_image_round_trip() {
    let mut src = ::image::RgbaImage::new(3, 2);
    src.put_pixel(2, 1, ::image::Rgba([1, 2, 3, 4]));
    let mut b = LazyBitmap::from_rgba_image(&src).unwrap();
    assert_eq!(b.bit_depth(), BitDepth::Bits32);
    assert_eq!(b.read_pixel(2, 1).unwrap(), Color::rgba(1, 2, 3, 4));
    assert_eq!(b.to_rgba_image().unwrap(), src);
}

#[test]
fn oversized_bitmap_samples_its_buffer() {
    let mut b = LazyBitmap::from_dimensions(70_000, 1, 24).unwrap();
    b.erase(Color::RED);
    b.read_pixel(0, 0).unwrap();
    let sampler = b.sampler().unwrap();
    assert!(matches!(sampler, Sampler::Buffer(_)));
    assert_eq!(sampler.color(69_999, 0), Color::RED);
    assert!(!b.has_image());
}

#[test]
fn sampler_hands_out_stored_premultiplied_bytes() {
    let c = Color::rgba(201, 0, 0, 3);
    let mut b = bitmap(32);
    b.set_pixel(0, 0, c).unwrap();
    let from_image = b.sampler().unwrap().premul(0, 0);
    assert_eq!(from_image, c.to_premul());
}
