use std::borrow::Cow;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageReader, Rgb, Rgba, imageops::FilterType};
use log::debug;

use crate::engine::PixelSource;
use crate::error::{Error, Result};
use crate::sampler::Bounds;

// ------------------------------------------------------------
// Pixel conversion
// ------------------------------------------------------------

/// Pixel types the engine can read, narrowed to 8-bit RGB.
pub trait Sample8 {
    /// `None` when the pixel is fully transparent.
    fn rgb8(&self) -> Option<[u8; 3]>;
}

/// Exact 16 to 8 bit scaling: 0xFFFF / 0x101 == 0xFF.
#[inline(always)]
fn narrow(channel: u16) -> u8 {
    (channel / 257) as u8
}

impl Sample8 for Rgba<u8> {
    fn rgb8(&self) -> Option<[u8; 3]> {
        let [r, g, b, a] = self.0;
        (a != 0).then_some([r, g, b])
    }
}

impl Sample8 for Rgb<u8> {
    fn rgb8(&self) -> Option<[u8; 3]> {
        Some(self.0)
    }
}

impl Sample8 for Rgba<u16> {
    fn rgb8(&self) -> Option<[u8; 3]> {
        let [r, g, b, a] = self.0;
        (a != 0).then(|| [narrow(r), narrow(g), narrow(b)])
    }
}

impl Sample8 for Rgb<u16> {
    fn rgb8(&self) -> Option<[u8; 3]> {
        Some(self.0.map(narrow))
    }
}

impl<I> PixelSource for I
where
    I: GenericImageView,
    I::Pixel: Sample8,
{
    fn pixel_bounds(&self) -> Bounds {
        // `get_pixel` is relative to the view's top-left corner.
        let (width, height) = self.dimensions();
        Bounds::new(0, 0, width, height)
    }

    fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.get_pixel(x, y).rgb8()
    }
}

// ------------------------------------------------------------
// Decoding and thumbnailing
// ------------------------------------------------------------

pub fn decode(input: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(input)?)
}

pub fn open(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let io_error = |source| Error::Io { path: path.to_path_buf(), source };

    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;

    Ok(reader.decode()?)
}

/// Shrink so that the longest side is at most `max_edge`, keeping the aspect
/// ratio (nearest-neighbour). Images that already fit are returned as-is.
pub fn shrink(image: &DynamicImage, max_edge: u32) -> Cow<'_, DynamicImage> {
    let max_edge = max_edge.max(1);
    let (orig_w, orig_h) = image.dimensions();

    if orig_w <= max_edge && orig_h <= max_edge {
        return Cow::Borrowed(image);
    }

    let max_side = orig_w.max(orig_h) as f32;
    let ratio = max_edge as f32 / max_side;
    let w = ((orig_w as f32) * ratio).round().clamp(1.0, max_edge as f32) as u32;
    let h = ((orig_h as f32) * ratio).round().clamp(1.0, max_edge as f32) as u32;

    debug!("shrinking {orig_w}x{orig_h} to {w}x{h}");
    Cow::Owned(image.resize_exact(w, h, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, RgbImage, RgbaImage};

    #[test]
    fn sixteen_bit_channels_are_narrowed() {
        assert_eq!(Rgba([65535u16, 257, 0, 1]).rgb8(), Some([255, 1, 0]));
        assert_eq!(Rgb([32896u16, 65534, 256]).rgb8(), Some([128, 254, 0]));
        assert_eq!(Rgba([65535u16, 65535, 65535, 0]).rgb8(), None);
    }

    #[test]
    fn rgb_pixels_are_opaque() {
        let image = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        assert_eq!(image.rgb_at(1, 1), Some([1, 2, 3]));
        assert_eq!(image.pixel_bounds(), Bounds::new(0, 0, 2, 2));
    }

    #[test]
    fn sub_image_view_is_a_source() {
        let image = RgbaImage::from_fn(12, 12, |x, y| {
            if (5..10).contains(&x) && (5..10).contains(&y) { Rgba([200, 50, 50, 255]) } else { Rgba([0, 0, 0, 255]) }
        });
        let view = image.view(5, 5, 5, 5);

        assert_eq!(view.pixel_bounds(), Bounds::new(0, 0, 5, 5));
        assert_eq!(view.rgb_at(0, 0), Some([200, 50, 50]));
        assert_eq!(view.rgb_at(4, 4), Some([200, 50, 50]));

        let color = crate::find_with(&*view, &crate::Options::default());
        assert_eq!(crate::hex(color), "#C83232");
    }

    #[test]
    fn transparent_rgba_is_skipped() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0]));
        assert_eq!(image.rgb_at(0, 0), None);
    }

    #[test]
    fn sixteen_bit_buffer_is_a_source() {
        let image: ImageBuffer<Rgba<u16>, Vec<u16>> = ImageBuffer::from_pixel(3, 1, Rgba([65535, 0, 51400, 65535]));
        assert_eq!(image.rgb_at(2, 0), Some([255, 0, 200]));
    }

    #[test]
    fn shrink_keeps_aspect_ratio() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(1024, 512));
        let shrunk = shrink(&image, 256);
        assert_eq!(shrunk.dimensions(), (256, 128));
    }

    #[test]
    fn shrink_never_upscales() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(40, 30));
        assert!(matches!(shrink(&image, 64), Cow::Borrowed(_)));
    }

    #[test]
    fn shrink_keeps_thin_images_visible() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(2000, 3));
        assert_eq!(shrink(&image, 64).dimensions(), (64, 1));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"definitely not an image"), Err(Error::Decode(_))));
    }

    #[test]
    fn open_reports_missing_file() {
        let err = open("does/not/exist.png").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
