//! Image decoding and re-encoding.

use std::io::Cursor;

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, imageops::FilterType};

/// Side length the image encoder expects.
pub const EMBED_SIZE: u32 = 224;

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out.into_inner())
}

/// Decode any supported format and re-encode it as PNG.
pub fn reencode_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    encode_png(&img)
}

/// Decode, convert to 3-channel RGB, and resize to 224×224 for the image encoder.
pub fn prepare_for_embedding(bytes: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    let rgb = img.to_rgb8();
    let resized = image::imageops::resize(&rgb, EMBED_SIZE, EMBED_SIZE, FilterType::CatmullRom);
    encode_png(&DynamicImage::ImageRgb8(resized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn rgba_jpeg_like(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([10u8, 20, 30, 128]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn prepared_image_is_224_rgb() {
        let png = prepare_for_embedding(&rgba_jpeg_like(640, 480)).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (EMBED_SIZE, EMBED_SIZE));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn reencode_produces_png() {
        let bmp = {
            let img = ImageBuffer::from_pixel(4, 4, image::Rgb([1u8, 2, 3]));
            let mut out = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(img).write_to(&mut out, ImageFormat::Bmp).unwrap();
            out.into_inner()
        };
        let png = reencode_png(&bmp).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(reencode_png(b"not an image").is_err());
        assert!(prepare_for_embedding(b"").is_err());
    }
}
