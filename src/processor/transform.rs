use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::constants::{DEFAULT_RESIZE_HEIGHT, DEFAULT_RESIZE_WIDTH};
use crate::error::AppResult;
use crate::processor::orientation::{read_exif_orientation, Orientation};

fn encode_jpeg(img: &DynamicImage, quality: u8) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buffer)
}

fn fit_within(img: DynamicImage, width: Option<u32>, height: Option<u32>) -> DynamicImage {
    let width = width.filter(|w| *w > 0).unwrap_or(DEFAULT_RESIZE_WIDTH);
    let height = height.filter(|h| *h > 0).unwrap_or(DEFAULT_RESIZE_HEIGHT);

    if img.width() <= width && img.height() <= height {
        return img;
    }
    img.resize(width, height, FilterType::Lanczos3)
}

/// Decodes once, rotates upright, optionally shrinks to fit the requested box
/// and re-encodes as JPEG. Without a server-side orientation the image's own
/// EXIF tag is consulted.
pub fn process_image(
    bytes: &[u8],
    orientation: Option<i32>,
    width: Option<u32>,
    height: Option<u32>,
    quality: u8,
) -> AppResult<Vec<u8>> {
    let orientation = orientation.or_else(|| read_exif_orientation(bytes));
    let mut img = image::load_from_memory(bytes)?;

    img = Orientation::from_code(orientation).apply(img);
    if width.is_some() || height.is_some() {
        img = fit_within(img, width, height);
    }

    encode_jpeg(&img, quality)
}

pub fn rotate_media(bytes: &[u8], orientation: Option<i32>, quality: u8) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    encode_jpeg(&Orientation::from_code(orientation).apply(img), quality)
}

pub fn resize_media(
    bytes: &[u8],
    width: Option<u32>,
    height: Option<u32>,
    quality: u8,
) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    encode_jpeg(&fit_within(img, width, height), quality)
}
