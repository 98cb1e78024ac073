use image::DynamicImage;
use std::io::Cursor;

use crate::constants::{
    ORIENTATION_NORMAL, ORIENTATION_TOP_TO_LEFT, ORIENTATION_TOP_TO_RIGHT,
    ORIENTATION_UPSIDE_DOWN,
};

/// The four rotations a still can need. Mirrored EXIF codes are displayed
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    TopToLeft,
    UpsideDown,
    TopToRight,
}

impl Orientation {
    pub fn from_code(code: Option<i32>) -> Self {
        match code.unwrap_or(ORIENTATION_NORMAL) {
            ORIENTATION_TOP_TO_LEFT => Orientation::TopToLeft,
            ORIENTATION_UPSIDE_DOWN => Orientation::UpsideDown,
            ORIENTATION_TOP_TO_RIGHT => Orientation::TopToRight,
            _ => Orientation::Normal,
        }
    }

    /// Counter-clockwise rotation in degrees.
    pub fn angle(self) -> u32 {
        match self {
            Orientation::Normal => 0,
            Orientation::TopToLeft => 270,
            Orientation::UpsideDown => 180,
            Orientation::TopToRight => 90,
        }
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        // image's rotate90/rotate270 turn clockwise
        match self.angle() {
            90 => img.rotate270(),
            180 => img.rotate180(),
            270 => img.rotate90(),
            _ => img,
        }
    }
}

pub fn rotation_angle(code: Option<i32>) -> u32 {
    Orientation::from_code(code).angle()
}

/// Orientation tag embedded in the image itself, for assets the server
/// reports without one.
pub fn read_exif_orientation(bytes: &[u8]) -> Option<i32> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0).and_then(|v| i32::try_from(v).ok())
}
