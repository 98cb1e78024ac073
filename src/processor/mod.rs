pub mod orientation;
pub mod transform;

pub use orientation::{read_exif_orientation, rotation_angle, Orientation};
pub use transform::{process_image, resize_media, rotate_media};
