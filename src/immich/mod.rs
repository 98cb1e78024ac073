mod client;
mod library;

pub use client::{pick_random, ImmichClient};
pub use library::PhotoLibrary;
