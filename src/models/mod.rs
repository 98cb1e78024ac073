mod album;
mod media;
mod server;

pub use album::*;
pub use media::*;
pub use server::*;
