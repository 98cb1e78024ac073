pub mod app;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod immich;
pub mod logging;
pub mod models;
pub mod photos;
pub mod processor;
pub mod routes;

#[cfg(test)]
mod test_utils;

pub const VERSION: &str = "0.1.0";
