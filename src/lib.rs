// Library exports for the binary and integration tests

pub mod config;
pub mod discogs;
pub mod error;
pub mod import;

pub use config::{ReleaseOverrides, TaggerConfig};
pub use error::TaggerError;
