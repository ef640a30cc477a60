pub mod client;
pub mod models;

pub use client::{DiscogsClient, DiscogsError, JsonFileSource, ReleaseSource};
pub use models::{DiscogsArtist, DiscogsFormat, DiscogsLabel, DiscogsRelease, DiscogsTrack};
