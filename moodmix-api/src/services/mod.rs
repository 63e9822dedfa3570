//! Outbound service clients

pub mod provider;
pub mod spotify_client;

pub use provider::{
    MusicProvider, ProviderError, RecommendationParams, Track, TrackImage, DEFAULT_ENERGY,
    DEFAULT_GENRES, TARGET_POPULARITY,
};
pub use spotify_client::{SpotifyClient, SpotifyClientConfig};
