pub mod config;
pub mod theory;
pub mod track;
pub mod backend;
pub mod spectrum;
pub mod engine;
pub mod manager;

#[cfg(feature = "kira")]
pub mod kira_backend;

pub use backend::{AudioBackend, LayerKey, SilentBackend, SoundCue};
pub use config::{AudioConfig, MusicConfig};
pub use engine::{MusicContext, MusicEngine, TrackInfo};
pub use manager::AudioManager;
pub use theory::Mood;
pub use track::{LayerKind, LayerSpec, TrackId, TrackSpec};

#[cfg(feature = "kira")]
pub use kira_backend::KiraBackend;
