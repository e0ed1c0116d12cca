pub mod config;
pub mod command;
pub mod notify;
pub mod modal;
pub mod screen;
pub mod sounds;
pub mod event;
pub mod controls;
pub mod visualizer;
pub mod shortcuts;
pub mod ui_manager;
pub mod engine;

pub use config::{CosmicConfig, UiConfig};
pub use command::{GameAction, SaveLoadMode, UiCommand};
pub use engine::{GameEngine, VolumeSlider};
pub use event::{GameEvent, GameLink, GameState, LoggingLink};
pub use modal::ModalManager;
pub use notify::{NoticeKind, NotificationManager};
pub use screen::{ScreenId, ScreenManager, ShowOutcome};
pub use sounds::UiSounds;
pub use ui_manager::UiManager;
pub use visualizer::{AudioVisualizer, FrameOutcome};
