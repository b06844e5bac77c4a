pub mod clipboard;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod snapshot;
pub mod svg;
pub mod ua;
pub mod views;

pub use clipboard::{Clipboard, clipboard_text};
pub use config::{ConfigError, ConfirmationPolicy, PanelConfig};
pub use controller::PanelController;
pub use debounce::Debouncer;
pub use snapshot::{Environment, EnvironmentReading, SnapshotProvider};
pub use ua::{RuleParser, UserAgentInfo, UserAgentParser};
