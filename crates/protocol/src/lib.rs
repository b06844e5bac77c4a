pub mod commands;
pub mod snapshot;
pub mod theme;
pub mod types;

pub use commands::{PanelAction, RenderCommand, TextAlign};
pub use snapshot::Snapshot;
pub use theme::ThemeToken;
pub use types::{Point, Rect, Viewport};
