use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    // Guides drawn behind the panel
    Crosshair,
    Arrow,

    PanelBackground,
    PanelBorder,

    ItemLabel,
    ItemValue,

    // Copy button
    ButtonBackground,
    ButtonBorder,
    ButtonText,
    ButtonCopiedBackground,
    ButtonCopiedText,
}
