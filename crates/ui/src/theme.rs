use viewport_cat_protocol::ThemeToken;

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            ThemeMode::Dark => dark_visuals(),
            ThemeMode::Light => light_visuals(),
        }
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust

        Crosshair => ResolvedColor::rgba(0x45, 0x47, 0x5a, 160), // Surface1
        Arrow => ResolvedColor::rgb(0x6c, 0x70, 0x86),          // Overlay0

        PanelBackground => ResolvedColor::rgb(0x1e, 0x1e, 0x2e), // Base
        PanelBorder => ResolvedColor::rgb(0x31, 0x32, 0x44),     // Surface0

        ItemLabel => ResolvedColor::rgb(0xa6, 0xad, 0xc8), // Subtext0
        ItemValue => ResolvedColor::rgb(0xcd, 0xd6, 0xf4), // Text

        ButtonBackground => ResolvedColor::rgb(0x18, 0x18, 0x25), // Mantle
        ButtonBorder => ResolvedColor::rgb(0x45, 0x47, 0x5a),
        ButtonText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),
        ButtonCopiedBackground => ResolvedColor::rgb(0xa6, 0xe3, 0xa1), // Green
        ButtonCopiedText => ResolvedColor::rgb(0x11, 0x11, 0x1b),
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(250, 250, 252),

        Crosshair => ResolvedColor::rgba(120, 120, 140, 90),
        Arrow => ResolvedColor::rgb(140, 143, 161),

        PanelBackground => ResolvedColor::rgb(255, 255, 255),
        PanelBorder => ResolvedColor::rgb(210, 210, 220),

        ItemLabel => ResolvedColor::rgb(100, 100, 110),
        ItemValue => ResolvedColor::rgb(20, 20, 30),

        ButtonBackground => ResolvedColor::rgb(240, 240, 245),
        ButtonBorder => ResolvedColor::rgb(210, 210, 220),
        ButtonText => ResolvedColor::rgb(40, 40, 50),
        ButtonCopiedBackground => ResolvedColor::rgb(56, 142, 60),
        ButtonCopiedText => ResolvedColor::rgb(255, 255, 255),
    }
}

/// Catppuccin Mocha dark visuals for egui widgets.
fn dark_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    v.panel_fill = egui::Color32::from_rgb(0x11, 0x11, 0x1b);
    v.window_fill = egui::Color32::from_rgb(0x1e, 0x1e, 0x2e);
    v.selection.stroke = egui::Stroke::new(2.0, egui::Color32::from_rgb(0x89, 0xb4, 0xfa));
    v.window_corner_radius = egui::CornerRadius::same(6);
    v
}

/// Light visuals for egui widgets.
fn light_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::light();
    v.panel_fill = egui::Color32::from_rgb(250, 250, 252);
    v.window_fill = egui::Color32::from_rgb(255, 255, 255);
    v.selection.stroke = egui::Stroke::new(2.0, egui::Color32::from_rgb(50, 110, 220));
    v.window_corner_radius = egui::CornerRadius::same(6);
    v
}
