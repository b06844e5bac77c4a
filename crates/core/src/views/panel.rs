use viewport_cat_protocol::{
    PanelAction, Point, Rect, RenderCommand, Snapshot, TextAlign, ThemeToken, Viewport,
};

const GUIDE_WIDTH: f64 = 1.0;
const ARROW_LONG: f64 = 40.0;
const ARROW_SHORT: f64 = 20.0;
const ARROW_MARGIN: f64 = 12.0;
const ARROW_WIDTH: f64 = 2.0;

const PANEL_MIN_WIDTH: f64 = 260.0;
const PANEL_PADDING: f64 = 16.0;
const PANEL_RADIUS: f64 = 8.0;
const ROW_HEIGHT: f64 = 24.0;
const FONT_SIZE: f64 = 14.0;
/// Rough advance per character, used to size the panel to its longest row.
const CHAR_WIDTH: f64 = FONT_SIZE * 0.6;
const LABEL_GAP: f64 = 16.0;

const BUTTON_HEIGHT: f64 = 36.0;
const BUTTON_GAP: f64 = 12.0;
const BUTTON_RADIUS: f64 = 6.0;
const ICON_SIZE: f64 = 16.0;

pub const COPY_LABEL: &str = "Copy to clipboard";
pub const COPIED_LABEL: &str = "Copied!";

/// Everything the panel view needs from the controller.
#[derive(Debug, Clone, Copy)]
pub struct PanelState<'a> {
    pub snapshot: &'a Snapshot,
    pub copied: bool,
}

impl PanelState<'_> {
    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, String); 5] {
        let s = self.snapshot;
        [
            ("Width", s.width.to_string()),
            ("Height", s.height.to_string()),
            ("Pixel ratio", s.pixel_ratio.clone()),
            ("OS", s.os.clone()),
            ("Browser", s.browser.clone()),
        ]
    }

    pub fn button_label(&self) -> &'static str {
        if self.copied { COPIED_LABEL } else { COPY_LABEL }
    }
}

/// Whether a keyboard `key` (DOM `KeyboardEvent.key` naming) activates the
/// focused copy button.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Icon {
    Clipboard,
    ClipboardCheck,
}

/// Render the full panel: centre guides, edge arrows, the info box and
/// the copy button.
pub fn render_panel(state: &PanelState<'_>, viewport: &Viewport) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(32);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        color: ThemeToken::Background,
        border_color: None,
        corner_radius: 0.0,
        action: None,
    });

    push_guides(&mut commands, viewport);
    push_arrows(&mut commands, viewport);

    let rows = state.rows();
    let box_rect = panel_rect(&rows, viewport);
    commands.push(RenderCommand::DrawRect {
        rect: box_rect,
        color: ThemeToken::PanelBackground,
        border_color: Some(ThemeToken::PanelBorder),
        corner_radius: PANEL_RADIUS,
        action: None,
    });

    let left = box_rect.x + PANEL_PADDING;
    let right = box_rect.x + box_rect.w - PANEL_PADDING;
    for (i, (label, value)) in rows.into_iter().enumerate() {
        let y = box_rect.y + PANEL_PADDING + ROW_HEIGHT * (i as f64 + 0.5);
        commands.push(RenderCommand::DrawText {
            position: Point::new(left, y),
            text: format!("{label}:"),
            color: ThemeToken::ItemLabel,
            font_size: FONT_SIZE,
            align: TextAlign::Left,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(right, y),
            text: value,
            color: ThemeToken::ItemValue,
            font_size: FONT_SIZE,
            align: TextAlign::Right,
        });
    }

    let button = Rect::new(
        left,
        box_rect.y + box_rect.h - PANEL_PADDING - BUTTON_HEIGHT,
        right - left,
        BUTTON_HEIGHT,
    );
    push_button(&mut commands, button, state);

    commands
}

fn panel_rect(rows: &[(&'static str, String)], viewport: &Viewport) -> Rect {
    let widest = rows
        .iter()
        .map(|(label, value)| (label.len() + 1 + value.chars().count()) as f64 * CHAR_WIDTH)
        .fold(0.0, f64::max);
    let w = (widest + LABEL_GAP + PANEL_PADDING * 2.0).max(PANEL_MIN_WIDTH);
    let h = PANEL_PADDING * 2.0 + ROW_HEIGHT * rows.len() as f64 + BUTTON_GAP + BUTTON_HEIGHT;
    let c = viewport.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
}

/// Place a line of `width` centred near `v` so both its edges fall on
/// device pixel boundaries.
fn snap_to_device(v: f64, width: f64, dpr: f64) -> f64 {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    ((v - width / 2.0) * dpr).round() / dpr + width / 2.0
}

fn push_guides(commands: &mut Vec<RenderCommand>, viewport: &Viewport) {
    let c = viewport.center();
    let x = snap_to_device(c.x, GUIDE_WIDTH, viewport.dpr);
    let y = snap_to_device(c.y, GUIDE_WIDTH, viewport.dpr);
    commands.push(RenderCommand::DrawLine {
        from: Point::new(0.0, y),
        to: Point::new(viewport.width, y),
        color: ThemeToken::Crosshair,
        width: GUIDE_WIDTH,
    });
    commands.push(RenderCommand::DrawLine {
        from: Point::new(x, 0.0),
        to: Point::new(x, viewport.height),
        color: ThemeToken::Crosshair,
        width: GUIDE_WIDTH,
    });
}

/// Chevrons pointing at each edge, centred on the guides.
fn push_arrows(commands: &mut Vec<RenderCommand>, viewport: &Viewport) {
    let c = viewport.center();
    let half = ARROW_LONG / 2.0;
    let top = ARROW_MARGIN;
    let bottom = viewport.height - ARROW_MARGIN;
    let left = ARROW_MARGIN;
    let right = viewport.width - ARROW_MARGIN;

    let chevrons = [
        [
            Point::new(c.x - half, top + ARROW_SHORT),
            Point::new(c.x, top),
            Point::new(c.x + half, top + ARROW_SHORT),
        ],
        [
            Point::new(c.x - half, bottom - ARROW_SHORT),
            Point::new(c.x, bottom),
            Point::new(c.x + half, bottom - ARROW_SHORT),
        ],
        [
            Point::new(left + ARROW_SHORT, c.y - half),
            Point::new(left, c.y),
            Point::new(left + ARROW_SHORT, c.y + half),
        ],
        [
            Point::new(right - ARROW_SHORT, c.y - half),
            Point::new(right, c.y),
            Point::new(right - ARROW_SHORT, c.y + half),
        ],
    ];
    for points in chevrons {
        commands.push(RenderCommand::DrawPolyline {
            points: points.to_vec(),
            color: ThemeToken::Arrow,
            width: ARROW_WIDTH,
        });
    }
}

fn push_button(commands: &mut Vec<RenderCommand>, rect: Rect, state: &PanelState<'_>) {
    let label = state.button_label();
    let (fill, text_color, icon) = if state.copied {
        (
            ThemeToken::ButtonCopiedBackground,
            ThemeToken::ButtonCopiedText,
            Icon::ClipboardCheck,
        )
    } else {
        (
            ThemeToken::ButtonBackground,
            ThemeToken::ButtonText,
            Icon::Clipboard,
        )
    };

    commands.push(RenderCommand::BeginGroup {
        id: "copy-button".to_string(),
        label: Some(label.to_string()),
        action: Some(PanelAction::Copy),
    });
    commands.push(RenderCommand::DrawRect {
        rect,
        color: fill,
        border_color: Some(ThemeToken::ButtonBorder),
        corner_radius: BUTTON_RADIUS,
        action: Some(PanelAction::Copy),
    });

    let text_width = label.len() as f64 * CHAR_WIDTH;
    let content_width = ICON_SIZE + 8.0 + text_width;
    let c = rect.center();
    let icon_rect = Rect::new(
        c.x - content_width / 2.0,
        c.y - ICON_SIZE / 2.0,
        ICON_SIZE * 0.75,
        ICON_SIZE,
    );
    push_icon(commands, icon, icon_rect, fill, text_color);
    commands.push(RenderCommand::DrawText {
        position: Point::new(c.x - content_width / 2.0 + ICON_SIZE + 8.0, c.y),
        text: label.to_string(),
        color: text_color,
        font_size: FONT_SIZE,
        align: TextAlign::Left,
    });
    commands.push(RenderCommand::EndGroup);
}

/// A clipboard outline with a clip at the top; a dash or a check mark inside.
fn push_icon(
    commands: &mut Vec<RenderCommand>,
    icon: Icon,
    rect: Rect,
    fill: ThemeToken,
    stroke: ThemeToken,
) {
    commands.push(RenderCommand::DrawRect {
        rect,
        color: fill,
        border_color: Some(stroke),
        corner_radius: 2.0,
        action: None,
    });
    let clip_w = rect.w * 0.5;
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(rect.x + (rect.w - clip_w) / 2.0, rect.y - 2.0, clip_w, 4.0),
        color: stroke,
        border_color: None,
        corner_radius: 1.0,
        action: None,
    });
    let points = match icon {
        Icon::Clipboard => vec![
            Point::new(rect.x + rect.w * 0.25, rect.y + rect.h * 0.55),
            Point::new(rect.x + rect.w * 0.75, rect.y + rect.h * 0.55),
        ],
        Icon::ClipboardCheck => vec![
            Point::new(rect.x + rect.w * 0.22, rect.y + rect.h * 0.55),
            Point::new(rect.x + rect.w * 0.45, rect.y + rect.h * 0.72),
            Point::new(rect.x + rect.w * 0.78, rect.y + rect.h * 0.38),
        ],
    };
    commands.push(RenderCommand::DrawPolyline {
        points,
        color: stroke,
        width: 2.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new(800, 600, "2.00", "Mac OS 13.1", "Chrome 110.0.0")
    }

    fn texts(cmds: &[RenderCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rows_in_display_order() {
        let snap = snapshot();
        let state = PanelState {
            snapshot: &snap,
            copied: false,
        };
        let cmds = render_panel(&state, &Viewport::new(800.0, 600.0, 2.0));
        let t = texts(&cmds);
        assert_eq!(
            &t[..10],
            &[
                "Width:",
                "800",
                "Height:",
                "600",
                "Pixel ratio:",
                "2.00",
                "OS:",
                "Mac OS 13.1",
                "Browser:",
                "Chrome 110.0.0"
            ]
        );
        assert_eq!(t[10], COPY_LABEL);
    }

    #[test]
    fn button_follows_confirmation() {
        let snap = snapshot();
        let state = PanelState {
            snapshot: &snap,
            copied: true,
        };
        let cmds = render_panel(&state, &Viewport::new(800.0, 600.0, 1.0));
        assert!(texts(&cmds).contains(&COPIED_LABEL));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawRect {
                color: ThemeToken::ButtonCopiedBackground,
                ..
            }
        )));
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::BeginGroup { label: Some(l), action: Some(PanelAction::Copy), .. } if l == COPIED_LABEL
        )));
    }

    #[test]
    fn draws_guides_and_arrows() {
        let snap = snapshot();
        let state = PanelState {
            snapshot: &snap,
            copied: false,
        };
        let cmds = render_panel(&state, &Viewport::new(400.0, 300.0, 1.0));
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
            .count();
        let arrows = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawPolyline { color: ThemeToken::Arrow, .. }))
            .count();
        assert_eq!(lines, 2);
        assert_eq!(arrows, 4);
    }

    #[test]
    fn guides_land_on_device_pixels() {
        let snap = snapshot();
        let state = PanelState {
            snapshot: &snap,
            copied: false,
        };
        let vertical_x = |dpr: f64| {
            render_panel(&state, &Viewport::new(400.0, 300.0, dpr))
                .into_iter()
                .find_map(|c| match c {
                    RenderCommand::DrawLine { from, .. } if from.y == 0.0 => Some(from.x),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(vertical_x(1.0), 200.5);
        assert_eq!(vertical_x(2.0), 200.0);
        assert_eq!(vertical_x(f64::NAN), 200.5);
    }

    #[test]
    fn enter_and_space_activate() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
        assert!(!is_activation_key("Spacebar"));
        assert!(!is_activation_key("a"));
    }

    #[test]
    fn panel_grows_for_long_values() {
        let long = Snapshot::new(1, 1, "1.00", "x".repeat(80), "y");
        let state = PanelState {
            snapshot: &long,
            copied: false,
        };
        let rows = state.rows();
        let rect = panel_rect(&rows, &Viewport::new(2000.0, 1000.0, 1.0));
        assert!(rect.w > PANEL_MIN_WIDTH);
        assert!((rect.center().x - 1000.0).abs() < 1e-9);
        assert!((rect.center().y - 500.0).abs() < 1e-9);
    }
}
