use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Shape, Stroke, StrokeKind};
use viewport_cat_protocol::{PanelAction, RenderCommand, TextAlign};

use crate::theme::{self, ThemeMode};

/// Screen region that triggers an action when activated.
pub struct HitRegion {
    pub rect: Rect,
    pub action: PanelAction,
    /// Accessible label of the enclosing group, if any.
    pub label: Option<String>,
}

/// Result of rendering a command list: includes hit regions for interaction.
pub struct RenderResult {
    pub hit_regions: Vec<HitRegion>,
}

fn corner(radius: f64) -> CornerRadius {
    CornerRadius::same(radius.clamp(0.0, 255.0) as u8)
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area.
/// Returns hit regions for click/keyboard interaction.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) -> RenderResult {
    let mut hit_regions: Vec<HitRegion> = Vec::new();
    let mut group_labels: Vec<Option<String>> = Vec::new();
    let to_pos = |x: f64, y: f64| Pos2::new(x as f32 + offset.x, y as f32 + offset.y);

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                corner_radius,
                action,
            } => {
                let egui_rect = Rect::from_min_size(
                    to_pos(rect.x, rect.y),
                    egui::vec2(rect.w as f32, rect.h as f32),
                );
                if egui_rect.width() < 0.5 || egui_rect.height() < 0.5 {
                    continue;
                }

                let radius = corner(*corner_radius);
                painter.rect_filled(egui_rect, radius, theme::resolve(*color, mode));
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        radius,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }

                if let Some(action) = action {
                    hit_regions.push(HitRegion {
                        rect: egui_rect,
                        action: *action,
                        label: group_labels.last().cloned().flatten(),
                    });
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    to_pos(position.x, position.y),
                    anchor,
                    text,
                    FontId::proportional(size),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [to_pos(from.x, from.y), to_pos(to.x, to.y)],
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                );
            }

            RenderCommand::DrawPolyline {
                points,
                color,
                width,
            } => {
                let points: Vec<Pos2> = points.iter().map(|p| to_pos(p.x, p.y)).collect();
                painter.add(Shape::line(
                    points,
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                ));
            }

            RenderCommand::BeginGroup { label, .. } => group_labels.push(label.clone()),
            RenderCommand::EndGroup => {
                group_labels.pop();
            }
        }
    }

    RenderResult { hit_regions }
}
