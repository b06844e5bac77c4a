//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use viewport_cat_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette. Groups carrying an action become
/// focusable `role="button"` elements tagged with `data-action`, so a DOM
/// host can route clicks and key presses back to the panel.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="display:block;font-family:system-ui,-apple-system,sans-serif">"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                corner_radius,
                ..
            } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{corner_radius}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(bc) = border_color {
                    svg.push_str(&format!(r#" stroke="{}""#, resolve_color(*bc, dark)));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}" dominant-baseline="central" style="pointer-events:none">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawPolyline {
                points,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let coords = points
                    .iter()
                    .map(|p| format!("{},{}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                svg.push_str(&format!(
                    r#"<polyline points="{coords}" fill="none" stroke="{stroke}" stroke-width="{line_width}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                ));
            }
            RenderCommand::BeginGroup { id, label, action } => {
                svg.push_str(&format!(r#"<g id="{}""#, escape_xml(id)));
                if let Some(action) = action {
                    svg.push_str(&format!(
                        r#" role="button" tabindex="0" data-action="{}" style="cursor:pointer""#,
                        action.as_str(),
                    ));
                }
                if let Some(label) = label {
                    svg.push_str(&format!(r#" aria-label="{}""#, escape_xml(label)));
                }
                svg.push('>');
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#11111b",
            ThemeToken::Crosshair => "#45475a",
            ThemeToken::Arrow => "#6c7086",
            ThemeToken::PanelBackground => "#1e1e2e",
            ThemeToken::PanelBorder | ThemeToken::ButtonBorder => "#313244",
            ThemeToken::ItemLabel => "#a6adc8",
            ThemeToken::ItemValue | ThemeToken::ButtonText => "#cdd6f4",
            ThemeToken::ButtonBackground => "#181825",
            ThemeToken::ButtonCopiedBackground => "#a6e3a1",
            ThemeToken::ButtonCopiedText => "#11111b",
        }
    } else {
        match token {
            ThemeToken::Background => "#eff1f5",
            ThemeToken::Crosshair => "#bcc0cc",
            ThemeToken::Arrow => "#8c8fa1",
            ThemeToken::PanelBackground => "#ffffff",
            ThemeToken::PanelBorder | ThemeToken::ButtonBorder => "#ccd0da",
            ThemeToken::ItemLabel => "#6c6f85",
            ThemeToken::ItemValue | ThemeToken::ButtonText => "#4c4f69",
            ThemeToken::ButtonBackground => "#e6e9ef",
            ThemeToken::ButtonCopiedBackground => "#40a02b",
            ThemeToken::ButtonCopiedText => "#ffffff",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
