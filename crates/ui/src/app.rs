use std::time::Duration;

use eframe::egui;
use viewport_cat_core::views::panel;
use viewport_cat_core::{
    Clipboard, EnvironmentReading, PanelConfig, PanelController, SnapshotProvider,
};
use viewport_cat_protocol::{PanelAction, Viewport};

use crate::renderer;
use crate::theme::ThemeMode;

/// Hands copy requests to egui, which forwards them to the platform
/// clipboard at the end of the frame.
struct EguiClipboard<'a>(&'a egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn write_text(&mut self, text: &str) {
        self.0.copy_text(text.to_string());
    }
}

/// Main application state.
pub struct PanelApp {
    provider: SnapshotProvider,
    config: PanelConfig,
    /// Created on the first frame, once the drawable size is known.
    controller: Option<PanelController>,
    /// Drawable size seen on the previous frame, in points.
    last_size: Option<egui::Vec2>,
    /// Read once; the user agent does not change during a session.
    user_agent: String,
    theme_mode: ThemeMode,
}

impl PanelApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Use dark theme by default
        let theme_mode = ThemeMode::Dark;
        cc.egui_ctx.set_visuals(theme_mode.visuals());
        Self::with_config(PanelConfig::default(), theme_mode)
    }

    fn with_config(config: PanelConfig, theme_mode: ThemeMode) -> Self {
        Self {
            provider: SnapshotProvider::default(),
            config,
            controller: None,
            last_size: None,
            user_agent: host_user_agent(),
            theme_mode,
        }
    }

    fn reading(&self, size: egui::Vec2, pixels_per_point: f32) -> EnvironmentReading {
        EnvironmentReading {
            width: size.x as f64,
            height: size.y as f64,
            device_pixel_ratio: pixels_per_point as f64,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Feed this frame's size and clock into the controller, mounting it on
    /// the first frame. A size change is one raw resize event.
    fn advance(&mut self, ctx: &egui::Context, size: egui::Vec2, now: f64) {
        let reading = self.reading(size, ctx.pixels_per_point());
        let resized = self.last_size.is_some_and(|last| last != size);
        self.last_size = Some(size);

        if self.controller.is_none() {
            match PanelController::mount(self.provider.clone(), &reading, &self.config) {
                Ok(controller) => {
                    #[cfg(target_arch = "wasm32")]
                    web_sys::console::log_1(
                        &format!("viewport.cat: mounted at {}x{}", size.x, size.y).into(),
                    );
                    self.controller = Some(controller);
                }
                Err(_e) => {
                    #[cfg(target_arch = "wasm32")]
                    web_sys::console::warn_1(
                        &format!("viewport.cat: {_e}, using default config").into(),
                    );
                    self.config = PanelConfig::default();
                    ctx.request_repaint();
                }
            }
            return;
        }
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        if resized {
            controller.on_resize(now);
        }
        if controller.poll(now, &reading) {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(
                &format!(
                    "viewport.cat: refreshed to {}x{}",
                    controller.snapshot().width,
                    controller.snapshot().height
                )
                .into(),
            );
        }
        if let Some(ms) = controller.next_wakeup(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(ms / 1000.0));
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: PanelAction, now: f64) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match action {
            PanelAction::Copy => {
                if !controller.copy(now, &mut EguiClipboard(ctx)) {
                    return;
                }
                #[cfg(target_arch = "wasm32")]
                web_sys::console::log_1(&"viewport.cat: copy requested".into());
            }
        }
        ctx.request_repaint();
    }

    fn draw_theme_toggle(&mut self, ui: &mut egui::Ui, area: egui::Rect) {
        let label = match self.theme_mode {
            ThemeMode::Dark => "🌙 Dark",
            ThemeMode::Light => "☀ Light",
        };
        let rect = egui::Rect::from_min_size(
            egui::pos2(area.right() - 88.0, area.top() + 8.0),
            egui::vec2(80.0, 24.0),
        );
        if ui.put(rect, egui::Button::new(label)).clicked() {
            self.theme_mode = self.theme_mode.toggled();
            ui.ctx().set_visuals(self.theme_mode.visuals());
        }
    }

    /// One frame of the panel.
    fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time) * 1000.0;

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_rect_before_wrap();
                self.advance(ctx, available.size(), now);

                let Some(controller) = &self.controller else {
                    return;
                };
                let viewport = Viewport::new(
                    available.width() as f64,
                    available.height() as f64,
                    ctx.pixels_per_point() as f64,
                );
                let commands = panel::render_panel(&controller.state(), &viewport);
                let painter = ui.painter_at(available);
                let result =
                    renderer::render_commands(&painter, &commands, available.min, self.theme_mode);

                // Pointer clicks and Enter/Space on the focused region both
                // report as `clicked`.
                let mut activated = None;
                for hit in &result.hit_regions {
                    let response = ui
                        .interact(hit.rect, action_id(hit.action), egui::Sense::click())
                        .on_hover_cursor(egui::CursorIcon::PointingHand);
                    let label = hit.label.clone().unwrap_or_default();
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &label)
                    });
                    if response.has_focus() {
                        painter.rect_stroke(
                            hit.rect,
                            egui::CornerRadius::same(6),
                            ui.visuals().selection.stroke,
                            egui::StrokeKind::Outside,
                        );
                    }
                    if response.clicked() {
                        activated = Some(hit.action);
                    }
                }
                if let Some(action) = activated {
                    self.handle_action(ctx, action, now);
                }

                self.draw_theme_toggle(ui, available);
            });
    }
}

/// Stable widget id of the control bound to `action`, so focus survives
/// between frames.
fn action_id(action: PanelAction) -> egui::Id {
    egui::Id::new(("panel_action", action))
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(controller) = self.controller.as_mut() {
            controller.detach();
        }
    }
}

fn host_user_agent() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events,
            ..Default::default()
        }
    }

    fn key_press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn copied_text(output: &egui::FullOutput) -> Option<&str> {
        output
            .platform_output
            .commands
            .iter()
            .find_map(|command| match command {
                egui::OutputCommand::CopyText(text) => Some(text.as_str()),
                _ => None,
            })
    }

    /// Mount on a first frame, focus the copy button, then press `key`.
    fn press_on_focused_copy(key: egui::Key) -> (PanelApp, egui::FullOutput) {
        let ctx = egui::Context::default();
        let mut app = PanelApp::with_config(PanelConfig::default(), ThemeMode::Dark);

        let first = ctx.run(frame(Vec::new()), |ctx| app.show(ctx));
        assert!(copied_text(&first).is_none());
        assert!(!app.controller.as_ref().unwrap().is_copied());

        ctx.memory_mut(|m| m.request_focus(action_id(PanelAction::Copy)));
        let output = ctx.run(frame(vec![key_press(key)]), |ctx| app.show(ctx));
        (app, output)
    }

    #[test]
    fn enter_on_focused_button_copies() {
        let (app, output) = press_on_focused_copy(egui::Key::Enter);
        let controller = app.controller.as_ref().unwrap();
        assert!(controller.is_copied());
        assert_eq!(copied_text(&output), Some(controller.clipboard_text().as_str()));
        assert!(controller.clipboard_text().starts_with("width: 800,\nheight: 600,"));
    }

    #[test]
    fn space_on_focused_button_copies() {
        let (app, output) = press_on_focused_copy(egui::Key::Space);
        let controller = app.controller.as_ref().unwrap();
        assert!(controller.is_copied());
        assert_eq!(copied_text(&output), Some(controller.clipboard_text().as_str()));
    }

    #[test]
    fn other_keys_do_not_copy() {
        let (app, output) = press_on_focused_copy(egui::Key::A);
        assert!(!app.controller.as_ref().unwrap().is_copied());
        assert!(copied_text(&output).is_none());
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let ctx = egui::Context::default();
        let config = PanelConfig {
            debounce_ms: f64::NAN,
            ..PanelConfig::default()
        };
        let mut app = PanelApp::with_config(config, ThemeMode::Light);

        let _ = ctx.run(frame(Vec::new()), |ctx| app.show(ctx));
        assert!(app.controller.is_none());
        assert_eq!(app.config, PanelConfig::default());

        let _ = ctx.run(frame(Vec::new()), |ctx| app.show(ctx));
        let controller = app.controller.as_ref().unwrap();
        assert_eq!(controller.debounce_ms(), 300.0);
    }
}
