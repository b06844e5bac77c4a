#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("viewport.cat")
            .with_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "viewport.cat",
        options,
        Box::new(|cc| Ok(Box::new(viewport_cat_ui::PanelApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start viewport.cat: {e}"))
}

// The web build starts from `viewport_cat_ui::start`.
#[cfg(target_arch = "wasm32")]
fn main() {}
