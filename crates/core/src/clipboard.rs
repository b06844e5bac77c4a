use viewport_cat_protocol::Snapshot;

/// Host clipboard. Writes are fire-and-forget: the caller neither waits for
/// nor learns about the outcome.
pub trait Clipboard {
    fn write_text(&mut self, text: &str);
}

/// Plain-text form of a snapshot, one `name: value` per line.
pub fn clipboard_text(snapshot: &Snapshot) -> String {
    format!(
        "width: {},\nheight: {},\npixel-ratio: {},\nos: {},\nbrowser: {}",
        snapshot.width, snapshot.height, snapshot.pixel_ratio, snapshot.os, snapshot.browser,
    )
}
