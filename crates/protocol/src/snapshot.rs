use serde::{Deserialize, Serialize};

/// Point-in-time description of the viewport and the client it runs in.
///
/// Always fully populated. A refresh replaces the whole value; fields are
/// never patched individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Viewport width in device-independent pixels.
    pub width: u32,
    /// Viewport height in device-independent pixels.
    pub height: u32,
    /// Device pixel ratio with exactly two decimals, e.g. `"2.00"`.
    pub pixel_ratio: String,
    /// `"<name> <version>"` of the operating system.
    pub os: String,
    /// `"<name> <version>"` of the browser.
    pub browser: String,
}

impl Snapshot {
    pub fn new(
        width: u32,
        height: u32,
        pixel_ratio: impl Into<String>,
        os: impl Into<String>,
        browser: impl Into<String>,
    ) -> Self {
        Self {
            width,
            height,
            pixel_ratio: pixel_ratio.into(),
            os: os.into(),
            browser: browser.into(),
        }
    }
}
