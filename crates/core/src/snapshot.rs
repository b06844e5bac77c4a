use std::sync::Arc;

use viewport_cat_protocol::Snapshot;

use crate::ua::{RuleParser, UserAgentParser};

/// Raw values read from the host at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentReading {
    /// Viewport width in device-independent pixels (may be fractional).
    pub width: f64,
    /// Viewport height in device-independent pixels (may be fractional).
    pub height: f64,
    pub device_pixel_ratio: f64,
    /// Empty when the host has no user agent (native builds).
    pub user_agent: String,
}

/// Source of viewport and client information: the browser window, the egui
/// context, or a fixed reading in tests.
pub trait Environment {
    fn read(&self) -> EnvironmentReading;
}

impl Environment for EnvironmentReading {
    fn read(&self) -> EnvironmentReading {
        self.clone()
    }
}

/// Builds [`Snapshot`]s from an [`Environment`].
///
/// Holds one parser for its whole lifetime; cloning the provider shares it.
#[derive(Clone)]
pub struct SnapshotProvider {
    parser: Arc<dyn UserAgentParser + Send + Sync>,
}

impl SnapshotProvider {
    pub fn new(parser: Arc<dyn UserAgentParser + Send + Sync>) -> Self {
        Self { parser }
    }

    /// Read the environment and build a fully populated snapshot.
    ///
    /// Never fails: unreadable sizes become 0, an unusable pixel ratio
    /// becomes 1, and unclassified agents produce placeholder labels.
    pub fn capture(&self, env: &dyn Environment) -> Snapshot {
        let reading = env.read();
        let ua = self.parser.parse(&reading.user_agent);
        Snapshot {
            width: to_css_px(reading.width),
            height: to_css_px(reading.height),
            pixel_ratio: format_pixel_ratio(reading.device_pixel_ratio),
            os: ua.os.label(),
            browser: ua.browser.label(),
        }
    }
}

impl Default for SnapshotProvider {
    fn default() -> Self {
        Self::new(Arc::new(RuleParser::builtin()))
    }
}

impl std::fmt::Debug for SnapshotProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotProvider").finish_non_exhaustive()
    }
}

fn to_css_px(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        // `as` saturates at u32::MAX
        v.round() as u32
    } else {
        0
    }
}

/// Two decimals, ties rounded away from zero (`2.625` → `"2.63"`).
pub fn format_pixel_ratio(ratio: f64) -> String {
    let ratio = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    };
    format!("{:.2}", (ratio * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(width: f64, height: f64, dpr: f64, ua: &str) -> EnvironmentReading {
        EnvironmentReading {
            width,
            height,
            device_pixel_ratio: dpr,
            user_agent: ua.to_string(),
        }
    }

    #[test]
    fn captures_dimensions_and_ratio() {
        let provider = SnapshotProvider::default();
        let snap = provider.capture(&reading(1280.0, 720.0, 1.5, ""));
        assert_eq!(snap.width, 1280);
        assert_eq!(snap.height, 720);
        assert_eq!(snap.pixel_ratio, "1.50");
    }

    #[test]
    fn pixel_ratio_formatting() {
        assert_eq!(format_pixel_ratio(2.0), "2.00");
        assert_eq!(format_pixel_ratio(1.25), "1.25");
        assert_eq!(format_pixel_ratio(2.625), "2.63");
        assert_eq!(format_pixel_ratio(1.3333333), "1.33");
        assert_eq!(format_pixel_ratio(0.0), "1.00");
        assert_eq!(format_pixel_ratio(f64::NAN), "1.00");
    }

    #[test]
    fn fractional_and_invalid_sizes() {
        let provider = SnapshotProvider::default();
        let snap = provider.capture(&reading(1092.8, -5.0, 1.0, ""));
        assert_eq!(snap.width, 1093);
        assert_eq!(snap.height, 0);
        let snap = provider.capture(&reading(f64::INFINITY, 10.2, 1.0, ""));
        assert_eq!(snap.width, 0);
        assert_eq!(snap.height, 10);
    }

    #[test]
    fn unclassified_agent_keeps_placeholders() {
        let snap = SnapshotProvider::default().capture(&reading(10.0, 10.0, 1.0, ""));
        assert_eq!(snap.os, "undefined undefined");
        assert_eq!(snap.browser, "undefined undefined");
    }

    #[test]
    fn clones_share_one_parser() {
        let provider = SnapshotProvider::default();
        let other = provider.clone();
        assert!(Arc::ptr_eq(&provider.parser, &other.parser));

        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/109.0";
        let a = provider.capture(&reading(800.0, 600.0, 1.0, ua));
        let b = other.capture(&reading(800.0, 600.0, 1.0, ua));
        assert_eq!(a, b);
        assert_eq!(a.browser, "Firefox 109.0");
    }
}
