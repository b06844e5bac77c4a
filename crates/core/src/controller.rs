use viewport_cat_protocol::Snapshot;

use crate::clipboard::{Clipboard, clipboard_text};
use crate::config::{ConfigError, ConfirmationPolicy, PanelConfig};
use crate::debounce::Debouncer;
use crate::snapshot::{Environment, SnapshotProvider};
use crate::views::panel::PanelState;

/// State behind the on-screen panel: the displayed snapshot, the copy
/// confirmation, and the resize debounce.
///
/// Hosts feed it raw resize events and clock ticks; it decides when to
/// re-capture. All timestamps are milliseconds on the host's monotonic clock.
#[derive(Debug)]
pub struct PanelController {
    provider: SnapshotProvider,
    snapshot: Snapshot,
    copied: bool,
    copied_at: Option<f64>,
    debouncer: Debouncer,
    confirmation: ConfirmationPolicy,
    attached: bool,
}

impl PanelController {
    /// Validate `config`, capture the initial snapshot and start listening.
    pub fn mount(
        provider: SnapshotProvider,
        env: &dyn Environment,
        config: &PanelConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let snapshot = provider.capture(env);
        Ok(Self {
            provider,
            snapshot,
            copied: false,
            copied_at: None,
            debouncer: Debouncer::new(config.debounce_ms),
            confirmation: config.confirmation,
            attached: true,
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a refresh is waiting for the quiet period to end.
    pub fn is_refresh_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn debounce_ms(&self) -> f64 {
        self.debouncer.window_ms()
    }

    pub fn state(&self) -> PanelState<'_> {
        PanelState {
            snapshot: &self.snapshot,
            copied: self.copied,
        }
    }

    /// A raw resize event. Restarts the quiet period; ignored once detached.
    pub fn on_resize(&mut self, now: f64) {
        if self.attached {
            self.debouncer.trigger(now);
        }
    }

    /// Advance timers to `now`. Re-captures if the resize burst has settled
    /// and reverts an expired confirmation. Returns whether anything visible
    /// changed.
    pub fn poll(&mut self, now: f64, env: &dyn Environment) -> bool {
        if !self.attached {
            return false;
        }
        let mut changed = false;
        if self.debouncer.fire_due(now) {
            self.snapshot = self.provider.capture(env);
            changed = true;
        }
        if let (ConfirmationPolicy::RevertAfter { ms }, Some(at)) =
            (self.confirmation, self.copied_at)
            && now >= at + ms
        {
            self.copied = false;
            self.copied_at = None;
            changed = true;
        }
        changed
    }

    /// Milliseconds until the next [`poll`](Self::poll) could change
    /// something, or `None` when nothing is scheduled.
    pub fn next_wakeup(&self, now: f64) -> Option<f64> {
        if !self.attached {
            return None;
        }
        let revert = match (self.confirmation, self.copied_at) {
            (ConfirmationPolicy::RevertAfter { ms }, Some(at)) => Some((at + ms - now).max(0.0)),
            _ => None,
        };
        match (self.debouncer.remaining(now), revert) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Text the copy action writes for the displayed snapshot.
    pub fn clipboard_text(&self) -> String {
        clipboard_text(&self.snapshot)
    }

    /// Request a clipboard write of the displayed snapshot and show the
    /// confirmation. The flag is set whether or not the write succeeds.
    ///
    /// Returns `false` without writing once detached.
    pub fn copy(&mut self, now: f64, clipboard: &mut dyn Clipboard) -> bool {
        if !self.attached {
            return false;
        }
        clipboard.write_text(&self.clipboard_text());
        self.copied = true;
        self.copied_at = Some(now);
        true
    }

    /// Stop reacting to resizes. A refresh still pending is dropped.
    /// Safe to call more than once.
    pub fn detach(&mut self) {
        self.attached = false;
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::EnvironmentReading;

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Vec<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) {
            self.writes.push(text.to_string());
        }
    }

    fn env(width: f64, height: f64) -> EnvironmentReading {
        EnvironmentReading {
            width,
            height,
            device_pixel_ratio: 2.0,
            user_agent: String::new(),
        }
    }

    fn mounted(config: &PanelConfig) -> PanelController {
        PanelController::mount(SnapshotProvider::default(), &env(800.0, 600.0), config).unwrap()
    }

    #[test]
    fn mount_captures_initial_snapshot() {
        let c = mounted(&PanelConfig::default());
        assert_eq!(c.snapshot().width, 800);
        assert_eq!(c.snapshot().pixel_ratio, "2.00");
        assert!(!c.is_copied());
        assert!(c.is_attached());
        assert_eq!(c.next_wakeup(0.0), None);
    }

    #[test]
    fn refresh_waits_for_quiet_period() {
        let mut c = mounted(&PanelConfig::default());
        c.on_resize(0.0);
        assert!(!c.poll(299.0, &env(1024.0, 768.0)));
        assert_eq!(c.snapshot().width, 800);
        assert!(c.poll(300.0, &env(1024.0, 768.0)));
        assert_eq!(c.snapshot().width, 1024);
        assert!(!c.is_refresh_pending());
    }

    #[test]
    fn copy_sets_flag_immediately() {
        let mut c = mounted(&PanelConfig::default());
        let mut clip = RecordingClipboard::default();
        assert!(c.copy(5.0, &mut clip));
        assert!(c.is_copied());
        assert_eq!(clip.writes.len(), 1);
        assert!(clip.writes[0].starts_with("width: 800,\nheight: 600,"));
    }

    #[test]
    fn sticky_confirmation_never_clears() {
        let mut c = mounted(&PanelConfig::default());
        c.copy(0.0, &mut RecordingClipboard::default());
        assert!(!c.poll(1.0e9, &env(800.0, 600.0)));
        assert!(c.is_copied());
        assert_eq!(c.next_wakeup(10.0), None);
    }

    #[test]
    fn revert_policy_clears_after_delay() {
        let config = PanelConfig {
            confirmation: ConfirmationPolicy::RevertAfter { ms: 2_000.0 },
            ..PanelConfig::default()
        };
        let mut c = mounted(&config);
        c.copy(100.0, &mut RecordingClipboard::default());
        assert_eq!(c.next_wakeup(600.0), Some(1_500.0));
        assert!(!c.poll(2_099.0, &env(800.0, 600.0)));
        assert!(c.is_copied());
        assert!(c.poll(2_100.0, &env(800.0, 600.0)));
        assert!(!c.is_copied());
    }

    #[test]
    fn next_wakeup_takes_earliest_timer() {
        let config = PanelConfig {
            confirmation: ConfirmationPolicy::RevertAfter { ms: 1_000.0 },
            ..PanelConfig::default()
        };
        let mut c = mounted(&config);
        c.copy(0.0, &mut RecordingClipboard::default());
        c.on_resize(900.0);
        assert_eq!(c.next_wakeup(900.0), Some(100.0));
        c.on_resize(0.0);
        assert_eq!(c.next_wakeup(0.0), Some(300.0));
    }

    #[test]
    fn detach_is_idempotent_and_silences_updates() {
        let mut c = mounted(&PanelConfig::default());
        c.on_resize(0.0);
        c.detach();
        c.detach();
        assert!(!c.is_attached());
        assert!(!c.poll(1_000.0, &env(10.0, 10.0)));
        c.on_resize(2_000.0);
        assert!(!c.poll(5_000.0, &env(10.0, 10.0)));
        assert_eq!(c.snapshot().width, 800);
        assert_eq!(c.next_wakeup(0.0), None);
    }

    #[test]
    fn mount_rejects_invalid_config() {
        let config = PanelConfig {
            confirmation: ConfirmationPolicy::RevertAfter { ms: f64::NAN },
            ..PanelConfig::default()
        };
        let err =
            PanelController::mount(SnapshotProvider::default(), &env(800.0, 600.0), &config)
                .unwrap_err();
        assert!(matches!(err, ConfigError::RevertDelay(ms) if ms.is_nan()));

        let config = PanelConfig {
            debounce_ms: 0.0,
            ..PanelConfig::default()
        };
        assert!(matches!(
            PanelController::mount(SnapshotProvider::default(), &env(800.0, 600.0), &config),
            Err(ConfigError::DebounceWindow(_))
        ));
    }

    #[test]
    fn copy_after_detach_is_ignored() {
        let mut c = mounted(&PanelConfig::default());
        c.detach();
        let mut clip = RecordingClipboard::default();
        assert!(!c.copy(0.0, &mut clip));
        assert!(clip.writes.is_empty());
        assert!(!c.is_copied());
    }
}
