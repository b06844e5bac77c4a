//! User-agent classification.
//!
//! The panel only needs a name and a version for the operating system and the
//! browser. [`UserAgentParser`] is the seam; [`RuleParser`] is the default
//! implementation, an ordered table of regex rules where the first match wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rendered in place of a name or version the parser could not determine.
pub const PLACEHOLDER: &str = "undefined";

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid rule pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// A name/version pair extracted from a user-agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            version,
        }
    }

    /// `"<name> <version>"`, with [`PLACEHOLDER`] standing in for missing parts.
    pub fn label(&self) -> String {
        format!(
            "{} {}",
            self.name.as_deref().unwrap_or(PLACEHOLDER),
            self.version.as_deref().unwrap_or(PLACEHOLDER),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentInfo {
    pub os: Component,
    pub browser: Component,
}

/// Classifies a raw user-agent string. Implementations are read-only after
/// construction so one instance can be shared by every capture.
pub trait UserAgentParser {
    fn parse(&self, user_agent: &str) -> UserAgentInfo;
}

/// How the version of a matched rule is derived from capture group 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFrom {
    /// No version is reported.
    Nothing,
    /// Capture group 1, verbatim.
    Group,
    /// Capture group 1 with `_` separators turned into `.` (Apple platforms).
    Underscored,
    /// Capture group 1 is a Windows NT kernel version mapped to its release name.
    WindowsNt,
}

/// Source form of a rule. Patterns are compiled case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub pattern: &'static str,
    pub name: &'static str,
    pub version: VersionFrom,
}

const fn rule(pattern: &'static str, name: &'static str, version: VersionFrom) -> RuleSpec {
    RuleSpec {
        pattern,
        name,
        version,
    }
}

/// Browser rules. Order matters: Chromium derivatives announce `Chrome/` too,
/// and nearly everything announces `Safari/`.
pub const BROWSER_RULES: &[RuleSpec] = &[
    rule(r"\bEdg(?:e|A|iOS)?/([\w.]+)", "Edge", VersionFrom::Group),
    rule(r"\b(?:OPR|OPiOS)/([\w.]+)", "Opera", VersionFrom::Group),
    rule(r"\bOpera/.*Version/([\w.]+)", "Opera", VersionFrom::Group),
    rule(r"\bSamsungBrowser/([\w.]+)", "Samsung Browser", VersionFrom::Group),
    rule(r"\bHeadlessChrome/([\w.]+)", "Chrome Headless", VersionFrom::Group),
    rule(r"\bCriOS/([\w.]+)", "Chrome", VersionFrom::Group),
    rule(r"\bFxiOS/([\w.]+)", "Firefox", VersionFrom::Group),
    rule(r"\bFirefox/([\w.]+)", "Firefox", VersionFrom::Group),
    rule(r"; wv\).+Chrome/([\w.]+)", "Chrome WebView", VersionFrom::Group),
    rule(r"\bChrome/([\w.]+)", "Chrome", VersionFrom::Group),
    rule(
        r"\bVersion/([\w.]+).*Mobile/\S+ Safari",
        "Mobile Safari",
        VersionFrom::Group,
    ),
    rule(r"\bVersion/([\w.]+).*Safari/", "Safari", VersionFrom::Group),
    rule(r"\bMSIE ([\w.]+)", "IE", VersionFrom::Group),
    rule(r"\bTrident/.+rv[: ]([\w.]+)", "IE", VersionFrom::Group),
];

/// Operating-system rules. iOS and Android come before the desktop
/// platforms they mimic (`like Mac OS X`, `Linux`).
pub const OS_RULES: &[RuleSpec] = &[
    rule(r"\bWindows Phone(?: OS)? ([\d.]+)", "Windows Phone", VersionFrom::Group),
    rule(r"\bWindows NT ([\d.]+)", "Windows", VersionFrom::WindowsNt),
    rule(r"\b(?:iPhone|iPad|iPod).*? OS ([\d_]+)", "iOS", VersionFrom::Underscored),
    rule(r"\bCrOS \S+ ([\d.]+)", "Chrome OS", VersionFrom::Group),
    rule(r"\bMac OS X(?: ([\d_.]+))?", "Mac OS", VersionFrom::Underscored),
    rule(r"\bAndroid(?:[ /]([\d.]+))?", "Android", VersionFrom::Group),
    rule(r"\bUbuntu(?:/([\d.]+))?", "Ubuntu", VersionFrom::Group),
    rule(r"\bFedora(?:/([\w.\-]+))?", "Fedora", VersionFrom::Group),
    rule(r"\bLinux\b", "Linux", VersionFrom::Nothing),
];

#[derive(Debug)]
struct Rule {
    regex: Regex,
    name: &'static str,
    version: VersionFrom,
}

impl Rule {
    fn compile(spec: &RuleSpec) -> Result<Self, ParserError> {
        let regex = Regex::new(&format!("(?i){}", spec.pattern)).map_err(|source| {
            ParserError::InvalidPattern {
                pattern: spec.pattern,
                source,
            }
        })?;
        Ok(Self {
            regex,
            name: spec.name,
            version: spec.version,
        })
    }

    fn apply(&self, user_agent: &str) -> Option<Component> {
        let caps = self.regex.captures(user_agent)?;
        let group = caps.get(1).map(|m| m.as_str());
        let version = match self.version {
            VersionFrom::Nothing => None,
            VersionFrom::Group => group.map(str::to_string),
            VersionFrom::Underscored => group.map(|v| v.replace('_', ".")),
            VersionFrom::WindowsNt => group.map(windows_release),
        };
        Some(Component::new(self.name, version))
    }
}

fn windows_release(nt: &str) -> String {
    match nt {
        "10.0" => "10",
        "6.3" => "8.1",
        "6.2" => "8",
        "6.1" => "7",
        "6.0" => "Vista",
        "5.1" | "5.2" => "XP",
        "5.0" => "2000",
        other => other,
    }
    .to_string()
}

/// Regex rule-table parser. Patterns are compiled once at construction.
#[derive(Debug)]
pub struct RuleParser {
    browser: Vec<Rule>,
    os: Vec<Rule>,
}

impl RuleParser {
    /// Parser over the built-in [`BROWSER_RULES`] and [`OS_RULES`].
    pub fn builtin() -> Self {
        // Built-in patterns are checked by `builtin_rules_compile`. Should one
        // ever fail, every agent reads as unknown rather than half-parsed.
        Self::with_rules(BROWSER_RULES, OS_RULES).unwrap_or_else(|_| Self::empty())
    }

    /// Parser over caller-supplied tables, rejecting any invalid pattern.
    pub fn with_rules(browser: &[RuleSpec], os: &[RuleSpec]) -> Result<Self, ParserError> {
        Ok(Self {
            browser: browser.iter().map(Rule::compile).collect::<Result<_, _>>()?,
            os: os.iter().map(Rule::compile).collect::<Result<_, _>>()?,
        })
    }

    /// Parser that recognises nothing.
    pub fn empty() -> Self {
        Self {
            browser: Vec::new(),
            os: Vec::new(),
        }
    }

    fn first_match(rules: &[Rule], user_agent: &str) -> Component {
        rules
            .iter()
            .find_map(|r| r.apply(user_agent))
            .unwrap_or_default()
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::builtin()
    }
}

impl UserAgentParser for RuleParser {
    fn parse(&self, user_agent: &str) -> UserAgentInfo {
        UserAgentInfo {
            os: Self::first_match(&self.os, user_agent),
            browser: Self::first_match(&self.browser, user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC_CHROME: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";
    const WIN_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36 Edg/110.0.1587.57";
    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_3 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Mobile/15E148 Safari/604.1";
    const ANDROID_FIREFOX: &str = "Mozilla/5.0 (Android 13; Mobile; rv:109.0) Gecko/109.0 Firefox/109.0";
    const LINUX_FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/109.0";
    const WIN7_IE: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64; Trident/7.0; rv:11.0) like Gecko";

    fn labels(ua: &str) -> (String, String) {
        let info = RuleParser::builtin().parse(ua);
        (info.os.label(), info.browser.label())
    }

    #[test]
    fn builtin_rules_compile() {
        let parser = RuleParser::with_rules(BROWSER_RULES, OS_RULES).unwrap();
        assert_eq!(parser.browser.len(), BROWSER_RULES.len());
        assert_eq!(parser.os.len(), OS_RULES.len());

        let builtin = RuleParser::builtin();
        assert_eq!(builtin.browser.len(), BROWSER_RULES.len());
        assert_eq!(builtin.os.len(), OS_RULES.len());
    }

    #[test]
    fn chromebook_reports_chrome_os() {
        let cros = "Mozilla/5.0 (X11; CrOS x86_64 15359.58.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";
        assert_eq!(
            labels(cros),
            (
                "Chrome OS 15359.58.0".to_string(),
                "Chrome 112.0.0.0".to_string()
            )
        );
    }

    #[test]
    fn empty_parser_recognises_nothing() {
        let info = RuleParser::empty().parse(WIN7_IE);
        assert_eq!(info, UserAgentInfo::default());
    }

    #[test]
    fn desktop_agents() {
        assert_eq!(
            labels(MAC_CHROME),
            ("Mac OS 13.1".to_string(), "Chrome 110.0.0.0".to_string())
        );
        assert_eq!(
            labels(WIN_EDGE),
            ("Windows 10".to_string(), "Edge 110.0.1587.57".to_string())
        );
        assert_eq!(
            labels(LINUX_FIREFOX),
            ("Linux undefined".to_string(), "Firefox 109.0".to_string())
        );
        assert_eq!(labels(WIN7_IE), ("Windows 7".to_string(), "IE 11.0".to_string()));
    }

    #[test]
    fn mobile_agents_win_over_desktop_lookalikes() {
        assert_eq!(
            labels(IPHONE_SAFARI),
            ("iOS 16.3".to_string(), "Mobile Safari 16.3".to_string())
        );
        assert_eq!(
            labels(ANDROID_FIREFOX),
            ("Android 13".to_string(), "Firefox 109.0".to_string())
        );
    }

    #[test]
    fn unknown_agent_yields_placeholders() {
        let info = RuleParser::builtin().parse("curl/8.0.1");
        assert_eq!(info, UserAgentInfo::default());
        assert_eq!(info.os.label(), "undefined undefined");
        assert_eq!(labels("").1, "undefined undefined");
    }

    #[test]
    fn rejects_invalid_custom_pattern() {
        let bad = [rule(r"Chrome/(", "Chrome", VersionFrom::Group)];
        let err = RuleParser::with_rules(&bad, OS_RULES).unwrap_err();
        assert!(err.to_string().contains("Chrome/("));
    }

    #[test]
    fn missing_version_uses_placeholder() {
        let c = Component::new("Mac OS", None);
        assert_eq!(c.label(), "Mac OS undefined");
    }
}
