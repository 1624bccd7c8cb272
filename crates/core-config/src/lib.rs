//! Configuration loading and parsing.
//!
//! Parses `oxcommit.toml` (or an override path provided by the binary). Every
//! section is optional and unknown fields are ignored, so an empty or
//! partial file yields the documented defaults. After the file, `OXCOMMIT_*`
//! environment overrides are applied through an injectable lookup so tests
//! never touch the process environment.
//!
//! The engine never reads configuration directly: [`Config::settings`]
//! resolves (and clamps) everything into a plain [`Settings`] value once.

use anyhow::Result;
use core_vcs::Dialect;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

/// Upper bound for subject and body line limits.
pub const MAX_LINE_LIMIT: usize = 1000;
/// Upper bound for the incomplete-session resume timeout (one week).
pub const MAX_RESUME_TIMEOUT_SECS: u64 = 60 * 60 * 24 * 7;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    pub subject_enabled: bool,
    pub subject: i64,
    pub body_enabled: bool,
    pub body: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            subject_enabled: true,
            subject: 69,
            body_enabled: true,
            body: 72,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    pub automatic_newline_insertion: bool,
    pub highlight_file_changes: bool,
    pub assume_version_controlled: bool,
    pub continuous_spell_checking: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            automatic_newline_insertion: true,
            highlight_file_changes: true,
            assume_version_controlled: false,
            continuous_spell_checking: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SquashConfig {
    pub detect: bool,
    pub disable_spell_checking: bool,
    pub disable_automatic_newline_insertion: bool,
    pub hg_uses_git_comment_style: bool,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            detect: true,
            disable_spell_checking: true,
            disable_automatic_newline_insertion: true,
            hg_uses_git_comment_style: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub resume_incomplete: bool,
    pub resume_timeout_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resume_incomplete: true,
            resume_timeout_secs: 60 * 60,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BreadcrumbsConfig {
    /// Empty disables the audit file.
    pub path: String,
    pub atomic: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub squash: SquashConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub breadcrumbs: BreadcrumbsConfig,
}

/// Values that only come from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub vcs: Option<Dialect>,
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub source: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
    pub env: EnvOverrides,
}

/// Breadcrumbs destination after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbsTarget {
    pub path: PathBuf,
    pub atomic: bool,
}

/// Fully resolved settings injected into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub subject_limit: Option<usize>,
    pub body_limit: Option<usize>,
    pub automatic_newline_insertion: bool,
    pub highlight_file_changes: bool,
    pub assume_version_controlled: bool,
    pub continuous_spell_checking: bool,
    pub detect_squash: bool,
    pub disable_spell_checking_for_squash: bool,
    pub disable_automatic_newline_for_squash: bool,
    pub hg_uses_git_comment_style: bool,
    pub resume_incomplete: bool,
    pub resume_timeout: Duration,
    pub breadcrumbs: Option<BreadcrumbsTarget>,
    pub forced_dialect: Option<Dialect>,
    pub project_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().settings()
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("oxcommit.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxcommit").join("oxcommit.toml");
    }
    PathBuf::from("oxcommit.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_file_absent");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                source: Some(path),
                file,
                env: EnvOverrides::default(),
            })
        }
        Err(err) => {
            // Parse errors fall back to defaults rather than aborting the commit.
            warn!(target: "config", path = %path.display(), error = %err, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A limit override: a number enables the limit, `off` disables it.
fn parse_limit(value: &str) -> Option<(bool, i64)> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("off") {
        return Some((false, 0));
    }
    value.parse::<i64>().ok().map(|n| (true, n))
}

fn ignored(key: &str, value: &str) {
    warn!(target: "config", key, value, "env_override_ignored");
}

impl Config {
    /// Apply `OXCOMMIT_*` overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Apply `OXCOMMIT_*` overrides read through `lookup`. Malformed values are
    /// logged and ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = &mut self.file;
        let bools: [(&str, &mut bool); 7] = [
            (
                "OXCOMMIT_AUTOMATIC_NEWLINE",
                &mut file.editor.automatic_newline_insertion,
            ),
            (
                "OXCOMMIT_HIGHLIGHT_FILE_CHANGES",
                &mut file.editor.highlight_file_changes,
            ),
            (
                "OXCOMMIT_ASSUME_VERSION_CONTROLLED",
                &mut file.editor.assume_version_controlled,
            ),
            ("OXCOMMIT_DETECT_SQUASH", &mut file.squash.detect),
            (
                "OXCOMMIT_HG_GIT_STYLE_FOR_SQUASH",
                &mut file.squash.hg_uses_git_comment_style,
            ),
            (
                "OXCOMMIT_RESUME_INCOMPLETE",
                &mut file.session.resume_incomplete,
            ),
            ("OXCOMMIT_BREADCRUMBS_ATOMIC", &mut file.breadcrumbs.atomic),
        ];
        for (key, slot) in bools {
            if let Some(value) = lookup(key) {
                match parse_bool(&value) {
                    Some(parsed) => *slot = parsed,
                    None => ignored(key, &value),
                }
            }
        }

        let limits: [(&str, &mut bool, &mut i64); 2] = [
            (
                "OXCOMMIT_SUBJECT_LIMIT",
                &mut file.limits.subject_enabled,
                &mut file.limits.subject,
            ),
            (
                "OXCOMMIT_BODY_LIMIT",
                &mut file.limits.body_enabled,
                &mut file.limits.body,
            ),
        ];
        for (key, enabled, limit) in limits {
            if let Some(value) = lookup(key) {
                match parse_limit(&value) {
                    Some((true, n)) => {
                        *enabled = true;
                        *limit = n;
                    }
                    Some((false, _)) => *enabled = false,
                    None => ignored(key, &value),
                }
            }
        }

        if let Some(value) = lookup("OXCOMMIT_RESUME_TIMEOUT") {
            match value.trim().parse::<i64>() {
                Ok(secs) => file.session.resume_timeout_secs = secs,
                Err(_) => ignored("OXCOMMIT_RESUME_TIMEOUT", &value),
            }
        }
        if let Some(value) = lookup("OXCOMMIT_BREADCRUMBS") {
            file.breadcrumbs.path = value;
        }
        if let Some(value) = lookup("OXCOMMIT_VCS") {
            match value.parse::<Dialect>() {
                Ok(dialect) => self.env.vcs = Some(dialect),
                Err(_) => ignored("OXCOMMIT_VCS", &value),
            }
        }
        if let Some(value) = lookup("OXCOMMIT_PROJECT_NAME").filter(|v| !v.is_empty()) {
            self.env.project_name = Some(value);
        }
    }

    /// Resolve into [`Settings`], clamping out-of-range numbers.
    pub fn settings(&self) -> Settings {
        let f = &self.file;
        let subject = clamp_limit("subject", f.limits.subject);
        let body = clamp_limit("body", f.limits.body);
        let resume_secs = clamp_timeout(f.session.resume_timeout_secs);
        let breadcrumbs = (!f.breadcrumbs.path.trim().is_empty()).then(|| BreadcrumbsTarget {
            path: PathBuf::from(&f.breadcrumbs.path),
            atomic: f.breadcrumbs.atomic,
        });

        Settings {
            subject_limit: f.limits.subject_enabled.then_some(subject),
            body_limit: f.limits.body_enabled.then_some(body),
            automatic_newline_insertion: f.editor.automatic_newline_insertion,
            highlight_file_changes: f.editor.highlight_file_changes,
            assume_version_controlled: f.editor.assume_version_controlled,
            continuous_spell_checking: f.editor.continuous_spell_checking,
            detect_squash: f.squash.detect,
            disable_spell_checking_for_squash: f.squash.disable_spell_checking,
            disable_automatic_newline_for_squash: f.squash.disable_automatic_newline_insertion,
            hg_uses_git_comment_style: f.squash.hg_uses_git_comment_style,
            resume_incomplete: f.session.resume_incomplete,
            resume_timeout: Duration::from_secs(resume_secs),
            breadcrumbs,
            forced_dialect: self.env.vcs,
            project_name: self.env.project_name.clone(),
        }
    }
}

fn clamp_limit(which: &'static str, raw: i64) -> usize {
    let clamped = raw.clamp(0, MAX_LINE_LIMIT as i64);
    if clamped != raw {
        info!(target: "config", which, raw, clamped, "line_limit_clamped");
    }
    clamped as usize
}

fn clamp_timeout(raw: i64) -> u64 {
    let clamped = raw.clamp(0, MAX_RESUME_TIMEOUT_SECS as i64);
    if clamped != raw {
        info!(target: "config", raw, clamped, "resume_timeout_clamped");
    }
    clamped as u64
}
