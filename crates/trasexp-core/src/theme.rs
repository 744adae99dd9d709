//! Theme resolution

use serde::{Deserialize, Serialize};
pub use trasexp_config::ThemeMode;

/// Theme actually shown after resolving `SYSTEM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppliedTheme {
    Light,
    Dark,
}

impl AppliedTheme {
    fn from_dark(dark: bool) -> Self {
        if dark {
            AppliedTheme::Dark
        } else {
            AppliedTheme::Light
        }
    }
}

pub fn resolve(mode: ThemeMode, system_prefers_dark: bool) -> AppliedTheme {
    match mode {
        ThemeMode::Light => AppliedTheme::Light,
        ThemeMode::Dark => AppliedTheme::Dark,
        ThemeMode::System => AppliedTheme::from_dark(system_prefers_dark),
    }
}

/// Next mode for the header toggle.
///
/// From `SYSTEM` the toggle picks the opposite of what the system shows,
/// so one click always changes what the user sees.
pub fn toggle(mode: ThemeMode, system_prefers_dark: bool) -> ThemeMode {
    match resolve(mode, system_prefers_dark) {
        AppliedTheme::Dark => ThemeMode::Light,
        AppliedTheme::Light => ThemeMode::Dark,
    }
}

/// Theme state reported to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub applied: AppliedTheme,
}

impl ThemeState {
    pub fn new(mode: ThemeMode, system_prefers_dark: bool) -> Self {
        Self {
            mode,
            applied: resolve(mode, system_prefers_dark),
        }
    }
}
