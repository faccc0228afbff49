use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::storage::{SharedStorage, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow::anyhow!("unknown theme: {other}")),
        }
    }
}

/// Light/dark preference kept next to the roster in the same storage.
pub struct ThemePreference {
    storage: SharedStorage,
}

impl ThemePreference {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Anything other than a stored `dark` reads as light; an unset
    /// preference is written as `light`.
    pub fn get(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => {
                if let Err(e) = self.storage.set(THEME_KEY, Theme::Light.as_str()) {
                    warn!(error = %e, "failed to store default theme");
                }
                Theme::Light
            }
            Err(e) => {
                warn!(error = %e, "failed to read theme");
                Theme::Light
            }
        }
    }

    pub fn set(&self, theme: Theme) -> anyhow::Result<()> {
        self.storage.set(THEME_KEY, theme.as_str())
    }

    pub fn toggle(&self) -> anyhow::Result<Theme> {
        let next = self.get().toggled();
        self.set(next)?;
        Ok(next)
    }
}
