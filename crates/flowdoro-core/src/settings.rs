//! User-editable focus and break durations.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::{self, keys, SharedStore};

pub const MAX_FOCUS_MINUTES: u32 = 60;
pub const MAX_BREAK_MINUTES: u32 = 30;

/// Focus and break lengths in minutes.
///
/// Both values are always within `1..=MAX_*_MINUTES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub focus_duration: u32,
    pub break_duration: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: 25,
            break_duration: 5,
        }
    }
}

impl Settings {
    /// Validate raw input. Non-positive values are rejected before
    /// values over the maximum.
    pub fn new(focus_duration: i64, break_duration: i64) -> Result<Self, ValidationError> {
        if focus_duration <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "focus_duration",
                value: focus_duration,
            });
        }
        if break_duration <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "break_duration",
                value: break_duration,
            });
        }
        if focus_duration > i64::from(MAX_FOCUS_MINUTES) {
            return Err(ValidationError::DurationExceedsMaximum {
                field: "focus_duration",
                value: focus_duration,
                max: MAX_FOCUS_MINUTES,
            });
        }
        if break_duration > i64::from(MAX_BREAK_MINUTES) {
            return Err(ValidationError::DurationExceedsMaximum {
                field: "break_duration",
                value: break_duration,
                max: MAX_BREAK_MINUTES,
            });
        }
        // both bounded by the checks above
        Ok(Self {
            focus_duration: focus_duration as u32,
            break_duration: break_duration as u32,
        })
    }

    fn is_valid(&self) -> bool {
        Self::new(self.focus_duration.into(), self.break_duration.into()).is_ok()
    }

    pub fn focus_secs(&self) -> u32 {
        self.focus_duration * 60
    }

    pub fn break_secs(&self) -> u32 {
        self.break_duration * 60
    }
}

/// Loads, validates and persists [`Settings`].
pub struct SettingsManager {
    store: SharedStore,
    current: Settings,
}

impl SettingsManager {
    /// Read the stored settings, or the defaults when absent or invalid.
    pub fn load(store: SharedStore) -> Self {
        let current = match storage::read_json::<Settings>(store.as_ref(), keys::SETTINGS) {
            Some(s) if s.is_valid() => s,
            Some(s) => {
                tracing::warn!(?s, "stored settings out of range, using defaults");
                Settings::default()
            }
            None => Settings::default(),
        };
        Self { store, current }
    }

    pub fn current(&self) -> Settings {
        self.current
    }

    /// Validate and persist new durations.
    ///
    /// On error nothing is stored and the current settings are unchanged.
    pub fn save(
        &mut self,
        focus_duration: i64,
        break_duration: i64,
    ) -> Result<Settings, ValidationError> {
        let settings = Settings::new(focus_duration, break_duration)?;
        match serde_json::to_string(&settings) {
            Ok(json) => storage::write(self.store.as_ref(), keys::SETTINGS, &json),
            Err(e) => tracing::warn!(error = %e, "could not encode settings"),
        }
        self.current = settings;
        tracing::info!(
            focus = settings.focus_duration,
            brk = settings.break_duration,
            "settings saved"
        );
        Ok(settings)
    }
}
