use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::date::CalendarDate;
use crate::error::Result;

/// The part of a calendar's state that survives a restart.
///
/// Restore it with [`CalendarController::restore`](crate::controller::CalendarController::restore),
/// which applies the range before the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<CalendarDate>,
}

impl SavedState {
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let state = SavedState::from_toml(&fs::read_to_string(path)?)?;
        log::info!("restored calendar state from {}", path.display());
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml()?)?;
        log::info!("saved calendar state to {}", path.display());
        Ok(())
    }
}
