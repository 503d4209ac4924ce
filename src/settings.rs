use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::DEFAULT_CURRENCY;
use crate::storage::{read_json, write_json, DataDir};
use crate::wishlist::Wishlist;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub has_completed_onboarding: bool,
    pub preferred_currency: String,
    pub enable_notifications: bool,
    pub price_alert_threshold: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            preferred_currency: DEFAULT_CURRENCY.to_string(),
            enable_notifications: true,
            price_alert_threshold: 10.0,
        }
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: UserSettings,
}

impl SettingsStore {
    /// Missing or unreadable settings fall back to the defaults.
    pub fn load(data_dir: &DataDir) -> Self {
        let path = data_dir.state_file(SETTINGS_FILE);

        let settings = if path.exists() {
            read_json(&path).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable settings");
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Self { path, settings }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn update(&mut self, f: impl FnOnce(&mut UserSettings)) {
        f(&mut self.settings);
        self.save();
    }

    fn save(&self) {
        if let Err(e) = write_json(&self.path, &self.settings) {
            warn!(error = %e, "failed to save settings");
        }
    }
}

/// Restores every preference to its default and empties the wishlist.
pub fn reset_app(settings: &mut SettingsStore, wishlist: &mut Wishlist) {
    settings.update(|s| *s = UserSettings::default());
    wishlist.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = DataDir::at(temp_dir.path()).unwrap();

        let store = SettingsStore::load(&data_dir);
        let settings = store.settings();
        assert!(!settings.has_completed_onboarding);
        assert_eq!(settings.preferred_currency, "USD");
        assert!(settings.enable_notifications);
        assert_eq!(settings.price_alert_threshold, 10.0);
    }

    #[test]
    fn test_update_persists_and_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = DataDir::at(temp_dir.path()).unwrap();

        let mut store = SettingsStore::load(&data_dir);
        store.update(|s| {
            s.preferred_currency = "EUR".to_string();
            s.has_completed_onboarding = true;
        });
        assert_eq!(SettingsStore::load(&data_dir).settings(), store.settings());

        fs::write(data_dir.state_file(SETTINGS_FILE), r#"{"enable_notifications": false}"#).unwrap();
        let store = SettingsStore::load(&data_dir);
        assert!(!store.settings().enable_notifications);
        assert_eq!(store.settings().preferred_currency, "USD");
    }

    #[test]
    fn test_reset_app() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = DataDir::at(temp_dir.path()).unwrap();
        let mut store = SettingsStore::load(&data_dir);
        let mut wishlist = Wishlist::load(&data_dir);
        store.update(|s| s.price_alert_threshold = 25.0);
        wishlist.add("1");

        reset_app(&mut store, &mut wishlist);

        assert_eq!(store.settings(), &UserSettings::default());
        assert!(wishlist.is_empty());
        assert!(Wishlist::load(&data_dir).is_empty());
        assert_eq!(SettingsStore::load(&data_dir).settings(), &UserSettings::default());
    }
}
