//! Theme Preference

use platform::prefs::PrefStore;

const THEME_KEY: &str = "theme";

/// UI theme preference. Dark is the default; only an explicitly stored
/// "light" selects the light theme, so an unknown stored value degrades
/// to dark rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn load(store: &dyn PrefStore) -> Self {
        match store.get(THEME_KEY).as_deref() {
            Some("light") => ThemePreference::Light,
            _ => ThemePreference::Dark,
        }
    }

    pub fn save(&self, store: &dyn PrefStore) {
        store.set(THEME_KEY, self.as_str());
    }

    pub fn toggle(&self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::prefs::MemoryPrefs;

    #[test]
    fn test_defaults_to_dark() {
        let prefs = MemoryPrefs::new();
        assert_eq!(ThemePreference::load(&prefs), ThemePreference::Dark);
    }

    #[test]
    fn test_only_stored_light_selects_light() {
        let prefs = MemoryPrefs::new();

        prefs.set("theme", "light");
        assert_eq!(ThemePreference::load(&prefs), ThemePreference::Light);

        prefs.set("theme", "solarized");
        assert_eq!(ThemePreference::load(&prefs), ThemePreference::Dark);
    }

    #[test]
    fn test_toggle_roundtrip() {
        let prefs = MemoryPrefs::new();

        let theme = ThemePreference::load(&prefs).toggle();
        theme.save(&prefs);
        assert_eq!(ThemePreference::load(&prefs), ThemePreference::Light);

        theme.toggle().save(&prefs);
        assert_eq!(ThemePreference::load(&prefs), ThemePreference::Dark);
    }
}
