//! Streaming Settings
//!
//! Typed settings over the untyped preference store. Each field loads
//! from its own key; a missing or unparseable stored value falls back to
//! the field's default instead of failing the whole load.

use platform::prefs::PrefStore;

/// All user-tunable streaming settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend_base_url: String,
    pub transcription_api_key: String,
    pub voice_name: String,
    pub sample_rate: u32,
    pub system_instructions: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub fps: u32,
    pub resize_width: u32,
    pub quality: f64,
    pub harassment_threshold: u8,
    pub dangerous_content_threshold: u8,
    pub sexually_explicit_threshold: u8,
    pub civic_integrity_threshold: u8,
    pub transcribe_models_speech: bool,
    pub transcribe_users_speech: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8080".to_string(),
            transcription_api_key: String::new(),
            voice_name: "Aoede".to_string(),
            sample_rate: 27000,
            system_instructions: "You are a helpful assistant named Theta.".to_string(),
            temperature: 1.8,
            top_p: 0.95,
            top_k: 65,
            fps: 1,
            resize_width: 640,
            quality: 0.3,
            harassment_threshold: 3,
            dangerous_content_threshold: 3,
            sexually_explicit_threshold: 3,
            civic_integrity_threshold: 3,
            transcribe_models_speech: true,
            transcribe_users_speech: false,
        }
    }
}

impl Settings {
    pub fn load(store: &dyn PrefStore) -> Self {
        let defaults = Self::default();

        Self {
            backend_base_url: string(store, "backend_base_url", defaults.backend_base_url),
            transcription_api_key: string(
                store,
                "transcription_api_key",
                defaults.transcription_api_key,
            ),
            voice_name: string(store, "voice_name", defaults.voice_name),
            sample_rate: parsed(store, "sample_rate", defaults.sample_rate),
            system_instructions: string(
                store,
                "system_instructions",
                defaults.system_instructions,
            ),
            temperature: parsed(store, "temperature", defaults.temperature),
            top_p: parsed(store, "top_p", defaults.top_p),
            top_k: parsed(store, "top_k", defaults.top_k),
            fps: parsed(store, "fps", defaults.fps),
            resize_width: parsed(store, "resize_width", defaults.resize_width),
            quality: parsed(store, "quality", defaults.quality),
            harassment_threshold: parsed(store, "harassment_threshold", defaults.harassment_threshold),
            dangerous_content_threshold: parsed(
                store,
                "dangerous_content_threshold",
                defaults.dangerous_content_threshold,
            ),
            sexually_explicit_threshold: parsed(
                store,
                "sexually_explicit_threshold",
                defaults.sexually_explicit_threshold,
            ),
            civic_integrity_threshold: parsed(
                store,
                "civic_integrity_threshold",
                defaults.civic_integrity_threshold,
            ),
            transcribe_models_speech: parsed(
                store,
                "transcribe_models_speech",
                defaults.transcribe_models_speech,
            ),
            transcribe_users_speech: parsed(
                store,
                "transcribe_users_speech",
                defaults.transcribe_users_speech,
            ),
        }
    }

    pub fn save(&self, store: &dyn PrefStore) {
        store.set("backend_base_url", &self.backend_base_url);
        store.set("transcription_api_key", &self.transcription_api_key);
        store.set("voice_name", &self.voice_name);
        store.set("sample_rate", &self.sample_rate.to_string());
        store.set("system_instructions", &self.system_instructions);
        store.set("temperature", &self.temperature.to_string());
        store.set("top_p", &self.top_p.to_string());
        store.set("top_k", &self.top_k.to_string());
        store.set("fps", &self.fps.to_string());
        store.set("resize_width", &self.resize_width.to_string());
        store.set("quality", &self.quality.to_string());
        store.set("harassment_threshold", &self.harassment_threshold.to_string());
        store.set(
            "dangerous_content_threshold",
            &self.dangerous_content_threshold.to_string(),
        );
        store.set(
            "sexually_explicit_threshold",
            &self.sexually_explicit_threshold.to_string(),
        );
        store.set(
            "civic_integrity_threshold",
            &self.civic_integrity_threshold.to_string(),
        );
        store.set(
            "transcribe_models_speech",
            &self.transcribe_models_speech.to_string(),
        );
        store.set(
            "transcribe_users_speech",
            &self.transcribe_users_speech.to_string(),
        );
    }
}

fn string(store: &dyn PrefStore, key: &str, default: String) -> String {
    store.get(key).unwrap_or(default)
}

fn parsed<T: std::str::FromStr>(store: &dyn PrefStore, key: &str, default: T) -> T {
    match store.get(key) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::debug!(key, "Unparseable stored setting, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::prefs::MemoryPrefs;

    #[test]
    fn test_load_from_empty_store_yields_defaults() {
        let prefs = MemoryPrefs::new();
        assert_eq!(Settings::load(&prefs), Settings::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let prefs = MemoryPrefs::new();

        let settings = Settings {
            voice_name: "Puck".to_string(),
            temperature: 0.7,
            top_k: 40,
            harassment_threshold: 1,
            transcribe_users_speech: true,
            ..Default::default()
        };
        settings.save(&prefs);

        assert_eq!(Settings::load(&prefs), settings);
    }

    #[test]
    fn test_unparseable_value_falls_back_per_field() {
        let prefs = MemoryPrefs::new();
        prefs.set("temperature", "hot");
        prefs.set("top_k", "40");

        let settings = Settings::load(&prefs);
        assert_eq!(settings.temperature, Settings::default().temperature);
        assert_eq!(settings.top_k, 40);
    }

    #[test]
    fn test_bool_fields_parse_stored_strings() {
        let prefs = MemoryPrefs::new();
        prefs.set("transcribe_models_speech", "false");
        prefs.set("transcribe_users_speech", "true");

        let settings = Settings::load(&prefs);
        assert!(!settings.transcribe_models_speech);
        assert!(settings.transcribe_users_speech);
    }
}
