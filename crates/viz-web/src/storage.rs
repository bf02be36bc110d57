use viz_core::Settings;
use web_sys as web;

const SETTINGS_KEY: &str = "vizSettings";

fn local_storage() -> Option<web::Storage> {
    web::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Persisted settings, or defaults when storage is unavailable or empty.
pub fn load_settings() -> Settings {
    local_storage()
        .and_then(|s| s.get_item(SETTINGS_KEY).ok().flatten())
        .map(|text| Settings::from_json_lenient(&text))
        .unwrap_or_default()
}

pub fn save_settings(settings: &Settings) {
    let Some(storage) = local_storage() else {
        return;
    };
    if let Err(e) = storage.set_item(SETTINGS_KEY, &settings.to_json()) {
        log::warn!("[settings] save failed: {:?}", e);
    }
}
