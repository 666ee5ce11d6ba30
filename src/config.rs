// src/config.rs
//
// Configuración de arranque: de dónde sale el currículo y dónde se guarda
// el progreso.

use std::path::PathBuf;

pub const CURRICULUM_ENV: &str = "PHONICS_CURRICULUM";
pub const DATA_DIR_ENV: &str = "PHONICS_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "phonics_data";
pub const WEB_CURRICULUM_META: &str = "phonics-curriculum";
pub const WEB_DEFAULT_CURRICULUM: &str = "curriculum.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Ruta o URL del currículo; `None` usa el embebido.
    pub curriculum: Option<String>,
    /// Solo en nativo.
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            curriculum: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AppConfig {
    /// Resuelve con una función de consulta (el entorno en producción).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            curriculum: non_empty(CURRICULUM_ENV),
            data_dir: non_empty(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let config = Self::from_lookup(|key| std::env::var(key).ok());
        log::info!(
            "Curriculum: {}, data dir: {}",
            config.curriculum.as_deref().unwrap_or("embedded"),
            config.data_dir.display()
        );
        config
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let query = window
            .as_ref()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let meta = window
            .and_then(|w| w.document())
            .and_then(|d| {
                d.query_selector(&format!("meta[name=\"{WEB_CURRICULUM_META}\"]"))
                    .ok()
                    .flatten()
            })
            .and_then(|e| e.get_attribute("content"));
        let location = web_curriculum_location(&query, meta.as_deref());
        log::info!("Curriculum: {location}");
        Self {
            curriculum: Some(location),
            ..Self::default()
        }
    }
}

/// `?curriculum=`, luego la etiqueta meta, luego `curriculum.json`.
pub fn web_curriculum_location(query: &str, meta: Option<&str>) -> String {
    let non_empty = |v: String| Some(v.trim().to_string()).filter(|v| !v.is_empty());
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "curriculum")
        .and_then(|(_, value)| non_empty(decode_component(value)))
        .or_else(|| meta.and_then(|m| non_empty(m.to_string())))
        .unwrap_or_else(|| WEB_DEFAULT_CURRICULUM.to_string())
}

/// Decodifica `%XX` y `+` de un valor de query; si no es UTF-8 válido lo deja tal cual.
fn decode_component(value: &str) -> String {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(env(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_dir, PathBuf::from("phonics_data"));
    }

    #[test]
    fn environment_overrides_and_blank_is_ignored() {
        let config = AppConfig::from_lookup(env(&[
            (CURRICULUM_ENV, "https://example.org/c.json"),
            (DATA_DIR_ENV, "  "),
        ]));
        assert_eq!(config.curriculum.as_deref(), Some("https://example.org/c.json"));
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn web_location_precedence() {
        assert_eq!(
            web_curriculum_location("?lang=ar&curriculum=data%2Fv2.json", Some("meta.json")),
            "data/v2.json"
        );
        assert_eq!(web_curriculum_location("?lang=ar", Some("meta.json")), "meta.json");
        assert_eq!(web_curriculum_location("", None), WEB_DEFAULT_CURRICULUM);
        assert_eq!(web_curriculum_location("?curriculum=", Some(" ")), WEB_DEFAULT_CURRICULUM);
    }

    #[test]
    fn broken_escape_is_kept() {
        assert_eq!(decode_component("a%zzb"), "a%zzb");
        assert_eq!(decode_component("%C3%A9t%C3%A9.json"), "été.json");
        assert_eq!(decode_component("bad%FF"), "bad%FF");
        assert_eq!(decode_component("50%"), "50%");
        assert_eq!(decode_component("my+file.json"), "my file.json");
    }
}
