// src/data.rs
//
// Fuentes del currículo: el YAML embebido, un fichero local, una URL.

use crate::error::CurriculumError;
use crate::model::Curriculum;

/// Currículo por defecto, embebido en el binario
const EMBEDDED_CURRICULUM: &str = include_str!("data/curriculum.yaml");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_location(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        let path = lower.split(&['?', '#'][..]).next().unwrap_or("");
        if path.ends_with(".yaml") || path.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Json
        }
    }
}

pub fn parse_curriculum(text: &str, format: DocumentFormat) -> Result<Curriculum, CurriculumError> {
    let curriculum = match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(curriculum)
}

/// De dónde sale el documento del currículo.
pub trait CurriculumSource {
    fn fetch(&self) -> Result<Curriculum, CurriculumError>;
    fn describe(&self) -> String;
}

pub struct EmbeddedSource;

impl CurriculumSource for EmbeddedSource {
    fn fetch(&self) -> Result<Curriculum, CurriculumError> {
        parse_curriculum(EMBEDDED_CURRICULUM, DocumentFormat::Yaml)
    }

    fn describe(&self) -> String {
        "embedded curriculum".into()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct FileSource {
    pub path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl CurriculumSource for FileSource {
    fn fetch(&self) -> Result<Curriculum, CurriculumError> {
        let text = std::fs::read_to_string(&self.path)?;
        parse_curriculum(&text, DocumentFormat::from_location(&self.path.to_string_lossy()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub struct HttpSource {
    pub url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl CurriculumSource for HttpSource {
    fn fetch(&self) -> Result<Curriculum, CurriculumError> {
        let response = reqwest::blocking::get(&self.url)
            .map_err(|e| CurriculumError::Fetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CurriculumError::Fetch(format!(
                "HTTP {} while fetching {}",
                response.status(),
                self.url
            )));
        }
        let text = response
            .text()
            .map_err(|e| CurriculumError::Fetch(e.to_string()))?;
        parse_curriculum(&text, DocumentFormat::from_location(&self.url))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Elige la fuente nativa según la configuración.
#[cfg(not(target_arch = "wasm32"))]
pub fn source_for(location: Option<&str>) -> Box<dyn CurriculumSource> {
    match location {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            Box::new(HttpSource { url: url.to_string() })
        }
        Some(path) => Box::new(FileSource { path: path.into() }),
        None => Box::new(EmbeddedSource),
    }
}

/// Descarga el currículo con `fetch` del navegador.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_curriculum_web(url: String) -> Result<Curriculum, CurriculumError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let window = web_sys::window().ok_or_else(|| CurriculumError::Fetch("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| CurriculumError::Fetch(format!("{e:?}")))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| CurriculumError::Fetch(format!("{e:?}")))?;
    let response: Response = resp_value
        .dyn_into()
        .map_err(|_| CurriculumError::Fetch("fetch did not return a Response".into()))?;

    if !response.ok() {
        return Err(CurriculumError::Fetch(format!(
            "HTTP {} while fetching {url}",
            response.status()
        )));
    }

    let text_promise = response
        .text()
        .map_err(|e| CurriculumError::Fetch(format!("{e:?}")))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| CurriculumError::Fetch(format!("{e:?}")))?
        .as_string()
        .ok_or_else(|| CurriculumError::Fetch("response body is not text".into()))?;

    parse_curriculum(&text, DocumentFormat::from_location(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_curriculum_parses() {
        let curriculum = EmbeddedSource.fetch().expect("embedded curriculum is valid");
        assert!(!curriculum.techniques.is_empty());
        assert!(!curriculum.encouraging_messages.is_empty());
        for technique in &curriculum.techniques {
            assert!(!technique.sub_skills.is_empty(), "{} has no sub-skills", technique.id);
        }
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DocumentFormat::from_location("curriculum.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_location("a/b.YML"), DocumentFormat::Yaml);
        assert_eq!(
            DocumentFormat::from_location("https://x.org/c.yaml?v=2"),
            DocumentFormat::Yaml
        );
    }

    #[test]
    fn json_document_parses() {
        let text = r#"{
            "techniques": [{
                "id": "magic_e", "name": "Magic E", "name_ar": "حرف E السحري", "icon": "✨",
                "subSkills": [{
                    "id": "a_e", "name": "a_e",
                    "learn_info": "info",
                    "examples": [{"before": "cap", "after": "cape"}],
                    "drill": {"type": "morph", "instruction": "i", "pairs": [["cap", "cape"]]},
                    "quiz": {"type": "quiz", "instruction": "i", "questions": [{"audio": "cape", "options": ["cap", "cape"], "answer": "cape"}]}
                }]
            }],
            "encouragingMessages": ["رائع!"]
        }"#;
        let curriculum = parse_curriculum(text, DocumentFormat::Json).unwrap();
        assert_eq!(curriculum.techniques[0].sub_skills[0].examples.len(), 1);
    }
}
