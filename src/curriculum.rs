// src/curriculum.rs
//
// Currículo cargado una vez y de solo lectura a partir de ahí.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::CurriculumSource;
use crate::error::CurriculumError;
use crate::model::{Curriculum, SubSkill, Technique};

pub const DEFAULT_ENCOURAGEMENT: &str = "أحسنت! 🌟";

fn fallback_curriculum() -> Curriculum {
    Curriculum {
        techniques: Vec::new(),
        encouraging_messages: vec![
            DEFAULT_ENCOURAGEMENT.to_string(),
            "رائع! 🎉".to_string(),
            "ممتاز! 👍".to_string(),
        ],
    }
}

/// Ids repetidos rompen el progreso guardado, así que se rechazan al cargar.
fn validate(curriculum: &Curriculum) -> Result<(), CurriculumError> {
    let mut seen = std::collections::HashSet::new();
    for technique in &curriculum.techniques {
        if !seen.insert(technique.id.as_str()) {
            return Err(CurriculumError::InvalidContent {
                context: technique.id.clone(),
                reason: "duplicate technique id".into(),
            });
        }
        let mut sub_ids = std::collections::HashSet::new();
        for sub in &technique.sub_skills {
            if !sub_ids.insert(sub.id.as_str()) {
                return Err(CurriculumError::InvalidContent {
                    context: format!("{}/{}", technique.id, sub.id),
                    reason: "duplicate sub-skill id".into(),
                });
            }
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct CurriculumStore {
    curriculum: Option<Curriculum>,
}

impl CurriculumStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.curriculum.is_some()
    }

    /// Carga desde `source` la primera vez; después no hace nada.
    pub fn load(&mut self, source: &dyn CurriculumSource) {
        if self.is_loaded() {
            return;
        }
        log::info!("Loading curriculum from {}", source.describe());
        self.ingest(source.fetch());
    }

    /// Acepta el resultado de una carga (la asíncrona de la web llega por aquí).
    pub fn ingest(&mut self, result: Result<Curriculum, CurriculumError>) {
        if self.is_loaded() {
            return;
        }
        let curriculum = match result.and_then(|c| validate(&c).map(|_| c)) {
            Ok(c) => {
                log::info!("Curriculum loaded: {} techniques", c.techniques.len());
                c
            }
            Err(e) => {
                log::error!("Curriculum unavailable, using fallback: {e}");
                fallback_curriculum()
            }
        };
        self.curriculum = Some(curriculum);
    }

    pub fn techniques(&self) -> &[Technique] {
        self.curriculum
            .as_ref()
            .map(|c| c.techniques.as_slice())
            .unwrap_or(&[])
    }

    pub fn technique(&self, id: &str) -> Option<&Technique> {
        self.techniques().iter().find(|t| t.id == id)
    }

    pub fn technique_index(&self, id: &str) -> Option<usize> {
        self.techniques().iter().position(|t| t.id == id)
    }

    pub fn sub_skill(&self, technique_id: &str, sub_skill_id: &str) -> Option<&SubSkill> {
        self.technique(technique_id)?.sub_skill(sub_skill_id)
    }

    pub fn random_encouragement<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.curriculum
            .as_ref()
            .and_then(|c| c.encouraging_messages.choose(rng))
            .cloned()
            .unwrap_or_else(|| DEFAULT_ENCOURAGEMENT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EmbeddedSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct FailingSource;

    impl CurriculumSource for FailingSource {
        fn fetch(&self) -> Result<Curriculum, CurriculumError> {
            Err(CurriculumError::Fetch("HTTP 404".into()))
        }
        fn describe(&self) -> String {
            "nowhere".into()
        }
    }

    #[test]
    fn failed_fetch_uses_fallback() {
        let mut store = CurriculumStore::new();
        store.load(&FailingSource);
        assert!(store.is_loaded());
        assert!(store.techniques().is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        let msg = store.random_encouragement(&mut rng);
        assert!(["أحسنت! 🌟", "رائع! 🎉", "ممتاز! 👍"].contains(&msg.as_str()));
    }

    #[test]
    fn load_is_cached() {
        let mut store = CurriculumStore::new();
        store.load(&EmbeddedSource);
        let count = store.techniques().len();
        assert!(count > 0);
        store.load(&FailingSource);
        assert_eq!(store.techniques().len(), count);
    }

    #[test]
    fn lookups_by_id() {
        let mut store = CurriculumStore::new();
        store.load(&EmbeddedSource);
        assert_eq!(store.technique_index("magic_e"), Some(0));
        assert!(store.sub_skill("magic_e", "a_e").is_some());
        assert!(store.sub_skill("magic_e", "nope").is_none());
        assert!(store.technique("nope").is_none());
    }

    #[test]
    fn empty_message_pool_uses_default() {
        let mut store = CurriculumStore::new();
        store.ingest(Ok(Curriculum::default()));
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(store.random_encouragement(&mut rng), DEFAULT_ENCOURAGEMENT);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"{"techniques":[
            {"id":"t","name":"T","subSkills":[]},
            {"id":"t","name":"T2","subSkills":[]}
        ],"encouragingMessages":["x"]}"#;
        let parsed = crate::data::parse_curriculum(text, crate::data::DocumentFormat::Json);
        let mut store = CurriculumStore::new();
        store.ingest(parsed);
        assert!(store.techniques().is_empty());
    }

    #[test]
    fn unloaded_store_is_empty() {
        let store = CurriculumStore::new();
        assert!(store.techniques().is_empty());
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(store.random_encouragement(&mut rng), DEFAULT_ENCOURAGEMENT);
    }
}
