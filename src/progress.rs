// src/progress.rs
//
// Estado mutable del alumno: puntos, racha, pasos completados, dominio,
// acceso libre, analíticas y ajustes. Cada cambio se guarda entero.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analytics::{Analytics, ProgressReport, TechniqueReport, technique_name};
use crate::clock::Clock;
use crate::error::StorageError;
use crate::model::{Step, SubSkill, Technique};
use crate::settings::{DifficultySettings, SettingChange};
use crate::storage::KeyValueStore;

pub const PROGRESS_KEY: &str = "modernPhonicsProgress";
pub const SETTINGS_KEY: &str = "phonicsDifficultySettings";

pub const STEP_POINTS: u32 = 10;
pub const MASTERY_POINTS: u32 = 50;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TechniqueProgress {
    pub mastered: bool,
    pub sub_skills: BTreeMap<String, BTreeSet<Step>>,
}

impl TechniqueProgress {
    pub fn is_step_done(&self, sub_skill_id: &str, step: Step) -> bool {
        self.sub_skills
            .get(sub_skill_id)
            .is_some_and(|steps| steps.contains(&step))
    }

    pub fn completed_steps(&self) -> usize {
        self.sub_skills.values().map(BTreeSet::len).sum()
    }

    pub fn is_sub_skill_complete(&self, sub: &SubSkill) -> bool {
        sub.required_steps()
            .iter()
            .all(|step| self.is_step_done(&sub.id, *step))
    }

    /// Todas las sub-habilidades con todos sus pasos requeridos.
    pub fn covers(&self, technique: &Technique) -> bool {
        technique
            .sub_skills
            .iter()
            .all(|sub| self.is_sub_skill_complete(sub))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub points: u32,
    pub streak: u32,
    pub last_visit: Option<NaiveDate>,
    pub techniques: BTreeMap<String, TechniqueProgress>,
    pub analytics: Analytics,
    pub free_access: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    progress: &'a UserProgress,
    settings: &'a DifficultySettings,
    export_date: String,
}

pub struct ProgressStore {
    backend: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    progress: UserProgress,
    settings: DifficultySettings,
    session_started_at: Option<i64>,
    persistent: bool,
}

impl ProgressStore {
    /// Lee progreso y ajustes; lo que falte o no se pueda leer queda por defecto.
    pub fn open(backend: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let mut store = Self {
            backend,
            clock,
            progress: UserProgress::default(),
            settings: DifficultySettings::default(),
            session_started_at: None,
            persistent: true,
        };
        store.progress = store.read_blob(PROGRESS_KEY).unwrap_or_default();
        store.settings = store.read_blob(SETTINGS_KEY).unwrap_or_default();
        store
    }

    fn read_blob<T: for<'de> Deserialize<'de>>(&mut self, key: &str) -> Option<T> {
        let text = match self.backend.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read {key}: {e}");
                self.persistent = false;
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("Discarding unreadable {key}: {e}");
                None
            }
        }
    }

    fn write(&mut self, key: &str, text: serde_json::Result<String>) {
        let result = text
            .map_err(StorageError::from)
            .and_then(|text| self.backend.set(key, &text));
        if let Err(e) = result {
            log::error!("Failed to save {key}: {e}");
            self.persistent = false;
        }
    }

    fn save(&mut self) {
        let text = serde_json::to_string(&self.progress);
        self.write(PROGRESS_KEY, text);
    }

    fn save_settings(&mut self) {
        let text = serde_json::to_string(&self.settings);
        self.write(SETTINGS_KEY, text);
    }

    /// Marca el backend como no disponible (p. ej. se abrió en memoria).
    pub fn mark_volatile(&mut self) {
        self.persistent = false;
    }

    /// `false` si algo no se ha podido guardar: la UI avisa al usuario.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn settings(&self) -> &DifficultySettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn technique_progress(&mut self, technique_id: &str) -> &TechniqueProgress {
        self.technique_progress_mut(technique_id)
    }

    fn technique_progress_mut(&mut self, technique_id: &str) -> &mut TechniqueProgress {
        self.progress
            .techniques
            .entry(technique_id.to_string())
            .or_default()
    }

    /// Consulta sin crear la entrada (para vistas con `&self`).
    pub fn peek_technique(&self, technique_id: &str) -> Option<&TechniqueProgress> {
        self.progress.techniques.get(technique_id)
    }

    pub fn is_step_done(&self, technique_id: &str, sub_skill_id: &str, step: Step) -> bool {
        self.peek_technique(technique_id)
            .is_some_and(|t| t.is_step_done(sub_skill_id, step))
    }

    pub fn is_mastered(&self, technique_id: &str) -> bool {
        self.peek_technique(technique_id).is_some_and(|t| t.mastered)
    }

    /// Devuelve `true` si el paso era nuevo.
    pub fn mark_step_complete(&mut self, technique_id: &str, sub_skill_id: &str, step: Step) -> bool {
        let inserted = self
            .technique_progress_mut(technique_id)
            .sub_skills
            .entry(sub_skill_id.to_string())
            .or_default()
            .insert(step);
        if inserted {
            self.progress.points += STEP_POINTS;
            self.save();
        }
        inserted
    }

    /// El llamador comprueba antes que la técnica esté cubierta.
    pub fn mark_technique_mastered(&mut self, technique_id: &str) {
        let entry = self.technique_progress_mut(technique_id);
        if entry.mastered {
            return;
        }
        entry.mastered = true;
        self.progress.points += MASTERY_POINTS;
        log::info!("Technique {technique_id} mastered");
        self.save();
    }

    pub fn is_technique_unlocked(&self, index: usize, techniques: &[Technique]) -> bool {
        if index == 0 || self.progress.free_access {
            return true;
        }
        techniques
            .get(index - 1)
            .is_some_and(|prev| self.is_mastered(&prev.id))
    }

    pub fn add_points(&mut self, points: u32) {
        self.progress.points = self.progress.points.saturating_add(points);
        self.save();
    }

    pub fn set_free_access(&mut self, enabled: bool) {
        self.progress.free_access = enabled;
        self.save();
    }

    pub fn update_streak(&mut self) {
        let today = self.clock.today();
        let p = &mut self.progress;
        p.streak = match p.last_visit {
            None => 1,
            Some(last) if last == today => p.streak,
            Some(last) if last + Duration::days(1) == today => p.streak + 1,
            Some(_) => 1,
        };
        p.last_visit = Some(today);
        self.save();
    }

    pub fn start_session(&mut self) {
        self.session_started_at = Some(self.clock.now_ms());
    }

    /// Sin `start_session` previo no registra nada.
    pub fn end_session(&mut self, technique_id: &str, correct: usize, total: usize) {
        let Some(started) = self.session_started_at.take() else {
            return;
        };
        let elapsed = self.clock.now_ms() - started;
        let today = self.clock.today();
        self.progress
            .analytics
            .record_session(technique_id, elapsed, today, correct, total);
        self.save();
    }

    pub fn update_setting(&mut self, change: SettingChange) {
        self.settings.apply(change);
        self.save_settings();
    }

    /// Borra el progreso guardado y vuelve a empezar; los ajustes se quedan.
    pub fn reset(&mut self) {
        if let Err(e) = self.backend.remove(PROGRESS_KEY) {
            log::error!("Failed to remove {PROGRESS_KEY}: {e}");
            self.persistent = false;
        }
        self.progress = UserProgress::default();
        self.session_started_at = None;
        log::info!("Progress reset");
        self.update_streak();
    }

    pub fn export_data(&self) -> String {
        let doc = ExportDocument {
            progress: &self.progress,
            settings: &self.settings,
            export_date: chrono::DateTime::from_timestamp_millis(self.clock.now_ms())
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
        };
        serde_json::to_string_pretty(&doc).unwrap_or_else(|e| {
            log::error!("Export failed: {e}");
            String::from("{}")
        })
    }

    pub fn generate_progress_report(&self, techniques: &[Technique]) -> ProgressReport {
        let analytics = &self.progress.analytics;
        ProgressReport {
            total_hours: analytics.total_hours(),
            sessions_completed: analytics.sessions_completed,
            average_accuracy: (analytics.average_accuracy * 100.0).round() as u32,
            current_streak: self.progress.streak,
            total_points: self.progress.points,
            weak_areas: analytics.weak_areas.clone(),
            strong_areas: analytics.strong_areas.clone(),
            techniques: self
                .progress
                .techniques
                .iter()
                .map(|(id, tp)| TechniqueReport {
                    id: id.clone(),
                    name: technique_name(id, techniques),
                    mastered: tp.mastered,
                    minutes: analytics.minutes_for(id),
                    completed_steps: tp.completed_steps(),
                    total_steps: techniques
                        .iter()
                        .find(|t| &t.id == id)
                        .map(Technique::total_steps)
                        .unwrap_or(0),
                })
                .collect(),
        }
    }
}
