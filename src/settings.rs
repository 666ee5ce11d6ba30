use serde::{Deserialize, Serialize};

pub const MIN_QUESTIONS: usize = 3;
pub const MAX_QUESTIONS: usize = 10;

/// Ajustes de dificultad, guardados aparte del progreso.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DifficultySettings {
    pub questions_per_session: usize,
    pub passing_score: f32,
    pub enable_hints: bool,
    pub auto_advance: bool,
    /// Micro-lección paso a paso en vez de la página estática.
    pub paced_lessons: bool,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            questions_per_session: 5,
            passing_score: 0.8,
            enable_hints: true,
            auto_advance: true,
            paced_lessons: true,
        }
    }
}

/// Cambio de un único ajuste desde el panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingChange {
    QuestionsPerSession(usize),
    PassingScore(f32),
    EnableHints(bool),
    AutoAdvance(bool),
    PacedLessons(bool),
}

impl DifficultySettings {
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::QuestionsPerSession(n) => {
                self.questions_per_session = n.clamp(MIN_QUESTIONS, MAX_QUESTIONS)
            }
            SettingChange::PassingScore(s) => self.passing_score = s.clamp(0.0, 1.0),
            SettingChange::EnableHints(v) => self.enable_hints = v,
            SettingChange::AutoAdvance(v) => self.auto_advance = v,
            SettingChange::PacedLessons(v) => self.paced_lessons = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let s: DifficultySettings = serde_json::from_str(r#"{"questionsPerSession":7}"#).unwrap();
        assert_eq!(s.questions_per_session, 7);
        assert_eq!(s.passing_score, 0.8);
        assert!(s.enable_hints && s.auto_advance && s.paced_lessons);
    }

    #[test]
    fn apply_clamps_ranges() {
        let mut s = DifficultySettings::default();
        s.apply(SettingChange::QuestionsPerSession(42));
        assert_eq!(s.questions_per_session, MAX_QUESTIONS);
        s.apply(SettingChange::QuestionsPerSession(0));
        assert_eq!(s.questions_per_session, MIN_QUESTIONS);
        s.apply(SettingChange::PassingScore(1.5));
        assert_eq!(s.passing_score, 1.0);
        s.apply(SettingChange::AutoAdvance(false));
        assert!(!s.auto_advance);
    }
}
