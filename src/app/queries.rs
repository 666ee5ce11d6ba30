use super::*;
use crate::model::{Step, Technique};

impl PhonicsApp {
    pub fn technique(&self, technique_id: &str) -> Option<&Technique> {
        self.curriculum.technique(technique_id)
    }

    pub fn current_technique(&self) -> Option<&Technique> {
        self.current_technique
            .as_deref()
            .and_then(|id| self.curriculum.technique(id))
    }

    pub fn is_technique_unlocked(&self, technique_id: &str) -> bool {
        self.curriculum
            .technique_index(technique_id)
            .is_some_and(|idx| {
                self.progress
                    .is_technique_unlocked(idx, self.curriculum.techniques())
            })
    }

    /// El acceso libre se salta también el orden de los pasos.
    pub fn is_step_unlocked(&self, technique_id: &str, sub_skill_id: &str, step: Step) -> bool {
        if !self.is_technique_unlocked(technique_id) {
            return false;
        }
        let Some(sub) = self.curriculum.sub_skill(technique_id, sub_skill_id) else {
            return false;
        };
        if self.progress.progress().free_access {
            return true;
        }
        match step.prerequisite(sub.is_direct_drill) {
            None => true,
            Some(before) => self.progress.is_step_done(technique_id, sub_skill_id, before),
        }
    }

    pub fn mastered_count(&self) -> usize {
        self.curriculum
            .techniques()
            .iter()
            .filter(|t| self.progress.is_mastered(&t.id))
            .count()
    }

    /// Porcentaje de técnicas dominadas.
    pub fn completion_rate(&self) -> u32 {
        let total = self.curriculum.techniques().len();
        if total == 0 {
            return 0;
        }
        (self.mastered_count() as f32 / total as f32 * 100.0).round() as u32
    }
}
