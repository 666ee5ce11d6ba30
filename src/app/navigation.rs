use super::*;
use crate::audio::Tone;
use crate::model::Step;
use crate::session::Intent;

impl PhonicsApp {
    pub fn start_app(&mut self) {
        self.audio.play(Tone::Click);
        self.state = AppState::SkillsGrid;
    }

    pub fn open_skills_grid(&mut self) {
        self.leave_activity();
        self.current_technique = None;
        self.state = AppState::SkillsGrid;
    }

    /// Solo entra si la técnica existe y está desbloqueada.
    pub fn open_technique(&mut self, technique_id: &str) {
        if !self.is_technique_unlocked(technique_id) {
            log::debug!("Technique {technique_id} is locked or unknown");
            return;
        }
        self.current_technique = Some(technique_id.to_string());
        self.state = AppState::Technique;
    }

    pub fn open_dashboard(&mut self) {
        self.leave_activity();
        self.state = AppState::Dashboard;
    }

    pub fn close_dashboard(&mut self) {
        self.state = if self.current_technique.is_some() {
            AppState::Technique
        } else {
            AppState::SkillsGrid
        };
    }

    /// Abre un paso si sus requisitos están hechos.
    pub fn start_step(&mut self, technique_id: &str, sub_skill_id: &str, step: Step) {
        if !self.is_step_unlocked(technique_id, sub_skill_id, step) {
            return;
        }
        self.audio.play(Tone::Click);
        self.send(Intent::StartActivity {
            technique_id: technique_id.to_string(),
            sub_skill_id: sub_skill_id.to_string(),
            step,
        });
    }

    pub fn exit_activity(&mut self) {
        self.send(Intent::Exit);
    }

    /// Cancela la actividad en curso sin volver a la técnica.
    fn leave_activity(&mut self) {
        if self.orchestrator.is_active() {
            self.send(Intent::Exit);
            let _ = self.orchestrator.drain_effects();
            self.effects.clear();
        }
        self.word_builder = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::test_app;
    use super::*;

    #[test]
    fn locked_technique_does_not_open() {
        let (mut app, _) = test_app();
        app.start_app();
        app.open_technique("team_sounds");
        assert_eq!(app.state, AppState::SkillsGrid);
        app.open_technique("magic_e");
        assert_eq!(app.state, AppState::Technique);
    }

    #[test]
    fn free_access_opens_everything() {
        let (mut app, _) = test_app();
        app.toggle_free_access();
        app.open_technique("soft_sounds");
        assert_eq!(app.current_technique.as_deref(), Some("soft_sounds"));
        app.start_step("soft_sounds", "soft_c", Step::Quiz);
        assert!(app.orchestrator.is_active());
    }

    #[test]
    fn quiz_needs_drill_first() {
        let (mut app, _) = test_app();
        app.start_step("magic_e", "a_e", Step::Quiz);
        assert!(!app.orchestrator.is_active());
        app.start_step("magic_e", "a_e", Step::Learn);
        assert!(app.orchestrator.is_active());
    }

    #[test]
    fn dashboard_cancels_running_activity() {
        let (mut app, _) = test_app();
        app.open_technique("magic_e");
        app.start_step("magic_e", "a_e", Step::Learn);
        app.open_dashboard();
        assert!(!app.orchestrator.is_active());
        assert_eq!(app.state, AppState::Dashboard);
        app.close_dashboard();
        assert_eq!(app.state, AppState::Technique);
    }
}
