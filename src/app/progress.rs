use super::*;
use crate::analytics::ProgressReport;
use crate::settings::SettingChange;

impl PhonicsApp {
    pub fn toggle_free_access(&mut self) {
        let enabled = !self.progress.progress().free_access;
        self.progress.set_free_access(enabled);
        log::info!("Free access {}", if enabled { "on" } else { "off" });
    }

    pub fn change_setting(&mut self, change: SettingChange) {
        self.progress.update_setting(change);
    }

    pub fn toggle_audio(&mut self) {
        let enabled = !self.audio.is_enabled();
        self.audio.set_enabled(enabled);
    }

    pub fn progress_report(&self) -> ProgressReport {
        self.progress
            .generate_progress_report(self.curriculum.techniques())
    }

    pub fn report_text(&self) -> String {
        self.progress_report().to_text(self.progress.today())
    }

    /// Copia la exportación JSON al portapapeles.
    pub fn copy_export(&mut self, ctx: &egui::Context) {
        ctx.copy_text(self.progress.export_data());
        self.message = "✅ تم نسخ البيانات".into();
    }

    pub fn copy_report(&mut self, ctx: &egui::Context) {
        ctx.copy_text(self.report_text());
        self.message = "✅ تم نسخ التقرير".into();
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::test_app;
    use crate::settings::SettingChange;

    #[test]
    fn free_access_toggles_and_persists() {
        let (mut app, _) = test_app();
        app.toggle_free_access();
        assert!(app.progress.progress().free_access);
        assert!(!app.progress.is_mastered("magic_e"));
        app.toggle_free_access();
        assert!(!app.progress.progress().free_access);
    }

    #[test]
    fn settings_are_clamped_through_the_store() {
        let (mut app, _) = test_app();
        app.change_setting(SettingChange::QuestionsPerSession(1));
        assert_eq!(app.progress.settings().questions_per_session, 3);
    }

    #[test]
    fn report_text_names_curriculum_techniques() {
        let (mut app, _) = test_app();
        app.progress.mark_step_complete("magic_e", "a_e", crate::model::Step::Learn);
        let text = app.report_text();
        assert!(text.contains("Magic E"));
        assert!(text.contains("2024-06-01"));
    }
}
