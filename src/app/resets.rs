use super::*;

impl PhonicsApp {
    /// Borra todo el progreso (los ajustes se quedan) y vuelve al mapa.
    pub fn reset_progress(&mut self) {
        self.open_skills_grid();
        self.progress.reset();
        self.confirm_reset = false;
        self.message.clear();
    }

    pub fn confirm_reset(&mut self, ctx: &egui::Context) {
        egui::Window::new("تأكيد إعادة التعيين")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("هل أنت متأكد من حذف كل التقدم؟ لا يمكن التراجع عن هذا الإجراء!");
                ui.horizontal(|ui| {
                    if ui.button("نعم، احذف").clicked() {
                        self.reset_progress();
                    }
                    if ui.button("لا").clicked() {
                        self.confirm_reset = false;
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::test_app;
    use crate::model::Step;
    use crate::settings::SettingChange;

    #[test]
    fn reset_keeps_settings_and_restarts_streak() {
        let (mut app, _) = test_app();
        app.change_setting(SettingChange::AutoAdvance(false));
        app.progress.mark_step_complete("magic_e", "a_e", Step::Learn);
        app.open_technique("magic_e");
        app.confirm_reset = true;
        app.reset_progress();
        assert_eq!(app.progress.progress().points, 0);
        assert_eq!(app.progress.progress().streak, 1);
        assert!(!app.progress.settings().auto_advance);
        assert_eq!(app.state, AppState::SkillsGrid);
        assert!(!app.confirm_reset);
    }
}
