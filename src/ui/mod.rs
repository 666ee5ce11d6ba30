pub mod fonts;
mod helpers;
pub mod layout;
pub mod views;

use crate::app::{PhonicsApp, THEME_KEY};
use crate::model::AppState;
use eframe::{App, Frame, set_value};
use egui::Context;
use layout::{bottom_panel, top_panel};

impl App for PhonicsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.frame_update(ctx);

        // PANEL SUPERIOR: puntos, racha y navegación (no en la portada)
        if self.state != AppState::Splash {
            top_panel(self, ctx);
        }

        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(self, ctx);

        // Dispatch por estado
        match self.state {
            AppState::Splash => views::splash::ui_splash(self, ctx),
            AppState::SkillsGrid => views::skills_grid::ui_skills_grid(self, ctx),
            AppState::Technique => views::technique::ui_technique(self, ctx),
            AppState::Dashboard => views::dashboard::ui_dashboard(self, ctx),
        }

        if self.orchestrator.is_active() {
            views::activity::ui_activity(self, ctx);
        }

        if self.confirm_reset {
            self.confirm_reset(ctx);
        }

        self.effects.paint(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, THEME_KEY, &self.theme);
    }
}
