use crate::app::PhonicsApp;
use crate::ui::helpers::big_list_button;
use crate::ui::layout::scroll_panel;
use crate::view_models::TechniqueCard;
use egui::{Context, ProgressBar};

pub fn ui_skills_grid(app: &mut PhonicsApp, ctx: &Context) {
    let cards: Vec<TechniqueCard> = app.technique_cards();
    let mut free_access = app.progress.progress().free_access;

    scroll_panel(ctx, 520.0, |ui| {
        let content_width = ui.available_width();
        let button_h = 48.0;

        ui.add_space(12.0);
        ui.heading("🗺 خريطة المهارات");
        ui.add_space(8.0);
        if ui.checkbox(&mut free_access, "🔓 وصول حر لكل المهارات").changed() {
            app.toggle_free_access();
        }
        ui.add_space(16.0);

        if cards.is_empty() {
            ui.label("لا توجد مهارات متاحة حالياً.");
        }

        for card in &cards {
            if big_list_button(ui, card.label(), content_width, button_h, card.unlocked) {
                app.open_technique(&card.id);
                return;
            }
            if card.unlocked && !card.mastered {
                ui.add(ProgressBar::new(card.fraction()).desired_width(content_width));
            }
            ui.add_space(8.0);
        }
    });
}
