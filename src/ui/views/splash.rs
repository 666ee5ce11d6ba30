use crate::app::PhonicsApp;
use crate::ui::layout::centered_panel;
use egui::{Button, Context, RichText};

pub fn ui_splash(app: &mut PhonicsApp, ctx: &Context) {
    centered_panel(ctx, 260.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("🔤").size(64.0));
            ui.heading("Phonics Quest");
            ui.label("تعلم أصوات اللغة الإنجليزية خطوة بخطوة");
            ui.add_space(24.0);

            if app.is_curriculum_pending() {
                ui.spinner();
                ui.label("جارٍ التحميل...");
                return;
            }
            if app.curriculum.techniques().is_empty() {
                ui.label("تعذر تحميل الدروس. حاول لاحقاً.");
            }

            let width = ui.available_width();
            if ui
                .add_sized([width, 44.0], Button::new(RichText::new("🚀 ابدأ").size(22.0)))
                .clicked()
            {
                app.start_app();
            }
        });
    });
}
