use crate::app::PhonicsApp;
use crate::model::Step;
use crate::ui::layout::scroll_panel;
use crate::view_models::SubSkillRow;
use egui::{Button, Context, RichText};

pub fn ui_technique(app: &mut PhonicsApp, ctx: &Context) {
    let Some(technique_id) = app.current_technique.clone() else {
        app.open_skills_grid();
        return;
    };
    let Some((title, subtitle)) = app
        .technique(&technique_id)
        .map(|t| (format!("{} {}", t.icon, t.name_ar), t.name.clone()))
    else {
        app.open_skills_grid();
        return;
    };
    let rows: Vec<SubSkillRow> = app.sub_skill_rows(&technique_id).unwrap_or_default();
    let mastered = app.progress.is_mastered(&technique_id);

    let mut clicked: Option<(String, Step)> = None;
    let mut back = false;

    scroll_panel(ctx, 560.0, |ui| {
        let width = ui.available_width();
        ui.add_space(12.0);
        ui.heading(RichText::new(title).size(28.0));
        ui.label(subtitle);
        if mastered {
            ui.label(RichText::new("🏅 أتقنت هذه المهارة").strong());
        }
        ui.add_space(16.0);

        for row in &rows {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(width - 12.0);
                ui.label(RichText::new(row.label()).size(20.0));
                ui.horizontal_wrapped(|ui| {
                    let btn_w = ((width - 40.0) / row.steps.len().max(1) as f32).max(90.0);
                    for cell in &row.steps {
                        let button = Button::new(cell.label()).min_size([btn_w, 36.0].into());
                        if ui.add_enabled(cell.unlocked, button).clicked() {
                            clicked = Some((row.id.clone(), cell.step));
                        }
                    }
                });
            });
            ui.add_space(8.0);
        }

        ui.add_space(16.0);
        if ui.add_sized([width, 36.0], Button::new("⬅ العودة إلى المهارات")).clicked() {
            back = true;
        }
    });

    if let Some((sub_skill_id, step)) = clicked {
        app.start_step(&technique_id, &sub_skill_id, step);
    } else if back {
        app.open_skills_grid();
    }
}
