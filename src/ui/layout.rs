use crate::app::{PhonicsApp, Theme};
use crate::model::AppState;
use egui::{Button, CentralPanel, Color32, Context, Frame, RichText, Ui};

pub fn top_panel(app: &mut PhonicsApp, ctx: &Context) {
    egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            let p = app.progress.progress();
            ui.label(RichText::new(format!("⭐ {}", p.points)).strong());
            ui.label(RichText::new(format!("🔥 {}", p.streak)).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let sound = if app.audio.is_enabled() { "🔊" } else { "🔇" };
                if ui.button(sound).clicked() {
                    app.toggle_audio();
                }
                if app.state == AppState::Dashboard {
                    if ui.button("⬅ رجوع").clicked() {
                        app.close_dashboard();
                    }
                } else if ui.button("📊 لوحة المعلم").clicked() {
                    app.open_dashboard();
                }
                if app.state != AppState::SkillsGrid && ui.button("🏠 المهارات").clicked() {
                    app.open_skills_grid();
                }
            });
        });
    });
}

pub fn bottom_panel(app: &mut PhonicsApp, ctx: &Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if !app.progress.is_persistent() {
                ui.colored_label(Color32::from_rgb(200, 120, 0), "⚠ لن يتم حفظ تقدمك على هذا الجهاز");
            }
            if !app.message.is_empty() {
                ui.label(&app.message);
            }

            // ----------- BOTONES DE TEMA -----------
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🌙 الوضع الداكن").clicked() {
                    app.theme = Theme::Dark;
                    ctx.set_visuals(Theme::Dark.visuals());
                }
                if ui.button("☀ الوضع الفاتح").clicked() {
                    app.theme = Theme::Light;
                    ctx.set_visuals(Theme::Light.visuals());
                }
            });
        });
    });
}

/// Panel centrado tanto vertical como horizontalmente,
/// con un tamaño de contenido máximo y un bloque interior `inner`.
pub fn centered_panel(ctx: &Context, est_height: f32, max_width: f32, inner: impl FnOnce(&mut Ui)) {
    CentralPanel::default().show(ctx, |ui| {
        let extra = ((ui.available_height() - est_height) / 2.0).max(0.0);
        ui.add_space(extra);
        ui.vertical_centered(|ui| {
            Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(16, 16))
                .show(ui, |ui| {
                    let w = ui.available_width().min(max_width);
                    ui.set_width(w);
                    inner(ui);
                });
        });
        ui.add_space(extra);
    });
}

/// Panel con scroll para vistas largas (dashboard, técnica).
pub fn scroll_panel(ctx: &Context, max_width: f32, inner: impl FnOnce(&mut Ui)) {
    CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                let w = ui.available_width().min(max_width);
                ui.set_width(w);
                inner(ui);
            });
        });
    });
}

/// Dibuja dos botones del mismo tamaño en una fila, centrados en el ancho dado.
/// Devuelve (clic izquierdo, clic derecho).
pub fn two_button_row(
    ui: &mut Ui,
    panel_width: f32,
    left: (&str, bool),
    right: (&str, bool),
) -> (bool, bool) {
    let btn_w = (panel_width - 8.0) / 2.0;
    let mut clicked_left = false;
    let mut clicked_right = false;
    ui.horizontal(|ui| {
        // espacio para centrar la fila en su panel
        ui.add_space(((ui.available_width() - panel_width) / 2.0).max(0.0));
        clicked_left = ui
            .add_enabled(left.1, Button::new(left.0).min_size([btn_w, 36.0].into()))
            .clicked();
        clicked_right = ui
            .add_enabled(right.1, Button::new(right.0).min_size([btn_w, 36.0].into()))
            .clicked();
    });
    (clicked_left, clicked_right)
}
