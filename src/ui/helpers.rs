// src/ui/helpers.rs
use egui::{Button, Color32, RichText, Ui, Vec2};

pub fn big_list_button(ui: &mut Ui, label: String, width: f32, height: f32, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(width, height)))
        .clicked()
}

/// Botón de opción de una pregunta; se deshabilita un segundo tras fallar.
pub fn choice_button(ui: &mut Ui, label: &str, width: f32, enabled: bool) -> bool {
    let text = RichText::new(label).size(22.0);
    ui.add_enabled(enabled, Button::new(text).min_size(Vec2::new(width, 48.0)))
        .clicked()
}

/// Rejilla de opciones en filas de `per_row`. Devuelve el índice pulsado.
pub fn choice_grid(
    ui: &mut Ui,
    options: &[String],
    per_row: usize,
    width: f32,
    is_enabled: impl Fn(usize) -> bool,
) -> Option<usize> {
    let per_row = per_row.max(1);
    let btn_w = (width - 8.0 * (per_row as f32 - 1.0)) / per_row as f32;
    let mut clicked = None;
    for (row, chunk) in options.chunks(per_row).enumerate() {
        ui.horizontal(|ui| {
            for (col, option) in chunk.iter().enumerate() {
                let idx = row * per_row + col;
                if choice_button(ui, option, btn_w, is_enabled(idx)) {
                    clicked = Some(idx);
                }
            }
        });
        ui.add_space(6.0);
    }
    clicked
}

/// Mensaje de acierto o fallo bajo la pregunta.
pub fn feedback_label(ui: &mut Ui, correct: bool, message: &str) {
    let color = if correct {
        Color32::from_rgb(40, 160, 70)
    } else {
        Color32::from_rgb(210, 70, 60)
    };
    ui.label(RichText::new(message).size(20.0).color(color));
}

/// Tarjeta de ejemplo antes → después.
pub fn example_card(ui: &mut Ui, before: &str, after: &str) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.label(RichText::new(before).size(26.0));
        ui.label(RichText::new("→").size(26.0));
        ui.label(RichText::new(after).size(26.0).strong());
        clicked = ui.button("🔊").clicked();
    });
    clicked
}
