// src/ui/fonts.rs
//
// Las fuentes por defecto de egui no traen glifos árabes: en nativo se busca
// una fuente del sistema que los tenga y se añade como respaldo.

use egui::{Context, FontData, FontDefinitions, FontFamily};

#[cfg(not(target_arch = "wasm32"))]
const ARABIC_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/GeezaPro.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\tahoma.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[cfg(not(target_arch = "wasm32"))]
fn load_arabic_font() -> Option<Vec<u8>> {
    ARABIC_FONT_CANDIDATES.iter().find_map(|path| {
        let bytes = std::fs::read(path).ok()?;
        log::info!("Arabic fallback font: {path}");
        Some(bytes)
    })
}

#[cfg(target_arch = "wasm32")]
fn load_arabic_font() -> Option<Vec<u8>> {
    None
}

/// Añade la fuente al final de cada familia, detrás de las de egui.
pub fn with_fallback(mut fonts: FontDefinitions, name: &str, bytes: Vec<u8>) -> FontDefinitions {
    fonts
        .font_data
        .insert(name.to_owned(), std::sync::Arc::new(FontData::from_owned(bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(name.to_owned());
    }
    fonts
}

pub fn install_fonts(ctx: &Context) {
    match load_arabic_font() {
        Some(bytes) => ctx.set_fonts(with_fallback(FontDefinitions::default(), "arabic", bytes)),
        None => log::warn!("No Arabic font found, Arabic text may not render"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_goes_last() {
        let fonts = with_fallback(FontDefinitions::default(), "arabic", vec![0u8; 4]);
        assert!(fonts.font_data.contains_key("arabic"));
        let proportional = &fonts.families[&FontFamily::Proportional];
        assert_eq!(proportional.last().map(String::as_str), Some("arabic"));
    }
}
