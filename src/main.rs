#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use phonics_quest::PhonicsApp;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Phonics Quest")
            .with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Phonics Quest",
        options,
        Box::new(|cc| Ok(Box::new(PhonicsApp::new(cc)))),
    )
}

// En la web arranca `phonics_quest::start`
#[cfg(target_arch = "wasm32")]
fn main() {}
