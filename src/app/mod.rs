use crate::audio::Audio;
use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::curriculum::CurriculumStore;
use crate::effects::Effects;
use crate::model::AppState;
use crate::progress::ProgressStore;
use crate::session::Orchestrator;
use crate::storage::open_platform_store;
use eframe::egui;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

// Submódulos
pub mod actions;
pub mod navigation;
pub mod progress;
pub mod queries;
pub mod resets;
pub mod updates;
pub mod view_models;

// Re-export de view models
pub use crate::view_models::{StepCell, SubSkillRow, TechniqueCard};

/// Clave del tema en el almacenamiento de eframe.
pub const THEME_KEY: &str = "phonics-theme";

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn visuals(self) -> egui::Visuals {
        match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DashboardTab {
    #[default]
    Overview,
    Analytics,
    Settings,
    Reports,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Overview,
        DashboardTab::Analytics,
        DashboardTab::Settings,
        DashboardTab::Reports,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Overview => "📋 نظرة عامة",
            DashboardTab::Analytics => "📈 التحليلات",
            DashboardTab::Settings => "⚙ الإعدادات",
            DashboardTab::Reports => "📄 التقارير",
        }
    }
}

/// Letras de la pregunta `build_the_word` en pantalla.
#[derive(Clone, Debug)]
pub struct WordBuilder {
    pub question: usize, // índice de la pregunta mostrada
    pub letters: Vec<char>,
    pub picked: Vec<usize>,
}

impl WordBuilder {
    pub fn word(&self) -> String {
        self.picked.iter().filter_map(|&i| self.letters.get(i)).collect()
    }

    pub fn is_picked(&self, i: usize) -> bool {
        self.picked.contains(&i)
    }

    pub fn pick(&mut self, i: usize) {
        if i < self.letters.len() && !self.is_picked(i) {
            self.picked.push(i);
        }
    }

    pub fn undo(&mut self) {
        self.picked.pop();
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    pub fn is_full(&self) -> bool {
        self.picked.len() == self.letters.len()
    }
}

pub struct PhonicsApp {
    pub curriculum: CurriculumStore,
    pub progress: ProgressStore,
    pub orchestrator: Orchestrator,
    pub audio: Audio,
    pub effects: Effects,
    pub rng: StdRng,
    pub state: AppState,
    pub current_technique: Option<String>,
    pub dashboard_tab: DashboardTab,
    pub theme: Theme,
    pub message: String,
    pub confirm_reset: bool,
    pub word_builder: Option<WordBuilder>,
    #[cfg(target_arch = "wasm32")]
    pub curriculum_rx: Option<
        std::sync::mpsc::Receiver<Result<crate::model::Curriculum, crate::error::CurriculumError>>,
    >,
}

impl PhonicsApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let (backend, persistent) = open_platform_store(&config);
        let mut progress = ProgressStore::open(backend, Box::new(SystemClock));
        if !persistent {
            progress.mark_volatile();
        }

        let mut app = Self::with_parts(CurriculumStore::new(), progress, Audio::for_platform());
        app.theme = cc
            .storage
            .and_then(|s| eframe::get_value(s, THEME_KEY))
            .unwrap_or_default();
        cc.egui_ctx.set_visuals(app.theme.visuals());
        crate::ui::fonts::install_fonts(&cc.egui_ctx);
        app.load_curriculum(&config);
        app
    }

    /// Construye la app con las piezas ya abiertas (también para tests).
    pub fn with_parts(curriculum: CurriculumStore, progress: ProgressStore, audio: Audio) -> Self {
        let mut app = Self {
            curriculum,
            progress,
            orchestrator: Orchestrator::new(),
            audio,
            effects: Effects::default(),
            rng: StdRng::from_entropy(),
            state: AppState::Splash,
            current_technique: None,
            dashboard_tab: DashboardTab::default(),
            theme: Theme::default(),
            message: String::new(),
            confirm_reset: false,
            word_builder: None,
            #[cfg(target_arch = "wasm32")]
            curriculum_rx: None,
        };
        app.progress.update_streak();
        app
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::audio::{AudioSink, Tone};
    use crate::clock::testing::ManualClock;
    use crate::data::EmbeddedSource;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    pub struct Mute;

    impl AudioSink for Mute {
        fn speak(&mut self, _text: &str) {}
        fn play(&mut self, _tone: Tone) {}
    }

    /// App con el currículo embebido, memoria y reloj manual.
    pub fn test_app() -> (PhonicsApp, ManualClock) {
        let clock = ManualClock::at(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let mut curriculum = CurriculumStore::new();
        curriculum.load(&EmbeddedSource);
        let progress = ProgressStore::open(Box::new(MemoryStore::new()), Box::new(clock.clone()));
        let mut app = PhonicsApp::with_parts(curriculum, progress, Audio::new(Box::new(Mute)));
        app.rng = StdRng::seed_from_u64(3);
        (app, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_builder_picks_each_letter_once() {
        let mut b = WordBuilder {
            question: 0,
            letters: vec!['e', 'b', 'e'],
            picked: vec![],
        };
        b.pick(1);
        b.pick(1);
        b.pick(0);
        assert_eq!(b.word(), "be");
        assert!(!b.is_full());
        b.pick(2);
        assert!(b.is_full());
        b.undo();
        assert_eq!(b.word(), "be");
        b.pick(9);
        assert_eq!(b.picked.len(), 2);
    }

    #[test]
    fn app_starts_on_splash_with_streak() {
        let (app, _) = testing::test_app();
        assert_eq!(app.state, AppState::Splash);
        assert_eq!(app.progress.progress().streak, 1);
        assert!(!app.orchestrator.is_active());
    }
}
