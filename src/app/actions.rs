use super::*;
use crate::config::AppConfig;
use crate::session::questions::{Question, Response, scrambled_letters};
use crate::session::{ControlId, Effect, Intent, Phase, SessionContext};

impl PhonicsApp {
    /// Único camino hacia el orquestador.
    pub fn send(&mut self, intent: Intent) {
        if matches!(intent, Intent::StartActivity { .. }) {
            self.word_builder = None;
        }
        let mut ctx = SessionContext {
            curriculum: &self.curriculum,
            progress: &mut self.progress,
            rng: &mut self.rng,
        };
        self.orchestrator.dispatch(intent, &mut ctx);
    }

    /// Evalúa la respuesta contra la pregunta en pantalla.
    pub fn answer(&mut self, response: Response<'_>, control: ControlId) {
        let correct = match self.orchestrator.phase() {
            Phase::Questions(s) => match s.question() {
                Some(q) => q.accepts(response),
                None => return,
            },
            _ => return,
        };
        self.send(Intent::Answer { correct, control });
    }

    /// Prepara las letras si la pregunta en pantalla es de montar palabra.
    pub fn ensure_word_builder(&mut self) {
        let (shown, word) = match self.orchestrator.phase() {
            Phase::Questions(s) => match s.question() {
                Some(Question::BuildTheWord(q)) => (s.shown, q.word.clone()),
                _ => return,
            },
            _ => return,
        };
        if self.word_builder.as_ref().is_some_and(|b| b.question == shown) {
            return;
        }
        self.word_builder = Some(WordBuilder {
            question: shown,
            letters: scrambled_letters(&word, &mut self.rng),
            picked: Vec::new(),
        });
    }

    pub fn submit_word(&mut self) {
        let Some(word) = self.word_builder.as_ref().map(WordBuilder::word) else {
            return;
        };
        self.answer(Response::Word(&word), 0);
        let missed = matches!(
            self.orchestrator.phase(),
            Phase::Questions(s) if !s.awaiting_next() && s.feedback.as_ref().is_some_and(|f| !f.correct)
        );
        if missed {
            if let Some(b) = self.word_builder.as_mut() {
                b.clear();
            }
        }
    }

    /// Vuelve a pronunciar la palabra de la pregunta actual.
    pub fn replay_word(&mut self) {
        let word = match self.orchestrator.phase() {
            Phase::Questions(s) => match s.question() {
                Some(Question::Sort { word, .. }) => word.clone(),
                Some(Question::BuildTheWord(q)) => q.word.clone(),
                Some(Question::Quiz(q)) => q.audio.clone(),
                Some(Question::Morph { base, .. }) => base.clone(),
                _ => return,
            },
            _ => return,
        };
        self.audio.speak(&word);
    }

    /// Lleva a cabo los efectos que ha pedido el orquestador.
    pub fn apply_effects(&mut self, now: f64) {
        for effect in self.orchestrator.drain_effects() {
            match effect {
                Effect::Tone(tone) => self.audio.play(tone),
                Effect::Speak(text) => self.audio.speak(&text),
                Effect::Celebrate(kind) => self.effects.celebrate(kind, now, &mut self.rng),
                Effect::ClearEffects => self.effects.clear(),
                Effect::ReturnToTechnique(id) => self.open_technique(&id),
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_curriculum(&mut self, config: &AppConfig) {
        let source = crate::data::source_for(config.curriculum.as_deref());
        self.curriculum.load(source.as_ref());
    }

    /// En la web la descarga es asíncrona; el resultado llega por el canal.
    #[cfg(target_arch = "wasm32")]
    pub fn load_curriculum(&mut self, config: &AppConfig) {
        let Some(url) = config.curriculum.clone() else {
            self.curriculum.load(&crate::data::EmbeddedSource);
            return;
        };
        log::info!("Loading curriculum from {url}");
        let (tx, rx) = std::sync::mpsc::channel();
        self.curriculum_rx = Some(rx);
        wasm_bindgen_futures::spawn_local(async move {
            let result = crate::data::fetch_curriculum_web(url).await;
            let _ = tx.send(result);
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn poll_curriculum(&mut self) {
        let maybe_result = self
            .curriculum_rx
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());

        if let Some(result) = maybe_result {
            self.curriculum.ingest(result);
            self.curriculum_rx = None;
        }
    }

    pub fn is_curriculum_pending(&self) -> bool {
        !self.curriculum.is_loaded()
    }
}
