// src/audio.rs
//
// Pronunciación y tonos de feedback. En la web usa Speech Synthesis y
// Web Audio; en nativo solo deja constancia en el log.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Correct,
    Wrong,
    Achievement,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
}

/// Una nota de un tono, relativa al instante en que se pide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub offset_ms: u32,
    pub frequency: f32,
    pub duration_ms: u32,
    pub wave: Wave,
    pub volume: f32,
}

const fn note(offset_ms: u32, frequency: f32, duration_ms: u32, wave: Wave, volume: f32) -> Note {
    Note {
        offset_ms,
        frequency,
        duration_ms,
        wave,
        volume,
    }
}

impl Tone {
    pub fn notes(self) -> Vec<Note> {
        use Wave::*;
        match self {
            Tone::Success => [523.25, 659.25, 783.99]
                .iter()
                .enumerate()
                .map(|(i, f)| note(i as u32 * 100, *f, 100, Sine, 0.1))
                .collect(),
            Tone::Correct => vec![note(0, 880.0, 150, Sine, 0.1), note(100, 1108.73, 100, Sine, 0.1)],
            Tone::Wrong => vec![
                note(0, 440.0, 200, Triangle, 0.3),
                note(150, 369.99, 150, Triangle, 0.2),
            ],
            Tone::Achievement => {
                let mut notes: Vec<Note> = [523.25, 659.25, 783.99, 1046.5]
                    .iter()
                    .enumerate()
                    .map(|(i, f)| note(i as u32 * 150, *f, 200, Sine, 0.1))
                    .collect();
                // Destellos agudos al final
                notes.extend((0..5).map(|i| note(600 + i * 50, 2093.0 + i as f32 * 40.0, 50, Sine, 0.3)));
                notes
            }
            Tone::Click => vec![note(0, 1200.0, 30, Sine, 0.05)],
        }
    }
}

pub trait AudioSink {
    fn speak(&mut self, text: &str);
    fn play(&mut self, tone: Tone);
}

/// Envoltorio con el interruptor de sonido.
pub struct Audio {
    sink: Box<dyn AudioSink>,
    enabled: bool,
}

impl Audio {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            enabled: true,
        }
    }

    pub fn for_platform() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::new(Box::new(web::WebAudio::new()))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(Box::new(LogAudio))
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn speak(&mut self, text: &str) {
        if self.enabled && !text.trim().is_empty() {
            self.sink.speak(text);
        }
    }

    pub fn play(&mut self, tone: Tone) {
        if self.enabled {
            self.sink.play(tone);
        }
    }
}

/// Sin audio nativo.
#[cfg(not(target_arch = "wasm32"))]
pub struct LogAudio;

#[cfg(not(target_arch = "wasm32"))]
impl AudioSink for LogAudio {
    fn speak(&mut self, text: &str) {
        log::debug!("speak: {text}");
    }

    fn play(&mut self, tone: Tone) {
        log::debug!("tone: {tone:?}");
    }
}

/// Elige voz: inglesa de Google, luego en-US, luego cualquier inglesa.
pub fn pick_voice<'a, I>(voices: I) -> Option<usize>
where
    I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    let position = |pred: fn(&str, &str) -> bool| {
        voices
            .clone()
            .into_iter()
            .position(|(name, lang)| pred(name, lang))
    };
    position(|name, lang| lang.starts_with("en") && name.contains("Google"))
        .or_else(|| position(|_, lang| lang.starts_with("en-US")))
        .or_else(|| position(|_, lang| lang.starts_with("en")))
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioSink, Note, Tone, Wave, pick_voice};
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{AudioContext, AudioContextState, OscillatorType, SpeechSynthesisUtterance, SpeechSynthesisVoice};

    pub struct WebAudio {
        context: Option<AudioContext>,
    }

    impl WebAudio {
        pub fn new() -> Self {
            let context = AudioContext::new()
                .map_err(|e| log::warn!("Web Audio API not supported: {e:?}"))
                .ok();
            Self { context }
        }

        fn play_note(context: &AudioContext, note: &Note) -> Result<(), JsValue> {
            let oscillator = context.create_oscillator()?;
            let gain = context.create_gain()?;
            oscillator.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&context.destination())?;

            let start = context.current_time() + f64::from(note.offset_ms) / 1000.0;
            let end = start + f64::from(note.duration_ms) / 1000.0;
            oscillator.set_type(match note.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Triangle => OscillatorType::Triangle,
            });
            oscillator.frequency().set_value_at_time(note.frequency, start)?;
            let level = gain.gain();
            level.set_value_at_time(0.0, start)?;
            level.linear_ramp_to_value_at_time(note.volume, start + 0.01)?;
            level.linear_ramp_to_value_at_time(0.0, end)?;
            oscillator.start_with_when(start)?;
            oscillator.stop_with_when(end)?;
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn speak(&mut self, text: &str) {
            let Some(window) = web_sys::window() else { return };
            let synth = match window.speech_synthesis() {
                Ok(s) => s,
                Err(_) => return,
            };
            synth.cancel();
            let utterance = match SpeechSynthesisUtterance::new_with_text(text) {
                Ok(u) => u,
                Err(e) => {
                    log::error!("Speech synthesis error: {e:?}");
                    return;
                }
            };
            utterance.set_lang("en-US");
            utterance.set_rate(0.9);

            let voices: Vec<SpeechSynthesisVoice> = synth
                .get_voices()
                .iter()
                .filter_map(|v| v.dyn_into::<SpeechSynthesisVoice>().ok())
                .collect();
            let meta: Vec<(String, String)> = voices.iter().map(|v| (v.name(), v.lang())).collect();
            if let Some(idx) = pick_voice(meta.iter().map(|(n, l)| (n.as_str(), l.as_str()))) {
                utterance.set_voice(voices.get(idx));
            }
            synth.speak(&utterance);
        }

        fn play(&mut self, tone: Tone) {
            let Some(context) = &self.context else { return };
            // El navegador lo suspende hasta el primer gesto del usuario
            if context.state() == AudioContextState::Suspended {
                let _ = context.resume();
            }
            for note in tone.notes() {
                if let Err(e) = Self::play_note(context, &note) {
                    log::warn!("Could not play tone {tone:?}: {e:?}");
                    break;
                }
            }
        }
    }
}
