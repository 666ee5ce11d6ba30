// src/session/questions.rs
//
// Preguntas de un drill o quiz: construcción del conjunto, barajado,
// evaluación de respuestas y aprobado.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{ActivityContent, ActivityKind, BuildTheWord, FillInBlank, ListenChoice, OddOneOut};

#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Sort { word: String, is_correct: bool },
    Morph { base: String, target: String },
    FillInBlank(FillInBlank),
    OddOneOut(OddOneOut),
    BuildTheWord(BuildTheWord),
    Quiz(ListenChoice),
}

/// Lo que el alumno ha contestado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'a> {
    /// "Sí" / "No" en las preguntas de clasificar.
    Sort(bool),
    /// Pulsar el botón de transformar siempre cuenta como acierto.
    Morph,
    Choice(&'a str),
    /// Palabra montada letra a letra.
    Word(&'a str),
}

impl Question {
    pub fn accepts(&self, response: Response<'_>) -> bool {
        match (self, response) {
            (Question::Sort { is_correct, .. }, Response::Sort(said_yes)) => *is_correct == said_yes,
            (Question::Morph { .. }, Response::Morph) => true,
            (Question::FillInBlank(q), Response::Choice(c)) => q.correct == c,
            (Question::OddOneOut(q), Response::Choice(c)) => q.answer == c,
            (Question::Quiz(q), Response::Choice(c)) => q.answer == c,
            (Question::BuildTheWord(q), Response::Word(w)) => q.word == w,
            _ => false,
        }
    }

    /// Palabra que se pronuncia al mostrar la pregunta.
    pub fn spoken_on_show(&self) -> Option<&str> {
        match self {
            Question::Sort { word, .. } => Some(word.as_str()),
            Question::BuildTheWord(q) => Some(q.word.as_str()),
            _ => None,
        }
    }

    /// Palabra que se pronuncia tras acertar.
    pub fn spoken_on_success(&self) -> Option<&str> {
        match self {
            Question::Morph { target, .. } => Some(target.as_str()),
            Question::FillInBlank(q) => Some(q.answer.as_str()),
            _ => None,
        }
    }

    pub fn hint(&self, instruction: &str) -> String {
        match self {
            Question::Sort { .. } => format!("{instruction}\n🔊 استمع للكلمة مرة أخرى"),
            Question::FillInBlank(q) => match q.answer.chars().next() {
                Some(first) => format!("{instruction}\n💡 الكلمة تبدأ بحرف {first}"),
                None => instruction.to_string(),
            },
            _ => instruction.to_string(),
        }
    }
}

/// Una pregunta por palabra en `sort`, una por pareja en `morph`; el resto tal cual.
pub fn build_pool(content: &ActivityContent) -> Vec<Question> {
    match &content.kind {
        ActivityKind::Sort { correct, incorrect } => correct
            .iter()
            .map(|w| Question::Sort {
                word: w.clone(),
                is_correct: true,
            })
            .chain(incorrect.iter().map(|w| Question::Sort {
                word: w.clone(),
                is_correct: false,
            }))
            .collect(),
        ActivityKind::Morph { pairs } => pairs
            .iter()
            .map(|(base, target)| Question::Morph {
                base: base.clone(),
                target: target.clone(),
            })
            .collect(),
        ActivityKind::FillInBlank(qs) => qs.iter().cloned().map(Question::FillInBlank).collect(),
        ActivityKind::OddOneOut(qs) => qs.iter().cloned().map(Question::OddOneOut).collect(),
        ActivityKind::BuildTheWord(qs) => qs.iter().cloned().map(Question::BuildTheWord).collect(),
        ActivityKind::Quiz(qs) => qs.iter().cloned().map(Question::Quiz).collect(),
    }
}

/// Baraja (Fisher–Yates) y recorta a `per_session`, con un mínimo de 1.
pub fn prepare<R: Rng + ?Sized>(content: &ActivityContent, per_session: usize, rng: &mut R) -> Vec<Question> {
    let mut pool = build_pool(content);
    pool.shuffle(rng);
    pool.truncate(per_session.max(1));
    pool
}

pub fn is_passing(correct: usize, total: usize, passing_score: f32) -> bool {
    if total == 0 {
        return false;
    }
    correct as f32 / total as f32 + f32::EPSILON >= passing_score
}

/// Letras de la palabra desordenadas para montar.
pub fn scrambled_letters<R: Rng + ?Sized>(word: &str, rng: &mut R) -> Vec<char> {
    let mut letters: Vec<char> = word.chars().collect();
    letters.shuffle(rng);
    letters
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sort_content() -> ActivityContent {
        serde_json::from_str(
            r#"{"type":"sort","instruction":"Magic e?","correct":["cake","bike"],"incorrect":["cat","bit"]}"#,
        )
        .unwrap()
    }

    #[test]
    fn sort_pool_has_one_entry_per_word() {
        let pool = build_pool(&sort_content());
        assert_eq!(pool.len(), 4);
        let truths = pool
            .iter()
            .filter(|q| matches!(q, Question::Sort { is_correct: true, .. }))
            .count();
        assert_eq!(truths, 2);
        assert!(pool.contains(&Question::Sort {
            word: "cat".into(),
            is_correct: false
        }));
    }

    #[test]
    fn prepare_is_a_truncated_permutation() {
        let content = sort_content();
        let mut rng = StdRng::seed_from_u64(7);
        let all = prepare(&content, 10, &mut rng);
        assert_eq!(all.len(), 4);
        for q in build_pool(&content) {
            assert!(all.contains(&q));
        }
        assert_eq!(prepare(&content, 3, &mut rng).len(), 3);
        assert_eq!(prepare(&content, 0, &mut rng).len(), 1);
    }

    #[test]
    fn shuffle_has_no_positional_bias() {
        let content = sort_content();
        let mut rng = StdRng::seed_from_u64(42);
        let mut first_counts = std::collections::HashMap::new();
        let runs = 4000;
        for _ in 0..runs {
            let qs = prepare(&content, 4, &mut rng);
            if let Question::Sort { word, .. } = &qs[0] {
                *first_counts.entry(word.clone()).or_insert(0usize) += 1;
            }
        }
        assert_eq!(first_counts.len(), 4);
        for count in first_counts.values() {
            // ~1000 cada una; margen amplio
            assert!((800..1200).contains(count), "skewed: {first_counts:?}");
        }
    }

    #[test]
    fn passing_threshold() {
        assert!(is_passing(4, 5, 0.8));
        assert!(!is_passing(3, 5, 0.8));
        assert!(is_passing(5, 5, 1.0));
        assert!(!is_passing(0, 0, 0.5));
    }

    #[test]
    fn responses_are_checked_per_kind() {
        let sort = Question::Sort {
            word: "cat".into(),
            is_correct: false,
        };
        assert!(sort.accepts(Response::Sort(false)));
        assert!(!sort.accepts(Response::Sort(true)));

        let quiz = Question::Quiz(ListenChoice {
            audio: "cape".into(),
            options: vec!["cap".into(), "cape".into()],
            answer: "cape".into(),
        });
        assert!(quiz.accepts(Response::Choice("cape")));
        assert!(!quiz.accepts(Response::Choice("cap")));
        assert!(!quiz.accepts(Response::Word("cape")));

        let build = Question::BuildTheWord(BuildTheWord {
            word: "bee".into(),
            image: "🐝".into(),
        });
        assert!(build.accepts(Response::Word("bee")));
        assert!(!build.accepts(Response::Word("ebe")));
    }

    #[test]
    fn fill_in_blank_hint_names_first_letter() {
        let q = Question::FillInBlank(FillInBlank {
            partial: "k__te".into(),
            options: vec!["i".into(), "a".into()],
            correct: "i".into(),
            answer: "kite".into(),
        });
        assert!(q.hint("أكمل الكلمة").ends_with("k"));
        assert_eq!(q.spoken_on_success(), Some("kite"));
    }

    #[test]
    fn scrambled_letters_keep_the_multiset() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut letters = scrambled_letters("tree", &mut rng);
        letters.sort_unstable();
        assert_eq!(letters, vec!['e', 'e', 'r', 't']);
    }
}
