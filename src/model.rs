use serde::{Deserialize, Serialize};

/// Paso de una sub-habilidad.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Learn,
    Drill,
    Quiz,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Learn, Step::Drill, Step::Quiz];
    pub const DIRECT_DRILL: [Step; 2] = [Step::Drill, Step::Quiz];

    pub fn label(self) -> &'static str {
        match self {
            Step::Learn => "📖 تعلم",
            Step::Drill => "🎯 تمرين",
            Step::Quiz => "🏆 اختبار",
        }
    }

    /// Paso que debe estar hecho antes de poder abrir este.
    pub fn prerequisite(self, direct_drill: bool) -> Option<Step> {
        match self {
            Step::Learn => None,
            Step::Drill if direct_drill => None,
            Step::Drill => Some(Step::Learn),
            Step::Quiz => Some(Step::Drill),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Curriculum {
    #[serde(default)]
    pub techniques: Vec<Technique>,
    #[serde(rename = "encouragingMessages", default)]
    pub encouraging_messages: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Technique {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "subSkills", default)]
    pub sub_skills: Vec<SubSkill>,
}

impl Technique {
    pub fn sub_skill(&self, id: &str) -> Option<&SubSkill> {
        self.sub_skills.iter().find(|s| s.id == id)
    }

    pub fn total_steps(&self) -> usize {
        self.sub_skills.iter().map(|s| s.required_steps().len()).sum()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "isDirectDrill", default)]
    pub is_direct_drill: bool,
    #[serde(default)]
    pub learn_info: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub learn_check: Option<LearnCheck>,
    pub drill: ActivityContent,
    pub quiz: ActivityContent,
}

impl SubSkill {
    /// Pasos necesarios para dar la sub-habilidad por completa.
    pub fn required_steps(&self) -> &'static [Step] {
        if self.is_direct_drill {
            &Step::DIRECT_DRILL
        } else {
            &Step::ALL
        }
    }

    pub fn content(&self, step: Step) -> Option<&ActivityContent> {
        match step {
            Step::Learn => None,
            Step::Drill => Some(&self.drill),
            Step::Quiz => Some(&self.quiz),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Example {
    pub before: String,
    pub after: String,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Pregunta de comprobación al final de una lección.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LearnCheck {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Etiqueta del widget que pinta cada tipo de pregunta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    Morph,
    Sort,
    FillInBlank,
    OddOneOut,
    BuildTheWord,
    Quiz,
}

impl QuestionKind {
    /// Los tipos desconocidos se pintan como `quiz`.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("morph") => QuestionKind::Morph,
            Some("sort") => QuestionKind::Sort,
            Some("fill_in_blank") => QuestionKind::FillInBlank,
            Some("odd_one_out") => QuestionKind::OddOneOut,
            Some("build_the_word") => QuestionKind::BuildTheWord,
            _ => QuestionKind::Quiz,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillInBlank {
    /// Palabra con `__` en el hueco.
    pub partial: String,
    pub options: Vec<String>,
    pub correct: String,
    /// Palabra completa que se pronuncia al acertar.
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddOneOut {
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildTheWord {
    pub word: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListenChoice {
    pub audio: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityKind {
    Sort {
        correct: Vec<String>,
        incorrect: Vec<String>,
    },
    Morph {
        pairs: Vec<(String, String)>,
    },
    FillInBlank(Vec<FillInBlank>),
    OddOneOut(Vec<OddOneOut>),
    BuildTheWord(Vec<BuildTheWord>),
    Quiz(Vec<ListenChoice>),
}

/// Contenido de un drill o quiz, validado al cargar el currículo.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawActivity")]
pub struct ActivityContent {
    pub instruction: String,
    pub kind: ActivityKind,
}

impl ActivityContent {
    pub fn question_kind(&self) -> QuestionKind {
        match self.kind {
            ActivityKind::Sort { .. } => QuestionKind::Sort,
            ActivityKind::Morph { .. } => QuestionKind::Morph,
            ActivityKind::FillInBlank(_) => QuestionKind::FillInBlank,
            ActivityKind::OddOneOut(_) => QuestionKind::OddOneOut,
            ActivityKind::BuildTheWord(_) => QuestionKind::BuildTheWord,
            ActivityKind::Quiz(_) => QuestionKind::Quiz,
        }
    }
}

// Forma cruda del JSON: todos los campos opcionales, se valida en `try_from`.
#[derive(Deserialize, Debug, Default)]
struct RawActivity {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    correct: Vec<String>,
    #[serde(default)]
    incorrect: Vec<String>,
    #[serde(default)]
    pairs: Vec<Vec<String>>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Deserialize, Debug, Default)]
struct RawQuestion {
    #[serde(default)]
    partial: Option<String>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    correct: Option<String>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

fn required(value: Option<String>, field: &str, idx: usize) -> Result<String, String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("question {} is missing `{field}`", idx + 1))
}

impl TryFrom<RawActivity> for ActivityContent {
    type Error = String;

    fn try_from(raw: RawActivity) -> Result<Self, Self::Error> {
        let kind = match QuestionKind::from_tag(raw.kind.as_deref()) {
            QuestionKind::Sort => {
                if raw.correct.is_empty() && raw.incorrect.is_empty() {
                    return Err("sort content has no words".into());
                }
                ActivityKind::Sort {
                    correct: raw.correct,
                    incorrect: raw.incorrect,
                }
            }
            QuestionKind::Morph => {
                let pairs = raw
                    .pairs
                    .into_iter()
                    .enumerate()
                    .map(|(i, pair)| match <[String; 2]>::try_from(pair) {
                        Ok([a, b]) => Ok((a, b)),
                        Err(_) => Err(format!("pair {} must have exactly two words", i + 1)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ActivityKind::Morph { pairs }
            }
            QuestionKind::FillInBlank => ActivityKind::FillInBlank(
                raw.questions
                    .into_iter()
                    .enumerate()
                    .map(|(i, q)| {
                        let partial = required(q.partial, "partial", i)?;
                        let correct = required(q.correct, "correct", i)?;
                        let answer = q
                            .answer
                            .unwrap_or_else(|| partial.replacen("__", &correct, 1));
                        Ok(FillInBlank {
                            partial,
                            options: q.options,
                            correct,
                            answer,
                        })
                    })
                    .collect::<Result<Vec<_>, String>>()?,
            ),
            QuestionKind::OddOneOut => ActivityKind::OddOneOut(
                raw.questions
                    .into_iter()
                    .enumerate()
                    .map(|(i, q)| {
                        let answer = required(q.answer, "answer", i)?;
                        Ok(OddOneOut {
                            options: q.options,
                            answer,
                        })
                    })
                    .collect::<Result<Vec<_>, String>>()?,
            ),
            QuestionKind::BuildTheWord => ActivityKind::BuildTheWord(
                raw.questions
                    .into_iter()
                    .enumerate()
                    .map(|(i, q)| {
                        Ok(BuildTheWord {
                            word: required(q.word, "word", i)?,
                            image: q.image.unwrap_or_default(),
                        })
                    })
                    .collect::<Result<Vec<_>, String>>()?,
            ),
            QuestionKind::Quiz => {
                if let Some(tag) = raw.kind.as_deref().filter(|t| *t != "quiz") {
                    log::warn!("Unknown activity type `{tag}`, rendering as quiz");
                }
                ActivityKind::Quiz(
                    raw.questions
                        .into_iter()
                        .enumerate()
                        .map(|(i, q)| {
                            let answer = required(q.answer, "answer", i)?;
                            Ok(ListenChoice {
                                audio: q.audio.unwrap_or_else(|| answer.clone()),
                                options: q.options,
                                answer,
                            })
                        })
                        .collect::<Result<Vec<_>, String>>()?,
                )
            }
        };

        Ok(ActivityContent {
            instruction: raw.instruction,
            kind,
        })
    }
}

/// Pantallas principales de la app.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Splash,
    SkillsGrid,
    Technique,
    Dashboard,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Splash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_content_parses_word_lists() {
        let content: ActivityContent = serde_json::from_str(
            r#"{"type":"sort","instruction":"Magic e?","correct":["cake","bike"],"incorrect":["cat","bit"]}"#,
        )
        .unwrap();
        assert_eq!(content.question_kind(), QuestionKind::Sort);
        assert_eq!(content.instruction, "Magic e?");
    }

    #[test]
    fn unknown_type_falls_back_to_quiz() {
        let content: ActivityContent = serde_json::from_str(
            r#"{"type":"spin_the_wheel","questions":[{"options":["a","b"],"answer":"a"}]}"#,
        )
        .unwrap();
        match content.kind {
            ActivityKind::Quiz(qs) => {
                assert_eq!(qs.len(), 1);
                assert_eq!(qs[0].audio, "a");
            }
            other => panic!("expected quiz, got {other:?}"),
        }
    }

    #[test]
    fn morph_pairs_must_have_two_words() {
        let err = serde_json::from_str::<ActivityContent>(
            r#"{"type":"morph","pairs":[["cap","cape"],["kit"]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("pair 2"));
    }

    #[test]
    fn fill_in_blank_derives_full_answer() {
        let content: ActivityContent = serde_json::from_str(
            r#"{"type":"fill_in_blank","questions":[{"partial":"c__ke","options":["a","o"],"correct":"a"}]}"#,
        )
        .unwrap();
        match content.kind {
            ActivityKind::FillInBlank(qs) => assert_eq!(qs[0].answer, "cake"),
            other => panic!("expected fill in blank, got {other:?}"),
        }
    }

    #[test]
    fn direct_drill_requires_two_steps() {
        let sub: SubSkill = serde_json::from_str(
            r#"{"id":"s","name":"S","isDirectDrill":true,
                "drill":{"type":"sort","correct":["a"]},
                "quiz":{"type":"quiz","questions":[{"options":["a"],"answer":"a"}]}}"#,
        )
        .unwrap();
        assert_eq!(sub.required_steps(), &[Step::Drill, Step::Quiz]);
        assert_eq!(Step::Drill.prerequisite(true), None);
        assert_eq!(Step::Drill.prerequisite(false), Some(Step::Learn));
    }
}
