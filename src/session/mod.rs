// src/session/mod.rs
//
// Orquestador de actividades: una máquina de estados con un único punto de
// entrada (`dispatch`) y temporizadores ligados a la generación de la sesión.

pub mod lesson;
pub mod questions;
pub mod scheduler;

use std::collections::{BTreeSet, VecDeque};

use rand::RngCore;

use crate::audio::Tone;
use crate::curriculum::CurriculumStore;
use crate::effects::Celebration;
use crate::model::{QuestionKind, Step};
use crate::progress::{MASTERY_POINTS, ProgressStore, STEP_POINTS};

use lesson::{Lesson, LessonStep};
use questions::{Question, is_passing};
use scheduler::{Scheduler, TimerAction};

/// Índice del botón u opción dentro de la pregunta.
pub type ControlId = usize;

pub const ADVANCE_DELAY_MS: i64 = 1_500;
pub const REENABLE_DELAY_MS: i64 = 1_000;
pub const RETURN_DELAY_MS: i64 = 2_000;

pub const RETRY_MESSAGE: &str = "حاول مرة أخرى 💪";
pub const LESSON_DONE_MESSAGE: &str = "أحسنت! لقد أكملت الدرس";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRef {
    pub technique_id: String,
    pub sub_skill_id: String,
    pub step: Step,
}

/// Efectos para los colaboradores de audio y animación, y la navegación.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Tone(Tone),
    Celebrate(Celebration),
    Speak(String),
    ClearEffects,
    ReturnToTechnique(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    StartActivity {
        technique_id: String,
        sub_skill_id: String,
        step: Step,
    },
    Answer {
        correct: bool,
        control: ControlId,
    },
    Next,
    LessonForward,
    LessonBack,
    LessonCheck(String),
    FinishLearn,
    Exit,
}

/// Lo que necesita el orquestador del resto de la app en cada llamada.
pub struct SessionContext<'a> {
    pub curriculum: &'a CurriculumStore,
    pub progress: &'a mut ProgressStore,
    pub rng: &'a mut dyn RngCore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LearnSession {
    pub activity: ActivityRef,
    /// `None` muestra la página estática.
    pub lesson: Option<Lesson>,
    pub feedback: Option<Feedback>,
}

#[derive(Debug, Clone)]
pub struct QuestionSession {
    pub activity: ActivityRef,
    pub kind: QuestionKind,
    pub instruction: String,
    pub questions: Vec<Question>,
    /// Preguntas ya resueltas.
    pub current: usize,
    /// Pregunta en pantalla; va por detrás de `current` hasta pulsar "siguiente".
    pub shown: usize,
    pub correct_answers: usize,
    pub disabled: BTreeSet<ControlId>,
    pub missed_current: bool,
    pub feedback: Option<Feedback>,
}

impl QuestionSession {
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self) -> Option<&Question> {
        self.questions.get(self.shown)
    }

    pub fn awaiting_next(&self) -> bool {
        self.current > self.shown
    }

    pub fn is_disabled(&self, control: ControlId) -> bool {
        self.awaiting_next() || self.disabled.contains(&control)
    }

    /// Pista tras el primer fallo, si están activadas.
    pub fn hint(&self, enable_hints: bool) -> Option<String> {
        if !enable_hints || !self.missed_current || self.awaiting_next() {
            return None;
        }
        self.question().map(|q| q.hint(&self.instruction))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub technique_id: String,
    pub message: String,
    pub reward: String,
    pub passed: bool,
    pub mastered: bool,
}

#[derive(Debug, Clone, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Learn(LearnSession),
    Questions(QuestionSession),
    Completed(Outcome),
}

#[derive(Default)]
pub struct Orchestrator {
    phase: Phase,
    scheduler: Scheduler,
    effects: VecDeque<Effect>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::NotStarted)
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.effects.drain(..).collect()
    }

    /// Próximo temporizador, para programar el repintado.
    pub fn next_wakeup(&self) -> Option<i64> {
        self.scheduler.next_due()
    }

    pub fn dispatch(&mut self, intent: Intent, ctx: &mut SessionContext<'_>) {
        match intent {
            Intent::StartActivity {
                technique_id,
                sub_skill_id,
                step,
            } => self.start(
                ActivityRef {
                    technique_id,
                    sub_skill_id,
                    step,
                },
                ctx,
            ),
            Intent::Answer { correct, control } => self.answer(correct, control, ctx),
            Intent::Next => self.advance(),
            Intent::LessonForward => self.move_lesson(true),
            Intent::LessonBack => self.move_lesson(false),
            Intent::LessonCheck(choice) => self.check_lesson(&choice, ctx),
            Intent::FinishLearn => self.finish_learn(ctx),
            Intent::Exit => self.exit(),
        }
    }

    /// Dispara los temporizadores vencidos.
    pub fn tick(&mut self, ctx: &mut SessionContext<'_>) {
        let now = ctx.progress.now_ms();
        for action in self.scheduler.take_due(now) {
            match action {
                TimerAction::Advance => self.advance(),
                TimerAction::ReEnable(control) => {
                    if let Phase::Questions(s) = &mut self.phase {
                        s.disabled.remove(&control);
                    }
                }
                TimerAction::ReturnToTechnique => self.return_to_technique(),
            }
        }
    }

    fn start(&mut self, activity: ActivityRef, ctx: &mut SessionContext<'_>) {
        let curriculum = ctx.curriculum;
        let Some(sub) = curriculum.sub_skill(&activity.technique_id, &activity.sub_skill_id) else {
            log::debug!(
                "No sub-skill {}/{}, ignoring",
                activity.technique_id,
                activity.sub_skill_id
            );
            return;
        };
        let settings = ctx.progress.settings().clone();

        let phase = match sub.content(activity.step) {
            None => Phase::Learn(LearnSession {
                lesson: settings.paced_lessons.then(|| Lesson::build(sub)),
                activity: activity.clone(),
                feedback: None,
            }),
            Some(content) => {
                let questions =
                    questions::prepare(content, settings.questions_per_session, &mut *ctx.rng);
                if questions.is_empty() {
                    log::warn!(
                        "{:?} of {}/{} has no questions, not starting",
                        activity.step,
                        activity.technique_id,
                        activity.sub_skill_id
                    );
                    return;
                }
                Phase::Questions(QuestionSession {
                    activity: activity.clone(),
                    kind: content.question_kind(),
                    instruction: content.instruction.clone(),
                    questions,
                    current: 0,
                    shown: 0,
                    correct_answers: 0,
                    disabled: BTreeSet::new(),
                    missed_current: false,
                    feedback: None,
                })
            }
        };

        self.scheduler.cancel_all();
        self.effects.push_back(Effect::ClearEffects);
        self.phase = phase;
        ctx.progress.start_session();
        log::info!(
            "Started {:?} for {}/{}",
            activity.step,
            activity.technique_id,
            activity.sub_skill_id
        );
        self.speak_current();
    }

    fn speak_current(&mut self) {
        if let Phase::Questions(s) = &self.phase {
            if let Some(word) = s.question().and_then(Question::spoken_on_show) {
                self.effects.push_back(Effect::Speak(word.to_string()));
            }
        }
    }

    fn answer(&mut self, correct: bool, control: ControlId, ctx: &mut SessionContext<'_>) {
        let now = ctx.progress.now_ms();
        let auto_advance = ctx.progress.settings().auto_advance;
        let Phase::Questions(s) = &mut self.phase else {
            return;
        };
        if s.is_disabled(control) {
            return;
        }

        if !correct {
            s.feedback = Some(Feedback {
                correct: false,
                message: RETRY_MESSAGE.to_string(),
            });
            s.missed_current = true;
            s.disabled.insert(control);
            self.effects.push_back(Effect::Tone(Tone::Wrong));
            self.scheduler
                .schedule(now, REENABLE_DELAY_MS, TimerAction::ReEnable(control));
            return;
        }

        s.feedback = Some(Feedback {
            correct: true,
            message: ctx.curriculum.random_encouragement(&mut *ctx.rng),
        });
        s.correct_answers += 1;
        s.current += 1;
        self.effects.push_back(Effect::Celebrate(Celebration::Quick));
        self.effects.push_back(Effect::Tone(Tone::Correct));
        if let Some(word) = s.question().and_then(Question::spoken_on_success) {
            self.effects.push_back(Effect::Speak(word.to_string()));
        }

        if s.current >= s.total() {
            self.complete_questions(ctx);
        } else if auto_advance {
            self.scheduler
                .schedule(now, ADVANCE_DELAY_MS, TimerAction::Advance);
        }
    }

    fn advance(&mut self) {
        let Phase::Questions(s) = &mut self.phase else {
            return;
        };
        if !s.awaiting_next() {
            return;
        }
        s.shown = s.current;
        s.disabled.clear();
        s.missed_current = false;
        s.feedback = None;
        self.scheduler
            .cancel(|a| matches!(a, TimerAction::Advance | TimerAction::ReEnable(_)));
        self.effects.push_back(Effect::ClearEffects);
        self.speak_current();
    }

    fn complete_questions(&mut self, ctx: &mut SessionContext<'_>) {
        let Phase::Questions(s) = std::mem::take(&mut self.phase) else {
            return;
        };
        let total = s.total();
        let passing_score = ctx.progress.settings().passing_score;
        ctx.progress
            .end_session(&s.activity.technique_id, s.correct_answers, total);

        let outcome = if is_passing(s.correct_answers, total, passing_score) {
            self.record_pass(&s.activity, ctx)
        } else {
            log::info!(
                "Failed {:?} of {}/{}: {}/{}",
                s.activity.step,
                s.activity.technique_id,
                s.activity.sub_skill_id,
                s.correct_answers,
                total
            );
            Outcome {
                technique_id: s.activity.technique_id.clone(),
                message: format!(
                    "تحتاج {}% للنجاح. حاول مرة أخرى!",
                    (passing_score * 100.0).round() as u32
                ),
                reward: "لا تستسلم! 💪".to_string(),
                passed: false,
                mastered: false,
            }
        };
        self.finish(outcome, ctx);
    }

    /// Marca el paso y, si era lo último que faltaba, domina la técnica.
    fn record_pass(&mut self, activity: &ActivityRef, ctx: &mut SessionContext<'_>) -> Outcome {
        let curriculum = ctx.curriculum;
        let is_new = ctx.progress.mark_step_complete(
            &activity.technique_id,
            &activity.sub_skill_id,
            activity.step,
        );

        let technique = curriculum.technique(&activity.technique_id);
        let newly_mastered = technique.is_some_and(|t| {
            let tp = ctx.progress.technique_progress(&t.id);
            tp.covers(t) && !tp.mastered
        });

        if let (true, Some(t)) = (newly_mastered, technique) {
            ctx.progress.mark_technique_mastered(&t.id);
            self.effects.push_back(Effect::Celebrate(Celebration::Mastery));
            self.effects.push_back(Effect::Tone(Tone::Achievement));
            return Outcome {
                technique_id: activity.technique_id.clone(),
                message: format!("لقد أتقنت مهارة {}!", t.name_ar),
                reward: format!("+{MASTERY_POINTS} نقطة 🎊"),
                passed: true,
                mastered: true,
            };
        }

        self.effects.push_back(Effect::Celebrate(Celebration::Step));
        self.effects.push_back(Effect::Tone(Tone::Success));
        let message = match activity.step {
            Step::Learn => LESSON_DONE_MESSAGE,
            Step::Drill => "أحسنت في التمرين!",
            Step::Quiz => "نجحت في الاختبار!",
        };
        Outcome {
            technique_id: activity.technique_id.clone(),
            message: message.to_string(),
            reward: if is_new {
                format!("+{STEP_POINTS} نقاط ⭐")
            } else {
                "⭐".to_string()
            },
            passed: true,
            mastered: false,
        }
    }

    fn finish(&mut self, outcome: Outcome, ctx: &mut SessionContext<'_>) {
        let now = ctx.progress.now_ms();
        self.scheduler.cancel_all();
        self.scheduler
            .schedule(now, RETURN_DELAY_MS, TimerAction::ReturnToTechnique);
        self.phase = Phase::Completed(outcome);
    }

    fn move_lesson(&mut self, forward: bool) {
        let Phase::Learn(s) = &mut self.phase else {
            return;
        };
        let Some(lesson) = &mut s.lesson else {
            return;
        };
        let moved = if forward { lesson.forward() } else { lesson.back() };
        if !moved {
            return;
        }
        s.feedback = None;
        self.effects.push_back(Effect::Tone(Tone::Click));
        if let LessonStep::Example(example) = lesson.current() {
            self.effects.push_back(Effect::Speak(example.after.clone()));
        }
    }

    fn check_lesson(&mut self, choice: &str, ctx: &mut SessionContext<'_>) {
        let Phase::Learn(s) = &mut self.phase else {
            return;
        };
        let Some(result) = s.lesson.as_mut().and_then(|l| l.check(choice)) else {
            return;
        };
        if result {
            s.feedback = Some(Feedback {
                correct: true,
                message: ctx.curriculum.random_encouragement(&mut *ctx.rng),
            });
            self.effects.push_back(Effect::Celebrate(Celebration::Quick));
            self.effects.push_back(Effect::Tone(Tone::Correct));
            self.effects.push_back(Effect::Speak(choice.to_string()));
        } else {
            s.feedback = Some(Feedback {
                correct: false,
                message: RETRY_MESSAGE.to_string(),
            });
            self.effects.push_back(Effect::Tone(Tone::Wrong));
        }
    }

    fn finish_learn(&mut self, ctx: &mut SessionContext<'_>) {
        let Phase::Learn(s) = &self.phase else {
            return;
        };
        if s.lesson.as_ref().is_some_and(|l| !l.is_finished()) {
            return;
        }
        let Phase::Learn(s) = std::mem::take(&mut self.phase) else {
            return;
        };
        ctx.progress.end_session(&s.activity.technique_id, 1, 1);
        let outcome = self.record_pass(&s.activity, ctx);
        self.finish(outcome, ctx);
    }

    fn exit(&mut self) {
        match &self.phase {
            Phase::NotStarted => {}
            Phase::Completed(_) => self.return_to_technique(),
            Phase::Learn(_) | Phase::Questions(_) => {
                log::info!("Activity exited");
                self.scheduler.cancel_all();
                self.phase = Phase::NotStarted;
                self.effects.push_back(Effect::ClearEffects);
            }
        }
    }

    fn return_to_technique(&mut self) {
        let Phase::Completed(outcome) = std::mem::take(&mut self.phase) else {
            return;
        };
        self.scheduler.cancel_all();
        self.effects.push_back(Effect::ClearEffects);
        self.effects
            .push_back(Effect::ReturnToTechnique(outcome.technique_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::data::EmbeddedSource;
    use crate::settings::{MAX_QUESTIONS, SettingChange};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        curriculum: CurriculumStore,
        progress: ProgressStore,
        rng: StdRng,
        clock: ManualClock,
        orch: Orchestrator,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = ManualClock::at(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
            let mut curriculum = CurriculumStore::new();
            curriculum.load(&EmbeddedSource);
            Self {
                curriculum,
                progress: ProgressStore::open(Box::new(MemoryStore::new()), Box::new(clock.clone())),
                rng: StdRng::seed_from_u64(11),
                clock,
                orch: Orchestrator::new(),
            }
        }

        fn send(&mut self, intent: Intent) {
            let mut ctx = SessionContext {
                curriculum: &self.curriculum,
                progress: &mut self.progress,
                rng: &mut self.rng,
            };
            self.orch.dispatch(intent, &mut ctx);
        }

        fn wait(&mut self, ms: i64) {
            self.clock.advance_ms(ms);
            let mut ctx = SessionContext {
                curriculum: &self.curriculum,
                progress: &mut self.progress,
                rng: &mut self.rng,
            };
            self.orch.tick(&mut ctx);
        }

        fn start(&mut self, technique: &str, sub: &str, step: Step) {
            self.send(Intent::StartActivity {
                technique_id: technique.into(),
                sub_skill_id: sub.into(),
                step,
            });
        }

        fn questions(&self) -> &QuestionSession {
            match self.orch.phase() {
                Phase::Questions(s) => s,
                other => panic!("expected questions, got {other:?}"),
            }
        }

        fn answer_right(&mut self) {
            self.send(Intent::Answer {
                correct: true,
                control: 0,
            });
        }

        fn outcome(&self) -> &Outcome {
            match self.orch.phase() {
                Phase::Completed(o) => o,
                other => panic!("expected completed, got {other:?}"),
            }
        }

        fn run_all_right(&mut self, technique: &str, sub: &str, step: Step) {
            self.start(technique, sub, step);
            for _ in 0..MAX_QUESTIONS {
                if !matches!(self.orch.phase(), Phase::Questions(_)) {
                    break;
                }
                self.answer_right();
                self.send(Intent::Next);
            }
        }

        fn finish_lesson(&mut self, technique: &str, sub: &str) {
            self.start(technique, sub, Step::Learn);
            loop {
                let Phase::Learn(s) = self.orch.phase() else { panic!() };
                let lesson = s.lesson.as_ref().unwrap();
                if lesson.is_finished() {
                    break;
                }
                if let LessonStep::MicroCheck(check) = lesson.current() {
                    let answer = check.answer.clone();
                    self.send(Intent::LessonCheck(answer));
                }
                self.send(Intent::LessonForward);
            }
            self.send(Intent::FinishLearn);
        }
    }

    #[test]
    fn missing_sub_skill_is_a_silent_no_op() {
        let mut f = Fixture::new();
        f.start("magic_e", "nope", Step::Drill);
        assert!(!f.orch.is_active());
        assert!(f.orch.drain_effects().is_empty());
    }

    #[test]
    fn drill_is_shuffled_and_truncated() {
        let mut f = Fixture::new();
        f.progress.update_setting(SettingChange::QuestionsPerSession(3));
        f.start("magic_e", "i_e", Step::Drill);
        let s = f.questions();
        assert_eq!(s.kind, QuestionKind::Sort);
        assert_eq!(s.total(), 3);
        assert_eq!(s.current, 0);
        assert_eq!(s.correct_answers, 0);
        let effects = f.orch.drain_effects();
        assert_eq!(effects[0], Effect::ClearEffects);
        assert!(matches!(effects.last(), Some(Effect::Speak(_))));
    }

    #[test]
    fn wrong_answer_disables_control_for_a_second() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Quiz);
        f.send(Intent::Answer {
            correct: false,
            control: 1,
        });
        let s = f.questions();
        assert_eq!(s.shown, 0);
        assert!(s.is_disabled(1));
        assert!(!s.is_disabled(0));
        assert_eq!(s.feedback.as_ref().unwrap().message, RETRY_MESSAGE);

        // Pulsar el control deshabilitado no hace nada
        f.send(Intent::Answer {
            correct: false,
            control: 1,
        });
        f.wait(999);
        assert!(f.questions().is_disabled(1));
        f.wait(1);
        assert!(!f.questions().is_disabled(1));
    }

    #[test]
    fn hint_appears_after_first_miss() {
        let mut f = Fixture::new();
        f.start("magic_e", "i_e", Step::Drill);
        assert!(f.questions().hint(true).is_none());
        f.send(Intent::Answer {
            correct: false,
            control: 0,
        });
        assert!(f.questions().hint(false).is_none());
        assert!(f.questions().hint(true).unwrap().contains("🔊"));
    }

    #[test]
    fn correct_answer_auto_advances_after_delay() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Drill);
        f.answer_right();
        assert!(f.questions().awaiting_next());
        assert_eq!(f.questions().current, 1);
        f.wait(ADVANCE_DELAY_MS - 1);
        assert_eq!(f.questions().shown, 0);
        f.wait(1);
        assert_eq!(f.questions().shown, 1);
        assert!(!f.questions().awaiting_next());
    }

    #[test]
    fn without_auto_advance_next_is_required() {
        let mut f = Fixture::new();
        f.progress.update_setting(SettingChange::AutoAdvance(false));
        f.start("magic_e", "a_e", Step::Drill);
        f.answer_right();
        f.wait(5_000);
        assert_eq!(f.questions().shown, 0);
        f.send(Intent::Next);
        assert_eq!(f.questions().shown, 1);
    }

    #[test]
    fn stale_timer_cannot_touch_a_new_session() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Drill);
        f.answer_right();
        f.send(Intent::Exit);
        assert!(!f.orch.is_active());
        f.start("magic_e", "a_e", Step::Quiz);
        f.wait(ADVANCE_DELAY_MS * 2);
        assert_eq!(f.questions().shown, 0);
        assert_eq!(f.questions().current, 0);
    }

    #[test]
    fn passing_drill_marks_step_and_returns() {
        let mut f = Fixture::new();
        f.run_all_right("magic_e", "a_e", Step::Drill);
        let outcome = f.outcome().clone();
        assert!(outcome.passed && !outcome.mastered);
        assert_eq!(outcome.message, "أحسنت في التمرين!");
        assert!(f.progress.is_step_done("magic_e", "a_e", Step::Drill));
        assert_eq!(f.progress.progress().points, STEP_POINTS);
        assert_eq!(f.progress.progress().analytics.sessions_completed, 1);

        f.orch.drain_effects();
        f.wait(RETURN_DELAY_MS);
        assert!(!f.orch.is_active());
        assert!(
            f.orch
                .drain_effects()
                .contains(&Effect::ReturnToTechnique("magic_e".into()))
        );
    }

    #[test]
    fn retried_answers_still_count() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Quiz);
        let total = f.questions().total();
        assert_eq!(total, 5);
        for i in 0..total {
            if i < 2 {
                f.send(Intent::Answer {
                    correct: false,
                    control: 1,
                });
            }
            f.answer_right();
            if let Phase::Questions(s) = f.orch.phase() {
                assert_eq!(s.correct_answers, s.current);
                f.send(Intent::Next);
            }
        }
        let outcome = f.outcome();
        assert!(outcome.passed);
        assert!(f.progress.is_step_done("magic_e", "a_e", Step::Quiz));
        let accuracy = f.progress.progress().analytics.average_accuracy;
        assert!((accuracy - 1.0).abs() < 1e-6);
    }

    #[test]
    fn low_score_fails_without_recording() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Quiz);
        if let Phase::Questions(s) = &mut f.orch.phase {
            s.current = s.total() - 1;
            s.shown = s.current;
            s.correct_answers = 2;
        }
        f.answer_right();
        let outcome = f.outcome();
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "تحتاج 80% للنجاح. حاول مرة أخرى!");
        assert!(!f.progress.is_step_done("magic_e", "a_e", Step::Quiz));
        assert_eq!(f.progress.progress().points, 0);
        let accuracy = f.progress.progress().analytics.average_accuracy;
        assert!((accuracy - 0.6).abs() < 1e-6);
    }

    #[test]
    fn miss_on_the_only_live_control_waits_for_reenable() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Quiz);
        let total = f.questions().total();
        f.send(Intent::Answer {
            correct: false,
            control: 0,
        });
        f.answer_right();
        assert_eq!(f.questions().current, 0);
        f.wait(REENABLE_DELAY_MS);
        for _ in 0..total {
            if !matches!(f.orch.phase(), Phase::Questions(_)) {
                break;
            }
            f.answer_right();
            f.send(Intent::Next);
        }
        assert!(f.outcome().passed);
    }

    #[test]
    fn full_mastery_scenario() {
        let mut f = Fixture::new();
        for sub in ["a_e", "i_e"] {
            f.finish_lesson("magic_e", sub);
            f.send(Intent::Exit);
            f.run_all_right("magic_e", sub, Step::Drill);
            f.send(Intent::Exit);
            f.run_all_right("magic_e", sub, Step::Quiz);
            if sub == "a_e" {
                assert!(!f.outcome().mastered);
                f.send(Intent::Exit);
            }
        }
        let outcome = f.outcome().clone();
        assert!(outcome.mastered);
        assert_eq!(outcome.message, "لقد أتقنت مهارة حرف E السحري!");
        assert_eq!(f.progress.progress().points, 110);
        assert!(f.progress.is_mastered("magic_e"));
        let effects = f.orch.drain_effects();
        assert!(effects.contains(&Effect::Celebrate(Celebration::Mastery)));

        // Repetir un quiz no vuelve a dar el bonus
        f.send(Intent::Exit);
        f.run_all_right("magic_e", "a_e", Step::Quiz);
        assert!(!f.outcome().mastered);
        assert_eq!(f.progress.progress().points, 110);
    }

    #[test]
    fn direct_drill_technique_masters_with_two_steps() {
        let mut f = Fixture::new();
        f.finish_lesson("team_sounds", "ee_ea");
        f.send(Intent::Exit);
        for step in [Step::Drill, Step::Quiz] {
            f.run_all_right("team_sounds", "ee_ea", step);
            f.send(Intent::Exit);
            f.run_all_right("team_sounds", "ai_ay", step);
            f.send(Intent::Exit);
        }
        assert!(f.progress.is_mastered("team_sounds"));
        assert_eq!(f.progress.progress().points, 5 * STEP_POINTS + MASTERY_POINTS);
    }

    #[test]
    fn paced_lesson_blocks_finish_until_last_step() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Learn);
        f.send(Intent::FinishLearn);
        assert!(matches!(f.orch.phase(), Phase::Learn(_)));
        f.send(Intent::Exit);
        f.finish_lesson("magic_e", "a_e");
        let outcome = f.outcome();
        assert_eq!(outcome.message, LESSON_DONE_MESSAGE);
        assert!(f.progress.is_step_done("magic_e", "a_e", Step::Learn));
        let a = &f.progress.progress().analytics;
        assert_eq!(a.sessions_completed, 1);
        assert!((a.average_accuracy - 1.0).abs() < 1e-6);
    }

    #[test]
    fn static_page_finishes_at_once() {
        let mut f = Fixture::new();
        f.progress.update_setting(SettingChange::PacedLessons(false));
        f.start("magic_e", "i_e", Step::Learn);
        match f.orch.phase() {
            Phase::Learn(s) => assert!(s.lesson.is_none()),
            other => panic!("expected learn, got {other:?}"),
        }
        f.send(Intent::FinishLearn);
        assert!(f.outcome().passed);
        assert_eq!(f.progress.progress().points, STEP_POINTS);
    }

    #[test]
    fn wrong_microcheck_keeps_lesson_blocked() {
        let mut f = Fixture::new();
        f.start("magic_e", "a_e", Step::Learn);
        for _ in 0..6 {
            f.send(Intent::LessonForward);
        }
        f.send(Intent::LessonCheck("hat".into()));
        f.send(Intent::LessonForward);
        let Phase::Learn(s) = f.orch.phase() else { panic!() };
        assert!(matches!(s.lesson.as_ref().unwrap().current(), LessonStep::MicroCheck(_)));
        assert_eq!(s.feedback.as_ref().unwrap().message, RETRY_MESSAGE);
    }

    #[test]
    fn exit_on_result_returns_immediately() {
        let mut f = Fixture::new();
        f.run_all_right("magic_e", "a_e", Step::Drill);
        f.orch.drain_effects();
        f.send(Intent::Exit);
        assert!(!f.orch.is_active());
        assert!(
            f.orch
                .drain_effects()
                .contains(&Effect::ReturnToTechnique("magic_e".into()))
        );
        assert_eq!(f.orch.next_wakeup(), None);
    }
}
