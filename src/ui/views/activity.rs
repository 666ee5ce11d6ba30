// src/ui/views/activity.rs
//
// Ventana modal de la actividad: lección, preguntas o resultado.

use crate::app::{PhonicsApp, WordBuilder};
use crate::session::questions::{Question, Response};
use crate::session::{ControlId, Intent, Outcome, Phase, QuestionSession};
use crate::ui::helpers::{choice_button, choice_grid, feedback_label};
use egui::{Button, Context, Id, Modal, ProgressBar, RichText, Ui};

const MODAL_WIDTH: f32 = 520.0;

/// Lo que ha pedido el usuario en este frame; se aplica al salir de la UI.
pub enum ActivityAction {
    Sort(bool, ControlId),
    Morph,
    Choice(String, ControlId),
    /// Como `Choice`, pronunciando antes la palabra elegida.
    SpokenChoice(String, ControlId),
    PickLetter(usize),
    UndoLetter,
    ClearLetters,
    Speak(String),
    Replay,
    Send(Intent),
}

pub fn ui_activity(app: &mut PhonicsApp, ctx: &Context) {
    app.ensure_word_builder();
    let phase = app.orchestrator.phase().clone();
    let enable_hints = app.progress.settings().enable_hints;
    let builder = app.word_builder.clone();

    let mut action: Option<ActivityAction> = None;
    let response = Modal::new(Id::new("activity_modal")).show(ctx, |ui| {
        ui.set_width(MODAL_WIDTH);
        ui.horizontal(|ui| {
            if ui.button("✖").on_hover_text("إغلاق").clicked() {
                action = Some(ActivityAction::Send(Intent::Exit));
            }
        });
        match &phase {
            Phase::NotStarted => {}
            Phase::Learn(session) => {
                if let Some(a) = super::lesson::ui_learn(ui, session, app.curriculum.sub_skill(
                    &session.activity.technique_id,
                    &session.activity.sub_skill_id,
                )) {
                    action = Some(a);
                }
            }
            Phase::Questions(session) => {
                if let Some(a) = ui_questions(ui, session, enable_hints, builder.as_ref()) {
                    action = Some(a);
                }
            }
            Phase::Completed(outcome) => {
                if ui_outcome(ui, outcome) {
                    action = Some(ActivityAction::Send(Intent::Exit));
                }
            }
        }
    });
    if response.should_close() && action.is_none() {
        action = Some(ActivityAction::Send(Intent::Exit));
    }

    if let Some(action) = action {
        apply(app, action);
    }
}

fn apply(app: &mut PhonicsApp, action: ActivityAction) {
    match action {
        ActivityAction::Sort(said_yes, control) => app.answer(Response::Sort(said_yes), control),
        ActivityAction::Morph => app.answer(Response::Morph, 0),
        ActivityAction::Choice(choice, control) => app.answer(Response::Choice(&choice), control),
        ActivityAction::SpokenChoice(choice, control) => {
            app.audio.speak(&choice);
            app.answer(Response::Choice(&choice), control);
        }
        ActivityAction::PickLetter(i) => {
            let full = app.word_builder.as_mut().map(|b| {
                b.pick(i);
                b.is_full()
            });
            if full == Some(true) {
                app.submit_word();
            }
        }
        ActivityAction::UndoLetter => {
            if let Some(b) = app.word_builder.as_mut() {
                b.undo();
            }
        }
        ActivityAction::ClearLetters => {
            if let Some(b) = app.word_builder.as_mut() {
                b.clear();
            }
        }
        ActivityAction::Speak(text) => app.audio.speak(&text),
        ActivityAction::Replay => app.replay_word(),
        ActivityAction::Send(intent) => app.send(intent),
    }
}

fn big_word(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(48.0).strong());
}

fn ui_questions(
    ui: &mut Ui,
    s: &QuestionSession,
    enable_hints: bool,
    builder: Option<&WordBuilder>,
) -> Option<ActivityAction> {
    let question = s.question()?;
    let mut action = None;
    let answered = s.awaiting_next();
    let width = ui.available_width();

    ui.vertical_centered(|ui| {
        ui.label(format!("السؤال {} من {}", s.shown + 1, s.total()));
        ui.add(ProgressBar::new(s.current as f32 / s.total().max(1) as f32).desired_width(width));
        ui.add_space(8.0);
        ui.label(RichText::new(&s.instruction).size(18.0));
        ui.add_space(12.0);

        match question {
            Question::Sort { word, .. } => {
                ui.horizontal(|ui| {
                    big_word(ui, word);
                    if ui.button("🔊").clicked() {
                        action = Some(ActivityAction::Replay);
                    }
                });
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    let w = (width - 8.0) / 2.0;
                    if choice_button(ui, "✅ نعم", w, !s.is_disabled(0)) {
                        action = Some(ActivityAction::Sort(true, 0));
                    }
                    if choice_button(ui, "❌ لا", w, !s.is_disabled(1)) {
                        action = Some(ActivityAction::Sort(false, 1));
                    }
                });
            }
            Question::Morph { base, target } => {
                let shown_target = if answered { target.clone() } else { format!("{base}_") };
                ui.horizontal(|ui| {
                    big_word(ui, base);
                    big_word(ui, "➡");
                    big_word(ui, &shown_target);
                });
                ui.add_space(12.0);
                if choice_button(ui, "✨ أضف E السحري", width, !s.is_disabled(0)) {
                    action = Some(ActivityAction::Morph);
                }
            }
            Question::FillInBlank(q) => {
                let shown = if answered {
                    q.partial.replacen("__", &q.correct, 1)
                } else {
                    q.partial.clone()
                };
                big_word(ui, &shown);
                ui.add_space(12.0);
                if let Some(i) = choice_grid(ui, &q.options, q.options.len().min(4), width, |i| !s.is_disabled(i)) {
                    action = Some(ActivityAction::Choice(q.options[i].clone(), i));
                }
            }
            Question::OddOneOut(q) => {
                if let Some(i) = choice_grid(ui, &q.options, 2, width, |i| !s.is_disabled(i)) {
                    action = Some(ActivityAction::SpokenChoice(q.options[i].clone(), i));
                }
            }
            Question::BuildTheWord(q) => {
                ui.label(RichText::new(&q.image).size(56.0));
                if ui.button("🔊").clicked() {
                    action = Some(ActivityAction::Replay);
                }
                if let Some(b) = builder {
                    let current = b.word();
                    let slots: String = (0..b.letters.len())
                        .map(|i| current.chars().nth(i).unwrap_or('_'))
                        .map(|c| format!("{c} "))
                        .collect();
                    big_word(ui, slots.trim_end());
                    ui.add_space(8.0);
                    ui.horizontal_wrapped(|ui| {
                        for (i, letter) in b.letters.iter().enumerate() {
                            let enabled = !answered && !b.is_picked(i) && !s.is_disabled(0);
                            let button = Button::new(RichText::new(letter.to_string()).size(26.0))
                                .min_size([44.0, 44.0].into());
                            if ui.add_enabled(enabled, button).clicked() {
                                action = Some(ActivityAction::PickLetter(i));
                            }
                        }
                    });
                    ui.horizontal(|ui| {
                        if ui.add_enabled(!answered, Button::new("↩ تراجع")).clicked() {
                            action = Some(ActivityAction::UndoLetter);
                        }
                        if ui.add_enabled(!answered, Button::new("🗑 مسح")).clicked() {
                            action = Some(ActivityAction::ClearLetters);
                        }
                    });
                }
            }
            Question::Quiz(q) => {
                if ui
                    .add(Button::new(RichText::new("🔊 استمع").size(28.0)).min_size([160.0, 56.0].into()))
                    .clicked()
                {
                    action = Some(ActivityAction::Speak(q.audio.clone()));
                }
                ui.add_space(12.0);
                if let Some(i) = choice_grid(ui, &q.options, 1, width * 0.6, |i| !s.is_disabled(i)) {
                    action = Some(ActivityAction::Choice(q.options[i].clone(), i));
                }
            }
        }

        ui.add_space(12.0);
        if let Some(feedback) = &s.feedback {
            feedback_label(ui, feedback.correct, &feedback.message);
        }
        if let Some(hint) = s.hint(enable_hints) {
            ui.label(RichText::new(hint).italics());
        }
        if answered && ui.add_sized([width, 40.0], Button::new("التالي ➡")).clicked() {
            action = Some(ActivityAction::Send(Intent::Next));
        }
    });

    action
}

/// Devuelve `true` al pulsar "متابعة".
fn ui_outcome(ui: &mut Ui, outcome: &Outcome) -> bool {
    let mut done = false;
    ui.vertical_centered(|ui| {
        let icon = match (outcome.passed, outcome.mastered) {
            (_, true) => "🏆",
            (true, false) => "🎉",
            (false, _) => "💪",
        };
        ui.label(RichText::new(icon).size(64.0));
        ui.heading(&outcome.message);
        ui.label(RichText::new(&outcome.reward).size(22.0));
        ui.add_space(16.0);
        done = ui
            .add_sized([ui.available_width(), 40.0], Button::new("متابعة"))
            .clicked();
    });
    done
}
