use super::activity::ActivityAction;
use crate::model::SubSkill;
use crate::session::lesson::{Lesson, LessonStep};
use crate::session::{Intent, LearnSession};
use crate::ui::helpers::{example_card, feedback_label};
use crate::ui::layout::two_button_row;
use egui::{Button, RichText, Ui};

pub fn ui_learn(ui: &mut Ui, session: &LearnSession, sub: Option<&SubSkill>) -> Option<ActivityAction> {
    let sub = sub?;
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.heading(format!("{} {}", sub.icon, sub.name));
        ui.add_space(8.0);
        match &session.lesson {
            Some(lesson) => {
                if let Some(a) = paced(ui, lesson) {
                    action = Some(a);
                }
            }
            None => {
                if let Some(a) = static_page(ui, sub) {
                    action = Some(a);
                }
            }
        }
        if let Some(feedback) = &session.feedback {
            feedback_label(ui, feedback.correct, &feedback.message);
        }
    });
    action
}

/// Página única: explicación, todos los ejemplos y "terminé".
fn static_page(ui: &mut Ui, sub: &SubSkill) -> Option<ActivityAction> {
    let mut action = None;
    ui.label(RichText::new(&sub.learn_info).size(18.0));
    ui.add_space(12.0);
    egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
        for example in &sub.examples {
            if example_card(ui, &example.before, &example.after) {
                action = Some(ActivityAction::Speak(example.after.clone()));
            }
            if let Some(comment) = &example.comment {
                ui.label(RichText::new(comment).italics());
            }
            ui.add_space(6.0);
        }
    });
    ui.add_space(12.0);
    if ui
        .add_sized([ui.available_width(), 40.0], Button::new("✅ فهمت!"))
        .clicked()
    {
        action = Some(ActivityAction::Send(Intent::FinishLearn));
    }
    action
}

fn paced(ui: &mut Ui, lesson: &Lesson) -> Option<ActivityAction> {
    let mut action = None;
    ui.label(format!("{} / {}", lesson.index() + 1, lesson.steps().len()));
    ui.add_space(8.0);

    match lesson.current() {
        LessonStep::Info(text) => {
            ui.label(RichText::new(text).size(20.0));
        }
        LessonStep::Example(example) => {
            if example_card(ui, &example.before, &example.after) {
                action = Some(ActivityAction::Speak(example.after.clone()));
            }
        }
        LessonStep::Comment(text) => {
            ui.label(RichText::new(format!("💡 {text}")).size(20.0));
        }
        LessonStep::Gallery(examples) => {
            ui.label("أمثلة أخرى:");
            for example in examples {
                if example_card(ui, &example.before, &example.after) {
                    action = Some(ActivityAction::Speak(example.after.clone()));
                }
            }
        }
        LessonStep::MicroCheck(check) => {
            ui.label(RichText::new(&check.question).size(20.0));
            ui.add_space(8.0);
            ui.horizontal_wrapped(|ui| {
                for option in &check.options {
                    if ui
                        .add(Button::new(RichText::new(option).size(22.0)).min_size([100.0, 44.0].into()))
                        .clicked()
                    {
                        action = Some(ActivityAction::Send(Intent::LessonCheck(option.clone())));
                    }
                }
            });
        }
        LessonStep::Finish => {
            ui.label(RichText::new("🎓 أنهيت الدرس!").size(24.0));
            if ui
                .add_sized([ui.available_width(), 40.0], Button::new("✅ إنهاء الدرس"))
                .clicked()
            {
                action = Some(ActivityAction::Send(Intent::FinishLearn));
            }
        }
    }

    ui.add_space(16.0);
    let width = ui.available_width();
    let (back, forward) = two_button_row(
        ui,
        width,
        ("⬅ السابق", lesson.can_go_back()),
        ("التالي ➡", lesson.can_go_forward()),
    );
    if back {
        action = Some(ActivityAction::Send(Intent::LessonBack));
    }
    if forward {
        action = Some(ActivityAction::Send(Intent::LessonForward));
    }
    action
}
