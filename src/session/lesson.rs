// src/session/lesson.rs
//
// Micro-lección paso a paso del paso `learn`.

use crate::model::{Example, LearnCheck, SubSkill};

/// Ejemplos que se presentan uno a uno; el resto va a la galería.
const FEATURED_EXAMPLES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum LessonStep {
    Info(String),
    Example(Example),
    Comment(String),
    Gallery(Vec<Example>),
    MicroCheck(LearnCheck),
    Finish,
}

fn generated_comment(example: &Example) -> String {
    if example.before == example.after {
        format!("استمع جيداً إلى الكلمة: {}", example.after)
    } else {
        format!(
            "لاحظ كيف يتغير الصوت من {} إلى {}",
            example.before, example.after
        )
    }
}

#[derive(Debug, Clone)]
pub struct Lesson {
    steps: Vec<LessonStep>,
    index: usize,
    check_passed: bool,
}

impl Lesson {
    pub fn build(sub: &SubSkill) -> Self {
        let mut steps = vec![LessonStep::Info(sub.learn_info.clone())];

        for example in sub.examples.iter().take(FEATURED_EXAMPLES) {
            steps.push(LessonStep::Example(example.clone()));
            let comment = example
                .comment
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| generated_comment(example));
            steps.push(LessonStep::Comment(comment));
        }

        let rest: Vec<Example> = sub.examples.iter().skip(FEATURED_EXAMPLES).cloned().collect();
        if !rest.is_empty() {
            steps.push(LessonStep::Gallery(rest));
        }

        if let Some(check) = &sub.learn_check {
            steps.push(LessonStep::MicroCheck(check.clone()));
        }
        steps.push(LessonStep::Finish);

        Self {
            steps,
            index: 0,
            check_passed: false,
        }
    }

    pub fn steps(&self) -> &[LessonStep] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &LessonStep {
        // `build` siempre deja al menos Info y Finish
        &self.steps[self.index.min(self.steps.len() - 1)]
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.current(), LessonStep::Finish)
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        if self.index + 1 >= self.steps.len() {
            return false;
        }
        !matches!(self.current(), LessonStep::MicroCheck(_)) || self.check_passed
    }

    pub fn forward(&mut self) -> bool {
        if self.can_go_forward() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.can_go_back() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// `None` si el paso actual no es la comprobación.
    pub fn check(&mut self, choice: &str) -> Option<bool> {
        let LessonStep::MicroCheck(check) = self.current() else {
            return None;
        };
        let correct = check.answer == choice;
        if correct {
            self.check_passed = true;
        }
        Some(correct)
    }
}
