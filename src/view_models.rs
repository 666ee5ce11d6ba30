// src/view_models.rs

use crate::model::Step;

#[derive(Clone, Debug)]
pub struct TechniqueCard {
    pub idx: usize, // posición en el currículo
    pub id: String,
    pub icon: String,
    pub name: String,
    pub name_ar: String,
    pub unlocked: bool,
    pub mastered: bool,
    pub completed_steps: usize,
    pub total_steps: usize,
}

#[derive(Clone, Debug)]
pub struct StepCell {
    pub step: Step,
    pub done: bool,
    pub unlocked: bool,
}

#[derive(Clone, Debug)]
pub struct SubSkillRow {
    pub id: String,
    pub icon: String,
    pub name: String,
    pub complete: bool,
    pub steps: Vec<StepCell>,
}

impl TechniqueCard {
    pub fn label(&self) -> String {
        if self.mastered {
            format!("{} {} ✅", self.icon, self.name_ar)
        } else if self.unlocked {
            format!(
                "{} {} ({}/{})",
                self.icon, self.name_ar, self.completed_steps, self.total_steps
            )
        } else {
            format!("{} {} 🔒", self.icon, self.name_ar)
        }
    }

    /// Fracción completada, para la barra de progreso.
    pub fn fraction(&self) -> f32 {
        if self.total_steps == 0 {
            0.0
        } else {
            self.completed_steps as f32 / self.total_steps as f32
        }
    }
}

impl StepCell {
    pub fn label(&self) -> String {
        if self.done {
            format!("{} ✅", self.step.label())
        } else if self.unlocked {
            self.step.label().to_string()
        } else {
            format!("{} 🔒", self.step.label())
        }
    }
}

impl SubSkillRow {
    pub fn label(&self) -> String {
        let mark = if self.complete { " ✅" } else { "" };
        format!("{} {}{}", self.icon, self.name, mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(unlocked: bool, mastered: bool) -> TechniqueCard {
        TechniqueCard {
            idx: 1,
            id: "team_sounds".into(),
            icon: "👥".into(),
            name: "Team Sounds".into(),
            name_ar: "الأصوات الثنائية".into(),
            unlocked,
            mastered,
            completed_steps: 2,
            total_steps: 5,
        }
    }

    #[test]
    fn card_label_reflects_state() {
        assert!(card(false, false).label().ends_with("🔒"));
        assert!(card(true, false).label().ends_with("(2/5)"));
        assert!(card(true, true).label().ends_with("✅"));
        assert!((card(true, false).fraction() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn step_label_marks_locked_and_done() {
        let cell = StepCell {
            step: Step::Quiz,
            done: false,
            unlocked: false,
        };
        assert_eq!(cell.label(), "🏆 اختبار 🔒");
        let cell = StepCell { done: true, ..cell };
        assert_eq!(cell.label(), "🏆 اختبار ✅");
    }
}
