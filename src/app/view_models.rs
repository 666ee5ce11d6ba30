use super::*;
use crate::model::Technique;

impl PhonicsApp {
    pub fn technique_cards(&self) -> Vec<TechniqueCard> {
        let techniques = self.curriculum.techniques();
        techniques
            .iter()
            .enumerate()
            .map(|(idx, t)| TechniqueCard {
                idx,
                id: t.id.clone(),
                icon: t.icon.clone(),
                name: t.name.clone(),
                name_ar: t.name_ar.clone(),
                unlocked: self.progress.is_technique_unlocked(idx, techniques),
                mastered: self.progress.is_mastered(&t.id),
                completed_steps: self.completed_steps_in(t),
                total_steps: t.total_steps(),
            })
            .collect()
    }

    /// Pasos requeridos ya hechos; ignora sub-habilidades que ya no existen.
    fn completed_steps_in(&self, technique: &Technique) -> usize {
        technique
            .sub_skills
            .iter()
            .map(|sub| {
                sub.required_steps()
                    .iter()
                    .filter(|step| self.progress.is_step_done(&technique.id, &sub.id, **step))
                    .count()
            })
            .sum()
    }

    pub fn sub_skill_rows(&self, technique_id: &str) -> Option<Vec<SubSkillRow>> {
        let technique = self.curriculum.technique(technique_id)?;
        Some(
            technique
                .sub_skills
                .iter()
                .map(|sub| {
                    let steps: Vec<StepCell> = sub
                        .required_steps()
                        .iter()
                        .map(|&step| StepCell {
                            step,
                            done: self.progress.is_step_done(technique_id, &sub.id, step),
                            unlocked: self.is_step_unlocked(technique_id, &sub.id, step),
                        })
                        .collect();
                    SubSkillRow {
                        id: sub.id.clone(),
                        icon: sub.icon.clone(),
                        name: sub.name.clone(),
                        complete: steps.iter().all(|c| c.done),
                        steps,
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::test_app;
    use crate::model::Step;

    #[test]
    fn cards_follow_the_unlock_chain() {
        let (mut app, _) = test_app();
        let cards = app.technique_cards();
        assert_eq!(cards.len(), 3);
        assert!(cards[0].unlocked && !cards[1].unlocked && !cards[2].unlocked);
        assert_eq!(cards[0].total_steps, 6);
        assert_eq!(cards[1].total_steps, 5);

        app.progress.mark_step_complete("magic_e", "a_e", Step::Learn);
        app.progress.mark_technique_mastered("magic_e");
        let cards = app.technique_cards();
        assert_eq!(cards[0].completed_steps, 1);
        assert!(cards[0].mastered && cards[1].unlocked && !cards[2].unlocked);
    }

    #[test]
    fn rows_show_step_gates() {
        let (mut app, _) = test_app();
        let rows = app.sub_skill_rows("team_sounds").unwrap();
        assert_eq!(rows[1].steps.len(), 2);
        assert!(rows.iter().all(|r| r.steps.iter().all(|c| !c.unlocked)));

        app.progress.mark_step_complete("magic_e", "a_e", Step::Learn);
        let rows = app.sub_skill_rows("magic_e").unwrap();
        let a_e = &rows[0];
        assert!(a_e.steps[0].done && a_e.steps[1].unlocked && !a_e.steps[2].unlocked);
        assert!(!a_e.complete);
        assert!(app.sub_skill_rows("nope").is_none());
    }
}
