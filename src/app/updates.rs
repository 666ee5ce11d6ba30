use super::*;
use crate::session::SessionContext;
use std::time::Duration;

impl PhonicsApp {
    /// Dispara los temporizadores vencidos del orquestador.
    pub fn tick(&mut self) {
        let mut ctx = SessionContext {
            curriculum: &self.curriculum,
            progress: &mut self.progress,
            rng: &mut self.rng,
        };
        self.orchestrator.tick(&mut ctx);
    }

    /// Trabajo de cada frame antes de pintar.
    pub fn frame_update(&mut self, ctx: &egui::Context) {
        #[cfg(target_arch = "wasm32")]
        self.poll_curriculum();

        self.tick();
        self.apply_effects(ctx.input(|i| i.time));

        // Sin repintado programado los temporizadores no dispararían
        if let Some(due) = self.orchestrator.next_wakeup() {
            let wait = (due - self.progress.now_ms()).max(0) as u64;
            ctx.request_repaint_after(Duration::from_millis(wait));
        }
        if self.is_curriculum_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
