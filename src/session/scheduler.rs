// src/session/scheduler.rs
//
// Temporizadores de la sesión. Cada uno lleva la generación en la que se
// programó; cancelar sube la generación y los viejos ya no disparan.

use super::ControlId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Pasa a la siguiente pregunta.
    Advance,
    /// Vuelve a habilitar el control que falló.
    ReEnable(ControlId),
    /// Cierra el aviso de resultado y vuelve a la técnica.
    ReturnToTechnique,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: i64,
    generation: u64,
    action: TimerAction,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schedule(&mut self, now_ms: i64, delay_ms: i64, action: TimerAction) {
        self.pending.push(Scheduled {
            due_ms: now_ms + delay_ms,
            generation: self.generation,
            action,
        });
    }

    /// Invalida todo lo programado hasta ahora.
    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Quita las acciones pendientes que cumplan `matches`.
    pub fn cancel(&mut self, matches: impl Fn(TimerAction) -> bool) {
        self.pending.retain(|s| !matches(s.action));
    }

    #[cfg(test)]
    pub fn is_pending(&self, action: TimerAction) -> bool {
        self.pending
            .iter()
            .any(|s| s.action == action && s.generation == self.generation)
    }

    /// Saca las acciones vencidas de la generación actual, en orden de vencimiento.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<TimerAction> {
        let generation = self.generation;
        self.pending.retain(|s| s.generation == generation);

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by_key(|s| s.due_ms);
        due.into_iter().map(|s| s.action).collect()
    }

    /// Próximo vencimiento, para pedir un repintado a tiempo.
    pub fn next_due(&self) -> Option<i64> {
        self.pending.iter().map(|s| s.due_ms).min()
    }
}
