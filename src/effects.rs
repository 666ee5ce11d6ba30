// src/effects.rs
//
// Celebraciones visuales: partículas y emojis flotantes pintados encima de todo.

use egui::{Align2, Color32, Context, FontId, Id, LayerId, Order, Pos2, Vec2};
use rand::Rng;

const LIFETIME_S: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Celebration {
    /// Acierto suelto.
    Quick,
    /// Paso completado.
    Step,
    /// Técnica dominada.
    Mastery,
}

#[derive(Debug, Clone)]
enum Sprite {
    Dot(Color32),
    Emoji(&'static str),
}

#[derive(Debug, Clone)]
struct Particle {
    sprite: Sprite,
    /// Desplazamiento inicial respecto al centro de la pantalla.
    origin: Vec2,
    velocity: Vec2,
    start: f64,
}

#[derive(Default)]
pub struct Effects {
    particles: Vec<Particle>,
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color32 {
    egui::ecolor::Hsva::new(rng.gen_range(0.0..1.0), 0.7, 0.9, 1.0).into()
}

impl Effects {
    pub fn celebrate<R: Rng + ?Sized>(&mut self, kind: Celebration, now: f64, rng: &mut R) {
        match kind {
            Celebration::Quick => {
                for i in 0..3 {
                    let emoji = if rng.gen_bool(0.5) { "⭐" } else { "✨" };
                    self.float(emoji, Vec2::new(rng.gen_range(-50.0..50.0), 0.0), now + i as f64 * 0.1);
                }
            }
            Celebration::Step => self.explode(8, now, rng),
            Celebration::Mastery => {
                self.explode(12, now, rng);
                const EMOJIS: [&str; 4] = ["🎉", "⭐", "✨", "🌟"];
                for i in 0..8 {
                    let emoji = EMOJIS[rng.gen_range(0..EMOJIS.len())];
                    let origin = Vec2::new(rng.gen_range(-75.0..75.0), rng.gen_range(-40.0..40.0));
                    self.float(emoji, origin, now + i as f64 * 0.12);
                }
            }
        }
    }

    fn explode<R: Rng + ?Sized>(&mut self, count: usize, now: f64, rng: &mut R) {
        for _ in 0..count {
            self.particles.push(Particle {
                sprite: Sprite::Dot(random_color(rng)),
                origin: Vec2::ZERO,
                velocity: Vec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)),
                start: now,
            });
        }
    }

    fn float(&mut self, emoji: &'static str, origin: Vec2, start: f64) {
        self.particles.push(Particle {
            sprite: Sprite::Emoji(emoji),
            origin,
            velocity: Vec2::new(0.0, -120.0),
            start,
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Quita lo que ya ha terminado.
    pub fn prune(&mut self, now: f64) {
        self.particles.retain(|p| now < p.start + LIFETIME_S);
    }

    pub fn paint(&mut self, ctx: &Context) {
        let now = ctx.input(|i| i.time);
        self.prune(now);
        if self.particles.is_empty() {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("celebrations")));
        let center = ctx.screen_rect().center();
        for p in &self.particles {
            let age = now - p.start;
            if age < 0.0 {
                continue;
            }
            let t = (age / LIFETIME_S) as f32;
            let pos: Pos2 = center + p.origin + p.velocity * t;
            let alpha = 1.0 - t;
            match &p.sprite {
                Sprite::Dot(color) => {
                    painter.circle_filled(pos, 6.0, color.gamma_multiply(alpha));
                }
                Sprite::Emoji(glyph) => {
                    painter.text(
                        pos,
                        Align2::CENTER_CENTER,
                        *glyph,
                        FontId::proportional(36.0),
                        Color32::WHITE.gamma_multiply(alpha),
                    );
                }
            }
        }
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn celebration_sizes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fx = Effects::default();
        fx.celebrate(Celebration::Quick, 0.0, &mut rng);
        assert_eq!(fx.len(), 3);
        fx.celebrate(Celebration::Mastery, 0.0, &mut rng);
        assert_eq!(fx.len(), 3 + 12 + 8);
        fx.clear();
        assert!(!fx.is_active());
    }

    #[test]
    fn particles_expire() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fx = Effects::default();
        fx.celebrate(Celebration::Step, 10.0, &mut rng);
        fx.prune(11.0);
        assert_eq!(fx.len(), 8);
        fx.prune(11.3);
        assert!(!fx.is_active());
    }

    #[test]
    fn paints_dots_and_emojis_on_the_foreground() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fx = Effects::default();
        fx.celebrate(Celebration::Mastery, 0.0, &mut rng);
        let ctx = Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| fx.paint(ctx));
        assert!(!output.shapes.is_empty());
        assert!(fx.is_active());
    }
}
