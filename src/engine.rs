/// Low-level services the game is built on: the drawing surface, particle
/// emitters and tweens.

use rand::Rng;

use crate::entities::{GameObject, ObjectId, Point, Sprite, SpriteTable};

// ── Drawing surface ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Plain,
    /// Dark offset copy underneath for legibility.
    Shadow,
}

/// A 2D drawing surface in canvas pixels, y pointing down.
///
/// `translate` accumulates until `restore` pops back to the matching `save`.
pub trait Canvas {
    fn size(&self) -> (i32, i32);
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn draw_sprite(&mut self, sprite: &Sprite, x: f64, y: f64);
    /// Stretch a frame sprite over a `w` x `h` box.
    fn draw_nine_slice(&mut self, sprite: &Sprite, x: f64, y: f64, w: f64, h: f64);
    /// One line of text; no wrapping.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle);
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fx {
    Dust,
    Blood,
    Souls,
    Frost,
    Spark,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Index into the emitter's variants.
    pub variant: usize,
    pub elapsed: f64,
    pub duration: f64,
}

impl Particle {
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }
}

#[derive(Clone, Debug)]
pub struct Emitter {
    pub fx: Fx,
    /// Each variant is a frame sequence played over a particle's lifetime.
    pub variants: Vec<Vec<Sprite>>,
    pub particles: Vec<Particle>,
    /// Pixels per millisecond.
    pub speed: (f64, f64),
    pub duration: (f64, f64),
    /// Launch angle range in radians.
    pub angle: (f64, f64),
    /// Pixels per millisecond squared, pulling down.
    pub gravity: f64,
}

impl Emitter {
    pub fn new(fx: Fx, sprites: &SpriteTable) -> Emitter {
        let frames = |names: &[&str]| -> Vec<Sprite> {
            names.iter().map(|name| sprites.get(name)).collect()
        };
        use std::f64::consts::PI;
        let (variants, speed, duration, angle, gravity) = match fx {
            Fx::Dust => (
                vec![frames(&["dust_1", "dust_2", "dust_3"]), frames(&["dust_2", "dust_3"])],
                (0.005, 0.02),
                (600.0, 1400.0),
                (0.0, PI),
                0.0,
            ),
            Fx::Blood => (
                vec![frames(&["blood_1", "blood_2"])],
                (0.03, 0.08),
                (300.0, 600.0),
                (PI * 0.25, PI * 0.75),
                0.0003,
            ),
            Fx::Souls => (
                vec![frames(&["soul_1", "soul_2", "soul_3"])],
                (0.01, 0.03),
                (800.0, 1400.0),
                (PI * 0.4, PI * 0.6),
                -0.00002,
            ),
            Fx::Frost => (
                vec![frames(&["frost_1", "frost_2"])],
                (0.01, 0.03),
                (400.0, 800.0),
                (0.0, PI * 2.0),
                0.0,
            ),
            Fx::Spark => (
                vec![frames(&["spark_1", "spark_2"])],
                (0.04, 0.1),
                (150.0, 300.0),
                (0.0, PI * 2.0),
                0.0,
            ),
        };
        Emitter {
            fx,
            variants,
            particles: Vec::new(),
            speed,
            duration,
            angle,
            gravity,
        }
    }

    pub fn burst(&mut self, count: usize, at: Point, rng: &mut impl Rng) {
        if self.variants.is_empty() {
            return;
        }
        for _ in 0..count {
            let angle = rng.gen_range(self.angle.0..=self.angle.1);
            let speed = rng.gen_range(self.speed.0..=self.speed.1);
            self.particles.push(Particle {
                x: at.x,
                y: at.y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                variant: rng.gen_range(0..self.variants.len()),
                elapsed: 0.0,
                duration: rng.gen_range(self.duration.0..=self.duration.1),
            });
        }
    }

    /// Move particles and retire the ones whose time is up.
    pub fn update(&mut self, dt: f64) {
        for p in &mut self.particles {
            p.elapsed += dt;
            p.vy -= self.gravity * dt;
            p.x += p.vx * dt;
            p.y = (p.y + p.vy * dt).max(0.0);
        }
        self.particles.retain(|p| p.elapsed < p.duration);
    }
}

/// One emitter per effect.
#[derive(Clone, Debug)]
pub struct Particles {
    pub emitters: Vec<Emitter>,
}

impl Particles {
    pub fn new(sprites: &SpriteTable) -> Particles {
        let emitters = [Fx::Dust, Fx::Blood, Fx::Souls, Fx::Frost, Fx::Spark]
            .into_iter()
            .map(|fx| Emitter::new(fx, sprites))
            .collect();
        Particles { emitters }
    }

    pub fn burst(&mut self, fx: Fx, count: usize, at: Point, rng: &mut impl Rng) {
        if let Some(emitter) = self.emitters.iter_mut().find(|e| e.fx == fx) {
            emitter.burst(count, at, rng);
        }
    }

    pub fn update(&mut self, dt: f64) {
        for emitter in &mut self.emitters {
            emitter.update(dt);
        }
    }

    pub fn len(&self) -> usize {
        self.emitters.iter().map(|e| e.particles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Tweens ────────────────────────────────────────────────────────────────────

/// Animates an object's hop offset from `from` to `to`.  A `yoyo` tween
/// goes there and back within `duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub target: ObjectId,
    pub from: f64,
    pub to: f64,
    pub duration: f64,
    pub elapsed: f64,
    pub yoyo: bool,
}

impl Tween {
    pub fn hop(target: ObjectId, height: f64, duration: f64) -> Tween {
        Tween {
            target,
            from: 0.0,
            to: height,
            duration,
            elapsed: 0.0,
            yoyo: true,
        }
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn value(&self) -> f64 {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        };
        let t = if self.yoyo { 1.0 - (2.0 * t - 1.0).abs() } else { t };
        self.from + (self.to - self.from) * t
    }
}

/// Advance every tween, write the values into their targets and drop the
/// finished ones.  Tweens whose target is gone are dropped too.
pub fn update_tweens(tweens: &mut Vec<Tween>, objects: &mut [GameObject], dt: f64) {
    tweens.retain_mut(|tween| {
        tween.elapsed += dt;
        let Some(object) = objects.iter_mut().find(|o| o.id == tween.target) else {
            return false;
        };
        object.hop = tween.value();
        !tween.is_done()
    });
}
