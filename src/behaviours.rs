/// Behaviours: units of per-frame logic attached to a game object.
///
/// An object holds at most one behaviour of each kind.  Attaching a second
/// behaviour of a kind already present replaces the old one, and the new one
/// moves to the end of the attachment order.  Behaviours run in attachment
/// order, which is also the order their status icons are drawn in.

use std::collections::HashMap;

use crate::engine::Fx;
use crate::entities::{tags, GameObject, ObjectId, Point, Stage};
use crate::rituals::{RitualBehaviour, RitualKind};

/// Height of one gait hop, in scene pixels.
const HOP_HEIGHT: f64 = 2.0;
const HOP_DURATION: f64 = 80.0;
const BLEED_INTERVAL: f64 = 1000.0;
const BOUNCE_DAMPING: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviourKind {
    March,
    Frozen,
    Bleeding,
    Attack,
    Homing,
    Bouncing,
    CeilingBounce,
    Ritual(RitualKind),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Behaviour {
    /// Moves `step` pixels and hops on every tick of the owner's clock.
    March { step: f64 },
    /// Stops the owner's gait until `remaining` runs out.
    Frozen { remaining: f64 },
    /// One damage per second for `ticks` seconds.
    Bleeding { ticks: u32, timer: f64 },
    /// Melee; the game resolves hits once `timer` reaches `cooldown`.
    Attack { damage: i32, cooldown: f64, timer: f64 },
    /// Steers the owner's velocity towards the nearest living object.
    Homing { turn_rate: f64 },
    Bouncing { remaining: u32 },
    CeilingBounce,
    Ritual(RitualBehaviour),
}

/// Something a behaviour wants done outside its owner.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Burst { fx: Fx, at: Point, count: usize },
    Hop { target: ObjectId, height: f64, duration: f64 },
    /// Drop a spell from the ceiling.
    RainSpell,
}

/// Read-only view of the world handed to behaviours each frame.
pub struct Context<'a> {
    pub dt: f64,
    pub stage: &'a Stage,
    pub targets: &'a [Target],
}

/// Snapshot of an object taken before the frame's updates run.
#[derive(Clone, Debug)]
pub struct Target {
    pub id: ObjectId,
    pub tags: u8,
    pub center: Point,
    pub alive: bool,
}

impl Behaviour {
    pub fn kind(&self) -> BehaviourKind {
        match self {
            Behaviour::March { .. } => BehaviourKind::March,
            Behaviour::Frozen { .. } => BehaviourKind::Frozen,
            Behaviour::Bleeding { .. } => BehaviourKind::Bleeding,
            Behaviour::Attack { .. } => BehaviourKind::Attack,
            Behaviour::Homing { .. } => BehaviourKind::Homing,
            Behaviour::Bouncing { .. } => BehaviourKind::Bouncing,
            Behaviour::CeilingBounce => BehaviourKind::CeilingBounce,
            Behaviour::Ritual(ritual) => BehaviourKind::Ritual(ritual.kind),
        }
    }

    /// Icon drawn in the strip above the owner, if any.
    pub fn status_sprite(&self) -> Option<&'static str> {
        match self {
            Behaviour::Frozen { .. } => Some("status_frozen"),
            Behaviour::Bleeding { .. } => Some("status_bleeding"),
            _ => None,
        }
    }

    pub fn frozen(duration: f64) -> Behaviour {
        Behaviour::Frozen { remaining: duration }
    }

    pub fn bleeding(ticks: u32) -> Behaviour {
        Behaviour::Bleeding { ticks, timer: 0.0 }
    }

    pub fn attack(damage: i32, cooldown: f64) -> Behaviour {
        Behaviour::Attack { damage, cooldown, timer: 0.0 }
    }

    /// Per-frame update.  Returns false once the behaviour has run its course.
    pub fn update(
        &mut self,
        owner: &mut GameObject,
        ctx: &Context,
        effects: &mut Vec<Effect>,
    ) -> bool {
        match self {
            Behaviour::March { .. } => true,
            Behaviour::Frozen { remaining } => {
                *remaining -= ctx.dt;
                *remaining > 0.0
            }
            Behaviour::Bleeding { ticks, timer } => {
                *timer += ctx.dt;
                while *timer >= BLEED_INTERVAL && *ticks > 0 {
                    *timer -= BLEED_INTERVAL;
                    *ticks -= 1;
                    owner.hurt(1);
                    effects.push(Effect::Burst {
                        fx: Fx::Blood,
                        at: owner.center(),
                        count: 4,
                    });
                }
                *ticks > 0
            }
            Behaviour::Attack { cooldown, timer, .. } => {
                *timer = (*timer + ctx.dt).min(*cooldown);
                true
            }
            Behaviour::Homing { turn_rate } => {
                steer_towards_nearest(owner, ctx, *turn_rate);
                true
            }
            Behaviour::Bouncing { remaining } => {
                if *remaining > 0 && owner.y <= 0.0 && owner.vy < 0.0 {
                    *remaining -= 1;
                    owner.y = 0.0;
                    owner.vy = -owner.vy * BOUNCE_DAMPING;
                    effects.push(Effect::Burst {
                        fx: Fx::Dust,
                        at: Point::new(owner.center().x, 0.0),
                        count: 6,
                    });
                }
                true
            }
            Behaviour::CeilingBounce => {
                let top = ctx.stage.ceiling - owner.sprite.height();
                if owner.y >= top && owner.vy > 0.0 {
                    owner.y = top;
                    owner.vy = -owner.vy;
                }
                true
            }
            Behaviour::Ritual(ritual) => {
                ritual.update(ctx.dt, effects);
                true
            }
        }
    }

    /// Runs when the owner's update clock ticks.
    pub fn on_step(&mut self, owner: &mut GameObject, frozen: bool, effects: &mut Vec<Effect>) {
        if let Behaviour::March { step } = self {
            if frozen {
                return;
            }
            if !owner.engaged {
                owner.x += *step;
            }
            effects.push(Effect::Hop {
                target: owner.id,
                height: HOP_HEIGHT,
                duration: HOP_DURATION,
            });
        }
    }
}

fn steer_towards_nearest(owner: &mut GameObject, ctx: &Context, turn_rate: f64) {
    let here = owner.center();
    let nearest = ctx
        .targets
        .iter()
        .filter(|t| t.alive && t.tags & tags::LIVING != 0)
        .min_by(|a, b| {
            here.distance(a.center)
                .total_cmp(&here.distance(b.center))
        });
    let Some(target) = nearest else {
        return;
    };

    let speed = owner.vx.hypot(owner.vy);
    let heading = owner.vy.atan2(owner.vx);
    let wanted = (target.center.y - here.y).atan2(target.center.x - here.x);
    let mut delta = wanted - heading;
    while delta > std::f64::consts::PI {
        delta -= std::f64::consts::TAU;
    }
    while delta < -std::f64::consts::PI {
        delta += std::f64::consts::TAU;
    }
    let max_turn = turn_rate * ctx.dt;
    let heading = heading + delta.clamp(-max_turn, max_turn);
    owner.vx = heading.cos() * speed;
    owner.vy = heading.sin() * speed;
}

// ── Per-object storage ────────────────────────────────────────────────────────

/// Behaviours keyed by kind, remembering attachment order.
#[derive(Clone, Debug, Default)]
pub struct Behaviours {
    slots: HashMap<BehaviourKind, Behaviour>,
    order: Vec<BehaviourKind>,
}

impl Behaviours {
    /// Attach, replacing any behaviour of the same kind.
    pub fn add(&mut self, behaviour: Behaviour) {
        let kind = behaviour.kind();
        if self.slots.insert(kind, behaviour).is_some() {
            self.order.retain(|k| *k != kind);
        }
        self.order.push(kind);
    }

    pub fn get(&self, kind: BehaviourKind) -> Option<&Behaviour> {
        self.slots.get(&kind)
    }

    pub fn get_mut(&mut self, kind: BehaviourKind) -> Option<&mut Behaviour> {
        self.slots.get_mut(&kind)
    }

    pub fn remove(&mut self, kind: BehaviourKind) -> Option<Behaviour> {
        let removed = self.slots.remove(&kind);
        if removed.is_some() {
            self.order.retain(|k| *k != kind);
        }
        removed
    }

    pub fn contains(&self, kind: BehaviourKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Behaviours in attachment order.
    pub fn iter(&self) -> impl Iterator<Item = &Behaviour> {
        self.order.iter().filter_map(|kind| self.slots.get(kind))
    }

    pub fn kinds(&self) -> Vec<BehaviourKind> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Run one frame of an object's behaviours, then its step clock.
///
/// Behaviours are detached while they run so each can borrow the owner
/// mutably.  Anything attached to the owner during the update is merged
/// back afterwards.
pub fn update_object(owner: &mut GameObject, ctx: &Context, effects: &mut Vec<Effect>) {
    let mut behaviours = std::mem::take(&mut owner.behaviours);
    let mut expired = Vec::new();

    for kind in behaviours.kinds() {
        if let Some(behaviour) = behaviours.get_mut(kind) {
            if !behaviour.update(owner, ctx, effects) {
                expired.push(kind);
            }
        }
    }

    if owner.update_speed > 0.0 {
        owner.update_clock -= ctx.dt;
        if owner.update_clock <= 0.0 {
            owner.update_clock += owner.update_speed;
            let frozen = behaviours.contains(BehaviourKind::Frozen);
            for kind in behaviours.kinds() {
                if let Some(behaviour) = behaviours.get_mut(kind) {
                    behaviour.on_step(owner, frozen, effects);
                }
            }
        }
    }

    for kind in expired {
        behaviours.remove(kind);
    }

    let attached = std::mem::replace(&mut owner.behaviours, behaviours);
    for kind in attached.kinds() {
        if let Some(behaviour) = attached.get(kind) {
            owner.behaviours.add(behaviour.clone());
        }
    }
}
