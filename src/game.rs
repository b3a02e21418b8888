/// The game aggregate: state machine, object roster, spell and ability,
/// souls, dialogue, and the per-frame simulation of everything on stage.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info};

use crate::behaviours::{self, Behaviour, BehaviourKind, Context, Effect, Target};
use crate::compute::{angle_between_points, casting_point, soul_payout};
use crate::config::Config;
use crate::engine::{update_tweens, Fx, Particles, Tween};
use crate::entities::{
    tags, Ability, GameObject, ObjectId, Point, Spell, SpriteTable, Stage, State,
};
use crate::rituals::{Ritual, RitualKind};

pub const PLAYER_X: f64 = 16.0;
/// Spell launch speed in pixels per millisecond.
pub const SPELL_SPEED: f64 = 0.25;
/// Pixels per millisecond squared.
pub const GRAVITY: f64 = 0.000_15;
pub const FREEZE_DURATION: f64 = 3000.0;
pub const BLEED_TICKS: u32 = 3;
pub const KNOCKBACK: f64 = 8.0;
/// Electrodynamics only jumps to foes within this distance.
pub const ARC_RANGE: f64 = 60.0;
const HOMING_TURN_RATE: f64 = 0.004;
/// Objects further than this outside the stage are gone for good.
const STAGE_MARGIN: f64 = 40.0;
const HURT_SHAKE: f64 = 200.0;

pub struct Game {
    pub state: State,
    pub stage: Stage,
    /// Render order is roster order.  The player is always `objects[0]`.
    pub objects: Vec<GameObject>,
    pub spell: Spell,
    pub ability: Ability,
    pub level: usize,
    pub souls: u32,
    pub shop_visit_count: usize,
    /// Front line is shown; lines are consumed from the front.
    pub dialogue: VecDeque<String>,
    pub particles: Particles,
    pub tweens: Vec<Tween>,
    pub sprites: SpriteTable,
    /// Screen shake requested this frame, in milliseconds.
    pending_shake: f64,
    next_id: u32,
}

impl Game {
    pub fn new(config: &Config, sprites: SpriteTable) -> Game {
        let mut player = GameObject::new(
            ObjectId(0),
            tags::PLAYER | tags::UNDEAD,
            sprites.get("skull"),
        );
        player.x = PLAYER_X;
        player.hp = config.player.hp;
        player.max_hp = config.player.hp;

        Game {
            state: State::Intro,
            stage: Stage {
                width: config.stage.width,
                ceiling: config.stage.ceiling,
            },
            objects: vec![player],
            spell: Spell::new(config.player.max_casts, config.player.cast_recharge_ms),
            ability: Ability::new(config.player.ability_cooldown_ms),
            level: 0,
            souls: 0,
            shop_visit_count: 0,
            dialogue: VecDeque::new(),
            particles: Particles::new(&sprites),
            tweens: Vec::new(),
            sprites,
            pending_shake: 0.0,
            next_id: 1,
        }
    }

    // ── Roster ───────────────────────────────────────────────────────────────

    pub fn player(&self) -> &GameObject {
        &self.objects[0]
    }

    pub fn player_mut(&mut self) -> &mut GameObject {
        &mut self.objects[0]
    }

    pub fn is_player(&self, object: &GameObject) -> bool {
        object.id == self.player().id
    }

    /// A fresh object with a unique id, not yet on stage.
    pub fn create(&mut self, tag: u8, sprite: &str) -> GameObject {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        GameObject::new(id, tag, self.sprites.get(sprite))
    }

    pub fn spawn(&mut self, object: GameObject) -> ObjectId {
        let id = object.id;
        self.objects.push(object);
        id
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Heal Norman to full, standing him back up if he had fallen.
    /// Returns whether he had fallen.
    pub fn revive_player(&mut self) -> bool {
        let sprite = self.sprites.get("norman_arms_down");
        let player = self.player_mut();
        let fallen = player.sprite.name == "norman_dead";
        player.heal(player.max_hp);
        if fallen {
            player.sprite = sprite;
        }
        fallen
    }

    // ── Rituals ──────────────────────────────────────────────────────────────

    pub fn add_ritual(&mut self, ritual: &Ritual) {
        let player = &mut self.objects[0];
        ritual.on_attach(player, &mut self.spell, &mut self.ability);
        let behaviour = ritual.create(player);
        player.add_behaviour(behaviour);
        info!(ritual = ritual.name, "ritual applied");
    }

    pub fn has_ritual(&self, kind: RitualKind) -> bool {
        self.player().get_behaviour(kind.behaviour_kind()).is_some()
    }

    /// Rituals on the player, in the order they were applied.
    pub fn ritual_kinds(&self) -> Vec<RitualKind> {
        self.player()
            .behaviours
            .iter()
            .filter_map(|b| match b {
                Behaviour::Ritual(r) => Some(r.kind),
                _ => None,
            })
            .collect()
    }

    /// Bonus fraction on soul payouts from every ritual that grants one.
    pub fn get_streak_multiplier(&self) -> f64 {
        self.player()
            .behaviours
            .iter()
            .map(|b| match b {
                Behaviour::Ritual(r) => r.multiplier(),
                _ => 0.0,
            })
            .sum()
    }

    // ── Spell & ability ──────────────────────────────────────────────────────

    pub fn get_casting_point(&self) -> Point {
        casting_point(self.player().center(), self.spell.target_angle)
    }

    /// Aim at a point in scene space.
    pub fn retarget(&mut self, target: Point) {
        self.spell.target_angle = angle_between_points(self.player().center(), target);
    }

    /// Launch one spell from `at` along `angle`, shaped by the player's rituals.
    pub fn spawn_spell(&mut self, at: Point, angle: f64, rng: &mut impl Rng) -> ObjectId {
        let rituals = self.ritual_kinds();
        let has = |kind| rituals.contains(&kind);

        let mut angle = angle;
        let mut damage = 1;
        if has(RitualKind::Drunkard) {
            angle += rng.gen_range(-0.3..=0.3);
            damage += 1;
        }
        if has(RitualKind::Giants) {
            damage += 1;
        }
        if has(RitualKind::Tearstone) && self.player().hp == 1 {
            damage *= 2;
        }

        let sprite = if has(RitualKind::Giants) { "giant_spell" } else { "spell" };
        let mut spell = self.create(tags::SPELL, sprite);
        spell.x = at.x - spell.sprite.width() / 2.0;
        spell.y = at.y - spell.sprite.height() / 2.0;
        spell.vx = angle.cos() * SPELL_SPEED;
        spell.vy = angle.sin() * SPELL_SPEED;
        spell.mass = if has(RitualKind::Weightless) { 0.0 } else { 1.0 };
        spell.hp = if has(RitualKind::Seer) { 2 } else { 1 };
        spell.max_hp = spell.hp;
        spell.damage = damage;
        if has(RitualKind::Bouncing) {
            spell.add_behaviour(Behaviour::Bouncing { remaining: 1 });
        }
        if has(RitualKind::Ceiling) {
            spell.add_behaviour(Behaviour::CeilingBounce);
        }
        if has(RitualKind::Hunter) {
            spell.add_behaviour(Behaviour::Homing { turn_rate: HOMING_TURN_RATE });
        }
        self.spawn(spell)
    }

    pub fn screenshake(&mut self, time: f64) {
        self.pending_shake = self.pending_shake.max(time);
    }

    /// Hand the shake requested since the last call to the renderer.
    pub fn take_screenshake(&mut self) -> Option<f64> {
        let time = std::mem::take(&mut self.pending_shake);
        (time > 0.0).then_some(time)
    }

    // ── State transitions ────────────────────────────────────────────────────

    /// INTRO → PLAYING.
    pub fn begin(&mut self) {
        if self.state != State::Intro {
            return;
        }
        self.state = State::Playing;
        self.player_mut().sprite = self.sprites.get("norman_arms_down");
        info!("game started");
    }

    /// PLAYING → WIN.
    pub fn win<S: AsRef<str>>(&mut self, outro: &[S]) {
        self.state = State::Win;
        self.dialogue = outro.iter().map(|line| line.as_ref().to_string()).collect();
        info!(souls = self.souls, "campaign complete");
    }

    /// Tidy the stage between levels.
    pub fn on_level_end(&mut self) {
        self.level += 1;
        self.spell.casts = self.spell.max_casts;
        self.spell.recharge_timer = 0.0;
        self.objects
            .retain(|o| !o.is(tags::SPELL) && !o.is(tags::CORPSE));
        info!(level = self.level, souls = self.souls, "level finished");
    }

    // ── Frame update ─────────────────────────────────────────────────────────

    /// Simulate one frame of play.
    pub fn update(&mut self, dt: f64, rng: &mut impl Rng) {
        self.ability.advance(dt);
        self.spell.recharge(dt);

        let targets: Vec<Target> = self
            .objects
            .iter()
            .map(|o| Target {
                id: o.id,
                tags: o.tags,
                center: o.center(),
                alive: o.is_alive(),
            })
            .collect();

        let mut effects = Vec::new();
        {
            let ctx = Context {
                dt,
                stage: &self.stage,
                targets: &targets,
            };
            for object in &mut self.objects {
                if !object.is_alive() {
                    continue;
                }
                object.vy -= GRAVITY * object.mass * dt;
                object.x += object.vx * dt;
                object.y += object.vy * dt;
                behaviours::update_object(object, &ctx, &mut effects);
            }
        }

        self.resolve_spell_hits(&mut effects);
        self.resolve_melee(&mut effects);
        self.expire_strays(&mut effects);
        self.apply_effects(effects, rng);
        self.resolve_deaths(rng);
    }

    /// Advance tweens and particles.  Runs in every state.
    pub fn update_effects(&mut self, dt: f64) {
        update_tweens(&mut self.tweens, &mut self.objects, dt);
        self.particles.update(dt);
    }

    fn resolve_spell_hits(&mut self, effects: &mut Vec<Effect>) {
        let rituals = self.ritual_kinds();
        let mut hits = Vec::new();

        for (si, spell) in self.objects.iter().enumerate() {
            if !spell.is(tags::SPELL) || !spell.is_alive() {
                continue;
            }
            let mut pierce = spell.hp;
            for (ti, target) in self.objects.iter().enumerate() {
                if pierce == 0 {
                    break;
                }
                if target.is(tags::LIVING)
                    && target.is_alive()
                    && !spell.struck.contains(&target.id)
                    && spell.overlaps(target)
                {
                    hits.push((si, ti));
                    pierce -= 1;
                }
            }
        }

        for (si, ti) in hits {
            let target_id = self.objects[ti].id;
            let spell = &mut self.objects[si];
            spell.hurt(1);
            spell.struck.push(target_id);
            let (damage, direction) = (spell.damage, spell.vx.signum());

            let target = &mut self.objects[ti];
            target.hurt(damage);
            effects.push(Effect::Burst { fx: Fx::Blood, at: target.center(), count: 6 });

            for ritual in &rituals {
                match ritual {
                    RitualKind::Chilly => {
                        target.add_behaviour(Behaviour::frozen(FREEZE_DURATION));
                        effects.push(Effect::Burst { fx: Fx::Frost, at: target.center(), count: 8 });
                    }
                    RitualKind::Bleed => target.add_behaviour(Behaviour::bleeding(BLEED_TICKS)),
                    RitualKind::Knockback => target.x += KNOCKBACK * direction,
                    _ => {}
                }
            }
            debug!(target = target_id.0, damage, "spell hit");
        }
    }

    fn resolve_melee(&mut self, effects: &mut Vec<Effect>) {
        let mut engaged = vec![false; self.objects.len()];
        let mut blows = Vec::new();

        for (ai, attacker) in self.objects.iter().enumerate() {
            if !attacker.is_alive() {
                continue;
            }
            let Some(Behaviour::Attack { damage, cooldown, timer }) =
                attacker.get_behaviour(BehaviourKind::Attack)
            else {
                continue;
            };
            let victim = self.objects.iter().position(|o| {
                o.is_alive() && attacker.is_hostile_to(o) && attacker.overlaps(o)
            });
            if let Some(vi) = victim {
                engaged[ai] = true;
                if timer >= cooldown {
                    blows.push((ai, vi, *damage));
                }
            }
        }

        for (object, engaged) in self.objects.iter_mut().zip(engaged) {
            object.engaged = engaged;
        }

        for (ai, vi, damage) in blows {
            if let Some(Behaviour::Attack { timer, .. }) =
                self.objects[ai].behaviours.get_mut(BehaviourKind::Attack)
            {
                *timer = 0.0;
            }
            let victim = &mut self.objects[vi];
            victim.hurt(damage);
            effects.push(Effect::Burst { fx: Fx::Blood, at: victim.center(), count: 4 });
            if vi == 0 {
                self.screenshake(HURT_SHAKE);
            }
        }
    }

    /// Spells that hit the floor, and anything that left the stage, expire.
    fn expire_strays(&mut self, effects: &mut Vec<Effect>) {
        let width = self.stage.width;
        for object in self.objects.iter_mut().skip(1) {
            if !object.is_alive() {
                continue;
            }
            let gone = object.x + object.sprite.width() < -STAGE_MARGIN
                || object.x > width + STAGE_MARGIN
                || object.y > self.stage.ceiling + STAGE_MARGIN * 4.0;
            if object.is(tags::SPELL) && object.y <= 0.0 && object.vy <= 0.0 {
                object.hp = 0;
                effects.push(Effect::Burst {
                    fx: Fx::Dust,
                    at: Point::new(object.center().x, 0.0),
                    count: 4,
                });
            } else if gone && !object.is(tags::CORPSE) {
                // Off-stage: removed without a payout.
                object.hp = 0;
                object.souls = 0;
                object.tags &= !tags::LIVING;
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>, rng: &mut impl Rng) {
        for effect in effects {
            match effect {
                Effect::Burst { fx, at, count } => self.particles.burst(fx, count, at, rng),
                Effect::Hop { target, height, duration } => {
                    self.tweens.retain(|t| t.target != target);
                    self.tweens.push(Tween::hop(target, height, duration));
                }
                Effect::RainSpell => {
                    let x = rng.gen_range(0.0..self.stage.width.max(1.0));
                    let at = Point::new(x, self.stage.ceiling - 8.0);
                    self.spawn_spell(at, -std::f64::consts::FRAC_PI_2, rng);
                }
            }
        }
    }

    fn resolve_deaths(&mut self, rng: &mut impl Rng) {
        let player_fell = self.player().hp == 0 && self.player().sprite.name != "norman_dead";
        if player_fell {
            let at = self.player().center();
            self.player_mut().sprite = self.sprites.get("norman_dead");
            self.particles.burst(Fx::Blood, 12, at, rng);
            self.screenshake(HURT_SHAKE * 2.0);
            info!("norman has fallen");
        }

        // Rewards can kill again (Electrodynamics), so settle until quiet.
        let rituals = self.ritual_kinds();
        loop {
            let slain: Vec<usize> = (1..self.objects.len())
                .filter(|&i| !self.objects[i].is_alive() && !self.objects[i].is(tags::CORPSE))
                .collect();
            if slain.is_empty() {
                return;
            }
            self.bury(&slain, &rituals, rng);
        }
    }

    fn bury(&mut self, slain: &[usize], rituals: &[RitualKind], rng: &mut impl Rng) {
        let mut corpses = Vec::new();
        for &i in slain {
            let (center, x, souls, living, undead) = {
                let o = &self.objects[i];
                (o.center(), o.x, o.souls, o.is(tags::LIVING), o.is(tags::UNDEAD))
            };
            if living {
                self.reward_kill(souls, rituals, center, rng);
                corpses.push(x);
            } else if undead {
                self.particles.burst(Fx::Dust, 8, center, rng);
            }
        }

        let dead: Vec<ObjectId> = slain.iter().map(|&i| self.objects[i].id).collect();
        self.objects.retain(|o| !dead.contains(&o.id));
        self.tweens.retain(|t| !dead.contains(&t.target));

        for x in corpses {
            let mut corpse = self.create(tags::CORPSE, "corpse");
            corpse.x = x;
            self.spawn(corpse);
        }
    }

    fn reward_kill(&mut self, souls: u32, rituals: &[RitualKind], at: Point, rng: &mut impl Rng) {
        let multiplier = self.get_streak_multiplier();
        let payout = soul_payout(souls, multiplier, rituals.contains(&RitualKind::Avarice));
        self.souls += payout;
        self.particles.burst(Fx::Souls, 6, at, rng);

        for kind in self.player().behaviours.kinds() {
            if let Some(Behaviour::Ritual(r)) = self.player_mut().behaviours.get_mut(kind) {
                r.on_kill();
            }
        }
        if rituals.contains(&RitualKind::Salvage) {
            self.spell.refund();
        }
        if rituals.contains(&RitualKind::Electrodynamics) {
            let nearest = self
                .objects
                .iter_mut()
                .filter(|o| o.is(tags::LIVING) && o.is_alive() && o.center().distance(at) <= ARC_RANGE)
                .min_by(|a, b| a.center().distance(at).total_cmp(&b.center().distance(at)));
            if let Some(foe) = nearest {
                foe.hurt(1);
                let center = foe.center();
                self.particles.burst(Fx::Spark, 8, center, rng);
            }
        }
        debug!(payout, multiplier, "kill");
    }
}
