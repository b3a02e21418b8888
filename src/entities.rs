/// Game entity types: objects, sprites, spell and ability state.
///
/// Objects carry their behaviours but no simulation logic beyond small
/// stat helpers; the frame update lives in `game` and `behaviours`.

use std::collections::HashMap;

use serde::Deserialize;

use crate::behaviours::{Behaviour, BehaviourKind, Behaviours};
use crate::error::{GameError, GameResult};

const EMBEDDED_SPRITES: &str = include_str!("../assets/sprites.toml");

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// A named atlas descriptor.  `desc` is `[x, y, w, h]`; anything shorter
/// is considered malformed and never drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub desc: Vec<i32>,
}

impl Sprite {
    pub fn new(name: &str, desc: Vec<i32>) -> Sprite {
        Sprite { name: name.to_string(), desc }
    }

    pub fn is_drawable(&self) -> bool {
        self.desc.len() >= 4
    }

    pub fn width(&self) -> f64 {
        self.desc.get(2).copied().unwrap_or(0) as f64
    }

    pub fn height(&self) -> f64 {
        self.desc.get(3).copied().unwrap_or(0) as f64
    }
}

/// How a sprite looks on a character grid.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SpriteEntry {
    pub rect: Vec<i32>,
    #[serde(default = "default_glyph")]
    pub glyph: char,
    /// Cover every cell under the sprite instead of a single glyph.
    #[serde(default)]
    pub fill: bool,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_glyph() -> char {
    '?'
}

#[derive(Deserialize)]
struct SpriteFile {
    sprites: HashMap<String, SpriteEntry>,
}

#[derive(Clone, Debug, Default)]
pub struct SpriteTable {
    entries: HashMap<String, SpriteEntry>,
}

impl SpriteTable {
    pub fn from_toml(text: &str) -> GameResult<SpriteTable> {
        let file: SpriteFile = toml::from_str(text).map_err(GameError::Sprites)?;
        Ok(SpriteTable { entries: file.sprites })
    }

    /// The table shipped inside the binary.
    pub fn embedded() -> GameResult<SpriteTable> {
        SpriteTable::from_toml(EMBEDDED_SPRITES)
    }

    /// Look up a sprite by name.  Unknown names give an empty descriptor,
    /// which the renderer skips.
    pub fn get(&self, name: &str) -> Sprite {
        let desc = self
            .entries
            .get(name)
            .map(|entry| entry.rect.clone())
            .unwrap_or_default();
        Sprite::new(name, desc)
    }

    pub fn entry(&self, name: &str) -> Option<&SpriteEntry> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: &str, entry: SpriteEntry) {
        self.entries.insert(name.to_string(), entry);
    }
}

// ── Objects ───────────────────────────────────────────────────────────────────

/// Faction and role flags.
pub mod tags {
    pub const PLAYER: u8 = 1 << 0;
    pub const UNDEAD: u8 = 1 << 1;
    pub const LIVING: u8 = 1 << 2;
    pub const SPELL: u8 = 1 << 3;
    pub const CORPSE: u8 = 1 << 4;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

#[derive(Clone, Debug)]
pub struct GameObject {
    pub id: ObjectId,
    pub tags: u8,
    pub x: f64,
    pub y: f64,
    /// Extra vertical offset while hopping; drawn but ignored by collisions.
    pub hop: f64,
    pub vx: f64,
    pub vy: f64,
    /// Gravity multiplier.  Walkers use 0 and stay on the floor.
    pub mass: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub sprite: Sprite,
    pub behaviours: Behaviours,
    /// Milliseconds accumulated towards the next step.
    pub update_clock: f64,
    /// Milliseconds per step; 0 disables stepping.
    pub update_speed: f64,
    /// Souls paid out when this object is slain.
    pub souls: u32,
    /// Damage dealt on contact (spells).
    pub damage: i32,
    /// True while the object is in melee with a hostile this frame.
    pub engaged: bool,
    /// Targets this object already hit, so piercing spells hit each once.
    pub struck: Vec<ObjectId>,
}

impl GameObject {
    pub fn new(id: ObjectId, tags: u8, sprite: Sprite) -> GameObject {
        GameObject {
            id,
            tags,
            x: 0.0,
            y: 0.0,
            hop: 0.0,
            vx: 0.0,
            vy: 0.0,
            mass: 0.0,
            hp: 1,
            max_hp: 1,
            sprite,
            behaviours: Behaviours::default(),
            update_clock: 0.0,
            update_speed: 0.0,
            souls: 0,
            damage: 0,
            engaged: false,
            struck: Vec::new(),
        }
    }

    pub fn is(&self, tag: u8) -> bool {
        self.tags & tag != 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x + self.sprite.width() / 2.0,
            self.y + self.sprite.height() / 2.0,
        )
    }

    pub fn overlaps(&self, other: &GameObject) -> bool {
        self.x < other.x + other.sprite.width()
            && other.x < self.x + self.sprite.width()
            && self.y < other.y + other.sprite.height()
            && other.y < self.y + self.sprite.height()
    }

    /// LIVING and UNDEAD are at war; everything else is neutral.
    pub fn is_hostile_to(&self, other: &GameObject) -> bool {
        (self.is(tags::LIVING) && other.is(tags::UNDEAD))
            || (self.is(tags::UNDEAD) && other.is(tags::LIVING))
    }

    pub fn add_behaviour(&mut self, behaviour: Behaviour) {
        self.behaviours.add(behaviour);
    }

    pub fn get_behaviour(&self, kind: BehaviourKind) -> Option<&Behaviour> {
        self.behaviours.get(kind)
    }

    pub fn remove_behaviour(&mut self, kind: BehaviourKind) -> Option<Behaviour> {
        self.behaviours.remove(kind)
    }

    /// Hp never drops below zero.
    pub fn hurt(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Hp never rises above `max_hp`.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

// ── Spell & ability ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Spell {
    /// Radians, scene space (y up).
    pub target_angle: f64,
    pub casts: u32,
    pub max_casts: u32,
    /// Milliseconds to regain one cast.
    pub recharge_ms: f64,
    pub recharge_timer: f64,
    pub shots_per_cast: u32,
    /// Radians between neighbouring shots of one cast.
    pub shot_spread: f64,
}

impl Spell {
    pub fn new(max_casts: u32, recharge_ms: f64) -> Spell {
        Spell {
            target_angle: 0.0,
            casts: max_casts,
            max_casts,
            recharge_ms,
            recharge_timer: 0.0,
            shots_per_cast: 1,
            shot_spread: 0.15,
        }
    }

    /// Give back a cast, never above `max_casts`.
    pub fn refund(&mut self) {
        self.casts = (self.casts + 1).min(self.max_casts);
    }

    pub fn recharge(&mut self, dt: f64) {
        if self.casts >= self.max_casts {
            self.recharge_timer = 0.0;
            return;
        }
        self.recharge_timer += dt;
        if self.recharge_timer >= self.recharge_ms {
            self.recharge_timer = 0.0;
            self.refund();
        }
    }
}

/// The resurrection ability: an elapsed timer against a cooldown.
#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    pub cooldown: f64,
    pub timer: f64,
}

impl Ability {
    pub fn new(cooldown: f64) -> Ability {
        Ability { cooldown, timer: 0.0 }
    }

    /// Saturates at the cooldown so progress never passes 1.
    pub fn advance(&mut self, dt: f64) {
        self.timer = (self.timer + dt).min(self.cooldown);
    }

    pub fn progress(&self) -> f64 {
        if self.cooldown <= 0.0 {
            return 1.0;
        }
        (self.timer / self.cooldown).clamp(0.0, 1.0)
    }

    pub fn is_ready(&self) -> bool {
        self.timer >= self.cooldown
    }

    /// Spend the ability.  Returns false (and changes nothing) when not ready.
    pub fn trigger(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.timer = 0.0;
        true
    }
}

// ── Stage & state ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub width: f64,
    /// Scene height of the ceiling; the floor is y = 0.
    pub ceiling: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Intro,
    Playing,
    Shopping,
    Win,
}
