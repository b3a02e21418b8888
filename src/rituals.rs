/// Rituals: passive modifiers Norman buys in the shop (or is granted).
///
/// A ritual is a catalog entry plus a factory.  Applying it attaches a
/// `Behaviour::Ritual` to the player; the game consults the player's ritual
/// behaviours whenever it casts, hits, kills or resurrects, so any number
/// of distinct rituals stack.

use crate::behaviours::{Behaviour, BehaviourKind, Effect};
use crate::entities::{Ability, GameObject, Spell};

/// Kills closer together than this keep a streak alive.
pub const STREAK_WINDOW: f64 = 1500.0;
pub const STREAK_CAP: u32 = 10;
pub const RAIN_INTERVAL: f64 = 3000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RitualKind {
    Streak,
    Bouncing,
    Ceiling,
    Rain,
    Doubleshot,
    Hunter,
    Weightless,
    Knockback,
    Drunkard,
    Seer,
    Tearstone,
    Impatience,
    Bleed,
    Salvage,
    Studious,
    Electrodynamics,
    Chilly,
    Giants,
    Avarice,
    Hardened,
    Allegiance,
}

/// Shop order.  Streak is granted at the start of every run instead.
pub const SHOP_ORDER: [RitualKind; 20] = [
    RitualKind::Bouncing,
    RitualKind::Ceiling,
    RitualKind::Rain,
    RitualKind::Doubleshot,
    RitualKind::Hunter,
    RitualKind::Weightless,
    RitualKind::Knockback,
    RitualKind::Drunkard,
    RitualKind::Seer,
    RitualKind::Tearstone,
    RitualKind::Impatience,
    RitualKind::Bleed,
    RitualKind::Salvage,
    RitualKind::Studious,
    RitualKind::Electrodynamics,
    RitualKind::Chilly,
    RitualKind::Giants,
    RitualKind::Avarice,
    RitualKind::Hardened,
    RitualKind::Allegiance,
];

#[derive(Clone, Debug, PartialEq)]
pub struct Ritual {
    pub kind: RitualKind,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u32,
}

impl Ritual {
    /// Build the behaviour this ritual attaches to `target`.
    pub fn create(&self, _target: &GameObject) -> Behaviour {
        Behaviour::Ritual(RitualBehaviour::new(self.kind))
    }

    /// One-off stat changes made when the ritual is first applied.
    pub fn on_attach(&self, player: &mut GameObject, spell: &mut Spell, ability: &mut Ability) {
        match self.kind {
            RitualKind::Doubleshot => spell.shots_per_cast += 1,
            RitualKind::Studious => {
                spell.max_casts += 1;
                spell.refund();
            }
            RitualKind::Impatience => {
                ability.cooldown *= 0.7;
                ability.timer = ability.timer.min(ability.cooldown);
            }
            RitualKind::Hardened => {
                player.max_hp += 2;
                // A fallen player only comes back through resurrect.
                if player.is_alive() {
                    player.heal(2);
                }
            }
            _ => {}
        }
    }
}

impl RitualKind {
    pub fn ritual(self) -> Ritual {
        let (name, description, cost) = match self {
            RitualKind::Streak => ("Streak", "Quick kills earn bonus souls.", 0),
            RitualKind::Bouncing => ("Bouncing", "Spells bounce off the floor once.", 20),
            RitualKind::Ceiling => ("Ceiling", "Spells bounce off the ceiling.", 20),
            RitualKind::Rain => ("Rain", "A spell falls from the sky every 3s.", 40),
            RitualKind::Doubleshot => ("Doubleshot", "Cast an extra spell each time.", 60),
            RitualKind::Hunter => ("Hunter", "Spells seek out the living.", 50),
            RitualKind::Weightless => ("Weightless", "Spells ignore gravity.", 30),
            RitualKind::Knockback => ("Knockback", "Spells push enemies back.", 25),
            RitualKind::Drunkard => ("Drunkard", "Spells wobble but hit harder.", 30),
            RitualKind::Seer => ("Seer", "Spells pierce one more enemy.", 45),
            RitualKind::Tearstone => ("Tearstone", "Double damage at 1 hp.", 35),
            RitualKind::Impatience => ("Impatience", "Resurrect recharges 30% faster.", 40),
            RitualKind::Bleed => ("Bleed", "Spells make enemies bleed.", 35),
            RitualKind::Salvage => ("Salvage", "Kills give back a cast.", 50),
            RitualKind::Studious => ("Studious", "+1 maximum cast.", 60),
            RitualKind::Electrodynamics => ("Electrodynamics", "Kills arc to a nearby enemy.", 70),
            RitualKind::Chilly => ("Chilly", "Spells freeze enemies for 3s.", 45),
            RitualKind::Giants => ("Giants", "Spells are huge and hit harder.", 55),
            RitualKind::Avarice => ("Avarice", "Enemies drop double souls.", 50),
            RitualKind::Hardened => ("Hardened", "+2 maximum health.", 40),
            RitualKind::Allegiance => ("Allegiance", "Raised skeletons are tougher.", 45),
        };
        Ritual { kind: self, name, description, cost }
    }

    pub fn behaviour_kind(self) -> BehaviourKind {
        BehaviourKind::Ritual(self)
    }
}

/// The shop's catalog, in declared order.
pub fn catalog() -> Vec<Ritual> {
    SHOP_ORDER.iter().map(|kind| kind.ritual()).collect()
}

/// State a ritual keeps while attached.  Most rituals need none; Streak
/// counts kills and Rain counts down to its next drop.
#[derive(Clone, Debug, PartialEq)]
pub struct RitualBehaviour {
    pub kind: RitualKind,
    pub timer: f64,
    pub count: u32,
}

impl RitualBehaviour {
    pub fn new(kind: RitualKind) -> RitualBehaviour {
        RitualBehaviour { kind, timer: 0.0, count: 0 }
    }

    pub fn update(&mut self, dt: f64, effects: &mut Vec<Effect>) {
        match self.kind {
            RitualKind::Streak => {
                self.timer += dt;
                if self.timer > STREAK_WINDOW {
                    self.count = 0;
                }
            }
            RitualKind::Rain => {
                self.timer += dt;
                if self.timer >= RAIN_INTERVAL {
                    self.timer -= RAIN_INTERVAL;
                    effects.push(Effect::RainSpell);
                }
            }
            _ => {}
        }
    }

    pub fn on_kill(&mut self) {
        if self.kind == RitualKind::Streak {
            self.count += 1;
            self.timer = 0.0;
        }
    }

    /// Bonus fraction applied to soul payouts.
    pub fn multiplier(&self) -> f64 {
        match self.kind {
            RitualKind::Streak => self.count.min(STREAK_CAP) as f64 * 0.1,
            _ => 0.0,
        }
    }
}
