/// Player actions: casting spells and the resurrection ability.

use rand::Rng;
use tracing::{debug, info};

use crate::behaviours::Behaviour;
use crate::compute::shot_angles;
use crate::engine::Fx;
use crate::entities::{tags, State};
use crate::game::Game;
use crate::rituals::RitualKind;

const SKELETON_STEP: f64 = 3.0;
const SKELETON_SPEED: f64 = 300.0;
const RESURRECT_SHAKE: f64 = 150.0;

/// Fire the spell at the current target angle.  Returns whether anything
/// was cast: Norman must be playing, alive, and have a cast in hand.
pub fn cast(game: &mut Game, rng: &mut impl Rng) -> bool {
    if game.state != State::Playing || !game.player().is_alive() || game.spell.casts == 0 {
        return false;
    }
    game.spell.casts -= 1;

    let at = game.get_casting_point();
    let angles = shot_angles(
        game.spell.target_angle,
        game.spell.shots_per_cast,
        game.spell.shot_spread,
    );
    for angle in angles {
        game.spawn_spell(at, angle, rng);
    }
    game.particles.burst(Fx::Spark, 4, at, rng);
    debug!(casts = game.spell.casts, angle = game.spell.target_angle, "cast");
    true
}

/// Restore Norman and raise every corpse on stage as a skeleton ally.
/// Only works while playing and once the cooldown has run out.
pub fn resurrect(game: &mut Game, rng: &mut impl Rng) -> bool {
    if game.state != State::Playing || !game.ability.trigger() {
        return false;
    }

    let was_dead = game.revive_player();

    let bonus = if game.has_ritual(RitualKind::Allegiance) { 2 } else { 0 };
    let skeleton_sprite = game.sprites.get("skeleton");
    let mut raised = 0;
    for index in 0..game.objects.len() {
        let object = &mut game.objects[index];
        if !object.is(tags::CORPSE) {
            continue;
        }
        object.tags = tags::UNDEAD;
        object.sprite = skeleton_sprite.clone();
        object.hp = 1 + bonus;
        object.max_hp = 1 + bonus;
        object.update_speed = SKELETON_SPEED;
        object.update_clock = SKELETON_SPEED;
        object.add_behaviour(Behaviour::March { step: SKELETON_STEP });
        object.add_behaviour(Behaviour::attack(1, 800.0));
        let at = object.center();
        game.particles.burst(Fx::Souls, 6, at, rng);
        raised += 1;
    }

    let at = game.player().center();
    game.particles.burst(Fx::Souls, 10, at, rng);
    game.screenshake(RESURRECT_SHAKE);
    info!(raised, revived = was_dead, "resurrect");
    true
}
