mod common;

use amor_fati::behaviours::{Behaviour, BehaviourKind, Behaviours};
use amor_fati::entities::*;

use common::sprites;

fn object(id: u32, tag: u8, desc: Vec<i32>) -> GameObject {
    GameObject::new(ObjectId(id), tag, Sprite::new("test", desc))
}

// ── Sprites ───────────────────────────────────────────────────────────────────

#[test]
fn short_descriptor_is_not_drawable() {
    assert!(!Sprite::new("bad", vec![0, 0, 8]).is_drawable());
    assert!(!Sprite::default().is_drawable());
    let good = Sprite::new("good", vec![0, 0, 8, 12]);
    assert!(good.is_drawable());
    assert_eq!(good.width(), 8.0);
    assert_eq!(good.height(), 12.0);
}

#[test]
fn unknown_sprite_name_is_empty() {
    let sprite = sprites().get("no_such_sprite");
    assert_eq!(sprite.name, "no_such_sprite");
    assert!(sprite.desc.is_empty());
    assert!(!sprite.is_drawable());
}

#[test]
fn sprite_table_parses_defaults() {
    let table = SpriteTable::from_toml(
        r#"
        [sprites]
        bone = { rect = [1, 2, 3, 4] }
        "#,
    )
    .unwrap();
    let entry = table.entry("bone").unwrap();
    assert_eq!(entry.rect, vec![1, 2, 3, 4]);
    assert_eq!(entry.glyph, '?');
    assert!(!entry.fill);
    assert_eq!(entry.color, None);
}

#[test]
fn sprite_table_rejects_garbage() {
    assert!(SpriteTable::from_toml("sprites = 3").is_err());
}

#[test]
fn embedded_table_has_every_sprite_the_game_draws() {
    let table = sprites();
    let names = [
        "skull", "norman_arms_down", "norman_dead", "norman_icon", "villager", "champion",
        "inquisitor", "skeleton", "corpse", "spell", "giant_spell", "reticle", "health_orb",
        "health_orb_empty", "cast_orb", "cast_orb_empty", "pink_frame", "status_frozen",
        "status_bleeding", "ice", "wall", "door", "floor", "ceiling", "cloud_1", "cloud_2",
        "cloud_3", "dust_1", "dust_2", "dust_3", "blood_1", "blood_2", "soul_1", "soul_2",
        "soul_3", "frost_1", "frost_2", "spark_1", "spark_2",
    ];
    for name in names {
        assert!(table.get(name).is_drawable(), "{} missing", name);
    }
}

// ── Objects ───────────────────────────────────────────────────────────────────

#[test]
fn hurt_floors_at_zero_and_heal_caps() {
    let mut o = object(1, tags::LIVING, vec![0, 0, 8, 8]);
    o.max_hp = 3;
    o.hp = 3;
    o.hurt(5);
    assert_eq!(o.hp, 0);
    assert!(!o.is_alive());
    o.heal(10);
    assert_eq!(o.hp, 3);
}

#[test]
fn overlap_is_strict() {
    let mut a = object(1, tags::LIVING, vec![0, 0, 8, 8]);
    let mut b = object(2, tags::UNDEAD, vec![0, 0, 8, 8]);
    b.x = 7.0;
    assert!(a.overlaps(&b));
    b.x = 8.0;
    assert!(!a.overlaps(&b));
    a.y = 20.0;
    b.x = 0.0;
    assert!(!a.overlaps(&b));
}

#[test]
fn living_and_undead_are_hostile() {
    let living = object(1, tags::LIVING, vec![0, 0, 8, 8]);
    let undead = object(2, tags::UNDEAD, vec![0, 0, 8, 8]);
    let corpse = object(3, tags::CORPSE, vec![0, 0, 8, 8]);
    assert!(living.is_hostile_to(&undead));
    assert!(undead.is_hostile_to(&living));
    assert!(!living.is_hostile_to(&living));
    assert!(!living.is_hostile_to(&corpse));
}

#[test]
fn center_is_middle_of_box() {
    let mut o = object(1, 0, vec![0, 0, 8, 12]);
    o.x = 10.0;
    o.y = 2.0;
    assert_eq!(o.center(), Point::new(14.0, 8.0));
}

// ── Behaviours ────────────────────────────────────────────────────────────────

#[test]
fn same_kind_replaces_previous_behaviour() {
    let mut o = object(1, tags::LIVING, vec![0, 0, 8, 8]);
    o.add_behaviour(Behaviour::frozen(1000.0));
    o.add_behaviour(Behaviour::frozen(3000.0));
    assert_eq!(o.behaviours.len(), 1);
    assert_eq!(
        o.get_behaviour(BehaviourKind::Frozen),
        Some(&Behaviour::Frozen { remaining: 3000.0 })
    );
}

#[test]
fn replacement_moves_to_the_back() {
    let mut store = Behaviours::default();
    store.add(Behaviour::frozen(1000.0));
    store.add(Behaviour::bleeding(3));
    store.add(Behaviour::frozen(2000.0));
    assert_eq!(store.kinds(), vec![BehaviourKind::Bleeding, BehaviourKind::Frozen]);
}

#[test]
fn missing_behaviour_is_none() {
    let o = object(1, tags::LIVING, vec![0, 0, 8, 8]);
    assert!(o.get_behaviour(BehaviourKind::Frozen).is_none());
}

#[test]
fn remove_behaviour_detaches() {
    let mut o = object(1, tags::LIVING, vec![0, 0, 8, 8]);
    o.add_behaviour(Behaviour::bleeding(2));
    assert!(o.remove_behaviour(BehaviourKind::Bleeding).is_some());
    assert!(o.behaviours.is_empty());
    assert!(o.remove_behaviour(BehaviourKind::Bleeding).is_none());
}

// ── Spell & ability ───────────────────────────────────────────────────────────

#[test]
fn spell_recharges_one_cast_at_a_time() {
    let mut spell = Spell::new(3, 1000.0);
    spell.casts = 0;
    spell.recharge(999.0);
    assert_eq!(spell.casts, 0);
    spell.recharge(1.0);
    assert_eq!(spell.casts, 1);
    spell.casts = 3;
    spell.recharge(5000.0);
    assert_eq!(spell.casts, 3);
}

#[test]
fn refund_never_exceeds_max() {
    let mut spell = Spell::new(2, 1000.0);
    spell.refund();
    assert_eq!(spell.casts, 2);
}

#[test]
fn ability_progress_stays_in_unit_range() {
    let mut ability = Ability::new(10_000.0);
    assert_eq!(ability.progress(), 0.0);
    for _ in 0..30 {
        ability.advance(700.0);
        let p = ability.progress();
        assert!((0.0..=1.0).contains(&p));
    }
    assert_eq!(ability.progress(), 1.0);
    assert!(ability.is_ready());
}

#[test]
fn ability_trigger_resets_only_when_ready() {
    let mut ability = Ability::new(1000.0);
    ability.advance(500.0);
    assert!(!ability.trigger());
    assert_eq!(ability.timer, 500.0);
    ability.advance(500.0);
    assert!(ability.trigger());
    assert_eq!(ability.progress(), 0.0);
}
