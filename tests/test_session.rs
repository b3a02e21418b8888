mod common;

use amor_fati::behaviours::{Behaviour, BehaviourKind};
use amor_fati::dialogue::{CLICK_TO_BEGIN, INTRO, OUTRO};
use amor_fati::entities::State;
use amor_fati::rituals::{catalog, RitualKind};
use amor_fati::session::*;

use common::{living_count, make_session, slay_the_living, RecordingCanvas};

/// Click through the intro and let the first enemy arrive.
fn begin_and_spawn(session: &mut Session) {
    session.push(InputEvent::PointerUp);
    session.step(100.0);
    assert_eq!(session.game.state, State::Playing);
    assert_eq!(living_count(&session.game), 1);
}

fn clear_level(session: &mut Session) {
    slay_the_living(&mut session.game);
    session.step(16.0);
}

// ── Start of run ──────────────────────────────────────────────────────────────

#[test]
fn run_opens_on_the_intro() {
    let session = make_session(&["v"]);
    assert_eq!(session.game.state, State::Intro);
    assert_eq!(session.game.dialogue.len(), INTRO.len());
    assert_eq!(session.game.dialogue.front().map(String::as_str), Some(INTRO[0]));
    assert!(session.game.has_ritual(RitualKind::Streak));
    assert!(!session.game.particles.is_empty());
}

// ── Dialogue pacing ───────────────────────────────────────────────────────────

#[test]
fn one_line_per_interval() {
    let mut session = make_session(&["v"]);
    session.step(3999.0);
    assert_eq!(session.game.dialogue.len(), INTRO.len());

    let mut session = make_session(&["v"]);
    session.step(4000.0);
    assert_eq!(session.game.dialogue.len(), INTRO.len() - 1);
    assert_eq!(session.game.dialogue.front().map(String::as_str), Some(INTRO[1]));
}

#[test]
fn leftover_time_carries_over() {
    let mut session = make_session(&["v"]);
    session.step(3000.0);
    session.step(3000.0);
    assert_eq!(session.game.dialogue.len(), INTRO.len() - 1);
    assert_eq!(session.dialogue_timer, 2000.0);
}

#[test]
fn intro_ends_with_a_prompt() {
    let mut session = make_session(&["v"]);
    for _ in 0..INTRO.len() {
        session.step(4000.0);
    }
    assert_eq!(session.game.dialogue.len(), 1);
    assert_eq!(session.game.dialogue.front().map(String::as_str), Some(CLICK_TO_BEGIN));

    session.step(4000.0);
    assert_eq!(session.game.dialogue.front().map(String::as_str), Some(CLICK_TO_BEGIN));
}

#[test]
fn dialogue_runs_while_paused() {
    let mut session = make_session(&["v"]);
    session.push(InputEvent::PointerUp);
    session.step(16.0);
    session.push(InputEvent::Key(KEY_P));
    session.step(16.0);
    assert!(session.paused);

    let lines = session.game.dialogue.len();
    session.step(4000.0);
    assert_eq!(session.game.dialogue.len(), lines - 1);
}

// ── Input routing ─────────────────────────────────────────────────────────────

#[test]
fn click_begins_and_casts() {
    let mut session = make_session(&["v"]);
    session.push(InputEvent::PointerUp);
    assert_eq!(session.pending_intents(), 2);
    session.step(16.0);
    assert_eq!(session.game.state, State::Playing);
    assert!(session.soundtrack.playing);
    assert_eq!(session.game.spell.casts, session.game.spell.max_casts - 1);
}

#[test]
fn keys_do_nothing_in_the_intro() {
    let mut session = make_session(&["v"]);
    for key in [KEY_SPACE, KEY_P, KEY_UP, KEY_DOWN, KEY_ENTER, KEY_ESCAPE] {
        session.push(InputEvent::Key(key));
    }
    assert_eq!(session.pending_intents(), 0);
}

#[test]
fn pointer_move_aims_the_spell() {
    let mut session = make_session(&["v"]);
    session.push(InputEvent::PointerUp);
    session.step(16.0);

    // Viewport defaults to the canvas itself: canvas y 150 is the floor line.
    let center = session.game.player().center();
    let y = 150.0 - center.y;
    session.push(InputEvent::PointerMove { x: 300.0, y });
    session.step(16.0);
    assert!(session.game.spell.target_angle.abs() < 0.01);

    session.push(InputEvent::PointerMove { x: center.x, y: 20.0 });
    session.step(16.0);
    assert!((session.game.spell.target_angle - std::f64::consts::FRAC_PI_2).abs() < 0.1);
}

#[test]
fn pause_freezes_the_simulation() {
    let mut session = make_session(&["v"]);
    session.push(InputEvent::PointerUp);
    session.step(16.0);
    session.push(InputEvent::Key(KEY_P));
    session.step(16.0);
    let timer = session.game.ability.timer;
    session.step(1000.0);
    assert_eq!(session.game.ability.timer, timer);
    assert_eq!(living_count(&session.game), 0);

    session.push(InputEvent::Key(KEY_P));
    session.step(100.0);
    assert!(!session.paused);
    assert!(session.game.ability.timer > timer);
}

#[test]
fn space_resurrects_once_ready() {
    let mut session = make_session(&["v"]);
    session.push(InputEvent::PointerUp);
    session.step(16.0);
    session.game.ability.timer = session.game.ability.cooldown;
    session.push(InputEvent::Key(KEY_SPACE));
    session.step(16.0);
    assert!(session.game.ability.progress() < 0.01);
}

// ── Level flow ────────────────────────────────────────────────────────────────

#[test]
fn last_level_cleared_wins_with_the_outro() {
    let mut session = make_session(&["v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);

    assert_eq!(session.game.state, State::Win);
    let lines: Vec<&str> = session.game.dialogue.iter().map(String::as_str).collect();
    assert_eq!(lines, OUTRO.to_vec());
    assert_eq!(lines[0], "");
    assert!(lines.contains(&"THE END — Amor Fati."));
}

#[test]
fn earlier_level_cleared_opens_the_shop() {
    let mut session = make_session(&["v", "v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);

    assert_eq!(session.game.state, State::Shopping);
    assert_eq!(session.game.level, 1);
    assert_eq!(session.shop.items, catalog());
    assert_eq!(session.shop.selected_index, 0);
    assert!(session.game.souls > 0);
}

#[test]
fn level_is_not_cleared_while_enemies_remain() {
    let mut session = make_session(&["vv"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);
    assert_eq!(session.game.state, State::Playing);
}

#[test]
fn shop_keys_navigate_and_leave() {
    let mut session = make_session(&["v", "v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);

    session.push(InputEvent::Key(KEY_DOWN));
    session.push(InputEvent::Key(KEY_DOWN));
    session.push(InputEvent::Key(KEY_UP));
    session.step(16.0);
    assert_eq!(session.shop.selected_index, 1);

    session.push(InputEvent::Key(KEY_ESCAPE));
    session.step(16.0);
    assert_eq!(session.game.state, State::Playing);
    assert_eq!(session.game.shop_visit_count, 1);
}

#[test]
fn rejected_purchase_leaves_a_notice() {
    let mut session = make_session(&["v", "v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);
    session.game.souls = 1;

    session.push(InputEvent::Key(KEY_ENTER));
    session.step(16.0);
    assert_eq!(session.game.state, State::Shopping);
    assert_eq!(session.game.souls, 1);
    assert!(session.shop.notice.is_some());
}

#[test]
fn purchase_returns_to_play() {
    let mut session = make_session(&["v", "v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);
    session.game.souls = 500;

    session.push(InputEvent::Key(KEY_ENTER));
    session.step(16.0);
    assert_eq!(session.game.state, State::Playing);
    assert!(session.game.has_ritual(RitualKind::Bouncing));
    assert_eq!(session.game.souls, 480);
}

#[test]
fn norman_marches_from_level_two() {
    let mut session = make_session(&["v", "v", "v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);
    assert!(session.game.player().get_behaviour(BehaviourKind::March).is_none());

    session.push(InputEvent::Key(KEY_ESCAPE));
    session.step(100.0);
    assert_eq!(living_count(&session.game), 1);
    clear_level(&mut session);

    assert_eq!(session.game.level, MARCH_LEVEL);
    let player = session.game.player();
    assert_eq!(
        player.get_behaviour(BehaviourKind::March),
        Some(&Behaviour::March { step: 0.0 })
    );
    assert_eq!(player.update_speed, session.soundtrack.step_interval());
}

#[test]
fn any_key_after_the_win_restarts() {
    let mut session = make_session(&["v"]);
    begin_and_spawn(&mut session);
    clear_level(&mut session);
    assert_eq!(session.game.state, State::Win);

    session.push(InputEvent::Key(KEY_ENTER));
    session.step(16.0);
    assert_eq!(session.game.state, State::Intro);
    assert_eq!(session.game.level, 0);
    assert_eq!(session.game.souls, 0);
    assert_eq!(session.game.dialogue.len(), INTRO.len());
    assert_eq!(session.pending_intents(), 0);

    begin_and_spawn(&mut session);
}

#[test]
fn hud_counts_the_campaigns_levels() {
    let mut session = make_session(&["v", "v"]);
    begin_and_spawn(&mut session);
    let mut canvas = RecordingCanvas::new();
    session.render(&mut canvas, 16.0);
    assert!(canvas.has_text("1-2"));
    assert!(!canvas.has_text("1-10"));
}

#[test]
fn screenshake_reaches_the_compositor() {
    let mut session = make_session(&["v"]);
    session.game.screenshake(120.0);
    session.step(16.0);
    assert_eq!(session.compositor.shake_timer(), 120.0);
}
