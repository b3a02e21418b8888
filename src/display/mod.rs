/// Rendering layer: composites one frame of the game onto a `Canvas`.
///
/// The compositor reads game state and never changes it.  It owns only
/// presentation state of its own: the screen-shake timer, the cloud drift
/// and the text cursor.

pub mod terminal;

use rand::Rng;

use crate::behaviours::BehaviourKind;
use crate::compute::{
    cloud_x, cooldown_panel_width, cooldown_seconds, orb_row_start, particle_frame,
    streak_suffix, SCENE_ORIGIN,
};
use crate::dialogue::shop_quote;
use crate::engine::{Canvas, TextStyle};
use crate::entities::{tags, Sprite, State};
use crate::game::Game;
use crate::levels::CAMPAIGN_LENGTH;
use crate::shop::Shop;

const ICON_SOULS: &str = "$";
/// Cloud drift per millisecond.
const CLOUD_SPEED: f64 = 0.002;
const CLOUD_SPRITES: [&str; 3] = ["cloud_1", "cloud_2", "cloud_3"];
const CLOUD_LAYERS: usize = 4;
const TILE_WIDTH: f64 = 16.0;
/// Objects with this much health or more show a number instead of orbs.
const ORB_LIMIT: i32 = 10;

pub const CHAR_WIDTH: f64 = 4.0;
pub const LINE_HEIGHT: f64 = 8.0;

// ── Text ──────────────────────────────────────────────────────────────────────

/// Where the next piece of text goes.  Newlines return to the column the
/// text started at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextCursor {
    pub start_x: f64,
    pub x: f64,
    pub y: f64,
}

impl TextCursor {
    /// Write `text` at `at`, or where the previous write stopped.
    pub fn write<C: Canvas>(
        &mut self,
        canvas: &mut C,
        text: &str,
        at: Option<(f64, f64)>,
        style: TextStyle,
    ) {
        if let Some((x, y)) = at {
            self.start_x = x;
            self.x = x;
            self.y = y;
        }
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            if !line.is_empty() {
                canvas.fill_text(line, self.x, self.y, style);
            }
            self.x += line.chars().count() as f64 * CHAR_WIDTH;
            if lines.peek().is_some() {
                self.x = self.start_x;
                self.y += LINE_HEIGHT;
            }
        }
    }
}

// ── Sprite helpers ────────────────────────────────────────────────────────────

/// Draw in canvas space.  Malformed descriptors are skipped.
pub fn draw_sprite<C: Canvas>(canvas: &mut C, sprite: &Sprite, x: f64, y: f64) {
    if sprite.is_drawable() {
        canvas.draw_sprite(sprite, x, y);
    }
}

/// Draw in scene space: `y` is the sprite's bottom edge, measured upwards.
pub fn draw_scene_sprite<C: Canvas>(canvas: &mut C, sprite: &Sprite, x: f64, y: f64) {
    if sprite.is_drawable() {
        canvas.draw_sprite(sprite, x, -y - sprite.height());
    }
}

fn draw_nine_slice<C: Canvas>(canvas: &mut C, sprite: &Sprite, x: f64, y: f64, w: f64, h: f64) {
    if sprite.is_drawable() && w > 0.0 && h > 0.0 {
        canvas.draw_nine_slice(sprite, x, y, w, h);
    }
}

// ── Compositor ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Compositor {
    shake_timer: f64,
    cloud_offset: f64,
    text: TextCursor,
    /// Total shown after the current level in the HUD.
    pub level_count: usize,
}

impl Default for Compositor {
    fn default() -> Self {
        Compositor::new()
    }
}

impl Compositor {
    pub fn new() -> Compositor {
        Compositor {
            shake_timer: 0.0,
            cloud_offset: 0.0,
            text: TextCursor::default(),
            level_count: CAMPAIGN_LENGTH,
        }
    }

    pub fn screenshake(&mut self, time: f64) {
        self.shake_timer = time;
    }

    pub fn shake_timer(&self) -> f64 {
        self.shake_timer
    }

    pub fn cloud_offset(&self) -> f64 {
        self.cloud_offset
    }

    /// Render one complete frame.
    pub fn render<C: Canvas>(&mut self, canvas: &mut C, game: &Game, shop: &Shop, dt: f64) {
        canvas.clear();
        canvas.save();

        if self.shake_timer > 0.0 {
            self.shake_timer -= dt;
            let mut rng = rand::thread_rng();
            canvas.translate(rng.gen_range(0..2) as f64, rng.gen_range(0..2) as f64);
        }

        canvas.translate(SCENE_ORIGIN.x, SCENE_ORIGIN.y);
        self.cloud_offset += CLOUD_SPEED * dt;
        draw_background(canvas, game, self.cloud_offset);
        draw_particles(canvas, game);
        self.draw_objects(canvas, game);
        if game.state == State::Playing {
            draw_reticle(canvas, game);
        }
        canvas.restore();

        self.draw_hud(canvas, game);

        if game.state == State::Shopping {
            self.draw_shop(canvas, game, shop);
        }
    }

    fn write<C: Canvas>(&mut self, canvas: &mut C, text: &str, at: Option<(f64, f64)>) {
        self.text.write(canvas, text, at, TextStyle::Plain);
    }

    fn write_with_shadow<C: Canvas>(&mut self, canvas: &mut C, text: &str, x: f64, y: f64) {
        self.text.write(canvas, text, Some((x, y)), TextStyle::Shadow);
    }

    // ── Objects ──────────────────────────────────────────────────────────────

    fn draw_objects<C: Canvas>(&mut self, canvas: &mut C, game: &Game) {
        let ice = game.sprites.get("ice");
        let orb = game.sprites.get("health_orb");
        let orb_empty = game.sprites.get("health_orb_empty");

        for object in &game.objects {
            let sprite = &object.sprite;
            draw_scene_sprite(canvas, sprite, object.x, object.y + object.hop);

            if object.get_behaviour(BehaviourKind::Frozen).is_some() {
                draw_nine_slice(
                    canvas,
                    &ice,
                    object.x,
                    -object.y - sprite.height(),
                    sprite.width(),
                    sprite.height(),
                );
            }

            let damaged = object.max_hp > 1 && object.hp < object.max_hp;
            if damaged && !game.is_player(object) && !object.is(tags::SPELL) {
                if object.max_hp < ORB_LIMIT {
                    let x0 = orb_row_start(object.center().x, object.max_hp);
                    for i in 0..object.max_hp {
                        let sprite = if i < object.hp { &orb } else { &orb_empty };
                        draw_scene_sprite(canvas, sprite, x0 + i as f64 * 4.0, object.y - 6.0);
                    }
                } else {
                    draw_scene_sprite(canvas, &orb, object.x, object.y - 6.0);
                    let label = format!("{}/{}", object.hp, object.max_hp);
                    self.write(canvas, &label, Some((object.x + 6.0, -object.y)));
                }
            }

            let mut x = object.x;
            for behaviour in object.behaviours.iter() {
                if let Some(name) = behaviour.status_sprite() {
                    let icon = game.sprites.get(name);
                    draw_scene_sprite(canvas, &icon, x, object.y - 12.0);
                    x += icon.width() + 1.0;
                }
            }
        }
    }

    // ── HUD ──────────────────────────────────────────────────────────────────

    fn draw_hud<C: Canvas>(&mut self, canvas: &mut C, game: &Game) {
        if let Some(line) = game.dialogue.front() {
            self.write_with_shadow(canvas, line, 75.0, 50.0);
        }

        if game.state == State::Intro {
            return;
        }

        let (width, height) = canvas.size();
        let (width, height) = (width as f64, height as f64);
        let sprites = &game.sprites;

        draw_sprite(canvas, &sprites.get("norman_icon"), 0.0, 0.0);

        let player = game.player();
        let (orb, orb_empty) = (sprites.get("health_orb"), sprites.get("health_orb_empty"));
        for i in 0..player.max_hp {
            let sprite = if i < player.hp { &orb } else { &orb_empty };
            draw_sprite(canvas, sprite, 11.0 + i as f64 * 4.0, 0.0);
        }

        let (cast, cast_empty) = (sprites.get("cast_orb"), sprites.get("cast_orb_empty"));
        for i in 0..game.spell.max_casts {
            let sprite = if i < game.spell.casts { &cast } else { &cast_empty };
            draw_sprite(canvas, sprite, 11.0 + i as f64 * 4.0, LINE_HEIGHT);
        }

        if game.souls > 0 {
            let suffix = streak_suffix(game.get_streak_multiplier());
            let text = format!("{}{} {}", ICON_SOULS, game.souls, suffix);
            self.write_with_shadow(canvas, text.trim_end(), width / 2.0 - 30.0, 0.0);
        }

        let level = format!("{}-{}", game.level + 1, self.level_count);
        self.write_with_shadow(canvas, &level, width - 30.0, 2.0);

        if game.state == State::Playing {
            let x = 150.0;
            let y = height - 12.0;
            let progress = game.ability.progress();
            let panel = cooldown_panel_width(progress) as f64;
            draw_nine_slice(canvas, &sprites.get("pink_frame"), x, y, panel, 10.0);
            self.write_with_shadow(canvas, "Resurrect", x + 10.0, y + 2.0);
            let hint = if progress >= 1.0 {
                " (Space)".to_string()
            } else {
                format!(" ({}s)", cooldown_seconds(progress, game.ability.cooldown))
            };
            self.write_with_shadow(canvas, &hint, x + 70.0, y + 2.0);
            draw_sprite(canvas, &sprites.get("skull"), x + 1.0, y + 1.0);
        }
    }

    // ── Shop ─────────────────────────────────────────────────────────────────

    fn draw_shop<C: Canvas>(&mut self, canvas: &mut C, game: &Game, shop: &Shop) {
        let quote = shop_quote(game.shop_visit_count);
        let header = format!("Between battles, Norman reflects:\n{}\n", quote);
        self.write(canvas, &header, Some((160.0, 8.0)));
        self.write(canvas, "Rituals\n\n", Some((160.0, 36.0)));

        for (i, item) in shop.items.iter().enumerate() {
            let marker = if i == shop.selected_index { ">" } else { " " };
            let line = format!("{}{} ${}\n", marker, item.name, item.cost);
            self.write(canvas, &line, None);
        }
        let description = format!("\n{}\n", shop.description());
        self.write(canvas, &description, None);

        if let Some(notice) = &shop.notice {
            self.write(canvas, notice, None);
        }
    }
}

// ── Scene layers ──────────────────────────────────────────────────────────────

fn draw_background<C: Canvas>(canvas: &mut C, game: &Game, cloud_offset: f64) {
    let sprites = &game.sprites;
    let floor = sprites.get("floor");
    draw_clouds(canvas, game, cloud_offset, floor.height());

    let (wall, door, ceiling) = (sprites.get("wall"), sprites.get("door"), sprites.get("ceiling"));
    let tiles = (game.stage.width / TILE_WIDTH).ceil() as usize;
    for i in 0..tiles {
        let x = i as f64 * TILE_WIDTH;
        let sprite = if i % 5 != 0 { &wall } else { &door };
        draw_scene_sprite(canvas, sprite, x, 0.0);
        draw_scene_sprite(canvas, &floor, x, -floor.height());
        draw_scene_sprite(canvas, &ceiling, x, game.stage.ceiling);
    }
}

fn draw_clouds<C: Canvas>(canvas: &mut C, game: &Game, offset: f64, floor_height: f64) {
    let y = -floor_height - 12.0;
    for layer in 0..CLOUD_LAYERS {
        let sprite = game.sprites.get(CLOUD_SPRITES[layer % CLOUD_SPRITES.len()]);
        let x = cloud_x(layer, offset, game.stage.width);
        draw_scene_sprite(canvas, &sprite, x, y - (layer % 2) as f64 * 6.0);
    }
}

fn draw_particles<C: Canvas>(canvas: &mut C, game: &Game) {
    for emitter in &game.particles.emitters {
        for particle in &emitter.particles {
            let Some(variant) = emitter.variants.get(particle.variant) else {
                continue;
            };
            if let Some(frame) = particle_frame(particle.progress(), variant.len()) {
                draw_scene_sprite(canvas, &variant[frame], particle.x, particle.y);
            }
        }
    }
}

fn draw_reticle<C: Canvas>(canvas: &mut C, game: &Game) {
    let at = game.get_casting_point();
    let sprite = game.sprites.get("reticle");
    draw_scene_sprite(
        canvas,
        &sprite,
        at.x - sprite.width() / 2.0,
        at.y - sprite.height() / 2.0,
    );
}
