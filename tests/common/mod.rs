#![allow(dead_code)]

use amor_fati::config::Config;
use amor_fati::engine::{Canvas, TextStyle};
use amor_fati::entities::{tags, Sprite, SpriteTable};
use amor_fati::game::Game;
use amor_fati::levels::{Campaign, LevelPlan};
use amor_fati::session::Session;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn sprites() -> SpriteTable {
    SpriteTable::embedded().expect("embedded sprite table parses")
}

pub fn make_game() -> Game {
    Game::new(&Config::default(), sprites())
}

/// A game that has already left the intro.
pub fn playing_game() -> Game {
    let mut game = make_game();
    game.begin();
    game
}

pub fn make_session(levels: &[&str]) -> Session {
    let plans = levels.iter().map(|codes| LevelPlan::parse(codes, 100.0)).collect();
    Session::with_campaign(
        Config::default(),
        sprites(),
        Box::new(Campaign::new(plans)),
        seeded_rng(),
    )
}

/// Put every living enemy on stage to the sword.
pub fn slay_the_living(game: &mut Game) {
    for object in &mut game.objects {
        if object.is(tags::LIVING) {
            object.hp = 0;
        }
    }
}

pub fn living_count(game: &Game) -> usize {
    game.objects
        .iter()
        .filter(|o| o.is(tags::LIVING) && o.is_alive())
        .count()
}

// ── Recording canvas ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Sprite { name: String, x: f64, y: f64 },
    NineSlice { name: String, x: f64, y: f64, w: f64, h: f64 },
    Text { text: String, x: f64, y: f64, style: TextStyle },
}

/// Records draw calls in absolute canvas coordinates.
pub struct RecordingCanvas {
    pub width: i32,
    pub height: i32,
    pub calls: Vec<Draw>,
    pub clears: usize,
    offset: (f64, f64),
    saved: Vec<(f64, f64)>,
}

impl RecordingCanvas {
    pub fn new() -> RecordingCanvas {
        RecordingCanvas {
            width: 400,
            height: 240,
            calls: Vec::new(),
            clears: 0,
            offset: (0.0, 0.0),
            saved: Vec::new(),
        }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Draw::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprite_names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Draw::Sprite { name, .. } | Draw::NineSlice { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_sprite(&self, name: &str) -> usize {
        self.sprite_names().iter().filter(|n| **n == name).count()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.calls.clear();
        self.clears += 1;
        self.offset = (0.0, 0.0);
        self.saved.clear();
    }

    fn save(&mut self) {
        self.saved.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.saved.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.offset.0 += dx;
        self.offset.1 += dy;
    }

    fn draw_sprite(&mut self, sprite: &Sprite, x: f64, y: f64) {
        self.calls.push(Draw::Sprite {
            name: sprite.name.clone(),
            x: x + self.offset.0,
            y: y + self.offset.1,
        });
    }

    fn draw_nine_slice(&mut self, sprite: &Sprite, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(Draw::NineSlice {
            name: sprite.name.clone(),
            x: x + self.offset.0,
            y: y + self.offset.1,
            w,
            h,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: TextStyle) {
        self.calls.push(Draw::Text {
            text: text.to_string(),
            x: x + self.offset.0,
            y: y + self.offset.1,
            style,
        });
    }
}
