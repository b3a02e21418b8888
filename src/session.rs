/// One play session: the game plus everything around it that lives for the
/// whole run (shop, level driver, camera, pause, dialogue pacing, RNG).
///
/// Input arrives as raw events, is routed by the current state into
/// intents, and the intents are applied at the start of the next `step`.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::actions;
use crate::audio::Soundtrack;
use crate::behaviours::Behaviour;
use crate::compute::{screen_to_scene, ScreenRect, SCENE_ORIGIN};
use crate::config::Config;
use crate::dialogue;
use crate::display::Compositor;
use crate::engine::{Canvas, Fx};
use crate::entities::{Point, SpriteTable, State};
use crate::game::Game;
use crate::levels::{Campaign, LevelProgress};
use crate::rituals::{self, RitualKind};
use crate::shop::Shop;

// Raw key codes.
pub const KEY_ENTER: u16 = 13;
pub const KEY_ESCAPE: u16 = 27;
pub const KEY_SPACE: u16 = 32;
pub const KEY_UP: u16 = 38;
pub const KEY_DOWN: u16 = 40;
pub const KEY_P: u16 = 80;

/// The level at which Norman starts marching to the music.
pub const MARCH_LEVEL: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerUp,
    /// Host pointer position, in the same units as the session viewport.
    PointerMove { x: f64, y: f64 },
    Key(u16),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    Begin,
    Cast,
    /// Aim at a scene-space point.
    Retarget(Point),
    Resurrect,
    TogglePause,
    ShopNavigate(i32),
    Purchase,
    LeaveShop,
    Restart,
}

pub struct Session {
    pub config: Config,
    sprites: SpriteTable,
    pub game: Game,
    pub shop: Shop,
    pub campaign: Box<dyn LevelProgress>,
    pub soundtrack: Soundtrack,
    pub compositor: Compositor,
    pub paused: bool,
    pub dialogue_timer: f64,
    /// Where the canvas is shown on the host, for pointer mapping.
    pub viewport: ScreenRect,
    marching: bool,
    intents: VecDeque<Intent>,
    rng: StdRng,
}

impl Session {
    pub fn new(config: Config, sprites: SpriteTable) -> Session {
        Session::with_campaign(
            config,
            sprites,
            Box::new(Campaign::standard()),
            StdRng::from_entropy(),
        )
    }

    pub fn with_campaign(
        config: Config,
        sprites: SpriteTable,
        campaign: Box<dyn LevelProgress>,
        rng: StdRng,
    ) -> Session {
        let viewport = ScreenRect {
            x: 0.0,
            y: 0.0,
            width: config.canvas.width as f64,
            height: config.canvas.height as f64,
        };
        let mut session = Session {
            game: Game::new(&config, sprites.clone()),
            shop: Shop::new(rituals::catalog()),
            campaign,
            soundtrack: Soundtrack::new(config.bpm),
            compositor: Compositor::new(),
            paused: false,
            dialogue_timer: 0.0,
            viewport,
            marching: false,
            intents: VecDeque::new(),
            rng,
            config,
            sprites,
        };
        session.start_run();
        session
    }

    fn start_run(&mut self) {
        self.compositor.level_count = self.campaign.level_count();
        self.game.add_ritual(&RitualKind::Streak.ritual());
        self.game.dialogue = dialogue::INTRO.iter().map(|line| line.to_string()).collect();
        let width = self.game.stage.width;
        for i in 0..8 {
            let at = Point::new(width * (i as f64 + 0.5) / 8.0, 0.0);
            self.game.particles.burst(Fx::Dust, 25, at, &mut self.rng);
        }
    }

    /// Throw away the run and start over from the intro.
    pub fn reset(&mut self) {
        self.game = Game::new(&self.config, self.sprites.clone());
        self.shop = Shop::new(rituals::catalog());
        self.campaign.reset();
        self.soundtrack = Soundtrack::new(self.config.bpm);
        self.compositor = Compositor::new();
        self.paused = false;
        self.dialogue_timer = 0.0;
        self.marching = false;
        self.intents.clear();
        self.start_run();
        info!("session reset");
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Route a raw input event into intents for the next step.
    pub fn push(&mut self, event: InputEvent) {
        let state = self.game.state;
        match event {
            InputEvent::PointerMove { x, y } => {
                let canvas = (self.config.canvas.width, self.config.canvas.height);
                let target = screen_to_scene(x, y, self.viewport, canvas, SCENE_ORIGIN);
                self.intents.push_back(Intent::Retarget(target));
            }
            InputEvent::PointerUp => {
                if state == State::Intro {
                    self.intents.push_back(Intent::Begin);
                }
                self.intents.push_back(Intent::Cast);
            }
            InputEvent::Key(key) => {
                let intent = match (state, key) {
                    (State::Playing, KEY_SPACE) => Some(Intent::Resurrect),
                    (State::Playing, KEY_P) => Some(Intent::TogglePause),
                    (State::Shopping, KEY_UP) => Some(Intent::ShopNavigate(-1)),
                    (State::Shopping, KEY_DOWN) => Some(Intent::ShopNavigate(1)),
                    (State::Shopping, KEY_ENTER) => Some(Intent::Purchase),
                    (State::Shopping, KEY_ESCAPE) => Some(Intent::LeaveShop),
                    (State::Win, _) => Some(Intent::Restart),
                    _ => None,
                };
                self.intents.extend(intent);
            }
        }
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Begin => {
                if self.game.state == State::Intro {
                    self.soundtrack.play();
                    self.game.begin();
                }
            }
            Intent::Cast => {
                actions::cast(&mut self.game, &mut self.rng);
            }
            Intent::Retarget(target) => self.game.retarget(target),
            Intent::Resurrect => {
                actions::resurrect(&mut self.game, &mut self.rng);
            }
            Intent::TogglePause => {
                if self.game.state == State::Playing {
                    self.paused = !self.paused;
                    info!(paused = self.paused, "pause toggled");
                }
            }
            Intent::ShopNavigate(delta) => {
                if self.game.state == State::Shopping {
                    self.shop.select_shop_index(delta);
                }
            }
            Intent::Purchase => {
                if self.game.state == State::Shopping {
                    if let Err(e) = self.shop.buy(&mut self.game) {
                        warn!(error = %e, "purchase rejected");
                        self.shop.notice = Some(e.to_string());
                    }
                }
            }
            Intent::LeaveShop => self.shop.leave(&mut self.game),
            Intent::Restart => {
                if self.game.state == State::Win {
                    self.reset();
                }
            }
        }
    }

    // ── Frame ────────────────────────────────────────────────────────────────

    /// Advance the session by `dt` milliseconds.
    pub fn step(&mut self, dt: f64) {
        while let Some(intent) = self.intents.pop_front() {
            let restarting = intent == Intent::Restart && self.game.state == State::Win;
            self.apply(intent);
            if restarting {
                return;
            }
        }

        self.update_dialogue(dt);
        if self.paused {
            return;
        }

        if self.game.state == State::Playing {
            self.campaign.update_level(&mut self.game, dt);
            self.game.update(dt, &mut self.rng);
        }

        self.game.update_effects(dt);

        if self.game.state == State::Playing && self.campaign.is_level_finished(&self.game) {
            if self.campaign.is_complete(&self.game) {
                self.game.win(&dialogue::OUTRO);
            } else {
                self.game.on_level_end();
                self.shop.enter_shop(&mut self.game);
            }
        }

        if self.game.level == MARCH_LEVEL && !self.marching {
            let interval = self.soundtrack.step_interval();
            let player = self.game.player_mut();
            player.add_behaviour(Behaviour::March { step: 0.0 });
            player.update_clock = 100.0;
            player.update_speed = interval;
            self.marching = true;
        }

        if let Some(time) = self.game.take_screenshake() {
            self.compositor.screenshake(time);
        }
    }

    /// Pop one dialogue line per full interval of accumulated time.
    fn update_dialogue(&mut self, dt: f64) {
        let interval = self.config.dialogue_interval_ms;
        if interval <= 0.0 {
            return;
        }
        self.dialogue_timer += dt;
        while self.dialogue_timer >= interval {
            self.dialogue_timer -= interval;
            self.game.dialogue.pop_front();
            if self.game.state == State::Intro && self.game.dialogue.is_empty() {
                self.game.dialogue.push_back(dialogue::CLICK_TO_BEGIN.to_string());
            }
        }
    }

    pub fn render<C: Canvas>(&mut self, canvas: &mut C, dt: f64) {
        self.compositor.render(canvas, &self.game, &self.shop, dt);
    }
}
