/// Level progression: enemy waves per level and completion checks.

use tracing::info;

use crate::behaviours::Behaviour;
use crate::entities::{tags, GameObject};
use crate::game::Game;

/// Number of levels shown in the HUD level indicator.
pub const CAMPAIGN_LENGTH: usize = 10;

/// What the game needs from a level driver.  Polled only while playing.
pub trait LevelProgress {
    /// Spawn whatever is due this frame.
    fn update_level(&mut self, game: &mut Game, dt: f64);
    /// The active level's enemies have all arrived and all fallen.
    fn is_level_finished(&self, game: &Game) -> bool;
    /// The level just finished was the last one.
    fn is_complete(&self, game: &Game) -> bool;
    /// How many levels the run has, for the HUD.
    fn level_count(&self) -> usize;
    /// Forget all progress for a fresh run.
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Villager,
    Champion,
    Inquisitor,
}

impl EnemyKind {
    fn from_code(code: char) -> Option<EnemyKind> {
        match code {
            'v' => Some(EnemyKind::Villager),
            'c' => Some(EnemyKind::Champion),
            'i' => Some(EnemyKind::Inquisitor),
            _ => None,
        }
    }

    /// Build an enemy standing just off the right edge of the stage.
    pub fn spawn(self, game: &mut Game) -> GameObject {
        let (sprite, hp, souls, step, speed) = match self {
            EnemyKind::Villager => ("villager", 1, 5, -3.0, 250.0),
            EnemyKind::Champion => ("champion", 3, 15, -2.0, 300.0),
            EnemyKind::Inquisitor => ("inquisitor", 12, 60, -2.0, 400.0),
        };
        let x = game.stage.width + 4.0;
        let mut enemy = game.create(tags::LIVING, sprite);
        enemy.x = x;
        enemy.hp = hp;
        enemy.max_hp = hp;
        enemy.souls = souls;
        enemy.update_speed = speed;
        enemy.update_clock = speed;
        enemy.add_behaviour(Behaviour::March { step });
        enemy.add_behaviour(Behaviour::attack(1, 1000.0));
        enemy
    }
}

/// One level: enemies in arrival order, one every `interval` milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPlan {
    pub spawns: Vec<EnemyKind>,
    pub interval: f64,
}

impl LevelPlan {
    /// `"vvc"` is two villagers then a champion.  Unknown codes are ignored.
    pub fn parse(codes: &str, interval: f64) -> LevelPlan {
        LevelPlan {
            spawns: codes.chars().filter_map(EnemyKind::from_code).collect(),
            interval,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Campaign {
    pub levels: Vec<LevelPlan>,
    /// Level index the spawn counters below belong to.
    current: Option<usize>,
    spawned: usize,
    timer: f64,
}

impl Campaign {
    pub fn new(levels: Vec<LevelPlan>) -> Campaign {
        Campaign {
            levels,
            current: None,
            spawned: 0,
            timer: 0.0,
        }
    }

    pub fn standard() -> Campaign {
        Campaign::new(vec![
            LevelPlan::parse("vvv", 2500.0),
            LevelPlan::parse("vvvvv", 2200.0),
            LevelPlan::parse("vvcvv", 2000.0),
            LevelPlan::parse("vcvvcvv", 1800.0),
            LevelPlan::parse("cvcvcvvc", 1800.0),
            LevelPlan::parse("vvivv", 2000.0),
            LevelPlan::parse("vcvcvvccvv", 1500.0),
            LevelPlan::parse("cccvccvc", 1500.0),
            LevelPlan::parse("vvcvvcvvcivv", 1300.0),
            LevelPlan::parse("ccvicvvcivcc", 1200.0),
        ])
    }

    fn plan(&self, level: usize) -> Option<&LevelPlan> {
        self.levels.get(level)
    }
}

impl LevelProgress for Campaign {
    fn update_level(&mut self, game: &mut Game, dt: f64) {
        if self.current != Some(game.level) {
            self.current = Some(game.level);
            self.spawned = 0;
            self.timer = 0.0;
            info!(level = game.level + 1, "level started");
        }
        let Some(plan) = self.levels.get(game.level) else {
            return;
        };

        self.timer += dt;
        while self.spawned < plan.spawns.len() && self.timer >= plan.interval {
            self.timer -= plan.interval;
            let enemy = plan.spawns[self.spawned].spawn(game);
            game.spawn(enemy);
            self.spawned += 1;
        }
    }

    fn is_level_finished(&self, game: &Game) -> bool {
        if self.current != Some(game.level) {
            return false;
        }
        let all_arrived = self
            .plan(game.level)
            .map_or(true, |plan| self.spawned >= plan.spawns.len());
        all_arrived
            && !game
                .objects
                .iter()
                .any(|o| o.is(tags::LIVING) && o.is_alive())
    }

    fn is_complete(&self, game: &Game) -> bool {
        game.level + 1 >= self.levels.len()
    }

    fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn reset(&mut self) {
        self.current = None;
        self.spawned = 0;
        self.timer = 0.0;
    }
}
