/// The shop between levels: a cursor over the ritual catalog and purchases
/// paid in souls.

use thiserror::Error;
use tracing::info;

use crate::compute::step_index;
use crate::entities::State;
use crate::game::Game;
use crate::rituals::{Ritual, RitualKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("There is nothing to buy.")]
    NothingSelected,
    #[error("Norman already knows that ritual.")]
    AlreadyOwned,
    #[error("Not enough souls: it costs {cost}, Norman has {souls}.")]
    InsufficientSouls { cost: u32, souls: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct Shop {
    /// The run's catalog, in declared order.
    pub rituals: Vec<Ritual>,
    /// What's on offer during the current visit.
    pub items: Vec<Ritual>,
    pub selected_index: usize,
    /// Why the last purchase was turned down, until the cursor moves.
    pub notice: Option<String>,
}

impl Shop {
    pub fn new(rituals: Vec<Ritual>) -> Shop {
        Shop {
            rituals,
            items: Vec::new(),
            selected_index: 0,
            notice: None,
        }
    }

    /// Open the shop with the whole catalog on offer.
    pub fn enter_shop(&mut self, game: &mut Game) {
        self.items = self.rituals.clone();
        self.selected_index = 0;
        self.notice = None;
        game.state = State::Shopping;
        info!(souls = game.souls, visit = game.shop_visit_count, "shop opened");
    }

    /// Move the cursor; it stops at either end of the list.
    pub fn select_shop_index(&mut self, delta: i32) {
        self.selected_index = step_index(self.selected_index, delta, self.items.len());
        self.notice = None;
    }

    pub fn selected(&self) -> Option<&Ritual> {
        self.items.get(self.selected_index)
    }

    /// Description of the selected ritual, or an empty string.
    pub fn description(&self) -> &str {
        self.selected().map_or("", |ritual| ritual.description)
    }

    /// Buy the selected ritual and go back to playing.  A rejected purchase
    /// leaves the balance and the shop untouched.
    pub fn buy(&mut self, game: &mut Game) -> Result<RitualKind, PurchaseError> {
        let ritual = self.selected().cloned().ok_or(PurchaseError::NothingSelected)?;
        if game.has_ritual(ritual.kind) {
            return Err(PurchaseError::AlreadyOwned);
        }
        if game.souls < ritual.cost {
            return Err(PurchaseError::InsufficientSouls {
                cost: ritual.cost,
                souls: game.souls,
            });
        }
        game.souls -= ritual.cost;
        game.add_ritual(&ritual);
        info!(ritual = ritual.name, cost = ritual.cost, souls = game.souls, "ritual bought");
        self.leave(game);
        Ok(ritual.kind)
    }

    /// SHOPPING → PLAYING.
    pub fn leave(&mut self, game: &mut Game) {
        if game.state != State::Shopping {
            return;
        }
        game.state = State::Playing;
        game.shop_visit_count += 1;
        self.notice = None;
        info!(level = game.level + 1, "shop closed");
    }
}
