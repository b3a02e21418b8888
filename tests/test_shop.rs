mod common;

use amor_fati::entities::State;
use amor_fati::rituals::{catalog, RitualKind, SHOP_ORDER};
use amor_fati::shop::{PurchaseError, Shop};

use common::playing_game;

fn open_shop(souls: u32) -> (Shop, amor_fati::game::Game) {
    let mut game = playing_game();
    game.souls = souls;
    let mut shop = Shop::new(catalog());
    shop.enter_shop(&mut game);
    (shop, game)
}

#[test]
fn catalog_follows_shop_order() {
    let kinds: Vec<RitualKind> = catalog().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, SHOP_ORDER.to_vec());
    assert!(!kinds.contains(&RitualKind::Streak));
    assert!(catalog().iter().all(|r| r.cost > 0 && !r.name.is_empty()));
}

#[test]
fn entering_offers_everything_from_the_top() {
    let (shop, game) = open_shop(0);
    assert_eq!(game.state, State::Shopping);
    assert_eq!(shop.items.len(), SHOP_ORDER.len());
    assert_eq!(shop.selected_index, 0);
    assert_eq!(shop.selected().unwrap().kind, RitualKind::Bouncing);
}

#[test]
fn cursor_is_clamped() {
    let (mut shop, _) = open_shop(0);
    shop.select_shop_index(-1);
    assert_eq!(shop.selected_index, 0);
    for _ in 0..50 {
        shop.select_shop_index(1);
        assert!(shop.selected_index < shop.items.len());
    }
    assert_eq!(shop.selected_index, shop.items.len() - 1);
    shop.select_shop_index(-3);
    assert_eq!(shop.selected_index, shop.items.len() - 4);
}

#[test]
fn description_tracks_the_cursor() {
    let (mut shop, _) = open_shop(0);
    assert_eq!(shop.description(), RitualKind::Bouncing.ritual().description);
    shop.select_shop_index(1);
    assert_eq!(shop.description(), RitualKind::Ceiling.ritual().description);
}

#[test]
fn empty_shop_has_no_description() {
    let shop = Shop::new(Vec::new());
    assert_eq!(shop.description(), "");
    assert!(shop.selected().is_none());
}

#[test]
fn buying_charges_applies_and_leaves() {
    let (mut shop, mut game) = open_shop(100);
    let cost = shop.selected().unwrap().cost;

    assert_eq!(shop.buy(&mut game), Ok(RitualKind::Bouncing));

    assert_eq!(game.souls, 100 - cost);
    assert!(game.has_ritual(RitualKind::Bouncing));
    assert_eq!(game.state, State::Playing);
    assert_eq!(game.shop_visit_count, 1);
}

#[test]
fn insufficient_souls_changes_nothing() {
    let (mut shop, mut game) = open_shop(5);
    let result = shop.buy(&mut game);
    assert_eq!(
        result,
        Err(PurchaseError::InsufficientSouls { cost: 20, souls: 5 })
    );
    assert_eq!(game.souls, 5);
    assert_eq!(game.state, State::Shopping);
    assert!(!game.has_ritual(RitualKind::Bouncing));
}

#[test]
fn owned_rituals_are_not_sold_twice() {
    let (mut shop, mut game) = open_shop(100);
    game.add_ritual(&RitualKind::Bouncing.ritual());
    assert_eq!(shop.buy(&mut game), Err(PurchaseError::AlreadyOwned));
    assert_eq!(game.souls, 100);
}

#[test]
fn nothing_to_buy_in_an_empty_shop() {
    let mut game = playing_game();
    let mut shop = Shop::new(Vec::new());
    shop.enter_shop(&mut game);
    assert_eq!(shop.buy(&mut game), Err(PurchaseError::NothingSelected));
}

#[test]
fn rejection_reads_like_a_sentence() {
    let message = PurchaseError::InsufficientSouls { cost: 60, souls: 12 }.to_string();
    assert!(message.contains("60") && message.contains("12"));
}

#[test]
fn leaving_counts_the_visit() {
    let (mut shop, mut game) = open_shop(0);
    shop.leave(&mut game);
    assert_eq!(game.state, State::Playing);
    assert_eq!(game.shop_visit_count, 1);

    shop.leave(&mut game);
    assert_eq!(game.shop_visit_count, 1);
}

#[test]
fn moving_the_cursor_clears_the_notice() {
    let (mut shop, _) = open_shop(0);
    shop.notice = Some("no".to_string());
    shop.select_shop_index(1);
    assert!(shop.notice.is_none());
}
