use holdem_engine::action::Action;
use holdem_engine::chips::ChipStack;
use holdem_engine::engine::Engine;
use holdem_engine::game::{GameState, Phase};
use holdem_engine::player::PlayerId;
use holdem_engine::provider::{Always, ProviderTable};

fn mk_game(stacks: &[u64]) -> GameState {
    let stacks = stacks.iter().map(|&v| ChipStack::from_counts([(5, v / 5)]).unwrap()).collect();
    GameState::from_stacks(stacks, 5).unwrap()
}

#[test]
fn busted_players_leave_and_seats_close_up() {
    let mut g = mk_game(&[100, 0, 100, 100]);
    g.reset_round();
    let ids: Vec<PlayerId> = g.players().iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![PlayerId(0), PlayerId(2), PlayerId(3)]);
    let seats: Vec<usize> = g.players().iter().map(|p| p.seat()).collect();
    assert_eq!(seats, vec![0, 1, 2]);
    assert_eq!(g.players()[g.dealer_index()].id(), PlayerId(2), "button skips the empty seat");
}

#[test]
fn dealer_stays_in_range_after_removals() {
    let mut g = mk_game(&[100, 100, 100, 0, 0]);
    for _ in 0..7 {
        g.reset_round();
        assert!(g.dealer_index() < g.players().len());
    }
    assert_eq!(g.players().len(), 3);
}

#[test]
fn reset_clears_the_hand() {
    let mut g = mk_game(&[100, 100, 100]);
    g.deal_hole_cards().unwrap();
    g.deal_flop().unwrap();
    g.player_mut(1).unwrap().set_folded(true);
    g.reset_round();
    assert!(g.community_cards().is_empty());
    assert!(g.burn_cards().is_empty());
    assert!(g.history().is_empty());
    assert_eq!(g.phase(), Phase::Preflop);
    assert!(g.players().iter().all(|p| p.hand().is_empty() && !p.is_folded() && p.bet() == 0));
}

#[test]
fn all_in_loser_is_removed_after_the_hand() {
    let g = mk_game(&[500, 20, 500]).with_seed(3);
    let mut engine = Engine::from_state(g, ProviderTable::new(Always(Action::AllIn)));
    let before = engine.state().total_chips();
    engine.play_hand().unwrap();
    assert_eq!(engine.state().total_chips(), before);
    for p in engine.state().players() {
        assert!(p.stack() > 0, "{} kept a seat with no chips", p.name());
    }
}

#[test]
fn deck_is_refreshed_before_it_runs_dry() {
    let mut engine = Engine::from_state(
        mk_game(&[1000, 1000, 1000, 1000, 1000, 1000]),
        ProviderTable::new(Always(Action::Call)),
    );
    for _ in 0..6 {
        engine.play_hand().unwrap();
        assert!(engine.state().deck().len() >= 52 - engine.state().cards_per_hand() * 2);
    }
}
