//! One betting round: blinds, turn order, action validation, termination.
//!
//! The round never awards the pot. It returns once betting is settled, leaving
//! bets and folds in place for the caller to inspect.

use crate::action::Action;
use crate::chips::ChipError;
use crate::game::{GameState, HistoryVerb};
use crate::player::PlayerId;
use crate::provider::ProviderTable;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BettingError {
    #[error("a betting round needs at least 2 players, got {0}")]
    TooFewPlayers(usize),
    #[error(transparent)]
    Chip(#[from] ChipError),
}

/// How a betting round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundSummary {
    /// The bet every remaining player matched or went all-in short of.
    pub current_bet: u64,
    /// Accepted actions in the order they were applied.
    pub actions: Vec<(PlayerId, Action)>,
    /// Players still holding cards.
    pub remaining: usize,
}

impl RoundSummary {
    /// At most one player is left, so the hand can go straight to the award.
    pub fn is_uncontested(&self) -> bool {
        self.remaining <= 1
    }
}

/// Why an otherwise well-formed action was turned down.
#[derive(thiserror::Error, Debug)]
enum Rejected {
    #[error("cannot check while owing {0}")]
    CheckFacingBet(u64),
    #[error("cannot pay {0} in exact chips")]
    NoExactChange(u64),
}

/// Move up to `amount` from the player at `seat` into the pot and add it to
/// their bet. Returns what was actually posted; a short stack posts
/// everything it has and is then all-in.
pub fn post(state: &mut GameState, seat: usize, amount: u64) -> Result<u64, BettingError> {
    let GameState { players, pot, bank, .. } = state;
    let player = &mut players[seat];
    let stack = player.stack();
    let pay = amount.min(stack);
    if pay == stack {
        player.chips.transfer_all_to(pot);
    } else {
        player.chips.transfer_with_exchange(pot, pay, bank)?;
    }
    player.bet += pay;
    Ok(pay)
}

/// Post the small and big blinds for the current dealer position.
/// Returns the `(small, big)` blind seats.
pub fn post_blinds(state: &mut GameState) -> Result<(usize, usize), BettingError> {
    let n = state.players.len();
    let sb = (state.dealer + 1) % n;
    let bb = (state.dealer + 2) % n;
    for (seat, amount, verb) in [
        (sb, state.blind_amount(), HistoryVerb::SmallBlind),
        (bb, state.big_blind(), HistoryVerb::BigBlind),
    ] {
        let posted = post(state, seat, amount)?;
        let player = &state.players[seat];
        if posted < amount {
            let label = verb.label();
            log::info!("{} posts a short {label} of {posted} and is all in", player.name());
        } else {
            log::info!("{} posts {} {posted}", player.name(), verb.label());
        }
        let id = player.id;
        state.record(id, verb, Some(posted));
    }
    Ok((sb, bb))
}

/// Pre-flop betting: post blinds, then action starts left of the big blind.
pub fn preflop_round(
    state: &mut GameState,
    providers: &mut ProviderTable,
) -> Result<RoundSummary, BettingError> {
    ensure_players(state)?;
    state.reset_bets();
    let (_, bb) = post_blinds(state)?;
    let first = (bb + 1) % state.players.len();
    run_round(state, providers, first)
}

/// Flop, turn, or river betting: action starts left of the dealer.
pub fn postflop_round(
    state: &mut GameState,
    providers: &mut ProviderTable,
) -> Result<RoundSummary, BettingError> {
    ensure_players(state)?;
    state.reset_bets();
    let first = (state.dealer + 1) % state.players.len();
    run_round(state, providers, first)
}

fn ensure_players(state: &GameState) -> Result<(), BettingError> {
    match state.players.len() {
        n if n < 2 => Err(BettingError::TooFewPlayers(n)),
        _ => Ok(()),
    }
}

fn run_round(
    state: &mut GameState,
    providers: &mut ProviderTable,
    first: usize,
) -> Result<RoundSummary, BettingError> {
    let n = state.players.len();
    let mut has_acted = vec![false; n];
    let mut last_raiser: Option<usize> = None;
    let mut actions = Vec::new();

    if nobody_left_to_act(state) {
        log::debug!("no betting needed on the {}", state.phase.label());
    } else {
        let mut seat = first;
        while !round_over(state, &has_acted) {
            let player = &state.players[seat];
            let settled = has_acted[seat] && player.bet == state.current_bet();
            if !player.can_act() || (settled && last_raiser != Some(seat)) {
                seat = (seat + 1) % n;
                continue;
            }
            let (action, raised) = solicit(state, providers, seat)?;
            if raised {
                last_raiser = Some(seat);
            }
            actions.push((state.players[seat].id, action));
            has_acted[seat] = true;
            seat = (seat + 1) % n;
        }
    }

    Ok(RoundSummary {
        current_bet: state.current_bet(),
        actions,
        remaining: state.active_count(),
    })
}

/// At most one player could still put chips in, and they have nothing to
/// answer.
fn nobody_left_to_act(state: &GameState) -> bool {
    if state.active_count() <= 1 {
        return true;
    }
    let current = state.current_bet();
    let mut can_act = state.players.iter().filter(|p| p.can_act());
    match (can_act.next(), can_act.next()) {
        (None, _) => true,
        (Some(p), None) => p.bet >= current,
        _ => false,
    }
}

fn round_over(state: &GameState, has_acted: &[bool]) -> bool {
    if state.active_count() <= 1 {
        return true;
    }
    let current = state.current_bet();
    state
        .players
        .iter()
        .zip(has_acted)
        .filter(|(p, _)| !p.folded)
        .all(|(p, &acted)| p.chips.is_empty() || (acted && p.bet == current))
}

/// Ask the seat's provider until it answers with an action that can be
/// applied. Returns the action and whether it raised the bet.
fn solicit(
    state: &mut GameState,
    providers: &mut ProviderTable,
    seat: usize,
) -> Result<(Action, bool), BettingError> {
    loop {
        let player = &state.players[seat];
        let reply = providers.provider_for(player.id).decide(state, player);
        let action = match reply.parse::<Action>() {
            Ok(a) => a,
            Err(e) => {
                log::warn!("{}: {e}", player.name());
                continue;
            }
        };
        match apply(state, seat, action)? {
            Ok(raised) => return Ok((action, raised)),
            Err(why) => log::warn!("{} cannot {action}: {why}", state.players[seat].name()),
        }
    }
}

fn apply(
    state: &mut GameState,
    seat: usize,
    action: Action,
) -> Result<Result<bool, Rejected>, BettingError> {
    let current = state.current_bet();
    let owed = current - state.players[seat].bet;
    let id = state.players[seat].id;

    let (verb, amount) = match action {
        Action::Fold => {
            state.players[seat].folded = true;
            (HistoryVerb::Fold, None)
        }
        Action::Check => {
            if owed > 0 {
                return Ok(Err(Rejected::CheckFacingBet(owed)));
            }
            (HistoryVerb::Check, None)
        }
        Action::Call => (HistoryVerb::Call, Some(post(state, seat, owed)?)),
        Action::AllIn => {
            let stack = state.players[seat].stack();
            (HistoryVerb::AllIn, Some(post(state, seat, stack)?))
        }
        Action::Raise(by) => {
            let need = owed.saturating_add(by);
            let verb = if need >= state.players[seat].stack() {
                HistoryVerb::AllIn
            } else {
                HistoryVerb::Raise
            };
            match post(state, seat, need) {
                Ok(paid) => (verb, Some(paid)),
                Err(BettingError::Chip(ChipError::ExactChangeUnavailable { amount })) => {
                    return Ok(Err(Rejected::NoExactChange(amount)));
                }
                Err(e) => return Err(e),
            }
        }
    };

    let player = &state.players[seat];
    match amount {
        Some(paid) => log::info!(
            "{} {} {paid} (bet {}, pot {})",
            player.name(),
            verb.label(),
            player.bet,
            state.pot.total()
        ),
        None => log::info!("{} {}", player.name(), verb.label()),
    }
    state.record(id, verb, amount);
    Ok(Ok(state.players[seat].bet > current))
}
