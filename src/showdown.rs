//! Awarding the pot at the end of a hand.
//!
//! A single pot is paid out. Unequal all-in stacks do not create side pots:
//! every winner shares the whole pot.

use crate::chips::ChipError;
use crate::evaluator::{evaluate_hand, EvalError, Evaluation};
use crate::game::{GameState, HistoryVerb, Phase};
use crate::player::PlayerId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShowdownError {
    #[error("showdown with no players left in the hand")]
    NoActivePlayers,
    #[error(transparent)]
    Chip(#[from] ChipError),
    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

/// How the winners were decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolutionKind {
    /// Everyone else folded.
    Uncontested,
    /// Too few cards were out to rank hands, so the pot was split.
    CardsUnavailable,
    /// Hands were ranked.
    Evaluated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Showdown {
    /// Never empty. For evaluated showdowns, in the order extra chips were
    /// handed out.
    pub winners: Vec<PlayerId>,
    /// Value paid to each winner.
    pub awards: Vec<(PlayerId, u64)>,
    pub kind: ResolutionKind,
    /// The winning hand, when hands were ranked.
    pub best: Option<Evaluation>,
}

impl Showdown {
    /// Returns the value awarded to `id`, 0 if they won nothing.
    pub fn award_for(&self, id: PlayerId) -> u64 {
        self.awards.iter().find(|(p, _)| *p == id).map_or(0, |(_, v)| *v)
    }
}

/// Decide the winners and move the pot to them.
///
/// ```
/// use holdem_engine::chips::ChipStack;
/// use holdem_engine::game::GameState;
/// use holdem_engine::showdown::{resolve, ResolutionKind};
///
/// let stacks = vec![ChipStack::from_counts([(5, 10)]).unwrap(); 2];
/// let mut g = GameState::from_stacks(stacks, 5).unwrap();
/// g.player_mut(1).unwrap().set_folded(true);
/// g.pot_mut().add(5, 4).unwrap();
///
/// let result = resolve(&mut g).unwrap();
/// assert_eq!(result.kind, ResolutionKind::Uncontested);
/// assert_eq!(g.players()[0].stack(), 70);
/// assert!(g.pot().is_empty());
/// ```
pub fn resolve(state: &mut GameState) -> Result<Showdown, ShowdownError> {
    let active: Vec<usize> =
        state.players.iter().enumerate().filter(|(_, p)| !p.folded).map(|(i, _)| i).collect();

    let result = match active.as_slice() {
        [] => return Err(ShowdownError::NoActivePlayers),
        [only] => {
            let GameState { players, pot, .. } = &mut *state;
            let amount = pot.total();
            pot.transfer_all_to(&mut players[*only].chips);
            let id = players[*only].id;
            Showdown {
                winners: vec![id],
                awards: vec![(id, amount)],
                kind: ResolutionKind::Uncontested,
                best: None,
            }
        }
        contenders if !cards_available(state, contenders) => {
            log::debug!("too few cards out to rank hands; splitting the pot");
            let awards = split_pot(state, contenders)?;
            Showdown {
                winners: awards.iter().map(|(id, _)| *id).collect(),
                awards,
                kind: ResolutionKind::CardsUnavailable,
                best: None,
            }
        }
        contenders => {
            let mut ranked = Vec::with_capacity(contenders.len());
            for &seat in contenders {
                let mut cards = state.players[seat].hand.clone();
                cards.extend_from_slice(&state.community);
                ranked.push((seat, evaluate_hand(&cards)?));
            }
            // Stable, so ties stay in seat order.
            ranked.sort_by(|a, b| b.1.cmp(&a.1));
            let best = ranked[0].1;
            let winners: Vec<usize> =
                ranked.iter().take_while(|(_, e)| *e == best).map(|(seat, _)| *seat).collect();
            let awards = split_pot(state, &winners)?;
            Showdown {
                winners: awards.iter().map(|(id, _)| *id).collect(),
                awards,
                kind: ResolutionKind::Evaluated,
                best: Some(best),
            }
        }
    };

    state.phase = Phase::Showdown;
    let verb = if result.awards.len() > 1 { HistoryVerb::Split } else { HistoryVerb::Win };
    for &(id, amount) in &result.awards {
        match &result.best {
            Some(hand) => log::info!("{id} {} {amount} with {}", verb.label(), hand.name()),
            None => log::info!("{id} {} {amount}", verb.label()),
        }
        state.record(id, verb, Some(amount));
    }
    Ok(result)
}

/// Whether every contender has five cards to rank, counting the board.
fn cards_available(state: &GameState, contenders: &[usize]) -> bool {
    let board = state.community.len();
    let visible = contenders.iter().map(|&i| state.players[i].hand.len()).sum::<usize>() + board;
    visible >= 5 && contenders.iter().all(|&i| state.players[i].hand.len() + board >= 5)
}

/// Split the pot evenly across `seats`. What does not divide evenly goes one
/// unit at a time to the earliest seats in the list, where a unit is the
/// smallest value the pot's chips can be cut into at this table.
fn split_pot(state: &mut GameState, seats: &[usize]) -> Result<Vec<(PlayerId, u64)>, ChipError> {
    let GameState { players, pot, bank, .. } = &mut *state;
    let total = pot.total();
    let unit = pot
        .denominations()
        .chain(bank.denominations().iter().copied())
        .fold(0, gcd)
        .max(1);
    let count = seats.len() as u64;
    let share = total / unit / count;
    let extra = total / unit % count;

    let mut awards = Vec::with_capacity(seats.len());
    for (i, &seat) in seats.iter().enumerate() {
        let player = &mut players[seat];
        let amount = if i + 1 == seats.len() {
            let rest = pot.total();
            pot.transfer_all_to(&mut player.chips);
            rest
        } else {
            let amount = (share + u64::from((i as u64) < extra)) * unit;
            pot.transfer_with_exchange(&mut player.chips, amount, bank)?;
            amount
        };
        awards.push((player.id, amount));
    }
    Ok(awards)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
