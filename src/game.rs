use crate::cards::Card;
use crate::chips::{Bank, ChipError, ChipStack};
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::player::{Player, PlayerId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
    Win,
    Split,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::SmallBlind => "SB",
            HistoryVerb::BigBlind => "BB",
            HistoryVerb::Fold => "Fold",
            HistoryVerb::Check => "Check",
            HistoryVerb::Call => "Call",
            HistoryVerb::Raise => "Raise",
            HistoryVerb::AllIn => "All-in",
            HistoryVerb::Win => "Win",
            HistoryVerb::Split => "Split",
        }
    }
}

/// One line of the hand history. `amount` is the value of chips moved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub player: PlayerId,
    pub verb: HistoryVerb,
    pub amount: Option<u64>,
    pub phase: Phase,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("need at least 2 players, got {0}")]
    TooFewPlayers(usize),
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("cannot deal the {street}: {board} community cards already out")]
    OutOfOrder { street: &'static str, board: usize },
    #[error(transparent)]
    Chip(#[from] ChipError),
}

/// The mutable snapshot of one table: seats, pot, board, dealer button, deck.
///
/// Every chip movement goes through [`ChipStack`] transfers, so
/// [`GameState::total_chips`] is invariant across betting and payouts.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) blind_amount: u64,
    pub(crate) players: Vec<Player>,
    pub(crate) pot: ChipStack,
    pub(crate) community: Vec<Card>,
    pub(crate) burned: Vec<Card>,
    pub(crate) dealer: usize,
    pub(crate) phase: Phase,
    pub(crate) deck: Deck,
    pub(crate) bank: Bank,
    rng: ChaCha8Rng,
    history: Vec<HistoryEntry>,
}

impl GameState {
    pub fn new(config: &TableConfig) -> Result<Self, GameError> {
        let stack = config.starting_stack()?;
        let stacks = vec![stack; config.num_players];
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let state = Self::from_stacks(stacks, config.blind_amount)?
            .with_bank(config.bank()?)
            .with_seed(seed);
        Ok(state)
    }

    /// Seat one player per stack, in order. The deck is shuffled with seed 0
    /// until [`with_seed`](Self::with_seed) says otherwise.
    pub fn from_stacks(stacks: Vec<ChipStack>, blind_amount: u64) -> Result<Self, GameError> {
        if stacks.len() < 2 {
            return Err(GameError::TooFewPlayers(stacks.len()));
        }
        let players = stacks
            .into_iter()
            .enumerate()
            .map(|(seat, chips)| Player::new(PlayerId(seat as u32), seat, chips))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut rng);
        Ok(Self {
            blind_amount,
            players,
            pot: ChipStack::new(),
            community: Vec::new(),
            burned: Vec::new(),
            dealer: 0,
            phase: Phase::Preflop,
            deck,
            bank: Bank::default(),
            rng,
            history: Vec::new(),
        })
    }

    pub fn with_bank(mut self, bank: Bank) -> Self {
        self.bank = bank;
        self
    }

    /// Reseed the table RNG and start a fresh deck from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.new_deck();
        self
    }

    pub fn blind_amount(&self) -> u64 {
        self.blind_amount
    }

    pub fn big_blind(&self) -> u64 {
        self.blind_amount * 2
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn player_mut(&mut self, seat: usize) -> Option<&mut Player> {
        self.players.get_mut(seat)
    }

    pub fn player_by_id(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn pot(&self) -> &ChipStack {
        &self.pot
    }

    pub fn pot_mut(&mut self) -> &mut ChipStack {
        &mut self.pot
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }

    /// Replace the board outright, for replaying recorded hands and tests.
    pub fn set_community_cards(&mut self, cards: Vec<Card>) {
        self.community = cards;
    }

    pub fn burn_cards(&self) -> &[Card] {
        &self.burned
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The amount every player must match this betting round.
    pub fn current_bet(&self) -> u64 {
        self.players.iter().map(|p| p.bet).max().unwrap_or(0)
    }

    /// Players who have not folded, in seat order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| !p.folded)
    }

    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Value held by every player plus the pot.
    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(Player::stack).sum::<u64>() + self.pot.total()
    }

    pub(crate) fn reset_bets(&mut self) {
        for p in &mut self.players {
            p.bet = 0;
        }
    }

    pub(crate) fn record(&mut self, player: PlayerId, verb: HistoryVerb, amount: Option<u64>) {
        self.history.push(HistoryEntry { player, verb, amount, phase: self.phase });
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        self.deck.draw().ok_or(GameError::DeckExhausted)
    }

    fn new_deck(&mut self) {
        let mut deck = Deck::standard();
        deck.shuffle_with(&mut self.rng);
        self.deck = deck;
    }

    /// Cards one full hand uses: two per seat plus three burns and the board.
    pub fn cards_per_hand(&self) -> usize {
        self.players.len() * 2 + 8
    }

    /// Start a fresh shuffled deck when the current one runs low or could
    /// not finish a hand.
    pub fn refresh_deck_if_low(&mut self) -> bool {
        if self.deck.needs_refresh() || self.deck.len() < self.cards_per_hand() {
            log::debug!("{} cards left, reshuffling a fresh deck", self.deck.len());
            self.new_deck();
            return true;
        }
        false
    }

    /// Two hole cards to every seat, one at a time around the table.
    pub fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        for _ in 0..2 {
            for seat in 0..self.players.len() {
                let card = self.draw()?;
                self.players[seat].hand.push(card);
            }
        }
        self.phase = Phase::Preflop;
        Ok(())
    }

    pub fn deal_flop(&mut self) -> Result<(), GameError> {
        self.deal_street("flop", 0, 3, Phase::Flop)
    }

    pub fn deal_turn(&mut self) -> Result<(), GameError> {
        self.deal_street("turn", 3, 1, Phase::Turn)
    }

    pub fn deal_river(&mut self) -> Result<(), GameError> {
        self.deal_street("river", 4, 1, Phase::River)
    }

    fn deal_street(
        &mut self,
        street: &'static str,
        board_before: usize,
        count: usize,
        next: Phase,
    ) -> Result<(), GameError> {
        if self.community.len() != board_before {
            return Err(GameError::OutOfOrder { street, board: self.community.len() });
        }
        let burn = self.draw()?;
        self.burned.push(burn);
        for _ in 0..count {
            let card = self.draw()?;
            self.community.push(card);
        }
        self.phase = next;
        log::debug!(
            "dealt {street}: {}",
            self.community.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
        );
        Ok(())
    }

    /// Prepare for the next hand: clear cards, folds, bets and history, drop
    /// players with no chips (reseating the rest from 0), and pass the dealer
    /// button to the next surviving player.
    pub fn reset_round(&mut self) {
        for p in &mut self.players {
            p.hand.clear();
            p.folded = false;
            p.bet = 0;
        }
        self.community.clear();
        self.burned.clear();
        self.history.clear();
        self.phase = Phase::Preflop;
        if !self.pot.is_empty() {
            log::warn!("pot of {} carried into the next hand", self.pot.total());
        }

        let n = self.players.len();
        let next_dealer = (1..=n)
            .map(|k| (self.dealer + k) % n)
            .find(|&i| !self.players[i].chips.is_empty())
            .map(|i| self.players[i].id);

        let before = self.players.len();
        self.players.retain(|p| !p.chips.is_empty());
        if self.players.len() < before {
            log::info!("removed {} busted player(s)", before - self.players.len());
        }
        for (seat, p) in self.players.iter_mut().enumerate() {
            p.seat = seat;
        }
        self.dealer = next_dealer
            .and_then(|id| self.players.iter().position(|p| p.id == id))
            .unwrap_or(0);
    }
}
