// Hand orchestration. `Engine` owns one table and its providers and drives a
// hand through dealing, the four betting rounds, the showdown and the reset.
// The step methods can also be called one at a time by drivers that want to
// inspect the table between streets.

use crate::betting::{self, BettingError, RoundSummary};
use crate::cards::Card;
use crate::config::{ConfigError, TableConfig};
use crate::game::{GameError, GameState, HistoryEntry};
use crate::provider::ProviderTable;
use crate::showdown::{self, Showdown, ShowdownError};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Betting(#[from] BettingError),
    #[error(transparent)]
    Showdown(#[from] ShowdownError),
}

/// What happened in one complete hand.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct HandResult {
    pub showdown: Showdown,
    /// The board as it stood at the showdown.
    pub board: Vec<Card>,
    /// Blinds, actions and awards, in order.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug)]
pub struct Engine {
    state: GameState,
    providers: ProviderTable,
    hands_played: u64,
}

impl Engine {
    pub fn new(config: &TableConfig, providers: ProviderTable) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::from_state(GameState::new(config)?, providers))
    }

    pub fn from_state(state: GameState, providers: ProviderTable) -> Self {
        Self { state, providers, hands_played: 0 }
    }

    /// Returns the table.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn providers_mut(&mut self) -> &mut ProviderTable {
        &mut self.providers
    }

    /// Returns the number of hands completed with [`play_hand`](Self::play_hand).
    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Fewer than two players hold chips, so no further hand can be dealt.
    pub fn is_finished(&self) -> bool {
        self.state.players().iter().filter(|p| p.stack() > 0).count() < 2
    }

    /// Refresh the deck if needed and deal hole cards.
    pub fn deal(&mut self) -> Result<(), EngineError> {
        self.state.refresh_deck_if_low();
        self.state.deal_hole_cards()?;
        Ok(())
    }

    pub fn preflop(&mut self) -> Result<RoundSummary, EngineError> {
        Ok(betting::preflop_round(&mut self.state, &mut self.providers)?)
    }

    /// Deal the flop and run its betting round.
    pub fn flop(&mut self) -> Result<RoundSummary, EngineError> {
        self.state.deal_flop()?;
        self.postflop()
    }

    /// Deal the turn and run its betting round.
    pub fn turn(&mut self) -> Result<RoundSummary, EngineError> {
        self.state.deal_turn()?;
        self.postflop()
    }

    /// Deal the river and run its betting round.
    pub fn river(&mut self) -> Result<RoundSummary, EngineError> {
        self.state.deal_river()?;
        self.postflop()
    }

    fn postflop(&mut self) -> Result<RoundSummary, EngineError> {
        Ok(betting::postflop_round(&mut self.state, &mut self.providers)?)
    }

    pub fn showdown(&mut self) -> Result<Showdown, EngineError> {
        Ok(showdown::resolve(&mut self.state)?)
    }

    /// Clear the hand, drop busted players and move the button.
    pub fn next_round(&mut self) {
        self.state.reset_round();
    }

    /// Play one hand start to finish. Once betting leaves a single player,
    /// no more streets are dealt and that player takes the pot.
    pub fn play_hand(&mut self) -> Result<HandResult, EngineError> {
        let players = self.state.players().len();
        if players < 2 {
            return Err(GameError::TooFewPlayers(players).into());
        }
        let dealer = &self.state.players()[self.state.dealer_index()];
        log::info!("hand {} starts, {} has the button", self.hands_played + 1, dealer.name());

        self.deal()?;
        let mut summary = self.preflop()?;
        let streets: [fn(&mut Self) -> Result<RoundSummary, EngineError>; 3] =
            [Self::flop, Self::turn, Self::river];
        for street in streets {
            if summary.is_uncontested() {
                break;
            }
            summary = street(self)?;
        }

        let showdown = self.showdown()?;
        let result = HandResult {
            showdown,
            board: self.state.community_cards().to_vec(),
            history: self.state.history().to_vec(),
        };
        self.next_round();
        self.hands_played += 1;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::player::PlayerId;
    use crate::provider::{Always, Scripted};
    use crate::showdown::ResolutionKind;

    fn mk_engine(providers: ProviderTable) -> Engine {
        let config = TableConfig { seed: Some(42), ..TableConfig::default() };
        Engine::new(&config, providers).unwrap()
    }

    #[test]
    fn calling_station_hand_reaches_the_river() {
        let mut e = mk_engine(ProviderTable::new(Always(Action::Call)));
        let before = e.state().total_chips();
        let result = e.play_hand().unwrap();
        assert_eq!(result.board.len(), 5);
        assert_eq!(result.showdown.kind, ResolutionKind::Evaluated);
        assert_eq!(e.state().total_chips(), before);
        assert_eq!(e.hands_played(), 1);
        assert!(e.state().community_cards().is_empty());
    }

    #[test]
    fn folds_end_the_hand_before_the_flop() {
        let providers = ProviderTable::new(Always(Action::Fold))
            .with(PlayerId(0), Scripted::new(["raise 40"]));
        let mut e = mk_engine(providers);
        let result = e.play_hand().unwrap();
        assert!(result.board.is_empty());
        assert_eq!(result.showdown.kind, ResolutionKind::Uncontested);
        assert_eq!(result.showdown.winners, vec![PlayerId(0)]);
        // Blinds 20 + 40 went to the raiser.
        assert_eq!(e.state().players()[0].stack(), 3500 + 60);
    }

    #[test]
    fn button_moves_each_hand() {
        let mut e = mk_engine(ProviderTable::new(Always(Action::Call)));
        assert_eq!(e.state().dealer_index(), 0);
        e.play_hand().unwrap();
        assert_eq!(e.state().dealer_index(), 1);
    }

    #[test]
    fn step_methods_enforce_street_order() {
        let mut e = mk_engine(ProviderTable::new(Always(Action::Call)));
        e.deal().unwrap();
        e.preflop().unwrap();
        assert!(matches!(e.turn(), Err(EngineError::Game(GameError::OutOfOrder { .. }))));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TableConfig { num_players: 1, ..TableConfig::default() };
        let err = Engine::new(&config, ProviderTable::new(Always(Action::Fold))).unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::Invalid(_))));
    }
}
