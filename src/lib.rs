//! holdem-engine: a Texas Hold'em rules engine
//!
//! Goals:
//! - Deterministic, auditable hands: seeded shuffles, a recorded action history
//! - Chip accounting by denomination, so value is never created or lost
//! - Input from anywhere: every decision goes through an [`provider::ActionProvider`]
//! - No panics for bad input; malformed actions are asked again, the rest is a `Result`
//!
//! ## Quick start: play one hand
//! ```
//! use holdem_engine::action::Action;
//! use holdem_engine::config::TableConfig;
//! use holdem_engine::engine::Engine;
//! use holdem_engine::provider::{Always, ProviderTable};
//!
//! let config = TableConfig { seed: Some(7), ..TableConfig::default() };
//! let mut engine = Engine::new(&config, ProviderTable::new(Always(Action::Call)))?;
//! let chips = engine.state().total_chips();
//!
//! let hand = engine.play_hand()?;
//! assert!(!hand.showdown.winners.is_empty());
//! assert_eq!(engine.state().total_chips(), chips);
//! # Ok::<(), holdem_engine::engine::EngineError>(())
//! ```
//!
//! ## Simulator
//! Run bot-only hands with:
//! ```sh
//! RUST_LOG=info cargo run --bin holdem-sim -- --hands 10 --seed 1
//! ```

pub mod action;
pub mod betting;
pub mod cards;
pub mod chips;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod player;
pub mod provider;
pub mod showdown;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
