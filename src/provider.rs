//! Action providers: whatever answers "what does this seat do now?".
//!
//! A provider sees the table and the acting player and replies with action
//! text (`fold`, `check`, `call`, `raise <n>`, `allin`). The betting engine
//! parses and validates the reply, asking again when it is not acceptable, so
//! providers can be a terminal prompt, a network peer, or a trained policy.

use crate::action::Action;
use crate::game::GameState;
use crate::player::{Player, PlayerId};
use core::fmt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};

/// Supplies the next action for a seat. Called synchronously; a provider that
/// never returns stalls the table.
pub trait ActionProvider {
    fn decide(&mut self, state: &GameState, player: &Player) -> String;
}

impl<F> ActionProvider for F
where
    F: FnMut(&GameState, &Player) -> String,
{
    fn decide(&mut self, state: &GameState, player: &Player) -> String {
        self(state, player)
    }
}

/// Always answers with the same action.
#[derive(Debug, Clone, Copy)]
pub struct Always(pub Action);

impl ActionProvider for Always {
    fn decide(&mut self, _state: &GameState, _player: &Player) -> String {
        self.0.to_string()
    }
}

/// Replays a fixed list of replies, then answers with a fallback (`fold`
/// unless changed).
#[derive(Debug, Clone)]
pub struct Scripted {
    script: VecDeque<String>,
    fallback: String,
}

impl Scripted {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { script: replies.into_iter().map(Into::into).collect(), fallback: "fold".into() }
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = reply.into();
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ActionProvider for Scripted {
    fn decide(&mut self, _state: &GameState, _player: &Player) -> String {
        self.script.pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

/// A loose random policy for simulations and smoke tests.
///
/// Facing a bet it calls or raises with equal odds; otherwise it mostly
/// checks or bets, folding occasionally. Bet sizes are whole multiples of the
/// table's smallest bank denomination.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    fn raise_between(&mut self, unit: u64, max: u64) -> Option<u64> {
        let steps = max / unit;
        if steps == 0 {
            return None;
        }
        Some(self.rng.random_range(1..=steps) * unit)
    }
}

impl ActionProvider for RandomPolicy {
    fn decide(&mut self, state: &GameState, player: &Player) -> String {
        let unit = state.bank().denominations().first().copied().unwrap_or(1);
        let to_call = state.current_bet().saturating_sub(player.bet());
        let stack = player.stack();

        let action = if to_call > 0 {
            if self.rng.random_bool(0.5) {
                Action::Call
            } else {
                match self.raise_between(unit, stack.saturating_sub(to_call)) {
                    Some(n) => Action::Raise(n),
                    None => Action::Call,
                }
            }
        } else {
            let roll: f64 = self.rng.random();
            if roll < 0.475 {
                Action::Check
            } else if roll < 0.95 {
                let fraction = self.rng.random_range(0.05..0.25);
                let cap = ((stack as f64) * fraction) as u64;
                match self.raise_between(unit, cap.max(unit).min(stack)) {
                    Some(n) => Action::Raise(n),
                    None => Action::Check,
                }
            } else {
                Action::Fold
            }
        };
        action.to_string()
    }
}

/// Prompts on a writer and reads one line per decision. End of input and I/O
/// failures answer `fold`.
pub struct ConsoleProvider<R, W> {
    input: R,
    output: W,
}

impl ConsoleProvider<io::BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, state: &GameState, player: &Player) -> io::Result<String> {
        writeln!(
            self.output,
            "Pot: {} | Current bet to match: {}",
            state.pot().total(),
            state.current_bet()
        )?;
        write!(
            self.output,
            "{} (chips={}, bet={}) action [fold/check/call/raise <amt>/allin]: ",
            player.name(),
            player.stack(),
            player.bet()
        )?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Action::Fold.to_string());
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> ActionProvider for ConsoleProvider<R, W> {
    fn decide(&mut self, state: &GameState, player: &Player) -> String {
        self.prompt(state, player).unwrap_or_else(|e| {
            log::warn!("console input failed for {}: {e}", player.name());
            Action::Fold.to_string()
        })
    }
}

/// Maps players to providers. Players without an entry use the fallback.
pub struct ProviderTable {
    providers: HashMap<PlayerId, Box<dyn ActionProvider>>,
    fallback: Box<dyn ActionProvider>,
}

impl fmt::Debug for ProviderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&PlayerId> = self.providers.keys().collect();
        ids.sort();
        f.debug_struct("ProviderTable").field("assigned", &ids).finish_non_exhaustive()
    }
}

impl ProviderTable {
    pub fn new(fallback: impl ActionProvider + 'static) -> Self {
        Self { providers: HashMap::new(), fallback: Box::new(fallback) }
    }

    /// Every seat reads from the terminal unless assigned otherwise.
    pub fn console() -> Self {
        Self::new(ConsoleProvider::stdio())
    }

    pub fn with(mut self, id: PlayerId, provider: impl ActionProvider + 'static) -> Self {
        self.set(id, provider);
        self
    }

    pub fn set(&mut self, id: PlayerId, provider: impl ActionProvider + 'static) {
        self.providers.insert(id, Box::new(provider));
    }

    pub fn remove(&mut self, id: PlayerId) -> bool {
        self.providers.remove(&id).is_some()
    }

    pub fn has_provider(&self, id: PlayerId) -> bool {
        self.providers.contains_key(&id)
    }

    pub(crate) fn provider_for(&mut self, id: PlayerId) -> &mut dyn ActionProvider {
        match self.providers.get_mut(&id) {
            Some(p) => p.as_mut(),
            None => self.fallback.as_mut(),
        }
    }
}
