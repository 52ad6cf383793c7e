use crate::cards::Card;
use crate::chips::ChipStack;
use std::fmt;

/// Stable identity of a player. Unlike the seat, it never changes when
/// busted players are removed from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) seat: usize,
    pub(crate) name: String,
    pub(crate) chips: ChipStack,
    pub(crate) hand: Vec<Card>,
    pub(crate) folded: bool,
    pub(crate) bet: u64,
}

impl Player {
    pub fn new(id: PlayerId, seat: usize, chips: ChipStack) -> Self {
        Self {
            id,
            seat,
            name: format!("Player {}", id.0),
            chips,
            hand: Vec::new(),
            folded: false,
            bet: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Seat ordinal; contiguous from 0 across the table.
    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chips(&self) -> &ChipStack {
        &self.chips
    }

    /// Mutable access to the stack, for seeding scenarios and tests.
    pub fn chips_mut(&mut self) -> &mut ChipStack {
        &mut self.chips
    }

    pub fn stack(&self) -> u64 {
        self.chips.total()
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn set_hand(&mut self, cards: Vec<Card>) {
        self.hand = cards;
    }

    pub fn is_folded(&self) -> bool {
        self.folded
    }

    pub fn set_folded(&mut self, folded: bool) {
        self.folded = folded;
    }

    /// Chips committed in the current betting round.
    pub fn bet(&self) -> u64 {
        self.bet
    }

    /// Still in the hand and holding chips, so able to act.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.chips.is_empty()
    }

    pub fn is_all_in(&self) -> bool {
        !self.folded && self.chips.is_empty()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.folded {
            write!(f, "{} (seat {}): folded", self.name, self.seat)
        } else {
            let stack = self.stack();
            write!(f, "{} (seat {}): bet {}, stack {stack}", self.name, self.seat, self.bet)
        }
    }
}
