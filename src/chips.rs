//! Denomination-exact chip accounting.
//!
//! A [`ChipStack`] holds physical chips: a count per denomination. Transfers
//! move specific chips from one stack to another, so value is never created
//! or destroyed and the set of denominations in play is preserved.

use std::collections::BTreeMap;
use std::fmt;

/// Upper bound on chip-breaking rounds in [`ChipStack::transfer_with_exchange`].
pub const MAX_EXCHANGE_ATTEMPTS: usize = 16;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChipError {
    #[error("chip denomination must be positive")]
    InvalidDenomination,
    #[error("not enough {denomination}-value chips: have {have}, need {need}")]
    InsufficientChips { denomination: u64, have: u64, need: u64 },
    #[error("not enough chips: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
    #[error("cannot make exact change for {amount} with the chips held")]
    ExactChangeUnavailable { amount: u64 },
}

/// The fixed list of denominations the table can exchange chips into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    denominations: Vec<u64>,
}

impl Bank {
    /// Build a bank from any list of denominations; duplicates are collapsed.
    pub fn new<I: IntoIterator<Item = u64>>(denominations: I) -> Result<Self, ChipError> {
        let mut denominations: Vec<u64> = denominations.into_iter().collect();
        if denominations.contains(&0) {
            return Err(ChipError::InvalidDenomination);
        }
        denominations.sort_unstable();
        denominations.dedup();
        Ok(Self { denominations })
    }

    /// Denominations in ascending order.
    pub fn denominations(&self) -> &[u64] {
        &self.denominations
    }

    /// The largest bank denomination below `denom` that divides it evenly.
    fn split_target(&self, denom: u64) -> Option<u64> {
        self.denominations.iter().rev().copied().find(|&d| d < denom && denom % d == 0)
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self { denominations: vec![5, 25, 100] }
    }
}

/// A holder of physical chips: the pot, or one player's stack.
///
/// Equality is structural: two stacks are equal only when they hold the same
/// count of every denomination, not merely the same total.
///
/// ```
/// use holdem_engine::chips::ChipStack;
///
/// let mut stack = ChipStack::from_counts([(5, 4), (25, 2)]).unwrap();
/// let mut pot = ChipStack::new();
/// stack.transfer_to(&mut pot, 35).unwrap();
/// assert_eq!(pot, ChipStack::from_counts([(25, 1), (5, 2)]).unwrap());
/// assert_eq!(stack.total(), 35);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipStack {
    chips: BTreeMap<u64, u64>,
}

impl ChipStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts<I>(counts: I) -> Result<Self, ChipError>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut stack = Self::new();
        for (denom, qty) in counts {
            stack.add(denom, qty)?;
        }
        Ok(stack)
    }

    pub fn add(&mut self, denom: u64, qty: u64) -> Result<(), ChipError> {
        if denom == 0 {
            return Err(ChipError::InvalidDenomination);
        }
        if qty > 0 {
            *self.chips.entry(denom).or_insert(0) += qty;
        }
        Ok(())
    }

    pub fn remove(&mut self, denom: u64, qty: u64) -> Result<(), ChipError> {
        if denom == 0 {
            return Err(ChipError::InvalidDenomination);
        }
        if qty == 0 {
            return Ok(());
        }
        let have = self.count(denom);
        if have < qty {
            return Err(ChipError::InsufficientChips { denomination: denom, have, need: qty });
        }
        if have == qty {
            self.chips.remove(&denom);
        } else {
            self.chips.insert(denom, have - qty);
        }
        Ok(())
    }

    pub fn count(&self, denom: u64) -> u64 {
        self.chips.get(&denom).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.chips.iter().map(|(d, c)| d * c).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// `(denomination, count)` pairs in ascending denomination order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, u64)> + '_ {
        self.chips.iter().map(|(&d, &c)| (d, c))
    }

    /// Denominations currently held, ascending.
    pub fn denominations(&self) -> impl Iterator<Item = u64> + '_ {
        self.chips.keys().copied()
    }

    /// Move exactly `amount` in value to `other`, preferring large chips.
    ///
    /// Fails without touching either stack when `amount` exceeds the total or
    /// when no combination of held chips sums to it.
    pub fn transfer_to(&mut self, other: &mut ChipStack, amount: u64) -> Result<(), ChipError> {
        self.ensure_funds(amount)?;
        if amount == 0 {
            return Ok(());
        }
        let plan = self.plan(amount).ok_or(ChipError::ExactChangeUnavailable { amount })?;
        self.apply(plan, other);
        Ok(())
    }

    /// Move every chip to `other`.
    pub fn transfer_all_to(&mut self, other: &mut ChipStack) {
        for (denom, qty) in std::mem::take(&mut self.chips) {
            *other.chips.entry(denom).or_insert(0) += qty;
        }
    }

    /// Like [`transfer_to`](Self::transfer_to), but when exact change is not
    /// possible, break held chips into smaller bank denominations one at a
    /// time and retry, up to [`MAX_EXCHANGE_ATTEMPTS`] times.
    ///
    /// ```
    /// use holdem_engine::chips::{Bank, ChipStack};
    ///
    /// let mut stack = ChipStack::from_counts([(25, 2)]).unwrap();
    /// let mut pot = ChipStack::new();
    /// assert!(stack.transfer_to(&mut pot, 10).is_err());
    /// stack.transfer_with_exchange(&mut pot, 10, &Bank::default()).unwrap();
    /// assert_eq!(pot.total(), 10);
    /// assert_eq!(stack.total(), 40);
    /// ```
    pub fn transfer_with_exchange(
        &mut self,
        other: &mut ChipStack,
        amount: u64,
        bank: &Bank,
    ) -> Result<(), ChipError> {
        match self.transfer_to(other, amount) {
            Err(ChipError::ExactChangeUnavailable { .. }) => {}
            done => return done,
        }
        let mut working = self.clone();
        for attempt in 1..=MAX_EXCHANGE_ATTEMPTS {
            let Some((from, into)) = working.break_one(bank) else {
                break;
            };
            log::debug!("exchange #{attempt}: broke one {from} into {into}s to pay {amount}");
            if let Some(plan) = working.plan(amount) {
                *self = working;
                self.apply(plan, other);
                return Ok(());
            }
        }
        Err(ChipError::ExactChangeUnavailable { amount })
    }

    fn ensure_funds(&self, amount: u64) -> Result<(), ChipError> {
        let have = self.total();
        if amount > have {
            return Err(ChipError::InsufficientFunds { have, need: amount });
        }
        Ok(())
    }

    fn apply(&mut self, plan: Vec<(u64, u64)>, other: &mut ChipStack) {
        for (denom, qty) in plan {
            // The plan never takes more than is held.
            let left = self.count(denom) - qty;
            if left == 0 {
                self.chips.remove(&denom);
            } else {
                self.chips.insert(denom, left);
            }
            *other.chips.entry(denom).or_insert(0) += qty;
        }
    }

    /// Largest-first decomposition of `amount` over the current inventory.
    fn plan(&self, amount: u64) -> Option<Vec<(u64, u64)>> {
        let inventory: Vec<(u64, u64)> = self.iter().rev().collect();
        let mut reach = vec![0u64; inventory.len() + 1];
        for i in (0..inventory.len()).rev() {
            reach[i] = reach[i + 1] + inventory[i].0 * inventory[i].1;
        }
        let mut picked = Vec::with_capacity(inventory.len());
        if decompose(&inventory, &reach, amount, &mut picked) {
            Some(picked)
        } else {
            None
        }
    }

    /// Replace one chip of the smallest breakable denomination with smaller
    /// chips of equal total value. Returns the `(from, into)` denominations.
    fn break_one(&mut self, bank: &Bank) -> Option<(u64, u64)> {
        let (from, into) =
            self.chips.keys().find_map(|&d| bank.split_target(d).map(|into| (d, into)))?;
        let left = self.count(from) - 1;
        if left == 0 {
            self.chips.remove(&from);
        } else {
            self.chips.insert(from, left);
        }
        *self.chips.entry(into).or_insert(0) += from / into;
        Some((from, into))
    }
}

/// Depth-first search over denominations (largest first), taking as many of
/// each as possible before backing off. `reach[i]` is the value held in
/// `inventory[i..]`, used to prune branches that cannot reach the target.
fn decompose(
    inventory: &[(u64, u64)],
    reach: &[u64],
    remaining: u64,
    picked: &mut Vec<(u64, u64)>,
) -> bool {
    if remaining == 0 {
        return true;
    }
    let Some((&(denom, held), rest)) = inventory.split_first() else {
        return false;
    };
    if remaining > reach[0] {
        return false;
    }
    let most = held.min(remaining / denom);
    for take in (0..=most).rev() {
        let left = remaining - take * denom;
        if left > reach[1] {
            // Taking fewer only leaves more behind.
            break;
        }
        if take > 0 {
            picked.push((denom, take));
        }
        if decompose(rest, &reach[1..], left, picked) {
            return true;
        }
        if take > 0 {
            picked.pop();
        }
    }
    false
}

impl fmt::Display for ChipStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        let parts: Vec<String> = self.iter().map(|(d, c)| format!("{c}×${d}")).collect();
        write!(f, "{} (total ${})", parts.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(counts: &[(u64, u64)]) -> ChipStack {
        ChipStack::from_counts(counts.iter().copied()).expect("valid chips")
    }

    #[test]
    fn add_and_remove_keep_counts_positive() {
        let mut s = ChipStack::new();
        s.add(5, 3).unwrap();
        s.add(5, 0).unwrap();
        assert_eq!(s.count(5), 3);
        s.remove(5, 3).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.iter().count(), 0, "emptied denomination is dropped");
    }

    #[test]
    fn zero_denomination_is_rejected() {
        let mut s = ChipStack::new();
        assert_eq!(s.add(0, 1), Err(ChipError::InvalidDenomination));
        assert_eq!(s.remove(0, 1), Err(ChipError::InvalidDenomination));
    }

    #[test]
    fn remove_more_than_held_fails() {
        let mut s = stack(&[(25, 1)]);
        assert_eq!(
            s.remove(25, 2),
            Err(ChipError::InsufficientChips { denomination: 25, have: 1, need: 2 })
        );
        assert_eq!(s.count(25), 1);
    }

    #[test]
    fn equality_is_structural() {
        assert_ne!(stack(&[(5, 5)]), stack(&[(25, 1)]));
        assert_eq!(stack(&[(5, 2), (25, 1)]), stack(&[(25, 1), (5, 2)]));
    }

    #[test]
    fn transfer_prefers_large_chips() {
        let mut s = stack(&[(5, 10), (25, 4), (100, 2)]);
        let mut pot = ChipStack::new();
        s.transfer_to(&mut pot, 130).unwrap();
        assert_eq!(pot, stack(&[(100, 1), (25, 1), (5, 1)]));
        assert_eq!(s.total(), 350 - 130);
    }

    #[test]
    fn transfer_backs_off_when_greedy_overshoots() {
        let mut s = stack(&[(25, 1), (10, 3)]);
        let mut pot = ChipStack::new();
        s.transfer_to(&mut pot, 30).unwrap();
        assert_eq!(pot, stack(&[(10, 3)]));
        assert_eq!(s, stack(&[(25, 1)]));
    }

    #[test]
    fn transfer_without_exact_change_fails_atomically() {
        let mut s = stack(&[(25, 2)]);
        let mut pot = ChipStack::new();
        assert_eq!(
            s.transfer_to(&mut pot, 10),
            Err(ChipError::ExactChangeUnavailable { amount: 10 })
        );
        assert_eq!(s, stack(&[(25, 2)]));
        assert!(pot.is_empty());
    }

    #[test]
    fn transfer_more_than_total_fails() {
        let mut s = stack(&[(5, 1)]);
        let mut pot = ChipStack::new();
        assert_eq!(
            s.transfer_to(&mut pot, 10),
            Err(ChipError::InsufficientFunds { have: 5, need: 10 })
        );
    }

    #[test]
    fn exchange_breaks_chips_until_payable() {
        let mut s = stack(&[(100, 1)]);
        let mut pot = ChipStack::new();
        s.transfer_with_exchange(&mut pot, 30, &Bank::default()).unwrap();
        assert_eq!(pot.total(), 30);
        assert_eq!(s.total(), 70);
    }

    #[test]
    fn exchange_gives_up_on_unreachable_amounts() {
        let mut s = stack(&[(25, 2)]);
        let mut pot = ChipStack::new();
        let err = s.transfer_with_exchange(&mut pot, 3, &Bank::default()).unwrap_err();
        assert_eq!(err, ChipError::ExactChangeUnavailable { amount: 3 });
        assert_eq!(s, stack(&[(25, 2)]), "failed exchange leaves the stack untouched");
    }

    #[test]
    fn transfer_all_moves_everything() {
        let mut s = stack(&[(5, 3), (100, 1)]);
        let mut pot = stack(&[(5, 1)]);
        s.transfer_all_to(&mut pot);
        assert!(s.is_empty());
        assert_eq!(pot, stack(&[(5, 4), (100, 1)]));
    }

    #[test]
    fn bank_split_target_divides_evenly() {
        let bank = Bank::new([1, 5, 25, 100]).unwrap();
        assert_eq!(bank.split_target(100), Some(25));
        assert_eq!(bank.split_target(25), Some(5));
        assert_eq!(bank.split_target(1), None);
        assert!(Bank::new([0, 5]).is_err());
    }

    #[test]
    fn display_lists_denominations() {
        assert_eq!(ChipStack::new().to_string(), "empty");
        assert_eq!(stack(&[(5, 2), (25, 1)]).to_string(), "2×$5, 1×$25 (total $35)");
    }

    #[test]
    fn plan_walks_denominations_largest_first() {
        let s = stack(&[(5, 3), (25, 2), (100, 1)]);
        let desc: Vec<(u64, u64)> = s.iter().rev().collect();
        assert_eq!(desc, vec![(100, 1), (25, 2), (5, 3)]);
        assert_eq!(s.plan(130), Some(vec![(100, 1), (25, 1), (5, 1)]));
        assert_eq!(s.plan(7), None);
    }
}
