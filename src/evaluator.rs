use crate::cards::Card;
use core::cmp::Ordering;
use std::fmt;

/// Hand category. Codes run from 1 (High Card) to 9 (Straight Flush).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
}

impl Category {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Category> {
        let c = match code {
            1 => Category::HighCard,
            2 => Category::OnePair,
            3 => Category::TwoPair,
            4 => Category::ThreeOfAKind,
            5 => Category::Straight,
            6 => Category::Flush,
            7 => Category::FullHouse,
            8 => Category::FourOfAKind,
            9 => Category::StraightFlush,
            _ => return None,
        };
        Some(c)
    }

    pub fn name(self) -> &'static str {
        hand_category_name(self.code())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display name for a category code.
///
/// ```
/// use holdem_engine::evaluator::hand_category_name;
///
/// assert_eq!(hand_category_name(7), "Full House");
/// assert_eq!(hand_category_name(0), "Unknown");
/// ```
pub fn hand_category_name(code: u8) -> &'static str {
    match code {
        9 => "Straight Flush",
        8 => "Four of a Kind",
        7 => "Full House",
        6 => "Flush",
        5 => "Straight",
        4 => "Three of a Kind",
        3 => "Two Pair",
        2 => "One Pair",
        1 => "High Card",
        _ => "Unknown",
    }
}

/// Packed, totally ordered hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

impl HandValue {
    // [ category (8) | t0 (6) | t1 (6) | t2 (6) | t3 (6) | t4 (6) | 10 zero bits ]
    const CAT_SHIFT: u32 = 48;
    const STRIDE: u32 = 6;

    fn pack(category: Category, tiebreaks: &[u8]) -> Self {
        let mut v = (category.code() as u64) << Self::CAT_SHIFT;
        for (i, t) in tiebreaks.iter().enumerate() {
            v |= (*t as u64) << (Self::CAT_SHIFT - Self::STRIDE * (i as u32 + 1));
        }
        HandValue(v)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("need at least 5 cards to evaluate, got {got}")]
    InsufficientCards { got: usize },
}

/// Result of scoring a hand: its category, the ordered tiebreak ranks, and
/// the five cards that produced it. Ordering compares category first, then
/// tiebreaks left to right.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub category: Category,
    pub best_five: [Card; 5],
    tiebreaks: [u8; 5],
    tiebreak_len: u8,
    value: HandValue,
}

impl Evaluation {
    fn new(category: Category, best_five: [Card; 5], ranks: &[u8]) -> Self {
        let mut tiebreaks = [0u8; 5];
        tiebreaks[..ranks.len()].copy_from_slice(ranks);
        Self {
            category,
            best_five,
            tiebreaks,
            tiebreak_len: ranks.len() as u8,
            value: HandValue::pack(category, ranks),
        }
    }

    /// Tiebreak rank values in significance order.
    pub fn tiebreaks(&self) -> &[u8] {
        &self.tiebreaks[..self.tiebreak_len as usize]
    }

    pub const fn value(&self) -> HandValue {
        self.value
    }

    pub fn name(&self) -> &'static str {
        self.category.name()
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

/// Index sets for every 5-element subset of `0..n`, in lexicographic order.
#[derive(Debug, Clone)]
pub struct FiveCardSubsets {
    n: usize,
    indices: [usize; 5],
    done: bool,
}

impl FiveCardSubsets {
    pub fn new(n: usize) -> Self {
        Self { n, indices: [0, 1, 2, 3, 4], done: n < 5 }
    }
}

impl Iterator for FiveCardSubsets {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let out = self.indices;
        // Find the rightmost index that can still move right.
        let mut i = 5;
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            if self.indices[i] < self.n - 5 + i {
                self.indices[i] += 1;
                for j in (i + 1)..5 {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                break;
            }
        }
        Some(out)
    }
}

/// Best five-card hand from any number (at least five) of cards.
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::evaluator::{evaluate_hand, Category};
///
/// let seven = parse_cards("AH AD KC QD JH 3S 2C").unwrap();
/// let eval = evaluate_hand(&seven).unwrap();
/// assert_eq!(eval.category, Category::OnePair);
/// assert_eq!(eval.tiebreaks(), &[14, 13, 12, 11]);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Result<Evaluation, EvalError> {
    if cards.len() < 5 {
        return Err(EvalError::InsufficientCards { got: cards.len() });
    }
    FiveCardSubsets::new(cards.len())
        .map(|[a, b, c, d, e]| evaluate_five(&[cards[a], cards[b], cards[c], cards[d], cards[e]]))
        .max()
        .ok_or(EvalError::InsufficientCards { got: cards.len() })
}

/// Distinct ranks ascending form five consecutive values, or exactly A-2-3-4-5.
/// Returns the straight's high card (5 for the wheel).
fn straight_high(distinct_asc: &[u8]) -> Option<u8> {
    if distinct_asc.len() != 5 {
        return None;
    }
    if distinct_asc == [2, 3, 4, 5, 14] {
        return Some(5);
    }
    if distinct_asc.windows(2).all(|w| w[1] == w[0] + 1) {
        return Some(distinct_asc[4]);
    }
    None
}

/// Score exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    let mut sorted = *cards;
    sorted.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));
    let desc: Vec<u8> = sorted.iter().map(|c| c.rank().value()).collect();

    let mut counts = [0u8; 15];
    for &r in &desc {
        counts[r as usize] += 1;
    }
    let mut distinct_asc: Vec<u8> = (2u8..=14).filter(|&r| counts[r as usize] > 0).collect();
    distinct_asc.sort_unstable();

    let is_flush = sorted.iter().all(|c| c.suit() == sorted[0].suit());
    let straight = straight_high(&distinct_asc);

    if let (true, Some(high)) = (is_flush, straight) {
        return Evaluation::new(Category::StraightFlush, sorted, &[high]);
    }

    // (rank, count) ordered by count then rank, both descending
    let mut groups: Vec<(u8, u8)> =
        distinct_asc.iter().rev().map(|&r| (r, counts[r as usize])).collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    let shape: Vec<u8> = groups.iter().map(|g| g.1).collect();
    let ranks: Vec<u8> = groups.iter().map(|g| g.0).collect();

    match (shape.as_slice(), straight) {
        ([4, 1], _) => Evaluation::new(Category::FourOfAKind, sorted, &ranks),
        ([3, 2], _) => Evaluation::new(Category::FullHouse, sorted, &ranks),
        _ if is_flush => Evaluation::new(Category::Flush, sorted, &desc),
        (_, Some(high)) => Evaluation::new(Category::Straight, sorted, &[high]),
        ([3, 1, 1], _) => Evaluation::new(Category::ThreeOfAKind, sorted, &ranks),
        ([2, 2, 1], _) => Evaluation::new(Category::TwoPair, sorted, &ranks),
        ([2, 1, 1, 1], _) => Evaluation::new(Category::OnePair, sorted, &ranks),
        _ => Evaluation::new(Category::HighCard, sorted, &desc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn five(s: &str) -> Evaluation {
        let cards = parse_cards(s).expect("valid cards");
        evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]])
    }

    #[test]
    fn subsets_of_seven_number_twenty_one() {
        let all: Vec<[usize; 5]> = FiveCardSubsets::new(7).collect();
        assert_eq!(all.len(), 21);
        assert_eq!(all[0], [0, 1, 2, 3, 4]);
        assert_eq!(all[20], [2, 3, 4, 5, 6]);
        assert_eq!(FiveCardSubsets::new(5).count(), 1);
        assert_eq!(FiveCardSubsets::new(4).count(), 0);
    }

    #[test]
    fn too_few_cards_is_an_error() {
        let cards = parse_cards("AS KS QS JS").unwrap();
        assert_eq!(evaluate_hand(&cards), Err(EvalError::InsufficientCards { got: 4 }));
    }

    #[test]
    fn tiebreak_layouts() {
        assert_eq!(five("9C 9D 9H 9S KH").tiebreaks(), &[9, 13]);
        assert_eq!(five("QC QD QH 3S 3H").tiebreaks(), &[12, 3]);
        assert_eq!(five("JC JD 4H 4S AH").tiebreaks(), &[11, 4, 14]);
        assert_eq!(five("7C 7D 7H KS 2H").tiebreaks(), &[7, 13, 2]);
        assert_eq!(five("AH 9H 7H 3H 2H").tiebreaks(), &[14, 9, 7, 3, 2]);
    }

    #[test]
    fn wheel_is_five_high() {
        let wheel = five("AS 2H 3D 4C 5S");
        assert_eq!(wheel.category, Category::Straight);
        assert_eq!(wheel.tiebreaks(), &[5]);
        assert!(wheel < five("6H 5H 4H 3H 2H"));
        assert!(wheel < five("6C 5H 4H 3H 2H"));
    }

    #[test]
    fn category_names_and_codes() {
        for code in 1..=9u8 {
            let cat = Category::from_code(code).unwrap();
            assert_eq!(cat.code(), code);
            assert_ne!(cat.name(), "Unknown");
        }
        assert_eq!(Category::from_code(10), None);
        assert_eq!(hand_category_name(10), "Unknown");
        assert_eq!(Category::TwoPair.to_string(), "Two Pair");
    }

    #[test]
    fn best_of_seven_picks_the_flush() {
        let cards = parse_cards("2H 7H 9H KH AH AS AD").unwrap();
        let e = evaluate_hand(&cards).unwrap();
        assert_eq!(e.category, Category::Flush);
        assert_eq!(e.tiebreaks(), &[14, 13, 9, 7, 2]);
    }
}
