use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::evaluator::{evaluate_five, evaluate_hand, Category, EvalError, Evaluation};

fn five(s: &str) -> [Card; 5] {
    let cards = parse_cards(s).expect("valid cards");
    assert_eq!(cards.len(), 5, "{s}");
    [cards[0], cards[1], cards[2], cards[3], cards[4]]
}

fn eval(s: &str) -> Evaluation {
    evaluate_five(&five(s))
}

#[test]
fn every_category_is_detected() {
    let cases = [
        ("AS KS QS JS TS", Category::StraightFlush),
        ("9C 9D 9H 9S AC", Category::FourOfAKind),
        ("3C 3D 3H JS JC", Category::FullHouse),
        ("KH TH 8H 6H 3H", Category::Flush),
        ("9C TD JH QS KC", Category::Straight),
        ("7C 7D 7H 2S KC", Category::ThreeOfAKind),
        ("8C 8D 4H 4S AC", Category::TwoPair),
        ("QC QD 9H 4S 2C", Category::OnePair),
        ("AH JD 8C 5S 3D", Category::HighCard),
    ];
    for (hand, category) in cases {
        assert_eq!(eval(hand).category, category, "{hand}");
    }
}

#[test]
fn literal_hands_rank_in_category_order() {
    let ladder = [
        "AS KS QS JS TS",
        "9S 8S 7S 6S 5S",
        "AH AD AC AS KH",
        "AH AD AC KH KD",
        "KH TH 8H 6H 3H",
        "9C TD JH QS KC",
        "7C 7D 7H 2S KC",
        "8C 8D 4H 4S AC",
        "QC QD 9H 4S 2C",
        "AH JD 8C 5S 3D",
    ];
    for pair in ladder.windows(2) {
        assert!(eval(pair[0]) > eval(pair[1]), "{} should beat {}", pair[0], pair[1]);
    }
}

#[test]
fn wheel_is_a_five_high_straight() {
    let wheel = eval("AS 2H 3D 4C 5S");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.category.code(), 5);
    assert_eq!(wheel.tiebreaks(), &[5]);
    assert!(eval("6H 5H 4H 3H 2H") > wheel);
    assert!(eval("2C 3D 4H 5S 6C") > wheel);
}

#[test]
fn ace_is_not_low_outside_the_wheel() {
    let e = eval("QS KD AH 2C 3S");
    assert_eq!(e.category, Category::HighCard);
}

#[test]
fn kickers_break_ties() {
    assert!(eval("KS KH AD 9C 4S") > eval("KD KC QD 9H 4C"));
    assert!(eval("8C 8D 4H 4S AC") > eval("8H 8S 4C 4D KC"));
    assert!(eval("9C 9D 9H 9S AC") > eval("9C 9D 9H 9S KC"));
    assert_eq!(eval("AH JD 8C 5S 3D"), eval("AD JC 8H 5C 3S"));
}

#[test]
fn tiebreaks_follow_group_significance() {
    assert_eq!(eval("3C 3D 3H JS JC").tiebreaks(), &[3, 11]);
    assert_eq!(eval("8C 8D 4H 4S AC").tiebreaks(), &[8, 4, 14]);
    assert_eq!(eval("QC QD 9H 4S 2C").tiebreaks(), &[12, 9, 4, 2]);
    assert_eq!(eval("AH JD 8C 5S 3D").tiebreaks(), &[14, 11, 8, 5, 3]);
}

#[test]
fn best_five_is_picked_from_seven() {
    let cards = parse_cards("2C 7D AS KS QS JS TS").unwrap();
    let e = evaluate_hand(&cards).unwrap();
    assert_eq!(e.category, Category::StraightFlush);
    assert_eq!(e.name(), "Straight Flush");
    assert!(e.best_five.iter().all(|c| c.to_string().ends_with('S')));
}

#[test]
fn fewer_than_five_cards_is_an_error() {
    let cards = parse_cards("AS KS QS JS").unwrap();
    assert_eq!(evaluate_hand(&cards).unwrap_err(), EvalError::InsufficientCards { got: 4 });
}
