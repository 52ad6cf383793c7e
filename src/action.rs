use std::fmt;
use std::str::FromStr;

/// A betting decision. Providers answer with text; the engine parses it into
/// this variant once and works with the variant from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Check,
    Call,
    /// Raise by this many chips on top of the amount needed to call.
    Raise(u64),
    AllIn,
}

/// Why a provider's answer could not be understood. Always recoverable: the
/// engine asks the same seat again.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionParseError {
    #[error("empty action")]
    Empty,
    #[error("unknown action '{0}'; expected fold, check, call, raise <amount>, or allin")]
    UnknownVerb(String),
    #[error("raise needs an amount: 'raise <amount>'")]
    MissingAmount,
    #[error("raise amount must be a positive integer, got '{0}'")]
    InvalidAmount(String),
    #[error("unexpected input after action: '{0}'")]
    TrailingInput(String),
}

impl FromStr for Action {
    type Err = ActionParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    ///
    /// ```
    /// use holdem_engine::action::Action;
    ///
    /// assert_eq!(" Raise 40 ".parse::<Action>(), Ok(Action::Raise(40)));
    /// assert!("raise -5".parse::<Action>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let mut words = lowered.split_whitespace();
        let verb = words.next().ok_or(ActionParseError::Empty)?;
        let action = match verb {
            "fold" => Action::Fold,
            "check" => Action::Check,
            "call" => Action::Call,
            "allin" | "all-in" => Action::AllIn,
            "raise" => {
                let amount = words.next().ok_or(ActionParseError::MissingAmount)?;
                match amount.parse::<u64>() {
                    Ok(n) if n > 0 => Action::Raise(n),
                    _ => return Err(ActionParseError::InvalidAmount(amount.to_string())),
                }
            }
            other => return Err(ActionParseError::UnknownVerb(other.to_string())),
        };
        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(ActionParseError::TrailingInput(rest.join(" ")));
        }
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Raise(n) => write!(f, "raise {n}"),
            Action::AllIn => f.write_str("allin"),
        }
    }
}
