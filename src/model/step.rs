//! Wizard steps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four stages of the post wizard, numbered 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    BasicInfo = 1,
    Details = 2,
    TradeOptions = 3,
    Review = 4,
}

impl Step {
    pub const ALL: [Self; 4] = [
        Self::BasicInfo,
        Self::Details,
        Self::TradeOptions,
        Self::Review,
    ];

    pub const FIRST: Self = Self::BasicInfo;
    pub const LAST: Self = Self::Review;

    /// The step's 1-based position.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::BasicInfo),
            2 => Some(Self::Details),
            3 => Some(Self::TradeOptions),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Details => "Details",
            Self::TradeOptions => "Trade Options",
            Self::Review => "Review",
        }
    }

    /// The following step, or `None` at Review.
    pub fn succ(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, or `None` at Basic Info.
    pub fn pred(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("step must be between 1 and 4, got {n}"))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succ_and_pred_stop_at_the_ends() {
        assert_eq!(Step::BasicInfo.pred(), None);
        assert_eq!(Step::BasicInfo.succ(), Some(Step::Details));
        assert_eq!(Step::Review.succ(), None);
        assert_eq!(Step::Review.pred(), Some(Step::TradeOptions));
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Step::TradeOptions).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Step>("2").unwrap(), Step::Details);
        assert!(serde_json::from_str::<Step>("5").is_err());
    }
}
