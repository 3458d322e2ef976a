use serde::{Deserialize, Serialize};
use std::fmt;

/// 投稿に対する投票値（-1 / 0 / +1）を表現する値オブジェクト。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum VoteValue {
    Down,
    #[default]
    Neutral,
    Up,
}

impl VoteValue {
    pub fn as_i8(self) -> i8 {
        match self {
            VoteValue::Down => -1,
            VoteValue::Neutral => 0,
            VoteValue::Up => 1,
        }
    }

    /// `self` から `next` へ変えたときのスコア差分
    pub fn score_delta(self, next: VoteValue) -> i64 {
        i64::from(next.as_i8()) - i64::from(self.as_i8())
    }

    pub fn is_neutral(self) -> bool {
        self == VoteValue::Neutral
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(VoteValue::Down),
            0 => Ok(VoteValue::Neutral),
            1 => Ok(VoteValue::Up),
            other => Err(format!("Vote value must be -1, 0 or 1 (got {other})")),
        }
    }
}

impl From<VoteValue> for i8 {
    fn from(value: VoteValue) -> Self {
        value.as_i8()
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}
