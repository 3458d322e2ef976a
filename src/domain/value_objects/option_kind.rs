use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Hidden,
    Saved,
    Reported,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Hidden => "hidden",
            OptionKind::Saved => "saved",
            OptionKind::Reported => "reported",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hidden" => Ok(OptionKind::Hidden),
            "saved" => Ok(OptionKind::Saved),
            "reported" => Ok(OptionKind::Reported),
            other => Err(format!("Unknown post option: {other}")),
        }
    }
}
