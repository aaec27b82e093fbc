//! Narrative tone requested by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Register of the generated narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Executive,
    Technical,
    Simple,
}

impl Tone {
    /// Lenient parse; anything unrecognised reads as the executive tone.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Executive => "executive",
            Tone::Technical => "technical",
            Tone::Simple => "simple",
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "executive" => Ok(Tone::Executive),
            "technical" => Ok(Tone::Technical),
            "simple" => Ok(Tone::Simple),
            other => Err(format!("unknown tone: {other}")),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tones_case_insensitively() {
        assert_eq!("Technical".parse::<Tone>().unwrap(), Tone::Technical);
        assert_eq!(" simple ".parse::<Tone>().unwrap(), Tone::Simple);
    }

    #[test]
    fn unknown_tone_falls_back_to_executive() {
        assert!("poetic".parse::<Tone>().is_err());
        assert_eq!(Tone::parse_lenient("poetic"), Tone::Executive);
    }
}
