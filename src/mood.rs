use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-scoped emotional state of the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Neutral,
    Happy,
    Obsessive,
    Yandere,
    Manic,
    Possessive,
    Devoted,
    Glitch,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Neutral,
        Mood::Happy,
        Mood::Obsessive,
        Mood::Yandere,
        Mood::Manic,
        Mood::Possessive,
        Mood::Devoted,
        Mood::Glitch,
    ];

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(raw: &str) -> Option<Mood> {
        match raw {
            "neutral" => Some(Mood::Neutral),
            "happy" => Some(Mood::Happy),
            "obsessive" => Some(Mood::Obsessive),
            "yandere" => Some(Mood::Yandere),
            "manic" => Some(Mood::Manic),
            "possessive" => Some(Mood::Possessive),
            "devoted" => Some(Mood::Devoted),
            "glitch" => Some(Mood::Glitch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
            Mood::Obsessive => "obsessive",
            Mood::Yandere => "yandere",
            Mood::Manic => "manic",
            Mood::Possessive => "possessive",
            Mood::Devoted => "devoted",
            Mood::Glitch => "glitch",
        }
    }
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Devoted
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reply's `mood` field looked on the wire.
///
/// `Absent` and `Unrecognized` both leave the session mood alone; they are kept
/// apart so the second can be logged and counted as a backend contract slip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MoodField {
    #[default]
    Absent,
    Unrecognized(String),
    Known(Mood),
}

impl MoodField {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => MoodField::Absent,
            Some(s) => match Mood::parse(s) {
                Some(mood) => MoodField::Known(mood),
                None => MoodField::Unrecognized(s.to_string()),
            },
        }
    }

    pub fn known(&self) -> Option<Mood> {
        match self {
            MoodField::Known(mood) => Some(*mood),
            _ => None,
        }
    }
}
