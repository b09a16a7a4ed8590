use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named bucket of genre filters for discovery queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    FeelGood,
    ActionFix,
    MindBenders,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::FeelGood, Mood::ActionFix, Mood::MindBenders];

    pub fn key(&self) -> &'static str {
        match self {
            Mood::FeelGood => "feel-good",
            Mood::ActionFix => "action-fix",
            Mood::MindBenders => "mind-benders",
        }
    }

    /// Catalog genre ids: Comedy+Family, Action+Adventure, Mystery+Thriller
    pub fn genre_ids(&self) -> &'static [u32] {
        match self {
            Mood::FeelGood => &[35, 10751],
            Mood::ActionFix => &[28, 12],
            Mood::MindBenders => &[9648, 53],
        }
    }

    /// Comma-joined form used by the `with_genres` filter
    pub fn genre_filter(&self) -> String {
        self.genre_ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::FeelGood => "Feel Good",
            Mood::ActionFix => "Action Fix",
            Mood::MindBenders => "Mind Benders",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::FeelGood => "😊",
            Mood::ActionFix => "💥",
            Mood::MindBenders => "🤯",
        }
    }

    pub fn title(&self) -> String {
        format!("{} {} Movies", self.emoji(), self.label())
    }

    /// Heading for a browse feed; no mood means the popular list
    pub fn feed_title(mood: Option<Mood>) -> String {
        mood.map(|m| m.title())
            .unwrap_or_else(|| "Popular Movies".to_string())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mood '{}' (expected one of: feel-good, action-fix, mind-benders)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}
