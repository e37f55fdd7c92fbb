use serde::{Deserialize, Serialize};

/// Lowest accepted review rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted review rating.
pub const MAX_RATING: u8 = 10;

/// Rating at or above which a closed trade belongs to the playbook.
pub const PLAYBOOK_MIN_RATING: u8 = 8;

/// Suggested mood labels offered by the review form.
pub const MOOD_OPTIONS: [&str; 6] = [
    "Calm",
    "Anxious",
    "Greedy",
    "Fearful",
    "Overconfident",
    "Hesitant",
];

/// Frequently used review tags.
pub const COMMON_TAGS: [&str; 7] = [
    "Perfect execution",
    "Stop too tight",
    "Chased entry",
    "Picked the top",
    "Missed entry",
    "Exited early",
    "Held overnight",
];

/// Post-trade review attached to a trade.
///
/// Lives independently of the trade's trading lifecycle: it can be written
/// or rewritten at any time without touching status or pnl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReview {
    /// Execution quality score, 1 to 10
    pub rating: u8,

    /// State of mind while trading (free text, see `MOOD_OPTIONS`)
    #[serde(default)]
    pub mood: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Link to an annotated chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistakes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<String>,

    #[serde(default)]
    pub is_reviewed: bool,
}

impl TradeReview {
    pub fn new(rating: u8, mood: impl Into<String>) -> Self {
        Self {
            rating,
            mood: mood.into(),
            tags: Vec::new(),
            chart_url: None,
            mistakes: None,
            improvements: None,
            is_reviewed: false,
        }
    }

    /// Add a tag unless it is blank or already present.
    /// Returns `true` if the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(idx) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(idx);
        } else {
            self.add_tag(tag);
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_rating_valid(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}
