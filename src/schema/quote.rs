use serde::{Deserialize, Deserializer, Serialize};

/// A literary quote as stored in the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Quote {
    /// The line shown to the player.
    pub text: String,
    pub work_id: String,
    pub work_title: String,
    pub mood: String,
    /// The single theme this quote is filed under.
    pub theme_tags: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub allow_use: bool,
}

impl Quote {
    /// Whether this quote may be offered for `theme`.
    pub fn is_eligible_for(&self, theme: &str) -> bool {
        self.allow_use && self.theme_tags == theme
    }
}

/// A selectable quote presented to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub work_title: String,
    pub mood: String,
    pub work_id: String,
    /// Set by the presentation layer; see `story::presentation::WorkIcons`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_filename: Option<String>,
}

impl From<&Quote> for Choice {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text.clone(),
            work_title: quote.work_title.clone(),
            mood: quote.mood.clone(),
            work_id: quote.work_id.clone(),
            icon_filename: None,
        }
    }
}

/// Reads the `allow_use` column. Only the exact string `True` enables a
/// quote; `true`, `1`, `False` and blanks all leave it disabled.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_flag(&raw))
}

pub(crate) fn parse_flag(raw: &str) -> bool {
    raw == "True"
}
