use serde::{Deserialize, Serialize};

use super::quote::Choice;

/// The most choices a single scene offers.
pub const MAX_CHOICES: usize = 3;

/// What the selector hands back for one turn: the theme drawn for the next
/// scene, the text that frames it, and up to [`MAX_CHOICES`] quotes from
/// distinct works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneData {
    pub next_theme: String,
    pub context_text: String,
    pub choices: Vec<Choice>,
}

impl SceneData {
    /// True when the theme had no eligible quotes. Callers decide whether
    /// that is an error for their surface.
    pub fn has_no_choices(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn into_parts(self) -> (String, String, Vec<Choice>) {
        (self.next_theme, self.context_text, self.choices)
    }
}
