/// Display helpers: per-work icons for offered choices and Japanese labels
/// for mood names.

use rustc_hash::FxHashMap;

use crate::schema::quote::Choice;

/// Icon used for works without their own entry.
pub const DEFAULT_ICON: &str = "sun_icon.jpg";

const BUILTIN_ICONS: &[(&str, &str)] = &[
    ("hashire", "king_icon.jpg"),
    ("lemon", "lemon_icon.jpg"),
    ("kokoro", "k_icon.jpg"),
    ("chumon", "cat_icon.jpg"),
];

const BUILTIN_LABELS: &[(&str, &str)] = &[
    ("neutral", "ふつう"),
    ("hope", "希望"),
    ("despair", "不安・絶望"),
    ("start", "はじまり"),
    ("hopeful", "希望"),
    ("angry", "怒り"),
    ("anxious", "不安"),
    ("melancholic", "憂い"),
    ("calm", "静けさ"),
];

/// work_id → icon file shown next to a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkIcons {
    default_icon: String,
    icons: FxHashMap<String, String>,
}

impl Default for WorkIcons {
    fn default() -> Self {
        Self {
            default_icon: DEFAULT_ICON.to_string(),
            icons: BUILTIN_ICONS
                .iter()
                .map(|(work, icon)| (work.to_string(), icon.to_string()))
                .collect(),
        }
    }
}

impl WorkIcons {
    pub fn with_icon(mut self, work_id: impl Into<String>, icon: impl Into<String>) -> Self {
        self.icons.insert(work_id.into(), icon.into());
        self
    }

    pub fn icon_for(&self, work_id: &str) -> &str {
        self.icons
            .get(work_id)
            .map(String::as_str)
            .unwrap_or(&self.default_icon)
    }

    /// Fill in `icon_filename` on every choice.
    pub fn attach(&self, choices: &mut [Choice]) {
        for choice in choices {
            choice.icon_filename = Some(self.icon_for(&choice.work_id).to_string());
        }
    }
}

/// Mood name → label shown to the player. Unlabelled moods show as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodLabels {
    labels: FxHashMap<String, String>,
}

impl Default for MoodLabels {
    fn default() -> Self {
        Self {
            labels: BUILTIN_LABELS
                .iter()
                .map(|(mood, label)| (mood.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl MoodLabels {
    pub fn label_for<'a>(&'a self, mood: &'a str) -> &'a str {
        self.labels.get(mood).map(String::as_str).unwrap_or(mood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(work_id: &str) -> Choice {
        Choice {
            text: "line".to_string(),
            work_title: "Work".to_string(),
            mood: "calm".to_string(),
            work_id: work_id.to_string(),
            icon_filename: None,
        }
    }

    #[test]
    fn known_works_have_their_own_icon() {
        let icons = WorkIcons::default();
        assert_eq!(icons.icon_for("hashire"), "king_icon.jpg");
        assert_eq!(icons.icon_for("kokoro"), "k_icon.jpg");
        assert_eq!(icons.icon_for("ningen_shikkaku"), DEFAULT_ICON);
    }

    #[test]
    fn attach_fills_every_choice() {
        let icons = WorkIcons::default().with_icon("rashomon", "gate_icon.jpg");
        let mut choices = vec![choice("lemon"), choice("rashomon"), choice("unknown")];
        icons.attach(&mut choices);
        let attached: Vec<_> = choices
            .iter()
            .map(|c| c.icon_filename.as_deref())
            .collect();
        assert_eq!(
            attached,
            vec![Some("lemon_icon.jpg"), Some("gate_icon.jpg"), Some(DEFAULT_ICON)]
        );
    }

    #[test]
    fn attached_icon_is_serialized() {
        let mut choices = vec![choice("chumon")];
        WorkIcons::default().attach(&mut choices);
        let json = serde_json::to_value(&choices[0]).unwrap();
        assert_eq!(json["icon_filename"], "cat_icon.jpg");
    }

    #[test]
    fn labels_fall_back_to_the_mood_name() {
        let labels = MoodLabels::default();
        assert_eq!(labels.label_for("neutral"), "ふつう");
        assert_eq!(labels.label_for("despair"), "不安・絶望");
        assert_eq!(labels.label_for("melancholic"), "憂い");
        assert_eq!(labels.label_for("bewildered"), "bewildered");
    }
}
