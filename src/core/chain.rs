/// Mood chain: the mood → candidate-theme transition table.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("default mood '{0}' has no transition entry")]
    MissingDefault(String),
    #[error("mood '{0}' has no candidate themes")]
    EmptyCandidates(String),
}

/// The mood every session starts in, and the fallback for unlisted moods.
pub const START_MOOD: &str = "start";

const BUILTIN_TRANSITIONS: &[(&str, &[&str])] = &[
    ("start", &["友情", "希望"]),
    ("hopeful", &["不安", "芸術", "孤独"]),
    ("angry", &["calm", "友情", "希望"]),
    ("anxious", &["希望", "calm", "友情"]),
    ("melancholic", &["希望", "芸術", "calm"]),
    ("calm", &["孤独", "芸術", "不安"]),
];

/// Static mapping from a mood to the themes the story may move to next.
///
/// Invariants, checked on construction: `default_mood` has an entry and no
/// entry is empty. [`MoodChain::candidates`] therefore never returns an
/// empty slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodChain {
    default_mood: String,
    transitions: FxHashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RonMoodChain {
    #[serde(default = "default_mood_name")]
    default_mood: String,
    transitions: FxHashMap<String, Vec<String>>,
}

fn default_mood_name() -> String {
    START_MOOD.to_string()
}

impl Default for MoodChain {
    fn default() -> Self {
        let transitions = BUILTIN_TRANSITIONS
            .iter()
            .map(|(mood, themes)| {
                (
                    mood.to_string(),
                    themes.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        Self {
            default_mood: START_MOOD.to_string(),
            transitions,
        }
    }
}

impl MoodChain {
    pub fn new(
        default_mood: impl Into<String>,
        transitions: FxHashMap<String, Vec<String>>,
    ) -> Result<Self, ChainError> {
        let chain = Self {
            default_mood: default_mood.into(),
            transitions,
        };
        chain.validate()?;
        Ok(chain)
    }

    /// Load a mood chain from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, ChainError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a mood chain from a RON string.
    pub fn parse_ron(input: &str) -> Result<Self, ChainError> {
        let raw: RonMoodChain = ron::from_str(input)?;
        Self::new(raw.default_mood, raw.transitions)
    }

    fn validate(&self) -> Result<(), ChainError> {
        if !self.transitions.contains_key(&self.default_mood) {
            return Err(ChainError::MissingDefault(self.default_mood.clone()));
        }
        if let Some((mood, _)) = self.transitions.iter().find(|(_, t)| t.is_empty()) {
            return Err(ChainError::EmptyCandidates(mood.clone()));
        }
        Ok(())
    }

    pub fn default_mood(&self) -> &str {
        &self.default_mood
    }

    /// Candidate themes for `mood`, falling back to the default mood's list.
    pub fn candidates(&self, mood: &str) -> &[String] {
        self.transitions
            .get(mood)
            .or_else(|| self.transitions.get(&self.default_mood))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `mood` has its own entry (as opposed to using the fallback).
    pub fn knows(&self, mood: &str) -> bool {
        self.transitions.contains_key(mood)
    }

    /// Uniformly draw the next theme for `mood`.
    pub fn next_theme<R: Rng + ?Sized>(&self, mood: &str, rng: &mut R) -> &str {
        let candidates = self.candidates(mood);
        &candidates[rng.gen_range(0..candidates.len())]
    }

    /// Moods with an explicit entry, sorted.
    pub fn moods(&self) -> Vec<&str> {
        let mut moods: Vec<&str> = self.transitions.keys().map(String::as_str).collect();
        moods.sort_unstable();
        moods
    }

    /// Every theme any mood can lead to, sorted and deduplicated.
    pub fn themes(&self) -> Vec<&str> {
        let mut themes: Vec<&str> = self
            .transitions
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        themes.sort_unstable();
        themes.dedup();
        themes
    }

    /// Merge another chain into this one. Entries from `other` override
    /// entries in `self` for the same mood, and `other`'s default mood
    /// becomes the fallback. `other` is valid, so its default has an entry.
    pub fn merge(&mut self, other: MoodChain) {
        for (mood, themes) in other.transitions {
            self.transitions.insert(mood, themes);
        }
        self.default_mood = other.default_mood;
    }
}
