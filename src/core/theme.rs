/// Theme contexts: the framing text shown when the story enters a theme.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Placeholder replaced with the theme name in the fallback template.
pub const THEME_PLACEHOLDER: &str = "{theme}";

const BUILTIN_FALLBACK: &str = "メロスは荒野を駆ける。現在のテーマは「{theme}」である。";

const BUILTIN_CONTEXTS: &[(&str, &str)] = &[
    (
        "友情",
        "メロスは、友との絆という原点に立ち返る。彼の心は、太宰治の原点にある。",
    ),
    (
        "希望",
        "絶望の淵から、メロスは再び立ち上がる。友を救う使命と、自己の信念が、新たな力を生み出す。",
    ),
    (
        "不安",
        "メロスは、希望の裏側にある、何かがおかしいという不吉な予感に襲われた。周囲には、宮沢賢治の『注文の多い料理店』のような奇妙な空気が漂っている。",
    ),
    (
        "孤独",
        "激しい感情が去り、メロスの心には夏目漱石の『こころ』のような静かな孤独が広がる。友への信頼は揺らぎつつ、人間の罪深さに内省を始める。",
    ),
    (
        "芸術",
        "走る道中で、メロスは梶井基次郎の『檸檬』のような、日常に潜む一瞬の美と破壊衝動に気づく。彼の目には、世界が美しくも不安定に映る。",
    ),
];

/// Theme name → scene-framing text, with a templated fallback for themes
/// that have no authored context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeContexts {
    #[serde(default = "builtin_fallback")]
    pub fallback: String,
    #[serde(default)]
    pub contexts: FxHashMap<String, String>,
}

fn builtin_fallback() -> String {
    BUILTIN_FALLBACK.to_string()
}

impl Default for ThemeContexts {
    fn default() -> Self {
        Self {
            fallback: builtin_fallback(),
            contexts: BUILTIN_CONTEXTS
                .iter()
                .map(|(theme, text)| (theme.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl ThemeContexts {
    pub fn load_from_ron(path: &Path) -> Result<Self, ThemeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Self, ThemeError> {
        Ok(ron::from_str(input)?)
    }

    /// The authored context for `theme`, or the fallback naming it.
    pub fn context_for<'a>(&'a self, theme: &str) -> Cow<'a, str> {
        match self.contexts.get(theme) {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(self.fallback.replace(THEME_PLACEHOLDER, theme)),
        }
    }

    pub fn has_context(&self, theme: &str) -> bool {
        self.contexts.contains_key(theme)
    }

    /// Contexts from `other` override contexts in `self`. The fallback is
    /// taken from `other`.
    pub fn merge(&mut self, other: ThemeContexts) {
        self.fallback = other.fallback;
        self.contexts.extend(other.contexts);
    }
}
