/// Model-written choices: a prompt built from a mood-matched sample of the
/// catalog, and a parser for the JSON the model sends back.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::catalog::QuoteCatalog;
use crate::schema::quote::Quote;
use crate::story::narrator::{Narrator, NarratorError};
use crate::story::prompt::ScenePrompt;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no JSON object in model response: {0}")]
    NoJson(String),
    #[error("model response has no 'options' array")]
    MissingOptions,
    #[error(transparent)]
    Narrator(#[from] NarratorError),
}

/// Most quotes placed in one options prompt. Longer prompts answer slower.
pub const MAX_QUOTES_PER_CALL: usize = 12;

/// Moods the model may assign as `next_mood`.
pub const OPTION_MOODS: &[&str] = &["hopeful", "angry", "melancholic", "anxious", "calm", "neutral"];

const OPTIONS_SYSTEM: &str = "\
あなたは日本文学を題材にしたマルチエンディングゲームのシナリオ生成AIである。
与えられた引用リストと現在の mood をもとに、プレイヤーに提示する次の選択肢を3個、JSON で返すこと。
各選択肢は引用の雰囲気を活かした短いセリフにし、次の mood を \"next_mood\" として指定すること。
各選択肢の \"work_id\" には、参考にした引用の work_id を1つ入れること。";

/// One choice written by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedOption {
    #[serde(default)]
    pub id: u32,
    pub text: String,
    pub next_mood: String,
    #[serde(default)]
    pub work_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_filename: Option<String>,
}

#[derive(Serialize)]
struct PromptQuote<'a> {
    text: &'a str,
    work_id: &'a str,
    work_title: &'a str,
    mood: &'a str,
    theme_tags: &'a str,
}

impl<'a> From<&'a Quote> for PromptQuote<'a> {
    fn from(quote: &'a Quote) -> Self {
        Self {
            text: &quote.text,
            work_id: &quote.work_id,
            work_title: &quote.work_title,
            mood: &quote.mood,
            theme_tags: &quote.theme_tags,
        }
    }
}

/// Usable quotes in `mood`, or every usable quote when none match, cut
/// down to [`MAX_QUOTES_PER_CALL`] by uniform sampling.
pub fn sample_for_mood<'a, R: Rng + ?Sized>(
    catalog: &'a QuoteCatalog,
    mood: &str,
    rng: &mut R,
) -> Vec<&'a Quote> {
    let usable: Vec<&Quote> = catalog.quotes().iter().filter(|q| q.allow_use).collect();
    let matching: Vec<&Quote> = usable.iter().copied().filter(|q| q.mood == mood).collect();
    let pool = if matching.is_empty() { usable } else { matching };

    if pool.len() <= MAX_QUOTES_PER_CALL {
        return pool;
    }
    pool.choose_multiple(rng, MAX_QUOTES_PER_CALL)
        .copied()
        .collect()
}

/// The prompt asking the model for three choices in `mood`.
pub fn options_prompt(quotes: &[&Quote], mood: &str) -> Result<ScenePrompt, OptionsError> {
    let listed: Vec<PromptQuote<'_>> = quotes.iter().map(|q| PromptQuote::from(*q)).collect();
    let system = format!(
        "{}\n指定できる next_mood：{}\n出力は次の形式の JSON だけにすること。\n\
         {{\"options\": [{{\"id\": 1, \"text\": \"選択肢のセリフ\", \"next_mood\": \"calm\", \"work_id\": \"hashire\"}}]}}",
        OPTIONS_SYSTEM,
        OPTION_MOODS.join(", "),
    );
    let user = format!(
        "現在の mood: {}\n\nゲームで利用できる引用データの一部を示す。\
         この mood に近いものを優先して参考にし、次の選択肢を3個考えること。\n\n引用データ (JSON):\n{}",
        mood,
        serde_json::to_string(&listed)?,
    );
    Ok(ScenePrompt { system, user })
}

/// Pull the options out of a model reply. The reply may wrap the JSON in
/// prose or code fences; everything from the first `{` to the last `}` is
/// parsed.
pub fn parse_options(raw: &str) -> Result<Vec<GeneratedOption>, OptionsError> {
    let body = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => return Err(OptionsError::NoJson(raw.to_string())),
    };
    let mut value: serde_json::Value = serde_json::from_str(body)?;
    let options = match value.get_mut("options") {
        Some(options) if options.is_array() => options.take(),
        _ => return Err(OptionsError::MissingOptions),
    };
    Ok(serde_json::from_value(options)?)
}

/// Ask `narrator` for choices in `mood`. Unlike scene text there is no
/// fallback; callers fall back to the quote selector instead.
pub fn generate_options<N: Narrator + ?Sized, R: Rng + ?Sized>(
    narrator: &N,
    catalog: &QuoteCatalog,
    mood: &str,
    rng: &mut R,
) -> Result<Vec<GeneratedOption>, OptionsError> {
    let quotes = sample_for_mood(catalog, mood, rng);
    let prompt = options_prompt(&quotes, mood)?;
    let raw = narrator.generate(&prompt)?;
    let options = parse_options(&raw)?;
    tracing::debug!(mood, quotes = quotes.len(), options = options.len(), "generated options");
    Ok(options)
}
