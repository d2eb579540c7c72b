//! WASM bindings for mood-chain: powers the browser version of the game.
//!
//! The page owns the call to the language model: it asks for a prompt, sends
//! it wherever it likes, and hands the resulting text (or nothing, on
//! failure) back to `choose` / `finish`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use mood_chain::core::catalog::QuoteCatalog;
use mood_chain::core::chain::MoodChain;
use mood_chain::core::selector::SceneSelector;
use mood_chain::core::theme::ThemeContexts;
use mood_chain::schema::scene::SceneData;
use mood_chain::story::narrator::{Narrator, NarratorError};
use mood_chain::story::options::{options_prompt, parse_options, sample_for_mood};
use mood_chain::story::presentation::{MoodLabels, WorkIcons};
use mood_chain::story::prompt::ScenePrompt;
use mood_chain::story::session::{GameSession, DEFAULT_MAX_TURNS};

// ---------------------------------------------------------------------------
// Embedded game data: compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const QUOTES: &str = include_str!("../../data/quotes.csv");
    pub const MOOD_CHAIN: &str = include_str!("../../data/mood_chain.ron");
    pub const THEME_CONTEXTS: &str = include_str!("../../data/theme_contexts.ron");
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct NoChoices<'a> {
    error: &'static str,
    next_theme: &'a str,
}

#[derive(serde::Serialize)]
struct SessionInfo<'a> {
    mood: &'a str,
    turn: u32,
    max_turns: u32,
    finished: bool,
    ended: bool,
}

/// Text already produced by the page's own model call. `None` means the call
/// failed, which the session turns into its fallback sentence.
struct ProvidedText(Option<String>);

impl Narrator for ProvidedText {
    fn generate(&self, _prompt: &ScenePrompt) -> Result<String, NarratorError> {
        self.0
            .clone()
            .ok_or_else(|| NarratorError::Backend("no text from the page".to_string()))
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// MoodChainGame: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct MoodChainGame {
    selector: SceneSelector,
    session: GameSession,
    rng: StdRng,
    scene: Option<SceneData>,
    icons: WorkIcons,
    labels: MoodLabels,
}

#[wasm_bindgen]
impl MoodChainGame {
    /// Create a game over the bundled quotes with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<MoodChainGame, JsError> {
        Self::with_quotes(data::QUOTES, seed)
    }

    /// Create a game over caller-supplied quote CSV. Unreadable CSV leaves
    /// the catalog empty; the game still runs, with no choices to offer.
    pub fn with_quotes(quotes_csv: &str, seed: u64) -> Result<MoodChainGame, JsError> {
        let catalog = QuoteCatalog::parse_csv(quotes_csv).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to parse quote CSV, starting empty");
            QuoteCatalog::empty()
        });
        let chain = MoodChain::parse_ron(data::MOOD_CHAIN)
            .map_err(|e| JsError::new(&format!("Mood chain parse error: {e}")))?;
        let contexts = ThemeContexts::parse_ron(data::THEME_CONTEXTS)
            .map_err(|e| JsError::new(&format!("Theme context parse error: {e}")))?;

        let selector = SceneSelector::new(Arc::new(catalog), chain, contexts);
        let mut session = GameSession::new(DEFAULT_MAX_TURNS);
        session.start();

        Ok(MoodChainGame {
            selector,
            session,
            rng: StdRng::seed_from_u64(seed),
            scene: None,
            icons: WorkIcons::default(),
            labels: MoodLabels::default(),
        })
    }

    /// Draw the scene for the current mood. Returns JSON
    /// `{ next_theme, context_text, choices: [{ text, work_title, mood, work_id, icon_filename }] }`.
    ///
    /// A theme with no usable quotes is reported as an error carrying
    /// `{ error, next_theme }`; calling again draws a new theme.
    pub fn next_scene(&mut self) -> Result<String, JsError> {
        let mut scene = self.session.offer(&self.selector, &mut self.rng);
        if scene.has_no_choices() {
            let body = to_json(&NoChoices {
                error: "no quotes for the next theme",
                next_theme: &scene.next_theme,
            })?;
            self.scene = None;
            return Err(JsError::new(&body));
        }
        self.icons.attach(&mut scene.choices);
        let json = to_json(&scene)?;
        self.scene = Some(scene);
        Ok(json)
    }

    /// Prompt asking the model to write choices for the current mood, as
    /// JSON `{ system, user }`. Pass the reply to `parse_options`.
    pub fn options_prompt(&mut self) -> Result<String, JsError> {
        let mood = self.session.mood().to_string();
        let quotes = sample_for_mood(self.selector.catalog(), &mood, &mut self.rng);
        let prompt = options_prompt(&quotes, &mood).map_err(|e| JsError::new(&e.to_string()))?;
        to_json(&prompt)
    }

    /// Parse the model's reply to `options_prompt` into JSON
    /// `[{ id, text, next_mood, work_id, icon_filename }]`.
    pub fn parse_options(&self, reply: &str) -> Result<String, JsError> {
        let mut options = parse_options(reply).map_err(|e| JsError::new(&e.to_string()))?;
        for option in &mut options {
            option.icon_filename = Some(self.icons.icon_for(&option.work_id).to_string());
        }
        to_json(&options)
    }

    /// Display label for `mood`.
    pub fn mood_label(&self, mood: &str) -> String {
        self.labels.label_for(mood).to_string()
    }

    /// The narrator prompt for choice `index` of the current scene, as JSON
    /// `{ system, user }`.
    pub fn bridge_prompt(&self, index: usize) -> Result<String, JsError> {
        let scene = self.current_scene()?;
        let choice = scene
            .choices
            .get(index)
            .ok_or_else(|| JsError::new(&format!("No choice {index}")))?;
        let prompt = self
            .session
            .style()
            .bridge(choice, &scene.next_theme, &scene.context_text);
        to_json(&prompt)
    }

    /// Play choice `index` with the text the page generated (or `undefined`
    /// if generation failed). Returns the turn outcome as JSON.
    pub fn choose(&mut self, index: usize, scene_text: Option<String>) -> Result<String, JsError> {
        let scene = self.current_scene()?.clone();
        let outcome = self
            .session
            .choose(&scene, index, &ProvidedText(scene_text))
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.scene = None;
        to_json(&outcome)
    }

    /// The narrator prompt for the ending, as JSON `{ system, user }`.
    pub fn ending_prompt(&self) -> Result<String, JsError> {
        let prompt = self
            .session
            .style()
            .ending(self.session.transcript(), self.session.mood());
        to_json(&prompt)
    }

    /// Close the story with the page's ending text (or `undefined`).
    pub fn finish(&mut self, ending_text: Option<String>) -> Result<String, JsError> {
        self.session
            .finish(&ProvidedText(ending_text))
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// The story so far as a JSON array of paragraphs.
    pub fn transcript(&self) -> Result<String, JsError> {
        to_json(self.session.transcript())
    }

    /// Current mood, turn and completion state as JSON.
    pub fn session_info(&self) -> Result<String, JsError> {
        to_json(&SessionInfo {
            mood: self.session.mood(),
            turn: self.session.turn(),
            max_turns: self.session.max_turns(),
            finished: self.session.is_finished(),
            ended: self.session.has_ended(),
        })
    }

    /// Number of quotes in the catalog.
    pub fn quote_count(&self) -> usize {
        self.selector.catalog().len()
    }

    /// JSON array of moods with their own transition entry.
    pub fn moods(&self) -> String {
        serde_json::to_string(&self.selector.mood_chain().moods())
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// Start over with a new seed, keeping the loaded data.
    pub fn reset(&mut self, seed: u64) {
        self.session.start();
        self.rng = StdRng::seed_from_u64(seed);
        self.scene = None;
    }
}

// Private helpers
impl MoodChainGame {
    fn current_scene(&self) -> Result<&SceneData, JsError> {
        self.scene
            .as_ref()
            .ok_or_else(|| JsError::new("No scene drawn; call next_scene first"))
    }
}
