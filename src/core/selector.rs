/// Scene selection: mood → theme → context → quote choices.
///
/// Wires together the mood chain, the theme contexts and the quote catalog.

use rand::Rng;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::core::catalog::QuoteCatalog;
use crate::core::chain::{ChainError, MoodChain};
use crate::core::theme::{ThemeContexts, ThemeError};
use crate::schema::quote::{Choice, Quote};
use crate::schema::scene::{SceneData, MAX_CHOICES};

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("mood chain error: {0}")]
    Chain(#[from] ChainError),
    #[error("theme context error: {0}")]
    Theme(#[from] ThemeError),
}

/// Default locations of the shipped game data.
pub const DEFAULT_QUOTES_PATH: &str = "data/quotes.csv";
pub const DEFAULT_MOOD_CHAIN_PATH: &str = "data/mood_chain.ron";
pub const DEFAULT_THEME_CONTEXTS_PATH: &str = "data/theme_contexts.ron";

/// Picks the next theme and its quote choices for a given mood.
///
/// Holds only read-only data, so a single selector can serve any number of
/// sessions or threads. All randomness comes from the caller's RNG.
#[derive(Debug, Clone)]
pub struct SceneSelector {
    catalog: Arc<QuoteCatalog>,
    chain: MoodChain,
    contexts: ThemeContexts,
}

/// Builder for constructing a `SceneSelector`.
#[derive(Debug, Default)]
pub struct SceneSelectorBuilder {
    quotes_path: Option<PathBuf>,
    mood_chain_path: Option<PathBuf>,
    theme_contexts_path: Option<PathBuf>,
    /// Directly provided catalog (for testing without files).
    catalog: Option<Arc<QuoteCatalog>>,
    /// Directly provided mood chain (for testing without files).
    chain: Option<MoodChain>,
    /// Directly provided theme contexts (for testing without files).
    contexts: Option<ThemeContexts>,
}

impl SceneSelector {
    pub fn builder() -> SceneSelectorBuilder {
        SceneSelectorBuilder::default()
    }

    pub fn new(catalog: Arc<QuoteCatalog>, chain: MoodChain, contexts: ThemeContexts) -> Self {
        Self {
            catalog,
            chain,
            contexts,
        }
    }

    pub fn catalog(&self) -> &QuoteCatalog {
        &self.catalog
    }

    pub fn mood_chain(&self) -> &MoodChain {
        &self.chain
    }

    pub fn theme_contexts(&self) -> &ThemeContexts {
        &self.contexts
    }

    /// Next scene for `current_mood`, drawn with the thread-local RNG.
    pub fn get_next_scene_data(&self, current_mood: &str) -> SceneData {
        self.next_scene(current_mood, &mut rand::thread_rng())
    }

    /// Next scene for `current_mood`, drawn with the given RNG.
    ///
    /// Never fails: unknown moods use the default candidates, themes without
    /// authored context get the fallback text, and themes without usable
    /// quotes yield an empty choice list.
    pub fn next_scene<R: Rng + ?Sized>(&self, current_mood: &str, rng: &mut R) -> SceneData {
        // 1-2. Draw the theme
        let next_theme = self.chain.next_theme(current_mood, rng).to_string();

        // 3. Frame it
        let context_text = self.contexts.context_for(&next_theme).into_owned();

        // 4-5. Fill choices from distinct works
        let pool = self.catalog.filter_by_theme(&next_theme);
        let pool_size = pool.len();
        let choices = draw_choices(pool, rng);

        tracing::debug!(
            mood = current_mood,
            theme = %next_theme,
            pool = pool_size,
            choices = choices.len(),
            "selected next scene"
        );
        if choices.is_empty() {
            tracing::warn!(theme = %next_theme, "no usable quotes for theme");
        }

        SceneData {
            next_theme,
            context_text,
            choices,
        }
    }
}

/// Draw up to [`MAX_CHOICES`] choices, each from a different work.
///
/// Every draw removes the candidate from the pool. A candidate whose work is
/// already represented is dropped without a replacement draw, so the loop
/// ends once the pool is exhausted even if fewer than three works were found.
fn draw_choices<R: Rng + ?Sized>(mut pool: Vec<&Quote>, rng: &mut R) -> Vec<Choice> {
    let mut choices = Vec::with_capacity(MAX_CHOICES);
    let mut used_works: FxHashSet<&str> = FxHashSet::default();

    while choices.len() < MAX_CHOICES && !pool.is_empty() {
        let index = rng.gen_range(0..pool.len());
        let candidate = pool.swap_remove(index);

        if used_works.insert(candidate.work_id.as_str()) {
            choices.push(Choice::from(candidate));
        }
    }

    choices
}

impl SceneSelectorBuilder {
    pub fn quotes_path(mut self, path: impl AsRef<Path>) -> Self {
        self.quotes_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn mood_chain_path(mut self, path: impl AsRef<Path>) -> Self {
        self.mood_chain_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn theme_contexts_path(mut self, path: impl AsRef<Path>) -> Self {
        self.theme_contexts_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use the shipped data files under `dir` (`quotes.csv`,
    /// `mood_chain.ron`, `theme_contexts.ron`).
    pub fn data_dir(self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.quotes_path(dir.join("quotes.csv"))
            .mood_chain_path(dir.join("mood_chain.ron"))
            .theme_contexts_path(dir.join("theme_contexts.ron"))
    }

    /// Provide a catalog directly (for testing without files).
    pub fn with_catalog(mut self, catalog: impl Into<Arc<QuoteCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Provide a mood chain directly (for testing without files).
    pub fn with_mood_chain(mut self, chain: MoodChain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Provide theme contexts directly (for testing without files).
    pub fn with_theme_contexts(mut self, contexts: ThemeContexts) -> Self {
        self.contexts = Some(contexts);
        self
    }

    /// Build the selector.
    ///
    /// The quote catalog never fails the build: a missing or unreadable file
    /// leaves it empty. Mood chain and theme context files are optional, but
    /// one that exists and does not parse is an error.
    pub fn build(self) -> Result<SceneSelector, SelectorError> {
        let catalog = match (self.catalog, self.quotes_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Arc::new(QuoteCatalog::load(&path)),
            (None, None) => Arc::new(QuoteCatalog::empty()),
        };

        let mut chain = self.chain.unwrap_or_default();
        if let Some(ref path) = self.mood_chain_path {
            if path.exists() {
                chain.merge(MoodChain::load_from_ron(path)?);
            } else {
                tracing::debug!(path = %path.display(), "no mood chain file, using built-in table");
            }
        }

        let mut contexts = self.contexts.unwrap_or_default();
        if let Some(ref path) = self.theme_contexts_path {
            if path.exists() {
                contexts.merge(ThemeContexts::load_from_ron(path)?);
            } else {
                tracing::debug!(path = %path.display(), "no theme context file, using built-in texts");
            }
        }

        tracing::info!(
            quotes = catalog.len(),
            moods = chain.moods().len(),
            "scene selector ready"
        );

        Ok(SceneSelector {
            catalog,
            chain,
            contexts,
        })
    }
}
