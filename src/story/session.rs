/// Game session: one playthrough of a fixed number of turns.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::core::chain::START_MOOD;
use crate::core::selector::SceneSelector;
use crate::schema::scene::SceneData;
use crate::story::narrator::{narrate_or_fallback, Narrator, FALLBACK_ENDING, FALLBACK_SCENE};
use crate::story::prompt::PromptStyle;
use crate::story::transcript::Transcript;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("choice {index} is out of range ({available} available)")]
    NoSuchChoice { index: usize, available: usize },
    #[error("the session is over after {0} turns")]
    Finished(u32),
    #[error("the story has not reached its last turn ({played} of {max} played)")]
    NotFinished { played: u32, max: u32 },
}

pub const DEFAULT_MAX_TURNS: u32 = 5;

/// What happened on a played turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    /// The paragraph appended to the transcript.
    pub scene_text: String,
    /// The mood the next turn starts from.
    pub next_mood: String,
    /// Whether the narrator failed and the fallback sentence was used.
    pub fell_back: bool,
    /// Whether the turn limit has been reached.
    pub finished: bool,
}

/// Per-player state: current mood, turn count and the story so far.
#[derive(Debug, Clone)]
pub struct GameSession {
    mood: String,
    turn: u32,
    max_turns: u32,
    ended: bool,
    transcript: Transcript,
    style: PromptStyle,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl GameSession {
    pub fn new(max_turns: u32) -> Self {
        Self {
            mood: START_MOOD.to_string(),
            turn: 0,
            max_turns,
            ended: false,
            transcript: Transcript::new(),
            style: PromptStyle::default(),
        }
    }

    pub fn with_style(mut self, style: PromptStyle) -> Self {
        self.style = style;
        self
    }

    /// Pick up a saved playthrough at `turn` in `mood`. A transcript longer
    /// than the turns played already holds the ending.
    pub fn resume(max_turns: u32, transcript: Transcript, mood: impl Into<String>, turn: u32) -> Self {
        let ended = turn >= max_turns && transcript.len() > turn as usize;
        Self {
            mood: mood.into(),
            turn,
            max_turns,
            ended,
            transcript,
            style: PromptStyle::default(),
        }
    }

    /// Begin a new playthrough: mood back to `start`, transcript cleared.
    pub fn start(&mut self) {
        self.mood = START_MOOD.to_string();
        self.turn = 0;
        self.ended = false;
        self.transcript.reset();
        tracing::info!(max_turns = self.max_turns, "session started");
    }

    pub fn mood(&self) -> &str {
        &self.mood
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn is_finished(&self) -> bool {
        self.turn >= self.max_turns
    }

    /// Whether the ending has been written.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn style(&self) -> &PromptStyle {
        &self.style
    }

    /// The scene to offer for the current mood.
    pub fn offer<R: Rng + ?Sized>(&self, selector: &SceneSelector, rng: &mut R) -> SceneData {
        selector.next_scene(&self.mood, rng)
    }

    /// Draw scenes until one offers choices, giving up after `max_draws`.
    pub fn offer_playable<R: Rng + ?Sized>(
        &self,
        selector: &SceneSelector,
        rng: &mut R,
        max_draws: u32,
    ) -> Option<SceneData> {
        (0..max_draws)
            .map(|_| self.offer(selector, rng))
            .find(|scene| !scene.has_no_choices())
    }

    /// Play choice `index` of `scene`: narrate the bridge into the scene's
    /// theme, append it to the transcript and take the chosen quote's mood.
    pub fn choose<N: Narrator + ?Sized>(
        &mut self,
        scene: &SceneData,
        index: usize,
        narrator: &N,
    ) -> Result<TurnOutcome, SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished(self.max_turns));
        }
        let choice = scene
            .choices
            .get(index)
            .ok_or(SessionError::NoSuchChoice {
                index,
                available: scene.choices.len(),
            })?;

        let prompt = self
            .style
            .bridge(choice, &scene.next_theme, &scene.context_text);
        let narration = narrate_or_fallback(narrator, &prompt, FALLBACK_SCENE);

        self.transcript.append(narration.text.clone());
        self.mood = choice.mood.clone();
        self.turn += 1;

        tracing::debug!(
            turn = self.turn,
            work = %choice.work_id,
            mood = %self.mood,
            theme = %scene.next_theme,
            "turn played"
        );

        Ok(TurnOutcome {
            scene_text: narration.text,
            next_mood: self.mood.clone(),
            fell_back: narration.fell_back,
            finished: self.is_finished(),
        })
    }

    /// Write the ending once the last turn has been played. Calling it again
    /// returns the ending already written.
    pub fn finish<N: Narrator + ?Sized>(&mut self, narrator: &N) -> Result<String, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished {
                played: self.turn,
                max: self.max_turns,
            });
        }
        if self.ended {
            if let Some(ending) = self.transcript.last() {
                return Ok(ending.to_string());
            }
        }

        let prompt = self.style.ending(&self.transcript, &self.mood);
        let narration = narrate_or_fallback(narrator, &prompt, FALLBACK_ENDING);
        self.transcript.append(narration.text.clone());
        self.ended = true;
        tracing::info!(paragraphs = self.transcript.len(), "session ended");
        Ok(narration.text)
    }
}
