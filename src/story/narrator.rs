/// The external narrator seam and its fallback behaviour.

use thiserror::Error;

use crate::story::prompt::ScenePrompt;

#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("narrator credential is not configured")]
    MissingCredential,
    #[error("narrator timed out")]
    Timeout,
    #[error("malformed narrator response: {0}")]
    MalformedResponse(String),
    #[error("narrator backend error: {0}")]
    Backend(String),
}

/// Sentence used in place of generated text when the narrator fails.
pub const FALLBACK_SCENE: &str = "メロスは、新たな場面へと足を踏み入れた。";
/// Ending used when the narrator fails on the final turn.
pub const FALLBACK_ENDING: &str = "こうしてメロスの旅は、ひとまず幕を閉じた。";

/// Anything that turns a prompt into story text, typically a hosted
/// language model. Output is untrusted and used verbatim.
pub trait Narrator {
    fn generate(&self, prompt: &ScenePrompt) -> Result<String, NarratorError>;
}

impl<N: Narrator + ?Sized> Narrator for &N {
    fn generate(&self, prompt: &ScenePrompt) -> Result<String, NarratorError> {
        (**self).generate(prompt)
    }
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn generate(&self, prompt: &ScenePrompt) -> Result<String, NarratorError> {
        (**self).generate(prompt)
    }
}

/// Result of asking the narrator, recording whether the fallback was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub fell_back: bool,
}

/// Generate text for `prompt`, substituting `fallback` on any failure.
/// Empty or whitespace-only output also counts as a failure.
pub fn narrate_or_fallback<N: Narrator + ?Sized>(
    narrator: &N,
    prompt: &ScenePrompt,
    fallback: &str,
) -> Narration {
    match narrator.generate(prompt) {
        Ok(text) if !text.trim().is_empty() => Narration {
            text,
            fell_back: false,
        },
        Ok(_) => {
            tracing::warn!("narrator returned empty text, using fallback");
            Narration {
                text: fallback.to_string(),
                fell_back: true,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "narrator failed, using fallback");
            Narration {
                text: fallback.to_string(),
                fell_back: true,
            }
        }
    }
}

/// A narrator that never calls out: it frames the scene from the prompt's
/// own ask. Used by the terminal player and demos when no model is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoNarrator;

impl Narrator for EchoNarrator {
    fn generate(&self, prompt: &ScenePrompt) -> Result<String, NarratorError> {
        Ok(prompt.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(fn() -> NarratorError);

    impl Narrator for Failing {
        fn generate(&self, _prompt: &ScenePrompt) -> Result<String, NarratorError> {
            Err((self.0)())
        }
    }

    struct Fixed(&'static str);

    impl Narrator for Fixed {
        fn generate(&self, _prompt: &ScenePrompt) -> Result<String, NarratorError> {
            Ok(self.0.to_string())
        }
    }

    fn prompt() -> ScenePrompt {
        ScenePrompt {
            system: "sys".to_string(),
            user: "user ask".to_string(),
        }
    }

    #[test]
    fn success_is_used_verbatim() {
        let narration = narrate_or_fallback(&Fixed("  <b>raw</b>  "), &prompt(), FALLBACK_SCENE);
        assert_eq!(narration.text, "  <b>raw</b>  ");
        assert!(!narration.fell_back);
    }

    #[test]
    fn every_failure_kind_falls_back() {
        let failures: [fn() -> NarratorError; 4] = [
            || NarratorError::MissingCredential,
            || NarratorError::Timeout,
            || NarratorError::MalformedResponse("no candidates".to_string()),
            || NarratorError::Backend("503".to_string()),
        ];
        for make in failures {
            let narration = narrate_or_fallback(&Failing(make), &prompt(), FALLBACK_SCENE);
            assert_eq!(narration.text, FALLBACK_SCENE);
            assert!(narration.fell_back);
        }
    }

    #[test]
    fn blank_output_falls_back() {
        let narration = narrate_or_fallback(&Fixed(" \n "), &prompt(), FALLBACK_SCENE);
        assert!(narration.fell_back);
    }

    #[test]
    fn boxed_and_borrowed_narrators_delegate() {
        let boxed: Box<dyn Narrator> = Box::new(EchoNarrator);
        assert_eq!(boxed.generate(&prompt()).unwrap(), "user ask");
        let borrowed = &EchoNarrator;
        assert_eq!(narrate_or_fallback(&borrowed, &prompt(), "x").text, "user ask");
    }
}
