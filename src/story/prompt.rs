/// Prompt construction for the external narrator.

use serde::{Deserialize, Serialize};

use crate::schema::quote::Choice;
use crate::story::transcript::Transcript;

/// A request for the narrator: standing instructions plus the turn's ask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePrompt {
    pub system: String,
    pub user: String,
}

/// Knobs for how prompts are worded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptStyle {
    /// The protagonist who wanders between works.
    pub protagonist: String,
    /// The work the protagonist comes from.
    pub home_work: String,
    /// Target length of a bridging scene, in characters.
    pub scene_length: u32,
    /// Target length of the ending, in characters.
    pub ending_length: u32,
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            protagonist: "メロス".to_string(),
            home_work: "走れメロス".to_string(),
            scene_length: 150,
            ending_length: 300,
        }
    }
}

impl PromptStyle {
    fn framing(&self) -> String {
        format!(
            "あなたは物語の語り手である。主人公{}は「{}」の世界を離れ、他の文学作品の世界を渡り歩いている。",
            self.protagonist, self.home_work
        )
    }

    /// Prompt bridging the player's chosen quote into a scene on
    /// `next_theme`.
    pub fn bridge(&self, choice: &Choice, next_theme: &str, context_text: &str) -> ScenePrompt {
        let system = format!(
            "{framing}\
             直前に{hero}は、『{title}』のセリフ「{text}」を選んだ（感情：{mood}）。\
             この選択によって、物語の主題は「{theme}」へと急に移り変わる。\
             場面の手がかり：{context}\
             この急な転換をつなぐ、自然で文学的な橋渡しの文章を書くこと。\
             縦書きの原稿用紙に収まるよう、一行を短くし、改行を多く用いること。\
             新しい場面への導入として、{length}字程度にとどめること。",
            framing = self.framing(),
            hero = self.protagonist,
            title = choice.work_title,
            text = choice.text,
            mood = choice.mood,
            theme = next_theme,
            context = context_text,
            length = self.scene_length,
        );
        let user = format!(
            "{hero}は「{text}」と口にした。目の前に新たな情景が広がる。次の主題は「{theme}」である。この場面転換を描け。",
            hero = self.protagonist,
            text = choice.text,
            theme = next_theme,
        );
        ScenePrompt { system, user }
    }

    /// Prompt closing the story, given everything told so far.
    pub fn ending(&self, transcript: &Transcript, final_mood: &str) -> ScenePrompt {
        let system = format!(
            "{framing}\
             これまでの物語を受けて、{hero}の旅の結末を書くこと。\
             最後の感情は「{mood}」である。その感情にふさわしい終わり方を選ぶこと。\
             一行を短くし、改行を多く用いること。{length}字程度にとどめること。",
            framing = self.framing(),
            hero = self.protagonist,
            mood = final_mood,
            length = self.ending_length,
        );
        let user = format!(
            "これまでの物語：\n{story}\n\n{hero}の物語を締めくくれ。",
            story = transcript.to_text(),
            hero = self.protagonist,
        );
        ScenePrompt { system, user }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_choice() -> Choice {
        Choice {
            text: "私は淋しい人間です。".to_string(),
            work_title: "こころ".to_string(),
            mood: "melancholic".to_string(),
            work_id: "kokoro".to_string(),
            icon_filename: None,
        }
    }

    #[test]
    fn bridge_mentions_choice_and_theme() {
        let prompt = PromptStyle::default().bridge(&make_choice(), "孤独", "静かな孤独が広がる。");
        assert!(prompt.system.contains("私は淋しい人間です。"));
        assert!(prompt.system.contains("こころ"));
        assert!(prompt.system.contains("melancholic"));
        assert!(prompt.system.contains("「孤独」"));
        assert!(prompt.system.contains("静かな孤独が広がる。"));
        assert!(prompt.system.contains("150字"));
        assert!(prompt.user.contains("メロスは「私は淋しい人間です。」"));
    }

    #[test]
    fn bridge_respects_custom_protagonist() {
        let style = PromptStyle {
            protagonist: "セリヌンティウス".to_string(),
            scene_length: 80,
            ..PromptStyle::default()
        };
        let prompt = style.bridge(&make_choice(), "友情", "");
        assert!(prompt.user.starts_with("セリヌンティウスは"));
        assert!(prompt.system.contains("80字"));
        assert!(!prompt.user.contains("メロス"));
    }

    #[test]
    fn ending_includes_story_so_far() {
        let mut transcript = Transcript::new();
        transcript.append("夕日が沈む。");
        transcript.append("友が待つ。");
        let prompt = PromptStyle::default().ending(&transcript, "hopeful");
        assert!(prompt.user.contains("夕日が沈む。\n\n友が待つ。"));
        assert!(prompt.system.contains("「hopeful」"));
    }
}
