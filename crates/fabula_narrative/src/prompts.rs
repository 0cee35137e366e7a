//! Prompt builders for each generation stage.
//!
//! Every builder is a pure function of its inputs. Each prompt opens with the
//! stage's persona line. Word targets are instructions to the model and are
//! never checked afterwards.

use crate::Stage;
use fabula_core::{StoryFoundation, Topic};

/// Builds the setting prompt.
pub fn world_prompt(topic: &Topic) -> String {
    format!(
        "{}\nDescribe the setting for a story about:\n{}\n\n\
         Cover place, era, atmosphere and the rules that shape daily life. \
         Keep it under 150 words.",
        Stage::WorldBuilder.persona(),
        topic
    )
}

/// Builds the character prompt.
pub fn characters_prompt(topic: &Topic) -> String {
    format!(
        "{}\nCreate 2-3 main characters for a story about:\n{}\n\n\
         For each give a name, a want, a fear and a distinguishing habit. \
         Keep it under 200 words.",
        Stage::CharacterBuilder.persona(),
        topic
    )
}

/// Builds the theme prompt.
pub fn theme_prompt(topic: &Topic, world: &str, characters: &str) -> String {
    format!(
        "{}\nState the central theme of a story in one or two sentences.\n\n\
         Topic:\n{}\n\nWorld:\n{}\n\nCharacters:\n{}",
        Stage::ThemeBuilder.persona(),
        topic,
        world,
        characters
    )
}

/// Builds the style guide prompt.
pub fn style_prompt(topic: &Topic) -> String {
    format!(
        "{}\nWrite short directives on tone, narrative voice, point of view and \
         sentence rhythm for a story about:\n{}",
        Stage::StyleGuide.persona(),
        topic
    )
}

/// Builds the outline prompt for a story of `parts` sections.
pub fn outline_prompt(
    topic: &Topic,
    world: &str,
    characters: &str,
    theme: &str,
    parts: usize,
) -> String {
    format!(
        "{}\nOutline a story in {} numbered parts with escalating stakes and a \
         resolution in the final part.\n\n\
         Topic:\n{}\n\nWorld:\n{}\n\nCharacters:\n{}\n\nTheme:\n{}",
        Stage::PlotPlanner.persona(),
        parts,
        topic,
        world,
        characters,
        theme
    )
}

/// Assembles the context carried into each section prompt: the theme, the
/// latest memory digest and the most recent sections.
pub fn rolling_context(theme: &str, memory: &str, recent_sections: &[&str]) -> String {
    let mut context = format!("Theme:\n{}\n", theme);

    if !memory.is_empty() {
        context.push_str(&format!("\nStory so far (summary):\n{}\n", memory));
    }

    if !recent_sections.is_empty() {
        context.push_str("\nMost recent sections:\n");
        context.push_str(&recent_sections.join("\n\n"));
        context.push('\n');
    }

    context
}

/// Builds the prompt for section `index` (0-based) of `total`.
pub fn section_prompt(
    foundation: &StoryFoundation,
    rolling_context: &str,
    index: usize,
    total: usize,
    target_words: usize,
) -> String {
    format!(
        "{}\nWrite part {} of {} of a story about:\n{}\n\n\
         World:\n{}\n\nCharacters:\n{}\n\nOutline:\n{}\n\nStyle:\n{}\n\n\
         {}\n\
         Continue the story from where it left off, following the outline for \
         this part. Write about {} words. Output only the story text.",
        Stage::SectionWriter.persona(),
        index + 1,
        total,
        foundation.topic(),
        foundation.world(),
        foundation.characters(),
        foundation.outline(),
        foundation.style(),
        rolling_context,
        target_words
    )
}

/// Builds the critique prompt, asking for an explicit score line.
pub fn critique_prompt(section: &str) -> String {
    format!(
        "{}\nAnalyze the story section below.\n\
         Point out weaknesses in:\n\
         - Plot\n\
         - Character depth\n\
         - Emotional impact\n\
         - Ending strength\n\n\
         Finish with a line of the form \"Score: N/10\".\n\n\
         Section:\n{}",
        Stage::SectionCritic.persona(),
        section
    )
}

/// Builds the revision prompt for a section and its critique.
pub fn edit_prompt(section: &str, critique: &str) -> String {
    format!(
        "{}\nImprove the section using this critique.\n\n\
         Critique:\n{}\n\n\
         Original section:\n{}\n\n\
         Rewrite the section with stronger emotional depth and tighter \
         structure. Output only the revised text.",
        Stage::SectionEditor.persona(),
        critique,
        section
    )
}

/// Builds the rolling digest prompt.
pub fn summary_prompt(story_so_far: &str) -> String {
    format!(
        "{}\nSummarize the story so far in under 200 words. Keep names, \
         unresolved threads and the current situation.\n\n\
         Story:\n{}",
        Stage::Summarizer.persona(),
        story_so_far
    )
}

/// Builds the whole-story revision prompt.
pub fn macro_edit_prompt(story: &str) -> String {
    format!(
        "{}\nRevise the manuscript below for cohesion and consistency: fix \
         contradictions in names and timeline and smooth transitions between \
         sections. Keep chapter headings. Output only the revised manuscript.\n\n\
         Manuscript:\n{}",
        Stage::MacroEditor.persona(),
        story
    )
}

/// Builds the one-shot short story prompt used by draft mode.
pub fn draft_prompt(topic: &Topic, target_words: usize) -> String {
    format!(
        "{}\nWrite a {} word short story about:\n{}",
        Stage::DraftWriter.persona(),
        target_words,
        topic
    )
}
