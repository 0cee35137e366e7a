//! Markdown rendering of story artifacts.

use derive_getters::Getters;
use fabula_error::{FabulaResult, StorageError, StoryError, StoryErrorKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Title and author written at the top of exported documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ExportConfig {
    /// Document title; defaults to the artifact's file name
    #[serde(default)]
    title: Option<String>,
    /// Author line
    #[serde(default)]
    author: Option<String>,
}

impl ExportConfig {
    /// Creates export metadata.
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        Self { title, author }
    }
}

/// Returns true if `line` opens a chapter.
pub fn is_chapter_heading(line: &str) -> bool {
    line.trim_start()
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("chapter"))
}

/// Renders story text as Markdown.
///
/// Lines starting with `chapter` in any case become second-level headings.
/// Paragraphs separated by blank lines are kept.
///
/// # Examples
///
/// ```
/// use fabula::render_markdown;
///
/// let md = render_markdown("Chapter 1\nThe tide.\n\nIt turned.", Some("Tides"), None);
/// assert_eq!(md, "# Tides\n\n## Chapter 1\n\nThe tide.\n\nIt turned.\n");
/// ```
pub fn render_markdown(story: &str, title: Option<&str>, author: Option<&str>) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(title) = title {
        blocks.push(format!("# {}", title.trim()));
    }
    if let Some(author) = author {
        blocks.push(format!("*by {}*", author.trim()));
    }

    let mut paragraph: Vec<&str> = Vec::new();
    for line in story.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if is_chapter_heading(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(format!("## {}", trimmed));
        } else {
            paragraph.push(line.trim_end());
        }
    }
    flush(&mut paragraph, &mut blocks);

    let mut document = blocks.join("\n\n");
    document.push('\n');
    document
}

fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if !paragraph.is_empty() {
        blocks.push(paragraph.join("\n"));
        paragraph.clear();
    }
}

/// Reads a story artifact and writes its Markdown rendering.
///
/// The title falls back to the configured one, then the input file stem.
/// The output defaults to the input path with a `.md` extension.
///
/// # Errors
///
/// Returns an error if the input is missing or either file operation fails.
#[instrument(skip(config))]
pub async fn export_story(
    input: &Path,
    output: Option<&Path>,
    config: &ExportConfig,
) -> FabulaResult<PathBuf> {
    if !input.is_file() {
        return Err(StoryError::new(StoryErrorKind::MissingInput(
            input.display().to_string(),
        ))
        .into());
    }

    let story = tokio::fs::read_to_string(input)
        .await
        .map_err(StorageError::from)?;

    let title = config.title.clone().or_else(|| {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    });
    let document = render_markdown(&story, title.as_deref(), config.author.as_deref());

    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("md"));
    tokio::fs::write(&target, document)
        .await
        .map_err(StorageError::from)?;

    info!(output = %target.display(), "Story exported");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_detection_is_case_insensitive() {
        assert!(is_chapter_heading("Chapter One"));
        assert!(is_chapter_heading("CHAPTER 2: The Wreck"));
        assert!(is_chapter_heading("  chapter three"));
        assert!(!is_chapter_heading("The chapter ended."));
        assert!(!is_chapter_heading("Chap"));
    }

    #[test]
    fn test_multibyte_line_is_not_a_heading() {
        assert!(!is_chapter_heading("Ça commence"));
    }

    #[test]
    fn test_render_with_author() {
        let md = render_markdown("CHAPTER I\nRain.", Some("Storm"), Some("Ines"));
        assert_eq!(md, "# Storm\n\n*by Ines*\n\n## CHAPTER I\n\nRain.\n");
    }

    #[test]
    fn test_render_keeps_paragraph_lines() {
        let md = render_markdown("one\ntwo\n\n\n\nthree\n", None, None);
        assert_eq!(md, "one\ntwo\n\nthree\n");
    }
}
