//! Paper title sources.
//!
//! The title is either given by the user or guessed from the PDF's text: the
//! first block of consecutive text lines on the first page, ignoring arXiv
//! stamps and lines without letters.

use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest title block, in lines
const MAX_TITLE_LINES: usize = 3;

/// Errors that can occur while obtaining a title
#[derive(Debug, Error)]
pub enum TitleError {
    #[error("cannot find file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read PDF {}; maybe try the -t option?: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },

    #[error("cannot find title in {}; maybe try the -t option?", .0.display())]
    NoTitle(PathBuf),
}

/// Produces the title to search for
pub trait TitleSource {
    fn title(&self) -> Result<String, TitleError>;
}

/// A title supplied by the user
#[derive(Debug, Clone)]
pub struct ManualTitle(pub String);

impl TitleSource for ManualTitle {
    fn title(&self) -> Result<String, TitleError> {
        Ok(self.0.clone())
    }
}

/// A title read from a PDF file
#[derive(Debug, Clone)]
pub struct PdfTitle {
    path: PathBuf,
}

impl PdfTitle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TitleSource for PdfTitle {
    fn title(&self) -> Result<String, TitleError> {
        let text = extract_text(&self.path)?;
        guess_title(&text).ok_or_else(|| TitleError::NoTitle(self.path.clone()))
    }
}

/// Extract the text of a PDF file.
pub fn extract_text(path: &Path) -> Result<String, TitleError> {
    if !path.is_file() {
        return Err(TitleError::NotFound(path.to_path_buf()));
    }

    pdf_extract::extract_text(path).map_err(|e| TitleError::Extraction {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Guess a title from extracted PDF text.
///
/// Returns `None` when the first page has no usable line.
pub fn guess_title(text: &str) -> Option<String> {
    let first_page = text.split('\u{c}').find(|page| !page.trim().is_empty())?;
    let stamp = Regex::new(r"(?i)^arxiv:\s*\S+").ok();

    let mut lines: Vec<&str> = Vec::new();
    for line in first_page.lines().map(str::trim) {
        let is_noise = !line.chars().any(char::is_alphabetic)
            || stamp.as_ref().is_some_and(|re| re.is_match(line));

        if line.is_empty() || is_noise {
            if lines.is_empty() {
                continue;
            }
            break;
        }

        lines.push(line);
        if lines.len() == MAX_TITLE_LINES {
            break;
        }
    }

    if lines.is_empty() {
        return None;
    }

    Some(lines.join(" ").split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Resolve the title to search for: the manual title wins over the PDF.
pub fn resolve_title(manual: Option<&str>, pdf: Option<&Path>) -> Result<String, TitleError> {
    match (manual, pdf) {
        (Some(title), _) => ManualTitle(title.to_string()).title(),
        (None, Some(path)) => PdfTitle::new(path).title(),
        (None, None) => Err(TitleError::NoTitle(PathBuf::new())),
    }
}
