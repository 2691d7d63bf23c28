use std::sync::LazyLock;

use regex::Regex;

use crate::Result;
use crate::parse::{Document, Element};
use crate::preprocess::PreprocessConfig;

static CONTAINER_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)article|post|content|entry").unwrap());

/// Configuration for article text extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Paragraphs must be longer than this many characters after trimming
    pub min_paragraph_chars: usize,
    /// Elements stripped before the container is chosen
    pub preprocess: PreprocessConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_paragraph_chars: 20, preprocess: PreprocessConfig::default() }
    }
}

/// Which element the paragraphs were collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Article,
    Main,
    ClassMatch,
    Body,
}

/// The result of article text extraction
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Paragraph text joined by single spaces
    pub text: String,
    /// Container the paragraphs came from, `None` when the page had no body
    pub container: Option<Container>,
    /// Number of paragraphs kept
    pub paragraph_count: usize,
}

/// Extract the readable paragraph text of an HTML page
pub fn extract_content(html: &str, config: &ExtractConfig) -> Result<ExtractedContent> {
    let doc = Document::parse_with_preprocessing(html, &config.preprocess);

    let Some((container, element)) = find_container(&doc)? else {
        return Ok(ExtractedContent { text: String::new(), container: None, paragraph_count: 0 });
    };

    let paragraphs: Vec<String> = element
        .select("p")?
        .iter()
        .map(|p| p.text().trim().to_string())
        .filter(|text| text.chars().count() > config.min_paragraph_chars)
        .collect();

    tracing::debug!(?container, paragraphs = paragraphs.len(), "extracted article paragraphs");

    Ok(ExtractedContent {
        text: paragraphs.join(" ").trim().to_string(),
        container: Some(container),
        paragraph_count: paragraphs.len(),
    })
}

/// Locate the primary content container: article, then main, then a div with a
/// content-like class, then body
fn find_container(doc: &Document) -> Result<Option<(Container, Element<'_>)>> {
    if let Some(article) = doc.select_first("article")? {
        return Ok(Some((Container::Article, article)));
    }

    if let Some(main) = doc.select_first("main")? {
        return Ok(Some((Container::Main, main)));
    }

    let class_match = doc
        .select("div")?
        .into_iter()
        .find(|el| el.classes().iter().any(|class| CONTAINER_CLASS_RE.is_match(class)));
    if let Some(el) = class_match {
        return Ok(Some((Container::ClassMatch, el)));
    }

    Ok(doc.select_first("body")?.map(|body| (Container::Body, body)))
}
