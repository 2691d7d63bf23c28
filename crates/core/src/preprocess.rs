use std::sync::LazyLock;

use regex::Regex;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Elements dropped before paragraph text is collected
pub const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Tags removed together with their content
    pub strip_tags: Vec<String>,
    /// Whether to remove HTML comments
    pub remove_comments: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { strip_tags: STRIPPED_TAGS.iter().map(|t| t.to_string()).collect(), remove_comments: true }
    }
}

/// Preprocess HTML by removing page chrome and non-content elements
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = remove_tags(html, &config.strip_tags);

    if config.remove_comments {
        processed = remove_comments(&processed);
    }

    processed
}

/// Remove every element named in `tags`, content included
fn remove_tags(html: &str, tags: &[String]) -> String {
    if tags.is_empty() {
        return html.to_string();
    }

    let mut output = String::new();
    let handlers = tags
        .iter()
        .map(|tag| {
            lol_html::element!(tag.as_str(), |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings { element_content_handlers: handlers, ..Default::default() },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() || rewriter.end().is_err() {
        return html.to_string();
    }

    output
}

/// Remove HTML comments from the document
fn remove_comments(html: &str) -> String {
    COMMENT_RE.replace_all(html, "").to_string()
}
