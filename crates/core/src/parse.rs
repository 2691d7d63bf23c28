//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use agenda_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::{AgendaError, PreprocessConfig, Result, preprocess};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string without preprocessing.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses HTML after stripping the elements listed in `config`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agenda_core::{PreprocessConfig, parse::Document};
    ///
    /// let html = "<html><body><nav>Menu</nav><p>Content</p></body></html>";
    /// let doc = Document::parse_with_preprocessing(html, &PreprocessConfig::default());
    /// assert!(doc.select("nav").unwrap().is_empty());
    /// assert_eq!(doc.select("p").unwrap().len(), 1);
    /// ```
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Self {
        let cleaned = preprocess::preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::HtmlParse`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AgendaError::HtmlParse(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use agenda_core::parse::Document;
///
/// let html = r#"<div class="post entry">Body</div>"#;
/// let doc = Document::parse(html);
/// let div = &doc.select("div").unwrap()[0];
///
/// assert_eq!(div.text(), "Body");
/// assert!(div.classes().contains(&"entry"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the individual class names of this element.
    pub fn classes(&self) -> Vec<&'a str> {
        self.element.value().classes().collect()
    }

    /// Selects descendant elements using a CSS selector.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_with_preprocessing_drops_chrome() {
        let html = "<body><header>Site</header><script>x()</script><p>Kept</p><footer>Legal</footer></body>";
        let doc = Document::parse_with_preprocessing(html, &PreprocessConfig::default());

        assert!(doc.select("header, script, footer").unwrap().is_empty());
        assert_eq!(doc.select_first("p").unwrap().unwrap().text(), "Kept");
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_classes() {
        let doc = Document::parse(r#"<div class="Entry-Body  wide">x</div>"#);
        let div = doc.select_first("div").unwrap().unwrap();

        assert_eq!(div.classes(), vec!["Entry-Body", "wide"]);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(AgendaError::HtmlParse(_))));
    }

    #[test]
    fn test_nested_select() {
        let doc = Document::parse("<main><p>inner</p></main><p>outer</p>");
        let main = doc.select_first("main").unwrap().unwrap();
        let paragraphs = main.select("p").unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "inner");
    }
}
