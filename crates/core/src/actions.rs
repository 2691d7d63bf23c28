use std::sync::Arc;

use crate::Result;
use crate::generate::TextGenerator;
use crate::record::{ActionItem, SummaryRecord};
use crate::summarize::as_generation_failure;

/// Upper bound on the number of extracted actions.
pub const MAX_ACTIONS: usize = 5;

const ACTIONS_INSTRUCTION: &str = "Given these summary points, extract 3 to 5 concrete, actionable tasks for a calendar. \
                                   Return ONLY a simple list, one per line:\n\n";

/// Builds the action extraction prompt for `summary`.
pub fn actions_prompt(summary: &str) -> String {
    format!("{ACTIONS_INSTRUCTION}{summary}")
}

fn is_enumeration_char(c: char) -> bool {
    matches!(c, '-' | ' ' | '.' | '1'..='5')
}

/// Parses a free-form generator response into at most [`MAX_ACTIONS`] actions.
///
/// Each line is trimmed and loses any leading run of `-`, spaces, `.` and the
/// digits 1-5. Lines left empty are dropped; order is preserved. Fewer than
/// three actions is not an error.
///
/// ```rust
/// use agenda_core::parse_actions;
///
/// let actions = parse_actions("1. Buy milk\n2. Call bank\n- Email team\n\n3. File taxes");
/// assert_eq!(actions, vec!["Buy milk", "Call bank", "Email team", "File taxes"]);
/// ```
pub fn parse_actions(response: &str) -> Vec<String> {
    response
        .lines()
        .map(|line| line.trim().trim_start_matches(is_enumeration_char))
        .filter(|line| !line.is_empty())
        .take(MAX_ACTIONS)
        .map(str::to_string)
        .collect()
}

/// Extracts actionable tasks from summary points.
#[derive(Clone)]
pub struct ActionExtractor {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl ActionExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self { generator, model: model.into() }
    }

    /// Asks the generator for tasks and parses the reply with [`parse_actions`].
    pub async fn extract_actions(&self, summary_points: &str) -> Result<Vec<String>> {
        let response = self
            .generator
            .generate(&self.model, &actions_prompt(summary_points))
            .await
            .map_err(|e| {
                let err = as_generation_failure(e);
                tracing::error!(error = %err, "action extraction failed");
                err
            })?;

        let actions = parse_actions(&response);
        if actions.len() < 3 {
            tracing::warn!(count = actions.len(), "generator returned fewer than 3 actions");
        }
        tracing::info!(count = actions.len(), "actions extracted");
        Ok(actions)
    }

    /// Extracts actions from a summary record as [`ActionItem`]s.
    pub async fn extract_items(&self, summary: &SummaryRecord) -> Result<Vec<ActionItem>> {
        let actions = self.extract_actions(&summary.points).await?;
        Ok(actions.into_iter().map(ActionItem::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgendaError;
    use async_trait::async_trait;

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
            assert!(prompt.starts_with("Given these summary points, extract 3 to 5 concrete, actionable tasks"));
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String> {
            Err(AgendaError::GenerationFailure("quota exceeded".into()))
        }
    }

    #[test]
    fn test_parse_strips_prefixes_and_blank_lines() {
        let actions = parse_actions("1. Buy milk\n2. Call bank\n- Email team\n\n3. File taxes");
        assert_eq!(actions, vec!["Buy milk", "Call bank", "Email team", "File taxes"]);
    }

    #[test]
    fn test_parse_truncates_to_five_in_order() {
        let actions = parse_actions("a\nb\nc\nd\ne\nf\ng");
        assert_eq!(actions, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_parse_drops_prefix_only_lines() {
        let actions = parse_actions("  - \n1.\n   \r\n4. Review notes\r\n");
        assert_eq!(actions, vec!["Review notes"]);
    }

    #[test]
    fn test_parse_only_strips_leading_set() {
        assert_eq!(parse_actions("5. Plan Q3 - draft"), vec!["Plan Q3 - draft"]);
        assert_eq!(parse_actions("6. Six is not stripped"), vec!["6. Six is not stripped"]);
        assert_eq!(parse_actions("* Bullet kept"), vec!["* Bullet kept"]);
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(parse_actions("").is_empty());
    }

    #[tokio::test]
    async fn test_extract_allows_fewer_than_three() {
        let extractor = ActionExtractor::new(Arc::new(Canned("1. Only one task")), "m");
        let actions = extractor.extract_actions("* summary").await.unwrap();
        assert_eq!(actions, vec!["Only one task"]);
    }

    #[tokio::test]
    async fn test_extract_items() {
        let extractor = ActionExtractor::new(Arc::new(Canned("- Call bank\n- Email team")), "m");
        let summary = SummaryRecord { points: "* p".into(), source_type: "article".into(), character_count: 3 };
        let items = extractor.extract_items(&summary).await.unwrap();
        assert_eq!(items, vec![ActionItem::new("Call bank"), ActionItem::new("Email team")]);
    }

    #[tokio::test]
    async fn test_extract_failure() {
        let extractor = ActionExtractor::new(Arc::new(Failing), "m");
        let result = extractor.extract_actions("* summary").await;
        assert!(matches!(result, Err(AgendaError::GenerationFailure(_))));
    }
}
