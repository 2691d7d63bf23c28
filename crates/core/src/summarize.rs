use std::sync::Arc;

use crate::generate::TextGenerator;
use crate::record::{ContentRecord, SummaryRecord};
use crate::{AgendaError, Result};

const SUMMARY_INSTRUCTION: &str = "Summarize the following text into exactly 5 concise bullet points:\n\n";

/// Builds the summary prompt for `text`.
pub fn summary_prompt(text: &str) -> String {
    format!("{SUMMARY_INSTRUCTION}{text}")
}

/// Turns raw content into markdown bullet points.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self { generator, model: model.into() }
    }

    /// Returns the generator's response to the summary prompt, unmodified.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        self.generator
            .generate(&self.model, &summary_prompt(text))
            .await
            .map_err(|e| {
                let err = as_generation_failure(e);
                tracing::error!(error = %err, "summarization failed");
                err
            })
    }

    /// Summarizes a resolved content record.
    pub async fn summarize_content(&self, content: &ContentRecord) -> Result<SummaryRecord> {
        let points = self.summarize(content.text()).await?;
        tracing::info!(source = %content.source(), chars = content.char_count(), "content summarized");
        Ok(SummaryRecord::from_content(content, points))
    }
}

pub(crate) fn as_generation_failure(err: AgendaError) -> AgendaError {
    match err {
        err @ AgendaError::GenerationFailure(_) => err,
        other => AgendaError::GenerationFailure(other.to_string()),
    }
}
