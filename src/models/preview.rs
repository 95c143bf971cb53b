use serde::{Deserialize, Serialize};

use super::Platform;

/// Normalised preview record produced once per resolved URL.
///
/// The link-creation path persists these fields on the saved link. `context`
/// is what the chat feature later feeds to the model as background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewData {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub platform: Platform,
    pub context: String,
    /// Embeddable markup; only X posts carry this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_html: Option<String>,
}

impl PreviewData {
    /// Best available background text: context, then description, then title.
    pub fn chat_context(&self) -> &str {
        [Some(self.context.as_str()), self.description.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(self.title.as_str())
    }

    /// Render the question prompt for a chat about the link at `url`.
    pub fn chat_prompt(&self, url: &str, question: &str) -> String {
        format!(
            "Based on the following context about a saved link, please answer the user's question concisely.\n\
             \n\
             Context:\n\
             ---\n\
             URL: {url}\n\
             Title: {title}\n\
             Content Summary: {context}\n\
             ---\n\
             \n\
             User's Question: \"{question}\"\n\
             \n\
             Answer:",
            title = self.title,
            context = self.chat_context(),
        )
    }
}
