use serde::Deserialize;
use thiserror::Error;

/// One intel briefing entry from the news endpoint. Headline fields default
/// to empty strings so a sparse article still renders as a list row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news endpoint unreachable: {0}")]
    Transport(String),
    #[error("news endpoint returned http {0}")]
    Http(u16),
    #[error("malformed news response: {0}")]
    Malformed(String),
}
