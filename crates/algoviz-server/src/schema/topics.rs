//! Topic link lookup types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct TopicQuery {
    pub topic: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicLinkResponse {
    pub topic: String,
    pub url: String,
}
