//! Topic link handler.

use axum::extract::Query;
use axum::Json;

use crate::schema::topics::{TopicLinkResponse, TopicQuery};
use crate::topic_map::visualization_url;

/// `GET /topics/visualization-url?topic=...`
pub async fn visualization_link(Query(query): Query<TopicQuery>) -> Json<TopicLinkResponse> {
    let url = visualization_url(&query.topic);
    Json(TopicLinkResponse {
        topic: query.topic,
        url,
    })
}
