//! Decoding of NewsAPI `everything` responses.
//!
//! The whole body is decoded in one pass; a single bad element fails the
//! call rather than being skipped.

use serde::Deserialize;
use uuid::Uuid;

use crate::types::Article;
use crate::Result;

#[derive(Deserialize)]
struct SearchResponse {
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: String,
    url: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: raw.author,
            title: raw.title,
            url: raw.url,
            published_at: raw.published_at.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
        }
    }
}

/// NewsAPI error envelope: `{"status":"error","code":"...","message":"..."}`.
#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Parses a response body and drops retracted articles.
pub fn decode(body: &str) -> Result<Vec<Article>> {
    Ok(filter_removed(parse(body)?))
}

/// Parses a response body without filtering.
pub fn parse(body: &str) -> Result<Vec<Article>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.articles.into_iter().map(Article::from).collect())
}

pub fn filter_removed(articles: Vec<Article>) -> Vec<Article> {
    articles.into_iter().filter(|a| !a.is_removed()).collect()
}

/// Extracts the human-readable message from an error body, if it has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": null, "name": "Example"},
                "author": "Jane Roe",
                "title": "Artemis update",
                "url": "https://example.com/artemis",
                "publishedAt": "2024-05-02T10:00:00Z",
                "content": "Body"
            },
            {
                "author": null,
                "title": "[Removed]",
                "url": "https://removed.com",
                "publishedAt": "1970-01-01T00:00:00Z",
                "content": "[Removed]"
            },
            {
                "title": "[removed]",
                "url": "https://example.com/lower",
                "publishedAt": "2024-05-01T10:00:00Z",
                "content": null
            }
        ]
    }"#;

    #[test]
    fn test_decode_filters_exact_removed_title() {
        let articles = decode(BODY).unwrap();
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Artemis update", "[removed]"]);
    }

    #[test]
    fn test_parse_maps_fields() {
        let articles = parse(BODY).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].author.as_deref(), Some("Jane Roe"));
        assert_eq!(articles[0].published_at, "2024-05-02T10:00:00Z");
        assert_eq!(articles[0].content, "Body");
        assert_eq!(articles[1].author, None);
        assert_eq!(articles[2].content, "");
    }

    #[test]
    fn test_decode_assigns_fresh_ids() {
        let first = decode(BODY).unwrap();
        let second = decode(BODY).unwrap();
        assert_ne!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn test_missing_required_field_fails_whole_body() {
        let body = r#"{"articles": [
            {"title": "ok", "url": "https://example.com/1"},
            {"title": "no url"}
        ]}"#;
        assert!(matches!(decode(body), Err(Error::Decode(_))));
    }

    #[test]
    fn test_malformed_body_fails() {
        assert!(matches!(decode("<html>"), Err(Error::Decode(_))));
        assert!(matches!(decode(r#"{"status":"ok"}"#), Err(Error::Decode(_))));
    }

    #[test]
    fn test_empty_articles_is_ok() {
        assert!(decode(r#"{"articles": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        assert_eq!(error_message(body).as_deref(), Some("Your API key is invalid."));
        assert_eq!(error_message("gateway timeout"), None);
    }
}
