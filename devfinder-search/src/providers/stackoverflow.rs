//! Stack Overflow question search through the Stack Exchange API (JSON).
//!
//! The API returns question titles already HTML-entity-encoded
//! (`&quot;`, `&#39;`), so titles are passed through untouched; escaping
//! them again would display the entities literally.

use serde::Deserialize;

use crate::config::{is_http_url, SearchConfig};
use crate::error::SearchError;
use crate::markup::escape_html;
use crate::provider::Provider;
use crate::types::{ProviderId, ResultRecord, ResultSet};

/// Stack Exchange `/2.3/search` provider scoped to stackoverflow.
pub struct StackOverflowProvider;

#[derive(Debug, Deserialize)]
struct Question {
    title: String,
    link: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_answered: bool,
}

impl Provider for StackOverflowProvider {
    fn id(&self) -> ProviderId {
        ProviderId::StackOverflow
    }

    fn request(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> reqwest::RequestBuilder {
        // The API has no page-size parameter here; truncation happens in
        // the parser.
        client
            .get(SearchConfig::endpoint(
                &config.stackexchange_base_url,
                "2.3/search",
            ))
            .query(&[
                ("order", "desc"),
                ("sort", "relevance"),
                ("intitle", query),
                ("site", "stackoverflow"),
            ])
    }

    fn parse(&self, raw: &str, query: &str, max_results: usize) -> Result<ResultSet, SearchError> {
        tracing::trace!(query, "parsing Stack Overflow response");
        parse_stackoverflow_json(raw, max_results)
    }
}

fn parse_stackoverflow_json(raw: &str, max_results: usize) -> Result<ResultSet, SearchError> {
    let body: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| SearchError::Parse(format!("Stack Overflow response is not JSON: {e}")))?;
    let object = body
        .as_object()
        .ok_or_else(|| SearchError::Parse("Stack Overflow response is not a JSON object".into()))?;

    let Some(items) = object.get("items").and_then(serde_json::Value::as_array) else {
        tracing::debug!("Stack Overflow response has no items array");
        return Ok(ResultSet::default());
    };

    let records: Vec<ResultRecord> = items
        .iter()
        .filter_map(|item| match Question::deserialize(item) {
            Ok(question) if is_http_url(&question.link) => Some(question_to_record(question)),
            Ok(question) => {
                tracing::warn!(link = %question.link, "skipped Stack Overflow item with a non-absolute link");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipped a malformed Stack Overflow item");
                None
            }
        })
        .take(max_results)
        .collect();

    tracing::debug!(count = records.len(), "Stack Overflow results parsed");
    Ok(ResultSet::new(records))
}

fn question_to_record(question: Question) -> ResultRecord {
    let title = if question.title.trim().is_empty() {
        "Untitled question".to_owned()
    } else {
        question.title
    };

    let tags = if question.tags.is_empty() {
        "none".to_owned()
    } else {
        escape_html(&question.tags.join(", "))
    };
    let answered = if question.is_answered { "Yes" } else { "No" };

    ResultRecord {
        title,
        link: question.link,
        description: format!("Tags: {tags} | Answered: {answered}"),
        source_label: ProviderId::StackOverflow.label().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: usize, answered: bool) -> String {
        format!(
            r#"{{"title": "Question {n}", "link": "https://stackoverflow.com/questions/{n}", "tags": ["rust", "lifetimes"], "is_answered": {answered}}}"#
        )
    }

    #[test]
    fn parse_builds_tag_and_answer_summary() {
        let raw = format!(r#"{{"items": [{}, {}], "has_more": false}}"#, item(1, true), item(2, false));
        let set = parse_stackoverflow_json(&raw, 5).expect("should parse");
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].title, "Question 1");
        assert_eq!(set.records()[0].link, "https://stackoverflow.com/questions/1");
        assert_eq!(
            set.records()[0].description,
            "Tags: rust, lifetimes | Answered: Yes"
        );
        assert_eq!(
            set.records()[1].description,
            "Tags: rust, lifetimes | Answered: No"
        );
        assert_eq!(set.records()[0].source_label, "StackOverflow");
    }

    #[test]
    fn title_entities_are_kept_verbatim() {
        let raw = r#"{"items": [{"title": "What does &quot;cannot move out of&quot; mean?", "link": "https://stackoverflow.com/q/9", "tags": [], "is_answered": true}]}"#;
        let set = parse_stackoverflow_json(raw, 5).expect("should parse");
        assert_eq!(
            set.records()[0].title,
            "What does &quot;cannot move out of&quot; mean?"
        );
        assert_eq!(set.records()[0].description, "Tags: none | Answered: Yes");
    }

    #[test]
    fn capped_to_first_five_in_order() {
        let items: Vec<String> = (0..30).map(|n| item(n, n % 2 == 0)).collect();
        let raw = format!(r#"{{"items": [{}]}}"#, items.join(","));
        let set = parse_stackoverflow_json(&raw, 5).expect("should parse");
        assert_eq!(set.len(), 5);
        let titles: Vec<_> = set.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Question 0", "Question 1", "Question 2", "Question 3", "Question 4"]
        );
    }

    #[test]
    fn missing_or_empty_items_is_empty() {
        assert!(parse_stackoverflow_json(r#"{"items": []}"#, 5)
            .expect("parse")
            .is_empty());
        assert!(parse_stackoverflow_json(r#"{"error_id": 400}"#, 5)
            .expect("parse")
            .is_empty());
    }

    #[test]
    fn malformed_item_is_skipped() {
        let raw = format!(
            r#"{{"items": [{}, {{"link": "https://stackoverflow.com/q/x"}}, {}]}}"#,
            item(1, true),
            item(3, false)
        );
        let set = parse_stackoverflow_json(&raw, 5).expect("should parse");
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[1].title, "Question 3");
    }

    #[test]
    fn non_json_is_parse_error() {
        let err = parse_stackoverflow_json("Service Unavailable", 5).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn request_filters_by_title() {
        let client = reqwest::Client::new();
        let request = StackOverflowProvider
            .request(&client, "borrow checker", &SearchConfig::default())
            .build()
            .expect("request");
        assert_eq!(
            request.url().as_str(),
            "https://api.stackexchange.com/2.3/search?order=desc&sort=relevance&intitle=borrow+checker&site=stackoverflow"
        );
    }
}
