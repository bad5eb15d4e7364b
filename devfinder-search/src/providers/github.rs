//! GitHub repository search (JSON), sorted by stars.

use serde::Deserialize;

use crate::config::{is_http_url, SearchConfig};
use crate::error::SearchError;
use crate::markup::escape_html;
use crate::provider::Provider;
use crate::types::{ProviderId, ResultRecord, ResultSet};

const NO_DESCRIPTION: &str = "No description available.";

/// GitHub REST API repository search provider.
pub struct GithubProvider;

/// The fields of a repository item devfinder displays.
#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
}

impl Provider for GithubProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Github
    }

    fn request(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> reqwest::RequestBuilder {
        let per_page = config.max_results.to_string();
        client
            .get(SearchConfig::endpoint(
                &config.github_base_url,
                "search/repositories",
            ))
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ])
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }

    fn parse(&self, raw: &str, query: &str, max_results: usize) -> Result<ResultSet, SearchError> {
        tracing::trace!(query, "parsing GitHub response");
        parse_github_json(raw, max_results)
    }
}

/// Parse a GitHub search response into search results.
///
/// A body that is not a JSON object is a [`SearchError::Parse`]. A missing
/// or non-array `items` yields an empty set; undecodable items are skipped.
fn parse_github_json(raw: &str, max_results: usize) -> Result<ResultSet, SearchError> {
    let body: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| SearchError::Parse(format!("GitHub response is not JSON: {e}")))?;
    let object = body
        .as_object()
        .ok_or_else(|| SearchError::Parse("GitHub response is not a JSON object".into()))?;

    let Some(items) = object.get("items").and_then(serde_json::Value::as_array) else {
        tracing::debug!("GitHub response has no items array");
        return Ok(ResultSet::default());
    };

    let records: Vec<ResultRecord> = items
        .iter()
        .filter_map(|item| match Repository::deserialize(item) {
            Ok(repo) if is_http_url(&repo.html_url) => Some(repo_to_record(repo)),
            Ok(repo) => {
                tracing::warn!(url = %repo.html_url, "skipped GitHub item with a non-absolute URL");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipped a malformed GitHub item");
                None
            }
        })
        .take(max_results)
        .collect();

    tracing::debug!(count = records.len(), "GitHub results parsed");
    Ok(ResultSet::new(records))
}

fn repo_to_record(repo: Repository) -> ResultRecord {
    let title = if repo.full_name.trim().is_empty() {
        "Unnamed repository".to_owned()
    } else {
        escape_html(repo.full_name.trim())
    };

    let description = match repo.description.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => escape_html(text),
        _ => NO_DESCRIPTION.to_owned(),
    };

    ResultRecord {
        title,
        link: repo.html_url,
        description: format!(
            "{description} <br> <strong> {} stars</strong>",
            repo.stargazers_count
        ),
        source_label: ProviderId::Github.label().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_GITHUB_JSON: &str = r#"{
  "total_count": 3,
  "incomplete_results": false,
  "items": [
    {
      "full_name": "rust-lang/rust",
      "html_url": "https://github.com/rust-lang/rust",
      "description": "Empowering everyone to build reliable and efficient software.",
      "stargazers_count": 98000
    },
    {
      "full_name": "tokio-rs/tokio",
      "html_url": "https://github.com/tokio-rs/tokio",
      "description": null,
      "stargazers_count": 27000
    },
    {
      "full_name": "serde-rs/serde",
      "html_url": "https://github.com/serde-rs/serde",
      "description": "Serialization <framework> for Rust",
      "stargazers_count": 9000
    }
  ]
}"#;

    #[test]
    fn parse_mock_json_returns_results() {
        let set = parse_github_json(MOCK_GITHUB_JSON, 5).expect("should parse");
        assert_eq!(set.len(), 3);

        let first = &set.records()[0];
        assert_eq!(first.title, "rust-lang/rust");
        assert_eq!(first.link, "https://github.com/rust-lang/rust");
        assert_eq!(
            first.description,
            "Empowering everyone to build reliable and efficient software. <br> <strong> 98000 stars</strong>"
        );
        assert_eq!(first.source_label, "GitHub");
    }

    #[test]
    fn missing_description_gets_placeholder() {
        let set = parse_github_json(MOCK_GITHUB_JSON, 5).expect("should parse");
        assert!(set.records()[1]
            .description
            .starts_with("No description available."));
        assert!(set.records()[1].description.contains("27000 stars"));
    }

    #[test]
    fn description_text_is_escaped() {
        let set = parse_github_json(MOCK_GITHUB_JSON, 5).expect("should parse");
        assert!(set.records()[2]
            .description
            .starts_with("Serialization &lt;framework&gt; for Rust"));
    }

    #[test]
    fn empty_items_returns_empty() {
        let set = parse_github_json(r#"{"total_count": 0, "items": []}"#, 5).expect("should parse");
        assert!(set.is_empty());
    }

    #[test]
    fn missing_items_returns_empty() {
        let set = parse_github_json(r#"{"message": "Validation Failed"}"#, 5).expect("should parse");
        assert!(set.is_empty());
    }

    #[test]
    fn non_object_body_is_parse_error() {
        let err = parse_github_json("[1, 2, 3]", 5).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
        let err = parse_github_json("<html>rate limited</html>", 5).unwrap_err();
        assert!(err.to_string().contains("not JSON"));
    }

    #[test]
    fn malformed_item_is_skipped() {
        let raw = r#"{"items": [
            {"full_name": "a/one", "html_url": "https://github.com/a/one", "stargazers_count": 3},
            {"full_name": "b/broken"},
            {"full_name": "c/relative", "html_url": "github.com/c/relative"},
            {"full_name": "d/four", "html_url": "https://github.com/d/four", "stargazers_count": 1}
        ]}"#;
        let set = parse_github_json(raw, 5).expect("should parse");
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].title, "a/one");
        assert_eq!(set.records()[1].title, "d/four");
    }

    #[test]
    fn more_than_five_items_truncated_in_order() {
        let items: Vec<String> = (0..9)
            .map(|i| {
                format!(
                    r#"{{"full_name": "o/r{i}", "html_url": "https://github.com/o/r{i}", "stargazers_count": {}}}"#,
                    100 - i
                )
            })
            .collect();
        let raw = format!(r#"{{"items": [{}]}}"#, items.join(","));
        let set = parse_github_json(&raw, 5).expect("should parse");
        assert_eq!(set.len(), 5);
        let titles: Vec<_> = set.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["o/r0", "o/r1", "o/r2", "o/r3", "o/r4"]);
    }

    #[test]
    fn request_carries_sort_and_page_size() {
        let client = reqwest::Client::new();
        let request = GithubProvider
            .request(&client, "rust", &SearchConfig::default())
            .build()
            .expect("request");
        assert_eq!(
            request.url().as_str(),
            "https://api.github.com/search/repositories?q=rust&sort=stars&order=desc&per_page=5"
        );
    }

    #[test]
    fn provider_id_is_github() {
        assert_eq!(GithubProvider.id(), ProviderId::Github);
    }
}
