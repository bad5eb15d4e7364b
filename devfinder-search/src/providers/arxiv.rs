//! arXiv paper search: Atom XML, fetched through a CORS relay.
//!
//! The export API answers with an Atom feed whose `entry` elements carry
//! `title`, `summary` and `id`. Entries are decoded one at a time so a
//! malformed entry costs only itself.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::config::{is_http_url, SearchConfig};
use crate::error::SearchError;
use crate::markup::{collapse_whitespace, escape_html, truncate_chars};
use crate::provider::Provider;
use crate::types::{ProviderId, ResultRecord, ResultSet};

/// Summaries are cut to this many characters before the ellipsis.
const SUMMARY_MAX_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// arXiv export API provider.
pub struct ArxivProvider;

impl ArxivProvider {
    /// The export API URL for `query`, before any relay wrapping.
    pub fn target_url(query: &str, config: &SearchConfig) -> Result<url::Url, SearchError> {
        url::Url::parse_with_params(
            &SearchConfig::endpoint(&config.arxiv_base_url, "api/query"),
            &[
                ("search_query", format!("all:{query}")),
                ("start", "0".to_owned()),
                ("max_results", config.max_results.to_string()),
            ],
        )
        .map_err(|e| SearchError::Config(format!("invalid arxiv_base_url: {e}")))
    }
}

impl Provider for ArxivProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Arxiv
    }

    fn request(
        &self,
        client: &reqwest::Client,
        query: &str,
        config: &SearchConfig,
    ) -> reqwest::RequestBuilder {
        // A bad base URL is caught by `SearchConfig::validate`; fall back to
        // the raw string so the failure surfaces as a transport error.
        let target = Self::target_url(query, config)
            .map(String::from)
            .unwrap_or_else(|_| config.arxiv_base_url.clone());

        let request = if config.use_cors_relay {
            client
                .get(config.cors_relay_url.as_str())
                .query(&[("url", target.as_str())])
        } else {
            client.get(target)
        };
        request.header(reqwest::header::ACCEPT, "application/atom+xml")
    }

    fn parse(&self, raw: &str, query: &str, max_results: usize) -> Result<ResultSet, SearchError> {
        tracing::trace!(query, "parsing arXiv feed");
        parse_arxiv_feed(raw, max_results)
    }
}

/// Which entry child is currently collecting text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Id,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"summary" => Some(Self::Summary),
            b"id" => Some(Self::Id),
            _ => None,
        }
    }
}

/// Raw text captured for one `entry`.
#[derive(Debug, Default)]
struct EntryFields {
    title: Option<String>,
    summary: Option<String>,
    id: Option<String>,
}

impl EntryFields {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Id => &mut self.id,
        }
    }

    /// Turn captured text into a record, or explain why the entry is unusable.
    fn into_record(self) -> Result<ResultRecord, String> {
        let title = self.title.ok_or("entry has no title")?;
        let summary = self.summary.ok_or("entry has no summary")?;
        let id = self.id.ok_or("entry has no id")?;

        let link = id.trim().to_owned();
        if !is_http_url(&link) {
            return Err(format!("entry id is not an absolute URL: {link:?}"));
        }

        let title = collapse_whitespace(&title);
        let title = if title.is_empty() {
            "Untitled paper".to_owned()
        } else {
            escape_html(&title)
        };

        let summary = summary.trim().replace('\n', " ");
        let description = if summary.is_empty() {
            "No summary available.".to_owned()
        } else {
            let cut = truncate_chars(&summary, SUMMARY_MAX_CHARS);
            format!("{}{ELLIPSIS}", escape_html(cut))
        };

        Ok(ResultRecord {
            title,
            link,
            description,
            source_label: ProviderId::Arxiv.label().to_owned(),
        })
    }
}

/// Parse an arXiv Atom feed into search results.
///
/// Extracted as a separate function for testability with fixture XML.
/// Only the first `title`/`summary`/`id` directly inside each `entry` are
/// read. A document that is not well-formed XML is a [`SearchError::Parse`];
/// an entry lacking one of the three fields is skipped with a warning.
fn parse_arxiv_feed(xml: &str, max_results: usize) -> Result<ResultSet, SearchError> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    let mut depth = 0usize;
    // (depth of the open `entry`, fields captured so far)
    let mut entry: Option<(usize, EntryFields)> = None;
    // (field being captured, its depth, text so far)
    let mut capture: Option<(Field, usize, String)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            SearchError::Parse(format!(
                "malformed arXiv XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(start) => {
                depth += 1;
                let name = start.local_name();
                if entry.is_none() {
                    if name.as_ref() == b"entry" {
                        entry = Some((depth, EntryFields::default()));
                    }
                } else if capture.is_none() {
                    let wanted = match &mut entry {
                        Some((entry_depth, fields)) if depth == *entry_depth + 1 => {
                            Field::from_name(name.as_ref())
                                .filter(|field| fields.slot(*field).is_none())
                        }
                        _ => None,
                    };
                    if let Some(field) = wanted {
                        capture = Some((field, depth, String::new()));
                    }
                }
            }
            Event::Empty(empty) => {
                // `<summary/>` is present but empty.
                if let (Some((entry_depth, fields)), None) = (entry.as_mut(), capture.as_ref()) {
                    if depth == *entry_depth {
                        if let Some(field) = Field::from_name(empty.local_name().as_ref()) {
                            fields.slot(field).get_or_insert_with(String::new);
                        }
                    }
                }
            }
            Event::Text(text) => {
                if let Some((_, _, buf)) = &mut capture {
                    let decoded = text.unescape().map_err(|e| {
                        SearchError::Parse(format!("bad text in arXiv entry: {e}"))
                    })?;
                    buf.push_str(&decoded);
                }
            }
            Event::CData(cdata) => {
                if let Some((_, _, buf)) = &mut capture {
                    buf.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::End(_) => {
                let closes_field = matches!(&capture, Some((_, field_depth, _)) if *field_depth == depth);
                if closes_field {
                    if let (Some((field, _, text)), Some((_, fields))) = (capture.take(), entry.as_mut()) {
                        *fields.slot(field) = Some(text);
                    }
                }
                let closes_entry = matches!(&entry, Some((entry_depth, _)) if *entry_depth == depth);
                if closes_entry {
                    if let Some((_, fields)) = entry.take() {
                        match fields.into_record() {
                            Ok(record) => records.push(record),
                            Err(reason) => {
                                skipped += 1;
                                tracing::warn!(reason, "skipped a malformed arXiv entry");
                            }
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    records.truncate(max_results);
    tracing::debug!(count = records.len(), skipped, "arXiv results parsed");
    Ok(ResultSet::new(records))
}
