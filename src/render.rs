//! Result card rendering and status messages.
//!
//! Records are first turned into [`CardView`] view-models; [`format_card`]
//! is the single place that produces card markup. Record `title` and
//! `description` are already markup-safe, so only the link is escaped here
//! (it lands inside attributes).

use devfinder_search::markup::escape_html;
use devfinder_search::{ProviderId, ResultRecord, ResultSet};

/// Badge and border colour used for every provider.
const ACCENT: &str = "#f48024";

/// View-model for one result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView<'a> {
    /// Zero-based position in the result set.
    pub position: usize,
    /// Markup-safe title.
    pub title: &'a str,
    /// Attribute-escaped link.
    pub href: String,
    /// Markup-safe description.
    pub description: &'a str,
    /// Source badge text.
    pub source: &'a str,
    /// Accent colour for the badge and border.
    pub accent: &'static str,
}

impl<'a> CardView<'a> {
    /// Build the view-model for `record` at `position`.
    pub fn new(record: &'a ResultRecord, position: usize) -> Self {
        Self {
            position,
            title: &record.title,
            href: escape_html(&record.link),
            description: &record.description,
            source: &record.source_label,
            accent: ACCENT,
        }
    }
}

/// Format one card.
#[must_use]
pub fn format_card(card: &CardView<'_>) -> String {
    format!(
        r#"<div class="result-card" data-position="{position}" style="border-left: 5px solid {accent};">
    <div class="result-header">
        <h3><a href="{href}" target="_blank" rel="noopener">{title}</a></h3>
        <span class="result-source" style="background: {accent};">{source}</span>
    </div>
    <p class="result-description">{description}</p>
    <a class="result-view" href="{href}" target="_blank" rel="noopener" style="color: {accent};">View Resource &rarr;</a>
</div>
"#,
        position = card.position,
        accent = card.accent,
        href = card.href,
        title = card.title,
        source = escape_html(card.source),
        description = card.description,
    )
}

/// Render one record at `position`.
#[must_use]
pub fn render_card(record: &ResultRecord, position: usize) -> String {
    format_card(&CardView::new(record, position))
}

/// Render a full results block: the cards of `results` in order.
///
/// Callers show the provider's "no results" message instead of passing an
/// empty set.
#[must_use]
pub fn render_results(results: &ResultSet) -> String {
    results
        .iter()
        .enumerate()
        .map(|(position, record)| render_card(record, position))
        .collect()
}

/// Placeholder shown while a search is in flight.
#[must_use]
pub fn render_searching(provider: ProviderId, query: &str) -> String {
    format!(
        r#"<p class="status">Searching {} for "<strong>{}</strong>"...</p>"#,
        provider.label(),
        escape_html(query)
    )
}

/// Message shown when the provider returned no usable entries.
#[must_use]
pub fn render_no_results(provider: ProviderId) -> String {
    format!(r#"<p class="status">{}</p>"#, provider.no_results_message())
}

/// Message shown when a search failed; `detail` is the underlying error.
#[must_use]
pub fn render_failure(detail: &str) -> String {
    format!(
        r#"<p class="status error">Something went wrong. Please try again later.<br><small>{}</small></p>"#,
        escape_html(detail)
    )
}

/// Notice placed above a block restored from the session.
pub const RESTORED_NOTICE: &str =
    r#"<p class="restored-note">Restored from your last session</p>"#;

/// Prefix restored markup with [`RESTORED_NOTICE`]. The markup itself is
/// replayed verbatim.
#[must_use]
pub fn render_restored(markup: &str) -> String {
    let mut html = String::with_capacity(RESTORED_NOTICE.len() + 1 + markup.len());
    html.push_str(RESTORED_NOTICE);
    html.push('\n');
    html.push_str(markup);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, link: &str, description: &str, source: &str) -> ResultRecord {
        ResultRecord {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            source_label: source.into(),
        }
    }

    #[test]
    fn card_contains_every_part() {
        let r = record(
            "rust-lang/rust",
            "https://github.com/rust-lang/rust",
            "Fast. <br> <strong> 5 stars</strong>",
            "GitHub",
        );
        let html = render_card(&r, 0);
        assert!(html.contains(r#"<a href="https://github.com/rust-lang/rust" target="_blank" rel="noopener">rust-lang/rust</a>"#));
        assert!(html.contains(r#">GitHub</span>"#));
        assert!(html.contains("Fast. <br> <strong> 5 stars</strong>"));
        assert!(html.contains("View Resource &rarr;"));
        assert!(html.contains(r#"data-position="0""#));
    }

    #[test]
    fn link_is_attribute_escaped() {
        let r = record("t", r#"https://example.com/?a=1&b="2""#, "d", "arXiv");
        let html = render_card(&r, 0);
        assert!(html.contains(r#"href="https://example.com/?a=1&amp;b=&quot;2&quot;""#));
    }

    #[test]
    fn stackoverflow_entities_pass_through() {
        let r = record(
            "Why &quot;move&quot;?",
            "https://stackoverflow.com/q/1",
            "Tags: rust | Answered: Yes",
            "StackOverflow",
        );
        let html = render_card(&r, 3);
        assert!(html.contains(">Why &quot;move&quot;?</a>"));
        assert!(!html.contains("&amp;quot;"));
    }

    #[test]
    fn render_is_deterministic() {
        let r = record("t", "https://e.com", "d", "arXiv");
        assert_eq!(render_card(&r, 1), render_card(&r, 1));
    }

    #[test]
    fn results_render_in_order() {
        let set = ResultSet::new(vec![
            record("first", "https://e.com/1", "d", "GitHub"),
            record("second", "https://e.com/2", "d", "GitHub"),
            record("third", "https://e.com/3", "d", "GitHub"),
        ]);
        let html = render_results(&set);
        let a = html.find("first").expect("first");
        let b = html.find("second").expect("second");
        let c = html.find("third").expect("third");
        assert!(a < b && b < c);
        assert_eq!(html.matches(r#"class="result-card""#).count(), 3);
    }

    #[test]
    fn searching_placeholder_escapes_query() {
        let html = render_searching(ProviderId::Github, "<script>");
        assert_eq!(
            html,
            r#"<p class="status">Searching GitHub for "<strong>&lt;script&gt;</strong>"...</p>"#
        );
    }

    #[test]
    fn no_results_messages_are_provider_specific() {
        assert!(render_no_results(ProviderId::Github).contains("No repositories found."));
        assert!(render_no_results(ProviderId::Arxiv).contains("No arXiv papers found"));
        assert!(render_no_results(ProviderId::StackOverflow).contains("No discussions found."));
    }

    #[test]
    fn failure_includes_detail() {
        let html = render_failure("transport error: StackOverflow HTTP error! status: 500");
        assert!(html.contains("Something went wrong"));
        assert!(html.contains("status: 500"));
    }

    #[test]
    fn restored_prefixes_notice_and_keeps_markup() {
        let html = render_restored("<div>...</div>");
        assert!(html.starts_with(RESTORED_NOTICE));
        assert!(html.ends_with("<div>...</div>"));
    }
}
