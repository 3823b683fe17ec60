// src/ingest/mod.rs
pub mod fetcher;
pub mod providers;
pub mod scheduler;
pub mod types;

use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

/// Marker appended by `truncate` when text is cut.
pub const ELLIPSIS: &str = "...";

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "news_items_fetched_total",
            "Feed entries returned by transports (after the per-fetch limit)."
        );
        describe_counter!(
            "news_source_errors_total",
            "Source fetches that failed and degraded to an empty list."
        );
        describe_counter!(
            "news_items_filtered_total",
            "Items dropped as invalid, irrelevant or over the per-source cap."
        );
        describe_counter!(
            "news_duplicates_total",
            "Items removed by title similarity."
        );
        describe_counter!(
            "news_articles_kept_total",
            "Articles returned to callers."
        );
        describe_histogram!("news_fetch_ms", "Per-source fetch time in milliseconds.");
        describe_gauge!("news_last_run_ts", "Unix ts when an aggregation last finished.");
    });
}

fn re_script_style() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("script/style regex")
    })
}

fn re_tags() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    // Comments, declarations and tags that start with a letter; a bare `<`
    // in text (`< 50%`) is left alone.
    RE.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?-->|<![^>]*>|</?[A-Za-z][^>]*>").expect("tag regex")
    })
}

fn re_ws() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Turn a markup snippet into plain text: drop tags, decode entities,
/// collapse whitespace, trim.
///
/// Tags are removed before decoding, so an escaped `&lt;b&gt;` survives as the
/// literal text `<b>` instead of being eaten as a tag.
pub fn strip_markup(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let out = re_script_style().replace_all(s, " ");
    let out = re_tags().replace_all(&out, " ");
    let out = html_escape::decode_html_entities(&out);
    re_ws().replace_all(&out, " ").trim().to_string()
}

/// Cut `text` to `max_chars` Unicode scalars and append `...`; shorter text is
/// returned as is.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// `strip_markup` followed by `truncate`.
pub fn normalize_summary(raw: &str, max_chars: usize) -> String {
    truncate(&strip_markup(raw), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_tags_and_decodes() {
        let s = "  <p>Hello&nbsp;<b>world</b> &amp; friends</p>  ";
        assert_eq!(strip_markup(s), "Hello world & friends");
    }

    #[test]
    fn strip_keeps_escaped_markup_as_text() {
        assert_eq!(strip_markup("use &lt;b&gt; for bold"), "use <b> for bold");
    }

    #[test]
    fn strip_drops_script_bodies() {
        let s = "<script>var x = 1;</script>Visible <style>p{}</style>text";
        assert_eq!(strip_markup(s), "Visible text");
    }

    #[test]
    fn adjacent_blocks_do_not_glue_words() {
        assert_eq!(strip_markup("<p>one</p><p>two</p>"), "one two");
    }

    #[test]
    fn bare_angle_brackets_are_text() {
        assert_eq!(
            strip_markup("AI scores < 50% and > 40% on the test"),
            "AI scores < 50% and > 40% on the test"
        );
        assert_eq!(strip_markup("a <= b, 3<4"), "a <= b, 3<4");
    }

    #[test]
    fn comments_and_declarations_are_dropped() {
        assert_eq!(strip_markup("<!-- ad slot -->Body<!DOCTYPE x> text"), "Body text");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let s = "人工知能の最新ニュース";
        assert_eq!(truncate(s, 4), "人工知能...");
        assert_eq!(truncate(s, 11), s);
        assert_eq!(truncate(s, 50), s);
    }

    #[test]
    fn truncate_exact_length_is_unchanged() {
        assert_eq!(truncate("abcde", 5), "abcde");
        assert_eq!(truncate("abcdef", 5), "abcde...");
        assert_eq!(truncate("", 0), "");
    }
}
