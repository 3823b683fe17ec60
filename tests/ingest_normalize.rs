// tests/ingest_normalize.rs
use ai_news_aggregator::ingest::{normalize_summary, strip_markup, truncate};

#[test]
fn empty_is_ok() {
    assert_eq!(strip_markup(""), "");
    assert_eq!(normalize_summary("", 150), "");
}

#[test]
fn strips_html_and_unescapes() {
    let s = "<p>Hello&nbsp;<b>world</b> &ldquo;ok&rdquo;</p>";
    assert_eq!(strip_markup(s), "Hello world \u{201C}ok\u{201D}");
}

#[test]
fn folds_whitespace_and_nbsp() {
    let s = "A\u{00A0}\n\tB   C";
    assert_eq!(strip_markup(s), "A B C");
}

#[test]
fn length_cap_applies_with_ellipsis() {
    let s = "x".repeat(2_000);
    let n = normalize_summary(&s, 150);
    assert_eq!(n.chars().count(), 153);
    assert!(n.ends_with("..."));
}

#[test]
fn plain_text_normalization_is_idempotent() {
    let samples = [
        "OpenAI releases GPT-5",
        "  padded   text with   gaps ",
        "人工知能と著作権、議論が本格化",
        "",
    ];
    for s in samples {
        let once = truncate(&strip_markup(s), 150);
        let twice = truncate(&strip_markup(&once), 150);
        assert_eq!(once, twice, "not idempotent for {s:?}");
    }
}

#[test]
fn strip_is_idempotent_on_markup() {
    let s = "<div><p>Deep <i>learning</i></p>\n<p>news</p></div>";
    let once = strip_markup(s);
    assert_eq!(strip_markup(&once), once);
}

#[test]
fn comparison_signs_in_headlines_survive() {
    // Titles arrive as decoded text; `<` here is not a tag.
    let title = "GPT-5 scores < 50% on ARC, > 40% on HLE";
    assert_eq!(strip_markup(title), title);
    assert_eq!(
        normalize_summary("<p>Accuracy went from <b>40%</b> to < 50%</p>", 150),
        "Accuracy went from 40% to < 50%"
    );
}
