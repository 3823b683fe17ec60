// src/render.rs
//! HTML card renderer for a named display surface (a container element id).
//! Everything interpolated is HTML-escaped; the pipeline itself never sees
//! markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::aggregator::Article;
use crate::dates::Locale;

/// Display collaborator: placeholder while loading, cards on success,
/// retry affordance when nothing came back.
pub trait Renderer {
    fn loading(&self, surface: &str) -> String;
    fn articles(&self, surface: &str, articles: &[Article]) -> String;
    fn empty(&self, surface: &str) -> String;

    fn render(&self, surface: &str, articles: &[Article]) -> String {
        if articles.is_empty() {
            self.empty(surface)
        } else {
            self.articles(surface, articles)
        }
    }
}

/// UI strings, Japanese by default.
#[derive(Debug, Clone)]
pub struct CardLabels {
    pub locale: Locale,
    pub loading_title: String,
    pub loading_hint: String,
    pub empty_title: String,
    pub empty_hint: String,
    pub retry: String,
    pub read_more: String,
}

impl Default for CardLabels {
    fn default() -> Self {
        Self {
            locale: Locale::Ja,
            loading_title: "最新のAI記事を取得中...".into(),
            loading_hint: "世界中のAI情報サイトから記事を収集しています".into(),
            empty_title: "記事の取得に失敗しました".into(),
            empty_hint: "しばらく時間をおいて再度お試しください".into(),
            retry: "再試行".into(),
            read_more: "記事を読む →".into(),
        }
    }
}

impl CardLabels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Ja => Self::default(),
            Locale::En => Self::english(),
        }
    }

    pub fn english() -> Self {
        Self {
            locale: Locale::En,
            loading_title: "Fetching the latest AI news...".into(),
            loading_hint: "Collecting articles from AI news sites".into(),
            empty_title: "No articles right now".into(),
            empty_hint: "Please try again in a little while".into(),
            retry: "Retry".into(),
            read_more: "Read article →".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HtmlCardRenderer {
    labels: CardLabels,
    /// Where the retry button points.
    retry_href: String,
}

impl Default for HtmlCardRenderer {
    fn default() -> Self {
        Self::new(CardLabels::default(), "/news")
    }
}

impl HtmlCardRenderer {
    pub fn new(labels: CardLabels, retry_href: &str) -> Self {
        Self {
            labels,
            retry_href: retry_href.to_string(),
        }
    }

    pub fn labels(&self) -> &CardLabels {
        &self.labels
    }

    fn card(&self, a: &Article) -> String {
        format!(
            concat!(
                r#"<div class="article-card">"#,
                r#"<div class="article-tag">{category}</div>"#,
                r#"<div class="article-title">{title}</div>"#,
                r#"<div class="article-meta"><span>📅 {date}</span><span>📰 {source}</span></div>"#,
                r#"<div class="article-summary">{summary}</div>"#,
                r#"<a href="{url}" target="_blank" rel="noopener" class="read-more">{read_more}</a>"#,
                "</div>"
            ),
            category = encode_text(&a.category),
            title = encode_text(&a.title),
            date = encode_text(&a.display_date),
            source = encode_text(&a.source_name),
            summary = encode_text(&a.summary),
            url = encode_double_quoted_attribute(&a.url),
            read_more = encode_text(&self.labels.read_more),
        )
    }
}

impl Renderer for HtmlCardRenderer {
    fn loading(&self, surface: &str) -> String {
        format!(
            r#"<div id="{id}" class="news-container loading"><div class="placeholder"><h3>{title}</h3><p>{hint}</p></div></div>"#,
            id = encode_double_quoted_attribute(surface),
            title = encode_text(&self.labels.loading_title),
            hint = encode_text(&self.labels.loading_hint),
        )
    }

    fn articles(&self, surface: &str, articles: &[Article]) -> String {
        let cards: String = articles.iter().map(|a| self.card(a)).collect();
        format!(
            r#"<div id="{id}" class="news-container show">{cards}</div>"#,
            id = encode_double_quoted_attribute(surface),
        )
    }

    fn empty(&self, surface: &str) -> String {
        format!(
            r#"<div id="{id}" class="news-container empty"><div class="placeholder"><h3>{title}</h3><p>{hint}</p><a href="{href}" class="main-button retry">{retry}</a></div></div>"#,
            id = encode_double_quoted_attribute(surface),
            title = encode_text(&self.labels.empty_title),
            hint = encode_text(&self.labels.empty_hint),
            href = encode_double_quoted_attribute(&self.retry_href),
            retry = encode_text(&self.labels.retry),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.into(),
            summary: "s".into(),
            url: "https://a.test/x?a=1&b=\"2\"".into(),
            display_date: "3 hours ago".into(),
            published_at: Some(1),
            source_name: "A".into(),
            category: "🤖 技術".into(),
        }
    }

    #[test]
    fn empty_list_renders_retry() {
        let r = HtmlCardRenderer::new(CardLabels::english(), "/news?surface=box");
        let html = r.render("box", &[]);
        assert!(html.contains(r#"id="box""#));
        assert!(html.contains("Retry"));
        assert!(html.contains(r#"href="/news?surface=box""#));
    }

    #[test]
    fn cards_escape_content() {
        let r = HtmlCardRenderer::default();
        let html = r.render("news-container", &[article("<script>x</script>")]);
        assert_eq!(html.matches("article-card").count(), 1);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;2&quot;"));
        assert!(html.contains("🤖 技術"));
    }

    #[test]
    fn loading_placeholder_targets_surface() {
        let html = HtmlCardRenderer::default().loading("news-container");
        assert!(html.starts_with(r#"<div id="news-container""#));
        assert!(html.contains("loading"));
    }
}
