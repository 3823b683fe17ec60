// src/ingest/providers/feed_xml.rs
//! RSS 2.0, RSS 1.0 (RDF) and Atom documents → `FeedEntry` list.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::ingest::types::FeedEntry;

/// Direct child of an `<item>`/`<entry>`, keyed by its full qualified name so
/// `media:title` and `title` never collide.
#[derive(Debug, Default)]
struct Child {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
}

fn qname(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn child_from(e: &BytesStart<'_>) -> Child {
    let attrs = e
        .attributes()
        .flatten()
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            let value = a
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&a.value).into_owned());
            (key, value)
        })
        .collect();
    Child {
        name: qname(e),
        attrs,
        text: String::new(),
    }
}

/// Children of every `<record>` element in document order. Text of nested
/// markup inside a child is flattened into the child.
fn collect_records(xml: &str, record: &str) -> Result<Vec<Vec<Child>>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut record_depth: Option<usize> = None;
    let mut current: Vec<Child> = Vec::new();
    let mut open: Option<(Child, usize)> = None;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("xml error at byte {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => {
                depth += 1;
                match record_depth {
                    None if qname(&e) == record => {
                        record_depth = Some(depth);
                        current.clear();
                    }
                    Some(rd) if depth == rd + 1 => open = Some((child_from(&e), depth)),
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if record_depth == Some(depth) {
                    current.push(child_from(&e));
                }
            }
            Event::Text(t) => {
                if let Some((child, _)) = open.as_mut() {
                    match t.unescape() {
                        Ok(v) => child.text.push_str(&v),
                        Err(_) => child.text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Event::CData(c) => {
                if let Some((child, _)) = open.as_mut() {
                    child.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                if matches!(&open, Some((_, d)) if *d == depth) {
                    if let Some((mut child, _)) = open.take() {
                        child.text = child.text.trim().to_string();
                        current.push(child);
                    }
                } else if record_depth == Some(depth) {
                    records.push(std::mem::take(&mut current));
                    record_depth = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(records)
}

/// First child with this exact name, like `querySelector` on the item.
fn first<'a>(children: &'a [Child], name: &str) -> Option<&'a Child> {
    children.iter().find(|c| c.name == name)
}

fn first_text(children: &[Child], name: &str) -> Option<String> {
    first(children, name).map(|c| c.text.clone())
}

fn attr<'a>(child: &'a Child, key: &str) -> Option<&'a str> {
    child
        .attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn rss_entry(children: &[Child]) -> FeedEntry {
    FeedEntry {
        title: first_text(children, "title"),
        description: first_text(children, "description"),
        content: first_text(children, "content:encoded"),
        summary: None,
        link: children
            .iter()
            .find(|c| c.name == "link" && !c.text.is_empty())
            .map(|c| c.text.clone()),
        published: first_text(children, "pubDate").or_else(|| first_text(children, "dc:date")),
    }
}

fn atom_entry(children: &[Child]) -> FeedEntry {
    let hrefs: Vec<(Option<&str>, &str)> = children
        .iter()
        .filter(|c| c.name == "link")
        .filter_map(|c| {
            attr(c, "href")
                .filter(|h| !h.trim().is_empty())
                .map(|h| (attr(c, "rel"), h))
        })
        .collect();
    // rel="alternate" (or no rel) is the article page; fall back to any href
    let link = hrefs
        .iter()
        .find(|(rel, _)| matches!(rel, None | Some("alternate")))
        .or_else(|| hrefs.first())
        .map(|(_, h)| h.to_string());
    FeedEntry {
        title: first_text(children, "title"),
        description: None,
        content: first_text(children, "content"),
        summary: first_text(children, "summary"),
        link,
        published: first_text(children, "published").or_else(|| first_text(children, "updated")),
    }
}

/// Name of the first element in the document, prefix included.
fn root_element_name(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return Some(qname(&e)),
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

/// HTML entities that feeds love and XML does not define.
pub(crate) fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", "&#160;")
        .replace("&ndash;", "&#8211;")
        .replace("&mdash;", "&#8212;")
        .replace("&ldquo;", "&#8220;")
        .replace("&rdquo;", "&#8221;")
        .replace("&lsquo;", "&#8216;")
        .replace("&rsquo;", "&#8217;")
        .replace("&hellip;", "&#8230;")
        .replace("&copy;", "&#169;")
}

/// Parse a feed document. The format is picked from the root element.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let root = root_element_name(&xml_clean).ok_or_else(|| anyhow!("no root element in feed"))?;

    let entries = match root.as_str() {
        // RSS 1.0 keeps items next to the channel, 2.0 inside it; both are `<item>`
        "rss" | "rdf:RDF" | "RDF" => collect_records(&xml_clean, "item")
            .context("parsing rss xml")?
            .iter()
            .map(|c| rss_entry(c))
            .collect(),
        "feed" => collect_records(&xml_clean, "entry")
            .context("parsing atom xml")?
            .iter()
            .map(|c| atom_entry(c))
            .collect(),
        other => bail!("unrecognized feed root <{other}>"),
    };
    Ok(entries)
}
