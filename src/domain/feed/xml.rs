//! RSS 2.0 serialization.
//!
//! Two escaping regimes apply: plain-text elements are entity-escaped,
//! HTML-bearing elements (`description`, `content:encoded`) are wrapped in
//! CDATA sections.

use chrono::{DateTime, Utc};
use std::borrow::Cow;

use super::item::RssItem;

pub const CHANNEL_TITLE: &str = "Press Releases";
pub const CHANNEL_DESCRIPTION: &str = "Latest press releases";
pub const CHANNEL_LANGUAGE: &str = "en-us";

pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";
pub const DUBLIN_CORE_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Returns false for characters XML 1.0 does not allow anywhere in a document.
///
/// That is the C0 controls other than tab, newline and carriage return, plus
/// U+FFFE and U+FFFF. Surrogates cannot occur in a `char`.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Entity-escapes text for use in element content or attribute values.
///
/// Each character is replaced at most once, so entities produced here are
/// never escaped again. Characters XML cannot represent are dropped.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\'') || !is_xml_char(c))
    {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other if is_xml_char(other) => escaped.push(other),
            _ => {}
        }
    }
    Cow::Owned(escaped)
}

/// Prepares text for a CDATA section: drops characters XML cannot
/// represent and splits every `]]>`.
pub fn escape_cdata(text: &str) -> Cow<'_, str> {
    let text: Cow<'_, str> = if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    };

    if text.contains("]]>") {
        Cow::Owned(text.replace("]]>", "]]]]><![CDATA[>"))
    } else {
        text
    }
}

/// Wraps text in a CDATA section.
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", escape_cdata(text))
}

/// RFC 2822 date as RSS readers expect it, e.g. `Tue, 03 Jun 2025 10:00:00 GMT`.
pub fn rfc2822(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Serializes a single `<item>` element.
pub fn render_item(item: &RssItem) -> String {
    let mut xml = format!(
        "<item>\n      \
         <title>{}</title>\n      \
         <description>{}</description>\n      \
         <link>{}</link>\n      \
         <pubDate>{}</pubDate>\n      \
         <guid isPermaLink=\"false\">{}</guid>",
        escape_xml(&item.title),
        cdata(&item.description),
        escape_xml(&item.link),
        rfc2822(item.pub_date),
        escape_xml(&item.guid),
    );

    if let Some(content) = &item.content {
        xml.push_str(&format!(
            "\n      <content:encoded>{}</content:encoded>",
            cdata(content)
        ));
    }

    if let Some(author) = &item.author {
        xml.push_str(&format!("\n      <dc:creator>{}</dc:creator>", escape_xml(author)));
    }

    for category in &item.categories {
        xml.push_str(&format!("\n      <category>{}</category>", escape_xml(category)));
    }

    xml.push_str("\n    </item>");
    xml
}

/// Serializes the whole RSS document around already-mapped items.
pub fn render_channel(items: &[RssItem], base_url: &str, built_at: DateTime<Utc>) -> String {
    let rendered: Vec<String> = items.iter().map(render_item).collect();

    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\" xmlns:content=\"{CONTENT_NAMESPACE}\" xmlns:dc=\"{DUBLIN_CORE_NAMESPACE}\">\n  \
         <channel>\n    \
         <title>{CHANNEL_TITLE}</title>\n    \
         <link>{}</link>\n    \
         <description>{CHANNEL_DESCRIPTION}</description>\n    \
         <language>{CHANNEL_LANGUAGE}</language>\n    \
         <lastBuildDate>{}</lastBuildDate>",
        escape_xml(base_url),
        rfc2822(built_at),
    );

    for item in &rendered {
        xml.push_str("\n    ");
        xml.push_str(item);
    }

    xml.push_str("\n  </channel>\n</rss>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item() -> RssItem {
        RssItem {
            title: "Acme Launches X".to_string(),
            description: "Lead".to_string(),
            link: "https://example.com/press-releases/pr1/view".to_string(),
            pub_date: Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap(),
            guid: "pr1".to_string(),
            content: None,
            author: None,
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_escape_xml_all_entities() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry <"quoted"> 'single'"#),
            "Tom &amp; Jerry &lt;&quot;quoted&quot;&gt; &apos;single&apos;"
        );
    }

    #[test]
    fn test_escape_xml_does_not_double_escape() {
        assert_eq!(escape_xml("&lt;"), "&amp;lt;");
        assert_eq!(escape_xml("a < b"), "a &lt; b");
    }

    #[test]
    fn test_escape_xml_borrows_clean_text() {
        assert!(matches!(escape_xml("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_cdata_splits_terminator() {
        assert_eq!(escape_cdata("a]]>b"), "a]]]]><![CDATA[>b");
        assert_eq!(cdata("x]]>y]]>"), "<![CDATA[x]]]]><![CDATA[>y]]]]><![CDATA[>]]>");
        assert!(matches!(escape_cdata("a]]b>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_is_xml_char() {
        for c in ['\t', '\n', '\r', ' ', 'a', '\u{D7FF}', '\u{E000}', '\u{FFFD}', '\u{1F600}'] {
            assert!(is_xml_char(c), "{c:?} should be allowed");
        }
        for c in ['\u{0}', '\u{8}', '\u{B}', '\u{C}', '\u{1F}', '\u{FFFE}', '\u{FFFF}'] {
            assert!(!is_xml_char(c), "{c:?} should be rejected");
        }
    }

    #[test]
    fn test_escape_xml_drops_forbidden_characters() {
        assert_eq!(escape_xml("Acme\u{C}Launch"), "AcmeLaunch");
        assert_eq!(escape_xml("R\u{0}&\u{FFFF}D"), "R&amp;D");
        assert_eq!(escape_xml("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn test_escape_cdata_drops_forbidden_characters() {
        assert_eq!(escape_cdata("<p>pasted\u{8}text</p>"), "<p>pastedtext</p>");
        assert_eq!(escape_cdata("a]]\u{1}>b"), "a]]]]><![CDATA[>b");
        assert!(matches!(escape_cdata("line\r\nbreak"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_rfc2822_format() {
        let date = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        assert_eq!(rfc2822(date), "Tue, 03 Jun 2025 10:00:00 GMT");
    }

    #[test]
    fn test_render_item_required_fields_only() {
        let xml = render_item(&item());

        assert!(xml.starts_with("<item>"));
        assert!(xml.ends_with("</item>"));
        assert!(xml.contains("<title>Acme Launches X</title>"));
        assert!(xml.contains("<description><![CDATA[Lead]]></description>"));
        assert!(xml.contains("<pubDate>Tue, 03 Jun 2025 10:00:00 GMT</pubDate>"));
        assert!(xml.contains(r#"<guid isPermaLink="false">pr1</guid>"#));
        assert!(!xml.contains("content:encoded"));
        assert!(!xml.contains("dc:creator"));
        assert!(!xml.contains("<category>"));
    }

    #[test]
    fn test_render_item_optional_fields() {
        let xml = render_item(&RssItem {
            content: Some("<p>Body</p>".to_string()),
            author: Some("jane@acme.test (Jane)".to_string()),
            categories: vec!["Tech".to_string(), "R&D".to_string()],
            ..item()
        });

        assert!(xml.contains("<content:encoded><![CDATA[<p>Body</p>]]></content:encoded>"));
        assert!(xml.contains("<dc:creator>jane@acme.test (Jane)</dc:creator>"));
        assert!(xml.contains("<category>Tech</category>\n      <category>R&amp;D</category>"));
    }

    #[test]
    fn test_render_channel_header() {
        let built = Utc.with_ymd_and_hms(2025, 6, 4, 8, 30, 0).unwrap();
        let xml = render_channel(&[], "https://example.com", built);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"xmlns:content="http://purl.org/rss/1.0/modules/content/""#));
        assert!(xml.contains(r#"xmlns:dc="http://purl.org/dc/elements/1.1/""#));
        assert!(xml.contains("<title>Press Releases</title>"));
        assert!(xml.contains("<link>https://example.com</link>"));
        assert!(xml.contains("<language>en-us</language>"));
        assert!(xml.contains("<lastBuildDate>Wed, 04 Jun 2025 08:30:00 GMT</lastBuildDate>"));
        assert!(!xml.contains("<item>"));
        assert!(xml.ends_with("</channel>\n</rss>"));
    }
}
