//! Description sanitizing for the details panel.
//!
//! Event descriptions come straight from a rich-text list column and are
//! rendered as HTML. Before display, executable content is removed while
//! ordinary formatting markup is left alone.

use std::collections::HashSet;

use ammonia::Builder;

/// Shown when an event has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Elements removed together with everything inside them.
const CLEAN_CONTENT_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template",
];

/// Attributes kept on every allowed element.
const GENERIC_ATTRIBUTES: &[&str] = &["class"];

fn builder() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .clean_content_tags(CLEAN_CONTENT_TAGS.iter().copied().collect::<HashSet<_>>())
        .add_generic_attributes(GENERIC_ATTRIBUTES)
        .link_rel(None);
    builder
}

/// Removes executable content from an HTML fragment.
///
/// The fragment is parsed and rebuilt from an allowlist of formatting
/// elements and attributes. Script-like elements are dropped with their
/// content; handler attributes, comments and URLs with a scheme outside the
/// allowlist (`javascript:` among them, entity-encoded or not) are removed.
pub fn sanitize_html(html: &str) -> String {
    builder().clean(html).to_string()
}

/// Returns the sanitized description, or [`NO_DESCRIPTION`] when there is none.
pub fn describe(description: Option<&str>) -> String {
    match description {
        Some(text) if !text.trim().is_empty() => sanitize_html(text),
        _ => NO_DESCRIPTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_formatting_passes_through() {
        let html = r#"<p>Agenda: <b>budget</b> and <a href="https://example.com/doc">doc</a></p>"#;
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn script_elements_are_removed_with_content() {
        assert_eq!(
            sanitize_html("before<script type=\"text/javascript\">alert(1)</script>after"),
            "beforeafter"
        );
        assert_eq!(sanitize_html("<SCRIPT>\nx()\n</SCRIPT >ok"), "ok");
    }

    #[test]
    fn embedding_and_metadata_tags_are_dropped() {
        assert!(!sanitize_html("<iframe src=\"https://evil\"></iframe>text").contains("<iframe"));
        assert_eq!(sanitize_html("<meta http-equiv=\"refresh\">hi"), "hi");
    }

    #[test]
    fn event_handlers_are_stripped() {
        assert_eq!(
            sanitize_html(r#"<img src="a.png" onerror="steal()">"#),
            r#"<img src="a.png">"#
        );
        assert_eq!(
            sanitize_html("<div onMouseOver='x()' class=\"c\">d</div>"),
            "<div class=\"c\">d</div>"
        );
    }

    #[test]
    fn script_urls_are_stripped() {
        assert_eq!(
            sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(sanitize_html("<a href=JavaScript:void(0)>x</a>"), "<a>x</a>");
    }

    #[test]
    fn slash_separated_handlers_are_removed() {
        let out = sanitize_html("<svg/onload=alert(1)>");
        assert!(!out.contains("onload"));
        assert!(!out.contains("<svg"));
    }

    #[test]
    fn nested_tags_cannot_reassemble_a_script() {
        let out = sanitize_html("<scr<meta>ipt>alert(1)</scr<meta>ipt>");
        assert!(!out.to_ascii_lowercase().contains("<script"));
        assert!(!out.contains("<meta"));
    }

    #[test]
    fn entity_encoded_script_urls_are_stripped() {
        assert_eq!(
            sanitize_html(r#"<a href="&#106;avascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
    }

    #[test]
    fn text_outside_tags_is_untouched() {
        let text = "call once = twice, see href=javascript: in the docs";
        assert_eq!(sanitize_html(text), text);
    }

    #[test]
    fn comments_are_removed() {
        assert_eq!(sanitize_html("a<!-- <script>x</script> -->b"), "ab");
    }

    #[test]
    fn describe_falls_back_when_absent() {
        assert_eq!(describe(None), NO_DESCRIPTION);
        assert_eq!(describe(Some("")), NO_DESCRIPTION);
        assert_eq!(describe(Some("  \n")), NO_DESCRIPTION);
        assert_eq!(describe(Some("<i>ok</i><script>x</script>")), "<i>ok</i>");
    }
}
