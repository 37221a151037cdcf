use crate::blog::{absolute_url, RichTextDocument};
use maud::{html, Markup};
use serde::Deserialize;
use serde_json::Value;

pub trait RichTextRenderer: std::fmt::Debug + Send + Sync {
    fn render(&self, document: &RichTextDocument) -> Markup;
}

/// Renders Contentful rich-text documents. Links to entries and assets are
/// expected to be resolved already (see `content::contentful`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentfulRichText;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    node_type: String,
    #[serde(default)]
    content: Vec<Node>,
    #[serde(default)]
    value: String,
    #[serde(default)]
    marks: Vec<Mark>,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct Mark {
    #[serde(rename = "type")]
    kind: String,
}

impl RichTextRenderer for ContentfulRichText {
    fn render(&self, document: &RichTextDocument) -> Markup {
        if document.as_value().is_null() {
            return html! {};
        }

        match Node::deserialize(document.as_value()) {
            Ok(root) => render_node(&root),
            Err(err) => {
                tracing::warn!("Couldn't read rich text document: {err}");
                html! {}
            }
        }
    }
}

fn render_children(node: &Node) -> Markup {
    html! {
        @for child in &node.content {
            (render_node(child))
        }
    }
}

fn render_node(node: &Node) -> Markup {
    let children = render_children(node);

    match node.node_type.as_str() {
        "text" => render_text(node),
        "document" => children,
        "paragraph" => html! { p { (children) } },
        "heading-1" => html! { h1 { (children) } },
        "heading-2" => html! { h2 { (children) } },
        "heading-3" => html! { h3 { (children) } },
        "heading-4" => html! { h4 { (children) } },
        "heading-5" => html! { h5 { (children) } },
        "heading-6" => html! { h6 { (children) } },
        "unordered-list" => html! { ul { (children) } },
        "ordered-list" => html! { ol { (children) } },
        "list-item" => html! { li { (children) } },
        "blockquote" => html! { blockquote { (children) } },
        "hr" => html! { hr; },
        "table" => html! { table { tbody { (children) } } },
        "table-row" => html! { tr { (children) } },
        "table-cell" => html! { td { (children) } },
        "table-header-cell" => html! { th { (children) } },
        "hyperlink" => match node
            .data
            .get("uri")
            .and_then(Value::as_str)
            .filter(|uri| is_safe_uri(uri))
        {
            Some(uri) => html! { a href=(uri) { (children) } },
            None => children,
        },
        "entry-hyperlink" => match target_str(node, "/fields/slug") {
            Some(slug) => {
                html! { a href=(format!("/blogs/{}", urlencoding::encode(slug))) { (children) } }
            }
            None => children,
        },
        "asset-hyperlink" => match target_str(node, "/fields/file/url") {
            Some(url) => html! { a href=(absolute_url(url)) { (children) } },
            None => children,
        },
        "embedded-asset-block" => match target_str(node, "/fields/file/url") {
            Some(url) => html! {
                figure.embedded-asset {
                    img src=(absolute_url(url))
                        alt=(target_str(node, "/fields/title").unwrap_or_default())
                        loading="lazy";
                }
            },
            None => html! {},
        },
        _ => children,
    }
}

/// Web, mail and relative links only. `javascript:`, `data:` and friends are dropped.
fn is_safe_uri(uri: &str) -> bool {
    let uri = uri.trim_start();
    let scheme_end = uri.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(index) if uri[index..].starts_with(':') => {
            let scheme = uri[..index].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

fn target_str<'a>(node: &'a Node, pointer: &str) -> Option<&'a str> {
    node.data.get("target")?.pointer(pointer)?.as_str()
}

fn render_text(node: &Node) -> Markup {
    node.marks
        .iter()
        .fold(html! { (node.value) }, |inner, mark| match mark.kind.as_str() {
            "bold" => html! { strong { (inner) } },
            "italic" => html! { em { (inner) } },
            "underline" => html! { u { (inner) } },
            "code" => html! { code { (inner) } },
            "superscript" => html! { sup { (inner) } },
            "subscript" => html! { sub { (inner) } },
            "strikethrough" => html! { s { (inner) } },
            _ => inner,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: Value) -> String {
        ContentfulRichText
            .render(&RichTextDocument::new(value))
            .into_string()
    }

    fn text(value: &str, marks: &[&str]) -> Value {
        json!({
            "nodeType": "text",
            "value": value,
            "marks": marks.iter().map(|kind| json!({ "type": kind })).collect::<Vec<_>>(),
            "data": {}
        })
    }

    fn block(node_type: &str, content: Vec<Value>) -> Value {
        json!({ "nodeType": node_type, "data": {}, "content": content })
    }

    #[test]
    fn renders_blocks_and_marks() {
        let html = render(block(
            "document",
            vec![
                block("heading-2", vec![text("Intro", &[])]),
                block(
                    "paragraph",
                    vec![text("plain ", &[]), text("loud", &["bold", "italic"])],
                ),
                block(
                    "unordered-list",
                    vec![block("list-item", vec![block("paragraph", vec![text("one", &[])])])],
                ),
                block("hr", vec![]),
            ],
        ));

        assert_eq!(
            html,
            "<h2>Intro</h2><p>plain <em><strong>loud</strong></em></p><ul><li><p>one</p></li></ul><hr>"
        );
    }

    #[test]
    fn escapes_text() {
        let html = render(block("paragraph", vec![text("<script>alert(1)</script>", &[])]));

        assert_eq!(html, "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
    }

    #[test]
    fn renders_links() {
        let html = render(block(
            "paragraph",
            vec![
                json!({ "nodeType": "hyperlink", "data": { "uri": "https://example.com" }, "content": [text("site", &[])] }),
                json!({ "nodeType": "entry-hyperlink", "data": { "target": { "fields": { "slug": "next post" } } }, "content": [text("next", &[])] }),
                json!({ "nodeType": "entry-hyperlink", "data": { "target": { "sys": { "type": "Link" } } }, "content": [text("dangling", &[])] }),
            ],
        ));

        assert_eq!(
            html,
            r#"<p><a href="https://example.com">site</a><a href="/blogs/next%20post">next</a>dangling</p>"#
        );
    }

    #[test]
    fn script_links_render_as_plain_text() {
        let link = |uri: &str| {
            json!({ "nodeType": "hyperlink", "data": { "uri": uri }, "content": [text("x", &[])] })
        };
        let html = render(block(
            "paragraph",
            vec![
                link("javascript:alert(1)"),
                link(" JavaScript:alert(1)"),
                link("data:text/html,<b>hi</b>"),
                link("mailto:me@example.com"),
                link("/blogs/other"),
                link("#section"),
                link("HTTPS://example.com/a:b"),
            ],
        ));

        assert_eq!(
            html,
            concat!(
                "<p>xxx",
                r#"<a href="mailto:me@example.com">x</a>"#,
                r#"<a href="/blogs/other">x</a>"#,
                r##"<a href="#section">x</a>"##,
                r#"<a href="HTTPS://example.com/a:b">x</a>"#,
                "</p>"
            )
        );
    }

    #[test]
    fn renders_resolved_embedded_asset() {
        let html = render(block(
            "document",
            vec![
                json!({
                    "nodeType": "embedded-asset-block",
                    "data": { "target": { "fields": { "title": "Diagram", "file": { "url": "//images.ctfassets.net/d.png" } } } },
                    "content": []
                }),
                json!({ "nodeType": "embedded-asset-block", "data": {}, "content": [] }),
            ],
        ));

        assert_eq!(
            html,
            r#"<figure class="embedded-asset"><img src="https://images.ctfassets.net/d.png" alt="Diagram" loading="lazy"></figure>"#
        );
    }

    #[test]
    fn unknown_nodes_fall_back_to_children() {
        let html = render(block(
            "document",
            vec![block("embedded-entry-block", vec![]), block("mystery", vec![text("kept", &[])])],
        ));

        assert_eq!(html, "kept");
    }

    #[test]
    fn missing_or_malformed_document_renders_nothing() {
        assert_eq!(render(Value::Null), "");
        assert_eq!(render(json!({ "content": "not a node" })), "");
    }
}
