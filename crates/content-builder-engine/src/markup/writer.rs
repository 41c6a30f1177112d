use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::attributes::{AttrName, read_attributes, synthesize_style};
use crate::document::{BlockKind, Document, Node, NodeKind};

fn write_attrs(out: &mut String, node: &Node) {
    let attrs = read_attributes(node);
    for name in AttrName::ALL {
        if let Some(value) = attrs.get(name).and_then(|v| v.stored_value()) {
            let _ = write!(
                out,
                " {}=\"{}\"",
                name.data_key(),
                encode_double_quoted_attribute(value)
            );
        }
    }
    let style = synthesize_style(&attrs);
    if !style.is_empty() {
        let _ = write!(out, " style=\"{}\"", encode_double_quoted_attribute(&style));
    }
}

fn write_inline(out: &mut String, node: &Node) {
    for child in node.content() {
        match child.kind() {
            NodeKind::Text(text) => out.push_str(&encode_text(text)),
            NodeKind::HardBreak => out.push_str("<br>"),
            NodeKind::Block(_) | NodeKind::Doc => write_node(out, child),
        }
    }
}

fn write_children(out: &mut String, node: &Node) {
    for child in node.content() {
        write_node(out, child);
    }
}

fn write_node(out: &mut String, node: &Node) {
    let Some(kind) = node.block_kind() else {
        if let NodeKind::Text(text) = node.kind() {
            out.push_str(&encode_text(text));
        }
        return;
    };

    let (tag, extra) = match kind {
        BlockKind::Paragraph => ("p".to_string(), String::new()),
        BlockKind::Heading { level } => (format!("h{level}"), String::new()),
        BlockKind::BulletList => ("ul".to_string(), String::new()),
        BlockKind::OrderedList { start } if *start != 1 => {
            ("ol".to_string(), format!(" start=\"{start}\""))
        }
        BlockKind::OrderedList { .. } => ("ol".to_string(), String::new()),
        BlockKind::ListItem => ("li".to_string(), String::new()),
        BlockKind::Blockquote => ("blockquote".to_string(), String::new()),
        BlockKind::CodeBlock { .. } => ("pre".to_string(), String::new()),
        BlockKind::HorizontalRule => ("hr".to_string(), String::new()),
    };

    let _ = write!(out, "<{tag}{extra}");
    write_attrs(out, node);
    out.push('>');

    match kind {
        BlockKind::HorizontalRule => return,
        BlockKind::Paragraph | BlockKind::Heading { .. } => write_inline(out, node),
        BlockKind::CodeBlock { language } => {
            match language {
                Some(lang) => {
                    let _ = write!(
                        out,
                        "<code class=\"language-{}\">",
                        encode_double_quoted_attribute(lang)
                    );
                }
                None => out.push_str("<code>"),
            }
            write_inline(out, node);
            out.push_str("</code>");
        }
        BlockKind::BulletList
        | BlockKind::OrderedList { .. }
        | BlockKind::ListItem
        | BlockKind::Blockquote => write_children(out, node),
    }

    let _ = write!(out, "</{tag}>");
}

/// Markup for a single block.
pub fn node_to_markup(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

impl Document {
    /// Serialize to markup, one top-level block per line.
    ///
    /// Each block carries its resolved stored attributes as `data-*` fields
    /// followed by the synthesized `style`; defaults are never written.
    pub fn to_markup(&self) -> String {
        self.top_level_blocks()
            .map(|block| node_to_markup(block.node))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttrSources, AttributePatch, write_attributes};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_blocks_compactly() {
        let doc = Document::new(vec![
            Node::heading(2, "A & B"),
            Node::paragraph("line<one>\nline two"),
            Node::block(
                BlockKind::OrderedList { start: 4 },
                vec![Node::block(BlockKind::ListItem, vec![Node::paragraph("x")])],
            ),
            Node::block(
                BlockKind::CodeBlock {
                    language: Some("rust".to_string()),
                },
                vec![Node::text("let a = 1;")],
            ),
            Node::horizontal_rule(),
        ])
        .unwrap();
        assert_snapshot!(doc.to_markup(), @r#"
        <h2>A &amp; B</h2>
        <p>line&lt;one&gt;<br>line two</p>
        <ol start="4"><li><p>x</p></li></ol>
        <pre><code class="language-rust">let a = 1;</code></pre>
        <hr>
        "#);
    }

    #[test]
    fn writes_canonical_fields_then_style() {
        let node = write_attributes(
            &Node::paragraph("x"),
            &AttributePatch::new()
                .set(AttrName::Background, "#fff")
                .set(AttrName::MarginTop, "12"),
        )
        .unwrap();
        assert_snapshot!(
            node_to_markup(&node),
            @r##"<p data-mt="12px" data-bg="#fff" style="margin-top: 12px; background-color: #fff;">x</p>"##
        );
    }

    #[test]
    fn legacy_values_are_promoted_to_canonical_fields() {
        let node = Node::paragraph("x")
            .with_attrs(AttrSources::default().with_legacy(AttrName::MarginBottom, "3px"));
        assert_eq!(
            node_to_markup(&node),
            r#"<p data-mb="3px" style="margin-bottom: 3px;">x</p>"#
        );
    }

    #[test]
    fn rule_fields_are_written_only_when_stored() {
        let rule = Node::horizontal_rule()
            .with_attrs(AttrSources::default().with_canonical(AttrName::RuleStyle, "dotted"));
        assert_eq!(node_to_markup(&rule), r#"<hr data-hr-style="dotted">"#);
    }
}
