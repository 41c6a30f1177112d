use content_builder_syntax::{MarkupEvent, Tag, events};

use crate::attributes::{AttrName, AttrSources, parse_style};
use crate::document::{BlockKind, Document, Node, NodeKind};

/// Elements that never have content.
const VOID: &[&str] = &["hr", "br", "img", "input", "meta", "link", "wbr"];

/// Elements whose start closes an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "pre", "blockquote", "hr",
    "div", "section", "article",
];

/// Wrappers whose children are read as if they were siblings.
const TRANSPARENT: &[&str] = &[
    "html", "body", "div", "section", "article", "main", "header", "footer",
];

/// Elements dropped with everything inside them.
const SKIPPED: &[&str] = &["head", "script", "style", "title", "template"];

#[derive(Debug, Clone, PartialEq)]
enum Dom {
    Element { tag: Tag, children: Vec<Dom> },
    Text(String),
}

/// Nest the flat event stream, repairing what a browser would repair:
/// void elements never open, a new paragraph or block closes an open `<p>`,
/// a new `<li>` closes an open one, unmatched end tags are ignored, and
/// everything still open at the end is closed.
fn build_dom(input: &str) -> Vec<Dom> {
    let mut stack: Vec<(Tag, Vec<Dom>)> = Vec::new();
    let mut root: Vec<Dom> = Vec::new();

    fn close_top(stack: &mut Vec<(Tag, Vec<Dom>)>, root: &mut Vec<Dom>) {
        if let Some((tag, children)) = stack.pop() {
            let element = Dom::Element { tag, children };
            match stack.last_mut() {
                Some((_, parent)) => parent.push(element),
                None => root.push(element),
            }
        }
    }

    fn push(stack: &mut [(Tag, Vec<Dom>)], root: &mut Vec<Dom>, node: Dom) {
        match stack.last_mut() {
            Some((_, parent)) => parent.push(node),
            None => root.push(node),
        }
    }

    for event in events(input) {
        match event {
            MarkupEvent::Text(text) => push(&mut stack, &mut root, Dom::Text(text)),
            MarkupEvent::Start(tag) => {
                let name = tag.name.as_str();
                if CLOSES_PARAGRAPH.contains(&name)
                    && stack.last().is_some_and(|(open, _)| open.name == "p")
                {
                    close_top(&mut stack, &mut root);
                }
                if name == "li" && stack.last().is_some_and(|(open, _)| open.name == "li") {
                    close_top(&mut stack, &mut root);
                }
                if VOID.contains(&name) || tag.self_closing {
                    push(
                        &mut stack,
                        &mut root,
                        Dom::Element {
                            tag,
                            children: Vec::new(),
                        },
                    );
                } else {
                    stack.push((tag, Vec::new()));
                }
            }
            MarkupEvent::End(name) => {
                if let Some(depth) = stack.iter().rposition(|(open, _)| open.name == name) {
                    while stack.len() > depth {
                        close_top(&mut stack, &mut root);
                    }
                }
            }
        }
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut root);
    }
    root
}

/// Canonical fields from `data-*`; legacy values from `style` only for
/// attributes whose canonical field is missing or blank, so reading back written markup
/// reproduces the stored sources exactly.
fn attr_sources(tag: &Tag) -> AttrSources {
    let mut sources = AttrSources::default();
    for (key, value) in &tag.attrs {
        if let Some(name) = AttrName::from_data_key(key) {
            sources = sources.with_canonical(name, value.clone());
        }
    }
    if let Some(style) = tag.attr("style") {
        for (property, value) in parse_style(style) {
            if let Some(name) = AttrName::from_css_property(&property)
                && sources
                    .canonical(name)
                    .is_none_or(|value| value.trim().is_empty())
            {
                sources = sources.with_legacy(name, value);
            }
        }
    }
    sources
}

fn heading_level(name: &str) -> Option<u8> {
    let digit = name.strip_prefix('h')?;
    let level = digit.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Collects inline content, merging adjacent text.
#[derive(Default)]
struct InlineRun {
    nodes: Vec<Node>,
    text: String,
}

impl InlineRun {
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn push_break(&mut self) {
        self.flush_text();
        self.nodes.push(Node::hard_break());
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.nodes.push(Node::text(std::mem::take(&mut self.text)));
        }
    }

    fn collect(&mut self, dom: &[Dom]) {
        for node in dom {
            match node {
                Dom::Text(text) => self.push_text(text),
                Dom::Element { tag, children } => match tag.name.as_str() {
                    "br" => self.push_break(),
                    name if SKIPPED.contains(&name) => {}
                    // Formatting elements are flattened to their text.
                    _ => self.collect(children),
                },
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush_text();
        self.nodes
    }

    fn has_content(&self) -> bool {
        !self.nodes.is_empty() || !self.text.trim().is_empty()
    }

    /// Finish as the content of an implicit paragraph: surrounding
    /// whitespace is markup formatting, not content.
    fn finish_trimmed(self) -> Vec<Node> {
        let mut nodes = self.finish();
        if let Some(first) = nodes.first_mut()
            && let Some(text) = text_of(first)
        {
            *first = Node::text(text.trim_start());
        }
        if let Some(last) = nodes.last_mut()
            && let Some(text) = text_of(last)
        {
            *last = Node::text(text.trim_end());
        }
        nodes.retain(|node| text_of(node).is_none_or(|t| !t.is_empty()));
        nodes
    }
}

fn text_of(node: &Node) -> Option<String> {
    match node.kind() {
        NodeKind::Text(text) => Some(text.clone()),
        _ => None,
    }
}

fn is_block_element(name: &str) -> bool {
    heading_level(name).is_some()
        || matches!(
            name,
            "p" | "ul" | "ol" | "li" | "pre" | "blockquote" | "hr"
        )
        || TRANSPARENT.contains(&name)
        || SKIPPED.contains(&name)
}

/// Blocks for a container's children (document, quote or list item).
fn read_blocks(dom: &[Dom]) -> Vec<Node> {
    let mut blocks = Vec::new();
    let mut run = InlineRun::default();

    let flush = |run: &mut InlineRun, blocks: &mut Vec<Node>| {
        let pending = std::mem::take(run);
        if pending.has_content() {
            blocks.push(Node::block(BlockKind::Paragraph, pending.finish_trimmed()));
        }
    };

    for node in dom {
        match node {
            Dom::Element { tag, children } if is_block_element(&tag.name) => {
                flush(&mut run, &mut blocks);
                read_block(tag, children, &mut blocks);
            }
            other => run.collect(std::slice::from_ref(other)),
        }
    }
    flush(&mut run, &mut blocks);
    blocks
}

fn read_block(tag: &Tag, children: &[Dom], out: &mut Vec<Node>) {
    let name = tag.name.as_str();
    let kind = match name {
        "p" => BlockKind::Paragraph,
        "ul" => BlockKind::BulletList,
        "ol" => BlockKind::OrderedList {
            start: tag
                .attr("start")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(1),
        },
        "blockquote" => BlockKind::Blockquote,
        "pre" => BlockKind::CodeBlock {
            language: code_language(tag, children),
        },
        "hr" => BlockKind::HorizontalRule,
        // A stray list item outside a list, or a wrapper
        "li" => {
            out.extend(read_blocks(children));
            return;
        }
        _ if SKIPPED.contains(&name) => return,
        _ => match heading_level(name) {
            Some(level) => BlockKind::Heading { level },
            None => {
                out.extend(read_blocks(children));
                return;
            }
        },
    };

    let content = match &kind {
        BlockKind::Paragraph | BlockKind::Heading { .. } => {
            let mut run = InlineRun::default();
            run.collect(children);
            run.finish()
        }
        BlockKind::CodeBlock { .. } => {
            let mut text = String::new();
            collect_code(children, &mut text);
            if text.is_empty() {
                Vec::new()
            } else {
                vec![Node::text(text)]
            }
        }
        BlockKind::BulletList | BlockKind::OrderedList { .. } => read_list_items(children),
        BlockKind::Blockquote | BlockKind::ListItem => read_blocks(children),
        BlockKind::HorizontalRule => Vec::new(),
    };

    out.push(Node::block(kind, content).with_attrs(attr_sources(tag)));
}

fn read_list_items(dom: &[Dom]) -> Vec<Node> {
    let mut items = Vec::new();
    for node in dom {
        match node {
            Dom::Element { tag, children } if tag.name == "li" => {
                items.push(
                    Node::block(BlockKind::ListItem, read_blocks(children))
                        .with_attrs(attr_sources(tag)),
                );
            }
            Dom::Text(text) if text.trim().is_empty() => {}
            other => {
                let blocks = read_blocks(std::slice::from_ref(other));
                if !blocks.is_empty() {
                    items.push(Node::block(BlockKind::ListItem, blocks));
                }
            }
        }
    }
    items
}

fn collect_code(dom: &[Dom], out: &mut String) {
    for node in dom {
        match node {
            Dom::Text(text) => out.push_str(text),
            Dom::Element { tag, .. } if tag.name == "br" => out.push('\n'),
            Dom::Element { children, .. } => collect_code(children, out),
        }
    }
}

/// Language from a `language-*` class on `<pre>` or its `<code>` child.
fn code_language(pre: &Tag, children: &[Dom]) -> Option<String> {
    let from_class = |tag: &Tag| {
        tag.attr("class").and_then(|classes| {
            classes
                .split_ascii_whitespace()
                .find_map(|class| class.strip_prefix("language-"))
                .filter(|lang| !lang.is_empty())
                .map(str::to_string)
        })
    };
    from_class(pre).or_else(|| {
        children.iter().find_map(|child| match child {
            Dom::Element { tag, .. } if tag.name == "code" => from_class(tag),
            _ => None,
        })
    })
}

impl Document {
    /// Read a document from markup.
    ///
    /// Reading is total: unknown elements are flattened or dropped, stray
    /// text becomes paragraphs, and malformed tags degrade to text.
    pub fn from_markup(input: &str) -> Document {
        let blocks = read_blocks(&build_dom(input));
        log::debug!("read {} top-level blocks from markup", blocks.len());
        Document::from_valid_blocks(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttrSource, read_attributes};
    use crate::tests::block_texts;
    use pretty_assertions::assert_eq;

    fn kinds(doc: &Document) -> Vec<&'static str> {
        doc.top_level_blocks()
            .filter_map(|b| b.node.block_kind().map(BlockKind::name))
            .collect()
    }

    #[test]
    fn reads_the_common_blocks() {
        let doc = Document::from_markup(
            "<h2>Title</h2>\n<p>Body <strong>bold</strong> text</p>\n<ul><li><p>one</p></li><li>two</li></ul>\n<hr>\n<pre><code class=\"language-rust\">fn main() {}\n</code></pre>",
        );
        assert_eq!(
            kinds(&doc),
            vec!["heading", "paragraph", "bullet_list", "horizontal_rule", "code_block"]
        );
        assert_eq!(
            block_texts(&doc),
            vec!["Title", "Body bold text", "one\ntwo", "", "fn main() {}\n"]
        );
        let code = doc.node_at(doc.drag_handles()[4]).unwrap();
        assert_eq!(
            code.block_kind(),
            Some(&BlockKind::CodeBlock {
                language: Some("rust".to_string())
            })
        );
    }

    #[test]
    fn repairs_unclosed_and_stray_tags() {
        let doc = Document::from_markup("<p>one<p>two</span><ul><li>a<li>b</ul>");
        assert_eq!(kinds(&doc), vec!["paragraph", "paragraph", "bullet_list"]);
        assert_eq!(block_texts(&doc), vec!["one", "two", "a\nb"]);
    }

    #[test]
    fn bare_text_becomes_paragraphs() {
        let doc = Document::from_markup("  loose text <br> more  <p>x</p> tail");
        assert_eq!(block_texts(&doc), vec!["loose text \n more", "x", "tail"]);
    }

    #[test]
    fn skips_scripts_and_reads_through_wrappers() {
        let doc = Document::from_markup(
            "<!DOCTYPE html><html><head><title>t</title></head><body><div><p>a</p><script>x()</script></div></body></html>",
        );
        assert_eq!(block_texts(&doc), vec!["a"]);
    }

    #[test]
    fn canonical_fields_beat_inline_style() {
        let doc = Document::from_markup(
            r#"<p data-mt="4px" style="margin-top: 9px; margin-bottom: 2px; color: red">x</p>"#,
        );
        let attrs = read_attributes(doc.node_at(0).unwrap());
        assert_eq!(attrs.margin_top.value(), Some("4px"));
        assert_eq!(attrs.margin_top.source(), AttrSource::Canonical);
        assert_eq!(attrs.margin_bottom.value(), Some("2px"));
        assert_eq!(attrs.margin_bottom.source(), AttrSource::Legacy);
    }

    #[test]
    fn comments_with_gt_leave_no_text_behind() {
        let doc = Document::from_markup("<!-- a > b --><p>x</p>");
        assert_eq!(block_texts(&doc), vec!["x"]);
    }

    #[test]
    fn blank_canonical_field_falls_back_to_inline_style() {
        let doc = Document::from_markup(r#"<p data-mt="" style="margin-top: 5px">x</p>"#);
        let attrs = read_attributes(doc.node_at(0).unwrap());
        assert_eq!(attrs.margin_top.value(), Some("5px"));
        assert_eq!(attrs.margin_top.source(), AttrSource::Legacy);
    }

    #[test]
    fn ordered_list_start_and_rule_fields() {
        let doc = Document::from_markup(
            r##"<ol start="3"><li>c</li></ol><hr data-hr-style="dashed" data-hr-color="#f00">"##,
        );
        let list = doc.node_at(0).unwrap();
        assert_eq!(list.block_kind(), Some(&BlockKind::OrderedList { start: 3 }));
        let rule = read_attributes(doc.node_at(list.node_size()).unwrap())
            .rule
            .unwrap();
        assert_eq!(rule.line_style.value(), Some("dashed"));
        assert_eq!(rule.line_color.value(), Some("#f00"));
        assert_eq!(rule.thickness.source(), AttrSource::Default);
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        assert!(Document::from_markup("").is_empty());
        assert!(Document::from_markup(" \n\t ").is_empty());
    }
}
