//! # Markup Events
//!
//! Events are the flat representation handed to tree builders: tags are
//! split into a lowercase name, decoded attributes and a self-closing flag,
//! and text has its character references decoded. Declarations are dropped
//! here since they carry no content.
//!
//! ```text
//! <p data-mt="4px">a &amp; b</p>
//!
//! Start(Tag { name: "p", attrs: [("data-mt", "4px")] })
//! Text("a & b")
//! End("p")
//! ```

use crate::lexer::{TokenKind, lex};

/// A parsed start tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// Lowercased element name
    pub name: String,
    /// Attributes in source order, names lowercased, values decoded.
    pub attrs: Vec<(String, String)>,
    /// `<hr/>` style tag
    pub self_closing: bool,
}

impl Tag {
    /// Look up an attribute value by (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An event in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Start(Tag),
    End(String),
    Text(String),
}

/// Tokenize `input` and convert the tokens into events.
pub fn events(input: &str) -> Vec<MarkupEvent> {
    let mut out = Vec::new();
    for token in lex(input) {
        match token.kind {
            TokenKind::StartTag => out.push(MarkupEvent::Start(parse_start_tag(token.text))),
            TokenKind::EndTag => {
                let name = token.text[2..token.text.len() - 1].trim();
                out.push(MarkupEvent::End(name.to_ascii_lowercase()));
            }
            TokenKind::Declaration => {}
            TokenKind::Text => {
                let decoded = html_escape::decode_html_entities(token.text);
                out.push(MarkupEvent::Text(decoded.into_owned()));
            }
        }
    }
    out
}

/// Parse the text of a start tag (including `<` and `>`).
pub fn parse_start_tag(text: &str) -> Tag {
    let inner = &text[1..text.len() - 1];
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    Tag {
        name,
        attrs: parse_attributes(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attributes(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (raw, remainder) = split_value(after_eq);
            rest = remainder;
            html_escape::decode_html_entities(raw).into_owned()
        } else {
            // Boolean attribute
            String::new()
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    attrs
}

/// Split a (possibly quoted) attribute value from the rest of the tag.
fn split_value(input: &str) -> (&str, &str) {
    match input.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &input[1..];
            match body.find(quote) {
                Some(end) => (&body[..end], &body[end + 1..]),
                None => (body, ""),
            }
        }
        _ => {
            let end = input
                .find(|c: char| c.is_ascii_whitespace())
                .unwrap_or(input.len());
            (&input[..end], &input[end..])
        }
    }
}
