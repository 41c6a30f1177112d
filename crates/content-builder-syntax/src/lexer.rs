//! # Lexer - Tokenizing Block Markup
//!
//! The first stage of reading a serialized document: the source is broken
//! into a flat sequence of tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Bytes that match no
//! rule (a stray `<`, an unterminated tag) come out as `Text` rather than being
//! dropped:
//!
//! ```
//! use content_builder_syntax::lexer::lex;
//!
//! let input = "<p data-mt=\"12px\">Hello</p>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! Tokens are context-free. The lexer does not know that `<li>` must live in a
//! list or that `<hr>` is a leaf; that is the tree builder's job.

use std::ops::Range;

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name attr="value" ...>` or `<name/>`. Quoted attribute values may
    /// contain `>`.
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#)]
    StartTag,

    /// `</name>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>")]
    EndTag,

    /// `<!DOCTYPE ...>` and comments. Carries no document content. A comment
    /// runs to the first `-->`, so it may contain `>`.
    #[regex(r"<![^>]*>")]
    #[regex(r"<!--([^-]|-[^-])*-->", priority = 10)]
    Declaration,

    /// Character data between tags
    #[regex(r"[^<]+")]
    Text,
}

/// A lexed token with its kind, text slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let kind = result.unwrap_or(TokenKind::Text);

        // Fold error bytes into an adjacent text run so callers see one run.
        if kind == TokenKind::Text
            && let Some(last) = tokens.last_mut()
            && last.kind == TokenKind::Text
            && last.span.end == span.start
        {
            last.span.end = span.end;
            last.text = &input[last.span.clone()];
            continue;
        }

        tokens.push(Token {
            kind,
            text: lexer.slice(),
            span,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_simple_element() {
        assert_eq!(
            kinds("<p>Hello</p>"),
            vec![TokenKind::StartTag, TokenKind::Text, TokenKind::EndTag]
        );
    }

    #[test]
    fn lex_quoted_gt_stays_inside_tag() {
        let tokens = lex(r#"<p title="a > b">x</p>"#);
        assert_eq!(tokens[0].kind, TokenKind::StartTag);
        assert_eq!(tokens[0].text, r#"<p title="a > b">"#);
    }

    #[test]
    fn lex_self_closing_and_declarations() {
        assert_eq!(
            kinds("<!DOCTYPE html><hr/><br>"),
            vec![
                TokenKind::Declaration,
                TokenKind::StartTag,
                TokenKind::StartTag
            ]
        );
    }

    #[test]
    fn comment_may_contain_gt() {
        let tokens = lex("<!-- a > b --><p>x</p>");
        assert_eq!(tokens[0].kind, TokenKind::Declaration);
        assert_eq!(tokens[0].text, "<!-- a > b -->");
        assert_eq!(tokens[1].kind, TokenKind::StartTag);
    }

    #[test]
    fn stray_angle_bracket_becomes_text() {
        let tokens = lex("a < b");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].text, "a < b");
    }

    #[test]
    fn lex_is_lossless() {
        let input = "<ul>\n  <li><p style='margin-top: 4px'>One &amp; two</p></li>\n</ul> < trailing";
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(reconstructed, input);
    }
}
