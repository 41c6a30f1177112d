//! # content-builder-syntax
//!
//! Tokenizer for the block markup that content-builder documents are
//! serialized to: an HTML subset where every block element carries its
//! canonical attributes as `data-*` fields and a derived `style`.
//!
//! ```text
//! Source Text → Lexer → Tokens → Events
//!               (Logos)          (tags split, entities decoded)
//! ```
//!
//! The tree builder lives in the engine crate; this crate knows nothing about
//! which elements exist or how they nest.
//!
//! ```
//! use content_builder_syntax::{MarkupEvent, events};
//!
//! let evs = events("<hr data-hr-style=\"dashed\"/>");
//! let MarkupEvent::Start(tag) = &evs[0] else { panic!() };
//! assert_eq!(tag.name, "hr");
//! assert!(tag.self_closing);
//! ```

pub mod event;
pub mod lexer;

pub use event::{MarkupEvent, Tag, events};
pub use lexer::{Token, TokenKind, lex};
