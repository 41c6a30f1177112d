//! # Markup
//!
//! Conversion between documents and the HTML-like markup they are stored as.
//!
//! Reading is total: any input yields a document, repairing unclosed
//! elements and wrapping stray text in paragraphs. Writing is compact, one
//! top-level block per line, with every stored attribute emitted both as its
//! canonical `data-*` field and inside the synthesized `style`. Reading the
//! output back gives an equal document.

mod reader;
mod writer;

pub use writer::node_to_markup;
