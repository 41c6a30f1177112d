// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use content_builder_engine::{BlockKind, Document, Node};

#[allow(dead_code)]
pub fn generate_markup(sections: usize) -> String {
    let base = "<h2 data-mt=\"24px\">Section</h2>\n<p style=\"padding-top: 8px\">Paragraph with some content.<br>Second line.</p>\n<ul><li><p>Bullet point</p></li><li><p>Another item</p></li></ul>\n<hr data-hr-style=\"dashed\">\n<pre><code class=\"language-rust\">fn example() {}</code></pre>\n";
    base.repeat(sections)
}

#[allow(dead_code)]
pub fn generate_document(blocks: usize) -> Document {
    let nodes = (0..blocks)
        .map(|i| match i % 4 {
            0 => Node::heading(2, &format!("Heading {i}")),
            1 => Node::paragraph(&format!("Paragraph {i} with a little text in it")),
            2 => Node::block(
                BlockKind::BulletList,
                vec![Node::block(
                    BlockKind::ListItem,
                    vec![Node::paragraph(&format!("Item {i}"))],
                )],
            ),
            _ => Node::horizontal_rule(),
        })
        .collect();
    Document::new(nodes).expect("generated blocks are valid at the top level")
}
