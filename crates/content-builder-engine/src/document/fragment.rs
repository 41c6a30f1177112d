use super::node::Node;

/// An ordered run of sibling nodes with a cached total size.
///
/// Fragments are the unit of content moved by transactions: a slice of the
/// document is a fragment, and inserting puts a fragment's nodes into a parent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    nodes: Vec<Node>,
    size: usize,
}

impl Fragment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let size = nodes.iter().map(Node::node_size).sum();
        Self { nodes, size }
    }

    /// Total position units of all nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn child_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Find the child index for an offset into this fragment.
    ///
    /// Returns `(index, child_start)`. An offset on a boundary between two
    /// children maps to the later child, and `size()` maps to
    /// `(child_count(), size())`.
    pub fn find_index(&self, offset: usize) -> (usize, usize) {
        let mut cursor = 0;
        for (i, child) in self.nodes.iter().enumerate() {
            if cursor == offset {
                return (i, cursor);
            }
            let end = cursor + child.node_size();
            if end > offset {
                return (i, cursor);
            }
            cursor = end;
        }
        (self.nodes.len(), cursor)
    }

    /// Copy of the content between two offsets.
    ///
    /// Children partially covered by the range are cut recursively; text nodes
    /// are cut by character.
    pub fn cut(&self, from: usize, to: usize) -> Fragment {
        if from == 0 && to >= self.size {
            return self.clone();
        }

        let mut result = Vec::new();
        let mut pos = 0;
        for child in &self.nodes {
            if pos >= to {
                break;
            }
            let end = pos + child.node_size();
            if end > from {
                if pos < from || end > to {
                    if child.is_text() {
                        let start = from.saturating_sub(pos);
                        let stop = (to - pos).min(child.node_size());
                        result.push(child.cut(start, stop));
                    } else if child.is_leaf() {
                        result.push(child.clone());
                    } else {
                        let start = from.saturating_sub(pos + 1);
                        let stop = to.saturating_sub(pos + 1).min(child.content_size());
                        result.push(child.cut(start, stop));
                    }
                } else {
                    result.push(child.clone());
                }
            }
            pos = end;
        }
        Fragment::from_nodes(result)
    }

    /// New fragment with children `start..end` replaced by `replacement`.
    pub(crate) fn splice(&self, start: usize, end: usize, replacement: &Fragment) -> Fragment {
        let mut nodes = Vec::with_capacity(self.nodes.len() + replacement.child_count());
        nodes.extend_from_slice(&self.nodes[..start]);
        nodes.extend(replacement.iter().cloned());
        nodes.extend_from_slice(&self.nodes[end..]);
        Fragment::from_nodes(nodes)
    }

    /// New fragment with the child at `index` replaced by `node`.
    pub(crate) fn replace_child(&self, index: usize, node: Node) -> Fragment {
        let mut nodes = self.nodes.clone();
        nodes[index] = node;
        Fragment::from_nodes(nodes)
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockKind;
    use pretty_assertions::assert_eq;

    fn blocks() -> Fragment {
        // [p("abc") 0..5, hr 5..6, p("de") 6..10]
        Fragment::from_nodes(vec![
            Node::paragraph("abc"),
            Node::horizontal_rule(),
            Node::paragraph("de"),
        ])
    }

    #[test]
    fn find_index_maps_boundaries_to_the_following_child() {
        let frag = blocks();
        assert_eq!(frag.find_index(0), (0, 0));
        assert_eq!(frag.find_index(3), (0, 0));
        assert_eq!(frag.find_index(5), (1, 5));
        assert_eq!(frag.find_index(6), (2, 6));
        assert_eq!(frag.find_index(10), (3, 10));
    }

    #[test]
    fn cut_on_boundaries_copies_whole_nodes() {
        let frag = blocks();
        let cut = frag.cut(5, 10);
        assert_eq!(
            cut,
            Fragment::from_nodes(vec![Node::horizontal_rule(), Node::paragraph("de")])
        );
    }

    #[test]
    fn cut_inside_nodes_trims_text() {
        let frag = blocks();
        // from inside "abc" (after 'a') to inside "de" (after 'd')
        let cut = frag.cut(2, 8);
        assert_eq!(
            cut,
            Fragment::from_nodes(vec![
                Node::paragraph("bc"),
                Node::horizontal_rule(),
                Node::paragraph("d"),
            ])
        );
        assert_eq!(cut.size(), 8);
    }

    #[test]
    fn cut_nested_containers() {
        let item = |t: &str| Node::block(BlockKind::ListItem, vec![Node::paragraph(t)]);
        let list = Node::block(BlockKind::BulletList, vec![item("ab"), item("cd")]);
        let frag = Fragment::from_nodes(vec![list]);
        // list content starts at 1; second item spans 7..13
        let cut = frag.cut(7, 14);
        assert_eq!(
            cut,
            Fragment::from_nodes(vec![Node::block(BlockKind::BulletList, vec![item("cd")])])
        );
    }

    #[test]
    fn empty_cut() {
        assert!(blocks().cut(5, 5).is_empty());
    }
}
