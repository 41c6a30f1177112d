use super::node::Node;

/// One level of a resolved position's ancestry.
#[derive(Debug, Clone, Copy)]
struct Step<'a> {
    node: &'a Node,
    /// Index of the child the position points into (or before)
    index: usize,
    /// Position where `node`'s content starts
    content_start: usize,
}

/// A position together with the chain of nodes that contain it.
///
/// A position lies inside every ancestor whose range contains it, so the
/// caller picks a depth: 0 is the document root, 1 the top-level block, and
/// so on down to [`depth`](Self::depth), the innermost parent.
#[derive(Debug, Clone)]
pub struct ResolvedPosition<'a> {
    pos: usize,
    path: Vec<Step<'a>>,
    parent_offset: usize,
    /// Whether the position sits between children rather than inside text
    at_boundary: bool,
}

impl<'a> ResolvedPosition<'a> {
    /// Walk down from `root` to the innermost node containing `pos`.
    ///
    /// The caller has already checked `pos <= root.content_size()`.
    pub(crate) fn walk(root: &'a Node, pos: usize) -> Self {
        let mut path = Vec::new();
        let mut node = root;
        let mut content_start = 0;
        let mut offset = pos;

        loop {
            let (index, child_start) = node.content().find_index(offset);
            let remainder = offset - child_start;
            path.push(Step {
                node,
                index,
                content_start,
            });
            if remainder == 0 {
                return Self {
                    pos,
                    path,
                    parent_offset: offset,
                    at_boundary: true,
                };
            }
            match node.content().child(index) {
                Some(child) if !child.is_leaf() => {
                    content_start += child_start + 1;
                    offset = remainder - 1;
                    node = child;
                }
                _ => {
                    // Inside a text node: the parent stays the textblock.
                    return Self {
                        pos,
                        path,
                        parent_offset: offset,
                        at_boundary: false,
                    };
                }
            }
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Depth of the innermost parent node.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// The ancestor at `depth`, or `None` when deeper than the position goes.
    pub fn node(&self, depth: usize) -> Option<&'a Node> {
        self.path.get(depth).map(|step| step.node)
    }

    /// The innermost node containing the position.
    pub fn parent(&self) -> &'a Node {
        self.path[self.depth()].node
    }

    /// Index into the ancestor at `depth` of the child the position is in or before.
    pub fn index(&self, depth: usize) -> Option<usize> {
        self.path.get(depth).map(|step| step.index)
    }

    /// Position at which the content of the ancestor at `depth` starts.
    pub fn start(&self, depth: usize) -> Option<usize> {
        self.path.get(depth).map(|step| step.content_start)
    }

    /// Position immediately before the ancestor at `depth`.
    ///
    /// The root has no position before it, so depth 0 yields `None`.
    pub fn before(&self, depth: usize) -> Option<usize> {
        if depth == 0 {
            return None;
        }
        self.start(depth).map(|start| start - 1)
    }

    /// Position immediately after the ancestor at `depth`.
    pub fn after(&self, depth: usize) -> Option<usize> {
        let before = self.before(depth)?;
        Some(before + self.node(depth)?.node_size())
    }

    /// Offset of the position within its parent's content.
    pub fn parent_offset(&self) -> usize {
        self.parent_offset
    }

    /// `true` unless the position falls inside a text node.
    pub fn at_boundary(&self) -> bool {
        self.at_boundary
    }

    /// The child of the parent starting exactly at this position, if any.
    pub fn node_after(&self) -> Option<&'a Node> {
        if !self.at_boundary {
            return None;
        }
        let step = self.path[self.depth()];
        step.node.content().child(step.index)
    }
}
