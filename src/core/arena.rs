use crate::core::geometry::Bounds3f;

/// One node of the hierarchy. `count > 0` marks a leaf, in which case
/// `left_first` is the start of the node's range in the primitive index
/// array. Interior nodes have `count == 0` and `left_first` pointing at the
/// left child; the right child always sits at `left_first + 1`.
#[derive(Debug, Default, Copy, Clone)]
pub struct BVHNode {
    pub(crate) bounds: Bounds3f,
    pub(crate) left_first: usize,
    pub(crate) count: usize,
}

impl BVHNode {
    pub fn bounds(&self) -> Bounds3f {
        self.bounds
    }

    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }

    pub fn first(&self) -> usize {
        self.left_first
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn left_child(&self) -> usize {
        self.left_first
    }

    pub fn right_child(&self) -> usize {
        self.left_first + 1
    }
}

/// Fixed-capacity node storage addressed by index. `2N` slots are enough
/// for any binary tree over `N` primitives: the root lives at slot 0, slot 1
/// stays unused, and the remaining slots are handed out two at a time so
/// siblings stay adjacent.
///
/// Two allocation cursors exist: the top cursor (starts at 2, grows upward)
/// feeds top-down subdivision, the bottom cursor (starts at `2N - 1`,
/// shrinks downward) feeds bottom-up clustering. A single build uses exactly
/// one of them; running a cursor past the other is a builder bug and
/// asserts.
pub struct NodeArena {
    nodes: Vec<BVHNode>,
    top: usize,
    bottom: usize,
}

impl NodeArena {
    pub fn new(n_primitives: usize) -> Self {
        let capacity = (2 * n_primitives).max(2);
        NodeArena {
            nodes: vec![BVHNode::default(); capacity],
            top: 2,
            bottom: capacity - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Slots consumed so far by the top cursor, root included.
    pub fn top_used(&self) -> usize {
        self.top - 1
    }

    pub fn alloc_top_pair(&mut self) -> (usize, usize) {
        assert!(
            self.top + 2 <= self.nodes.len(),
            "node arena exhausted: top cursor at {} of {}",
            self.top,
            self.nodes.len()
        );
        let left = self.top;
        self.top += 2;
        (left, left + 1)
    }

    pub fn alloc_bottom_pair(&mut self) -> (usize, usize) {
        assert!(
            self.bottom >= 3,
            "node arena exhausted: bottom cursor at {}",
            self.bottom
        );
        let right = self.bottom;
        self.bottom -= 2;
        (right - 1, right)
    }

    pub fn get(&self, index: usize) -> &BVHNode {
        &self.nodes[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut BVHNode {
        &mut self.nodes[index]
    }

    pub fn nodes(&self) -> &[BVHNode] {
        &self.nodes
    }
}
