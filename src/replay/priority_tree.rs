//! Max-priority binary search tree over `(priority, payload)` pairs.
//!
//! Key characteristics:
//! - Arena-allocated nodes (`Vec` slab + free list), children stored as
//!   optional arena indices
//! - `insert` and `pop_max` in O(depth); no rebalancing
//! - Duplicate priorities allowed; ties descend right
//! - `f32::INFINITY` is a legal priority, used by the replay store as the
//!   "sample at least once" sentinel for fresh experience
//!
//! The tree exposes no entry count; the owning store tracks it alongside the
//! experience buffer's bookkeeping. Depth degrades to O(n) under sorted
//! insertion, an accepted limitation of the structure.

/// Arena slot for one tree node.
#[derive(Debug, Clone)]
struct Node {
    priority: f32,
    payload: u64,
    left: Option<usize>,
    right: Option<usize>,
}

/// Unbalanced max-priority search tree.
///
/// Payloads are opaque `u64` handles; the tree never dereferences them.
#[derive(Debug, Clone, Default)]
pub struct PriorityTree {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: Option<usize>,
}

impl PriorityTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a `(priority, payload)` pair.
    ///
    /// Never fails; any `f32` priority is accepted, including `+inf`.
    /// Equal priorities descend right, so among ties the most recently
    /// inserted entry pops first.
    pub fn insert(&mut self, priority: f32, payload: u64) {
        let slot = self.alloc(priority, payload);
        let Some(mut cur) = self.root else {
            self.root = Some(slot);
            return;
        };
        loop {
            if priority >= self.nodes[cur].priority {
                match self.nodes[cur].right {
                    Some(right) => cur = right,
                    None => {
                        self.nodes[cur].right = Some(slot);
                        return;
                    }
                }
            } else {
                match self.nodes[cur].left {
                    Some(left) => cur = left,
                    None => {
                        self.nodes[cur].left = Some(slot);
                        return;
                    }
                }
            }
        }
    }

    /// Detach and return the maximum-priority entry.
    ///
    /// Returns `None` on an empty tree. The detached node's left subtree is
    /// spliced into its parent's right-child slot (standard BST max removal),
    /// or becomes the new root when the maximum was the root itself.
    pub fn pop_max(&mut self) -> Option<(f32, u64)> {
        let root = self.root?;
        let mut parent: Option<usize> = None;
        let mut cur = root;
        while let Some(right) = self.nodes[cur].right {
            parent = Some(cur);
            cur = right;
        }
        let hanging_left = self.nodes[cur].left;
        match parent {
            Some(p) => self.nodes[p].right = hanging_left,
            None => self.root = hanging_left,
        }
        let priority = self.nodes[cur].priority;
        let payload = self.nodes[cur].payload;
        self.free.push(cur);
        Some((priority, payload))
    }

    /// Whether the tree currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Longest root-to-leaf path. Diagnostic only.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else { return 0 };
        let mut max_depth = 0;
        // iterative: the tree can be a degenerate chain
        let mut stack = vec![(root, 1usize)];
        while let Some((idx, d)) = stack.pop() {
            max_depth = max_depth.max(d);
            if let Some(left) = self.nodes[idx].left {
                stack.push((left, d + 1));
            }
            if let Some(right) = self.nodes[idx].right {
                stack.push((right, d + 1));
            }
        }
        max_depth
    }

    /// Drop every entry and recycle the arena.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
    }

    fn alloc(&mut self, priority: f32, payload: u64) -> usize {
        let node = Node {
            priority,
            payload,
            left: None,
            right: None,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    #[cfg(test)]
    fn arena_len(&self) -> usize {
        self.nodes.len()
    }
}
