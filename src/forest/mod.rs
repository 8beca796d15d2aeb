// src/forest/mod.rs — Prompt lineage trees
//
// Nodes live in an arena owned by the Forest. A node owns its children through
// the arena; `parent` is a plain id lookup and never keeps anything alive.
// Nodes are only ever added, so ids stay valid for the life of the forest.

/// Opaque handle to a node inside one [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One step of a prompt lineage.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub system_prompt: String,
    pub user_prompt: String,
    pub assistant_response: String,
    pub is_refusal: bool,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        assistant_response: impl Into<String>,
        is_refusal: bool,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            assistant_response: assistant_response.into(),
            is_refusal,
            children: Vec::new(),
            parent: None,
        }
    }

    /// A generated node: inherits the system prompt, no response, not a refusal.
    pub fn derived(from: &Node, user_prompt: impl Into<String>) -> Self {
        Self::new(from.system_prompt.clone(), user_prompt, "", false)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestStats {
    pub trees: usize,
    pub nodes: usize,
}

/// Ordered collection of independent prompt trees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` as a new tree at the end of the root order.
    pub fn push_root(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = self.alloc(node);
        self.roots.push(id);
        id
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, mut child: Node) -> NodeId {
        debug_assert_eq!(
            self.nodes[parent.0].system_prompt, child.system_prompt,
            "system prompt must be constant along a lineage"
        );
        child.parent = Some(parent);
        child.children.clear();
        let id = self.alloc(child);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&Node> {
        self.node(id).parent.map(|p| self.node(p))
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk of the subtree under `root`, children left to right.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            // Reverse so the first child is popped next.
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Every node in row order: pre-order per tree, trees in root order.
    pub fn preorder(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|&root| self.subtree(root))
            .collect()
    }

    /// Every node with no children, depth-first and left to right across roots.
    ///
    /// This is a snapshot: nodes appended afterwards are not reflected, so the
    /// frontier has to be recomputed at the start of every epoch.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id.0].is_leaf())
            .collect()
    }

    /// Total node count by full traversal of every tree.
    pub fn count_nodes(&self) -> usize {
        let mut total = 0;
        for &root in &self.roots {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                total += 1;
                stack.extend(self.nodes[id.0].children.iter().copied());
            }
        }
        total
    }

    pub fn stats(&self) -> ForestStats {
        ForestStats {
            trees: self.roots.len(),
            nodes: self.count_nodes(),
        }
    }

    /// Indented dump of one tree, one user prompt per line, two spaces per level.
    pub fn render_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(&node.user_prompt);
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }
}
