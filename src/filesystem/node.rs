use std::ops::{Index, IndexMut};
use std::time::SystemTime;

use derive_more::Display;
use hashlink::LinkedHashMap;

pub const ROOT_NAME: &str = "/";

/// Handle to a node stored in a [`NodeArena`].
///
/// Ids are only meaningful for the arena that issued them. Slots are recycled once a node is
/// freed, so an id must not be kept after the node it names has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("directory")]
    Directory,
    #[display("file")]
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory {
        children: LinkedHashMap<String, NodeId>,
    },
    File {
        content: String,
    },
}

/// A single directory or file of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeId>,
    created_at: SystemTime,
    modified_at: SystemTime,
}

impl Node {
    /// An empty, unattached directory. [`NodeArena::attach`] sets its parent.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(
            name.into(),
            NodeKind::Directory {
                children: LinkedHashMap::new(),
            },
        )
    }

    /// An empty, unattached file.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(
            name.into(),
            NodeKind::File {
                content: String::new(),
            },
        )
    }

    fn new(name: String, kind: NodeKind) -> Self {
        let now = SystemTime::now();
        Self {
            name,
            kind,
            parent: None,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn entry_kind(&self) -> EntryKind {
        match self.kind {
            NodeKind::Directory { .. } => EntryKind::Directory,
            NodeKind::File { .. } => EntryKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> Option<&LinkedHashMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children().and_then(|children| children.get(name).copied())
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn modified_at(&self) -> SystemTime {
        self.modified_at
    }

    /// Replaces the content of a file node and bumps its modification time.
    /// Returns `false` without touching anything when called on a directory.
    pub fn write_content(&mut self, new_content: String) -> bool {
        match &mut self.kind {
            NodeKind::File { content } => {
                *content = new_content;
                self.modified_at = SystemTime::now();
                true
            }
            NodeKind::Directory { .. } => false,
        }
    }

    fn children_mut(&mut self) -> Option<&mut LinkedHashMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }
}

/// Slot storage for every node of one tree.
///
/// Ownership is expressed through the `children` maps: a node is alive as long as its slot is
/// occupied, and freeing a node frees the subtree it owns. Parent links are plain ids and own
/// nothing.
///
/// Indexing with a stale or foreign [`NodeId`] panics.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Stores `node` and returns its id. Does not link it into its parent's children.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Links `child` under `parent` using the child's own name, setting its parent link.
    ///
    /// An existing entry with the same name keeps its position in the listing order and its
    /// previous id is returned; the caller decides what happens to that node.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        self[child].parent = Some(parent);
        let name = self[child].name.clone();
        self[parent]
            .children_mut()
            .and_then(|children| children.replace(name, child))
    }

    /// Unlinks `child` from its parent's children. The node itself stays allocated.
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self[child].parent.take() else {
            return;
        };
        let name = self[child].name.clone();
        if let Some(children) = self[parent].children_mut() {
            children.remove(&name);
        }
    }

    /// Frees `id` together with everything it owns and returns how many nodes were freed.
    /// The node must already be detached from its parent.
    pub fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut stack = vec![id];
        let mut freed = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.slots[current.0].take() {
                if let Some(children) = node.children() {
                    stack.extend(children.values().copied());
                }
                self.free.push(current);
                freed += 1;
            }
        }
        freed
    }

    /// Walks parent links from `id` to the root and joins the names: `/` for the root,
    /// `/a/b/c` for nested nodes.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self[current].parent {
            segments.push(self[current].name.as_str());
            current = parent;
        }
        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// True when `id` is `ancestor` itself or lies somewhere below it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self[node].parent;
        }
        false
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id)
            .unwrap_or_else(|| panic!("node {id} is not alive in this arena"))
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("node {id} is not alive in this arena"),
        }
    }
}
