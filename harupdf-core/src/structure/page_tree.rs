//! Page tree structure according to ISO 32000-1 Section 7.7.3

use crate::objects::{Dictionary, Object, ObjectId};

/// An intermediate or root `/Pages` node.
#[derive(Debug, Clone, PartialEq)]
struct PagesNode {
    id: ObjectId,
    kids: Vec<ObjectId>,
    /// Leaf pages below this node.
    count: usize,
}

/// Page tree shape computed at save time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageTree {
    root: PagesNode,
    intermediate: Vec<(PagesNode, ObjectId)>,
    /// Parent of each page, in page order.
    parents: Vec<ObjectId>,
}

impl PageTree {
    /// Groups `pages` under `root_id`.
    ///
    /// With `pages_per_node == 0` every page is a kid of the root. Otherwise
    /// no node holds more than `pages_per_node` kids and `allocate` numbers
    /// the intermediate nodes, bottom level first.
    pub fn build(
        root_id: ObjectId,
        pages: &[ObjectId],
        pages_per_node: usize,
        mut allocate: impl FnMut() -> ObjectId,
    ) -> Self {
        let mut parents = vec![root_id; pages.len()];
        let mut intermediate: Vec<(PagesNode, ObjectId)> = Vec::new();

        if pages_per_node < 2 || pages.len() <= pages_per_node {
            return Self {
                root: PagesNode {
                    id: root_id,
                    kids: pages.to_vec(),
                    count: pages.len(),
                },
                intermediate,
                parents,
            };
        }

        // Level 0 groups pages; later levels group the level below.
        let mut level: Vec<(ObjectId, usize)> = pages.iter().map(|&id| (id, 1)).collect();
        let mut first_level = true;
        while level.len() > pages_per_node {
            let mut next_level = Vec::new();
            for (chunk_index, chunk) in level.chunks(pages_per_node).enumerate() {
                let id = allocate();
                let count = chunk.iter().map(|(_, c)| c).sum();
                if first_level {
                    let start = chunk_index * pages_per_node;
                    parents[start..start + chunk.len()].fill(id);
                } else {
                    for (kid, _) in chunk {
                        set_parent(&mut intermediate, *kid, id);
                    }
                }
                intermediate.push((
                    PagesNode {
                        id,
                        kids: chunk.iter().map(|(kid, _)| *kid).collect(),
                        count,
                    },
                    root_id,
                ));
                next_level.push((id, count));
            }
            level = next_level;
            first_level = false;
        }

        Self {
            root: PagesNode {
                id: root_id,
                kids: level.iter().map(|(id, _)| *id).collect(),
                count: pages.len(),
            },
            intermediate,
            parents,
        }
    }

    /// `/Parent` of the page at `index`.
    pub fn parent_of(&self, index: usize) -> Option<ObjectId> {
        self.parents.get(index).copied()
    }

    /// The root dictionary first, then the intermediate nodes.
    pub fn node_objects(&self) -> Vec<(ObjectId, Object)> {
        let mut objects = vec![(self.root.id, node_dict(&self.root, None).into())];
        for (node, parent) in &self.intermediate {
            objects.push((node.id, node_dict(node, Some(*parent)).into()));
        }
        objects
    }
}

fn set_parent(nodes: &mut [(PagesNode, ObjectId)], kid: ObjectId, parent: ObjectId) {
    if let Some((_, p)) = nodes.iter_mut().find(|(node, _)| node.id == kid) {
        *p = parent;
    }
}

fn node_dict(node: &PagesNode, parent: Option<ObjectId>) -> Dictionary {
    let mut dict = Dictionary::typed("Pages");
    dict.set(
        "Kids",
        Object::Array(node.kids.iter().map(|id| Object::Reference(*id)).collect()),
    );
    dict.set("Count", node.count);
    if let Some(parent) = parent {
        dict.set("Parent", parent);
    }
    dict
}
