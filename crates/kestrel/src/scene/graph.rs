//! Scene graph implementation
//!
//! Nodes live in a slot map arena; parent links are non-owning keys, so the
//! tree structure never owns object lifetimes. Ownership flows from game
//! objects to their components, and from components into the arena.

use crate::assets::{AssetHandle, StaticMesh};
use crate::foundation::math::{self, Mat4, Quat, Transform, Vec3};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Stable, non-owning handle to a scene graph node
    pub struct NodeKey;
}

/// Scene graph errors
#[derive(Debug, Error)]
pub enum SceneGraphError {
    /// Attaching would create a cycle (the child is an ancestor of the parent)
    #[error("attaching node would create a cycle in the scene graph")]
    WouldCycle,

    /// One of the referenced nodes no longer exists
    #[error("scene graph node no longer exists")]
    MissingNode,
}

/// What a node contributes to rendering
#[derive(Debug, Clone, Default)]
pub enum NodePayload {
    /// Pure structure: contributes a transform and nothing else
    #[default]
    Group,

    /// A static mesh drawn at the node's world matrix
    Mesh(AssetHandle<StaticMesh>),

    /// A camera viewpoint
    Camera(Projection),
}

/// Perspective projection parameters carried by camera nodes
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Vertical field of view in radians
    pub fov_y: f32,

    /// Near clip plane distance
    pub near: f32,

    /// Far clip plane distance
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: 70.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// A single entry in the scene graph
#[derive(Debug, Default)]
pub struct SceneNode {
    transform: Transform,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    payload: NodePayload,
}

impl SceneNode {
    fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            ..Default::default()
        }
    }
}

/// A drawable extracted for the renderer
#[derive(Debug, Clone, Copy)]
pub struct DrawableInstance {
    /// The node the drawable came from
    pub node: NodeKey,

    /// Mesh to draw
    pub mesh: AssetHandle<StaticMesh>,

    /// World matrix at extraction time
    pub world: Mat4,
}

/// Arena-backed transform hierarchy with a dedicated root node
///
/// The parent link and the parent's child list are kept in agreement by
/// construction: [`SceneGraph::attach_child`] and
/// [`SceneGraph::detach_child`] are the only mutators of either side.
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new scene graph containing only the root node
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::default());
        Self { nodes, root }
    }

    /// The root node every visible subtree hangs off of
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds only the root node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Insert a new detached node with the given local transform
    pub fn insert(&mut self, transform: Transform) -> NodeKey {
        self.nodes.insert(SceneNode::with_transform(transform))
    }

    /// Insert a new detached node with a payload
    pub fn insert_with_payload(&mut self, transform: Transform, payload: NodePayload) -> NodeKey {
        self.nodes.insert(SceneNode {
            transform,
            payload,
            ..Default::default()
        })
    }

    /// Whether the node still exists in the arena
    pub fn contains(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(node)
    }

    /// The node's current parent, if attached
    pub fn parent_of(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes.get(node)?.parent
    }

    /// The node's children, in attachment order
    pub fn children_of(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(node)
            .map_or(&[], |n| n.children.as_slice())
    }

    /// Shared access to a node's local transform
    pub fn transform(&self, node: NodeKey) -> Option<&Transform> {
        self.nodes.get(node).map(|n| &n.transform)
    }

    /// Exclusive access to a node's local transform
    pub fn transform_mut(&mut self, node: NodeKey) -> Option<&mut Transform> {
        self.nodes.get_mut(node).map(|n| &mut n.transform)
    }

    /// The node's payload
    pub fn payload(&self, node: NodeKey) -> Option<&NodePayload> {
        self.nodes.get(node).map(|n| &n.payload)
    }

    /// Replace the node's payload
    pub fn set_payload(&mut self, node: NodeKey, payload: NodePayload) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.payload = payload;
        }
    }

    /// Attach `child` under `parent`
    ///
    /// The child is detached from any prior parent first. The request is
    /// rejected if the child is the parent itself or one of its ancestors,
    /// since linking it would disconnect that subtree into a cycle.
    pub fn attach_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneGraphError> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return Err(SceneGraphError::MissingNode);
        }

        // Walk up from the proposed parent; finding the child means the
        // attach would close a loop.
        let mut cursor = Some(parent);
        while let Some(key) = cursor {
            if key == child {
                return Err(SceneGraphError::WouldCycle);
            }
            cursor = self.nodes.get(key).and_then(|n| n.parent);
        }

        self.detach_from_parent(child);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`
    ///
    /// A no-op unless the child's current parent is exactly `parent`.
    /// Double-detach and detach-from-the-wrong-parent are defined as silent
    /// no-ops, not errors.
    pub fn detach_child(&mut self, parent: NodeKey, child: NodeKey) {
        let is_child = self
            .nodes
            .get(child)
            .is_some_and(|n| n.parent == Some(parent));
        if !is_child {
            return;
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&k| k != child);
        }
    }

    /// Detach the node from whatever parent it currently has, if any
    pub fn detach_from_parent(&mut self, node: NodeKey) {
        if let Some(parent) = self.parent_of(node) {
            self.detach_child(parent, node);
        }
    }

    /// Remove a node and every descendant from the arena
    ///
    /// The node is detached from its parent first so the parent's child list
    /// stays consistent. Removing an already-removed node is a no-op.
    pub fn remove_subtree(&mut self, node: NodeKey) {
        if !self.nodes.contains_key(node) || node == self.root {
            return;
        }
        self.detach_from_parent(node);

        let mut pending = vec![node];
        while let Some(key) = pending.pop() {
            if let Some(removed) = self.nodes.remove(key) {
                pending.extend(removed.children);
            }
        }
    }

    /// The node's local matrix: a function of its own transform only
    pub fn local_matrix(&self, node: NodeKey) -> Mat4 {
        self.nodes
            .get(node)
            .map_or_else(Mat4::identity, |n| n.transform.to_matrix())
    }

    /// The node's world matrix, composed through the parent chain
    ///
    /// Unparented nodes get an identity contribution for the missing parent,
    /// so a root-level node's world matrix equals its local matrix.
    pub fn world_matrix(&self, node: NodeKey) -> Mat4 {
        let mut matrix = self.local_matrix(node);
        let mut cursor = self.parent_of(node);
        while let Some(key) = cursor {
            matrix = self.local_matrix(key) * matrix;
            cursor = self.parent_of(key);
        }
        matrix
    }

    /// World-space position of the node
    pub fn world_position(&self, node: NodeKey) -> Vec3 {
        math::extract_translation(&self.world_matrix(node))
    }

    /// World-space rotation of the node
    pub fn world_rotation(&self, node: NodeKey) -> Quat {
        math::extract_rotation(&self.world_matrix(node))
    }

    /// Forward axis (+Z) of the node in world space
    pub fn forward_axis(&self, node: NodeKey) -> Vec3 {
        self.world_rotation(node) * Vec3::z()
    }

    /// Right axis (+X) of the node in world space
    pub fn right_axis(&self, node: NodeKey) -> Vec3 {
        self.world_rotation(node) * Vec3::x()
    }

    /// Up axis (+Y) of the node in world space
    pub fn up_axis(&self, node: NodeKey) -> Vec3 {
        self.world_rotation(node) * Vec3::y()
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, node: NodeKey) -> bool {
        let mut cursor = Some(node);
        while let Some(key) = cursor {
            if key == self.root {
                return true;
            }
            cursor = self.parent_of(key);
        }
        false
    }

    /// Depth-first walk from the root collecting mesh drawables
    ///
    /// Detached subtrees are never visited, so nothing hanging outside the
    /// root is drawn.
    pub fn collect_drawables(&self) -> Vec<DrawableInstance> {
        let mut drawables = Vec::new();
        let mut pending = vec![(self.root, Mat4::identity())];
        while let Some((key, parent_world)) = pending.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            let world = parent_world * node.transform.to_matrix();
            if let NodePayload::Mesh(mesh) = &node.payload {
                drawables.push(DrawableInstance {
                    node: key,
                    mesh: *mesh,
                    world,
                });
            }
            for &child in &node.children {
                pending.push((child, world));
            }
        }
        drawables
    }

    /// First camera node found under the root, with its world matrix
    pub fn active_camera(&self) -> Option<(NodeKey, Projection, Mat4)> {
        let mut pending = vec![(self.root, Mat4::identity())];
        while let Some((key, parent_world)) = pending.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            let world = parent_world * node.transform.to_matrix();
            if let NodePayload::Camera(projection) = &node.payload {
                return Some((key, *projection, world));
            }
            for &child in &node.children {
                pending.push((child, world));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn translation(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_position(Vec3::new(x, y, z))
    }

    #[test]
    fn test_world_matrix_composes_ancestor_chain() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(translation(1.0, 0.0, 0.0));
        let b = graph.insert(translation(0.0, 2.0, 0.0));
        let c = graph.insert(translation(0.0, 0.0, 3.0));
        graph.attach_child(graph.root(), a).unwrap();
        graph.attach_child(a, b).unwrap();
        graph.attach_child(b, c).unwrap();

        let expected = graph.local_matrix(a) * graph.local_matrix(b) * graph.local_matrix(c);
        assert_relative_eq!(graph.world_matrix(c), expected);
        assert_relative_eq!(
            graph.world_position(c),
            Vec3::new(1.0, 2.0, 3.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_unparented_node_world_equals_local() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(translation(5.0, 0.0, 0.0));
        assert_relative_eq!(graph.world_matrix(node), graph.local_matrix(node));
    }

    #[test]
    fn test_reparent_preserves_local_changes_world() {
        let mut graph = SceneGraph::new();
        let old_parent = graph.insert(translation(10.0, 0.0, 0.0));
        let new_parent = graph.insert(translation(0.0, 10.0, 0.0));
        let child = graph.insert(translation(1.0, 1.0, 1.0));
        let grandchild = graph.insert(translation(0.5, 0.0, 0.0));
        graph.attach_child(graph.root(), old_parent).unwrap();
        graph.attach_child(graph.root(), new_parent).unwrap();
        graph.attach_child(old_parent, child).unwrap();
        graph.attach_child(child, grandchild).unwrap();

        let local_before = graph.transform(grandchild).unwrap().clone();

        graph.attach_child(new_parent, child).unwrap();

        // Attach moved the child off its old parent as a side effect.
        assert_eq!(graph.parent_of(child), Some(new_parent));
        assert!(!graph.children_of(old_parent).contains(&child));

        // Descendant locals are untouched; world matrices track the new chain.
        assert_eq!(graph.transform(grandchild).unwrap(), &local_before);
        assert_relative_eq!(
            graph.world_position(grandchild),
            Vec3::new(1.5, 11.0, 1.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_detach_child_is_idempotent() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(Transform::default());
        let child = graph.insert(Transform::default());
        graph.attach_child(graph.root(), parent).unwrap();
        graph.attach_child(parent, child).unwrap();

        graph.detach_child(parent, child);
        assert_eq!(graph.parent_of(child), None);

        // Double detach: no effect, no panic.
        graph.detach_child(parent, child);
        assert_eq!(graph.parent_of(child), None);

        // Detaching a pair that was never attached is also a no-op.
        let stranger = graph.insert(Transform::default());
        graph.detach_child(parent, stranger);
        assert_eq!(graph.parent_of(stranger), None);
    }

    #[test]
    fn test_detach_from_wrong_parent_ignored() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(Transform::default());
        let b = graph.insert(Transform::default());
        let child = graph.insert(Transform::default());
        graph.attach_child(graph.root(), a).unwrap();
        graph.attach_child(graph.root(), b).unwrap();
        graph.attach_child(a, child).unwrap();

        graph.detach_child(b, child);
        assert_eq!(graph.parent_of(child), Some(a));
        assert!(graph.children_of(a).contains(&child));
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.insert(Transform::default());
        let b = graph.insert(Transform::default());
        graph.attach_child(graph.root(), a).unwrap();
        graph.attach_child(a, b).unwrap();

        assert!(matches!(
            graph.attach_child(b, a),
            Err(SceneGraphError::WouldCycle)
        ));
        assert!(matches!(
            graph.attach_child(a, a),
            Err(SceneGraphError::WouldCycle)
        ));
        // Failed attaches leave the tree untouched.
        assert_eq!(graph.parent_of(a), Some(graph.root()));
        assert_eq!(graph.parent_of(b), Some(a));
    }

    #[test]
    fn test_remove_subtree_drops_descendants() {
        let mut graph = SceneGraph::new();
        let parent = graph.insert(Transform::default());
        let child = graph.insert(Transform::default());
        let grandchild = graph.insert(Transform::default());
        graph.attach_child(graph.root(), parent).unwrap();
        graph.attach_child(parent, child).unwrap();
        graph.attach_child(child, grandchild).unwrap();

        graph.remove_subtree(child);
        assert!(!graph.contains(child));
        assert!(!graph.contains(grandchild));
        assert!(graph.contains(parent));
        assert!(graph.children_of(parent).is_empty());
    }

    #[test]
    fn test_collect_drawables_skips_detached_subtrees() {
        let mut graph = SceneGraph::new();
        let handle = AssetHandle::new(slotmap::DefaultKey::default());

        let attached = graph.insert_with_payload(
            translation(2.0, 0.0, 0.0),
            NodePayload::Mesh(handle),
        );
        let detached = graph.insert_with_payload(Transform::default(), NodePayload::Mesh(handle));
        graph.attach_child(graph.root(), attached).unwrap();
        let _ = detached; // never attached

        let drawables = graph.collect_drawables();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].node, attached);
        assert_relative_eq!(
            math::extract_translation(&drawables[0].world),
            Vec3::new(2.0, 0.0, 0.0)
        );
    }
}
