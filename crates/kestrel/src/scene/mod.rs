//! Scene management system
//!
//! An arena-backed transform hierarchy. Gameplay code owns nodes through
//! scene components; the renderer walks the tree read-only once per frame to
//! extract drawables and their world matrices.

mod graph;

pub use graph::{
    DrawableInstance, NodeKey, NodePayload, Projection, SceneGraph, SceneGraphError, SceneNode,
};
