//! Static mesh asset

use super::{Asset, AssetError};
use serde::{Deserialize, Serialize};

/// Triangle mesh data resolved by name through the asset manager
///
/// Stored on disk as RON; binary container formats are the content
/// pipeline's concern, not the runtime's.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticMesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,

    /// Vertex normals, parallel to `positions`
    pub normals: Vec<[f32; 3]>,

    /// Triangle indices
    pub indices: Vec<u32>,
}

impl StaticMesh {
    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Asset for StaticMesh {
    fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| AssetError::LoadFailed(e.to_string()))?;
        ron::from_str(text).map_err(|e| AssetError::LoadFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_parses_ron() {
        let text = r#"(
            positions: [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)],
            normals: [(0.0, 0.0, 1.0), (0.0, 0.0, 1.0), (0.0, 0.0, 1.0)],
            indices: [0, 1, 2],
        )"#;
        let mesh = StaticMesh::from_bytes(text.as_bytes()).expect("valid mesh");
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(StaticMesh::from_bytes(b"not a mesh").is_err());
    }
}
