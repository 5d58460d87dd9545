//! Asset libraries
//!
//! Name-keyed stores for textures, meshes and materials, registered as
//! world resources. Lookups hand out opaque `{id, name}` handles; only
//! renderer-stage systems resolve them back to data.

use std::collections::HashMap;
use tracing::warn;

/// Opaque handle into one asset library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    pub id: u32,
    pub name: String,
}

/// Dense asset store with a name index. Duplicate names warn and return
/// the existing handle instead of shadowing the original.
pub struct AssetLibrary<A> {
    entries: Vec<(String, A)>,
    by_name: HashMap<String, u32>,
}

impl<A> AssetLibrary<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, asset: A) -> AssetHandle {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            warn!("asset {name} already registered");
            return AssetHandle { id, name };
        }
        let id = self.entries.len() as u32;
        self.by_name.insert(name.clone(), id);
        self.entries.push((name.clone(), asset));
        AssetHandle { id, name }
    }

    pub fn get(&self, handle: &AssetHandle) -> Option<&A> {
        self.entries.get(handle.id as usize).map(|(_, asset)| asset)
    }

    pub fn handle(&self, name: &str) -> Option<AssetHandle> {
        self.by_name.get(name).map(|&id| AssetHandle {
            id,
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> Default for AssetLibrary<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    pub texture: Option<AssetHandle>,
}

pub type TextureLibrary = AssetLibrary<Texture>;
pub type MeshLibrary = AssetLibrary<Mesh>;
pub type MaterialLibrary = AssetLibrary<Material>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_dense_and_resolvable() {
        let mut textures = TextureLibrary::new();
        let white = textures.insert("white", Texture { width: 1, height: 1 });
        let noise = textures.insert("noise", Texture { width: 64, height: 64 });
        assert_eq!(white.id, 0);
        assert_eq!(noise.id, 1);
        assert_eq!(textures.get(&noise).unwrap().width, 64);
        assert_eq!(textures.handle("white"), Some(white));
    }

    #[test]
    fn duplicate_names_return_the_original_handle() {
        let mut meshes = MeshLibrary::new();
        let quad = meshes.insert("quad", Mesh { vertex_count: 4, index_count: 6 });
        let again = meshes.insert("quad", Mesh { vertex_count: 99, index_count: 99 });
        assert_eq!(quad, again);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes.get(&quad).unwrap().vertex_count, 4);
    }

    #[test]
    fn unknown_lookups_are_none() {
        let materials = MaterialLibrary::new();
        assert!(materials.handle("missing").is_none());
    }
}
