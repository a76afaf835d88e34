use std::{
    collections::HashMap,
    fs,
    path::{Component, Path, PathBuf},
};

use id_arena::{Arena, Id};
use itertools::Itertools;

use crate::error::MaterializeError;

#[derive(Debug, Clone, PartialEq)]
pub struct MeshResource {
    pub name: String,
    pub link: String,
    /// File backing the link, when an asset root is configured.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureResource {
    pub name: String,
    pub link: String,
    pub path: Option<PathBuf>,
}

pub type MeshId = Id<MeshResource>;
pub type TextureId = Id<TextureResource>;

/// Arena of resources keyed by the link they were resolved from.
pub struct ResourceTable<T> {
    entries: Arena<T>,
    by_link: HashMap<String, Id<T>>,
}

impl<T> ResourceTable<T> {
    fn new() -> Self {
        Self {
            entries: Arena::new(),
            by_link: HashMap::new(),
        }
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn find(&self, link: &str) -> Option<Id<T>> {
        self.by_link.get(link).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.entries.iter()
    }

    fn insert(&mut self, link: &str, resource: T) -> Id<T> {
        let id = self.entries.alloc(resource);
        self.by_link.insert(link.to_string(), id);
        id
    }
}

/// Resolves mesh and texture links to resources, one resource per link.
///
/// Links are looked up below `asset_root` the way the scene files expect:
/// either the exact relative path or the same path with any extension, so
/// `meshes/cube` matches `meshes/cube.obj`. Without an asset root every link
/// resolves and no file is attached.
pub struct ResourceRegistry {
    asset_root: Option<PathBuf>,
    meshes: ResourceTable<MeshResource>,
    textures: ResourceTable<TextureResource>,
}

impl ResourceRegistry {
    pub fn new(asset_root: Option<PathBuf>) -> Self {
        Self {
            asset_root,
            meshes: ResourceTable::new(),
            textures: ResourceTable::new(),
        }
    }

    pub fn meshes(&self) -> &ResourceTable<MeshResource> {
        &self.meshes
    }

    pub fn textures(&self) -> &ResourceTable<TextureResource> {
        &self.textures
    }

    pub fn resolve_mesh(&mut self, name: &str, link: &str) -> Result<MeshId, MaterializeError> {
        if let Some(id) = self.meshes.find(link) {
            return Ok(id);
        }

        let path = self
            .locate(link)
            .ok_or_else(|| MaterializeError::MeshNotFound {
                link: link.to_string(),
            })?;

        log::debug!("Registered mesh {name:?} from {link:?}");
        let mesh = MeshResource {
            name: name.to_string(),
            link: link.to_string(),
            path,
        };
        Ok(self.meshes.insert(link, mesh))
    }

    pub fn resolve_texture(
        &mut self,
        name: &str,
        link: &str,
    ) -> Result<TextureId, MaterializeError> {
        if let Some(id) = self.textures.find(link) {
            return Ok(id);
        }

        let path = self
            .locate(link)
            .ok_or_else(|| MaterializeError::TextureNotFound {
                link: link.to_string(),
            })?;

        log::debug!("Registered texture {name:?} from {link:?}");
        let texture = TextureResource {
            name: name.to_string(),
            link: link.to_string(),
            path,
        };
        Ok(self.textures.insert(link, texture))
    }

    /// `None` means the link does not resolve; `Some(None)` means it resolves
    /// without a backing file.
    fn locate(&self, link: &str) -> Option<Option<PathBuf>> {
        match &self.asset_root {
            Some(root) => find_asset(root, link).map(Some),
            None => Some(None),
        }
    }
}

fn find_asset(root: &Path, link: &str) -> Option<PathBuf> {
    let relative = Path::new(link);
    let inside_root = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
    if !inside_root {
        log::warn!("Link {link:?} points outside the asset root");
        return None;
    }

    let candidate = root.join(relative);
    if candidate.is_file() {
        return Some(candidate);
    }

    let stem = candidate.file_name()?.to_owned();
    let directory = candidate.parent()?;

    fs::read_dir(directory)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.file_stem() == Some(stem.as_os_str()))
        .sorted()
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "scene-importer-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("meshes")).unwrap();
        fs::create_dir_all(root.join("tex")).unwrap();
        root
    }

    #[test]
    fn links_are_deduplicated() {
        let mut registry = ResourceRegistry::new(None);

        let a = registry.resolve_mesh("Cube", "meshes/cube").unwrap();
        let b = registry.resolve_mesh("Other label", "meshes/cube").unwrap();
        let c = registry.resolve_mesh("Sphere", "meshes/sphere").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.meshes().len(), 2);
        assert_eq!(registry.meshes().get(a).unwrap().name, "Cube");

        let links: Vec<_> = registry
            .meshes()
            .iter()
            .map(|(_, mesh)| mesh.link.as_str())
            .collect();
        assert_eq!(links, ["meshes/cube", "meshes/sphere"]);
        assert!(registry.meshes().get(a).unwrap().path.is_none());
    }

    #[test]
    fn meshes_and_textures_are_separate() {
        let mut registry = ResourceRegistry::new(None);
        registry.resolve_mesh("a", "shared/link").unwrap();
        registry.resolve_texture("a", "shared/link").unwrap();

        assert_eq!(registry.meshes().len(), 1);
        assert_eq!(registry.textures().len(), 1);
    }

    #[test]
    fn links_resolve_with_or_without_extension() {
        let root = asset_root("extension");
        fs::write(root.join("meshes/cube.obj"), "").unwrap();
        fs::write(root.join("tex/brick"), "").unwrap();

        let mut registry = ResourceRegistry::new(Some(root.clone()));
        let mesh = registry.resolve_mesh("Cube", "meshes/cube").unwrap();
        let texture = registry.resolve_texture("Brick", "tex/brick").unwrap();

        assert_eq!(
            registry.meshes().get(mesh).unwrap().path.as_deref(),
            Some(root.join("meshes/cube.obj").as_path())
        );
        assert_eq!(
            registry.textures().get(texture).unwrap().path.as_deref(),
            Some(root.join("tex/brick").as_path())
        );

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn links_cannot_leave_the_asset_root() {
        let root = asset_root("escape");
        let outside = root.parent().unwrap().join(format!(
            "scene-importer-outside-{}.obj",
            std::process::id()
        ));
        fs::write(&outside, "").unwrap();
        let escaping = format!("../{}", outside.file_name().unwrap().to_str().unwrap());

        let mut registry = ResourceRegistry::new(Some(root.clone()));
        let err = registry.resolve_mesh("x", &escaping).unwrap_err();
        assert!(matches!(err, MaterializeError::MeshNotFound { .. }));

        let absolute = outside.to_str().unwrap().to_string();
        let err = registry.resolve_texture("x", &absolute).unwrap_err();
        assert!(matches!(err, MaterializeError::TextureNotFound { .. }));

        assert!(registry.meshes().is_empty());
        assert!(registry.textures().is_empty());

        fs::remove_file(outside).unwrap();
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn missing_asset_is_an_error() {
        let root = asset_root("missing");

        let mut registry = ResourceRegistry::new(Some(root.clone()));
        let err = registry.resolve_texture("Brick", "tex/brick").unwrap_err();
        assert!(matches!(err, MaterializeError::TextureNotFound { ref link } if link == "tex/brick"));
        assert!(registry.textures().is_empty());

        fs::remove_dir_all(root).unwrap();
    }
}
