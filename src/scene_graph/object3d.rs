use crate::materializer::resources::{MeshId, TextureId};
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;
use id_arena::Id;

pub type ObjectId = Id<Object3D>;

#[derive(Debug, Default)]
pub struct Object3D {
    pub name: String,
    /// Identifier from the scene file, distinct from the display name.
    pub node_name: Option<String>,
    pub transform: Transform,
    pub mesh_id: Option<MeshId>,
    pub texture_id: Option<TextureId>,
    pub static_occluder: bool,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a Object3D> {
        self.parent_id.and_then(|id| scene.get_object(id))
    }

    pub fn children<'a, 'b>(&'a self, scene: &'b Scene) -> impl Iterator<Item = &'b Object3D> + 'b
    where
        'a: 'b,
    {
        self.child_ids
            .iter()
            .filter_map(move |id| scene.get_object(*id))
    }
}
