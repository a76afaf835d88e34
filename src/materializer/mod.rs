//! Turning imported object records into scene content.
//!
//! The importer never loads resources itself. A [`SceneMaterializer`] resolves
//! the mesh and texture links of each record and creates the node;
//! [`materialize`] drives it over a record list in order.

pub mod resources;

use crate::error::MaterializeError;
use crate::importer::ObjectRecord;
use crate::scene_graph::{euler_degrees_to_quat, Object3D, ObjectId, Scene};

use resources::{MeshId, ResourceRegistry, TextureId};

pub const IMPORTED_SCENE_NAME: &str = "Imported Scene";
pub const ROOT_OBJECT_NAME: &str = "Scene Root Object";

/// Host-side capability used to build live scene content from records.
pub trait SceneMaterializer {
    type Mesh: Copy;
    type Texture: Copy;
    type Node;

    fn resolve_mesh(&mut self, name: &str, link: &str) -> Result<Self::Mesh, MaterializeError>;

    fn resolve_texture(&mut self, name: &str, link: &str)
        -> Result<Self::Texture, MaterializeError>;

    fn create_node(
        &mut self,
        record: &ObjectRecord,
        mesh: Self::Mesh,
        texture: Self::Texture,
    ) -> Result<Self::Node, MaterializeError>;
}

/// Materializes `records` in order and returns the created nodes. The first
/// failure stops the pass.
pub fn materialize<M: SceneMaterializer>(
    records: &[ObjectRecord],
    materializer: &mut M,
) -> Result<Vec<M::Node>, MaterializeError> {
    log::debug!("Number of imported objects = {}", records.len());

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            materialize_one(materializer, record).map_err(|source| MaterializeError::Object {
                index,
                node_name: record.node_name.clone(),
                source: Box::new(source),
            })
        })
        .collect()
}

fn materialize_one<M: SceneMaterializer>(
    materializer: &mut M,
    record: &ObjectRecord,
) -> Result<M::Node, MaterializeError> {
    let mesh = materializer.resolve_mesh(&record.mesh_name, &record.mesh_link)?;
    let texture = materializer.resolve_texture(&record.texture_name, &record.texture_link)?;
    materializer.create_node(record, mesh, texture)
}

/// Builds an in-memory [`Scene`]: every record becomes a static occluder
/// parented to a single root object.
pub struct SceneGraphMaterializer {
    scene: Scene,
    resources: ResourceRegistry,
    root: ObjectId,
}

impl SceneGraphMaterializer {
    pub fn new(resources: ResourceRegistry) -> Self {
        let mut scene = Scene::new(IMPORTED_SCENE_NAME);
        let root = scene.add_object(Object3D::named(ROOT_OBJECT_NAME));

        Self {
            scene,
            resources,
            root,
        }
    }

    pub fn finish(self, nodes: Vec<ObjectId>) -> ImportedScene {
        self.scene.update_transforms();

        ImportedScene {
            scene: self.scene,
            resources: self.resources,
            root: self.root,
            nodes,
        }
    }
}

impl SceneMaterializer for SceneGraphMaterializer {
    type Mesh = MeshId;
    type Texture = TextureId;
    type Node = ObjectId;

    fn resolve_mesh(&mut self, name: &str, link: &str) -> Result<MeshId, MaterializeError> {
        self.resources.resolve_mesh(name, link)
    }

    fn resolve_texture(&mut self, name: &str, link: &str) -> Result<TextureId, MaterializeError> {
        self.resources.resolve_texture(name, link)
    }

    fn create_node(
        &mut self,
        record: &ObjectRecord,
        mesh: MeshId,
        texture: TextureId,
    ) -> Result<ObjectId, MaterializeError> {
        let mut object = Object3D::named(record.mesh_name.clone());
        object.node_name = Some(record.node_name.clone());
        object.mesh_id = Some(mesh);
        object.texture_id = Some(texture);
        object.static_occluder = true;
        object.transform.set_transform(
            record.transform.position,
            euler_degrees_to_quat(record.transform.rotation),
            record.transform.scale,
        );

        let object_id = self.scene.add_object(object);
        self.scene.set_object_parent(object_id, Some(self.root));

        Ok(object_id)
    }
}

/// Result of [`retrieve`]: the scene, its resources and the created nodes in
/// record order.
pub struct ImportedScene {
    pub scene: Scene,
    pub resources: ResourceRegistry,
    pub root: ObjectId,
    pub nodes: Vec<ObjectId>,
}

/// Materializes `records` into a fresh scene graph with world transforms
/// already computed.
pub fn retrieve(
    records: &[ObjectRecord],
    resources: ResourceRegistry,
) -> Result<ImportedScene, MaterializeError> {
    let mut materializer = SceneGraphMaterializer::new(resources);
    let nodes = materialize(records, &mut materializer)?;
    Ok(materializer.finish(nodes))
}
