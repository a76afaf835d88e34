use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;

use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub name: String,
    pub objects: Arena<Object3D>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn get_object_by_node_name(&self, node_name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.node_name.as_deref() == Some(node_name))
            .map(|(id, _)| id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Updates all world transforms, parents before children.
    pub fn update_transforms(&self) {
        let root_objects = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY, false);
        }
    }

    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_changed: bool,
    ) {
        if let Some(object) = self.objects.get(object_id) {
            let local_matrix = *object.transform.get_local_matrix();
            let changed = parent_changed || object.transform.is_world_dirty();
            if changed {
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix, changed);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_transform(
        &mut self,
        object_id: ObjectId,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_transform(translation, rotation, scale);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenting_updates_both_sides() {
        let mut scene = Scene::new("test");
        let a = scene.add_object(Object3D::named("a"));
        let b = scene.add_object(Object3D::named("b"));
        let child = scene.add_object(Object3D::named("child"));

        scene.set_object_parent(child, Some(a));
        assert_eq!(scene.get_object(a).unwrap().child_ids, vec![child]);

        scene.set_object_parent(child, Some(b));
        assert!(scene.get_object(a).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(b).unwrap().child_ids, vec![child]);
        assert_eq!(
            scene
                .get_object(child)
                .unwrap()
                .parent(&scene)
                .map(|p| p.name.as_str()),
            Some("b")
        );
    }

    #[test]
    fn world_transform_composes_parent_and_child() {
        let mut scene = Scene::new("test");
        let parent = scene.add_object(Object3D::named("parent"));
        let child = scene.add_object(Object3D::named("child"));
        scene.set_object_parent(child, Some(parent));

        scene.set_object_transform(parent, Vec3::X, Quat::IDENTITY, Vec3::splat(2.0));
        scene.set_object_transform(child, Vec3::Y, Quat::IDENTITY, Vec3::ONE);
        scene.update_transforms();

        let world = *scene.get_object_transform(child).unwrap().get_world_matrix();
        assert!(world
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));

        // Moving only the parent still moves the child.
        scene.set_object_transform(parent, Vec3::Z, Quat::IDENTITY, Vec3::ONE);
        scene.update_transforms();
        let world = *scene.get_object_transform(child).unwrap().get_world_matrix();
        assert!(world
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 1.0, 1.0), 1e-6));
    }

    #[test]
    fn lookup_by_node_name() {
        let mut scene = Scene::new("test");
        let mut object = Object3D::named("Cube");
        object.node_name = Some("Root".to_string());
        let id = scene.add_object(object);

        assert_eq!(scene.get_object_by_node_name("Root"), Some(id));
        assert_eq!(scene.get_object_by_name("Cube"), Some(id));
        assert_eq!(scene.get_object_by_node_name("Cube"), None);
    }
}
