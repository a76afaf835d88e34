use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Local transform of a scene object with a cached local matrix and the
/// world matrix last computed by [`Scene::update_transforms`].
///
/// [`Scene::update_transforms`]: crate::scene_graph::Scene::update_transforms
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

impl Transform {
    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn get_local_matrix(&self) -> Ref<'_, Mat4> {
        if self.local_dirty.get() {
            let matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
            self.invalidate_world();
        }

        self.local_matrix.borrow()
    }

    pub fn get_world_matrix(&self) -> Ref<'_, Mat4> {
        self.world_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.invalidate_local();
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

/// Converts Euler angles in degrees to a rotation that applies Z, then X,
/// then Y.
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        glam::EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_matrix_tracks_changes() {
        let mut transform = Transform::default();
        assert_eq!(*transform.get_local_matrix(), Mat4::IDENTITY);

        transform.set_translation(Vec3::new(1.0, 2.0, 3.0));
        let (scale, _, translation) = transform.get_local_matrix().to_scale_rotation_translation();
        assert_eq!(translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scale, Vec3::ONE);
        assert!(transform.is_world_dirty());
    }

    #[test]
    fn yaw_rotates_x_towards_negative_z() {
        let rotation = euler_degrees_to_quat(Vec3::new(0.0, 90.0, 0.0));
        assert!((rotation * Vec3::X).abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn euler_order_is_z_then_x_then_y() {
        let rotation = euler_degrees_to_quat(Vec3::new(90.0, 90.0, 0.0));
        // X first sends +Y to +Z, Y then sends +Z to +X.
        assert!((rotation * Vec3::Y).abs_diff_eq(Vec3::X, 1e-6));
    }
}
