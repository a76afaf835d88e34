use glam::Vec3;

use crate::error::SchemaError;
use crate::importer::document::Element;

pub const MESH_ELEMENT: &str = "mesh";
pub const TEXTURE_ELEMENT: &str = "texture";
pub const LABEL_NAME: &str = "name";
pub const LABEL_PATH: &str = "path";
pub const NODE_ELEMENT: &str = "node";
pub const POSITION_ELEMENT: &str = "position";
pub const ROTATION_ELEMENT: &str = "rotation";
pub const SCALE_ELEMENT: &str = "scale";
pub const AXES: [&str; 3] = ["x", "y", "z"];

/// Position, Euler rotation in degrees and scale of an imported object.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimpleTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl SimpleTransform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// One `<objectN>` entry of a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    pub mesh_name: String,
    /// Resolved by the materializer, never by the importer.
    pub mesh_link: String,
    pub texture_name: String,
    pub texture_link: String,
    pub node_name: String,
    pub transform: SimpleTransform,
}

impl ObjectRecord {
    /// Decodes an object node. Fields are read in schema order and the first
    /// missing element or bad number fails the whole object.
    pub fn decode(node: &Element) -> Result<Self, SchemaError> {
        Ok(Self {
            mesh_name: read_text(node, &[MESH_ELEMENT, LABEL_NAME])?,
            mesh_link: read_text(node, &[MESH_ELEMENT, LABEL_PATH])?,
            texture_name: read_text(node, &[TEXTURE_ELEMENT, LABEL_NAME])?,
            texture_link: read_text(node, &[TEXTURE_ELEMENT, LABEL_PATH])?,
            node_name: read_text(node, &[NODE_ELEMENT])?,
            transform: SimpleTransform {
                position: read_vec3(node, POSITION_ELEMENT)?,
                rotation: read_vec3(node, ROTATION_ELEMENT)?,
                scale: read_vec3(node, SCALE_ELEMENT)?,
            },
        })
    }
}

fn lookup<'a>(node: &'a Element, path: &[&str]) -> Result<&'a Element, SchemaError> {
    let mut current = node;
    for (depth, tag) in path.iter().enumerate() {
        current = current
            .first_child(tag)
            .ok_or_else(|| SchemaError::MissingElement {
                path: path[..=depth].join("/"),
            })?;
    }
    Ok(current)
}

fn read_text(node: &Element, path: &[&str]) -> Result<String, SchemaError> {
    let element = lookup(node, path)?;
    let text = element.inner_text();
    let text = text.trim();
    if text.is_empty() {
        return Err(SchemaError::EmptyText {
            path: path.join("/"),
        });
    }
    Ok(text.to_string())
}

fn read_float(node: &Element, path: &[&str]) -> Result<f32, SchemaError> {
    let element = lookup(node, path)?;
    let text = element.inner_text();
    let text = text.trim();
    text.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| SchemaError::InvalidNumber {
            path: path.join("/"),
            text: text.to_string(),
        })
}

fn read_vec3(node: &Element, element: &str) -> Result<Vec3, SchemaError> {
    let [x, y, z] = AXES;
    Ok(Vec3::new(
        read_float(node, &[element, x])?,
        read_float(node, &[element, y])?,
        read_float(node, &[element, z])?,
    ))
}
