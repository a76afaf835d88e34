use std::io::Write;

use glam::Vec3;
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::config::ImporterConfig;
use crate::importer::object_record::{
    ObjectRecord, AXES, LABEL_NAME, LABEL_PATH, MESH_ELEMENT, NODE_ELEMENT, POSITION_ELEMENT,
    ROTATION_ELEMENT, SCALE_ELEMENT, TEXTURE_ELEMENT,
};

/// Serializes records as a scene document that [`SceneImporter`] reads back
/// unchanged. Objects are numbered by their position in `records`.
///
/// [`SceneImporter`]: crate::importer::SceneImporter
pub fn write_scene(records: &[ObjectRecord], config: &ImporterConfig) -> anyhow::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(config.scene_element.as_str())))?;

    for (index, record) in records.iter().enumerate() {
        let object_element = config.object_element_name(index);
        writer.write_event(Event::Start(BytesStart::new(object_element.as_str())))?;

        write_labelled(&mut writer, MESH_ELEMENT, &record.mesh_name, &record.mesh_link)?;
        write_labelled(
            &mut writer,
            TEXTURE_ELEMENT,
            &record.texture_name,
            &record.texture_link,
        )?;
        write_text_element(&mut writer, NODE_ELEMENT, &record.node_name)?;
        write_vec3(&mut writer, POSITION_ELEMENT, record.transform.position)?;
        write_vec3(&mut writer, ROTATION_ELEMENT, record.transform.rotation)?;
        write_vec3(&mut writer, SCALE_ELEMENT, record.transform.scale)?;

        writer.write_event(Event::End(BytesEnd::new(object_element.as_str())))?;
    }

    writer.write_event(Event::End(BytesEnd::new(config.scene_element.as_str())))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_labelled<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    name: &str,
    path: &str,
) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    write_text_element(writer, LABEL_NAME, name)?;
    write_text_element(writer, LABEL_PATH, path)?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_vec3<W: Write>(writer: &mut Writer<W>, tag: &str, value: Vec3) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    for (axis, component) in AXES.iter().zip(value.to_array()) {
        // `Display` for f32 is the shortest string that parses back exactly.
        write_text_element(writer, axis, &component.to_string())?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::{SceneImporter, SimpleTransform};

    fn record(node_name: &str) -> ObjectRecord {
        ObjectRecord {
            mesh_name: "Lamp <post>".to_string(),
            mesh_link: "meshes/street & lamp".to_string(),
            texture_name: "Iron".to_string(),
            texture_link: "tex/iron".to_string(),
            node_name: node_name.to_string(),
            transform: SimpleTransform::new(
                Vec3::new(0.1, -2.75, 1e-7),
                Vec3::new(12.5, 359.9, -45.0),
                Vec3::new(1.0, 0.333_333_34, 3.0),
            ),
        }
    }

    #[test]
    fn written_scene_reads_back_field_for_field() {
        let records = vec![record("A"), record("B"), record("C")];
        let config = ImporterConfig::default();

        let xml = write_scene(&records, &config).unwrap();
        let importer = SceneImporter::from_xml(&xml, config).unwrap();

        assert_eq!(importer.imported_objects(), records.as_slice());
    }

    #[test]
    fn uses_configured_element_names() {
        let config = ImporterConfig {
            scene_element: "level".to_string(),
            object_prefix: "prop".to_string(),
            ..Default::default()
        };

        let xml = write_scene(&[record("A")], &config).unwrap();
        assert!(xml.contains("<level>"));
        assert!(xml.contains("<prop0>"));
        assert!(!xml.contains("<object0>"));
    }

    #[test]
    fn empty_scene_is_still_a_scene() {
        let config = ImporterConfig::default();
        let xml = write_scene(&[], &config).unwrap();
        let importer = SceneImporter::from_xml(&xml, config).unwrap();
        assert!(importer.imported_objects().is_empty());
        assert!(importer.load_error().is_none());
    }
}
