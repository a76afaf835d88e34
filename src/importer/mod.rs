pub mod document;
pub mod object_record;
pub mod writer;

use std::path::Path;

use itertools::Itertools;

use crate::config::{DecodeFailurePolicy, ImporterConfig, SceneSelection};
use crate::error::{ImportError, LoadError};

pub use document::{first_child, Element, SceneDocument};
pub use object_record::{ObjectRecord, SimpleTransform};
pub use writer::write_scene;

/// Owns a loaded scene document and the objects imported from it.
///
/// A document that fails to load is not fatal: the error is kept in
/// [`SceneImporter::load_error`] and the importer holds no objects.
#[derive(Debug)]
pub struct SceneImporter {
    config: ImporterConfig,
    document: SceneDocument,
    load_error: Option<LoadError>,
    imported_objects: Vec<ObjectRecord>,
}

impl SceneImporter {
    pub fn open(path: impl AsRef<Path>, config: ImporterConfig) -> Result<Self, ImportError> {
        let path = path.as_ref();
        log::debug!("Scene path = {}", path.display());
        Self::from_load_result(SceneDocument::load(path), config)
    }

    pub fn from_xml(text: &str, config: ImporterConfig) -> Result<Self, ImportError> {
        Self::from_load_result(SceneDocument::parse(text), config)
    }

    fn from_load_result(
        document: Result<SceneDocument, LoadError>,
        config: ImporterConfig,
    ) -> Result<Self, ImportError> {
        let mut importer = Self {
            config,
            document: SceneDocument::default(),
            load_error: None,
            imported_objects: Vec::new(),
        };

        match document {
            Ok(document) => {
                importer.document = document;
                importer.import()?;
            }
            Err(err) => {
                log::error!("Scene importer failed to load document: {err}");
                importer.load_error = Some(err);
            }
        }

        Ok(importer)
    }

    /// Clears the imported objects and rebuilds them from the document.
    ///
    /// On error the object list is left empty.
    pub fn import(&mut self) -> Result<usize, ImportError> {
        self.imported_objects.clear();

        if self.load_error.is_some() {
            return Ok(0);
        }

        let scene = select_scene(&self.document, &self.config)?;
        let objects = enumerate(scene, &self.config)?;

        log::debug!(
            "Imported {} objects: [{}]",
            objects.len(),
            objects.iter().map(|object| &object.node_name).join(", ")
        );

        self.imported_objects = objects;
        Ok(self.imported_objects.len())
    }

    pub fn imported_objects(&self) -> &[ObjectRecord] {
        &self.imported_objects
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn document(&self) -> &SceneDocument {
        &self.document
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }
}

/// Picks the top-level scene element according to `config.scene_selection`.
pub fn select_scene<'a>(
    document: &'a SceneDocument,
    config: &ImporterConfig,
) -> Result<&'a Element, ImportError> {
    let scenes = document.top_level(&config.scene_element);

    match (config.scene_selection, scenes.as_slice()) {
        (_, []) => Err(ImportError::MissingScene {
            name: config.scene_element.clone(),
        }),
        (_, [scene]) => Ok(*scene),
        (SceneSelection::Strict, _) => Err(ImportError::AmbiguousScene {
            name: config.scene_element.clone(),
            count: scenes.len(),
        }),
        (SceneSelection::LastWins, [.., last]) => {
            log::warn!(
                "Found {} <{}> elements, using the last one",
                scenes.len(),
                config.scene_element
            );
            Ok(*last)
        }
    }
}

/// Decodes `object0`, `object1`, ... under `scene` until the first index
/// with no matching child. Anything after a gap is never read.
pub fn enumerate(
    scene: &Element,
    config: &ImporterConfig,
) -> Result<Vec<ObjectRecord>, ImportError> {
    let mut objects = Vec::new();

    for index in 0usize.. {
        let element = config.object_element_name(index);
        let Some(node) = scene.first_child(&element) else {
            log::trace!("No <{element}> under <{}>, stopping", scene.name());
            break;
        };

        match ObjectRecord::decode(node) {
            Ok(record) => objects.push(record),
            Err(source) => match config.decode_failure {
                DecodeFailurePolicy::Abort => {
                    return Err(ImportError::Schema {
                        index,
                        element,
                        source,
                    });
                }
                DecodeFailurePolicy::Skip => {
                    log::warn!("Skipping <{element}>: {source}");
                }
            },
        }
    }

    Ok(objects)
}
