//! Imports XML scene descriptions into a flat list of object records and
//! materializes them into an in-memory scene graph.
//!
//! The importer only reads and validates the document. Turning records into
//! live scene content goes through [`materializer::SceneMaterializer`], which
//! hosts implement; [`materializer::SceneGraphMaterializer`] is the built-in one.

pub mod config;
pub mod error;
pub mod importer;
pub mod materializer;
pub mod scene_graph;

pub use config::{DecodeFailurePolicy, ImporterConfig, SceneSelection};
pub use error::{ImportError, LoadError, MaterializeError, SchemaError};
pub use importer::{ObjectRecord, SceneDocument, SceneImporter, SimpleTransform};
