use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to read or parse a scene document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read scene file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("element name is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("element <{0}> is never closed")]
    UnclosedElement(String),
}

/// An object node that does not match the fixed object schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing element <{path}>")]
    MissingElement { path: String },
    #[error("element <{path}> has no text")]
    EmptyText { path: String },
    #[error("element <{path}> holds {text:?}, expected a finite number")]
    InvalidNumber { path: String, text: String },
}

/// Failure of an import pass over a loaded document.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("document has no top-level <{name}> element")]
    MissingScene { name: String },
    #[error("document has {count} top-level <{name}> elements, expected one")]
    AmbiguousScene { name: String, count: usize },
    #[error("object {index} (<{element}>) is invalid: {source}")]
    Schema {
        index: usize,
        element: String,
        #[source]
        source: SchemaError,
    },
}

/// Failure to turn an imported record into scene content.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("mesh resource {link:?} not found")]
    MeshNotFound { link: String },
    #[error("texture resource {link:?} not found")]
    TextureNotFound { link: String },
    #[error("failed to materialize object {index} (node {node_name:?}): {source}")]
    Object {
        index: usize,
        node_name: String,
        #[source]
        source: Box<MaterializeError>,
    },
}
