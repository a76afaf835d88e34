use std::{borrow::Cow, fs, path::Path};

use quick_xml::{events::Event, Reader};

use crate::error::LoadError;

/// Content of an element: a child element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its children and text, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    nodes: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct child elements, in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn first_child(&self, name: &str) -> Option<&Element> {
        first_child(Some(self), name)
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn inner_text(&self) -> Cow<'_, str> {
        match self.nodes.as_slice() {
            [] => Cow::Borrowed(""),
            [Node::Text(text)] => Cow::Borrowed(text.as_str()),
            _ => {
                let mut text = String::new();
                self.collect_text(&mut text);
                Cow::Owned(text)
            }
        }
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                Node::Element(element) => element.collect_text(out),
                Node::Text(text) => out.push_str(text),
            }
        }
    }

    pub fn push_element(&mut self, element: Element) {
        self.nodes.push(Node::Element(element));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.nodes.push(Node::Text(text.into()));
    }
}

/// Returns the first direct child of `parent` named `name`.
///
/// Only direct children are searched. A missing parent yields `None`, so
/// lookups can be chained without checking every step.
pub fn first_child<'a>(parent: Option<&'a Element>, name: &str) -> Option<&'a Element> {
    parent?.children().find(|child| child.name == name)
}

/// A parsed scene file: the top-level elements in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDocument {
    elements: Vec<Element>,
}

impl SceneDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut elements = Vec::new();

        loop {
            let event = reader.read_event().map_err(|source| LoadError::Xml {
                position: reader.buffer_position() as u64,
                source,
            })?;

            match event {
                Event::Start(start) => {
                    let name = start.name();
                    open.push(Element::new(std::str::from_utf8(name.as_ref())?));
                }
                Event::Empty(start) => {
                    let name = start.name();
                    let element = Element::new(std::str::from_utf8(name.as_ref())?);
                    attach(&mut open, &mut elements, element);
                }
                Event::End(_) => {
                    // Mismatched end tags are rejected by the reader itself.
                    if let Some(element) = open.pop() {
                        attach(&mut open, &mut elements, element);
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|source| LoadError::Xml {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    match open.last_mut() {
                        Some(parent) => parent.push_text(text),
                        None => log::trace!("Ignoring text outside of any element"),
                    }
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data)?;
                    if let Some(parent) = open.last_mut() {
                        parent.push_text(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.pop() {
            return Err(LoadError::UnclosedElement(unclosed.name));
        }

        Ok(Self { elements })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Top-level elements named `name`, in document order.
    pub fn top_level(&self, name: &str) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|element| element.name == name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn attach(open: &mut [Element], elements: &mut Vec<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.push_element(element),
        None => elements.push(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_child_only_searches_direct_children() {
        let document =
            SceneDocument::parse("<scene><a><b>deep</b></a><b>shallow</b></scene>").unwrap();
        let scene = &document.elements()[0];

        let b = scene.first_child("b").unwrap();
        assert_eq!(b.inner_text(), "shallow");
        assert!(scene.first_child("missing").is_none());
    }

    #[test]
    fn first_child_returns_first_match() {
        let document = SceneDocument::parse("<r><n>1</n><n>2</n></r>").unwrap();
        let root = &document.elements()[0];
        assert_eq!(root.first_child("n").unwrap().inner_text(), "1");
    }

    #[test]
    fn first_child_of_absent_parent_is_none() {
        assert!(first_child(None, "scene").is_none());

        let document = SceneDocument::parse("<scene/>").unwrap();
        let missing = first_child(Some(&document.elements()[0]), "mesh");
        assert!(first_child(missing, "name").is_none());
    }

    #[test]
    fn inner_text_concatenates_descendants() {
        let document =
            SceneDocument::parse("<a>one<b>two</b><![CDATA[<three>]]></a>").unwrap();
        assert_eq!(document.elements()[0].inner_text(), "onetwo<three>");
    }

    #[test]
    fn text_is_unescaped_and_trimmed() {
        let document = SceneDocument::parse("<a>\n   Bricks &amp; Mortar  \n</a>").unwrap();
        assert_eq!(document.elements()[0].inner_text(), "Bricks & Mortar");
    }

    #[test]
    fn declaration_and_comments_are_skipped() {
        let document = SceneDocument::parse(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!-- exported --><scene><object0/></scene>",
        )
        .unwrap();
        assert_eq!(document.elements().len(), 1);
        assert!(document.elements()[0].first_child("object0").is_some());
    }

    #[test]
    fn multiple_top_level_elements_are_kept_in_order() {
        let document = SceneDocument::parse("<scene><a/></scene><scene><b/></scene>").unwrap();
        let scenes = document.top_level("scene");
        assert_eq!(scenes.len(), 2);
        assert!(scenes[1].first_child("b").is_some());
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        let err = SceneDocument::parse("<scene><object0></scene>").unwrap_err();
        assert!(matches!(err, LoadError::Xml { .. }), "{err:?}");
    }

    #[test]
    fn unclosed_element_is_an_error() {
        let err = SceneDocument::parse("<scene><object0>").unwrap_err();
        assert!(matches!(err, LoadError::UnclosedElement(ref name) if name == "object0"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneDocument::load("does/not/exist.xml").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
