/// How the top-level scene element is picked when the document has several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneSelection {
    /// Exactly one scene element must exist.
    Strict,
    /// Legacy files: the last scene element in document order is used.
    LastWins,
}

/// What an import pass does when one object fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailurePolicy {
    /// Fail the whole pass and keep no objects.
    Abort,
    /// Log the object and continue with the next index.
    Skip,
}

#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub scene_element: String,
    /// Objects are looked up as `<prefix><index>`, e.g. `object0`.
    pub object_prefix: String,
    pub scene_selection: SceneSelection,
    pub decode_failure: DecodeFailurePolicy,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            scene_element: "scene".to_string(),
            object_prefix: "object".to_string(),
            scene_selection: SceneSelection::Strict,
            decode_failure: DecodeFailurePolicy::Abort,
        }
    }
}

impl ImporterConfig {
    pub fn object_element_name(&self, index: usize) -> String {
        format!("{}{}", self.object_prefix, index)
    }
}
