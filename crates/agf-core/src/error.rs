use crate::adventure::SceneId;

/// Alias for `Result<T, AgfError>`.
pub type AgfResult<T> = Result<T, AgfError>;

/// Errors that can occur when constructing an adventure graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgfError {
    /// The adventure declares no scenes at all.
    #[error("adventure has no scenes")]
    Empty,

    /// The adventure title is empty or whitespace.
    #[error("adventure title must not be empty")]
    EmptyTitle,

    /// Two scenes share the same id.
    #[error("duplicate scene id: \"{0}\"")]
    DuplicateScene(SceneId),

    /// The designated start scene is not among the declared scenes.
    #[error("start scene not declared: \"{0}\"")]
    UnknownStart(SceneId),

    /// A scene has no narrative text.
    #[error("scene \"{0}\" has no narrative text")]
    EmptyNarrative(SceneId),

    /// A choice points at a scene id that does not exist.
    #[error("choice \"{label}\" in scene \"{scene}\" targets undeclared scene \"{target}\"")]
    UnknownTarget {
        /// The scene containing the offending choice.
        scene: SceneId,
        /// The choice's display label.
        label: String,
        /// The unresolved target id.
        target: SceneId,
    },

    /// A scene carries both choices and an ending tag.
    #[error("scene \"{0}\" mixes choices with an ending")]
    ChoicesWithEnding(SceneId),

    /// A scene has neither choices nor an ending tag.
    #[error("scene \"{0}\" has neither choices nor an ending")]
    DeadEnd(SceneId),
}
