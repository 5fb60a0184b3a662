use agf_core::Ending;

/// Source span as a byte range.
pub type Span = std::ops::Range<usize>;

/// An AST node with source location.
#[derive(Debug, Clone)]
pub struct Spanned<T> {
    /// The wrapped AST node.
    pub node: T,
    /// The byte range of this node in the source text.
    pub span: Span,
}

/// A parsed AGF source file: a sequence of scene blocks.
#[derive(Debug, Clone)]
pub struct AdventureFile {
    /// Scene declarations in source order.
    pub scenes: Vec<Spanned<SceneDecl>>,
}

/// A scene block, e.g. `scene cave { ... }`.
#[derive(Debug, Clone)]
pub struct SceneDecl {
    /// Whether the block carries an explicit `start` prefix.
    pub start: bool,
    /// The scene id.
    pub id: Spanned<String>,
    /// The statements in the block body.
    pub body: Vec<Spanned<SceneStmt>>,
}

/// A statement within a scene body.
#[derive(Debug, Clone)]
pub enum SceneStmt {
    /// A `title "..."` line.
    Title(String),
    /// A `"""..."""` narrative block.
    Narrative(String),
    /// A `choice "label" -> target` line.
    Choice(ChoiceLine),
    /// A terminal marker (`win`, `lose`, or the legacy alias `end`).
    Ending(Ending),
}

/// A choice line pairing a label with its target.
#[derive(Debug, Clone)]
pub struct ChoiceLine {
    /// The label offered to the player.
    pub label: String,
    /// Where the choice leads.
    pub target: Spanned<TargetRef>,
}

/// The target of a choice line, before resolution.
#[derive(Debug, Clone)]
pub enum TargetRef {
    /// A reference to a scene id.
    Scene(String),
    /// An inline terminal marker.
    Ending(Ending),
}
