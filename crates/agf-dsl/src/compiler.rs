use std::collections::HashSet;

use agf_core::{Adventure, Choice, ChoiceTarget, Ending, Scene, SceneId};

use crate::ast::{AdventureFile, SceneStmt, Span, TargetRef};

/// Scene ids that would collide with terminal markers in choice targets.
const RESERVED_IDS: [&str; 3] = ["win", "lose", "end"];

/// The reason a parse failed.
///
/// One variant per validation stage, so callers can distinguish a malformed
/// block from, say, a dangling choice target without string matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The source is not lexically or grammatically well-formed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A scene is named after a terminal marker.
    #[error("\"{0}\" is reserved and cannot name a scene")]
    ReservedSceneId(String),

    /// Two scenes share an id.
    #[error("duplicate scene id: \"{0}\"")]
    DuplicateScene(String),

    /// A scene has no narrative block (or only blank ones).
    #[error("scene \"{0}\" has no narrative text")]
    MissingNarrative(String),

    /// A `title` line with empty text.
    #[error("scene \"{0}\" has an empty title")]
    EmptyTitle(String),

    /// A choice points at an undeclared scene.
    #[error("choice in scene \"{scene}\" targets undeclared scene \"{target}\"")]
    UnknownTarget {
        /// The scene containing the offending choice.
        scene: String,
        /// The unresolved target id.
        target: String,
    },

    /// The file declares no scenes.
    #[error("adventure declares no scenes")]
    Empty,

    /// More than one scene carries the `start` prefix.
    #[error("more than one scene is marked start")]
    DuplicateStart,

    /// The start scene has no title to serve as the adventure title.
    #[error("start scene \"{0}\" has no title")]
    MissingTitle(String),

    /// A scene mixes choices with a terminal marker.
    #[error("scene \"{0}\" mixes choices with an ending")]
    ChoicesWithEnding(String),

    /// A scene declares more than one terminal marker.
    #[error("scene \"{0}\" declares more than one ending")]
    DuplicateEnding(String),

    /// A scene has neither choices nor a terminal marker.
    #[error("scene \"{0}\" has neither choices nor an ending")]
    DeadEnd(String),
}

/// A parse failure with its source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (line {line})")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte range of the offending source.
    pub span: Span,
    /// 1-based line number of the span start.
    pub line: usize,
}

impl ParseError {
    /// Build an error, deriving the line number from the span and source.
    pub fn new(kind: ParseErrorKind, span: Span, source: &str) -> Self {
        let at = span.start.min(source.len());
        let line = source[..at].bytes().filter(|&b| b == b'\n').count() + 1;
        Self { kind, span, line }
    }
}

/// Per-scene data gathered while walking a block body.
struct CompiledScene {
    id: String,
    id_span: Span,
    decl_span: Span,
    start: bool,
    title: Option<String>,
    narrative: String,
    choices: Vec<(String, TargetRef, Span)>,
    endings: Vec<(Ending, Span)>,
}

/// Validate an AST and assemble it into an [`Adventure`].
///
/// Checks run in a fixed order, each failure short-circuiting: reserved and
/// duplicate ids, narrative/title text, choice-target resolution, start-scene
/// resolution, and the decision-point-XOR-terminus rule. The source text is
/// only used for line-number calculation.
pub fn compile(ast: &AdventureFile, source: &str) -> Result<Adventure, ParseError> {
    let fail = |kind, span: &Span| Err(ParseError::new(kind, span.clone(), source));

    // Reserved and duplicate scene ids.
    let mut seen: HashSet<&str> = HashSet::new();
    for decl in &ast.scenes {
        let id = &decl.node.id;
        if RESERVED_IDS.contains(&id.node.as_str()) {
            return fail(ParseErrorKind::ReservedSceneId(id.node.clone()), &id.span);
        }
        if !seen.insert(id.node.as_str()) {
            return fail(ParseErrorKind::DuplicateScene(id.node.clone()), &id.span);
        }
    }

    // Assemble scene bodies; narrative and explicit titles must be non-empty.
    let mut compiled: Vec<CompiledScene> = Vec::with_capacity(ast.scenes.len());
    for decl in &ast.scenes {
        let mut scene = CompiledScene {
            id: decl.node.id.node.clone(),
            id_span: decl.node.id.span.clone(),
            decl_span: decl.span.clone(),
            start: decl.node.start,
            title: None,
            narrative: String::new(),
            choices: Vec::new(),
            endings: Vec::new(),
        };
        for stmt in &decl.node.body {
            match &stmt.node {
                SceneStmt::Title(text) => {
                    if text.trim().is_empty() {
                        return fail(ParseErrorKind::EmptyTitle(scene.id), &stmt.span);
                    }
                    scene.title = Some(text.clone());
                }
                SceneStmt::Narrative(text) => {
                    if !scene.narrative.is_empty() {
                        scene.narrative.push_str("\n\n");
                    }
                    scene.narrative.push_str(text);
                }
                SceneStmt::Choice(line) => scene.choices.push((
                    line.label.clone(),
                    line.target.node.clone(),
                    line.target.span.clone(),
                )),
                SceneStmt::Ending(e) => scene.endings.push((*e, stmt.span.clone())),
            }
        }
        if scene.narrative.trim().is_empty() {
            return fail(ParseErrorKind::MissingNarrative(scene.id), &scene.decl_span);
        }
        compiled.push(scene);
    }

    // Choice targets must resolve to a declared scene or a terminal marker.
    for scene in &compiled {
        for (_, target, span) in &scene.choices {
            if let TargetRef::Scene(name) = target
                && !seen.contains(name.as_str())
            {
                return fail(
                    ParseErrorKind::UnknownTarget {
                        scene: scene.id.clone(),
                        target: name.clone(),
                    },
                    span,
                );
            }
        }
    }

    // Exactly one start scene: the marked one, or the first declared.
    if compiled.is_empty() {
        return fail(ParseErrorKind::Empty, &(0..0));
    }
    let mut marked = compiled.iter().filter(|s| s.start);
    let start = marked.next().unwrap_or(&compiled[0]);
    if let Some(second) = marked.next() {
        return fail(ParseErrorKind::DuplicateStart, &second.id_span);
    }
    let title = match start.title.as_deref() {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => return fail(ParseErrorKind::MissingTitle(start.id.clone()), &start.id_span),
    };
    let start_id = SceneId::new(start.id.clone());

    // Decision point XOR terminus.
    for scene in &compiled {
        match scene.endings.as_slice() {
            [] if scene.choices.is_empty() => {
                return fail(ParseErrorKind::DeadEnd(scene.id.clone()), &scene.decl_span);
            }
            [_, (_, second_span), ..] => {
                return fail(
                    ParseErrorKind::DuplicateEnding(scene.id.clone()),
                    second_span,
                );
            }
            [(_, span)] if !scene.choices.is_empty() => {
                return fail(ParseErrorKind::ChoicesWithEnding(scene.id.clone()), span);
            }
            _ => {}
        }
    }

    let scenes = compiled
        .into_iter()
        .map(|scene| Scene {
            id: SceneId::new(scene.id),
            narrative: scene.narrative,
            choices: scene
                .choices
                .into_iter()
                .map(|(label, target, _)| Choice {
                    label,
                    target: match target {
                        TargetRef::Scene(name) => ChoiceTarget::Scene(SceneId::new(name)),
                        TargetRef::Ending(e) => ChoiceTarget::Ending(e),
                    },
                })
                .collect(),
            ending: scene.endings.first().map(|(e, _)| *e),
        })
        .collect();

    // The checks above mirror Adventure::new's invariants, so this cannot
    // fail on a well-formed AST; surface it as a syntax error if it ever does.
    Adventure::new(title, start_id, scenes)
        .map_err(|e| ParseError::new(ParseErrorKind::Syntax(e.to_string()), 0..source.len(), source))
}
