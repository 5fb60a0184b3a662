use std::path::Path;
use std::sync::PoisonError;

use agf_core::Ending;
use agf_dsl::ParseError;

use crate::catalog::{Catalog, LoadSummary, Upserted};
use crate::error::{EngineError, EngineResult};
use crate::session::Session;
use crate::table::SessionTable;

/// A presentation-ready snapshot of a session's current scene.
///
/// These are the only fields an external caller needs to render a turn:
/// narrative text, the ordered choice labels, and the terminal outcome.
/// Rendering (numbered buttons, prompts) stays entirely with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView {
    /// Narrative text to display.
    pub narrative: String,
    /// Choice labels in display order; empty once terminal.
    pub choices: Vec<String>,
    /// The outcome, once terminal.
    pub outcome: Option<Ending>,
}

impl SceneView {
    /// Whether this view shows an ended play-through.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    fn of(session: &Session) -> Self {
        Self {
            narrative: session.narrative().to_string(),
            choices: session.choices().iter().map(|s| s.to_string()).collect(),
            outcome: session.outcome(),
        }
    }
}

/// The façade external callers drive: a catalog of adventures plus the table
/// of live sessions.
///
/// Construction and teardown belong to the process entry point, which passes
/// the engine by reference to every operation — there are no ambient
/// singletons here.
#[derive(Debug, Default)]
pub struct Engine {
    catalog: Catalog,
    sessions: SessionTable,
}

impl Engine {
    /// Create an engine with an empty catalog and no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over an already-populated catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            sessions: SessionTable::new(),
        }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load all persisted adventures from `dir`. See [`Catalog::load_dir`].
    pub fn load_dir(&self, dir: &Path) -> LoadSummary {
        self.catalog.load_dir(dir)
    }

    /// Parse and store an uploaded adventure. See [`Catalog::upsert`].
    pub fn submit_adventure(&self, name: &str, source: &str) -> Result<Upserted, ParseError> {
        self.catalog.upsert(name, source)
    }

    /// `(name, title)` pairs in catalog order.
    pub fn list_adventures(&self) -> Vec<(String, String)> {
        self.catalog.list()
    }

    /// Start a session for `key` playing the named adventure.
    ///
    /// Fails with [`EngineError::UnknownAdventure`] on a catalog miss and
    /// [`EngineError::AlreadyRunning`] if `key` already has a live session.
    /// Should the adventure open on a terminus, the session ends immediately
    /// and the terminal view is returned.
    pub fn start_session(&self, key: &str, name: &str) -> EngineResult<SceneView> {
        let adventure = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::UnknownAdventure(name.to_string()))?;
        let session = self.sessions.start(key, adventure)?;
        let view = SceneView::of(&session.lock().unwrap_or_else(PoisonError::into_inner));
        if view.is_terminal() {
            self.sessions.end(key);
        }
        Ok(view)
    }

    /// Apply choice `index` for `key`'s session and return the new view.
    ///
    /// A terminal view means the session has already been removed from the
    /// table; on [`EngineError::ChoiceOutOfRange`] the session is untouched
    /// and the caller may retry with a valid index.
    pub fn submit_choice(&self, key: &str, index: usize) -> EngineResult<SceneView> {
        let session = self
            .sessions
            .get(key)
            .ok_or_else(|| EngineError::NoSuchSession(key.to_string()))?;
        let view = {
            let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
            session.choose(index)?;
            SceneView::of(&session)
        };
        if view.is_terminal() {
            self.sessions.end(key);
        }
        Ok(view)
    }

    /// The current view for `key`'s session, without advancing it.
    pub fn peek(&self, key: &str) -> EngineResult<SceneView> {
        let session = self
            .sessions
            .get(key)
            .ok_or_else(|| EngineError::NoSuchSession(key.to_string()))?;
        let session = session.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(SceneView::of(&session))
    }

    /// Drop `key`'s session, if any. Returns whether one existed.
    pub fn quit_session(&self, key: &str) -> bool {
        self.sessions.end(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAVE: &str = r#"scene start {
    title "The Cave of Echoes"
    """
    You wake in a cave.
    """
    choice "Go left" -> left
    choice "Go right" -> right
}

scene left {
    """
    A pit swallows you.
    """
    lose
}

scene right {
    """
    You find the exit.
    """
    win
}
"#;

    fn engine() -> Engine {
        let engine = Engine::new();
        engine.submit_adventure("cave", CAVE).unwrap();
        engine
    }

    #[test]
    fn start_and_win() {
        let engine = engine();

        let view = engine.start_session("chat-1", "cave").unwrap();
        assert_eq!(view.narrative, "You wake in a cave.");
        assert_eq!(view.choices, vec!["Go left", "Go right"]);
        assert!(!view.is_terminal());

        let view = engine.submit_choice("chat-1", 1).unwrap();
        assert_eq!(view.narrative, "You find the exit.");
        assert!(view.choices.is_empty());
        assert!(view.is_terminal());
        assert_eq!(view.outcome, Some(Ending::Win));
    }

    #[test]
    fn unknown_adventure() {
        let engine = engine();
        let err = engine.start_session("chat-1", "castle").unwrap_err();
        assert!(matches!(err, EngineError::UnknownAdventure(n) if n == "castle"));
    }

    #[test]
    fn second_start_is_already_running() {
        let engine = engine();
        engine.start_session("chat-1", "cave").unwrap();

        let err = engine.start_session("chat-1", "cave").unwrap_err();
        assert!(matches!(err, EngineError::AlreadyRunning(_)));

        // The first session is unaffected and still playable.
        let view = engine.peek("chat-1").unwrap();
        assert_eq!(view.narrative, "You wake in a cave.");
    }

    #[test]
    fn terminal_session_is_removed_from_table() {
        let engine = engine();
        engine.start_session("chat-1", "cave").unwrap();
        engine.submit_choice("chat-1", 0).unwrap();

        let err = engine.submit_choice("chat-1", 0).unwrap_err();
        assert!(matches!(err, EngineError::NoSuchSession(_)));

        // The key is free again.
        engine.start_session("chat-1", "cave").unwrap();
    }

    #[test]
    fn out_of_range_choice_is_retryable() {
        let engine = engine();
        engine.start_session("chat-1", "cave").unwrap();

        let err = engine.submit_choice("chat-1", 9).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ChoiceOutOfRange {
                index: 9,
                available: 2
            }
        ));

        let view = engine.submit_choice("chat-1", 1).unwrap();
        assert_eq!(view.outcome, Some(Ending::Win));
    }

    #[test]
    fn sessions_under_distinct_keys_are_isolated() {
        let engine = engine();
        engine.start_session("chat-a", "cave").unwrap();
        engine.start_session("chat-b", "cave").unwrap();

        let a = engine.submit_choice("chat-a", 0).unwrap();
        assert_eq!(a.outcome, Some(Ending::Lose));

        let b = engine.peek("chat-b").unwrap();
        assert!(!b.is_terminal());
        assert_eq!(b.narrative, "You wake in a cave.");
    }

    #[test]
    fn quit_frees_the_key() {
        let engine = engine();
        engine.start_session("chat-1", "cave").unwrap();

        assert!(engine.quit_session("chat-1"));
        assert!(!engine.quit_session("chat-1"));
        engine.start_session("chat-1", "cave").unwrap();
    }

    #[test]
    fn failed_upload_changes_nothing() {
        let engine = engine();
        let before = engine.list_adventures();

        let err = engine.submit_adventure("bad", "scene a {").unwrap_err();
        assert!(matches!(err.kind, agf_dsl::ParseErrorKind::Syntax(_)));
        assert_eq!(engine.list_adventures(), before);
    }

    #[test]
    fn listing_returns_name_title_pairs() {
        let engine = engine();
        assert_eq!(
            engine.list_adventures(),
            vec![("cave".to_string(), "The Cave of Echoes".to_string())]
        );
    }

    #[test]
    fn instantly_terminal_adventure_never_occupies_the_key() {
        let engine = engine();
        engine
            .submit_adventure(
                "instant",
                "scene over {\n    title \"Instant\"\n    \"\"\"\n    Done already.\n    \"\"\"\n    win\n}\n",
            )
            .unwrap();

        let view = engine.start_session("chat-1", "instant").unwrap();
        assert!(view.is_terminal());

        // The key was released immediately.
        engine.start_session("chat-1", "instant").unwrap();
    }
}
