use std::sync::Arc;

use agf_core::{Adventure, ChoiceTarget, Ending, Scene};

use crate::error::{EngineError, EngineResult};

/// One player's independent traversal of an adventure.
///
/// The adventure template is shared immutably via `Arc`; all mutable progress
/// is the cursor in this struct, so concurrent sessions over the same
/// template never observe each other. The runtime is memoryless beyond the
/// current scene — no visited-set, which is what makes cycles a legal graph
/// shape.
#[derive(Debug, Clone)]
pub struct Session {
    key: String,
    adventure: Arc<Adventure>,
    current: usize,
    outcome: Option<Ending>,
}

impl Session {
    /// Start a session at the adventure's start scene.
    ///
    /// If the start scene is itself a terminus, the session begins terminal.
    pub fn new(key: impl Into<String>, adventure: Arc<Adventure>) -> EngineResult<Self> {
        let current = adventure
            .scene_index(adventure.start())
            .ok_or_else(|| EngineError::MissingScene(adventure.start().clone()))?;
        let outcome = adventure.scenes()[current].ending;
        Ok(Self {
            key: key.into(),
            adventure,
            current,
            outcome,
        })
    }

    /// The caller-supplied session key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The adventure being played.
    pub fn adventure(&self) -> &Adventure {
        &self.adventure
    }

    fn scene(&self) -> &Scene {
        // `current` is only ever assigned from successful lookups on the
        // validated adventure.
        &self.adventure.scenes()[self.current]
    }

    /// Narrative of the current scene. Valid in any state.
    pub fn narrative(&self) -> &str {
        &self.scene().narrative
    }

    /// Labels of the current scene's choices in declared order; empty once
    /// the session is terminal.
    pub fn choices(&self) -> Vec<&str> {
        if self.is_terminal() {
            Vec::new()
        } else {
            self.scene()
                .choices
                .iter()
                .map(|c| c.label.as_str())
                .collect()
        }
    }

    /// Apply the choice at `index`.
    ///
    /// Fails with [`EngineError::ChoiceOutOfRange`] — leaving the session
    /// untouched — unless `0 <= index < choices().len()`. A scene target
    /// moves the cursor and adopts the new scene's ending, if any; an inline
    /// ending target terminates in place.
    pub fn choose(&mut self, index: usize) -> EngineResult<()> {
        if self.is_terminal() {
            return Err(EngineError::ChoiceOutOfRange {
                index,
                available: 0,
            });
        }
        let scene = self.scene();
        let Some(choice) = scene.choices.get(index) else {
            return Err(EngineError::ChoiceOutOfRange {
                index,
                available: scene.choices.len(),
            });
        };
        match choice.target.clone() {
            ChoiceTarget::Scene(id) => {
                let next = self
                    .adventure
                    .scene_index(&id)
                    .ok_or_else(|| EngineError::MissingScene(id.clone()))?;
                self.current = next;
                self.outcome = self.adventure.scenes()[next].ending;
            }
            ChoiceTarget::Ending(ending) => {
                // No target scene to move to; the narrative stays at the
                // scene where the choice was made.
                self.outcome = Some(ending);
            }
        }
        Ok(())
    }

    /// Whether the session reached an ending.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// The outcome, once terminal.
    pub fn outcome(&self) -> Option<Ending> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agf_core::Choice;

    fn cave() -> Arc<Adventure> {
        Arc::new(
            Adventure::new(
                "The Cave of Echoes",
                "start",
                vec![
                    Scene::decision(
                        "start",
                        "You wake in a cave.",
                        vec![
                            Choice::to_scene("Go left", "left"),
                            Choice::to_scene("Go right", "right"),
                        ],
                    ),
                    Scene::terminus("left", "A pit swallows you.", Ending::Lose),
                    Scene::terminus("right", "You find the exit.", Ending::Win),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn fresh_session_is_at_start() {
        let session = Session::new("chat-1", cave()).unwrap();
        assert_eq!(session.key(), "chat-1");
        assert_eq!(session.narrative(), "You wake in a cave.");
        assert_eq!(session.choices(), vec!["Go left", "Go right"]);
        assert!(!session.is_terminal());
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn winning_path() {
        let mut session = Session::new("chat-1", cave()).unwrap();
        session.choose(1).unwrap();
        assert_eq!(session.narrative(), "You find the exit.");
        assert!(session.choices().is_empty());
        assert!(session.is_terminal());
        assert_eq!(session.outcome(), Some(Ending::Win));
    }

    #[test]
    fn losing_path() {
        let mut session = Session::new("chat-1", cave()).unwrap();
        session.choose(0).unwrap();
        assert_eq!(session.outcome(), Some(Ending::Lose));
    }

    #[test]
    fn out_of_range_leaves_state_unchanged() {
        let mut session = Session::new("chat-1", cave()).unwrap();
        let err = session.choose(2).unwrap_err();
        assert!(
            matches!(err, EngineError::ChoiceOutOfRange { index: 2, available: 2 })
        );
        assert_eq!(session.narrative(), "You wake in a cave.");
        assert_eq!(session.choices().len(), 2);
        assert!(!session.is_terminal());

        // A valid retry still works.
        session.choose(1).unwrap();
        assert!(session.is_terminal());
    }

    #[test]
    fn choosing_after_terminal_is_out_of_range() {
        let mut session = Session::new("chat-1", cave()).unwrap();
        session.choose(1).unwrap();
        let err = session.choose(0).unwrap_err();
        assert!(
            matches!(err, EngineError::ChoiceOutOfRange { index: 0, available: 0 })
        );
        assert_eq!(session.outcome(), Some(Ending::Win));
    }

    #[test]
    fn sessions_are_isolated() {
        let adventure = cave();
        let mut a = Session::new("chat-a", Arc::clone(&adventure)).unwrap();
        let mut b = Session::new("chat-b", adventure).unwrap();

        a.choose(0).unwrap();
        assert_eq!(a.outcome(), Some(Ending::Lose));

        // b is still at the start, unaffected by a's progress.
        assert!(!b.is_terminal());
        assert_eq!(b.narrative(), "You wake in a cave.");
        b.choose(1).unwrap();
        assert_eq!(b.outcome(), Some(Ending::Win));
        assert_eq!(a.outcome(), Some(Ending::Lose));
    }

    #[test]
    fn cycles_allow_revisits() {
        let adventure = Arc::new(
            Adventure::new(
                "Loop",
                "hall",
                vec![
                    Scene::decision(
                        "hall",
                        "A hall of mirrors.",
                        vec![
                            Choice::to_scene("Step through", "mirror"),
                            Choice::to_ending("Smash the glass", Ending::Win),
                        ],
                    ),
                    Scene::decision(
                        "mirror",
                        "You see yourself.",
                        vec![Choice::to_scene("Turn back", "hall")],
                    ),
                ],
            )
            .unwrap(),
        );
        let mut session = Session::new("chat-1", adventure).unwrap();

        for _ in 0..3 {
            session.choose(0).unwrap();
            assert_eq!(session.narrative(), "You see yourself.");
            session.choose(0).unwrap();
            assert_eq!(session.narrative(), "A hall of mirrors.");
        }
        assert!(!session.is_terminal());
    }

    #[test]
    fn inline_ending_keeps_narrative_in_place() {
        let adventure = Arc::new(
            Adventure::new(
                "Leap",
                "edge",
                vec![Scene::decision(
                    "edge",
                    "The chasm yawns below.",
                    vec![Choice::to_ending("Jump", Ending::Lose)],
                )],
            )
            .unwrap(),
        );
        let mut session = Session::new("chat-1", adventure).unwrap();
        session.choose(0).unwrap();
        assert!(session.is_terminal());
        assert_eq!(session.outcome(), Some(Ending::Lose));
        assert_eq!(session.narrative(), "The chasm yawns below.");
        assert!(session.choices().is_empty());
    }

    #[test]
    fn terminal_start_scene() {
        let adventure = Arc::new(
            Adventure::new(
                "Instant",
                "over",
                vec![Scene::terminus("over", "It is already done.", Ending::Win)],
            )
            .unwrap(),
        );
        let session = Session::new("chat-1", adventure).unwrap();
        assert!(session.is_terminal());
        assert_eq!(session.outcome(), Some(Ending::Win));
    }

    #[test]
    fn every_path_reaches_a_terminus() {
        // Always taking the first choice must terminate on this graph.
        let mut session = Session::new("chat-1", cave()).unwrap();
        let mut steps = 0;
        while !session.is_terminal() {
            session.choose(0).unwrap();
            steps += 1;
            assert!(steps < 100, "expected termination");
        }
        assert!(session.outcome().is_some());
    }
}
