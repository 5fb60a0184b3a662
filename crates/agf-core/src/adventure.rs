use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AgfError, AgfResult};

/// Identifier of a scene within an adventure.
///
/// Scene ids are case-sensitive tokens taken verbatim from AGF source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(String);

impl SceneId {
    /// Create a scene id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// How a play-through ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    /// The player reached a winning terminus.
    Win,
    /// The player reached a losing terminus.
    Lose,
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ending::Win => f.write_str("win"),
            Ending::Lose => f.write_str("lose"),
        }
    }
}

/// Where a choice leads: another scene, or straight to an ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceTarget {
    /// Jump to the scene with this id.
    Scene(SceneId),
    /// Terminate the play-through with this outcome.
    Ending(Ending),
}

/// A labeled edge out of a scene.
///
/// Cycles are legal: a target may be any scene, including an ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// The text offered to the player.
    pub label: String,
    /// Where picking this choice leads.
    pub target: ChoiceTarget,
}

impl Choice {
    /// A choice leading to another scene.
    pub fn to_scene(label: impl Into<String>, target: impl Into<SceneId>) -> Self {
        Self {
            label: label.into(),
            target: ChoiceTarget::Scene(target.into()),
        }
    }

    /// A choice terminating the play-through.
    pub fn to_ending(label: impl Into<String>, ending: Ending) -> Self {
        Self {
            label: label.into(),
            target: ChoiceTarget::Ending(ending),
        }
    }
}

/// A node in the story graph.
///
/// A scene is either a decision point (non-empty `choices`, no `ending`) or a
/// terminus (an `ending`, no choices) — never both. [`Adventure::new`]
/// enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Unique id within the owning adventure.
    pub id: SceneId,
    /// Narrative text shown to the player. Never empty.
    pub narrative: String,
    /// Outgoing choices in display order.
    pub choices: Vec<Choice>,
    /// Terminal tag, present only on scenes without choices.
    pub ending: Option<Ending>,
}

impl Scene {
    /// A decision-point scene with the given choices.
    pub fn decision(
        id: impl Into<SceneId>,
        narrative: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            id: id.into(),
            narrative: narrative.into(),
            choices,
            ending: None,
        }
    }

    /// A terminal scene with the given outcome.
    pub fn terminus(id: impl Into<SceneId>, narrative: impl Into<String>, ending: Ending) -> Self {
        Self {
            id: id.into(),
            narrative: narrative.into(),
            choices: Vec::new(),
            ending: Some(ending),
        }
    }

    /// Whether this scene ends the play-through.
    pub fn is_terminus(&self) -> bool {
        self.ending.is_some()
    }
}

/// A validated, immutable story graph.
///
/// Scenes are kept in declaration order (serialization is deterministic) with
/// a by-id index for lookup. Construction validates every structural
/// invariant, so holders of an `Adventure` never need to re-check them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Adventure {
    title: String,
    start: SceneId,
    scenes: Vec<Scene>,
    #[serde(skip)]
    index: HashMap<SceneId, usize>,
}

impl Adventure {
    /// Build an adventure from its parts, validating all invariants.
    ///
    /// Checks, in order: at least one scene, non-empty title, unique scene
    /// ids, the start scene is declared, per-scene narrative is non-empty,
    /// every choice target resolves, and each scene is a decision point XOR
    /// a terminus.
    pub fn new(
        title: impl Into<String>,
        start: impl Into<SceneId>,
        scenes: Vec<Scene>,
    ) -> AgfResult<Self> {
        let title = title.into();
        let start = start.into();

        if scenes.is_empty() {
            return Err(AgfError::Empty);
        }
        if title.trim().is_empty() {
            return Err(AgfError::EmptyTitle);
        }

        let mut index = HashMap::with_capacity(scenes.len());
        for (i, scene) in scenes.iter().enumerate() {
            if index.insert(scene.id.clone(), i).is_some() {
                return Err(AgfError::DuplicateScene(scene.id.clone()));
            }
        }

        if !index.contains_key(&start) {
            return Err(AgfError::UnknownStart(start));
        }

        for scene in &scenes {
            if scene.narrative.trim().is_empty() {
                return Err(AgfError::EmptyNarrative(scene.id.clone()));
            }
            for choice in &scene.choices {
                if let ChoiceTarget::Scene(target) = &choice.target
                    && !index.contains_key(target)
                {
                    return Err(AgfError::UnknownTarget {
                        scene: scene.id.clone(),
                        label: choice.label.clone(),
                        target: target.clone(),
                    });
                }
            }
            match (&scene.ending, scene.choices.is_empty()) {
                (Some(_), false) => return Err(AgfError::ChoicesWithEnding(scene.id.clone())),
                (None, true) => return Err(AgfError::DeadEnd(scene.id.clone())),
                _ => {}
            }
        }

        Ok(Self {
            title,
            start,
            scenes,
            index,
        })
    }

    /// The adventure's display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Id of the scene a fresh session begins at.
    pub fn start(&self) -> &SceneId {
        &self.start
    }

    /// The start scene itself.
    pub fn start_scene(&self) -> &Scene {
        // The start id is validated at construction.
        &self.scenes[self.index[&self.start]]
    }

    /// Look up a scene by id.
    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.index.get(id).map(|&i| &self.scenes[i])
    }

    /// Position of a scene in declaration order.
    pub fn scene_index(&self, id: &SceneId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// All scenes in declaration order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Number of scenes in the graph.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cave() -> Adventure {
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
        .unwrap()
    }

    #[test]
    fn build_and_query() {
        let adv = cave();
        assert_eq!(adv.title(), "The Cave of Echoes");
        assert_eq!(adv.start().as_str(), "start");
        assert_eq!(adv.scene_count(), 3);
        assert_eq!(adv.start_scene().choices.len(), 2);

        let right = adv.scene(&SceneId::from("right")).unwrap();
        assert_eq!(right.ending, Some(Ending::Win));
        assert!(right.is_terminus());
    }

    #[test]
    fn scenes_keep_declaration_order() {
        let adv = cave();
        let ids: Vec<_> = adv.scenes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "left", "right"]);
        assert_eq!(adv.scene_index(&SceneId::from("left")), Some(1));
    }

    #[test]
    fn empty_adventure_rejected() {
        let err = Adventure::new("Empty", "start", vec![]).unwrap_err();
        assert_eq!(err, AgfError::Empty);
    }

    #[test]
    fn blank_title_rejected() {
        let err = Adventure::new(
            "  ",
            "s",
            vec![Scene::terminus("s", "Done.", Ending::Win)],
        )
        .unwrap_err();
        assert_eq!(err, AgfError::EmptyTitle);
    }

    #[test]
    fn duplicate_scene_rejected() {
        let err = Adventure::new(
            "Dup",
            "a",
            vec![
                Scene::terminus("a", "One.", Ending::Win),
                Scene::terminus("a", "Two.", Ending::Lose),
            ],
        )
        .unwrap_err();
        assert_eq!(err, AgfError::DuplicateScene(SceneId::from("a")));
    }

    #[test]
    fn unknown_start_rejected() {
        let err = Adventure::new(
            "Lost",
            "nowhere",
            vec![Scene::terminus("a", "One.", Ending::Win)],
        )
        .unwrap_err();
        assert_eq!(err, AgfError::UnknownStart(SceneId::from("nowhere")));
    }

    #[test]
    fn unresolved_target_rejected() {
        let err = Adventure::new(
            "Dangling",
            "a",
            vec![Scene::decision(
                "a",
                "Pick.",
                vec![Choice::to_scene("Onward", "missing")],
            )],
        )
        .unwrap_err();
        assert!(matches!(err, AgfError::UnknownTarget { .. }));
    }

    #[test]
    fn decision_with_ending_rejected() {
        let mut scene = Scene::decision("a", "Pick.", vec![Choice::to_ending("Stop", Ending::Win)]);
        scene.ending = Some(Ending::Lose);
        let err = Adventure::new("Conflict", "a", vec![scene]).unwrap_err();
        assert_eq!(err, AgfError::ChoicesWithEnding(SceneId::from("a")));
    }

    #[test]
    fn dead_end_rejected() {
        let scene = Scene {
            id: SceneId::from("a"),
            narrative: "Nothing here.".to_string(),
            choices: Vec::new(),
            ending: None,
        };
        let err = Adventure::new("Stuck", "a", vec![scene]).unwrap_err();
        assert_eq!(err, AgfError::DeadEnd(SceneId::from("a")));
    }

    #[test]
    fn inline_ending_targets_need_no_scene() {
        let adv = Adventure::new(
            "Quick",
            "a",
            vec![Scene::decision(
                "a",
                "Keep going?",
                vec![
                    Choice::to_ending("Give up", Ending::Lose),
                    Choice::to_scene("Loop", "a"),
                ],
            )],
        )
        .unwrap();
        assert_eq!(adv.scene_count(), 1);
    }

    #[test]
    fn cycles_are_legal() {
        let adv = Adventure::new(
            "Loop",
            "a",
            vec![
                Scene::decision("a", "Around again.", vec![Choice::to_scene("Again", "b")]),
                Scene::decision(
                    "b",
                    "And back.",
                    vec![
                        Choice::to_scene("Back", "a"),
                        Choice::to_ending("Out", Ending::Win),
                    ],
                ),
            ],
        )
        .unwrap();
        assert_eq!(adv.scene_count(), 2);
    }

    #[test]
    fn serializes_to_json() {
        let adv = cave();
        let json = serde_json::to_value(&adv).unwrap();
        assert_eq!(json["title"], "The Cave of Echoes");
        assert_eq!(json["scenes"].as_array().unwrap().len(), 3);
    }
}
