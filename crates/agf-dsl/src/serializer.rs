use agf_core::{Adventure, ChoiceTarget};

/// Render an adventure as canonical AGF text.
///
/// Scenes are emitted in declaration order, so repeated serialization of the
/// same adventure is byte-for-byte identical. `parse(serialize(a))` yields an
/// adventure structurally equal to `a` for any parsed `a`, and serialization
/// after one canonicalization pass is idempotent.
pub fn serialize(adventure: &Adventure) -> String {
    let mut out = String::new();

    for (i, scene) in adventure.scenes().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let is_start = scene.id == *adventure.start();
        if is_start && i != 0 {
            out.push_str("start ");
        }
        out.push_str("scene ");
        out.push_str(scene.id.as_str());
        out.push_str(" {\n");

        // Only the start scene's title is meaningful.
        if is_start {
            out.push_str("    title \"");
            out.push_str(&escape(adventure.title()));
            out.push_str("\"\n");
        }

        out.push_str("    \"\"\"\n");
        for line in scene.narrative.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("    \"\"\"\n");

        for choice in &scene.choices {
            out.push_str("    choice \"");
            out.push_str(&escape(&choice.label));
            out.push_str("\" -> ");
            match &choice.target {
                ChoiceTarget::Scene(id) => out.push_str(id.as_str()),
                ChoiceTarget::Ending(e) => out.push_str(&e.to_string()),
            }
            out.push('\n');
        }

        if let Some(ending) = scene.ending {
            out.push_str("    ");
            out.push_str(&ending.to_string());
            out.push('\n');
        }

        out.push_str("}\n");
    }

    out
}

/// Escape a string for a double-quoted AGF literal.
///
/// Inverse of the lexer's unescape: `\\`, `\"`, `\n`, `\t`.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::parse;
    use agf_core::{Adventure, Choice, Ending, Scene, SceneId};
    use proptest::prelude::*;

    /// Short human-looking text: words separated by single spaces, no
    /// leading or trailing whitespace (narrative normalization is the
    /// identity on these).
    fn arb_words() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z]{1,10}( [a-zA-Z]{1,10}){0,4}")
            .expect("valid regex")
    }

    /// Scene material before ids are assigned: narrative plus either an
    /// ending (terminus) or one to three choices (decision point). Choice
    /// targets stay within `s0..s{n-1}` or hit an inline ending.
    fn arb_scene_body(
        n: usize,
    ) -> impl Strategy<Value = (String, Option<Ending>, Vec<Choice>)> {
        let choice = (arb_words(), 0..n + 2).prop_map(move |(label, pick)| match pick {
            p if p < n => Choice::to_scene(label, format!("s{p}")),
            p if p == n => Choice::to_ending(label, Ending::Win),
            _ => Choice::to_ending(label, Ending::Lose),
        });

        let decision = (arb_words(), prop::collection::vec(choice, 1..4))
            .prop_map(|(narrative, choices)| (narrative, None, choices));

        let terminus = (arb_words(), any::<bool>()).prop_map(|(narrative, win)| {
            let ending = if win { Ending::Win } else { Ending::Lose };
            (narrative, Some(ending), Vec::new())
        });

        prop_oneof![decision, terminus]
    }

    fn arb_adventure() -> impl Strategy<Value = Adventure> {
        (1usize..6)
            .prop_flat_map(|n| (arb_words(), prop::collection::vec(arb_scene_body(n), n..=n)))
            .prop_map(|(title, bodies)| {
                let scenes = bodies
                    .into_iter()
                    .enumerate()
                    .map(|(i, (narrative, ending, choices))| Scene {
                        id: SceneId::new(format!("s{i}")),
                        narrative,
                        choices,
                        ending,
                    })
                    .collect();
                Adventure::new(title, "s0", scenes)
                    .expect("generated adventure is structurally valid")
            })
    }

    proptest! {
        #[test]
        fn round_trip_random_adventures(adv in arb_adventure()) {
            let text = serialize(&adv);
            let reparsed = parse(&text).expect("canonical text parses");
            prop_assert_eq!(&reparsed, &adv);
            prop_assert_eq!(serialize(&reparsed), text);
        }
    }
}
