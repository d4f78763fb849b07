//! Follow-up requests and the student's recorded outcome.
//!
//! In memory the reflections are either still pending (the student hasn't
//! said whether the practice happened) or resolved to one branch. A resolved
//! outcome still carries the other branch untouched, so the choice can be
//! flipped outside the engine without losing prompts or earlier responses.
//! On the wire they keep the store's two-array shape:
//!
//! ```json
//! "reflections": [ [ {"prompt": "...", "response": ""} ], [ ... ] ]
//! ```
//!
//! index 0 is the "didn't happen" branch, index 1 the "did happen" branch.

use serde::{Deserialize, Serialize};

use crate::catalog::ReflectionSets;
use crate::error::{CapnoteError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionAnswer {
    pub prompt: String,
    #[serde(default)]
    pub response: String,
}

impl ReflectionAnswer {
    pub fn unanswered(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reflections {
    Pending {
        if_missed: Vec<ReflectionAnswer>,
        if_done: Vec<ReflectionAnswer>,
    },
    Resolved {
        did_happen: bool,
        answers: Vec<ReflectionAnswer>,
        /// The branch that wasn't chosen, kept as stored.
        unchosen: Vec<ReflectionAnswer>,
    },
}

/// What the student reported back for one follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OutcomeWire", into = "OutcomeWire")]
pub struct Outcome {
    pub deliverable_link: Option<String>,
    pub deliverable_notes: String,
    pub reflections: Reflections,
}

impl Outcome {
    /// Fresh outcome with both question sets unanswered.
    pub fn pending(sets: &ReflectionSets) -> Self {
        let unanswered =
            |qs: &[String]| qs.iter().map(ReflectionAnswer::unanswered).collect::<Vec<_>>();
        Self {
            deliverable_link: None,
            deliverable_notes: String::new(),
            reflections: Reflections::Pending {
                if_missed: unanswered(&sets.if_missed),
                if_done: unanswered(&sets.if_done),
            },
        }
    }

    pub fn did_happen(&self) -> Option<bool> {
        match self.reflections {
            Reflections::Pending { .. } => None,
            Reflections::Resolved { did_happen, .. } => Some(did_happen),
        }
    }

    /// Record whether the practice happened; that branch takes the answers.
    pub fn resolve(self, did_happen: bool) -> Result<Self> {
        let reflections = match self.reflections {
            Reflections::Pending { if_missed, if_done } => {
                let (answers, unchosen) = if did_happen {
                    (if_done, if_missed)
                } else {
                    (if_missed, if_done)
                };
                Reflections::Resolved {
                    did_happen,
                    answers,
                    unchosen,
                }
            }
            Reflections::Resolved { did_happen: current, .. } if current != did_happen => {
                return Err(CapnoteError::OutcomeAlreadyResolved(current));
            }
            resolved @ Reflections::Resolved { .. } => resolved,
        };
        Ok(Self {
            reflections,
            ..self
        })
    }

    /// Answer the `index`-th prompt of the resolved branch.
    pub fn answer(mut self, index: usize, response: impl Into<String>) -> Result<Self> {
        let Reflections::Resolved { answers, .. } = &mut self.reflections else {
            return Err(CapnoteError::OutcomePending);
        };
        let len = answers.len();
        let slot = answers
            .get_mut(index)
            .ok_or(CapnoteError::InvalidReflectionIndex { index, len })?;
        slot.response = response.into();
        Ok(self)
    }

    pub fn attach_deliverable(mut self, link: Option<String>, notes: impl Into<String>) -> Self {
        self.deliverable_link = link;
        self.deliverable_notes = notes.into();
        self
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeWire {
    #[serde(default)]
    did_happen: Option<bool>,
    #[serde(default)]
    deliverable_link: Option<String>,
    #[serde(default)]
    deliverable_notes: String,
    #[serde(default)]
    reflections: [Vec<ReflectionAnswer>; 2],
}

impl From<OutcomeWire> for Outcome {
    fn from(wire: OutcomeWire) -> Self {
        let [missed, done] = wire.reflections;
        let reflections = match wire.did_happen {
            None => Reflections::Pending {
                if_missed: missed,
                if_done: done,
            },
            Some(true) => Reflections::Resolved {
                did_happen: true,
                answers: done,
                unchosen: missed,
            },
            Some(false) => Reflections::Resolved {
                did_happen: false,
                answers: missed,
                unchosen: done,
            },
        };
        Self {
            deliverable_link: wire.deliverable_link,
            deliverable_notes: wire.deliverable_notes,
            reflections,
        }
    }
}

impl From<Outcome> for OutcomeWire {
    fn from(outcome: Outcome) -> Self {
        let (did_happen, reflections) = match outcome.reflections {
            Reflections::Pending { if_missed, if_done } => (None, [if_missed, if_done]),
            Reflections::Resolved {
                did_happen: true,
                answers,
                unchosen,
            } => (Some(true), [unchosen, answers]),
            Reflections::Resolved {
                did_happen: false,
                answers,
                unchosen,
            } => (Some(false), [answers, unchosen]),
        };
        Self {
            did_happen,
            deliverable_link: outcome.deliverable_link,
            deliverable_notes: outcome.deliverable_notes,
            reflections,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPractice {
    pub practice: String,
    pub opportunity: String,
    pub person: String,
    pub reflection_questions: Vec<String>,
}

/// A tag-derived request for the student to do and reflect on a practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    /// Source plan line, trimmed. Outcomes are matched on this text.
    pub practice: String,
    pub parsed_practice: ParsedPractice,
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> ReflectionSets {
        ReflectionSets {
            if_missed: vec!["why not?".into()],
            if_done: vec!["link?".into(), "what changed?".into()],
        }
    }

    #[test]
    fn pending_outcome_serializes_both_branches() {
        let json = serde_json::to_value(Outcome::pending(&sets())).unwrap();
        assert!(json["didHappen"].is_null());
        assert!(json["deliverableLink"].is_null());
        assert_eq!(json["deliverableNotes"], "");
        assert_eq!(json["reflections"][0].as_array().unwrap().len(), 1);
        assert_eq!(json["reflections"][1].as_array().unwrap().len(), 2);
        assert_eq!(json["reflections"][1][0]["prompt"], "link?");
        assert_eq!(json["reflections"][1][0]["response"], "");
    }

    #[test]
    fn resolve_keeps_the_chosen_branch() {
        let outcome = Outcome::pending(&sets()).resolve(true).unwrap();
        assert_eq!(outcome.did_happen(), Some(true));
        match &outcome.reflections {
            Reflections::Resolved { answers, .. } => assert_eq!(answers.len(), 2),
            other => panic!("expected resolved, got {other:?}"),
        }

        let missed = Outcome::pending(&sets()).resolve(false).unwrap();
        let json = serde_json::to_value(&missed).unwrap();
        assert_eq!(json["didHappen"], false);
        assert_eq!(json["reflections"][0][0]["prompt"], "why not?");
        assert_eq!(json["reflections"][1][0]["prompt"], "link?");
    }

    #[test]
    fn resolving_twice_the_other_way_is_rejected() {
        let outcome = Outcome::pending(&sets()).resolve(true).unwrap();
        let same = outcome.clone().resolve(true).unwrap();
        assert_eq!(same, outcome);
        assert!(matches!(
            outcome.resolve(false),
            Err(CapnoteError::OutcomeAlreadyResolved(true))
        ));
    }

    #[test]
    fn answers_need_a_resolved_outcome() {
        let pending = Outcome::pending(&sets());
        assert!(matches!(
            pending.clone().answer(0, "x"),
            Err(CapnoteError::OutcomePending)
        ));

        let resolved = pending.resolve(true).unwrap();
        let answered = resolved.clone().answer(1, "more than I expected").unwrap();
        let json = serde_json::to_value(&answered).unwrap();
        assert_eq!(json["reflections"][1][1]["response"], "more than I expected");

        assert!(matches!(
            resolved.answer(5, "x"),
            Err(CapnoteError::InvalidReflectionIndex { index: 5, len: 2 })
        ));
    }

    #[test]
    fn wire_outcome_is_read_back() {
        let json = r#"{
            "didHappen": true,
            "deliverableLink": "https://example.org/doc",
            "deliverableNotes": "first draft",
            "reflections": [[], [{"prompt": "link?", "response": "see doc"}]]
        }"#;
        let outcome: Outcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.did_happen(), Some(true));
        assert_eq!(outcome.deliverable_link.as_deref(), Some("https://example.org/doc"));
        assert_eq!(
            outcome.reflections,
            Reflections::Resolved {
                did_happen: true,
                answers: vec![ReflectionAnswer {
                    prompt: "link?".into(),
                    response: "see doc".into(),
                }],
                unchosen: Vec::new(),
            }
        );
    }

    #[test]
    fn stored_answers_in_both_branches_survive_a_rewrite() {
        let json = serde_json::json!({
            "didHappen": true,
            "deliverableLink": null,
            "deliverableNotes": "",
            "reflections": [
                [{"prompt": "why not?", "response": "first answer"}],
                [{"prompt": "link?", "response": "doc"}]
            ]
        });
        let outcome: Outcome = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json);

        let answered = outcome.answer(0, "the doc").unwrap();
        let back = serde_json::to_value(&answered).unwrap();
        assert_eq!(back["reflections"][0][0]["response"], "first answer");
        assert_eq!(back["reflections"][1][0]["response"], "the doc");
    }

    #[test]
    fn follow_up_json_shape() {
        let fu = FollowUp {
            practice: "[self-work] Practice X".into(),
            parsed_practice: ParsedPractice {
                practice: "On your own, try to: Practice X".into(),
                opportunity: "Self-work".into(),
                person: String::new(),
                reflection_questions: vec!["why not?".into()],
            },
            outcome: Outcome::pending(&sets()).attach_deliverable(None, "notes"),
        };
        let json = serde_json::to_value(&fu).unwrap();
        assert_eq!(json["parsedPractice"]["reflectionQuestions"][0], "why not?");
        assert_eq!(json["outcome"]["deliverableNotes"], "notes");
    }
}
