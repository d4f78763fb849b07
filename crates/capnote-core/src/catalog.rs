//! Reflection questions asked after a follow-up, per tag.
//!
//! Every follow-up carries two question sets. The student sees one of them,
//! picked by whether the practice happened: branch 0 when it didn't, branch 1
//! when it did.

use crate::tag::{HelpTarget, TagKind, Venue};

const REFLECT: &[&str] = &[
    "Looking back after the fact, what happened and how did it go?",
    "What is your general takeaway from this reflection?",
];

const SELF_WORK_MISSED: &[&str] = &[
    "What got in the way of doing this on your own?",
    "What did you work on instead?",
    "What would make it easier to get this done this week?",
    "Is there anything your mentor can do to help you follow through?",
];

const SELF_WORK_DONE: &[&str] = &[
    "Share a link to your deliverable and add any notes about it.",
    "How has your understanding of the problem changed?",
    "What new risks or open questions did this surface?",
    "What will you do next as a result?",
];

/// The two reflection branches for one follow-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionSets {
    /// Asked when the practice didn't happen.
    pub if_missed: Vec<String>,
    /// Asked when the practice happened.
    pub if_done: Vec<String>,
}

impl ReflectionSets {
    fn from_static(missed: &[&str], done: &[&str]) -> Self {
        Self {
            if_missed: missed.iter().map(|q| q.to_string()).collect(),
            if_done: done.iter().map(|q| q.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.if_missed.is_empty() && self.if_done.is_empty()
    }

    /// Branch 0 prompts, then branch 1 prompts not already asked in branch 0.
    pub fn all_prompts(&self) -> Vec<String> {
        let mut out = self.if_missed.clone();
        for q in &self.if_done {
            if !out.contains(q) {
                out.push(q.clone());
            }
        }
        out
    }
}

/// Question sets for `kind`.
///
/// `people` is the resolved, display-ready list of helpers for `w/` help
/// requests; an empty string falls back to the generic help wording.
pub fn questions_for(kind: &TagKind, people: &str) -> ReflectionSets {
    match kind {
        TagKind::Plan => ReflectionSets::default(),
        TagKind::Reflect => ReflectionSets::from_static(REFLECT, REFLECT),
        TagKind::SelfWork => ReflectionSets::from_static(SELF_WORK_MISSED, SELF_WORK_DONE),
        TagKind::Help(target) => help_questions(&help_source(target, people)),
    }
}

/// "help", "help at Mysore", "help from Jason and Leesha", ...
fn help_source(target: &HelpTarget, people: &str) -> String {
    match target {
        HelpTarget::Venue(Venue::Mysore) => "help at Mysore".to_string(),
        HelpTarget::Venue(Venue::PairResearch) => "help at Pair Research".to_string(),
        HelpTarget::Venue(Venue::Other(venue)) => format!("help at {venue}"),
        HelpTarget::People(_) if !people.is_empty() => format!("help from {people}"),
        HelpTarget::People(_) | HelpTarget::Generic => "help".to_string(),
    }
}

fn help_questions(source: &str) -> ReflectionSets {
    ReflectionSets {
        if_missed: vec![
            format!("What got in the way of getting {source}?"),
            "What did you work on instead?".to_string(),
            format!("What would make it easier to get {source} this week?"),
            "Is there anything your mentor can do to help you follow through?".to_string(),
        ],
        if_done: vec![
            format!("Share a link to what came out of getting {source}, with any notes."),
            "How has your understanding of the problem changed?".to_string(),
            "What new risks or open questions did this surface?".to_string(),
            "What will you do next as a result?".to_string(),
        ],
    }
}
