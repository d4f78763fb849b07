//! Mentor- and student-facing phrasing for a parsed tag.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tag::{HelpTarget, Tag, TagKind, Venue};

const NEXT_MEETING: &str = "Bring the deliverable outcome of this practice to our next meeting.";
const DELIVERABLE: &str = "deliverable outcome";
const REPRESENTATION: &str = "copy of the representation you suggested";

/// Lookup of people a student can be sent to for help.
pub trait Roster {
    /// Display name for `name`, if the person is on the roster.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Roster backed by a list of display names.
///
/// Matches a full name or a first name, ignoring ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameRoster {
    names: Vec<String>,
}

impl NameRoster {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Roster for NameRoster {
    fn resolve(&self, name: &str) -> Option<String> {
        let name = name.trim();
        self.names
            .iter()
            .find(|known| {
                known.eq_ignore_ascii_case(name)
                    || known
                        .split_whitespace()
                        .next()
                        .is_some_and(|first| first.eq_ignore_ascii_case(name))
            })
            .map(|known| capitalize_words(known))
    }
}

/// Rendered text for one follow-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeText {
    /// Student-facing practice, e.g. `On your own, try to: ...`.
    pub practice: String,
    pub opportunity: String,
    /// Resolved helpers joined for display; empty when none resolved.
    pub person: String,
    /// Full message sent on the mentor's behalf.
    pub message: String,
    /// What to bring to the next meeting. Empty for plan and reflect items.
    pub next_meeting: String,
}

/// Render `tag` into practice and message text.
pub fn format(tag: &Tag, roster: &dyn Roster) -> PracticeText {
    let content = tag.content.as_str();
    let mut person = String::new();

    let (practice, opportunity) = match &tag.kind {
        TagKind::Plan => (
            format!("In your planning, make sure to: {content}"),
            "Planning".to_string(),
        ),
        TagKind::Reflect => (format!("Reflect on: {content}"), "Reflection".to_string()),
        TagKind::SelfWork => (
            format!("On your own, try to: {content}"),
            "Self-work".to_string(),
        ),
        TagKind::Help(HelpTarget::Generic) => {
            (format!("Get help on: {content}"), "Help".to_string())
        }
        TagKind::Help(HelpTarget::Venue(Venue::Mysore)) => {
            (format!("At Mysore: {content}"), "Mysore".to_string())
        }
        TagKind::Help(HelpTarget::Venue(Venue::PairResearch)) => (
            format!("At Pair Research: {content}"),
            "Pair Research".to_string(),
        ),
        TagKind::Help(HelpTarget::Venue(Venue::Other(venue))) => {
            (content.to_string(), venue.clone())
        }
        TagKind::Help(HelpTarget::People(names)) => {
            let resolved = resolve_people(names, roster);
            if resolved.is_empty() {
                (format!("Get help on: {content}"), "Help".to_string())
            } else {
                person = join_names(&resolved);
                (format!("Work with {person} to: {content}"), "Help".to_string())
            }
        }
    };

    let next_meeting = match tag.kind {
        TagKind::SelfWork | TagKind::Help(_) => match &tag.representation {
            Some(_) => NEXT_MEETING.replace(DELIVERABLE, REPRESENTATION),
            None => NEXT_MEETING.to_string(),
        },
        TagKind::Plan | TagKind::Reflect => String::new(),
    };

    let mut message = sentence(&practice);
    if !next_meeting.is_empty() {
        message.push(' ');
        message.push_str(&next_meeting);
    }
    if let Some(rep) = &tag.representation {
        message.push_str(&format!(" Try capturing this as a {rep}."));
    }

    PracticeText {
        practice,
        opportunity,
        person,
        message,
        next_meeting,
    }
}

fn resolve_people(names: &[String], roster: &dyn Roster) -> Vec<String> {
    names
        .iter()
        .filter_map(|name| {
            let found = roster.resolve(name);
            if found.is_none() {
                debug!(name = %name, "help target not on roster");
            }
            found
        })
        .collect()
}

/// `A`, `A and B`, `A, B and C`.
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn capitalize_words(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Terminate with a period unless the text already ends a sentence.
fn sentence(text: &str) -> String {
    let text = text.trim_end();
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::parse_tag;

    fn render(line: &str, roster: &NameRoster) -> PracticeText {
        format(&parse_tag(line).unwrap(), roster)
    }

    #[test]
    fn self_work_phrasing() {
        let text = render("[self-work] Practice X", &NameRoster::default());
        assert_eq!(text.practice, "On your own, try to: Practice X");
        assert_eq!(text.opportunity, "Self-work");
        assert_eq!(
            text.message,
            "On your own, try to: Practice X. Bring the deliverable outcome of this practice to our next meeting."
        );
    }

    #[test]
    fn plan_has_no_next_meeting_request() {
        let text = render("[plan] Update sprint", &NameRoster::default());
        assert_eq!(text.practice, "In your planning, make sure to: Update sprint");
        assert!(text.next_meeting.is_empty());
        assert_eq!(text.message, "In your planning, make sure to: Update sprint.");
    }

    #[test]
    fn mysore_venue_phrasing() {
        let text = render("[help] @mysore work on X", &NameRoster::default());
        assert_eq!(text.practice, "At Mysore: work on X");
        assert_eq!(text.opportunity, "Mysore");
    }

    #[test]
    fn pair_research_venue_phrasing() {
        let text = render("[help] @pair research scope the survey", &NameRoster::default());
        assert_eq!(text.practice, "At Pair Research: scope the survey");
    }

    #[test]
    fn other_venue_passes_through() {
        let text = render("[help] @lab ask about the rig", &NameRoster::default());
        assert_eq!(text.practice, "@lab ask about the rig");
        assert_eq!(text.opportunity, "lab");
    }

    #[test]
    fn person_on_roster_is_named() {
        let roster = NameRoster::new(["Jason", "leesha hill"]);
        let text = render("[help] w/jason debug Y", &roster);
        assert_eq!(text.person, "Jason");
        assert!(text.practice.contains("Jason"));
        assert_eq!(text.practice, "Work with Jason to: debug Y");

        let text = render("[help] w/Jason,leesha debug Y", &roster);
        assert_eq!(text.person, "Jason and Leesha Hill");
    }

    #[test]
    fn empty_roster_falls_back_to_generic_help() {
        let text = render("[help] w/Jason debug Y", &NameRoster::default());
        assert!(text.person.is_empty());
        assert_eq!(text.practice, "Get help on: debug Y");
    }

    #[test]
    fn representation_rewrites_next_meeting_text() {
        let text = render("[help] w/jason sketch the flow rep/storyboard", &NameRoster::default());
        assert_eq!(
            text.next_meeting,
            "Bring the copy of the representation you suggested of this practice to our next meeting."
        );
        assert!(text.message.ends_with("Try capturing this as a storyboard."));
    }

    #[test]
    fn join_names_uses_commas_and_and() {
        let names: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_names(&names), "A, B and C");
        assert_eq!(join_names(&names[..1]), "A");
    }

    #[test]
    fn roster_deserializes_from_a_name_list() {
        let roster: NameRoster = serde_json::from_str(r#"["Jason", "Kapil"]"#).unwrap();
        assert_eq!(roster.resolve("kapil").as_deref(), Some("Kapil"));
        assert_eq!(roster.resolve("nobody"), None);
    }
}
