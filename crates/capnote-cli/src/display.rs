//! Vertical card display for follow-ups, tags and carry-forward results.

use std::fmt::Write;

use capnote_core::{FollowUpDraft, HelpTarget, IssueObject, Reflections, Tag, TagKind, Venue};

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

/// Render one follow-up draft as a card.
pub fn follow_up_card(draft: &FollowUpDraft) -> String {
    let fu = &draft.follow_up;
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===", fu.practice);
    let _ = writeln!(out, "{}", fu.parsed_practice.practice);
    out.push('\n');

    out.push_str("Practice\n");
    field(&mut out, "opportunity", &fu.parsed_practice.opportunity);
    field(&mut out, "person", &fu.parsed_practice.person);
    field(&mut out, "source block", &draft.block_id);
    out.push('\n');

    out.push_str("Message\n");
    field(&mut out, "message", &draft.text.message);
    field(&mut out, "next meeting", &draft.text.next_meeting);
    out.push('\n');

    out.push_str("Outcome\n");
    let status = match fu.outcome.did_happen() {
        None => "pending",
        Some(true) => "happened",
        Some(false) => "didn't happen",
    };
    field(&mut out, "status", status);
    if let Some(link) = &fu.outcome.deliverable_link {
        field(&mut out, "deliverable", link);
    }
    field(&mut out, "notes", &fu.outcome.deliverable_notes);
    match &fu.outcome.reflections {
        Reflections::Pending { if_missed, if_done } => {
            prompts(&mut out, "if missed", if_missed.iter().map(|a| a.prompt.as_str()));
            prompts(&mut out, "if done", if_done.iter().map(|a| a.prompt.as_str()));
        }
        Reflections::Resolved { answers, .. } => {
            for a in answers.iter().take(MAX_LIST_ITEMS) {
                let response = if a.response.is_empty() { "-" } else { a.response.as_str() };
                let _ = writeln!(out, "  {:<26} {}", a.prompt, response);
            }
        }
    }
    out
}

/// One-line summary of a parsed tag.
pub fn tag_line(tag: &Tag) -> String {
    let target = match &tag.kind {
        TagKind::Help(HelpTarget::Generic) => " (generic)".to_string(),
        TagKind::Help(HelpTarget::Venue(Venue::Mysore)) => " @Mysore".to_string(),
        TagKind::Help(HelpTarget::Venue(Venue::PairResearch)) => " @Pair Research".to_string(),
        TagKind::Help(HelpTarget::Venue(Venue::Other(v))) => format!(" @{v}"),
        TagKind::Help(HelpTarget::People(names)) => format!(" w/{}", names.join(",")),
        TagKind::Plan | TagKind::Reflect | TagKind::SelfWork => String::new(),
    };
    let rep = tag
        .representation
        .as_deref()
        .map(|r| format!(" rep: {r}"))
        .unwrap_or_default();
    format!("[{}]{target} {}{rep}", tag.kind, tag.content)
}

/// Titles of carried-forward issues, one per line.
pub fn issue_list(issues: &[IssueObject]) -> String {
    let mut out = String::new();
    for issue in issues {
        let _ = writeln!(
            out,
            "  {:<26} {} ({} prior)",
            issue.id,
            issue.title,
            issue.prior_instances.len()
        );
    }
    out
}

// ── Helpers ──

fn field(out: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {:<26} {}", label, value);
}

fn prompts<'a>(out: &mut String, label: &str, items: impl Iterator<Item = &'a str>) {
    let items: Vec<&str> = items.collect();
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {} ({}):", label, items.len());
    for item in items.iter().take(MAX_LIST_ITEMS) {
        let _ = writeln!(out, "    - {item}");
    }
    if items.len() > MAX_LIST_ITEMS {
        let _ = writeln!(out, "    ... and {} more", items.len() - MAX_LIST_ITEMS);
    }
}
