//! Document types shared with the note store.
//!
//! Field names serialize in camelCase so documents round-trip through the
//! store unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::follow_up::FollowUp;
use crate::ids::IdSource;

/// What a text block holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Note,
    Script,
    FollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextKind {
    PracticeGap,
    Issue,
}

/// Cross-reference annotation attached to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRef {
    pub kind: ContextKind,
    pub id: String,
    pub label: String,
}

/// One line of a note section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEntryBlock {
    pub id: String,
    #[serde(rename = "type", default)]
    pub block_type: BlockType,
    #[serde(default)]
    pub context: Vec<ContextRef>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub html: String,
}

impl TextEntryBlock {
    pub fn note(id: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            block_type: BlockType::Note,
            context: Vec::new(),
            html: value.clone(),
            value,
        }
    }

    /// Empty note block used to keep a section non-empty.
    pub fn placeholder(ids: &dyn IdSource) -> Self {
        Self::note(ids.next_id(), "")
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn has_ref(&self, kind: ContextKind, id: &str) -> bool {
        self.context.iter().any(|r| r.kind == kind && r.id == id)
    }
}

/// Re-insert a placeholder block if `section` has been emptied.
pub fn ensure_placeholder(
    mut section: Vec<TextEntryBlock>,
    ids: &dyn IdSource,
) -> Vec<TextEntryBlock> {
    if section.is_empty() {
        section.push(TextEntryBlock::placeholder(ids));
    }
    section
}

/// The three CAP sections of an issue or weekly note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Context,
    Assessment,
    Plan,
}

/// One week's record of a problem a student is facing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueObject {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub project: String,
    #[serde(default)]
    pub sig: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub was_deleted: bool,
    #[serde(default)]
    pub was_merged: bool,
    #[serde(default)]
    pub merge_target: Option<String>,
    #[serde(default)]
    pub context: Vec<TextEntryBlock>,
    #[serde(default)]
    pub assessment: Vec<TextEntryBlock>,
    #[serde(default)]
    pub plan: Vec<TextEntryBlock>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,
    /// Ancestor issue ids, most recent first.
    #[serde(default)]
    pub prior_instances: Vec<String>,
}

impl IssueObject {
    /// A fresh issue with one placeholder block per section.
    pub fn new(
        title: impl Into<String>,
        project: impl Into<String>,
        sig: impl Into<String>,
        date: NaiveDate,
        now: DateTime<Utc>,
        ids: &dyn IdSource,
    ) -> Self {
        Self {
            id: ids.next_id(),
            title: title.into(),
            date,
            project: project.into(),
            sig: sig.into(),
            last_updated: now,
            was_deleted: false,
            was_merged: false,
            merge_target: None,
            context: vec![TextEntryBlock::placeholder(ids)],
            assessment: vec![TextEntryBlock::placeholder(ids)],
            plan: vec![TextEntryBlock::placeholder(ids)],
            follow_ups: Vec::new(),
            prior_instances: Vec::new(),
        }
    }

    pub fn section(&self, section: Section) -> &[TextEntryBlock] {
        match section {
            Section::Context => &self.context,
            Section::Assessment => &self.assessment,
            Section::Plan => &self.plan,
        }
    }

    /// Neither soft-deleted nor merged into another issue.
    pub fn is_active(&self) -> bool {
        !self.was_deleted && !self.was_merged
    }
}

/// A recurring self-regulation gap linked across many issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeGapObject {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub project: String,
    #[serde(default)]
    pub sig: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub practice_inactive: bool,
    #[serde(default)]
    pub practice_archived: bool,
    /// Issues this gap has been observed in. Append-only.
    #[serde(default)]
    pub prev_issues: Vec<String>,
}

impl PracticeGapObject {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        project: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            project: project.into(),
            sig: String::new(),
            last_updated: now,
            practice_inactive: false,
            practice_archived: false,
            prev_issues: Vec::new(),
        }
    }

    pub fn set_inactive(mut self, inactive: bool, now: DateTime<Utc>) -> Self {
        self.practice_inactive = inactive;
        self.last_updated = now;
        self
    }

    pub fn archive(mut self, now: DateTime<Utc>) -> Self {
        self.practice_archived = true;
        self.last_updated = now;
        self
    }
}

/// Project, date and SIG a new weekly note is created for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteHeader {
    pub project: String,
    pub date: NaiveDate,
    pub sig_name: String,
    pub sig_abbreviation: String,
}

/// Weekly CAP note for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyNote {
    pub project: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub sig_name: String,
    #[serde(default)]
    pub sig_abbreviation: String,
    #[serde(default)]
    pub context: Vec<TextEntryBlock>,
    #[serde(default)]
    pub assessment: Vec<TextEntryBlock>,
    #[serde(default)]
    pub plan: Vec<TextEntryBlock>,
    /// Frozen at creation.
    #[serde(default)]
    pub past_issues: Vec<String>,
    #[serde(default)]
    pub current_issues: Vec<String>,
    #[serde(default)]
    pub tracked_practices: Vec<String>,
}
