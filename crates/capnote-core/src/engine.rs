//! Weekly-note workflow: start a note, then finalize its issues.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{CapnoteError, Result};
use crate::factory::{FollowUpDraft, FollowUpFactory, merge_outcomes};
use crate::formatter::Roster;
use crate::gap_link::{GapLink, PracticeGapLinker};
use crate::ids::IdSource;
use crate::lineage::{self, IssueLookup};
use crate::model::{
    IssueObject, NoteHeader, PracticeGapObject, TextEntryBlock, WeeklyNote, ensure_placeholder,
};

/// A newly created weekly note and the issues it carried forward.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedNote {
    pub note: WeeklyNote,
    pub past_issues: Vec<IssueObject>,
}

/// Result of finalizing one issue.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedIssue {
    pub issue: IssueObject,
    /// All known gaps, with new links applied.
    pub gaps: Vec<PracticeGapObject>,
    pub links: Vec<GapLink>,
    /// Follow-ups with their outgoing text, in plan order.
    pub drafts: Vec<FollowUpDraft>,
}

pub struct NoteEngine<'a> {
    config: EngineConfig,
    roster: &'a dyn Roster,
    ids: &'a dyn IdSource,
}

impl<'a> NoteEngine<'a> {
    pub fn new(config: EngineConfig, roster: &'a dyn Roster, ids: &'a dyn IdSource) -> Self {
        Self {
            config,
            roster,
            ids,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create the note for `header`, carrying issues and tracked practices
    /// over from `previous`.
    pub fn start_weekly_note(
        &self,
        previous: Option<&WeeklyNote>,
        lookup: &dyn IssueLookup,
        header: NoteHeader,
    ) -> Result<StartedNote> {
        let previous = previous.filter(|prev| {
            let same = prev.project == header.project;
            if !same {
                warn!(
                    previous = %prev.project,
                    project = %header.project,
                    "previous note belongs to another project, ignoring"
                );
            }
            same
        });

        if let Some(prev) = previous
            && header.date <= prev.date
        {
            return Err(CapnoteError::NoteOutOfOrder {
                project: header.project,
                date: header.date,
                previous: prev.date,
            });
        }

        let past_issues = previous
            .map(|prev| lineage::compute_carry_forward(prev, lookup))
            .unwrap_or_default();
        let tracked_practices = previous
            .map(|prev| prev.tracked_practices.clone())
            .unwrap_or_default();

        let note = WeeklyNote {
            project: header.project,
            date: header.date,
            sig_name: header.sig_name,
            sig_abbreviation: header.sig_abbreviation,
            context: self.fresh_section(),
            assessment: self.fresh_section(),
            plan: self.fresh_section(),
            past_issues: past_issues.iter().map(|i| i.id.clone()).collect(),
            current_issues: Vec::new(),
            tracked_practices,
        };
        info!(
            project = %note.project,
            date = %note.date,
            past_issues = note.past_issues.len(),
            tracked_practices = note.tracked_practices.len(),
            "started weekly note"
        );
        Ok(StartedNote { note, past_issues })
    }

    /// New instance of a past issue for the week of `date`.
    pub fn carry_issue_forward(
        &self,
        prior: &IssueObject,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<IssueObject> {
        lineage::create_issue_from_prior(prior, date, now, self.ids)
    }

    /// Rebuild follow-ups and practice-gap links for `issue`.
    pub fn finalize_issue(
        &self,
        issue: &IssueObject,
        known_gaps: &[PracticeGapObject],
        now: DateTime<Utc>,
    ) -> Result<FinalizedIssue> {
        lineage::validate_lineage(issue)?;

        let mut issue = issue.clone();
        if self.config.placeholder_sections {
            issue.context = ensure_placeholder(issue.context, self.ids);
            issue.assessment = ensure_placeholder(issue.assessment, self.ids);
            issue.plan = ensure_placeholder(issue.plan, self.ids);
        }

        let factory = FollowUpFactory::new(self.roster);
        let mut drafts = factory.build_drafts(&issue);
        let rebuilt: Vec<_> = drafts.iter().map(|d| d.follow_up.clone()).collect();
        let follow_ups = if self.config.merge_outcomes {
            merge_outcomes(&issue.follow_ups, rebuilt)
        } else {
            rebuilt
        };
        for (draft, fu) in drafts.iter_mut().zip(&follow_ups) {
            draft.follow_up = fu.clone();
        }
        issue.follow_ups = follow_ups;

        let linked = PracticeGapLinker::new(&self.config).link_assessments(&issue, known_gaps, now);
        let mut issue = linked.issue;
        issue.last_updated = now;

        info!(
            issue_id = %issue.id,
            follow_ups = issue.follow_ups.len(),
            gap_links = linked.links.len(),
            "finalized issue"
        );
        Ok(FinalizedIssue {
            issue,
            gaps: linked.gaps,
            links: linked.links,
            drafts,
        })
    }

    fn fresh_section(&self) -> Vec<TextEntryBlock> {
        if self.config.placeholder_sections {
            vec![TextEntryBlock::placeholder(self.ids)]
        } else {
            Vec::new()
        }
    }
}
