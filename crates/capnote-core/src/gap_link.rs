//! Links assessment lines to the practice gaps they name.
//!
//! An assessment line names a gap when its text, after an optional leading
//! `[practice gap]` marker, equals the gap's title exactly (case-sensitive,
//! surrounding whitespace ignored). A match annotates the line with a
//! reference to the gap and records the issue in the gap's `prev_issues`.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::{DuplicateLinkPolicy, EngineConfig};
use crate::model::{ContextKind, ContextRef, IssueObject, PracticeGapObject};
use crate::tag::split_marker;

/// One assessment line matched to one gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapLink {
    pub block_id: String,
    pub gap_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GapLinkResult {
    pub issue: IssueObject,
    pub gaps: Vec<PracticeGapObject>,
    pub links: Vec<GapLink>,
}

pub struct PracticeGapLinker {
    policy: DuplicateLinkPolicy,
    marker: String,
    skip_archived: bool,
}

impl PracticeGapLinker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            policy: config.duplicate_links,
            marker: config.gap_marker.clone(),
            skip_archived: config.skip_archived_gaps,
        }
    }

    /// Text an assessment line would be matched on.
    pub fn gap_title<'v>(&self, value: &'v str) -> &'v str {
        match split_marker(value) {
            Some(m)
                if m.prefix.trim().is_empty()
                    && m.label.trim().eq_ignore_ascii_case(&self.marker) =>
            {
                m.rest.trim()
            }
            _ => value.trim(),
        }
    }

    /// Cross-link `issue`'s assessment lines with `known_gaps`.
    ///
    /// Inputs are left untouched; the updated issue and the full, updated gap
    /// list come back in the result. Gaps with no match are returned as-is.
    pub fn link_assessments(
        &self,
        issue: &IssueObject,
        known_gaps: &[PracticeGapObject],
        now: DateTime<Utc>,
    ) -> GapLinkResult {
        let mut issue = issue.clone();
        let mut gaps = known_gaps.to_vec();
        let mut links = Vec::new();
        let issue_id = issue.id.clone();

        for block in issue.assessment.iter_mut() {
            let title = self.gap_title(&block.value).to_string();
            if title.is_empty() {
                continue;
            }

            for gap in gaps.iter_mut() {
                if self.skip_archived && gap.practice_archived {
                    continue;
                }
                if gap.title.trim() != title {
                    continue;
                }

                let dedupe = self.policy == DuplicateLinkPolicy::Dedupe;
                if !(dedupe && block.has_ref(ContextKind::PracticeGap, &gap.id)) {
                    block.context.push(ContextRef {
                        kind: ContextKind::PracticeGap,
                        id: gap.id.clone(),
                        label: gap.title.clone(),
                    });
                }
                if dedupe && gap.prev_issues.contains(&issue_id) {
                    debug!(gap_id = %gap.id, issue_id = %issue_id, "issue already linked to gap");
                } else {
                    gap.prev_issues.push(issue_id.clone());
                    gap.last_updated = now;
                }

                links.push(GapLink {
                    block_id: block.id.clone(),
                    gap_id: gap.id.clone(),
                });
            }
        }

        info!(issue_id = %issue_id, links = links.len(), "linked practice gaps");
        GapLinkResult {
            issue,
            gaps,
            links,
        }
    }
}
