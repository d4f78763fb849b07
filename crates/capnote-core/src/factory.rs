//! Builds follow-ups from an issue's tagged plan lines.

use tracing::debug;

use crate::catalog;
use crate::follow_up::{FollowUp, Outcome, ParsedPractice};
use crate::formatter::{self, PracticeText, Roster};
use crate::model::IssueObject;
use crate::tag::parse_tag;

/// A follow-up together with the full text handed to the messaging side.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpDraft {
    /// Plan block the follow-up came from.
    pub block_id: String,
    pub follow_up: FollowUp,
    pub text: PracticeText,
}

pub struct FollowUpFactory<'a> {
    roster: &'a dyn Roster,
}

impl<'a> FollowUpFactory<'a> {
    pub fn new(roster: &'a dyn Roster) -> Self {
        Self { roster }
    }

    /// Follow-up for a single plan line, if it carries a complete tag.
    pub fn build_one(&self, line: &str) -> Option<(FollowUp, PracticeText)> {
        let tag = parse_tag(line)?;
        let text = formatter::format(&tag, self.roster);
        let sets = catalog::questions_for(&tag.kind, &text.person);

        let follow_up = FollowUp {
            practice: line.trim().to_string(),
            parsed_practice: ParsedPractice {
                practice: text.practice.clone(),
                opportunity: text.opportunity.clone(),
                person: text.person.clone(),
                reflection_questions: sets.all_prompts(),
            },
            outcome: Outcome::pending(&sets),
        };
        Some((follow_up, text))
    }

    /// Drafts for every tagged plan block, in plan order.
    pub fn build_drafts(&self, issue: &IssueObject) -> Vec<FollowUpDraft> {
        let drafts: Vec<FollowUpDraft> = issue
            .plan
            .iter()
            .filter_map(|block| {
                self.build_one(&block.value)
                    .map(|(follow_up, text)| FollowUpDraft {
                        block_id: block.id.clone(),
                        follow_up,
                        text,
                    })
            })
            .collect();
        debug!(
            issue_id = %issue.id,
            plan_lines = issue.plan.len(),
            follow_ups = drafts.len(),
            "built follow-ups"
        );
        drafts
    }

    pub fn build_follow_ups(&self, issue: &IssueObject) -> Vec<FollowUp> {
        self.build_drafts(issue)
            .into_iter()
            .map(|d| d.follow_up)
            .collect()
    }
}

/// Carry recorded outcomes from `prior` onto `rebuilt`.
///
/// Each rebuilt follow-up takes the outcome of the first unused prior
/// follow-up with the same `practice` text, so repeated identical lines pair
/// up in order. Unmatched follow-ups keep their fresh outcome.
pub fn merge_outcomes(prior: &[FollowUp], rebuilt: Vec<FollowUp>) -> Vec<FollowUp> {
    let mut used = vec![false; prior.len()];
    let mut carried = 0usize;

    let merged = rebuilt
        .into_iter()
        .map(|mut fu| {
            let found = (0..prior.len())
                .find(|&i| !used[i] && prior[i].practice.trim() == fu.practice.trim());
            if let Some(i) = found {
                used[i] = true;
                carried += 1;
                fu.outcome = prior[i].outcome.clone();
            }
            fu
        })
        .collect();

    debug!(carried, dropped = prior.len() - carried, "merged follow-up outcomes");
    merged
}
