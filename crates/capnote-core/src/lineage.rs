//! Week-over-week identity of issues.
//!
//! An issue is re-created each week it stays relevant. The new instance
//! records its ancestors in `prior_instances`, most recent first, by
//! prepending the previous instance to that instance's own chain. Ancestors
//! are never edited, so a chain cannot loop unless a document was corrupted
//! outside the engine; [`validate_lineage`] catches that case.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::error::{CapnoteError, Result};
use crate::ids::IdSource;
use crate::model::{IssueObject, TextEntryBlock, WeeklyNote};

/// Read access to stored issues by id.
pub trait IssueLookup {
    fn issue(&self, id: &str) -> Option<IssueObject>;
}

impl IssueLookup for HashMap<String, IssueObject> {
    fn issue(&self, id: &str) -> Option<IssueObject> {
        self.get(id).cloned()
    }
}

impl IssueLookup for [IssueObject] {
    fn issue(&self, id: &str) -> Option<IssueObject> {
        self.iter().find(|i| i.id == id).cloned()
    }
}

impl IssueLookup for Vec<IssueObject> {
    fn issue(&self, id: &str) -> Option<IssueObject> {
        self.as_slice().issue(id)
    }
}

/// Issues from the previous note that carry into the next one.
///
/// Keeps the previous note's current issues that are neither deleted nor
/// merged, in their original order.
pub fn compute_carry_forward(previous: &WeeklyNote, lookup: &dyn IssueLookup) -> Vec<IssueObject> {
    let mut carried = Vec::with_capacity(previous.current_issues.len());
    for id in &previous.current_issues {
        let Some(issue) = lookup.issue(id) else {
            warn!(issue_id = %id, project = %previous.project, "current issue not found, skipping");
            continue;
        };
        if issue.is_active() {
            carried.push(issue);
        } else {
            debug!(
                issue_id = %id,
                deleted = issue.was_deleted,
                merged = issue.was_merged,
                "issue not carried forward"
            );
        }
    }
    carried
}

/// New instance of `prior` for the week of `new_date`.
pub fn create_issue_from_prior(
    prior: &IssueObject,
    new_date: NaiveDate,
    now: DateTime<Utc>,
    ids: &dyn IdSource,
) -> Result<IssueObject> {
    let mut prior_instances = Vec::with_capacity(prior.prior_instances.len() + 1);
    prior_instances.push(prior.id.clone());
    prior_instances.extend(prior.prior_instances.iter().cloned());

    let issue = IssueObject {
        id: ids.next_id(),
        title: prior.title.clone(),
        date: new_date,
        project: prior.project.clone(),
        sig: prior.sig.clone(),
        last_updated: now,
        was_deleted: false,
        was_merged: false,
        merge_target: None,
        context: vec![TextEntryBlock::placeholder(ids)],
        assessment: vec![TextEntryBlock::placeholder(ids)],
        plan: vec![TextEntryBlock::placeholder(ids)],
        follow_ups: Vec::new(),
        prior_instances,
    };
    validate_lineage(&issue)?;
    debug!(
        issue_id = %issue.id,
        prior_id = %prior.id,
        depth = issue.prior_instances.len(),
        "issue carried into new week"
    );
    Ok(issue)
}

/// Mark `issue` deleted. The document itself is kept so lineages still resolve.
pub fn soft_delete(issue: &IssueObject, now: DateTime<Utc>) -> IssueObject {
    IssueObject {
        was_deleted: true,
        last_updated: now,
        ..issue.clone()
    }
}

/// Mark `issue` as merged into `target_id`.
pub fn merge_into(issue: &IssueObject, target_id: &str, now: DateTime<Utc>) -> Result<IssueObject> {
    if issue.id == target_id {
        return Err(CapnoteError::SelfMerge(issue.id.clone()));
    }
    Ok(IssueObject {
        was_merged: true,
        merge_target: Some(target_id.to_string()),
        last_updated: now,
        ..issue.clone()
    })
}

/// Check the lineage and merge invariants of a single issue.
pub fn validate_lineage(issue: &IssueObject) -> Result<()> {
    if issue.was_merged && issue.merge_target.is_none() {
        return Err(CapnoteError::MergeWithoutTarget(issue.id.clone()));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(issue.prior_instances.len() + 1);
    seen.insert(issue.id.as_str());
    for id in &issue.prior_instances {
        if !seen.insert(id.as_str()) {
            return Err(CapnoteError::LineageCycle {
                issue_id: issue.id.clone(),
                repeated: id.clone(),
            });
        }
    }
    Ok(())
}

/// Load the ancestors of `issue`, most recent first.
///
/// Deleted ancestors are included; ids the store can't find are skipped. A
/// chain that fails [`validate_lineage`] is rejected before any lookup.
pub fn resolve_lineage(
    issue: &IssueObject,
    lookup: &dyn IssueLookup,
) -> Result<Vec<IssueObject>> {
    validate_lineage(issue)?;
    Ok(issue
        .prior_instances
        .iter()
        .filter_map(|id| {
            let found = lookup.issue(id);
            if found.is_none() {
                warn!(issue_id = %issue.id, ancestor = %id, "ancestor issue not found");
            }
            found
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, 10, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn issue(id: &str) -> IssueObject {
        let ids = SequentialIds::new(format!("{id}-blk"));
        let mut issue = IssueObject::new(format!("Issue {id}"), "ovc", "CE", day(1), now(), &ids);
        issue.id = id.to_string();
        issue
    }

    fn note_with(current: &[&str]) -> WeeklyNote {
        WeeklyNote {
            project: "ovc".into(),
            date: day(1),
            sig_name: "Collective Experiences".into(),
            sig_abbreviation: "CE".into(),
            context: Vec::new(),
            assessment: Vec::new(),
            plan: Vec::new(),
            past_issues: Vec::new(),
            current_issues: current.iter().map(|s| s.to_string()).collect(),
            tracked_practices: Vec::new(),
        }
    }

    #[test]
    fn carry_forward_drops_deleted_and_merged() {
        let store = vec![
            issue("a"),
            soft_delete(&issue("b"), now()),
            issue("c"),
            merge_into(&issue("d"), "a", now()).unwrap(),
            issue("e"),
        ];
        let carried = compute_carry_forward(&note_with(&["a", "b", "c", "d", "e"]), &store);
        let ids: Vec<&str> = carried.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "e"]);
    }

    #[test]
    fn carry_forward_preserves_note_order() {
        let store: HashMap<String, IssueObject> = ["x", "y", "z"]
            .iter()
            .map(|id| (id.to_string(), issue(id)))
            .collect();
        let carried = compute_carry_forward(&note_with(&["z", "x", "y"]), &store);
        let ids: Vec<&str> = carried.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["z", "x", "y"]);
    }

    #[test]
    fn carry_forward_skips_missing_issues() {
        let store = vec![issue("a")];
        let carried = compute_carry_forward(&note_with(&["ghost", "a"]), &store);
        assert_eq!(carried.len(), 1);
        assert_eq!(carried[0].id, "a");
    }

    #[test]
    fn new_instance_prepends_prior() {
        let ids = SequentialIds::new("new");
        let mut week1 = issue("w1");
        week1.prior_instances = vec!["w0".into()];

        let week2 = create_issue_from_prior(&week1, day(8), now(), &ids).unwrap();
        assert_eq!(week2.prior_instances, ["w1", "w0"]);
        assert_eq!(week2.title, week1.title);
        assert_eq!(week2.date, day(8));
        assert!(week2.follow_ups.is_empty());
        assert_eq!(week2.plan.len(), 1);
        assert!(week2.plan[0].is_blank());
        // ancestor untouched
        assert_eq!(week1.prior_instances, ["w0"]);

        let week3 = create_issue_from_prior(&week2, day(15), now(), &ids).unwrap();
        assert_eq!(week3.prior_instances[0], week2.id);
        assert_eq!(week3.prior_instances.len(), 3);
    }

    #[test]
    fn corrupted_chain_is_rejected() {
        let ids = SequentialIds::new("new");
        let mut looped = issue("w2");
        looped.prior_instances = vec!["w1".into(), "w2".into()];
        assert!(matches!(
            validate_lineage(&looped),
            Err(CapnoteError::LineageCycle { .. })
        ));

        let mut repeated = issue("w3");
        repeated.prior_instances = vec!["w1".into(), "w0".into(), "w1".into()];
        let err = create_issue_from_prior(&repeated, day(8), now(), &ids).unwrap_err();
        match err {
            CapnoteError::LineageCycle { repeated, .. } => assert_eq!(repeated, "w1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn soft_delete_keeps_the_document() {
        let original = issue("a");
        let deleted = soft_delete(&original, now());
        assert!(deleted.was_deleted);
        assert_eq!(deleted.last_updated, now());
        assert_eq!(deleted.plan, original.plan);
        assert!(!original.was_deleted);
    }

    #[test]
    fn merge_sets_target() {
        let merged = merge_into(&issue("a"), "b", now()).unwrap();
        assert!(merged.was_merged);
        assert_eq!(merged.merge_target.as_deref(), Some("b"));
        assert!(validate_lineage(&merged).is_ok());

        assert!(matches!(
            merge_into(&issue("a"), "a", now()),
            Err(CapnoteError::SelfMerge(_))
        ));

        let mut broken = issue("c");
        broken.was_merged = true;
        assert!(matches!(
            validate_lineage(&broken),
            Err(CapnoteError::MergeWithoutTarget(_))
        ));
    }

    #[test]
    fn lineage_resolves_through_deleted_ancestors() {
        let mut current = issue("w3");
        current.prior_instances = vec!["w2".into(), "w1".into(), "gone".into()];
        let store = vec![issue("w1"), soft_delete(&issue("w2"), now())];

        let ancestors = resolve_lineage(&current, &store).unwrap();
        let ids: Vec<&str> = ancestors.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["w2", "w1"]);
        assert!(ancestors[0].was_deleted);
    }

    #[test]
    fn cyclic_chain_is_not_resolved() {
        let mut current = issue("c");
        current.prior_instances = vec!["a".into(), "b".into(), "a".into(), "c".into()];
        let store = vec![issue("a"), issue("b"), issue("c")];

        assert!(matches!(
            resolve_lineage(&current, &store),
            Err(CapnoteError::LineageCycle { ref repeated, .. }) if repeated == "a"
        ));
    }
}
