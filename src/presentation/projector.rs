use super::dto::{CardView, RenderOp, SectionId};
use crate::domain::entities::{CaseRecord, StoreDiff};
use crate::domain::value_objects::{Actor, CaseStatus, Collection};

/// Turns store diffs into the minimal set of per-section render operations.
/// Unaffected cards are never touched, so the shell keeps scroll position,
/// focus, and half-typed comments intact.
#[derive(Debug, Clone)]
pub struct SectionProjector {
    local_actor: Actor,
}

impl SectionProjector {
    pub fn new(local_actor: Actor) -> Self {
        Self { local_actor }
    }

    /// Section a record renders into, or None when it is not shown.
    /// Classification is per collection: a completed case leaving the active
    /// list is a removal there, not a move.
    pub fn classify(collection: Collection, record: &CaseRecord) -> Option<SectionId> {
        match collection {
            Collection::ActiveClaims => match record.status {
                CaseStatus::Active => Some(SectionId::Active),
                _ => None,
            },
            Collection::CompletedClaims => match record.status {
                CaseStatus::Complete => Some(SectionId::Completed),
                _ => None,
            },
            Collection::ReviewedClaims => match record.status {
                CaseStatus::PingedLow | CaseStatus::PingedMed | CaseStatus::PingedHigh => {
                    Some(SectionId::PingsPending)
                }
                CaseStatus::Acknowledged => Some(SectionId::PingsAcknowledged),
                CaseStatus::Resolved => Some(SectionId::PingsResolved),
                _ => None,
            },
        }
    }

    pub fn project(&self, diff: &StoreDiff) -> Vec<RenderOp> {
        let mut ops = Vec::with_capacity(diff.len());
        let collection = diff.collection;

        for record in &diff.added {
            if let Some(section) = Self::classify(collection, record) {
                ops.push(RenderOp::Insert {
                    section,
                    card: self.card(record),
                });
            }
        }

        for change in &diff.updated {
            let before = Self::classify(collection, &change.before);
            let after = Self::classify(collection, &change.after);
            match (before, after) {
                (None, None) => {}
                (None, Some(section)) => ops.push(RenderOp::Insert {
                    section,
                    card: self.card(&change.after),
                }),
                (Some(section), None) => ops.push(RenderOp::Remove {
                    section,
                    key: change.before.key.to_string(),
                }),
                (Some(old), Some(new)) if old == new => ops.push(RenderOp::Update {
                    section: new,
                    card: self.card(&change.after),
                }),
                (Some(old), Some(new)) => {
                    ops.push(RenderOp::Remove {
                        section: old,
                        key: change.before.key.to_string(),
                    });
                    ops.push(RenderOp::Insert {
                        section: new,
                        card: self.card(&change.after),
                    });
                }
            }
        }

        for record in &diff.removed {
            if let Some(section) = Self::classify(collection, record) {
                ops.push(RenderOp::Remove {
                    section,
                    key: record.key.to_string(),
                });
            }
        }

        ops
    }

    fn card(&self, record: &CaseRecord) -> CardView {
        CardView::from_record(record, &self.local_actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RecordChange;
    use crate::domain::value_objects::CaseKey;
    use serde_json::json;

    fn actor(name: &str) -> Actor {
        Actor::new(name.to_string()).unwrap()
    }

    fn record(key: &str, status: CaseStatus) -> CaseRecord {
        CaseRecord::new(
            CaseKey::new(key.to_string()).unwrap(),
            status,
            json!({"casenum": key}),
        )
    }

    fn projector() -> SectionProjector {
        SectionProjector::new(actor("alice"))
    }

    #[test]
    fn test_added_active_records_render_into_active_section() {
        let mut diff = StoreDiff::empty(Collection::ActiveClaims);
        diff.added.push(record("C100", CaseStatus::Active));
        diff.added.push(record("C200", CaseStatus::Active));

        let ops = projector().project(&diff);
        assert_eq!(ops.len(), 2);
        for op in &ops {
            match op {
                RenderOp::Insert { section, .. } => assert_eq!(*section, SectionId::Active),
                other => panic!("unexpected op: {:?}", other),
            }
        }
    }

    #[test]
    fn test_status_change_within_section_is_an_update() {
        let mut diff = StoreDiff::empty(Collection::ReviewedClaims);
        diff.updated.push(RecordChange {
            before: record("17", CaseStatus::PingedLow),
            after: record("17", CaseStatus::PingedHigh),
        });

        let ops = projector().project(&diff);
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RenderOp::Update { section: SectionId::PingsPending, .. }
        ));
    }

    #[test]
    fn test_section_move_emits_remove_then_insert() {
        let mut diff = StoreDiff::empty(Collection::ReviewedClaims);
        diff.updated.push(RecordChange {
            before: record("17", CaseStatus::PingedMed),
            after: record("17", CaseStatus::Acknowledged),
        });

        let ops = projector().project(&diff);
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            RenderOp::Remove { section: SectionId::PingsPending, .. }
        ));
        assert!(matches!(
            &ops[1],
            RenderOp::Insert { section: SectionId::PingsAcknowledged, .. }
        ));
    }

    #[test]
    fn test_record_leaving_all_sections_is_removed_once() {
        let mut diff = StoreDiff::empty(Collection::ReviewedClaims);
        diff.updated.push(RecordChange {
            before: record("17", CaseStatus::Acknowledged),
            after: record("17", CaseStatus::Unpinged),
        });

        let ops = projector().project(&diff);
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RenderOp::Remove { section: SectionId::PingsAcknowledged, .. }
        ));
    }

    #[test]
    fn test_unknown_status_renders_nowhere() {
        let mut diff = StoreDiff::empty(Collection::ActiveClaims);
        diff.added.push(record("C300", CaseStatus::Other("escalated".into())));
        assert!(projector().project(&diff).is_empty());
    }

    #[test]
    fn test_completed_case_drops_out_of_the_active_list() {
        let mut diff = StoreDiff::empty(Collection::ActiveClaims);
        diff.updated.push(RecordChange {
            before: record("C100", CaseStatus::Active),
            after: record("C100", CaseStatus::Complete),
        });

        let ops = projector().project(&diff);
        assert_eq!(
            ops,
            vec![RenderOp::Remove {
                section: SectionId::Active,
                key: "C100".to_string(),
            }]
        );
    }

    #[test]
    fn test_cards_are_not_actionable_when_locked_by_someone_else() {
        let mut locked = record("17", CaseStatus::PingedHigh);
        locked.owner = Some(actor("bob"));
        let mut diff = StoreDiff::empty(Collection::ReviewedClaims);
        diff.added.push(locked);

        let ops = projector().project(&diff);
        match &ops[0] {
            RenderOp::Insert { card, .. } => {
                assert!(!card.actionable);
                assert_eq!(card.owner.as_deref(), Some("bob"));
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }
}
