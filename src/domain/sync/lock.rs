use crate::domain::entities::CaseRecord;
use crate::domain::value_objects::Actor;

/// Whether `local_actor` may mutate the record. True when the record is
/// unlocked or the lock is held by the local actor. Pure check over store
/// state; the server remains the source of truth and may still reject.
pub fn can_act(record: &CaseRecord, local_actor: &Actor) -> bool {
    match &record.owner {
        None => true,
        Some(owner) => owner == local_actor,
    }
}
