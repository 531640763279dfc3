#![allow(unused_imports)]

pub mod entities;
pub mod sync;
pub mod value_objects;

pub use entities::{
    CaseRecord, ChannelEvent, EventVerb, MutationDraft, RecordChange, StoreDiff, WriteOrigin,
};
pub use sync::{can_act, CaseStore, Upsert};
pub use value_objects::{Actor, CaseKey, CaseStatus, Collection, MutationAction, PingSeverity, Role};
