pub mod case_record;
pub mod channel_event;
pub mod diff;
pub mod mutation;

pub use case_record::{CaseRecord, WriteOrigin};
pub use channel_event::{ChannelEvent, EventVerb};
pub use diff::{RecordChange, StoreDiff};
pub use mutation::MutationDraft;
