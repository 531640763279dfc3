pub mod actor;
pub mod case_key;
pub mod case_status;
pub mod collection;
pub mod mutation;
pub mod role;

pub use actor::Actor;
pub use case_key::CaseKey;
pub use case_status::{CaseStatus, PingSeverity};
pub use collection::Collection;
pub use mutation::{MutationAction, OwnerEffect};
pub use role::Role;
