pub mod lock;
pub mod store;

pub use lock::can_act;
pub use store::{CaseStore, Upsert};
