pub mod dto;
pub mod projector;

pub use dto::{CardView, NoticeKind, PingDetail, RenderOp, SectionId, UserNotice};
pub use projector::SectionProjector;
