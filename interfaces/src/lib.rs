pub mod defs;
pub mod membership;
pub mod policy;
pub mod watermark;

pub use defs::{
    Detection, Entry, FeedEndpoint, FeedMemory, NO_LINK, NoveltyDetector, SeenState, UNTITLED,
    feed_identity,
};
pub use membership::MembershipDetector;
pub use policy::NoveltyPolicy;
pub use watermark::WatermarkDetector;
