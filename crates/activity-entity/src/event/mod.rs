//! Inbound notification envelope and topic parsing.

pub mod envelope;
pub mod topic;

pub use envelope::{EventDetail, EventEnvelope, InboundEvent, InboundEventKind};
pub use topic::{Topic, TopicKind};
