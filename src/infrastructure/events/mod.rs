//! Event Publishing - WebSocket 事件推送

mod publisher;

pub use publisher::EventPublisher;
