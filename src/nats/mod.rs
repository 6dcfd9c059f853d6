pub mod client;
pub mod messages;

pub use client::{export_subject, NatsClient, NatsShare};
pub use messages::ExportMessage;
