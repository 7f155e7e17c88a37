pub mod attachments;
pub mod chat;
pub mod thread;

pub use chat::{ChatController, ChatPhase, Notice, NoticeKind, Screen};
