pub mod conversations;
pub mod events;
pub mod messages;
pub mod notifications;
pub mod quote_requests;
pub mod users;
