pub mod contractors;
pub mod conversations;
pub mod managers;
pub mod messages;
pub mod notifications;
pub mod profiles;
pub mod read_receipts;
