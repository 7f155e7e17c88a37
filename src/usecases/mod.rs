pub mod conversations;
pub mod directory;
pub mod events;
pub mod messages;
pub mod notifications;
pub mod quote_requests;
pub mod read_receipts;

#[cfg(test)]
pub(crate) mod testing;
