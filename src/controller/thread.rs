//! Message list of one conversation, including messages that are still on
//! their way to the server.

use crate::models::messages::Message;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Shown optimistically under a client-generated id.
    Pending { temp_id: Uuid },
    /// Stored by the server under `message_id`.
    Confirmed { message_id: Uuid },
    /// Rejected; the entry is no longer part of the thread.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub message: Message,
    pub delivery: DeliveryState,
}

impl ThreadEntry {
    pub fn confirmed(message: Message) -> Self {
        let delivery = DeliveryState::Confirmed {
            message_id: message.id,
        };
        Self { message, delivery }
    }

    pub fn pending(message: Message) -> Self {
        let delivery = DeliveryState::Pending {
            temp_id: message.id,
        };
        Self { message, delivery }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.delivery, DeliveryState::Pending { .. })
    }
}

#[derive(Debug)]
pub enum ThreadAction {
    /// Replaces the thread with server history, keeping pending entries.
    Loaded(Vec<Message>),
    Append(ThreadEntry),
    Confirm { temp_id: Uuid, confirmed: Message },
    Fail { temp_id: Uuid },
    MarkRead { viewer_id: Uuid },
}

#[derive(Debug, Default, Clone)]
pub struct Thread {
    entries: Vec<ThreadEntry>,
}

impl Thread {
    #[cfg(test)]
    pub fn from_history(messages: Vec<Message>) -> Self {
        let mut thread = Self::default();
        thread.apply(ThreadAction::Loaded(messages));
        thread
    }

    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position_of(&self, temp_id: Uuid) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.delivery == DeliveryState::Pending { temp_id })
    }

    /// Applies one transition. Returns the entry that left the thread when the
    /// action was a `Fail`, with its delivery state set to `Failed`.
    pub fn apply(&mut self, action: ThreadAction) -> Option<ThreadEntry> {
        match action {
            ThreadAction::Loaded(messages) => {
                let pending: Vec<ThreadEntry> = self
                    .entries
                    .drain(..)
                    .filter(ThreadEntry::is_pending)
                    .collect();
                self.entries = messages.into_iter().map(ThreadEntry::confirmed).collect();
                self.entries.extend(pending);
                None
            }
            ThreadAction::Append(entry) => {
                self.entries.push(entry);
                None
            }
            ThreadAction::Confirm { temp_id, confirmed } => {
                // The confirmed message may already have arrived with a reload.
                if self
                    .entries
                    .iter()
                    .any(|e| e.delivery == DeliveryState::Confirmed { message_id: confirmed.id })
                {
                    if let Some(index) = self.position_of(temp_id) {
                        self.entries.remove(index);
                    }
                    return None;
                }
                if let Some(entry) = self
                    .position_of(temp_id)
                    .and_then(|index| self.entries.get_mut(index))
                {
                    *entry = ThreadEntry::confirmed(confirmed);
                }
                None
            }
            ThreadAction::Fail { temp_id } => {
                let index = self.position_of(temp_id)?;
                let mut entry = self.entries.remove(index);
                entry.delivery = DeliveryState::Failed;
                Some(entry)
            }
            ThreadAction::MarkRead { viewer_id } => {
                for entry in self.entries.iter_mut() {
                    if entry.message.sender_id != viewer_id {
                        entry.message.read = true;
                    }
                }
                None
            }
        }
    }
}
