use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::controller::attachments::{
    AttachmentStorage, LocalFile, ObjectUrls, PendingAttachment, PendingAttachments,
};
use crate::controller::thread::{Thread, ThreadAction, ThreadEntry};
use crate::models::conversations::Conversation;
use crate::models::messages::{Message, MessageAttachment, MessageType};
use crate::models::users::Participant;
use crate::usecases::{conversations, messages, read_receipts};
use chrono::Utc;
use hashbrown::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// State of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Error(Notice),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    NoConversationSelected,
    ConversationLoading(Uuid),
    ConversationReady(Uuid),
    Sending(Uuid),
}

impl ChatPhase {
    pub const fn conversation_id(&self) -> Option<Uuid> {
        match self {
            ChatPhase::NoConversationSelected => None,
            ChatPhase::ConversationLoading(id)
            | ChatPhase::ConversationReady(id)
            | ChatPhase::Sending(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    LoadConversationsFailed,
    LoadMessagesFailed,
    SendFailed,
}

impl NoticeKind {
    pub const fn message(&self) -> &'static str {
        match self {
            NoticeKind::LoadConversationsFailed => "We couldn't load your conversations.",
            NoticeKind::LoadMessagesFailed => "We couldn't load this conversation.",
            NoticeKind::SendFailed => "Your message could not be sent. Please try again.",
        }
    }
}

/// A user-facing error. `code` is kept for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub code: &'static str,
}

impl Notice {
    fn new(kind: NoticeKind, error: AppError) -> Self {
        Self {
            kind,
            code: error.code(),
        }
    }
}

/// History fetch detached from the controller, so the caller can keep
/// handling input while it runs.
pub struct HistoryRequest<C> {
    ctx: C,
    conversation_id: Uuid,
    viewer_id: Uuid,
}

pub struct HistoryLoaded {
    conversation_id: Uuid,
    result: ServiceResult<Vec<Message>>,
}

impl<C: Context> HistoryRequest<C> {
    pub async fn fetch(self) -> HistoryLoaded {
        let result = messages::fetch_conversation_messages(
            &self.ctx,
            self.conversation_id,
            Some(self.viewer_id),
        )
        .await;
        HistoryLoaded {
            conversation_id: self.conversation_id,
            result,
        }
    }
}

/// A message already shown optimistically, waiting to be uploaded and stored.
pub struct OutgoingMessage<C> {
    ctx: C,
    storage: Arc<dyn AttachmentStorage>,
    optimistic: Message,
    attachments: Vec<PendingAttachment>,
}

pub struct Delivery {
    optimistic: Message,
    preview_urls: Vec<String>,
    result: ServiceResult<(Uuid, Vec<MessageAttachment>)>,
}

impl<C: Context> OutgoingMessage<C> {
    pub fn temp_id(&self) -> Uuid {
        self.optimistic.id
    }

    pub async fn deliver(self) -> Delivery {
        let conversation_id = self.optimistic.conversation_id;
        let preview_urls = self
            .attachments
            .iter()
            .map(|a| a.preview_url.clone())
            .collect();

        let mut uploaded = Vec::with_capacity(self.attachments.len());
        for attachment in &self.attachments {
            match self.storage.upload(conversation_id, attachment).await {
                Ok(url) => uploaded.push(attachment.with_url(url)),
                Err(e) => {
                    warn!(
                        %conversation_id,
                        attachment = %attachment.file.name,
                        "Failed to upload attachment: {e:?}"
                    );
                    return Delivery {
                        optimistic: self.optimistic,
                        preview_urls,
                        result: Err(AppError::Unexpected),
                    };
                }
            }
        }

        let result = messages::send_message(
            &self.ctx,
            conversation_id,
            self.optimistic.sender_id,
            &self.optimistic.content,
            MessageType::Text,
            uploaded.clone(),
        )
        .await
        .map(|message_id| (message_id, uploaded));
        Delivery {
            optimistic: self.optimistic,
            preview_urls,
            result,
        }
    }
}

/// Client-side state of the messages screen for one signed-in user.
///
/// Every async operation is also available as a begin/finish pair around a
/// detached future (`begin_send` / `OutgoingMessage::deliver` / `finish_send`),
/// which is how a renderer keeps accepting input while requests are in flight.
pub struct ChatController<C, U> {
    ctx: C,
    viewer: Participant,
    urls: U,
    storage: Arc<dyn AttachmentStorage>,
    screen: Screen,
    phase: ChatPhase,
    conversations: Vec<Conversation>,
    threads: HashMap<Uuid, Thread>,
    pending: PendingAttachments,
    notices: VecDeque<Notice>,
    scroll_requested: bool,
    deep_link: Option<Uuid>,
    background: Vec<JoinHandle<()>>,
}

impl<C, U> ChatController<C, U>
where
    C: Context + Clone + 'static,
    U: ObjectUrls,
{
    pub fn new(ctx: C, viewer: Participant, urls: U, storage: Arc<dyn AttachmentStorage>) -> Self {
        Self {
            ctx,
            viewer,
            urls,
            storage,
            screen: Screen::Loading,
            phase: ChatPhase::NoConversationSelected,
            conversations: vec![],
            threads: HashMap::new(),
            pending: PendingAttachments::default(),
            notices: VecDeque::new(),
            scroll_requested: false,
            deep_link: None,
            background: vec![],
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        let id = self.phase.conversation_id()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Messages of the selected conversation, including optimistic ones.
    pub fn messages(&self) -> &[ThreadEntry] {
        self.phase
            .conversation_id()
            .and_then(|id| self.threads.get(&id))
            .map(Thread::entries)
            .unwrap_or_default()
    }

    pub fn pending_attachments(&self) -> &[PendingAttachment] {
        self.pending.items()
    }

    pub fn urls(&self) -> &U {
        &self.urls
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Returns `true` once after the message list changed in a way that
    /// should scroll it to the bottom. Meant to be polled after layout.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub async fn load(&mut self) {
        self.screen = Screen::Loading;
        match conversations::fetch_conversation_summaries(&self.ctx, self.viewer.user_id).await {
            Ok(conversations) => {
                debug!(
                    user_id = %self.viewer.user_id,
                    count = conversations.len(),
                    "Loaded conversations"
                );
                self.conversations = conversations;
                self.screen = Screen::Ready;
                if let Some(conversation_id) = self.deep_link.take() {
                    self.select_conversation(conversation_id).await;
                }
            }
            Err(e) => {
                self.screen = Screen::Error(Notice::new(NoticeKind::LoadConversationsFailed, e));
            }
        }
    }

    pub async fn retry(&mut self) {
        self.load().await
    }

    /// Selects a conversation from a link. Before the list has loaded the
    /// selection is deferred until it has.
    pub async fn open_from_link(&mut self, conversation_id: Uuid) {
        if self.screen == Screen::Ready {
            self.select_conversation(conversation_id).await;
        } else {
            self.deep_link = Some(conversation_id);
        }
    }

    pub async fn select_conversation(&mut self, conversation_id: Uuid) {
        if let Some(request) = self.begin_select(conversation_id) {
            let loaded = request.fetch().await;
            self.finish_select(loaded);
        }
    }

    /// Returns the history fetch to run, or `None` when the history is cached.
    pub fn begin_select(&mut self, conversation_id: Uuid) -> Option<HistoryRequest<C>> {
        self.pending.clear(&mut self.urls);
        self.scroll_requested = true;

        if let Some(thread) = self.threads.get(&conversation_id) {
            let in_flight = thread.entries().iter().any(ThreadEntry::is_pending);
            self.phase = if in_flight {
                ChatPhase::Sending(conversation_id)
            } else {
                ChatPhase::ConversationReady(conversation_id)
            };
            self.mark_read(conversation_id);
            return None;
        }
        self.phase = ChatPhase::ConversationLoading(conversation_id);
        Some(HistoryRequest {
            ctx: self.ctx.clone(),
            conversation_id,
            viewer_id: self.viewer.user_id,
        })
    }

    pub fn finish_select(&mut self, loaded: HistoryLoaded) {
        let HistoryLoaded {
            conversation_id,
            result,
        } = loaded;
        let still_selected = self.phase == ChatPhase::ConversationLoading(conversation_id);
        match result {
            Ok(history) => {
                self.threads
                    .entry(conversation_id)
                    .or_default()
                    .apply(ThreadAction::Loaded(history));
                if still_selected {
                    self.phase = ChatPhase::ConversationReady(conversation_id);
                    self.scroll_requested = true;
                    self.mark_read(conversation_id);
                }
            }
            Err(e) => {
                self.notices
                    .push_back(Notice::new(NoticeKind::LoadMessagesFailed, e));
                if still_selected {
                    self.phase = ChatPhase::NoConversationSelected;
                }
            }
        }
    }

    fn mark_read(&mut self, conversation_id: Uuid) {
        let viewer_id = self.viewer.user_id;
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == conversation_id) {
            conversation.unread_count = 0;
            if let Some(last_message) = conversation.last_message.as_mut() {
                last_message.read = true;
            }
        }
        if let Some(thread) = self.threads.get_mut(&conversation_id) {
            thread.apply(ThreadAction::MarkRead { viewer_id });
        }

        self.background.retain(|handle| !handle.is_finished());
        let ctx = self.ctx.clone();
        self.background.push(tokio::spawn(async move {
            if let Err(e) = read_receipts::mark_messages_as_read(&ctx, conversation_id, viewer_id).await
            {
                warn!(
                    %conversation_id,
                    %viewer_id,
                    code = e.code(),
                    "Failed to mark messages as read"
                );
            }
        }));
    }

    pub fn attach_file(&mut self, file: LocalFile) -> Uuid {
        self.pending.add(&mut self.urls, file)
    }

    pub fn remove_attachment(&mut self, attachment_id: Uuid) -> bool {
        self.pending.remove(&mut self.urls, attachment_id)
    }

    /// Sends a message into the selected conversation. Returns whether the
    /// server accepted it.
    pub async fn send(&mut self, content: &str) -> bool {
        let Some(outgoing) = self.begin_send(content) else {
            return false;
        };
        let delivery = outgoing.deliver().await;
        self.finish_send(delivery)
    }

    /// Shows the message optimistically and hands back the request to run.
    /// `None` when nothing is selected or there is nothing to send.
    pub fn begin_send(&mut self, content: &str) -> Option<OutgoingMessage<C>> {
        let conversation_id = match self.phase {
            ChatPhase::ConversationReady(id) | ChatPhase::Sending(id) => id,
            _ => return None,
        };
        if content.trim().is_empty() && self.pending.is_empty() {
            return None;
        }

        let attachments = self.pending.take();
        let optimistic = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id: self.viewer.user_id,
            sender_name: self.viewer.name.clone(),
            sender_avatar: self.viewer.avatar.clone(),
            content: content.to_string(),
            timestamp: Utc::now(),
            read: false,
            attachments: attachments.iter().map(PendingAttachment::preview).collect(),
            message_type: MessageType::Text,
        };
        self.threads
            .entry(conversation_id)
            .or_default()
            .apply(ThreadAction::Append(ThreadEntry::pending(optimistic.clone())));
        self.phase = ChatPhase::Sending(conversation_id);
        self.scroll_requested = true;

        Some(OutgoingMessage {
            ctx: self.ctx.clone(),
            storage: Arc::clone(&self.storage),
            optimistic,
            attachments,
        })
    }

    pub fn finish_send(&mut self, delivery: Delivery) -> bool {
        let Delivery {
            optimistic,
            preview_urls,
            result,
        } = delivery;
        for url in &preview_urls {
            self.urls.revoke(url);
        }

        let conversation_id = optimistic.conversation_id;
        let temp_id = optimistic.id;
        let thread = self.threads.entry(conversation_id).or_default();
        let accepted = match result {
            Ok((message_id, attachments)) => {
                // Own messages are read from the sender's point of view.
                let confirmed = Message {
                    id: message_id,
                    read: true,
                    attachments,
                    ..optimistic
                };
                thread.apply(ThreadAction::Confirm {
                    temp_id,
                    confirmed: confirmed.clone(),
                });
                info!(%conversation_id, %message_id, "Message sent");
                self.bump_conversation(confirmed);
                true
            }
            Err(e) => {
                thread.apply(ThreadAction::Fail { temp_id });
                self.notices.push_back(Notice::new(NoticeKind::SendFailed, e));
                false
            }
        };

        let in_flight = self
            .threads
            .get(&conversation_id)
            .is_some_and(|t| t.entries().iter().any(ThreadEntry::is_pending));
        if self.phase == ChatPhase::Sending(conversation_id) && !in_flight {
            self.phase = ChatPhase::ConversationReady(conversation_id);
        }
        accepted
    }

    fn bump_conversation(&mut self, message: Message) {
        let Some(index) = self
            .conversations
            .iter()
            .position(|c| c.id == message.conversation_id)
        else {
            return;
        };
        let mut conversation = self.conversations.remove(index);
        conversation.last_message_at = message.timestamp;
        conversation.last_message = Some(message);
        self.conversations.insert(0, conversation);
    }

    /// Releases local previews. Requests already in flight are left to finish.
    pub fn teardown(&mut self) {
        self.pending.clear(&mut self.urls);
    }

    #[cfg(test)]
    fn background_tasks(&self) -> usize {
        self.background.len()
    }

    /// Waits for background work such as read receipts.
    pub async fn settle(&mut self) {
        for handle in self.background.drain(..) {
            if let Err(e) = handle.await {
                warn!("Background task failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::attachments::{BlobUrls, PathStorage};
    use crate::controller::thread::DeliveryState;
    use crate::repositories::MessageRepository;
    use crate::repositories::memory::StoreOperation;
    use crate::usecases::testing::TestContext;
    use crate::usecases::{directory, read_receipts};

    struct Fixture {
        ctx: TestContext,
        alice: Uuid,
        bob: Uuid,
        conversation_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let ctx = TestContext::default();
        let alice = ctx.add_user("Alice", "manager").await;
        let bob = ctx.add_user("Bob", "contractor").await;
        let conversation_id =
            conversations::create_conversation(&ctx, alice, bob, Some("Boiler"), None, None)
                .await
                .unwrap();
        for content in ["Hi Alice", "Are you around?"] {
            messages::send_message(&ctx, conversation_id, bob, content, MessageType::Text, vec![])
                .await
                .unwrap();
        }
        Fixture {
            ctx,
            alice,
            bob,
            conversation_id,
        }
    }

    async fn controller_for(
        ctx: &TestContext,
        user_id: Uuid,
    ) -> ChatController<TestContext, BlobUrls> {
        let viewer = directory::fetch_participant(ctx, user_id)
            .await
            .unwrap()
            .unwrap();
        let storage = Arc::new(PathStorage {
            base_url: "https://files.example.com".to_string(),
        });
        ChatController::new(ctx.clone(), viewer, BlobUrls::default(), storage)
    }

    fn file(name: &str) -> LocalFile {
        LocalFile {
            name: name.to_string(),
            size: 4,
            bytes: vec![0; 4],
        }
    }

    #[tokio::test]
    async fn selecting_loads_history_and_marks_it_read() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        assert_eq!(chat.screen(), &Screen::Ready);
        assert_eq!(chat.conversations()[0].unread_count, 2);

        chat.select_conversation(f.conversation_id).await;
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
        assert_eq!(chat.messages().len(), 2);
        assert!(chat.messages().iter().all(|e| e.message.read));
        assert_eq!(chat.conversations()[0].unread_count, 0);
        assert!(chat.take_scroll_request());
        assert!(!chat.take_scroll_request());

        chat.settle().await;
        let unread = read_receipts::count_unread(&f.ctx, f.conversation_id, f.alice)
            .await
            .unwrap();
        assert_eq!(unread, 0);
    }

    #[tokio::test]
    async fn optimistic_message_is_confirmed_in_place() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        chat.select_conversation(f.conversation_id).await;

        let outgoing = chat.begin_send("X").unwrap();
        let temp_id = outgoing.temp_id();
        assert_eq!(chat.phase(), ChatPhase::Sending(f.conversation_id));
        let last = chat.messages().last().unwrap();
        assert_eq!(last.delivery, DeliveryState::Pending { temp_id });
        assert_eq!(last.message.content, "X");
        assert!(!last.message.read);

        let delivery = outgoing.deliver().await;
        assert!(chat.finish_send(delivery));

        let stored = f.ctx.store().fetch_messages(f.conversation_id).await.unwrap();
        let stored_id = stored.last().unwrap().id;
        let sent: Vec<_> = chat
            .messages()
            .iter()
            .filter(|e| e.message.content == "X")
            .collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message.id, stored_id);
        assert!(sent[0].message.read);
        assert_eq!(
            sent[0].delivery,
            DeliveryState::Confirmed {
                message_id: stored_id
            }
        );
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
        assert_eq!(
            chat.conversations()[0]
                .last_message
                .as_ref()
                .map(|m| m.content.as_str()),
            Some("X")
        );
    }

    #[tokio::test]
    async fn failed_send_is_rolled_back_with_a_notice() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        chat.select_conversation(f.conversation_id).await;
        f.ctx.store.fail_on(StoreOperation::InsertMessage).await;

        assert!(!chat.send("X").await);
        assert!(chat.messages().iter().all(|e| e.message.content != "X"));
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
        let notices = chat.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::SendFailed);
    }

    #[tokio::test]
    async fn nothing_is_sent_without_a_selection_or_content() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        assert!(chat.begin_send("hello").is_none());
        chat.select_conversation(f.conversation_id).await;
        assert!(chat.begin_send("   ").is_none());
        assert_eq!(f.ctx.store.message_count().await, 2);
    }

    #[tokio::test]
    async fn attachments_are_uploaded_and_previews_released() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        chat.select_conversation(f.conversation_id).await;

        let attachment_id = chat.attach_file(file("boiler.jpg"));
        assert_eq!(chat.urls().live_count(), 1);
        assert!(chat.send("").await);
        assert_eq!(chat.urls().live_count(), 0);
        assert!(chat.pending_attachments().is_empty());

        let sent = &chat.messages().last().unwrap().message;
        assert_eq!(sent.attachments.len(), 1);
        assert_eq!(sent.attachments[0].id, attachment_id);
        assert!(sent.attachments[0].url.starts_with("https://files.example.com/"));
    }

    #[tokio::test]
    async fn switching_conversations_revokes_pending_attachments() {
        let f = fixture().await;
        let carol = f.ctx.add_user("Carol", "contractor").await;
        let other = conversations::create_conversation(&f.ctx, f.alice, carol, None, None, None)
            .await
            .unwrap();
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        chat.select_conversation(f.conversation_id).await;

        chat.attach_file(file("a.png"));
        let removed = chat.attach_file(file("b.pdf"));
        assert!(chat.remove_attachment(removed));
        chat.attach_file(file("c.pdf"));
        assert_eq!(chat.urls().live_count(), 2);

        chat.select_conversation(other).await;
        assert_eq!(chat.urls().live_count(), 0);
        assert!(chat.pending_attachments().is_empty());
        assert!(chat.messages().is_empty());

        chat.attach_file(file("d.png"));
        chat.teardown();
        assert_eq!(chat.urls().live_count(), 0);
    }

    #[tokio::test]
    async fn cached_history_skips_the_fetch() {
        let f = fixture().await;
        let carol = f.ctx.add_user("Carol", "contractor").await;
        let other = conversations::create_conversation(&f.ctx, f.alice, carol, None, None, None)
            .await
            .unwrap();
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        chat.select_conversation(f.conversation_id).await;
        chat.select_conversation(other).await;

        f.ctx.store.fail_on(StoreOperation::FetchMessages).await;
        assert!(chat.begin_select(f.conversation_id).is_none());
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
        assert_eq!(chat.messages().len(), 2);
        assert!(chat.take_notices().is_empty());
    }

    #[tokio::test]
    async fn failed_history_returns_to_no_selection() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        f.ctx.store.fail_on(StoreOperation::FetchMessages).await;

        chat.select_conversation(f.conversation_id).await;
        chat.settle().await;
        assert_eq!(chat.phase(), ChatPhase::NoConversationSelected);
        assert_eq!(chat.take_notices()[0].kind, NoticeKind::LoadMessagesFailed);

        // Nothing was shown, so nothing is marked read.
        assert_eq!(chat.conversations()[0].unread_count, 2);
        let unread = read_receipts::count_unread(&f.ctx, f.conversation_id, f.alice)
            .await
            .unwrap();
        assert_eq!(unread, 2);
    }

    #[tokio::test]
    async fn returning_to_a_sending_conversation_keeps_sending() {
        let f = fixture().await;
        let carol = f.ctx.add_user("Carol", "contractor").await;
        let other = conversations::create_conversation(&f.ctx, f.alice, carol, None, None, None)
            .await
            .unwrap();
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        chat.select_conversation(f.conversation_id).await;

        let outgoing = chat.begin_send("On my way").unwrap();
        chat.select_conversation(other).await;
        chat.select_conversation(f.conversation_id).await;
        assert_eq!(chat.phase(), ChatPhase::Sending(f.conversation_id));

        let delivery = outgoing.deliver().await;
        assert!(chat.finish_send(delivery));
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
    }

    #[tokio::test]
    async fn finished_background_tasks_are_released() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        for _ in 0..200 {
            chat.select_conversation(f.conversation_id).await;
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
        }
        assert!(chat.background_tasks() < 10);
        chat.settle().await;
        assert_eq!(chat.background_tasks(), 0);
    }

    #[tokio::test]
    async fn stale_history_does_not_steal_the_selection() {
        let f = fixture().await;
        let carol = f.ctx.add_user("Carol", "contractor").await;
        let other = conversations::create_conversation(&f.ctx, f.alice, carol, None, None, None)
            .await
            .unwrap();
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;

        let slow = chat.begin_select(f.conversation_id).unwrap();
        chat.select_conversation(other).await;
        let loaded = slow.fetch().await;
        chat.finish_select(loaded);
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(other));

        // The stale result is still cached.
        assert!(chat.begin_select(f.conversation_id).is_none());
        assert_eq!(chat.messages().len(), 2);
    }

    #[tokio::test]
    async fn initial_load_failure_can_be_retried() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.bob).await;
        f.ctx.store.fail_on(StoreOperation::FetchConversations).await;
        chat.load().await;
        assert!(matches!(
            chat.screen(),
            Screen::Error(Notice {
                kind: NoticeKind::LoadConversationsFailed,
                ..
            })
        ));

        f.ctx.store.recover(StoreOperation::FetchConversations).await;
        chat.retry().await;
        assert_eq!(chat.screen(), &Screen::Ready);
        assert_eq!(chat.conversations().len(), 1);
    }

    #[tokio::test]
    async fn deep_link_is_opened_once_the_list_loads() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.open_from_link(f.conversation_id).await;
        assert_eq!(chat.phase(), ChatPhase::NoConversationSelected);

        chat.load().await;
        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
        assert_eq!(
            chat.selected_conversation().map(|c| c.subject.as_deref()),
            Some(Some("Boiler"))
        );
    }

    #[tokio::test]
    async fn failed_read_receipts_are_only_logged() {
        let f = fixture().await;
        let mut chat = controller_for(&f.ctx, f.alice).await;
        chat.load().await;
        f.ctx.store.fail_on(StoreOperation::InsertReadReceipts).await;
        chat.select_conversation(f.conversation_id).await;
        chat.settle().await;

        assert_eq!(chat.phase(), ChatPhase::ConversationReady(f.conversation_id));
        assert_eq!(chat.conversations()[0].unread_count, 0);
        assert!(chat.take_notices().is_empty());
    }
}
