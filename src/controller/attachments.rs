//! Files picked by the user but not yet sent.

use crate::models::messages::{AttachmentType, MessageAttachment};
use async_trait::async_trait;
use hashbrown::HashSet;
use uuid::Uuid;

/// A file selected on the client, before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

/// Issues short-lived local URLs used to preview files before they are
/// uploaded. Every URL handed out must eventually be revoked.
pub trait ObjectUrls: Send {
    fn create(&mut self, file: &LocalFile) -> String;
    fn revoke(&mut self, url: &str);
}

/// `blob:` URLs tracked in memory.
#[derive(Debug, Default)]
pub struct BlobUrls {
    live: HashSet<String>,
}

impl BlobUrls {
    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl ObjectUrls for BlobUrls {
    fn create(&mut self, _file: &LocalFile) -> String {
        let url = format!("blob:{}", Uuid::new_v4());
        self.live.insert(url.clone());
        url
    }

    fn revoke(&mut self, url: &str) {
        self.live.remove(url);
    }
}

/// Durable storage for attachment contents.
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// Returns the public URL of the stored file.
    async fn upload(
        &self,
        conversation_id: Uuid,
        attachment: &PendingAttachment,
    ) -> anyhow::Result<String>;
}

/// Storage that only computes where a file would live. Used with the mock
/// data source.
#[derive(Debug, Clone)]
pub struct PathStorage {
    pub base_url: String,
}

#[async_trait]
impl AttachmentStorage for PathStorage {
    async fn upload(
        &self,
        conversation_id: Uuid,
        attachment: &PendingAttachment,
    ) -> anyhow::Result<String> {
        Ok(format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            conversation_id,
            attachment.id,
            attachment.file.name
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingAttachment {
    pub id: Uuid,
    pub file: LocalFile,
    pub attachment_type: AttachmentType,
    pub preview_url: String,
}

impl PendingAttachment {
    /// The attachment as shown before upload, pointing at the local preview.
    pub fn preview(&self) -> MessageAttachment {
        self.with_url(self.preview_url.clone())
    }

    pub fn with_url(&self, url: String) -> MessageAttachment {
        MessageAttachment {
            id: self.id,
            name: self.file.name.clone(),
            url,
            attachment_type: self.attachment_type,
            size: self.file.size,
        }
    }
}

#[derive(Debug, Default)]
pub struct PendingAttachments {
    items: Vec<PendingAttachment>,
}

impl PendingAttachments {
    pub fn items(&self) -> &[PendingAttachment] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add<U: ObjectUrls>(&mut self, urls: &mut U, file: LocalFile) -> Uuid {
        let id = Uuid::new_v4();
        let preview_url = urls.create(&file);
        self.items.push(PendingAttachment {
            id,
            attachment_type: AttachmentType::from_file_name(&file.name),
            file,
            preview_url,
        });
        id
    }

    pub fn remove<U: ObjectUrls>(&mut self, urls: &mut U, id: Uuid) -> bool {
        let Some(index) = self.items.iter().position(|a| a.id == id) else {
            return false;
        };
        let attachment = self.items.remove(index);
        urls.revoke(&attachment.preview_url);
        true
    }

    /// Hands the attachments over without revoking their previews.
    pub fn take(&mut self) -> Vec<PendingAttachment> {
        std::mem::take(&mut self.items)
    }

    pub fn clear<U: ObjectUrls>(&mut self, urls: &mut U) {
        for attachment in self.items.drain(..) {
            urls.revoke(&attachment.preview_url);
        }
    }
}
