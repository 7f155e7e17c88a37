use crate::entities::notifications::{NewNotification, Notification};
use crate::repositories::postgres::PgStore;
use crate::repositories::{NotificationRepository, StoreResult};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl NotificationRepository for PgStore {
    async fn insert_notification(&self, args: NewNotification<'_>) -> StoreResult<Uuid> {
        const QUERY: &str = const_str::concat!(
            "INSERT INTO notifications ",
            "(user_id, type, title, message, data, action_url, priority) ",
            "VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id"
        );
        let notification_id = sqlx::query_scalar(QUERY)
            .bind(args.user_id)
            .bind(args.kind)
            .bind(args.title)
            .bind(args.message)
            .bind(args.data)
            .bind(args.action_url)
            .bind(args.priority)
            .fetch_one(self.db())
            .await?;
        Ok(notification_id)
    }

    async fn fetch_notifications(&self, user_id: Uuid) -> StoreResult<Vec<Notification>> {
        const QUERY: &str = const_str::concat!(
            "SELECT id, user_id, type, title, message, data, action_url, priority, created_at ",
            "FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let notifications = sqlx::query_as(QUERY)
            .bind(user_id)
            .fetch_all(self.db())
            .await?;
        Ok(notifications)
    }
}
