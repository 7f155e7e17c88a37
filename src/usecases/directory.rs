use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::entities::contractors::Contractor;
use crate::models::users::Participant;
use crate::repositories::DirectoryRepository;
use uuid::Uuid;

pub async fn fetch_participant<C: Context>(
    ctx: &C,
    user_id: Uuid,
) -> ServiceResult<Option<Participant>> {
    match ctx.store().fetch_profile(user_id).await {
        Ok(profile) => Ok(profile.map(Participant::from)),
        Err(e) => unexpected(e),
    }
}

/// `Ok(None)` when the company does not exist.
pub async fn fetch_contractor<C: Context>(
    ctx: &C,
    contractor_id: Uuid,
) -> ServiceResult<Option<Contractor>> {
    match ctx.store().fetch_contractor(contractor_id).await {
        Ok(contractor) => Ok(contractor),
        Err(e) => unexpected(e),
    }
}

/// Resolves a property management company to the user account representing it.
pub async fn resolve_manager_user<C: Context>(
    ctx: &C,
    manager_id: Uuid,
) -> ServiceResult<Option<Uuid>> {
    match ctx.store().fetch_manager(manager_id).await {
        Ok(manager) => Ok(manager.and_then(|m| m.user_id)),
        Err(e) => unexpected(e),
    }
}
