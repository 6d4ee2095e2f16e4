use super::access::{service_error, ResourceKind};
use super::ResourceAccessor;
use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::services::media::*;
use crate::services::threading::{SavedMessagesBy, SavedMessagesRequest};

impl ResourceAccessor {
    /// Media is accessible when its owner is
    async fn can_access_media_owner(&self, ctx: &RequestContext, owner: &MediaOwner) -> Result<()> {
        let kind = match owner.owner_type {
            MediaOwnerType::Organization => ResourceKind::Organization,
            MediaOwnerType::Entity => ResourceKind::Entity,
            MediaOwnerType::Thread => ResourceKind::Thread,
            MediaOwnerType::ThreadItem => ResourceKind::ThreadItem,
            MediaOwnerType::Visit => ResourceKind::Visit,
            MediaOwnerType::Account => {
                self.can_access_account(ctx, &owner.owner_id)?;
                return Ok(());
            }
            MediaOwnerType::SavedMessage => {
                let what = format!("saved message {}", owner.owner_id);
                let message = self
                    .threading
                    .saved_messages(
                        ctx,
                        SavedMessagesRequest {
                            by: SavedMessagesBy::Ids(vec![owner.owner_id.clone()]),
                        },
                    )
                    .await
                    .map_err(|e| service_error(ctx, &what, e))?
                    .saved_messages
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::not_found(ctx, &what))?;
                return self
                    .can_access_resource(ctx, &message.organization_id, ResourceKind::Organization)
                    .await;
            }
            MediaOwnerType::Unknown => return Err(Error::not_authorized(ctx, &owner.owner_id)),
        };
        self.can_access_resource(ctx, &owner.owner_id, kind).await
    }

    async fn media_infos_checked(
        &self,
        ctx: &RequestContext,
        media_ids: &[String],
    ) -> Result<Vec<MediaInfo>> {
        let mut infos = self
            .media
            .media_infos(
                ctx,
                MediaInfosRequest {
                    media_ids: media_ids.to_vec(),
                },
            )
            .await
            .map_err(|e| service_error(ctx, "media", e))?
            .media_infos;

        let mut checked = Vec::with_capacity(media_ids.len());
        for id in media_ids {
            let info = infos
                .remove(id)
                .ok_or_else(|| Error::not_found(ctx, &format!("media {}", id)))?;
            self.can_access_media_owner(ctx, &info.owner).await?;
            checked.push(info);
        }
        Ok(checked)
    }

    /// Attach uploaded media to an owner the caller can access
    pub async fn claim_media(&self, ctx: &RequestContext, req: ClaimMediaRequest) -> Result<()> {
        self.can_access_media_owner(
            ctx,
            &MediaOwner {
                owner_type: req.owner_type,
                owner_id: req.owner_id.clone(),
            },
        )
        .await?;
        self.media
            .claim_media(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "media", e))?;
        Ok(())
    }

    /// Copy media the caller can read onto a target the caller can access
    pub async fn clone_media(
        &self,
        ctx: &RequestContext,
        req: CloneMediaRequest,
    ) -> Result<Vec<MediaInfo>> {
        self.media_infos_checked(ctx, &req.media_ids).await?;
        self.can_access_media_owner(
            ctx,
            &MediaOwner {
                owner_type: req.owner_type,
                owner_id: req.owner_id.clone(),
            },
        )
        .await?;
        let resp = self
            .media
            .clone_media(ctx, req)
            .await
            .map_err(|e| service_error(ctx, "media", e))?;
        Ok(resp.media_infos)
    }

    pub async fn media_info(&self, ctx: &RequestContext, media_id: &str) -> Result<MediaInfo> {
        let mut infos = self
            .media_infos_checked(ctx, &[media_id.to_string()])
            .await?;
        infos
            .pop()
            .ok_or_else(|| Error::not_found(ctx, &format!("media {}", media_id)))
    }

    pub async fn update_media(
        &self,
        ctx: &RequestContext,
        req: UpdateMediaRequest,
    ) -> Result<MediaInfo> {
        self.media_info(ctx, &req.media_id).await?;
        let what = format!("media {}", req.media_id);
        self.media
            .update_media(ctx, req)
            .await
            .map_err(|e| service_error(ctx, &what, e))?
            .media_info
            .ok_or_else(|| Error::not_found(ctx, &what))
    }
}
