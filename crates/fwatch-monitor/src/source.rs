//! Where follower counts come from.

use async_trait::async_trait;
use fwatch_common::{BiliClient, Result, Uid};

/// A provider of current follower counts.
///
/// Errors for which [`FwatchError::is_remote`](fwatch_common::FwatchError::is_remote)
/// is true are platform rejections; everything else is treated as a
/// transport failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowerSource: Send + Sync {
    /// Fetches the follower count for `uid`.
    async fn follower_count(&self, uid: &Uid) -> Result<u64>;
}

#[async_trait]
impl FollowerSource for BiliClient {
    async fn follower_count(&self, uid: &Uid) -> Result<u64> {
        BiliClient::follower_count(self, uid).await
    }
}
