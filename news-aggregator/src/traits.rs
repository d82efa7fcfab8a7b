use crate::types::{SourceType, Story};
use async_trait::async_trait;

/// Turns one configured source into normalized stories.
///
/// Implementations never fail: fetch and parse problems are logged and the
/// source simply contributes an empty list.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which kind of source this adapter handles.
    fn source_type(&self) -> SourceType;

    async fn fetch_stories(
        &self,
        source_url: &str,
        display_name: Option<&str>,
        priority: i32,
    ) -> Vec<Story>;
}
