//! Site adapters.
//!
//! Each adapter knows one course tool: how to find it on a course page and
//! how to turn its page into downloadable resources or status notices.

pub mod courseware;
pub mod homework;
pub mod video;

use async_trait::async_trait;

use crate::api::Session;
use crate::error::Result;
use crate::page::{absolute_url, tool_link};
use crate::resource::{Course, ResourceDescriptor, ResourceKind};

pub use courseware::CoursewareAdapter;
pub use homework::HomeworkAdapter;
pub use video::VideoAdapter;

/// A fetched course tool page.
#[derive(Debug, Clone)]
pub struct ToolPage {
    pub url: String,
    pub html: String,
}

/// What an adapter found for one course.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub resources: Vec<ResourceDescriptor>,
    /// Human-readable status lines (pending homework).
    pub notices: Vec<String>,
}

/// Per-kind discovery logic.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Title attribute of the tool's link on the course main page.
    fn tool_title(&self) -> &'static str;

    /// Collect resources and notices from the tool page.
    async fn collect(
        &self,
        session: &dyn Session,
        course: &Course,
        tool: ToolPage,
    ) -> Result<Discovery>;
}

/// Open the adapter's tool for `course` and collect from it.
///
/// A course without the tool yields an empty discovery; transport errors
/// propagate.
pub async fn discover(
    adapter: &dyn SiteAdapter,
    session: &dyn Session,
    course: &Course,
) -> Result<Discovery> {
    let main_page = session.get_text(&course.url, &[]).await?;

    let Some(href) = tool_link(&main_page, adapter.tool_title()) else {
        tracing::warn!("{}: no {} tool found", course.name, adapter.kind());
        return Ok(Discovery::default());
    };

    let url = absolute_url(&course.url, &href);
    let html = session.get_text(&url, &[]).await?;

    adapter.collect(session, course, ToolPage { url, html }).await
}

/// Adapters for the requested kinds, in request order without repeats.
pub fn adapters_for(kinds: &[ResourceKind]) -> Vec<Box<dyn SiteAdapter>> {
    let mut seen = Vec::new();
    let mut adapters: Vec<Box<dyn SiteAdapter>> = Vec::new();

    for kind in kinds {
        if seen.contains(kind) {
            continue;
        }
        seen.push(*kind);

        let adapter: Box<dyn SiteAdapter> = match kind {
            ResourceKind::Courseware => Box::new(CoursewareAdapter),
            ResourceKind::Video => Box::new(VideoAdapter),
            ResourceKind::Homework => Box::new(HomeworkAdapter),
        };
        adapters.push(adapter);
    }

    adapters
}
