//! Course video tool: recorded lectures.

use async_trait::async_trait;

use crate::adapter::{Discovery, SiteAdapter, ToolPage};
use crate::api::Session;
use crate::error::Result;
use crate::fs::sanitize_filename;
use crate::page::{absolute_url, parse_play_page, parse_video_cards, VideoCard};
use crate::resource::{Course, ResourceDescriptor, ResourceKind};

pub const TOOL_TITLE: &str = "课程视频 - 课程视频";

pub struct VideoAdapter;

impl VideoAdapter {
    /// Resolve one card through its play page.
    ///
    /// Returns `None` when the play page cannot be fetched or parsed.
    async fn resolve(
        &self,
        session: &dyn Session,
        course: &Course,
        tool: &ToolPage,
        card: &VideoCard,
    ) -> Option<ResourceDescriptor> {
        let play_url = format!("{}/video/play", tool.url.trim_end_matches('/'));
        let html = match session
            .get_text(&play_url, &[("id", card.id.as_str()), ("type", "u")])
            .await
        {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("{}: video {} skipped: {}", course.name, card.id, e);
                return None;
            }
        };

        let Some(play) = parse_play_page(&html) else {
            tracing::warn!("{}: video {} has no playable source", course.name, card.id);
            return None;
        };

        let file_name = match sanitize_filename(&format!("{}.mp4", play.title)) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("{}: video {} skipped: {}", course.name, card.id, e);
                return None;
            }
        };

        Some(ResourceDescriptor {
            course: course.name.clone(),
            subdir: vec![self.folder().to_string()],
            file_name,
            url: absolute_url(&play_url, &play.source),
            marker: card.uploaded.clone(),
            kind: self.kind(),
        })
    }

    fn folder(&self) -> &'static str {
        self.kind().folder_name().unwrap_or("Videos")
    }
}

#[async_trait]
impl SiteAdapter for VideoAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Video
    }

    fn tool_title(&self) -> &'static str {
        TOOL_TITLE
    }

    async fn collect(
        &self,
        session: &dyn Session,
        course: &Course,
        tool: ToolPage,
    ) -> Result<Discovery> {
        let cards = parse_video_cards(&tool.html);
        tracing::debug!("{}: {} published video(s)", course.name, cards.len());

        let mut resources = Vec::with_capacity(cards.len());
        for card in &cards {
            if let Some(resource) = self.resolve(session, course, &tool, card).await {
                resources.push(resource);
            }
        }

        Ok(Discovery {
            resources,
            notices: Vec::new(),
        })
    }
}
