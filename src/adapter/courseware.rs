//! Resources tool: lecture slides and documents.

use async_trait::async_trait;

use crate::adapter::{Discovery, SiteAdapter, ToolPage};
use crate::api::Session;
use crate::discovery::ResourceWalker;
use crate::error::Result;
use crate::page::ListingPage;
use crate::resource::{Course, ResourceKind};

pub const TOOL_TITLE: &str = "资源 - 上传、下载课件，发布文档，网址等信息";

pub struct CoursewareAdapter;

#[async_trait]
impl SiteAdapter for CoursewareAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Courseware
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
        let root = ListingPage::parse(&tool.html, &tool.url);
        let resources = ResourceWalker::new(session, self.kind())
            .walk(root, &course.name)
            .await?;

        Ok(Discovery {
            resources,
            notices: Vec::new(),
        })
    }
}
