//! Assignment tool: pending homework notices.

use async_trait::async_trait;

use crate::adapter::{Discovery, SiteAdapter, ToolPage};
use crate::api::Session;
use crate::error::Result;
use crate::page::parse_homework_rows;
use crate::resource::{Course, ResourceKind};

pub const TOOL_TITLE: &str = "作业 - 在线发布、提交和批改作业";

pub struct HomeworkAdapter;

#[async_trait]
impl SiteAdapter for HomeworkAdapter {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Homework
    }

    fn tool_title(&self) -> &'static str {
        TOOL_TITLE
    }

    async fn collect(
        &self,
        _session: &dyn Session,
        course: &Course,
        tool: ToolPage,
    ) -> Result<Discovery> {
        let notices = parse_homework_rows(&tool.html)
            .into_iter()
            .filter(|row| row.is_pending())
            .map(|row| format!("{}/{} not submitted, due {}", course.name, row.title, row.due))
            .collect();

        Ok(Discovery {
            resources: Vec::new(),
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockSession;

    #[tokio::test]
    async fn test_pending_homework_notices() {
        let tool = ToolPage {
            url: "https://course.example/hw".to_string(),
            html: r#"
                <table>
                  <tr><th>title</th></tr>
                  <tr>
                    <td headers="title"><a href="/1">Lab 1</a></td>
                    <td headers="status">尚未提交</td>
                    <td headers="dueDate"><span>2024-04-01</span></td>
                  </tr>
                  <tr>
                    <td headers="title"><a href="/2">Lab 2</a></td>
                    <td headers="status">已提交</td>
                    <td headers="dueDate"><span>2024-04-08</span></td>
                  </tr>
                </table>
            "#
            .to_string(),
        };
        let course = Course::new("CourseX", "https://course.example/site/x");

        let discovery = HomeworkAdapter
            .collect(&MockSession::new(), &course, tool)
            .await
            .unwrap();

        assert!(discovery.resources.is_empty());
        assert_eq!(
            discovery.notices,
            vec!["CourseX/Lab 1 not submitted, due 2024-04-01"]
        );
    }
}
