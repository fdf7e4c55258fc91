//! Depth-first walk over nested resource folders.

use crate::api::Session;
use crate::error::Result;
use crate::page::{ListingPage, UnfoldProtocol};
use crate::resource::{ResourceDescriptor, ResourceKind};

/// Where a folder's listing comes from.
enum FolderSource {
    /// Already fetched (the course root).
    Loaded(ListingPage),
    /// Opened on demand through the unfold POST.
    Collection(String),
}

/// A folder waiting to be enumerated.
struct FolderNode {
    path: Vec<String>,
    source: FolderSource,
}

/// Flattens a course's folder tree into resource descriptors.
pub struct ResourceWalker<'a> {
    session: &'a dyn Session,
    kind: ResourceKind,
}

impl<'a> ResourceWalker<'a> {
    pub fn new(session: &'a dyn Session, kind: ResourceKind) -> Self {
        Self { session, kind }
    }

    /// Walk every folder reachable from `root`.
    ///
    /// Output is depth-first pre-order: a folder's files in page order, then
    /// each subfolder's contents in page order. A transport error while
    /// opening a subfolder aborts the walk.
    pub async fn walk(&self, root: ListingPage, course: &str) -> Result<Vec<ResourceDescriptor>> {
        let unfold = root.unfold.clone();
        if unfold.is_none() && !root.folders.is_empty() {
            tracing::warn!(
                "{}: listing has no navigation form; {} subfolder(s) not visited",
                course,
                root.folders.len()
            );
        }

        let mut resources = Vec::new();
        let mut stack = vec![FolderNode {
            path: Vec::new(),
            source: FolderSource::Loaded(root),
        }];

        while let Some(node) = stack.pop() {
            let page = match node.source {
                FolderSource::Loaded(page) => page,
                FolderSource::Collection(collection_id) => {
                    // only pushed when the protocol is known
                    let Some(unfold) = unfold.as_ref() else {
                        continue;
                    };
                    self.open_folder(unfold, &collection_id).await?
                }
            };

            resources.extend(self.files_of(&page, course, &node.path));

            if unfold.is_none() {
                continue;
            }

            for folder in page.folders.into_iter().rev() {
                let mut path = node.path.clone();
                path.push(folder.name);
                stack.push(FolderNode {
                    path,
                    source: FolderSource::Collection(folder.collection_id),
                });
            }
        }

        tracing::debug!("{}: walk found {} resource(s)", course, resources.len());
        Ok(resources)
    }

    async fn open_folder(&self, unfold: &UnfoldProtocol, collection_id: &str) -> Result<ListingPage> {
        tracing::debug!("Opening folder {}", collection_id);
        let body = self
            .session
            .post_form(&unfold.action, &unfold.form(collection_id))
            .await?;
        Ok(ListingPage::parse(&body, &unfold.action))
    }

    fn files_of(&self, page: &ListingPage, course: &str, path: &[String]) -> Vec<ResourceDescriptor> {
        page.files
            .iter()
            .map(|file| ResourceDescriptor {
                course: course.to_string(),
                subdir: path.to_vec(),
                file_name: file.file_name.clone(),
                url: file.url.clone(),
                marker: file.marker.clone(),
                kind: self.kind,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_helpers::MockSession;

    const TOOL_URL: &str = "https://portal.example/portal/site/c1/tool/t1";
    const ACTION: &str = "https://portal.example/portal/site/c1/tool/t1/nav";

    fn folder_row(collection_id: &str) -> String {
        format!(
            r##"<tr><td class="attach" headers="checkboxes"><input value="{}"></td><td><a href="#">f</a></td></tr>"##,
            collection_id
        )
    }

    fn file_row(href: &str, date: &str) -> String {
        format!(
            r#"<tr><td><a href="{}">x</a></td><td class="modified hidden-sm hidden-xs">{}</td></tr>"#,
            href, date
        )
    }

    fn listing(rows: &[String]) -> String {
        format!(
            r#"<form action="/portal/site/c1/tool/t1/nav"><input name="sakai_csrf_token" value="tok"></form>
               <table>{}</table>"#,
            rows.concat()
        )
    }

    fn names(resources: &[ResourceDescriptor]) -> Vec<String> {
        resources.iter().map(ResourceDescriptor::key).collect()
    }

    #[tokio::test]
    async fn test_walk_scenario_root_with_week_folder() {
        let root = listing(&[
            folder_row("/group/c1/"),
            file_row("/a/F1.pdf", "2024-01-01"),
            r##"<tr><td><a href="#">F2</a></td></tr>"##.to_string(),
            folder_row("/group/c1/Week1/"),
        ]);
        let week1 = listing(&[folder_row("/group/c1/Week1/"), file_row("/a/W1.pdf", "2024-01-05")]);

        let session = MockSession::new().with_folder(ACTION, "/group/c1/Week1/", &week1);
        let walker = ResourceWalker::new(&session, ResourceKind::Courseware);
        let resources = walker
            .walk(ListingPage::parse(&root, TOOL_URL), "CourseX")
            .await
            .unwrap();

        assert_eq!(names(&resources), vec!["CourseX/F1.pdf", "CourseX/Week1/W1.pdf"]);
        assert_eq!(resources[0].marker, "2024-01-01");
        assert_eq!(resources[0].url, "https://portal.example/a/F1.pdf");
        assert_eq!(session.calls(), vec![format!("POST {} /group/c1/Week1/", ACTION)]);
    }

    #[tokio::test]
    async fn test_walk_is_preorder() {
        let root = listing(&[
            folder_row("/g/"),
            folder_row("/g/A/"),
            folder_row("/g/B/"),
            file_row("/r.pdf", "d"),
        ]);
        let a = listing(&[folder_row("/g/A/"), file_row("/a1.pdf", "d"), folder_row("/g/A/Deep/")]);
        let deep = listing(&[folder_row("/g/A/Deep/"), file_row("/deep.pdf", "d")]);
        let b = listing(&[folder_row("/g/B/"), file_row("/b1.pdf", "d")]);

        let session = MockSession::new()
            .with_folder(ACTION, "/g/A/", &a)
            .with_folder(ACTION, "/g/A/Deep/", &deep)
            .with_folder(ACTION, "/g/B/", &b);
        let walker = ResourceWalker::new(&session, ResourceKind::Courseware);
        let resources = walker.walk(ListingPage::parse(&root, TOOL_URL), "C").await.unwrap();

        assert_eq!(
            names(&resources),
            vec!["C/r.pdf", "C/A/a1.pdf", "C/A/Deep/deep.pdf", "C/B/b1.pdf"]
        );
    }

    #[tokio::test]
    async fn test_single_folder_row_is_not_descended() {
        let root = listing(&[folder_row("/g/Only/"), file_row("/r.pdf", "d")]);

        let session = MockSession::new();
        let walker = ResourceWalker::new(&session, ResourceKind::Courseware);
        let resources = walker.walk(ListingPage::parse(&root, TOOL_URL), "C").await.unwrap();

        assert_eq!(names(&resources), vec!["C/r.pdf"]);
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_unfold_keeps_root_files() {
        let root = format!(
            "<table>{}</table>",
            [folder_row("/g/"), folder_row("/g/A/"), file_row("/r.pdf", "d")].concat()
        );

        let session = MockSession::new();
        let walker = ResourceWalker::new(&session, ResourceKind::Courseware);
        let resources = walker.walk(ListingPage::parse(&root, TOOL_URL), "C").await.unwrap();

        assert_eq!(names(&resources), vec!["C/r.pdf"]);
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_subfolder_yields_nothing() {
        let root = listing(&[folder_row("/g/"), folder_row("/g/A/"), file_row("/r.pdf", "d")]);
        let broken = "<table><tr><td><a href=\"/x.pdf\">x</a></td></tr></table>";

        let session = MockSession::new().with_folder(ACTION, "/g/A/", broken);
        let walker = ResourceWalker::new(&session, ResourceKind::Courseware);
        let resources = walker.walk(ListingPage::parse(&root, TOOL_URL), "C").await.unwrap();

        assert_eq!(names(&resources), vec!["C/r.pdf"]);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_walk() {
        let root = listing(&[folder_row("/g/"), folder_row("/g/A/")]);

        let session = MockSession::new();
        let walker = ResourceWalker::new(&session, ResourceKind::Courseware);
        let result = walker.walk(ListingPage::parse(&root, TOOL_URL), "C").await;

        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
