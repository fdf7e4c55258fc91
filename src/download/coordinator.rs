//! Run coordination: discovery for every course, then bounded concurrent downloads.

use std::path::PathBuf;

use futures::{stream, StreamExt};

use crate::adapter::{discover, SiteAdapter};
use crate::api::Session;
use crate::config::{Config, PolicyConfig};
use crate::download::report::{Report, ReportCollector};
use crate::download::task::{DownloadTask, Outcome, TaskContext};
use crate::error::Result;
use crate::fs::destination_for;
use crate::ledger::Ledger;
use crate::output::progress::create_item_bar;
use crate::resource::{Course, ResourceDescriptor};

/// Knobs of the download phase.
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    pub max_concurrent: usize,
    pub chunk_size: usize,
    pub atomic_writes: bool,
    pub show_progress: bool,
    pub policy: PolicyConfig,
}

impl CoordinatorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrent: config.options.max_concurrent_downloads,
            chunk_size: config.options.chunk_size,
            atomic_writes: config.options.atomic_writes,
            show_progress: config.options.show_progress,
            policy: config.policy.clone(),
        }
    }
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Drives one sync run over the selected courses.
pub struct FetchCoordinator<'a> {
    session: &'a dyn Session,
    ledger: &'a Ledger,
    root: PathBuf,
    options: CoordinatorOptions,
    adapters: Vec<Box<dyn SiteAdapter>>,
}

impl<'a> FetchCoordinator<'a> {
    pub fn new(
        session: &'a dyn Session,
        ledger: &'a Ledger,
        root: PathBuf,
        options: CoordinatorOptions,
        adapters: Vec<Box<dyn SiteAdapter>>,
    ) -> Self {
        Self {
            session,
            ledger,
            root,
            options,
            adapters,
        }
    }

    /// Run discovery and downloads for `courses`.
    ///
    /// Course and task failures end up in the report. A ledger failure is
    /// returned once every started task has finished.
    pub async fn run(&self, courses: &[Course]) -> Result<Report> {
        let report = ReportCollector::new();

        let resources = self.discover_all(courses, &report).await;
        let tasks = self.build_tasks(resources, &report).await;

        tracing::info!("{} resource(s) to check", tasks.len());
        self.download_all(&tasks, &report).await?;

        Ok(report.into_report())
    }

    async fn discover_all(
        &self,
        courses: &[Course],
        report: &ReportCollector,
    ) -> Vec<ResourceDescriptor> {
        let mut resources = Vec::new();

        for adapter in &self.adapters {
            for course in courses {
                tracing::info!("Scanning {} of {}", adapter.kind(), course.name);

                match discover(adapter.as_ref(), self.session, course).await {
                    Ok(discovery) => {
                        tracing::debug!(
                            "{}: {} resource(s), {} notice(s)",
                            course.name,
                            discovery.resources.len(),
                            discovery.notices.len()
                        );
                        resources.extend(discovery.resources);
                        report.add_notices(discovery.notices).await;
                    }
                    Err(e) => {
                        tracing::warn!("{}: {} discovery failed: {}", course.name, adapter.kind(), e);
                        report
                            .record_error(format!("{} [{}]", course.name, adapter.kind()), e.to_string())
                            .await;
                    }
                }
            }
        }

        resources
    }

    async fn build_tasks(
        &self,
        resources: Vec<ResourceDescriptor>,
        report: &ReportCollector,
    ) -> Vec<DownloadTask> {
        let mut tasks = Vec::with_capacity(resources.len());

        for resource in resources {
            match destination_for(&self.root, &resource) {
                Ok(destination) => {
                    let policy = self.options.policy.for_kind(resource.kind);
                    tasks.push(DownloadTask::new(resource, destination, policy));
                }
                Err(e) => report.record_error(resource.key(), e.to_string()).await,
            }
        }

        tasks
    }

    async fn download_all(&self, tasks: &[DownloadTask], report: &ReportCollector) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        let ctx = TaskContext {
            session: self.session,
            ledger: self.ledger,
            report,
            chunk_size: self.options.chunk_size,
            atomic_writes: self.options.atomic_writes,
        };

        let progress = self
            .options
            .show_progress
            .then(|| create_item_bar(tasks.len() as u64, "Syncing"));

        let results: Vec<Result<Outcome>> = stream::iter(tasks)
            .map(|task| {
                let ctx = &ctx;
                let progress = progress.as_ref();
                async move {
                    let result = task.execute(ctx).await;
                    if let Some(bar) = progress {
                        bar.inc(1);
                    }
                    result
                }
            })
            .buffer_unordered(self.options.max_concurrent.max(1))
            .collect()
            .await;

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        let mut failed = 0;
        for result in results {
            match result {
                Ok(Outcome::Failed(_)) => failed += 1,
                Ok(_) => {}
                Err(e) => return Err(e),
            }
        }

        if failed > 0 {
            tracing::warn!("{} download(s) failed", failed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::adapters_for;
    use crate::config::MarkerPolicy;
    use crate::resource::ResourceKind;
    use crate::test_helpers::MockSession;
    use std::time::Duration;
    use tempfile::{tempdir, NamedTempFile};

    const COURSE_URL: &str = "https://course.example/portal/site/x";
    const TOOL_URL: &str = "https://course.example/portal/site/x/tool/res";

    fn options() -> CoordinatorOptions {
        CoordinatorOptions {
            max_concurrent: 3,
            chunk_size: 1024,
            atomic_writes: false,
            show_progress: false,
            policy: PolicyConfig::default(),
        }
    }

    fn course_session(files: &[(&str, &str)]) -> MockSession {
        let main = format!(
            r#"<a title="{}" href="{}">资源</a>"#,
            crate::adapter::courseware::TOOL_TITLE,
            TOOL_URL
        );
        let rows: String = files
            .iter()
            .map(|(name, date)| {
                format!(
                    r#"<tr><td><a href="/files/{}">x</a></td><td class="modified hidden-sm hidden-xs">{}</td></tr>"#,
                    name, date
                )
            })
            .collect();

        let mut session = MockSession::new()
            .with_page(COURSE_URL, &main)
            .with_page(TOOL_URL, &format!("<table>{}</table>", rows));
        for (name, _) in files {
            session = session.with_file(&format!("https://course.example/files/{}", name), name.as_bytes());
        }
        session
    }

    #[tokio::test]
    async fn test_second_run_is_all_unchanged() {
        let db = NamedTempFile::new().unwrap();
        let ledger = Ledger::open(db.path()).await.unwrap();
        let root = tempdir().unwrap();
        let session = course_session(&[("a.pdf", "d1"), ("b.pdf", "d2"), ("c.pdf", "d3")]);
        let courses = vec![Course::new("CourseX", COURSE_URL)];

        let coordinator = FetchCoordinator::new(
            &session,
            &ledger,
            root.path().to_path_buf(),
            options(),
            adapters_for(&[ResourceKind::Courseware]),
        );

        let first = coordinator.run(&courses).await.unwrap();
        assert_eq!(first.new.len(), 3);
        assert!(root.path().join("CourseX/b.pdf").exists());

        let second = coordinator.run(&courses).await.unwrap();
        assert!(second.new.is_empty());
        assert!(second.updated.is_empty());
        assert_eq!(second.unchanged, 3);
        assert_eq!(session.opened(), 3);
    }

    #[tokio::test]
    async fn test_one_failing_task_does_not_cancel_others() {
        let db = NamedTempFile::new().unwrap();
        let ledger = Ledger::open(db.path()).await.unwrap();
        let root = tempdir().unwrap();
        let session = course_session(&[("a.pdf", "d"), ("b.pdf", "d"), ("c.pdf", "d"), ("d.pdf", "d")])
            .with_broken_file("https://course.example/files/c.pdf", b"broken body");
        let courses = vec![Course::new("CourseX", COURSE_URL)];

        let coordinator = FetchCoordinator::new(
            &session,
            &ledger,
            root.path().to_path_buf(),
            options(),
            adapters_for(&[ResourceKind::Courseware]),
        );
        let report = coordinator.run(&courses).await.unwrap();

        assert_eq!(report.new.len(), 4);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].key, "CourseX/c.pdf");
        for ok in ["a.pdf", "b.pdf", "d.pdf"] {
            assert!(root.path().join("CourseX").join(ok).exists());
        }
    }

    #[tokio::test]
    async fn test_unreachable_course_is_reported_and_run_continues() {
        let db = NamedTempFile::new().unwrap();
        let ledger = Ledger::open(db.path()).await.unwrap();
        let root = tempdir().unwrap();
        let session = course_session(&[("a.pdf", "d")]);
        let courses = vec![
            Course::new("Offline", "https://offline.example/site"),
            Course::new("CourseX", COURSE_URL),
        ];

        let coordinator = FetchCoordinator::new(
            &session,
            &ledger,
            root.path().to_path_buf(),
            options(),
            adapters_for(&[ResourceKind::Courseware]),
        );
        let report = coordinator.run(&courses).await.unwrap();

        assert_eq!(report.new, vec!["CourseX/a.pdf"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].key, "Offline [courseware]");
    }

    #[tokio::test]
    async fn test_checksum_policy_from_options() {
        let db = NamedTempFile::new().unwrap();
        let ledger = Ledger::open(db.path()).await.unwrap();
        let root = tempdir().unwrap();
        let session = course_session(&[("a.pdf", "d1")]);
        let courses = vec![Course::new("CourseX", COURSE_URL)];

        let mut opts = options();
        opts.policy.courseware = MarkerPolicy::Checksum;
        let coordinator = FetchCoordinator::new(
            &session,
            &ledger,
            root.path().to_path_buf(),
            opts,
            adapters_for(&[ResourceKind::Courseware]),
        );

        coordinator.run(&courses).await.unwrap();
        let second = coordinator.run(&courses).await.unwrap();

        // content is fetched every run, but unchanged bytes are not rewritten
        assert_eq!(session.opened(), 2);
        assert_eq!(second.unchanged, 1);
    }

    #[tokio::test]
    async fn test_concurrent_downloads_stay_within_limit() {
        let db = NamedTempFile::new().unwrap();
        let ledger = Ledger::open(db.path()).await.unwrap();
        let root = tempdir().unwrap();
        let names: Vec<String> = (0..20).map(|i| format!("f{:02}.pdf", i)).collect();
        let files: Vec<(&str, &str)> = names.iter().map(|name| (name.as_str(), "d")).collect();
        let session = course_session(&files).with_open_delay(Duration::from_millis(25));
        let courses = vec![Course::new("CourseX", COURSE_URL)];

        let coordinator = FetchCoordinator::new(
            &session,
            &ledger,
            root.path().to_path_buf(),
            options(),
            adapters_for(&[ResourceKind::Courseware]),
        );
        let report = coordinator.run(&courses).await.unwrap();

        assert_eq!(report.new.len(), 20);
        assert!(session.peak_opens() <= 3, "peak was {}", session.peak_opens());
        assert!(session.peak_opens() > 1);
    }
}
