//! Assignment tool pages.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::page::listing::text_of;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"td[headers="title"] a"#).unwrap());
static STATUS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"td[headers="status"]"#).unwrap());
static DUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"td[headers="dueDate"] span"#).unwrap());

/// Status text of an assignment that has not been handed in.
pub const NOT_SUBMITTED: &str = "尚未提交";

/// One assignment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRow {
    pub title: String,
    pub status: String,
    pub due: String,
}

impl HomeworkRow {
    pub fn is_pending(&self) -> bool {
        self.status == NOT_SUBMITTED
    }
}

/// Assignment rows, header row excluded.
pub fn parse_homework_rows(html: &str) -> Vec<HomeworkRow> {
    let document = Html::parse_document(html);

    document
        .select(&ROW)
        .skip(1)
        .filter_map(|row| {
            let title = row.select(&TITLE).next().map(text_of)?;
            let status = row.select(&STATUS).next().map(text_of).unwrap_or_default();
            let due = row.select(&DUE).next().map(text_of).unwrap_or_default();
            Some(HomeworkRow { title, status, due })
        })
        .collect()
}
