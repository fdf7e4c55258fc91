//! Resources tool listing pages.
//!
//! A listing page shows the files of one folder as table rows and its
//! subfolders as checkbox cells; descending into a subfolder is a form POST
//! carrying the folder's collection id and the page's CSRF token.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static MODIFIED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.modified.hidden-sm.hidden-xs").unwrap());
static FOLDER_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"td.attach[headers="checkboxes"]"#).unwrap());
static INPUT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input").unwrap());
static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());
static CSRF: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="sakai_csrf_token"]"#).unwrap());

/// A file row of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    /// Absolute download URL.
    pub url: String,
    /// URL-decoded last path segment of the link.
    pub file_name: String,
    /// Trimmed text of the row's modification date cell.
    pub marker: String,
}

/// A subfolder reachable from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    /// Collection id, always ending in `/`.
    pub collection_id: String,
    /// Last segment of the collection id.
    pub name: String,
}

/// Form target and token used to open a subfolder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfoldProtocol {
    pub action: String,
    pub csrf_token: String,
}

impl UnfoldProtocol {
    /// Form fields of the navigation POST for one collection.
    pub fn form<'a>(&'a self, collection_id: &'a str) -> [(&'static str, &'a str); 10] {
        [
            ("source", "0"),
            ("collectionId", collection_id),
            ("navRoot", ""),
            ("criteria", "title"),
            ("sakai_action", "doNavigate"),
            ("rt_action", ""),
            ("selectedItemId", ""),
            ("itemHidden", "false"),
            ("itemCanRevise", "false"),
            ("sakai_csrf_token", self.csrf_token.as_str()),
        ]
    }
}

/// Parsed content of a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub files: Vec<FileRow>,
    pub folders: Vec<FolderRef>,
    pub unfold: Option<UnfoldProtocol>,
}

impl ListingPage {
    /// Parse a listing page fetched from `page_url`.
    pub fn parse(html: &str, page_url: &str) -> Self {
        let document = Html::parse_document(html);
        let base = Url::parse(page_url).ok();

        Self {
            files: parse_files(&document, base.as_ref()),
            folders: parse_folders(&document),
            unfold: parse_unfold(&document, base.as_ref()),
        }
    }
}

fn parse_files(document: &Html, base: Option<&Url>) -> Vec<FileRow> {
    let mut files = Vec::new();

    for row in document.select(&ROW) {
        let Some(href) = row.select(&LINK).next().and_then(|a| a.attr("href")) else {
            continue;
        };
        if href == "#" {
            continue;
        }

        let Some(marker) = row.select(&MODIFIED).next().map(text_of) else {
            tracing::warn!("Listing row for {} has no modification date; skipping folder", href);
            return Vec::new();
        };

        let Some(url) = resolve(base, href) else {
            tracing::warn!("Unresolvable link in listing: {}", href);
            continue;
        };

        let file_name = file_name_of(&url);
        if file_name.is_empty() {
            tracing::debug!("Skipping link without file name: {}", url);
            continue;
        }

        files.push(FileRow {
            url: url.to_string(),
            file_name,
            marker,
        });
    }

    files
}

fn parse_folders(document: &Html) -> Vec<FolderRef> {
    document
        .select(&FOLDER_CELL)
        // first cell is the select-all control
        .skip(1)
        .filter_map(|cell| cell.select(&INPUT).next()?.attr("value"))
        .filter(|id| id.ends_with('/'))
        .filter_map(|id| {
            let name = id.trim_end_matches('/').rsplit('/').next()?;
            if name.is_empty() {
                return None;
            }
            Some(FolderRef {
                collection_id: id.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

fn parse_unfold(document: &Html, base: Option<&Url>) -> Option<UnfoldProtocol> {
    let action = document.select(&FORM).next()?.attr("action")?;
    let csrf_token = document.select(&CSRF).next()?.attr("value")?;

    let action = resolve(base, action)?;
    Some(UnfoldProtocol {
        action: action.to_string(),
        csrf_token: csrf_token.to_string(),
    })
}

fn resolve(base: Option<&Url>, href: &str) -> Option<Url> {
    match base {
        Some(base) => base.join(href).ok(),
        None => Url::parse(href).ok(),
    }
}

/// URL-decoded last path segment, query and fragment excluded.
fn file_name_of(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or_default();

    urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
