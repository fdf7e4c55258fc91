//! Portal navigation pages: login landing page, course site and course list.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::page::listing::text_of;
use crate::resource::Course;

static IDENTITY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"li.btnav-info[title="当前用户所在单位"]"#).unwrap()
});
static IDENTITY_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S*)\s*(\S*)\s*").unwrap());
static NOSCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("noscript").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta[content]").unwrap());
static TOOL_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[title]").unwrap());
static COURSE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.favoriteSiteList div.fav-title a").unwrap());

/// Anchor title of the course list tool on the course site.
pub const COURSE_LIST_TOOL: &str = "我的课程 - 查看或加入站点";

/// Logged-in user as shown in the portal header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub institute: String,
    pub name: String,
}

/// Extract the user's institute and name from the post-login page.
pub fn parse_identity(html: &str) -> Option<Identity> {
    let document = Html::parse_document(html);
    let text = document.select(&IDENTITY).next().map(text_of)?;
    let caps = IDENTITY_TEXT.captures(&text)?;

    Some(Identity {
        institute: caps[1].to_string(),
        name: caps[2].to_string(),
    })
}

/// Redirect target of the `<noscript><meta content="0;url=...">` element.
pub fn meta_refresh_target(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let noscript = document.select(&NOSCRIPT).next()?;

    // noscript content is kept as raw text when the parser runs with scripting on
    let content = match noscript.select(&META).next() {
        Some(meta) => meta.attr("content")?.to_string(),
        None => {
            let inner = Html::parse_fragment(&noscript.text().collect::<String>());
            let meta = inner.select(&META).next()?;
            meta.attr("content")?.to_string()
        }
    };

    // content is "0;url=<target>"
    let target = content.get(6..)?.trim();
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// `href` of the first anchor whose title equals `title`.
pub fn tool_link(html: &str, title: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOOL_LINK)
        .find(|a| a.attr("title") == Some(title))
        .and_then(|a| a.attr("href"))
        .map(str::to_string)
}

/// Courses listed on the "my courses" page, in page order.
pub fn parse_course_list(html: &str) -> Vec<Course> {
    let document = Html::parse_document(html);
    document
        .select(&COURSE_LINK)
        .filter_map(|a| {
            let name = a.attr("title")?.trim();
            let url = a.attr("href")?;
            if name.is_empty() {
                return None;
            }
            Some(Course::new(name, url))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        let html = r#"<ul><li class="btnav-info" title="当前用户所在单位">
            计算技术研究所   张三
        </li></ul>"#;
        assert_eq!(
            parse_identity(html),
            Some(Identity {
                institute: "计算技术研究所".to_string(),
                name: "张三".to_string(),
            })
        );
    }

    #[test]
    fn test_identity_missing_after_failed_login() {
        assert_eq!(parse_identity("<html><body>login</body></html>"), None);
    }

    #[test]
    fn test_meta_refresh_target() {
        let html = r#"<html><head><noscript>
            <meta http-equiv="refresh" content="0;url=https://course.example/portal">
        </noscript></head></html>"#;
        assert_eq!(
            meta_refresh_target(html).as_deref(),
            Some("https://course.example/portal")
        );
    }

    #[test]
    fn test_tool_link_by_title() {
        let html = r#"
            <a class="Mrphs-toolsNav__menuitem--link" title="公告 - 公告" href="/notice">n</a>
            <a class="Mrphs-toolsNav__menuitem--link" title="我的课程 - 查看或加入站点" href="/sites">c</a>
        "#;
        assert_eq!(tool_link(html, COURSE_LIST_TOOL).as_deref(), Some("/sites"));
        assert_eq!(tool_link(html, "作业 - 在线发布、提交和批改作业"), None);
    }

    #[test]
    fn test_parse_course_list() {
        let html = r#"
            <ul class="otherSitesCategorList favoriteSiteList">
              <li><div class="fav-title"><a title="编译原理" href="https://course.example/site/1">x</a></div></li>
              <li><div class="fav-title"><a title="操作系统" href="https://course.example/site/2">y</a></div></li>
            </ul>
        "#;
        assert_eq!(
            parse_course_list(html),
            vec![
                Course::new("编译原理", "https://course.example/site/1"),
                Course::new("操作系统", "https://course.example/site/2"),
            ]
        );
    }
}
