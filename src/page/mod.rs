//! Portal page parsers.
//!
//! Each parser takes a page body and returns owned values, so no parsed
//! document is held across an await point.

pub mod homework;
pub mod listing;
pub mod portal;
pub mod video;

pub use homework::{parse_homework_rows, HomeworkRow};
pub use listing::{FileRow, FolderRef, ListingPage, UnfoldProtocol};
pub use portal::{meta_refresh_target, parse_course_list, parse_identity, tool_link, Identity};
pub use video::{parse_play_page, parse_video_cards, PlayPage, VideoCard};

/// Resolve a link found on the page at `base` to an absolute URL.
///
/// Links that cannot be resolved are returned unchanged.
pub fn absolute_url(base: &str, href: &str) -> String {
    url::Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://course.example/portal/site/1", "/portal/tool/9"),
            "https://course.example/portal/tool/9"
        );
        assert_eq!(
            absolute_url("https://course.example/a", "https://other.example/b"),
            "https://other.example/b"
        );
    }
}
