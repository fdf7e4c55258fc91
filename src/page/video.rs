//! Course video tool pages.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::page::listing::text_of;

static CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.col").unwrap());
static CARD_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[onclick]").unwrap());
static CARD_INFO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.col_1").unwrap());
static GOTO_PLAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"gotoPlay\(\s*['"]([^'"]+)['"]"#).unwrap());
static SOURCE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("video source[src]").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"h2[style="margin-left: 2em;margin-top: 10px"]"#).unwrap()
});

const UPLOAD_LABEL: &str = "上传时间";
const UNPUBLISHED_LABEL: &str = "视频预计";

/// Marker used when a card shows no upload date.
pub const NO_DATE: &str = "Null";

/// A video card on the tool page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCard {
    pub id: String,
    /// Upload date shown on the card.
    pub uploaded: String,
}

/// The play page of one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayPage {
    pub title: String,
    pub source: String,
}

/// Published video cards in page order.
pub fn parse_video_cards(html: &str) -> Vec<VideoCard> {
    let document = Html::parse_document(html);
    let mut cards = Vec::new();

    for card in document.select(&CARD) {
        let info: Vec<String> = card.select(&CARD_INFO).map(text_of).collect();
        if info.iter().any(|text| text.contains(UNPUBLISHED_LABEL)) {
            continue;
        }

        let Some(onclick) = card.select(&CARD_LINK).next().and_then(|a| a.attr("onclick")) else {
            continue;
        };
        let Some(id) = GOTO_PLAY.captures(onclick).map(|caps| caps[1].to_string()) else {
            tracing::debug!("Unrecognised video link: {}", onclick);
            continue;
        };

        let uploaded = info
            .iter()
            .find(|text| text.contains(UPLOAD_LABEL))
            .map(|text| {
                text.replacen(UPLOAD_LABEL, "", 1)
                    .trim_start_matches(['：', ':'])
                    .trim()
                    .to_string()
            })
            .unwrap_or_else(|| NO_DATE.to_string());

        cards.push(VideoCard { id, uploaded });
    }

    cards
}

/// Parse a play page into its title and source URL.
pub fn parse_play_page(html: &str) -> Option<PlayPage> {
    let document = Html::parse_document(html);
    let source = document.select(&SOURCE).next()?.attr("src")?.trim().to_string();
    let title = document.select(&TITLE).next().map(text_of)?;

    if source.is_empty() || title.is_empty() {
        return None;
    }

    Some(PlayPage { title, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL_PAGE: &str = r#"
        <div class="col">
          <a onclick="gotoPlay('1001','video')">Lecture 1</a>
          <div class="col_1">上传时间：2024-03-01</div>
        </div>
        <div class="col">
          <a onclick="gotoPlay('1002','video')">Lecture 2</a>
          <div class="col_1">视频预计 2024-03-08 发布</div>
        </div>
        <div class="col">
          <a onclick="gotoPlay('1003','video')">Lecture 3</a>
        </div>
    "#;

    #[test]
    fn test_parse_cards_skips_unpublished() {
        assert_eq!(
            parse_video_cards(TOOL_PAGE),
            vec![
                VideoCard {
                    id: "1001".to_string(),
                    uploaded: "2024-03-01".to_string(),
                },
                VideoCard {
                    id: "1003".to_string(),
                    uploaded: NO_DATE.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_play_page() {
        let html = r#"
            <h2 style="margin-left: 2em;margin-top: 10px">第一讲 绪论</h2>
            <video><source src="https://video.example/v/1001.mp4"></video>
        "#;
        assert_eq!(
            parse_play_page(html),
            Some(PlayPage {
                title: "第一讲 绪论".to_string(),
                source: "https://video.example/v/1001.mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_play_page_without_source() {
        let html = r#"<h2 style="margin-left: 2em;margin-top: 10px">x</h2>"#;
        assert_eq!(parse_play_page(html), None);
    }
}
