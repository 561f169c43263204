//! Media reference classification and YouTube id handling.

use once_cell::sync::Lazy;
use regex::Regex;

/// What kind of content a media reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Site,
}

static YOUTUBE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:[^/\n\s]+/\S+/|(?:v|e(?:mbed)?)/|\S*?[?&]v=)|youtu\.be/)([a-zA-Z0-9_-]{11})",
    )
    .expect("valid youtube id regex")
});

static THUMBNAIL_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"i3\.ytimg\.com/vi/\s*([a-zA-Z0-9_-]+)\s*/maxresdefault\.jpg")
        .expect("valid thumbnail id regex")
});

const THUMBNAIL_HOST: &str = "https://i3.ytimg.com/vi";

/// Classify a media reference. Checked in order: absent, jpeg suffix, youtube.com.
///
/// `youtu.be` short links fall through to `Site`; only the id extractor knows them.
pub fn classify(url: Option<&str>) -> MediaKind {
    let url = match url {
        Some(u) if !u.is_empty() => u,
        _ => return MediaKind::Site,
    };

    let lower = url.to_lowercase();
    if lower.ends_with(".jpeg") || lower.ends_with(".jpg") {
        return MediaKind::Image;
    }

    if url.contains("youtube.com") {
        return MediaKind::Video;
    }

    MediaKind::Site
}

/// Pull the video id out of a YouTube page URL or a thumbnail CDN URL.
pub fn extract_video_id(url: Option<&str>) -> Option<&str> {
    let url = url.filter(|u| !u.is_empty())?;
    [&*YOUTUBE_ID_RE, &*THUMBNAIL_ID_RE]
        .into_iter()
        .find_map(|re| re.captures(url).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
}

pub fn thumbnail_url(video_id: Option<&str>) -> Option<String> {
    let id = video_id.filter(|id| !id.is_empty())?;
    Some(format!("{}/{}/maxresdefault.jpg", THUMBNAIL_HOST, id))
}
