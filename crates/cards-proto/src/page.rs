//! Page controller — owns the fetched list and the playback flag, and turns
//! each item into the card the front-end draws.

use tracing::{debug, error, info};

use crate::fetch::FetchError;
use crate::item::Item;
use crate::media::{classify, extract_video_id, thumbnail_url, MediaKind};
use crate::playback::PlaybackState;

/// What a card shows below its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardMedia {
    /// No media reference: title only.
    None,
    Image {
        url: String,
    },
    Thumbnail {
        video_id: Option<String>,
        thumbnail_url: Option<String>,
        url: String,
    },
    /// The item's video is the one currently playing.
    Player {
        video_id: String,
        src: String,
    },
    Site {
        url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub media: CardMedia,
}

/// Result of activating ("clicking") a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Play { video_id: String, src: String },
    OpenImage(String),
    OpenSite(String),
    /// Video card whose URL carries no recognisable id.
    NoVideoId,
    Nothing,
}

#[derive(Debug, Default)]
pub struct Page {
    items: Vec<Item>,
    playback: PlaybackState,
    last_error: Option<String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&mut self, items: Vec<Item>) {
        info!("[page] loaded {} items", items.len());
        self.items = items;
        self.last_error = None;
    }

    /// Record a failed fetch. The list is left as it was, so the loading
    /// message stays up.
    pub fn fetch_failed(&mut self, err: &FetchError) {
        error!("[page] fetch failed, list stays empty: {}", err);
        self.last_error = Some(err.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn play(&mut self, video_id: impl Into<String>) {
        let id = video_id.into();
        debug!("[page] play {}", id);
        self.playback.play(id);
    }

    pub fn end(&mut self) {
        if let Some(id) = self.playback.current() {
            debug!("[page] end {}", id);
        }
        self.playback.end();
    }

    pub fn cards(&self) -> Vec<Card> {
        self.items
            .iter()
            .map(|item| card_for(item, &self.playback))
            .collect()
    }

    /// Activate the card at `index`. Video cards start playback here; opening
    /// images and sites is left to the caller.
    pub fn activate(&mut self, index: usize) -> Activation {
        let Some(item) = self.items.get(index) else {
            return Activation::Nothing;
        };
        // every card is either the player or title only while a video plays
        if self.playback.current().is_some() {
            return Activation::Nothing;
        }
        let Some(url) = item.media_ref().filter(|u| !u.is_empty()) else {
            return Activation::Nothing;
        };

        let activation = match classify(Some(url)) {
            MediaKind::Image => Activation::OpenImage(url.to_string()),
            MediaKind::Site => Activation::OpenSite(url.to_string()),
            MediaKind::Video => match extract_video_id(Some(url)) {
                Some(id) => Activation::Play {
                    video_id: id.to_string(),
                    src: url.to_string(),
                },
                None => Activation::NoVideoId,
            },
        };

        if let Activation::Play { video_id, .. } = &activation {
            self.play(video_id.clone());
        }
        activation
    }
}

/// Derive the card for one item given the current playback flag.
///
/// The player check runs on the derived video id alone, before the media kind
/// is looked at. While any video plays, every other card is title only.
pub fn card_for(item: &Item, playback: &PlaybackState) -> Card {
    let media = match item.media_ref().filter(|u| !u.is_empty()) {
        None => CardMedia::None,
        Some(url) => {
            let video_id = extract_video_id(Some(url));
            match video_id {
                Some(id) if playback.is_playing(id) => CardMedia::Player {
                    video_id: id.to_string(),
                    src: url.to_string(),
                },
                _ if playback.current().is_some() => CardMedia::None,
                _ => match classify(Some(url)) {
                    MediaKind::Image => CardMedia::Image {
                        url: url.to_string(),
                    },
                    MediaKind::Video => CardMedia::Thumbnail {
                        video_id: video_id.map(str::to_string),
                        thumbnail_url: thumbnail_url(video_id),
                        url: url.to_string(),
                    },
                    MediaKind::Site => CardMedia::Site {
                        url: url.to_string(),
                    },
                },
            }
        }
    };

    Card {
        id: item.id,
        name: item.name.clone(),
        media,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, name: &str, media: Option<&str>) -> Item {
        Item {
            id,
            name: name.to_string(),
            media_ref: media.map(str::to_string),
        }
    }

    fn sample_page() -> Page {
        let mut page = Page::new();
        page.set_items(vec![
            item(1, "Photo", Some("https://cdn.example.com/a.JPG")),
            item(2, "Clip", Some("https://www.youtube.com/watch?v=abc12345678")),
            item(3, "Other clip", Some("https://www.youtube.com/embed/zzz98765432")),
            item(4, "Site", Some("https://olimpiadas.app")),
            item(5, "Bare", None),
        ]);
        page
    }

    #[test]
    fn test_new_page_is_loading() {
        let page = Page::new();
        assert!(page.is_loading());
        assert!(page.cards().is_empty());
    }

    #[test]
    fn test_fetch_failure_keeps_loading() {
        let mut page = Page::new();
        page.fetch_failed(&FetchError::Status(503));
        assert!(page.is_loading());
        assert!(page.cards().is_empty());
        assert!(page.last_error().unwrap().contains("503"));
    }

    #[test]
    fn test_cards_follow_classification() {
        let page = sample_page();
        let cards = page.cards();
        assert_eq!(cards.len(), 5);
        assert_eq!(
            cards[0].media,
            CardMedia::Image {
                url: "https://cdn.example.com/a.JPG".into()
            }
        );
        assert_eq!(
            cards[1].media,
            CardMedia::Thumbnail {
                video_id: Some("abc12345678".into()),
                thumbnail_url: Some(
                    "https://i3.ytimg.com/vi/abc12345678/maxresdefault.jpg".into()
                ),
                url: "https://www.youtube.com/watch?v=abc12345678".into(),
            }
        );
        assert_eq!(
            cards[3].media,
            CardMedia::Site {
                url: "https://olimpiadas.app".into()
            }
        );
        assert_eq!(cards[4].media, CardMedia::None);
        assert_eq!(cards[4].name, "Bare");
    }

    #[test]
    fn test_activate_video_swaps_thumbnail_for_player() {
        let mut page = sample_page();
        let activation = page.activate(1);
        assert_eq!(
            activation,
            Activation::Play {
                video_id: "abc12345678".into(),
                src: "https://www.youtube.com/watch?v=abc12345678".into(),
            }
        );
        assert_eq!(page.playback().current(), Some("abc12345678"));

        let cards = page.cards();
        assert_eq!(
            cards[1].media,
            CardMedia::Player {
                video_id: "abc12345678".into(),
                src: "https://www.youtube.com/watch?v=abc12345678".into(),
            }
        );
        let players = cards
            .iter()
            .filter(|c| matches!(c.media, CardMedia::Player { .. }))
            .count();
        assert_eq!(players, 1);
        assert_eq!(cards[2].media, CardMedia::None);
    }

    #[test]
    fn test_playing_hides_other_media() {
        let mut page = Page::new();
        page.set_items(vec![
            item(1, "Photo", Some("https://cdn.example.com/a.jpg")),
            item(2, "Clip", Some("https://www.youtube.com/watch?v=abc12345678")),
            item(3, "Site", Some("https://olimpiadas.app")),
        ]);
        page.activate(1);

        let cards = page.cards();
        assert_eq!(cards[0].media, CardMedia::None);
        assert!(matches!(cards[1].media, CardMedia::Player { .. }));
        assert_eq!(cards[2].media, CardMedia::None);
        assert_eq!(cards[2].name, "Site");

        // an id no card carries still hides everything
        page.play("zzz98765432");
        assert!(page.cards().iter().all(|c| c.media == CardMedia::None));
    }

    #[test]
    fn test_cards_are_inert_while_playing() {
        let mut page = sample_page();
        page.activate(1);
        assert_eq!(page.activate(0), Activation::Nothing);
        assert_eq!(page.activate(1), Activation::Nothing);
        assert_eq!(page.activate(2), Activation::Nothing);
        assert_eq!(page.playback().current(), Some("abc12345678"));

        page.end();
        page.activate(2);
        let cards = page.cards();
        assert_eq!(cards[1].media, CardMedia::None);
        assert!(matches!(cards[2].media, CardMedia::Player { .. }));
    }

    #[test]
    fn test_end_restores_thumbnail() {
        let mut page = sample_page();
        page.activate(1);
        page.end();
        assert_eq!(page.playback().current(), None);
        assert!(matches!(page.cards()[1].media, CardMedia::Thumbnail { .. }));
    }

    #[test]
    fn test_activate_non_video_leaves_playback_alone() {
        let mut page = sample_page();
        assert_eq!(
            page.activate(0),
            Activation::OpenImage("https://cdn.example.com/a.JPG".into())
        );
        assert_eq!(
            page.activate(3),
            Activation::OpenSite("https://olimpiadas.app".into())
        );
        assert_eq!(page.activate(4), Activation::Nothing);
        assert_eq!(page.activate(99), Activation::Nothing);
        assert_eq!(page.playback().current(), None);
    }

    #[test]
    fn test_video_without_id() {
        let mut page = Page::new();
        page.set_items(vec![item(1, "Channel", Some("https://www.youtube.com/@someone"))]);
        assert_eq!(
            page.cards()[0].media,
            CardMedia::Thumbnail {
                video_id: None,
                thumbnail_url: None,
                url: "https://www.youtube.com/@someone".into(),
            }
        );
        assert_eq!(page.activate(0), Activation::NoVideoId);
        assert_eq!(page.playback().current(), None);
    }

    #[test]
    fn test_short_link_is_a_site_card() {
        let mut page = Page::new();
        page.set_items(vec![item(1, "Short", Some("https://youtu.be/abc12345678"))]);
        assert!(matches!(page.cards()[0].media, CardMedia::Site { .. }));
        assert!(matches!(page.activate(0), Activation::OpenSite(_)));
    }

    #[test]
    fn test_thumbnail_image_matches_playing_id() {
        // a CDN thumbnail shares the id of its video, so it turns into the player too
        let mut page = Page::new();
        page.set_items(vec![item(
            1,
            "Cover",
            Some("https://i3.ytimg.com/vi/abc12345678/maxresdefault.jpg"),
        )]);
        assert!(matches!(page.cards()[0].media, CardMedia::Image { .. }));
        page.play("abc12345678");
        assert!(matches!(page.cards()[0].media, CardMedia::Player { .. }));
    }
}
