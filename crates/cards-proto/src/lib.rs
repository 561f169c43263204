pub mod config;
pub mod fetch;
pub mod item;
pub mod media;
pub mod page;
pub mod platform;
pub mod playback;
