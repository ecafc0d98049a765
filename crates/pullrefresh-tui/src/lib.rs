pub mod app;
pub mod event;
pub mod feed;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use feed::{DemoFeed, FeedError, FeedItem};
pub use theme::Theme;
