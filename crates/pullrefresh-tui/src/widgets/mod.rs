mod feed_list;
mod indicator;
mod status_bar;

pub use feed_list::FeedListWidget;
pub use indicator::IndicatorWidget;
pub use status_bar::StatusBarWidget;
