//! TUI widgets.

mod help;
mod home;
mod market_list;
mod news_list;
mod notifications;
mod prediction;
mod status_bar;
mod tab_bar;

pub use help::HelpPanel;
pub use home::HomePanel;
pub use market_list::MarketList;
pub use news_list::NewsList;
pub use notifications::render_notification;
pub use prediction::PredictionPanel;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
