mod example_cards;
mod input_bar;
mod result_panel;
mod status_banner;

pub use example_cards::ExampleCards;
pub use input_bar::InputBar;
pub use result_panel::ResultPanel;
pub use status_banner::StatusBanner;
