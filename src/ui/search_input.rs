use iced::widget::text_input;
use iced::{Element, Fill};

use crate::app::Message;
use crate::ui::theme;

/// Widget ID of the search field
pub const SEARCH_INPUT_ID: &str = "search-input";

/// Build the search input widget. Every edit is reported, with no
/// minimum length and no trimming.
pub fn view(query: &str) -> Element<'_, Message> {
    text_input("Search products...", query)
        .on_input(Message::QueryChanged)
        .id(SEARCH_INPUT_ID)
        .padding(12)
        .size(18)
        .width(Fill)
        .style(theme::search_input)
        .into()
}
