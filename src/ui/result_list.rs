use iced::widget::{column, container, scrollable, text, Column};
use iced::{Element, Fill, Padding};

use crate::app::Message;
use crate::render::ResultBlock;
use crate::ui::theme;

/// Widget ID of the result container
pub const SEARCH_RESULTS_ID: &str = "search-results";

/// Build the result container: one card per block, heading then price
pub fn view(blocks: &[ResultBlock]) -> Element<'_, Message> {
    let cards: Vec<Element<'_, Message>> = blocks
        .iter()
        .map(|block| {
            let mut card = column![
                text(&block.heading).size(18).style(theme::result_heading),
                text(&block.body).size(14).style(theme::result_price),
            ]
            .spacing(2);

            if let Some(detail) = &block.detail {
                card = card.push(text(detail).size(12).style(theme::secondary));
            }

            container(card)
                .padding(Padding::from([8, 12]))
                .width(Fill)
                .style(theme::result_card)
                .into()
        })
        .collect();

    let list = Column::from_vec(cards).spacing(6);

    scrollable(list)
        .id(SEARCH_RESULTS_ID)
        .height(Fill)
        .into()
}
