use std::sync::Arc;

use iced::widget::{column, container, text};
use iced::{Color, Element, Fill, Padding, Task, Theme};

use crate::backend::http::SearchClient;
use crate::backend::{SearchError, SearchResult};
use crate::config::ResponseOrdering;
use crate::controller::{Completion, Controller, RequestId};
use crate::render::{self, ResultBlock};
use crate::ui::{result_list, search_input, theme};

pub struct State {
    controller: Controller,
    /// Live text of the search field
    query: String,
    /// Rendered form of `controller.results()`
    blocks: Vec<ResultBlock>,
    status: Status,
}

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Idle,
    Showing(usize),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    SearchCompleted {
        id: RequestId,
        outcome: Result<Vec<SearchResult>, SearchError>,
    },
}

impl State {
    /// State backed by the HTTP search client
    pub fn with_client(client: SearchClient, ordering: ResponseOrdering) -> (Self, Task<Message>) {
        Self::new(Controller::new(Arc::new(client), ordering))
    }

    pub fn new(controller: Controller) -> (Self, Task<Message>) {
        let state = Self {
            controller,
            query: String::new(),
            blocks: Vec::new(),
            status: Status::Idle,
        };
        (state, Self::on_ready())
    }

    /// Runs once the window exists: input events are routed through
    /// `Message::QueryChanged` from here on, so only focus is left to do.
    fn on_ready() -> Task<Message> {
        tracing::debug!(
            "Ready: input '{}', results '{}'",
            search_input::SEARCH_INPUT_ID,
            result_list::SEARCH_RESULTS_ID
        );
        iced::widget::operation::focus(search_input::SEARCH_INPUT_ID)
    }

    pub fn title(&self) -> String {
        String::from("Searchbox")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                let pending = self.controller.search(&query);
                self.query = query;
                let id = pending.id;
                Task::perform(pending.response, move |outcome| Message::SearchCompleted {
                    id,
                    outcome,
                })
            }
            Message::SearchCompleted { id, outcome } => {
                match self.controller.complete(id, outcome) {
                    Completion::Applied { count } => {
                        self.blocks = render::blocks(self.controller.results());
                        self.status = Status::Showing(count);
                    }
                    Completion::Failed(error) => {
                        self.status = Status::Failed(error.to_string());
                    }
                    Completion::Stale | Completion::Unknown => {}
                }
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let input = search_input::view(&self.query);
        let results = result_list::view(&self.blocks);
        let status = match &self.status {
            Status::Idle => text("").size(12),
            Status::Showing(1) => text("1 result").size(12).style(theme::secondary),
            Status::Showing(n) => text(format!("{n} results")).size(12).style(theme::secondary),
            Status::Failed(error) => text(error.as_str()).size(12).style(theme::error),
        };

        let content = column![input, results, status]
            .spacing(8)
            .padding(Padding::new(12.0));

        container(content)
            .width(Fill)
            .height(Fill)
            .style(theme::main_container)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn style(&self, _theme: &Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: theme::BACKGROUND,
            text_color: Color::WHITE,
        }
    }
}
