use std::process;

use iced::Size;

use searchbox::app::State;
use searchbox::backend::http::SearchClient;
use searchbox::config;

fn main() -> iced::Result {
    searchbox::init_logging();

    let config = config::load();

    let client = match SearchClient::new(&config.server.endpoint, config.server.timeout()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("searchbox: {e}");
            process::exit(2);
        }
    };
    let ordering = config.search.ordering;

    tracing::info!(
        "Starting Searchbox against {} (ordering: {:?})",
        client.endpoint(),
        ordering
    );

    iced::application(
        move || State::with_client(client.clone(), ordering),
        State::update,
        State::view,
    )
    .title(State::title)
    .theme(State::theme)
    .style(State::style)
    .window_size(Size::new(config.window.width, config.window.height))
    .run()
}
