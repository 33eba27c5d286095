use std::sync::Arc;

use teloxide::Bot;
use tokio_util::sync::CancellationToken;

use hwb_core::{config::Config, poller::Poller};
use hwb_practicum::PracticumClient;
use hwb_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> Result<(), hwb_core::Error> {
    hwb_core::logging::init("hwb")?;

    // Missing secrets are the only fatal condition; everything after this
    // point is retried inside the poll loop.
    let cfg = Arc::new(Config::load()?);

    let bot = Bot::new(cfg.telegram_bot_token.clone());
    let messenger = Arc::new(TelegramMessenger::new(bot));
    let source = Arc::new(PracticumClient::new(
        cfg.endpoint.clone(),
        cfg.practicum_token.clone(),
        cfg.http_timeout,
    ));

    let mut poller = Poller::new(cfg, source, messenger);
    poller.run(CancellationToken::new()).await;

    Ok(())
}
