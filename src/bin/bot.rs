use std::{process::ExitCode, sync::Arc};

use twitch_kit_bot::*;

use config::Config;
use controller::{Context, Controller};
use error::BotError;
use fetcher::HttpFetcher;
use handlers::*;
use session::SessionStore;
use teloxide::{dispatching::ShutdownToken, prelude::*, utils::command::BotCommands};

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(BotError::Cli(e)) => e.exit(),
        Err(e) => {
            log::error!("failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> error::Result<()> {
    let bot = Bot::new(&config.telegram_token);
    let me = bot.get_me().await.map_err(BotError::Init)?;
    log::info!("Authorized as @{}", me.username());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("couldn't set the bot's commands: {}", e);
    }

    let fetcher = HttpFetcher::new(config.api_host.clone(), config.request_timeout())?;
    let controller = Arc::new(Controller::new(
        Context::new(Arc::new(fetcher), SessionStore::new(), me.username()),
        config.update_timeout(),
    ));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![controller])
        .default_handler(|_| Box::pin(async {}))
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error from the update listener",
        ))
        .enable_ctrlc_handler()
        .build();
    stop_on_terminate(dispatcher.shutdown_token());

    log::info!("Started");
    dispatcher.dispatch().await;
    log::info!("Stopped");

    Ok(())
}

#[cfg(unix)]
fn stop_on_terminate(token: ShutdownToken) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("couldn't listen for SIGTERM: {}", e);
                return;
            }
        };
        terminate.recv().await;
        log::info!("SIGTERM received, shutting down");
        match token.shutdown() {
            Ok(f) => f.await,
            Err(_) => log::debug!("dispatcher was not running"),
        }
    });
}

#[cfg(not(unix))]
fn stop_on_terminate(_token: ShutdownToken) {}
