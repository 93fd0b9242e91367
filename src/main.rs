//! RefTrack Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Update;
use teloxide::utils::command::BotCommands as TeloxideBotCommands;
use tracing::{error, info, warn};

use reftrack::{
    config::Settings,
    database::{connection::create_pool, connection::run_migrations, UserRepository},
    handlers::{callbacks::handle_callback_query, commands::handle_start, AppWorkflow},
    services::membership::ChannelMembershipService,
    utils::logging,
    workflow::ReferralWorkflow,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file appender alive.
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting RefTrack bot...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;
    run_migrations(&db_pool).await?;

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Wire the workflow core
    let store = UserRepository::new(db_pool, settings.i18n.default_locale);
    let oracle = ChannelMembershipService::new(
        bot.clone(),
        settings.bot.channel_id,
        settings.oracle.timeout_seconds,
    );
    let workflow = ReferralWorkflow::new(
        store,
        oracle,
        settings.i18n.default_locale,
        settings.bot.username.clone(),
        settings.bot.channel_invite_link.clone(),
    );

    info!("Setting up bot handlers...");

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![Arc::new(workflow)])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("RefTrack bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("RefTrack bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message().branch(
                dptree::entry()
                    .filter_command::<BotCommand>()
                    .endpoint(handle_commands),
            ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

#[derive(TeloxideBotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "RefTrack Bot Commands")]
enum BotCommand {
    #[command(description = "Start the bot and onboarding")]
    Start,
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    workflow: Arc<AppWorkflow>,
) -> HandlerResult {
    let result = match cmd {
        BotCommand::Start => handle_start(bot, msg, workflow).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    workflow: Arc<AppWorkflow>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, workflow).await {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
