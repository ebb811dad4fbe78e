//! Test helpers - bot construction

use std::sync::Arc;

use modbot_engine::{Bot, CommandHandlerFeature, LoggerFeature, MemoryUserStore};

use crate::fixtures::{test_config, FixedConnection, RecordingGateway};

/// Connect and activate a bot against a fresh recording gateway
pub async fn running_bot() -> (Bot, Arc<RecordingGateway>) {
    let gateway = Arc::new(RecordingGateway::default());
    let mut bot = Bot::new(test_config(), Arc::new(MemoryUserStore::new()));
    bot.connect(&FixedConnection {
        gateway: Arc::clone(&gateway),
    })
    .await
    .expect("stub connection cannot fail");
    bot.activate_features(vec![Box::new(LoggerFeature), Box::new(CommandHandlerFeature)])
        .await
        .expect("builtin features activate cleanly");
    (bot, gateway)
}
