use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::bootstrap::Application;
use crate::console::Console;

/// Transcript entry recorded after a failed turn, so the next completion
/// sees that the previous question went unanswered.
const RECOVERY_NOTE: &str = "I apologize, but I encountered an error. Could you please try again?";

pub async fn run(app: Application) -> Result<()> {
    let console = Console::default();
    console.banner();

    let mut conversation = app.runtime.start_conversation();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut turns: usize = 0;

    info!(
        event_name = "session.started",
        model = %app.config.llm.model,
        "console session started"
    );

    loop {
        console.prompt();

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };

        // None covers both end of input and an interrupt.
        let Some(line) = line else {
            console.goodbye();
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_keyword(input) {
            console.goodbye();
            break;
        }

        console.thinking();
        turns += 1;
        match app.runtime.respond(&mut conversation, input).await {
            Ok(reply) => {
                console.tool_trace(&reply.trace);
                console.agent_reply(&reply.text);
            }
            Err(error) => {
                warn!(event_name = "session.turn_failed", error = %error, "agent turn failed");
                console.error(error.user_message());
                conversation.push_assistant_text(RECOVERY_NOTE);
            }
        }
    }

    info!(event_name = "session.ended", turns, "console session ended");
    Ok(())
}

fn is_exit_keyword(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}
