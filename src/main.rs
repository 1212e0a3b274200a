//! Application entry point — slidecast console driver.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Build the slide service client ([`ApiSlideService`]) from config.
//! 4. Wire the [`SessionController`] and start the session.
//! 5. Read stdin line by line: plain lines become finalized narration
//!    segments; `/commands` drive the rest of the surface.
//!
//! # Commands
//!
//! | Input            | Effect                                           |
//! |------------------|--------------------------------------------------|
//! | plain text       | finalized transcript segment                     |
//! | `/prompt <text>` | presenter prompt (forced exploratory dispatch)   |
//! | `/accept`        | take + accept the current exploratory slide      |
//! | `/next` `/prev`  | navigate the exploratory channel                 |
//! | `/pause` `/resume` | pause / resume generation                      |
//! | `/status`        | print session status                             |
//! | `/quit`          | stop the session and exit                        |

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use slidecast::channel::{ChannelKind, Direction};
use slidecast::config::AppConfig;
use slidecast::generate::ApiSlideService;
use slidecast::session::SessionController;
use slidecast::transcript::TranscriptEvent;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("slidecast starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Slide service client — one client implements all three seams.
    let service = Arc::new(ApiSlideService::from_config(&config.service));

    // 4. Controller
    let controller =
        SessionController::new(config, service.clone(), service.clone(), service);
    controller.start();

    println!("narrate below — /prompt, /accept, /next, /prev, /pause, /resume, /status, /quit");

    // 5. stdin loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest)) {
            ("/quit", _) => break,
            ("/pause", _) => controller.pause(),
            ("/resume", _) => controller.resume(),
            ("/prompt", rest) if !rest.is_empty() => {
                let current = controller.peek_current(ChannelKind::Exploratory);
                controller.enqueue_presenter_prompt(rest.to_string(), current);
            }
            ("/accept", _) => match controller.take(ChannelKind::Exploratory) {
                Some(slide) => {
                    println!("accepted: {}", slide.headline.as_deref().unwrap_or("(untitled)"));
                    controller.accept_slide(slide);
                }
                None => println!("nothing to accept"),
            },
            ("/next", _) => {
                controller.navigate(ChannelKind::Exploratory, Direction::Next);
                print_current(&controller);
            }
            ("/prev", _) => {
                controller.navigate(ChannelKind::Exploratory, Direction::Prev);
                print_current(&controller);
            }
            ("/status", _) => {
                let status = controller.status();
                let info = controller.channel_info(ChannelKind::Exploratory);
                println!(
                    "gate: {} | processing: {} | paused: {} | exploratory: {}/{}",
                    status.gate_status.label(),
                    status.is_processing,
                    status.is_generation_paused,
                    if info.total == 0 { 0 } else { info.cursor + 1 },
                    info.total
                );
                if let Some(reason) = status.gate_status.reason() {
                    println!("  reason: {reason}");
                }
            }
            _ if line.starts_with('/') => println!("unknown command: {line}"),
            _ => {
                controller.handle_transcript(TranscriptEvent {
                    text: line.to_string(),
                    is_final: true,
                });
            }
        }
    }

    controller.stop();
    log::info!("slidecast shut down");
    Ok(())
}

fn print_current(controller: &SessionController) {
    match controller.peek_current(ChannelKind::Exploratory) {
        Some(slide) => {
            let info = controller.channel_info(ChannelKind::Exploratory);
            println!(
                "[{}/{}] {}",
                info.cursor + 1,
                info.total,
                slide.headline.as_deref().unwrap_or("(untitled)")
            );
        }
        None => println!("(empty channel)"),
    }
}
