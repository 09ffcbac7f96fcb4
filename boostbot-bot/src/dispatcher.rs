//! Command dispatcher.
//!
//! Turns chat commands into replies. Two commands exist: a greeting
//! (`/start`, `/help`) and `/card`, which reads the current snapshot
//! through the cache. Every snapshot status renders to a reply, so the
//! user never gets silence.

use boostbot_core::{CardSnapshot, SnapshotSource, SnapshotStatus};
use boostbot_store::SnapshotCache;
use tracing::{debug, info};

use crate::telegram::Update;

/// Greeting sent for `/start` and `/help`.
pub const GREETING: &str = "Привет! Я бот для проверки карт с animestars.org. \
     Используй /card, чтобы узнать текущую карту и владельцев.";

const NO_OWNERS: &str = "Владельцев пока нет.";
const LOGIN_FAILED: &str = "Не удалось войти на сайт. Проверьте логин и пароль бота.";
const PAGE_FAILED: &str = "Не удалось загрузить страницу с картой. Попробуйте позже.";
const DATA_UNAVAILABLE: &str =
    "Информация о карте сейчас недоступна: страница изменилась или карта не найдена.";

// ============================================================================
// Command Parsing
// ============================================================================

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lowercased command name without the slash or bot mention.
    pub name: String,
    /// Everything after the command, trimmed.
    pub args: String,
}

/// Parses `/name@BotName args` into a [`Command`].
pub fn parse_command(text: &str) -> Option<Command> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, args) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    let name = head.split('@').next().unwrap_or_default().to_lowercase();

    if name.is_empty() {
        return None;
    }

    Some(Command {
        name,
        args: args.trim().to_string(),
    })
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders a snapshot as a chat reply.
pub fn render_snapshot(snapshot: &CardSnapshot) -> String {
    match snapshot.status() {
        SnapshotStatus::Ok if snapshot.has_no_owners() => {
            format!("Текущая карта: {}\n{NO_OWNERS}", snapshot.card_name())
        }
        SnapshotStatus::Ok => format!(
            "Текущая карта: {}\nВладельцы:\n{}",
            snapshot.card_name(),
            snapshot.owners().join("\n")
        ),
        SnapshotStatus::AuthFailed => LOGIN_FAILED.to_string(),
        SnapshotStatus::PageUnavailable | SnapshotStatus::NetworkError => PAGE_FAILED.to_string(),
        SnapshotStatus::SelectorMiss => DATA_UNAVAILABLE.to_string(),
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes commands to handlers.
pub struct Dispatcher<S: SnapshotSource> {
    cache: SnapshotCache<S>,
}

impl<S: SnapshotSource> Dispatcher<S> {
    /// Creates a dispatcher reading snapshots through `cache`.
    pub fn new(cache: SnapshotCache<S>) -> Self {
        Self { cache }
    }

    /// Handles one command. Unknown commands yield `None`.
    pub async fn handle_command(&self, name: &str, args: &str) -> Option<String> {
        match name {
            "start" | "help" => Some(GREETING.to_string()),
            "card" => {
                if !args.is_empty() {
                    debug!(args, "Ignoring /card arguments");
                }
                let snapshot = self.cache.get_or_fetch().await;
                info!(
                    status = %snapshot.status(),
                    owners = snapshot.owners().len(),
                    "Answering /card"
                );
                Some(render_snapshot(&snapshot))
            }
            other => {
                debug!(command = other, "Unknown command ignored");
                None
            }
        }
    }

    /// Handles an update, returning the chat to reply to and the reply.
    pub async fn handle_update(&self, update: &Update) -> Option<(i64, String)> {
        let message = update.message.as_ref()?;
        let command = parse_command(message.text.as_deref()?)?;
        let reply = self.handle_command(&command.name, &command.args).await?;
        Some((message.chat.id, reply))
    }
}

// ============================================================================
// Tests
// ============================================================================
