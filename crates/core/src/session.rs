//! Wires the chat stream, the command dispatcher and the game state together
//! and drives them one tick at a time.

use crate::area::{AreaBuilder, PassOutcome};
use crate::chat::{ChatEvent, ChatEvents, OutgoingMessage, Recipient};
use crate::commands::{
    builtin, CommandDefinition, CommandDispatcher, CommandSender, DefinitionError, Executor,
};
use crate::config::SessionConfig;
use crate::player::Player;
use crate::scheduler::{Task, TickScheduler};
use tagcraft_world::MemoryWorld;
use tracing::{debug, trace, warn};

pub const WORLD_MIN_Y: i32 = -64;
pub const WORLD_HEIGHT: usize = 384;

/// Everything commands and background tasks are allowed to touch.
pub struct GameState {
    pub world: MemoryWorld,
    pub scheduler: TickScheduler,
    pub tag_area: AreaBuilder,
    pub players: Vec<Player>,
    pub debug: bool,
    pub admin_tag: String,
    outbox: Vec<OutgoingMessage>,
    /// Receives the background progress of the tag area.
    area_observer: Option<Recipient>,
}

impl GameState {
    pub fn new(config: &SessionConfig) -> GameState {
        GameState {
            world: MemoryWorld::new(WORLD_MIN_Y, WORLD_HEIGHT, config.ground_height as i32),
            scheduler: TickScheduler::new(),
            tag_area: AreaBuilder::new(config.area_settings()),
            players: Vec::new(),
            debug: config.debug,
            admin_tag: config.admin_tag.clone(),
            outbox: Vec::new(),
            area_observer: None,
        }
    }

    pub fn send(&mut self, recipient: Recipient, text: impl Into<String>) {
        self.outbox.push(OutgoingMessage::info(recipient, text));
    }

    pub fn send_error(&mut self, recipient: Recipient, text: impl Into<String>) {
        self.outbox.push(OutgoingMessage::error(recipient, text));
    }

    pub fn recipient(&self, sender: CommandSender) -> Recipient {
        match sender {
            CommandSender::Player(index) => match self.players.get(index) {
                Some(player) => Recipient::Player(player.name.clone()),
                None => {
                    warn!("Message for unknown player index {}", index);
                    Recipient::Console
                }
            },
            CommandSender::Console => Recipient::Console,
        }
    }

    pub fn sender_name(&self, sender: CommandSender) -> &str {
        match sender {
            CommandSender::Player(index) => self
                .players
                .get(index)
                .map(|player| player.name.as_str())
                .unwrap_or("?"),
            CommandSender::Console => "Server",
        }
    }

    /// The console holds every permission.
    pub fn sender_has_permission(&self, sender: CommandSender, permission: &str) -> bool {
        match sender {
            CommandSender::Player(index) => self
                .players
                .get(index)
                .is_some_and(|player| player.has_permission(permission)),
            CommandSender::Console => true,
        }
    }

    pub fn set_area_observer(&mut self, recipient: Recipient) {
        self.area_observer = Some(recipient);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::TagAreaPass => self.run_tag_area_pass(),
        }
    }

    fn run_tag_area_pass(&mut self) {
        let observer = self.area_observer.clone().unwrap_or(Recipient::Console);
        match self.tag_area.run_pass(&mut self.world, &mut self.scheduler) {
            Ok(PassOutcome::Idle) => {}
            Ok(PassOutcome::InProgress { state, remaining }) => {
                if self.debug {
                    self.send(
                        observer,
                        format!(
                            "[Background Processing] TagArea.State: {}, {} blocks remaining.",
                            state, remaining
                        ),
                    );
                }
            }
            Ok(PassOutcome::Complete { state }) => {
                self.send(
                    observer,
                    format!("[Background Processing Complete] TagArea.State: {}.", state),
                );
            }
            Err(err) => {
                warn!("Tag area pass failed: {}", err);
                self.send_error(observer, format!("[Background Processing Error] {}", err));
            }
        }
    }
}

pub struct Session {
    pub chat: ChatEvents,
    pub dispatcher: CommandDispatcher,
    pub game: GameState,
}

impl Session {
    /// A session with no commands registered.
    pub fn new(config: &SessionConfig) -> Session {
        Session {
            chat: ChatEvents::new(),
            dispatcher: CommandDispatcher::new(config.command_prefix.clone()),
            game: GameState::new(config),
        }
    }

    pub fn with_builtins(config: &SessionConfig) -> Result<Session, DefinitionError> {
        let mut session = Session::new(config);
        builtin::register_commands(&mut session)?;
        Ok(session)
    }

    pub fn register_command(&mut self, definition: CommandDefinition, executor: Executor) {
        self.dispatcher.register(&mut self.chat, definition, executor);
    }

    pub fn add_player(&mut self, player: Player) -> CommandSender {
        debug!("{} joined at {}", player.name, player.pos);
        self.game.players.push(player);
        CommandSender::Player(self.game.players.len() - 1)
    }

    /// Delivers a chat line. Returns true if the line was consumed instead of
    /// being broadcast.
    pub fn handle_chat(&mut self, sender: CommandSender, message: impl Into<String>) -> bool {
        let mut event = ChatEvent::new(sender, message);
        if let Some(token) = self.chat.claim(&event.message) {
            if self.dispatcher.owns(token) {
                self.dispatcher.dispatch(&mut self.game, &mut event);
            }
        }

        if !event.is_cancelled() {
            let line = format!("<{}> {}", self.game.sender_name(sender), event.message);
            self.game.send(Recipient::Everyone, line);
        }
        event.is_cancelled()
    }

    /// Advances the scheduler one tick and runs every task due on it.
    pub fn tick(&mut self) {
        for (handle, task) in self.game.scheduler.advance() {
            trace!("Running task {} ({:?})", handle, task);
            self.game.run_task(task);
        }
    }

    pub fn drain_messages(&mut self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut self.game.outbox)
    }

    pub fn tag_area(&self) -> &AreaBuilder {
        &self.game.tag_area
    }
}
