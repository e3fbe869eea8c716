mod broadcaster;
mod messages;
mod render;
mod service;

pub use broadcaster::DiscordBroadcaster;
pub use messages::GameMessages;
pub use render::GameButton;
pub use service::TicTacToeService;
