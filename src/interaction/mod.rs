pub mod interaction;
pub mod log;

pub use interaction::{Interaction, InteractionError, InteractionType, Rating};
pub use log::InteractionLog;
