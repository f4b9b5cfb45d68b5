mod controller;
mod directive;
mod history;
mod prompt;
mod store;
mod turn;

pub use controller::{
    analyze_source, ControllerState, ExchangeOutcome, ReplySource, SessionController,
};
pub use directive::Directive;
pub use history::Session;
pub use prompt::assemble;
pub use store::MemoryStore;
pub use turn::{Role, Turn};
