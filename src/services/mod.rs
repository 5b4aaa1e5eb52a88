//! 服务模块

pub mod chat;
pub mod research;
pub mod router;
pub mod templates;

pub use chat::ChatService;
pub use research::ResearchAgent;
pub use router::{QueryRouter, Strategy, classify};
