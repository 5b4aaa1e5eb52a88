//! 核心数据模型模块
//!
//! 定义研究流水线的数据结构（Topic, KeywordSet, Candidate, RankedResults 等）
//! 以及对话传输层使用的消息模型。

pub mod message;
pub mod research;

pub use message::*;
pub use research::*;
