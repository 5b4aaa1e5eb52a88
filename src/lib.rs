//! Athena - 研究综述对话服务
//!
//! 把百科摘要与近期论文检索结果组合成一份结构化的研究报告，
//! 通过 REST API 和 WebSocket 对外提供问答。

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod sources;
pub mod storage;
pub mod websocket;
