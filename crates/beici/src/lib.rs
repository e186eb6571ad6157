//! # beici - 背词
//!
//! 本地词汇背诵工具的应用层：
//!
//! - JSON 词库加载与每用户 JSON 进度文件的持久化
//! - 学习会话控制（单词卡片 / 选择题 / 拼写测试）
//! - espeak 发音合成与磁盘缓存
//!
//! 选词、筛选等纯算法在 [`beici_algo`] crate 中实现，
//! 本 crate 负责把它们接到存储与外部引擎上。
//! 任何前端（终端、桌面、HTTP）都通过 [`session::Session`] 驱动学习流程，
//! 自带的终端前端见 `src/bin/beici.rs`。

pub mod audio;
pub mod config;
pub mod platform;
pub mod session;
pub mod storage;

pub use beici_algo as algo;

pub use config::AppConfig;
pub use session::{Session, SessionError, SessionResult, StudyMode};
pub use storage::{StorageError, StorageResult, UserProgress, UserProgressStore, WordBank};
