//! JSON 文件存储模块
//!
//! 把词库文件与每用户进度文件当作一个简单的键值持久层使用：
//! - 词库：启动时一次性加载，运行期间只读
//! - 用户进度：每次变更后全量覆盖写回（last write wins，无合并语义）
//!
//! 换成嵌入式键值库不需要改动 Store 的对外契约。

// ============================================================
// 子模块声明
// ============================================================

pub mod models;
pub mod user_progress;
pub mod word_bank;

// ============================================================
// 重新导出主要类型
// ============================================================

pub use models::UserProgress;
pub use user_progress::UserProgressStore;
pub use word_bank::WordBank;

// ============================================================
// 错误类型定义
// ============================================================

use thiserror::Error;

/// 存储模块错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("词库不可用: {0}")]
    BankUnavailable(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("用户已存在: {0}")]
    UserExists(String),

    #[error("非法用户名: {0}")]
    InvalidUserName(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
