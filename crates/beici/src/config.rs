//! 运行配置
//!
//! 全部来自环境变量，未设置时使用与原始部署一致的相对路径。

use std::path::PathBuf;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 词库文件路径
    pub word_bank: PathBuf,
    /// 用户进度文件目录
    pub user_dir: PathBuf,
    /// 发音缓存目录
    pub audio_dir: PathBuf,
    /// 日志级别
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            word_bank: PathBuf::from("main.json"),
            user_dir: PathBuf::from("users"),
            audio_dir: PathBuf::from("audio"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let word_bank = std::env::var("BEICI_WORD_BANK")
            .map(PathBuf::from)
            .unwrap_or(defaults.word_bank);

        let user_dir = std::env::var("BEICI_USER_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.user_dir);

        let audio_dir = std::env::var("BEICI_AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.audio_dir);

        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);

        Self {
            word_bank,
            user_dir,
            audio_dir,
            log_level,
        }
    }
}
