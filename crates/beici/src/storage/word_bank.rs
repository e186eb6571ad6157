//! 词库加载
//!
//! 词库是一个 UTF-8 JSON 数组文件，进程启动时加载一次，之后只读。
//! 文件缺失或整体解析失败返回错误由调用方提示用户；
//! 个别字段不全的词条记一条警告后跳过，不影响其余词条。

use std::path::Path;

use beici_algo::WordRecord;

use crate::storage::{StorageError, StorageResult};

/// 只读词库
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    words: Vec<WordRecord>,
}

impl WordBank {
    /// 从 JSON 文件加载词库
    pub fn load<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path).map_err(|e| {
            StorageError::BankUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let entries: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
            StorageError::BankUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let mut words = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<WordRecord>(entry) {
                Ok(word) => words.push(word),
                Err(e) => log::warn!("跳过无效词条: {e}"),
            }
        }

        log::info!("词库加载完成: {} ({} 个词条)", path.display(), words.len());
        Ok(Self { words })
    }

    /// 空词库（词库文件不可用时的降级状态）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从内存中的词条列表构建（用于测试）
    pub fn from_words(words: Vec<WordRecord>) -> Self {
        Self { words }
    }

    /// 全部词条，保持文件中的顺序
    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// 按 id 查找词条
    pub fn get(&self, id: u32) -> Option<&WordRecord> {
        self.words.iter().find(|w| w.id == id)
    }

    /// 词库中出现过的所有单元，排序去重
    pub fn units(&self) -> Vec<String> {
        let mut units: Vec<String> = self.words.iter().map(|w| w.unit.clone()).collect();
        units.sort();
        units.dedup();
        units
    }

    /// 词库中出现过的所有词性，排序去重
    pub fn parts_of_speech(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .words
            .iter()
            .map(|w| w.part_of_speech.clone())
            .collect();
        types.sort();
        types.dedup();
        types
    }
}

// ============================================================
// 单元测试
// ============================================================
