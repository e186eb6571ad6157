//! 数据模型定义
//!
//! 用户进度记录及其更新方法。词条 [`WordRecord`] 与答题统计
//! [`AttemptStats`] 定义在 beici-algo 的 types 模块中，这里只定义
//! 需要落盘的聚合结构。
//!
//! [`WordRecord`]: beici_algo::WordRecord
//! [`AttemptStats`]: beici_algo::AttemptStats

use beici_algo::{AttemptStats, KnownWords, WordStatsMap};
use serde::{Deserialize, Serialize};

// ============================================================
// UserProgress - 用户学习进度
// ============================================================

/// 一个用户的完整学习进度
///
/// 磁盘格式：`{"known_words": {"<id>": true, ...},
/// "word_stats": {"<id>": {"correct": c, "wrong": w}, ...}}`。
/// 两个字段缺失时按空表处理。统计条目通过 id 字符串弱引用词条，
/// 词条从词库消失后条目成为孤儿，读取方需静默容忍。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    /// 已标记为掌握的词条集合
    #[serde(default)]
    pub known_words: KnownWords,
    /// 每词条的答题统计
    #[serde(default)]
    pub word_stats: WordStatsMap,
}

impl UserProgress {
    /// 词条是否已标记为掌握
    pub fn is_known(&self, word_key: &str) -> bool {
        self.known_words.contains_key(word_key)
    }

    /// 已掌握词条数
    pub fn known_count(&self) -> usize {
        self.known_words.len()
    }

    /// 标记 / 取消掌握
    ///
    /// 重复标记与取消未标记的词条都是无操作。
    /// 返回集合是否发生了变化。
    pub fn set_known(&mut self, word_key: &str, known: bool) -> bool {
        if known {
            self.known_words.insert(word_key.to_string(), true).is_none()
        } else {
            self.known_words.remove(word_key).is_some()
        }
    }

    /// 记录一次答题
    ///
    /// 词条没有统计条目时先创建零值条目，再递增对应计数器。
    /// 每次调用就是一次答题事件，调用两次记两次。
    pub fn record_attempt(&mut self, word_key: &str, correct: bool) -> AttemptStats {
        let stats = self.word_stats.entry(word_key.to_string()).or_default();
        if correct {
            stats.correct += 1;
        } else {
            stats.wrong += 1;
        }
        *stats
    }

    /// 某词条的答题统计
    pub fn stats_of(&self, word_key: &str) -> Option<&AttemptStats> {
        self.word_stats.get(word_key)
    }
}

// ============================================================
// 单元测试
// ============================================================
