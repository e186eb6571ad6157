//! 公共类型和常量
//!
//! 定义词条、答题统计、筛选条件等各算法模块共享的数据结构。
//! 词库文件与用户进度文件的字段名以这里的 serde 属性为准。

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

// ==================== 常量 ====================

/// 基础权重：没有任何答题记录的词条的权重
pub const BASE_WEIGHT: i64 = 10;

/// 每次答错增加的权重
pub const WRONG_BONUS: i64 = 3;

/// 权重下限：保证每个候选词都有非零概率被抽中
pub const MIN_WEIGHT: i64 = 1;

/// 选择题的选项数量（含正确答案）
pub const QUIZ_OPTION_COUNT: usize = 4;

// ==================== 类型别名 ====================

/// 已掌握词条集合：以 id 字符串为键的存在表
///
/// 与进度文件中 `{"<id>": true, ...}` 的形式一一对应，
/// 判断是否掌握只看键是否存在。
pub type KnownWords = BTreeMap<String, bool>;

/// 答题统计表：id 字符串 -> 统计
pub type WordStatsMap = BTreeMap<String, AttemptStats>;

// ==================== WordRecord - 词条 ====================

/// 词库中的一个词条
///
/// 词库加载后不再变化。`id` 是词条的唯一标识，
/// 统计与掌握标记均以 `id` 的字符串形式为键引用词条。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// 词条唯一标识
    pub id: u32,
    /// 英文单词
    pub en: String,
    /// 中文释义
    pub zh: String,
    /// 所属单元；文件中可能是数字，统一转为字符串比较
    #[serde(default, deserialize_with = "unit_as_string")]
    pub unit: String,
    /// 词性 (如 "n."、"v.")
    #[serde(rename = "type", default)]
    pub part_of_speech: String,
}

impl WordRecord {
    /// 统计与掌握表中使用的键
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// 兼容 `unit` 字段以字符串或数字出现的两种写法
fn unit_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ==================== AttemptStats - 答题统计 ====================

/// 单个词条的答题统计
///
/// 两个计数器只增不减，缺失的字段按 0 处理。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStats {
    /// 答对次数
    #[serde(default)]
    pub correct: u32,
    /// 答错次数
    #[serde(default)]
    pub wrong: u32,
}

impl AttemptStats {
    /// 总答题次数
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }

    /// 错误率 [0, 1]；没有记录时为 0
    pub fn error_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            f64::from(self.wrong) / f64::from(total)
        }
    }
}

// ==================== FilterCriteria - 筛选条件 ====================

/// 筛选条件
///
/// 各条件取合取；空集合表示该维度不筛选。
/// 会话内临时状态，不持久化。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// 选中的单元集合（字符串形式）
    pub units: BTreeSet<String>,
    /// 选中的词性集合
    pub types: BTreeSet<String>,
    /// 复习模式：只保留已标记为掌握的词条
    pub review_only: bool,
}

impl FilterCriteria {
    /// 是否没有任何生效的筛选条件
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.types.is_empty() && !self.review_only
    }
}

// ==================== 单元测试 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_record_unit_as_number() {
        let word: WordRecord =
            serde_json::from_str(r#"{"id":1,"en":"cat","zh":"猫","unit":3,"type":"n."}"#)
                .expect("Failed to parse word");
        assert_eq!(word.unit, "3");
        assert_eq!(word.part_of_speech, "n.");
    }

    #[test]
    fn test_word_record_unit_as_string() {
        let word: WordRecord =
            serde_json::from_str(r#"{"id":1,"en":"cat","zh":"猫","unit":"3","type":"n."}"#)
                .expect("Failed to parse word");
        assert_eq!(word.unit, "3");
    }

    #[test]
    fn test_word_record_missing_optional_fields() {
        let word: WordRecord = serde_json::from_str(r#"{"id":7,"en":"dog","zh":"狗"}"#)
            .expect("Failed to parse word");
        assert_eq!(word.unit, "");
        assert_eq!(word.part_of_speech, "");
        assert_eq!(word.key(), "7");
    }

    #[test]
    fn test_attempt_stats_defaults() {
        let stats: AttemptStats = serde_json::from_str(r#"{"correct":2}"#)
            .expect("Failed to parse stats");
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.wrong, 0);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_attempt_stats_error_rate() {
        let stats = AttemptStats { correct: 1, wrong: 3 };
        assert!((stats.error_rate() - 0.75).abs() < 1e-9);
        assert_eq!(AttemptStats::default().error_rate(), 0.0);
    }

    #[test]
    fn test_filter_criteria_is_empty() {
        assert!(FilterCriteria::default().is_empty());

        let mut criteria = FilterCriteria::default();
        criteria.review_only = true;
        assert!(!criteria.is_empty());
    }
}
