//! 筛选引擎
//!
//! 按筛选条件把完整词库缩减为当前学习子集。
//! 纯函数：相同输入必得相同输出，且保持词库原有顺序（稳定筛选，不重排）。

use crate::types::{FilterCriteria, KnownWords, WordRecord};

/// 应用筛选条件，返回满足所有生效条件的词条子序列
///
/// 各条件为合取关系：
/// - 单元：`units` 为空则不限，否则词条的单元（字符串形式）须在集合内
/// - 词性：`types` 为空则不限，否则词条的词性须在集合内
/// - 复习模式：开启时只保留已标记为掌握的词条
///
/// 词库为空或没有词条满足条件时返回空序列，由调用方区分
/// "没有符合条件的词" 与 "未启用筛选"。
pub fn apply(bank: &[WordRecord], criteria: &FilterCriteria, known: &KnownWords) -> Vec<WordRecord> {
    bank.iter()
        .filter(|word| matches(word, criteria, known))
        .cloned()
        .collect()
}

/// 单个词条是否满足所有生效条件
fn matches(word: &WordRecord, criteria: &FilterCriteria, known: &KnownWords) -> bool {
    if !criteria.units.is_empty() && !criteria.units.contains(&word.unit) {
        return false;
    }

    if !criteria.types.is_empty() && !criteria.types.contains(&word.part_of_speech) {
        return false;
    }

    if criteria.review_only && !known.contains_key(&word.key()) {
        return false;
    }

    true
}

// ==================== 单元测试 ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn word(id: u32, en: &str, zh: &str, unit: &str, pos: &str) -> WordRecord {
        WordRecord {
            id,
            en: en.to_string(),
            zh: zh.to_string(),
            unit: unit.to_string(),
            part_of_speech: pos.to_string(),
        }
    }

    fn sample_bank() -> Vec<WordRecord> {
        vec![
            word(1, "cat", "猫", "1", "n."),
            word(2, "dog", "狗", "1", "n."),
            word(3, "run", "跑", "2", "v."),
        ]
    }

    fn units(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_whole_bank_in_order() {
        let bank = sample_bank();
        let result = apply(&bank, &FilterCriteria::default(), &KnownWords::new());

        assert_eq!(result, bank);
    }

    #[test]
    fn test_unit_filter() {
        let bank = sample_bank();
        let criteria = FilterCriteria {
            units: units(&["1"]),
            ..Default::default()
        };

        let result = apply(&bank, &criteria, &KnownWords::new());
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|w| w.unit == "1"));

        let criteria = FilterCriteria {
            units: units(&["9"]),
            ..Default::default()
        };
        assert!(apply(&bank, &criteria, &KnownWords::new()).is_empty());
    }

    #[test]
    fn test_type_filter() {
        let bank = sample_bank();
        let criteria = FilterCriteria {
            types: units(&["v."]),
            ..Default::default()
        };

        let result = apply(&bank, &criteria, &KnownWords::new());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 3);
    }

    #[test]
    fn test_conjunction_of_predicates() {
        let bank = sample_bank();
        let criteria = FilterCriteria {
            units: units(&["1"]),
            types: units(&["v."]),
            ..Default::default()
        };

        // 单元 1 里没有动词
        assert!(apply(&bank, &criteria, &KnownWords::new()).is_empty());
    }

    #[test]
    fn test_review_only_keeps_known_words() {
        let bank = sample_bank();
        let mut known = KnownWords::new();
        known.insert("2".to_string(), true);

        let criteria = FilterCriteria {
            review_only: true,
            ..Default::default()
        };

        let result = apply(&bank, &criteria, &known);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);

        // 没有掌握任何词时复习模式得到空集
        assert!(apply(&bank, &criteria, &KnownWords::new()).is_empty());
    }

    #[test]
    fn test_filter_is_pure() {
        let bank = sample_bank();
        let criteria = FilterCriteria {
            units: units(&["1", "2"]),
            ..Default::default()
        };
        let known = KnownWords::new();

        let first = apply(&bank, &criteria, &known);
        let second = apply(&bank, &criteria, &known);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_bank() {
        let result = apply(&[], &FilterCriteria::default(), &KnownWords::new());
        assert!(result.is_empty());
    }
}
