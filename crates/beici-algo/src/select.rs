//! 加权选词
//!
//! 根据历史答题记录给每个候选词条一个权重，按权重成比例地随机抽取下一个词。
//! 答错越多的词出现越频繁；答对较多的词逐渐淡出，但权重有下限，
//! 任何候选词都不会被永久排除。

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{AttemptStats, WordRecord, WordStatsMap, BASE_WEIGHT, MIN_WEIGHT, WRONG_BONUS};

/// 计算单个词条的选取权重
///
/// `weight = max(1, 10 + 3 * wrong - correct)`，没有统计记录按 0/0 计。
/// 运算在有符号整数上进行，大量答对也不会下溢。
pub fn weight_of(stats: Option<&AttemptStats>) -> u64 {
    let (correct, wrong) = stats
        .map(|s| (i64::from(s.correct), i64::from(s.wrong)))
        .unwrap_or((0, 0));

    (BASE_WEIGHT + WRONG_BONUS * wrong - correct).max(MIN_WEIGHT) as u64
}

/// 从候选序列中按权重抽取一个词条
///
/// 对任何非空输入都能返回（单个候选时必中），空序列返回 `None`。
/// 算法：累计权重和为 `T`，在 `[0, T)` 上均匀取实数 `r`，
/// 顺序累加权重，返回累计值首次超过 `r` 的词条。
/// 权重和意外为 0 时退化为均匀抽取。
pub fn pick_weighted<'a, R: Rng + ?Sized>(
    rng: &mut R,
    words: &'a [WordRecord],
    stats: &WordStatsMap,
) -> Option<&'a WordRecord> {
    if words.is_empty() {
        return None;
    }

    let weights: Vec<u64> = words
        .iter()
        .map(|word| weight_of(stats.get(&word.key())))
        .collect();
    let total: u64 = weights.iter().sum();

    if total == 0 {
        return words.choose(rng);
    }

    let draw = rng.gen::<f64>() * total as f64;
    let mut cumulative = 0u64;

    for (word, weight) in words.iter().zip(&weights) {
        cumulative += weight;
        if cumulative as f64 > draw {
            return Some(word);
        }
    }

    // 浮点舍入的兜底
    words.choose(rng)
}

// ==================== 单元测试 ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn word(id: u32, en: &str, zh: &str) -> WordRecord {
        WordRecord {
            id,
            en: en.to_string(),
            zh: zh.to_string(),
            unit: "1".to_string(),
            part_of_speech: "n.".to_string(),
        }
    }

    fn stats(correct: u32, wrong: u32) -> AttemptStats {
        AttemptStats { correct, wrong }
    }

    #[test]
    fn test_weight_without_stats() {
        assert_eq!(weight_of(None), 10);
    }

    #[test]
    fn test_weight_grows_with_wrong_answers() {
        assert_eq!(weight_of(Some(&stats(0, 5))), 25);
    }

    #[test]
    fn test_weight_floor() {
        assert_eq!(weight_of(Some(&stats(20, 0))), 1);
        assert_eq!(weight_of(Some(&stats(1000, 0))), 1);
    }

    #[test]
    fn test_single_candidate_always_selected() {
        let words = vec![word(1, "cat", "猫")];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..50 {
            let picked = pick_weighted(&mut rng, &words, &WordStatsMap::new())
                .expect("Failed to pick from single candidate");
            assert_eq!(picked.id, 1);
        }
    }

    #[test]
    fn test_empty_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(pick_weighted(&mut rng, &[], &WordStatsMap::new()).is_none());
    }

    #[test]
    fn test_selection_returns_member_of_input() {
        let words: Vec<WordRecord> = (1..=20)
            .map(|i| word(i, "w", "词"))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let picked = pick_weighted(&mut rng, &words, &WordStatsMap::new())
                .expect("Failed to pick");
            assert!(words.iter().any(|w| w.id == picked.id));
        }
    }

    #[test]
    fn test_wrong_answers_bias_selection() {
        let words = vec![word(1, "hard", "难"), word(2, "easy", "易")];

        let mut map = WordStatsMap::new();
        // 权重 10 + 3*10 = 40 对 max(1, 10-9) = 1
        map.insert("1".to_string(), stats(0, 10));
        map.insert("2".to_string(), stats(9, 0));

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut hard_hits = 0;
        let draws = 2000;
        for _ in 0..draws {
            let picked = pick_weighted(&mut rng, &words, &map).expect("Failed to pick");
            if picked.id == 1 {
                hard_hits += 1;
            }
        }

        // 期望命中率 40/41 ≈ 97.6%
        assert!(
            hard_hits > draws * 9 / 10,
            "hard word picked only {}/{} times",
            hard_hits,
            draws
        );
    }

    #[test]
    fn test_floored_word_still_reachable() {
        let words = vec![word(1, "a", "甲"), word(2, "b", "乙")];

        let mut map = WordStatsMap::new();
        // 权重 1 对 10，被压到下限的词仍应偶尔出现
        map.insert("1".to_string(), stats(50, 0));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut floored_hits = 0;
        for _ in 0..2000 {
            let picked = pick_weighted(&mut rng, &words, &map).expect("Failed to pick");
            if picked.id == 1 {
                floored_hits += 1;
            }
        }

        assert!(floored_hits > 0, "floored word never selected");
    }
}
