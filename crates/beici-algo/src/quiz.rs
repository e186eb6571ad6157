//! 选择题选项生成
//!
//! 以当前词条的正确释义为基础，从候选集中抽取互不重复的干扰释义，
//! 凑满 4 个选项（候选不足时有多少用多少），最后整体乱序。

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{WordRecord, QUIZ_OPTION_COUNT};

/// 为当前词条生成选择题选项
///
/// 干扰项与正确答案按 id 和释义文本双重去重，避免出现两个一样的选项。
/// 先收集去重后的候选释义再无放回抽样，候选再多重复也必然终止。
/// 返回的选项已乱序，正确答案位置不固定。
pub fn build_options<R: Rng + ?Sized>(
    rng: &mut R,
    current: &WordRecord,
    pool: &[WordRecord],
) -> Vec<String> {
    let mut seen: Vec<&str> = vec![current.zh.as_str()];
    let mut distractors: Vec<&str> = Vec::new();

    for word in pool {
        if word.id == current.id {
            continue;
        }
        if seen.contains(&word.zh.as_str()) {
            continue;
        }
        seen.push(word.zh.as_str());
        distractors.push(word.zh.as_str());
    }

    let mut options: Vec<String> = distractors
        .choose_multiple(rng, QUIZ_OPTION_COUNT - 1)
        .map(|s| s.to_string())
        .collect();
    options.push(current.zh.clone());
    options.shuffle(rng);

    options
}

// ==================== 单元测试 ====================
