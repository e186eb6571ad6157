//! # beici-algo - 背词核心算法库
//!
//! 本 crate 提供纯 Rust 实现的选词算法:
//!
//! - **Filter Engine** - 按单元/词性/复习模式筛选词库
//! - **Weighted Selector** - 按历史错误率加权的随机选词
//! - **Quiz Options** - 选择题干扰项生成
//!
//! ## 设计理念
//!
//! - **纯函数** - 不做 I/O，随机数生成器由调用方注入
//! - **可复用** - 核心算法与存储、界面代码分离
//! - **充分测试** - 所有算法都有完整的单元测试
//!
//! ## 模块结构
//!
//! - [`filter`] - 筛选引擎 (单元/词性/复习模式的合取筛选)
//! - [`select`] - 加权选词 (错误越多权重越高，下限为 1)
//! - [`quiz`] - 选择题选项生成 (去重 + 乱序)
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use beici_algo::{filter, select, FilterCriteria, KnownWords, WordRecord, WordStatsMap};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let bank = vec![WordRecord {
//!     id: 1,
//!     en: "cat".into(),
//!     zh: "猫".into(),
//!     unit: "1".into(),
//!     part_of_speech: "n.".into(),
//! }];
//!
//! let candidates = filter::apply(&bank, &FilterCriteria::default(), &KnownWords::new());
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let next = select::pick_weighted(&mut rng, &candidates, &WordStatsMap::new());
//! assert_eq!(next.map(|w| w.id), Some(1));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod filter;
pub mod quiz;
pub mod select;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出筛选引擎
pub use filter::apply as apply_filter;

/// 重新导出加权选词
pub use select::{pick_weighted, weight_of};

/// 重新导出选择题选项生成
pub use quiz::build_options;
