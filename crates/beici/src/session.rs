//! 学习会话控制
//!
//! [`Session`] 持有词库、进度仓储和全部会话状态（当前用户、当前词条、
//! 学习模式、筛选条件），对外提供离散的操作方法，由任意前端驱动。
//! 没有进程级单例：会话对象由调用方创建并持有，所有操作都在
//! 显式的 `&mut Session` 上进行。
//!
//! 进度变更（答题、标记掌握）写穿到磁盘：每次变更后立即全量写回
//! 当前用户的进度文件。

use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use beici_algo::{filter, quiz, select, AttemptStats, FilterCriteria, KnownWords, WordRecord};

use crate::audio::AudioCache;
use crate::platform::tts::{SpeechEngine, VoiceSettings};
use crate::storage::{StorageError, StorageResult, UserProgress, UserProgressStore, WordBank};

// ============================================================
// 类型定义
// ============================================================

/// 学习模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// 单词卡片
    #[default]
    Flashcard,
    /// 选择题
    Quiz,
    /// 拼写测试
    Spelling,
}

/// 会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("当前没有选择用户")]
    NoActiveUser,

    #[error("没有符合条件的单词，请调整筛选条件")]
    NoCandidates,

    #[error("当前没有正在学习的单词")]
    NoCurrentWord,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// 一道选择题：乱序后的选项与正确答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRound {
    pub options: Vec<String>,
    pub answer: String,
}

/// 一次作答的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// 是否答对
    pub correct: bool,
    /// 正确答案
    pub expected: String,
}

/// 带统计的难词条目
#[derive(Debug, Clone)]
pub struct HardWord {
    pub word: WordRecord,
    pub stats: AttemptStats,
    pub error_rate: f64,
}

/// 学习进度概览
#[derive(Debug, Clone)]
pub struct ProgressOverview {
    /// 词库总词数
    pub total_words: usize,
    /// 已掌握词数
    pub known_words: usize,
    /// 按错误率降序的难词
    pub hardest: Vec<HardWord>,
}

/// 当前登录的用户及其在内存中的进度副本
struct ActiveUser {
    name: String,
    progress: UserProgress,
}

// ============================================================
// Session - 会话控制器
// ============================================================

pub struct Session {
    bank: WordBank,
    store: UserProgressStore,
    active: Option<ActiveUser>,
    mode: StudyMode,
    criteria: FilterCriteria,
    filtered: Vec<WordRecord>,
    current: Option<WordRecord>,
    answer_revealed: bool,
    quiz_round: Option<QuizRound>,
    last_feedback: Option<bool>,
    voice: VoiceSettings,
    /// 上次成功合成发音时的语音设置，变化时强制重新合成
    last_voice: Option<VoiceSettings>,
    rng: ChaCha8Rng,
}

impl Session {
    /// 创建会话
    pub fn new(bank: WordBank, store: UserProgressStore) -> Self {
        Self::with_rng(bank, store, ChaCha8Rng::from_entropy())
    }

    /// 指定随机种子创建会话（用于测试）
    pub fn with_seed(bank: WordBank, store: UserProgressStore, seed: u64) -> Self {
        Self::with_rng(bank, store, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(bank: WordBank, store: UserProgressStore, rng: ChaCha8Rng) -> Self {
        let mut session = Self {
            bank,
            store,
            active: None,
            mode: StudyMode::default(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            current: None,
            answer_revealed: false,
            quiz_round: None,
            last_feedback: None,
            voice: VoiceSettings::default(),
            last_voice: None,
            rng,
        };
        session.refilter();
        session
    }

    // ========== 用户管理 ==========

    /// 列出所有用户
    pub fn list_users(&self) -> StorageResult<Vec<String>> {
        self.store.list()
    }

    /// 创建新用户并切换为当前用户
    ///
    /// 用户名重复时返回错误，会话状态不变。
    pub fn create_user(&mut self, name: &str) -> SessionResult<()> {
        let progress = self.store.create(name)?;
        self.activate(name.to_string(), progress);
        Ok(())
    }

    /// 切换当前用户
    ///
    /// 进度文件缺失或损坏时按空进度开始。
    pub fn select_user(&mut self, name: &str) -> SessionResult<()> {
        let progress = self.store.load(name)?;
        self.activate(name.to_string(), progress);
        Ok(())
    }

    fn activate(&mut self, name: String, progress: UserProgress) {
        self.active = Some(ActiveUser { name, progress });
        self.current = None;
        self.clear_card();
        self.refilter();
    }

    /// 删除当前用户及其进度文件，返回被删除的用户名
    pub fn delete_current_user(&mut self) -> SessionResult<String> {
        let name = self
            .active
            .as_ref()
            .ok_or(SessionError::NoActiveUser)?
            .name
            .clone();

        self.store.delete(&name)?;
        self.active = None;
        self.current = None;
        self.clear_card();
        self.refilter();
        Ok(name)
    }

    /// 清空当前用户的学习进度
    pub fn reset_progress(&mut self) -> SessionResult<()> {
        let name = self
            .active
            .as_ref()
            .ok_or(SessionError::NoActiveUser)?
            .name
            .clone();

        let progress = self.store.reset(&name)?;
        self.active = Some(ActiveUser { name, progress });
        self.refilter();
        Ok(())
    }

    /// 当前用户名
    pub fn current_user(&self) -> Option<&str> {
        self.active.as_ref().map(|u| u.name.as_str())
    }

    /// 当前用户的进度
    pub fn progress(&self) -> Option<&UserProgress> {
        self.active.as_ref().map(|u| &u.progress)
    }

    // ========== 词库与筛选 ==========

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// 更新筛选条件并重新计算学习子集
    ///
    /// 当前词条不再满足条件时被丢弃。
    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// 当前筛选出的学习子集，保持词库顺序
    pub fn filtered_words(&self) -> &[WordRecord] {
        &self.filtered
    }

    fn refilter(&mut self) {
        let empty = KnownWords::new();
        let known = self
            .active
            .as_ref()
            .map(|u| &u.progress.known_words)
            .unwrap_or(&empty);

        self.filtered = filter::apply(self.bank.words(), &self.criteria, known);

        let keep_current = match &self.current {
            Some(current) => self.filtered.iter().any(|w| w.id == current.id),
            None => true,
        };
        if !keep_current {
            self.current = None;
            self.clear_card();
        }
    }

    // ========== 学习模式与当前词条 ==========

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    /// 切换学习模式，清掉上一张卡片的临时状态
    pub fn set_mode(&mut self, mode: StudyMode) {
        self.mode = mode;
        self.clear_card();
    }

    pub fn current_word(&self) -> Option<&WordRecord> {
        self.current.as_ref()
    }

    /// 加权抽取下一个词条
    ///
    /// 需要已选择用户且筛选子集非空；成功后重置所有单卡临时状态。
    pub fn advance(&mut self) -> SessionResult<WordRecord> {
        let user = self.active.as_ref().ok_or(SessionError::NoActiveUser)?;
        if self.filtered.is_empty() {
            return Err(SessionError::NoCandidates);
        }

        let picked = select::pick_weighted(&mut self.rng, &self.filtered, &user.progress.word_stats)
            .ok_or(SessionError::NoCandidates)?
            .clone();

        self.current = Some(picked.clone());
        self.clear_card();
        Ok(picked)
    }

    /// 清掉答案显示、选择题选项、上次反馈
    fn clear_card(&mut self) {
        self.answer_revealed = false;
        self.quiz_round = None;
        self.last_feedback = None;
    }

    pub fn reveal_answer(&mut self) {
        self.answer_revealed = true;
    }

    pub fn is_answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    /// 上一次作答或标记的结果
    pub fn last_feedback(&self) -> Option<bool> {
        self.last_feedback
    }

    // ========== 进度更新 ==========

    /// 记录一次答题并写回进度文件
    ///
    /// 不保证幂等：每次调用就是一次答题事件。
    pub fn record_attempt(&mut self, word_key: &str, correct: bool) -> SessionResult<AttemptStats> {
        let user = self.active.as_mut().ok_or(SessionError::NoActiveUser)?;
        let stats = user.progress.record_attempt(word_key, correct);
        self.store.save(&user.name, &user.progress)?;
        Ok(stats)
    }

    /// 标记 / 取消掌握并写回进度文件
    ///
    /// 重复标记与取消未标记的词条都是无操作。
    pub fn set_known(&mut self, word_key: &str, known: bool) -> SessionResult<()> {
        let user = self.active.as_mut().ok_or(SessionError::NoActiveUser)?;
        user.progress.set_known(word_key, known);
        self.store.save(&user.name, &user.progress)?;

        // 掌握集合变化会影响复习模式的筛选结果
        if self.criteria.review_only {
            self.refilter();
        }
        Ok(())
    }

    /// 对当前词条执行 认识 / 不认识 标记
    ///
    /// 同时显示答案并记录反馈；卡片标记不影响答题统计。
    pub fn mark_current(&mut self, known: bool) -> SessionResult<()> {
        let word_key = self
            .current
            .as_ref()
            .ok_or(SessionError::NoCurrentWord)?
            .key();

        self.answer_revealed = true;
        self.last_feedback = Some(known);
        self.set_known(&word_key, known)
    }

    // ========== 选择题 ==========

    /// 当前词条的选择题，首次调用时生成并缓存
    pub fn quiz_round(&mut self) -> SessionResult<&QuizRound> {
        let current = self.current.clone().ok_or(SessionError::NoCurrentWord)?;

        let rng = &mut self.rng;
        let filtered = &self.filtered;
        let round = self.quiz_round.get_or_insert_with(|| QuizRound {
            options: quiz::build_options(rng, &current, filtered),
            answer: current.zh.clone(),
        });

        Ok(round)
    }

    /// 提交选择题答案，更新统计并返回判定结果
    pub fn submit_quiz(&mut self, selected: &str) -> SessionResult<AnswerOutcome> {
        let word_key = self
            .current
            .as_ref()
            .ok_or(SessionError::NoCurrentWord)?
            .key();
        let answer = self.quiz_round()?.answer.clone();

        let correct = selected == answer;
        self.record_attempt(&word_key, correct)?;
        self.answer_revealed = true;
        self.last_feedback = Some(correct);

        Ok(AnswerOutcome {
            correct,
            expected: answer,
        })
    }

    // ========== 拼写测试 ==========

    /// 提交拼写答案（忽略首尾空白与大小写），更新统计并返回判定结果
    pub fn submit_spelling(&mut self, input: &str) -> SessionResult<AnswerOutcome> {
        let word = self.current.clone().ok_or(SessionError::NoCurrentWord)?;

        let correct = input.trim().to_lowercase() == word.en.to_lowercase();
        self.record_attempt(&word.key(), correct)?;
        self.answer_revealed = true;
        self.last_feedback = Some(correct);

        Ok(AnswerOutcome {
            correct,
            expected: word.en,
        })
    }

    // ========== 统计 ==========

    /// 学习进度概览：总词数、已掌握数、错误率最高的前 `top` 个词
    ///
    /// 指向已不在词库中的统计条目（孤儿）被静默跳过。
    pub fn overview(&self, top: usize) -> SessionResult<ProgressOverview> {
        let user = self.active.as_ref().ok_or(SessionError::NoActiveUser)?;

        let mut hardest: Vec<HardWord> = user
            .progress
            .word_stats
            .iter()
            .filter_map(|(key, stats)| {
                if stats.total() == 0 {
                    return None;
                }
                let id = key.parse::<u32>().ok()?;
                let word = self.bank.get(id)?;
                Some(HardWord {
                    word: word.clone(),
                    stats: *stats,
                    error_rate: stats.error_rate(),
                })
            })
            .collect();

        hardest.sort_by(|a, b| {
            b.error_rate
                .partial_cmp(&a.error_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hardest.truncate(top);

        Ok(ProgressOverview {
            total_words: self.bank.len(),
            known_words: user.progress.known_count(),
            hardest,
        })
    }

    // ========== 发音 ==========

    pub fn voice_settings(&self) -> &VoiceSettings {
        &self.voice
    }

    pub fn set_voice_settings(&mut self, settings: VoiceSettings) {
        self.voice = settings;
    }

    /// 取得当前词条的发音文件
    ///
    /// 语音设置自上次合成后发生变化、或调用方要求刷新时强制重新合成。
    /// 合成失败记一条警告并返回 `None`，学习流程不受影响。
    pub fn audio_for_current(
        &mut self,
        engine: &dyn SpeechEngine,
        cache: &AudioCache,
        force_refresh: bool,
    ) -> SessionResult<Option<PathBuf>> {
        let word = self.current.clone().ok_or(SessionError::NoCurrentWord)?;

        let settings_changed = self
            .last_voice
            .as_ref()
            .map_or(false, |last| last != &self.voice);

        match cache.ensure_clip(engine, &word, &self.voice, force_refresh || settings_changed) {
            Ok(path) => {
                self.last_voice = Some(self.voice.clone());
                Ok(Some(path))
            }
            Err(e) => {
                log::warn!("发音生成失败 ({}): {e}", word.en);
                Ok(None)
            }
        }
    }
}

// ============================================================
// 单元测试
// ============================================================
