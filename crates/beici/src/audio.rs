//! 发音缓存
//!
//! 每个 `(词条 id, 音色, 语速)` 组合对应缓存目录里的一个 wav 文件，
//! 文件名由这三个值确定。缓存是纯粹的派生数据，随时可以整体清空，
//! 不承载任何权威状态。
//!
//! 删除 wav 文件可能因为播放器还握着句柄而暂时失败，
//! 这里用有限次数的退避重试兜住；重试耗尽只记警告，不影响会话。

use std::path::{Path, PathBuf};
use std::time::Duration;

use beici_algo::WordRecord;

use crate::platform::tts::{SpeechEngine, TtsError, VoiceSettings};

/// 删除重试次数
const DELETE_RETRY_ATTEMPTS: u32 = 3;

/// 两次重试之间的等待
const DELETE_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// 清理缓存的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    /// 成功删除的文件数
    pub deleted: usize,
    /// 重试后仍删不掉而跳过的文件数
    pub skipped: usize,
}

/// 发音缓存目录
pub struct AudioCache {
    dir: PathBuf,
}

impl AudioCache {
    /// 打开（必要时创建）缓存目录
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, TtsError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| TtsError::Io(e.to_string()))?;
        Ok(Self { dir })
    }

    /// 缓存目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 某词条在给定语音设置下的缓存文件路径
    pub fn clip_path(&self, word_id: u32, settings: &VoiceSettings) -> PathBuf {
        self.dir.join(format!(
            "{}_{}_{}.wav",
            word_id,
            settings.gender.as_str(),
            settings.speed
        ))
    }

    /// 取得词条的发音文件，必要时调用引擎生成
    ///
    /// 文件已存在且未要求强制刷新时直接返回缓存路径。
    /// 强制刷新时先尽力删掉旧文件再重新合成；旧文件删不掉也继续，
    /// 由引擎覆盖写入。
    pub fn ensure_clip(
        &self,
        engine: &dyn SpeechEngine,
        word: &WordRecord,
        settings: &VoiceSettings,
        force_refresh: bool,
    ) -> Result<PathBuf, TtsError> {
        let path = self.clip_path(word.id, settings);

        if path.exists() {
            if !force_refresh {
                return Ok(path);
            }
            if let Err(e) = remove_with_retry(&path) {
                log::warn!("无法删除旧音频文件 {}: {e}", path.display());
            }
        }

        engine.synthesize(&word.en, settings, &path)?;
        log::debug!("已生成发音: {}", path.display());
        Ok(path)
    }

    /// 清空整个缓存目录里的 wav 文件
    ///
    /// 删不掉的文件跳过并计数，永远不报错。
    pub fn clear(&self) -> ClearOutcome {
        let mut outcome = ClearOutcome::default();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("读取音频缓存目录失败 {}: {e}", self.dir.display());
                return outcome;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("wav") {
                continue;
            }
            match remove_with_retry(&path) {
                Ok(()) => outcome.deleted += 1,
                Err(e) => {
                    log::warn!("无法删除音频文件 {}: {e}", path.display());
                    outcome.skipped += 1;
                }
            }
        }

        outcome
    }
}

/// 有限次数退避重试的文件删除
///
/// 文件不存在视为成功。这是整个系统里唯一会睡眠的路径，
/// 最坏情况 `(次数-1) * 退避` 后返回错误。
fn remove_with_retry(path: &Path) -> std::io::Result<()> {
    let mut attempt = 0;
    loop {
        match std::fs::remove_file(path) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                attempt += 1;
                if attempt >= DELETE_RETRY_ATTEMPTS {
                    return Err(e);
                }
                std::thread::sleep(DELETE_RETRY_BACKOFF);
            }
        }
    }
}

// ============================================================
// 单元测试
// ============================================================
