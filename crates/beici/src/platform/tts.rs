// TTS (Text-to-Speech) 平台模块
// 把单词文本交给系统语音引擎，合成为指定路径上的音频文件
//
// 默认实现调用 espeak 命令行；其他引擎实现 SpeechEngine 即可替换。
// 合成失败只产生警告，绝不中断学习流程。

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// 语速范围（每分钟词数），与 espeak 的有效区间一致
pub const MIN_SPEED: u32 = 80;
pub const MAX_SPEED: u32 = 300;

/// 默认语速
pub const DEFAULT_SPEED: u32 = 150;

/// 发音音色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Male,
    #[default]
    Female,
}

impl VoiceGender {
    /// 缓存文件名里使用的形式
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Male => "male",
            VoiceGender::Female => "female",
        }
    }
}

/// 语音设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// 音色
    pub gender: VoiceGender,
    /// 语速（每分钟词数）
    pub speed: u32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            gender: VoiceGender::Female,
            speed: DEFAULT_SPEED,
        }
    }
}

impl VoiceSettings {
    /// 构造并把语速收拢到有效区间
    pub fn new(gender: VoiceGender, speed: u32) -> Self {
        Self {
            gender,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
        }
    }
}

/// TTS 错误类型
#[derive(Debug, Clone)]
pub enum TtsError {
    /// 引擎不可用（未安装或无法启动）
    EngineUnavailable(String),
    /// 合成失败
    SynthesisFailed(String),
    /// 缓存目录或文件操作失败
    Io(String),
}

impl std::fmt::Display for TtsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsError::EngineUnavailable(name) => write!(f, "语音引擎不可用: {}", name),
            TtsError::SynthesisFailed(msg) => write!(f, "语音合成失败: {}", msg),
            TtsError::Io(msg) => write!(f, "音频文件操作失败: {}", msg),
        }
    }
}

impl std::error::Error for TtsError {}

/// 语音合成引擎
///
/// 把 `text` 按 `settings` 合成到 `out_path`；实现方负责自己的失败重试。
pub trait SpeechEngine {
    fn synthesize(
        &self,
        text: &str,
        settings: &VoiceSettings,
        out_path: &Path,
    ) -> Result<(), TtsError>;
}

// ============================================
// espeak 实现
// ============================================

/// espeak 的音色变体
fn espeak_voice(gender: VoiceGender) -> &'static str {
    match gender {
        VoiceGender::Male => "en+m3",
        VoiceGender::Female => "en+f3",
    }
}

/// 调用 espeak 命令行的合成引擎
pub struct EspeakEngine {
    program: String,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self {
            program: "espeak".to_string(),
        }
    }
}

impl EspeakEngine {
    /// 指定可执行文件名（如 "espeak-ng"）
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SpeechEngine for EspeakEngine {
    fn synthesize(
        &self,
        text: &str,
        settings: &VoiceSettings,
        out_path: &Path,
    ) -> Result<(), TtsError> {
        let status = Command::new(&self.program)
            .arg("-v")
            .arg(espeak_voice(settings.gender))
            .arg("-s")
            .arg(settings.speed.to_string())
            .arg("-w")
            .arg(out_path)
            .arg(text)
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TtsError::EngineUnavailable(self.program.clone())
                } else {
                    TtsError::SynthesisFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(TtsError::SynthesisFailed(format!(
                "{} 退出状态 {}",
                self.program, status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = VoiceSettings::default();
        assert_eq!(settings.gender, VoiceGender::Female);
        assert_eq!(settings.speed, DEFAULT_SPEED);
    }

    #[test]
    fn test_speed_is_clamped() {
        assert_eq!(VoiceSettings::new(VoiceGender::Male, 10).speed, MIN_SPEED);
        assert_eq!(VoiceSettings::new(VoiceGender::Male, 999).speed, MAX_SPEED);
        assert_eq!(VoiceSettings::new(VoiceGender::Male, 200).speed, 200);
    }

    #[test]
    fn test_gender_as_str() {
        assert_eq!(VoiceGender::Male.as_str(), "male");
        assert_eq!(VoiceGender::Female.as_str(), "female");
    }

    #[test]
    fn test_tts_error_display() {
        let err = TtsError::EngineUnavailable("espeak".to_string());
        assert!(err.to_string().contains("不可用"));
    }

    #[test]
    fn test_missing_engine_reports_unavailable() {
        let engine = EspeakEngine::new("definitely-not-a-real-binary");
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = engine.synthesize(
            "cat",
            &VoiceSettings::default(),
            &dir.path().join("out.wav"),
        );
        assert!(matches!(result, Err(TtsError::EngineUnavailable(_))));
    }
}
