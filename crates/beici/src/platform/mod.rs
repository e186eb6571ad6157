//! 平台相关模块
//!
//! 目前只有文本转语音的引擎封装。

pub mod tts;
