//! 用户进度仓储
//!
//! 每个用户一个 `<用户名>.json` 文件，用户名即文件名主干。
//! 读取时文件缺失或损坏一律退化为空进度（宁可丢数据也不阻塞学习），
//! 写入时先写临时文件再原子改名，避免写一半的进度文件。
//!
//! 已知限制：同一用户被多个进程并发写入时为 last write wins，
//! 不加锁也不做版本检查。

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::storage::{StorageError, StorageResult, UserProgress};

/// 进度文件扩展名
const PROGRESS_EXT: &str = "json";

/// 用户进度仓储
pub struct UserProgressStore {
    dir: PathBuf,
}

impl UserProgressStore {
    /// 打开（必要时创建）进度目录
    pub fn new<P: Into<PathBuf>>(dir: P) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// 进度目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 读取用户进度
    ///
    /// 文件缺失或解析失败都返回空进度并记一条警告，不报错。
    pub fn load(&self, name: &str) -> StorageResult<UserProgress> {
        let path = self.file_path(name)?;

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UserProgress::default());
            }
            Err(e) => {
                log::warn!("读取进度文件失败 {}: {e}", path.display());
                return Ok(UserProgress::default());
            }
        };

        match serde_json::from_str(&text) {
            Ok(progress) => Ok(progress),
            Err(e) => {
                log::warn!("进度文件损坏，按空进度处理 {}: {e}", path.display());
                Ok(UserProgress::default())
            }
        }
    }

    /// 全量写回用户进度
    ///
    /// 先写入同目录下的临时文件，再原子改名覆盖目标文件。
    pub fn save(&self, name: &str, progress: &UserProgress) -> StorageResult<()> {
        let path = self.file_path(name)?;
        std::fs::create_dir_all(&self.dir)?;

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        let json = serde_json::to_string_pretty(progress)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&path).map_err(|e| StorageError::Io(e.error))?;

        Ok(())
    }

    /// 列出所有用户，按名字排序
    pub fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PROGRESS_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// 用户是否存在
    pub fn exists(&self, name: &str) -> bool {
        self.file_path(name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// 创建新用户（空进度）
    ///
    /// 用户名已被占用时拒绝，不改动任何状态。
    pub fn create(&self, name: &str) -> StorageResult<UserProgress> {
        if self.exists(name) {
            return Err(StorageError::UserExists(name.to_string()));
        }

        let progress = UserProgress::default();
        self.save(name, &progress)?;
        Ok(progress)
    }

    /// 删除用户的进度文件
    ///
    /// 文件本就不存在时是无操作。
    pub fn delete(&self, name: &str) -> StorageResult<()> {
        let path = self.file_path(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// 清空用户进度并写回
    pub fn reset(&self, name: &str) -> StorageResult<UserProgress> {
        let progress = UserProgress::default();
        self.save(name, &progress)?;
        Ok(progress)
    }

    /// 用户名对应的进度文件路径
    ///
    /// 用户名同时是文件名主干，必须是合法的单段文件名。
    fn file_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidUserName(name.to_string()));
        }

        Ok(self.dir.join(format!("{name}.{PROGRESS_EXT}")))
    }
}

// ============================================================
// 单元测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use beici_algo::AttemptStats;

    fn store() -> (tempfile::TempDir, UserProgressStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = UserProgressStore::new(dir.path().join("users")).expect("Failed to open store");
        (dir, store)
    }

    #[test]
    fn test_load_missing_user_yields_default() {
        let (_dir, store) = store();
        let progress = store.load("nobody").expect("Failed to load");
        assert_eq!(progress, UserProgress::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, store) = store();

        let mut progress = UserProgress::default();
        progress.set_known("1", true);
        progress.record_attempt("2", false);
        store.save("alice", &progress).expect("Failed to save");

        let loaded = store.load("alice").expect("Failed to load");
        assert_eq!(loaded, progress);
        assert_eq!(
            loaded.stats_of("2"),
            Some(&AttemptStats { correct: 0, wrong: 1 })
        );
    }

    #[test]
    fn test_corrupt_file_yields_default() {
        let (_dir, store) = store();

        std::fs::write(store.dir().join("bob.json"), "{{{ not json")
            .expect("Failed to write corrupt file");

        let progress = store.load("bob").expect("Failed to load");
        assert_eq!(progress, UserProgress::default());
    }

    #[test]
    fn test_list_is_sorted() {
        let (_dir, store) = store();
        store.create("bob").expect("Failed to create bob");
        store.create("alice").expect("Failed to create alice");

        // 非进度文件不计入
        std::fs::write(store.dir().join("notes.txt"), "x").expect("Failed to write file");

        let users = store.list().expect("Failed to list");
        assert_eq!(users, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_create_duplicate_is_rejected() {
        let (_dir, store) = store();

        store.create("alice").expect("Failed to create alice");
        let mut progress = store.load("alice").expect("Failed to load");
        progress.set_known("1", true);
        store.save("alice", &progress).expect("Failed to save");

        let result = store.create("alice");
        assert!(matches!(result, Err(StorageError::UserExists(_))));

        // 原有进度未被覆盖
        let loaded = store.load("alice").expect("Failed to load");
        assert!(loaded.is_known("1"));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (_dir, store) = store();
        store.delete("ghost").expect("Delete of absent user failed");
    }

    #[test]
    fn test_delete_removes_user() {
        let (_dir, store) = store();
        store.create("alice").expect("Failed to create alice");
        store.delete("alice").expect("Failed to delete alice");
        assert!(!store.exists("alice"));
    }

    #[test]
    fn test_reset_clears_progress() {
        let (_dir, store) = store();
        let mut progress = store.create("alice").expect("Failed to create alice");
        progress.record_attempt("1", true);
        store.save("alice", &progress).expect("Failed to save");

        store.reset("alice").expect("Failed to reset");
        let loaded = store.load("alice").expect("Failed to load");
        assert_eq!(loaded, UserProgress::default());
    }

    #[test]
    fn test_invalid_user_names_are_rejected() {
        let (_dir, store) = store();

        for name in ["", ".", "..", "a/b", "a\\b"] {
            let result = store.save(name, &UserProgress::default());
            assert!(
                matches!(result, Err(StorageError::InvalidUserName(_))),
                "name {name:?} was not rejected"
            );
        }
    }
}
