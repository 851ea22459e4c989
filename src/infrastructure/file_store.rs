//! 文件存储 - 每个键对应目录下的一个 `<key>.json` 文件

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use crate::error::StoreError;
use crate::infrastructure::kv_store::KvStore;

/// 文件存储
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// 创建文件存储（目录在首次保存时创建）
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for FileStore {
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source: std::io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        // 先写临时文件再重命名，避免读到写了一半的内容
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await.map_err(io_err)?;
        fs::rename(&tmp, &path).await.map_err(io_err)?;

        debug!("已保存 {} ({} 字节)", path.display(), value.len());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!("已读取 {} ({} 字节)", path.display(), content.len());
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quiz_file_store_{}_{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn missing_key_loads_as_none() {
        let store = FileStore::new(temp_dir("missing"));
        assert!(store.load("nothing_here").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_text() {
        let dir = temp_dir("roundtrip");
        let store = FileStore::new(&dir);
        store.save("quiz_questions", "[1,2,3]").await.unwrap();
        assert_eq!(
            store.load("quiz_questions").await.unwrap().as_deref(),
            Some("[1,2,3]")
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn rejects_keys_that_escape_the_directory() {
        let store = FileStore::new(temp_dir("keys"));
        let err = store.save("../evil", "x").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
