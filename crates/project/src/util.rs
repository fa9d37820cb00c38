use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// Serialises `value` as pretty JSON and writes it through a temporary
/// sibling file followed by rename, so readers never see a partial list.
/// 以臨時檔案搭配 rename 寫入 JSON，避免讀到寫到一半的內容。
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_vec_pretty(value).map_err(io::Error::from)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, payload)?;
    fs::rename(&tmp_path, path)
}
