// ==========================================
// 货运撮合系统 - JSON 导入
// ==========================================
// 支持: 单条货运需求 (.json) / 回程公告池 (.json 数组 或 .csv)
// ==========================================

use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::FreightRequest;
use crate::importer::announcement_csv::AnnouncementCsvLoader;
use crate::importer::error::{ImportError, ImportResult};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> ImportResult<T> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// 加载单条货运需求
pub fn load_freight_json(path: &Path) -> ImportResult<FreightRequest> {
    read_json(path)
}

/// 加载回程公告数组
pub fn load_announcements_json(path: &Path) -> ImportResult<Vec<ReturnAnnouncement>> {
    read_json(path)
}

/// 按扩展名加载公告池 (.csv / .json)
pub fn load_announcement_pool(path: &Path) -> ImportResult<Vec<ReturnAnnouncement>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => AnnouncementCsvLoader.load_from_path(path),
        "json" => load_announcements_json(path),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}
