// ==========================================
// 货运撮合系统 - 回程公告 CSV 导入
// ==========================================
// 格式: 每行一台挂车, 按 announcement_id 聚合 (保持首次出现顺序)
// 红线: 同一公告的路线/日期/半径在各行必须一致
// ==========================================

use crate::domain::announcement::{Implement, ReturnAnnouncement};
use crate::domain::freight::Location;
use crate::domain::types::ImplementApplicationType;
use crate::importer::error::{ImportError, ImportResult};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// CSV 列名
pub mod columns {
    pub const ANNOUNCEMENT_ID: &str = "announcement_id";
    pub const ORIGIN_CITY: &str = "origin_city";
    pub const ORIGIN_REGION: &str = "origin_region";
    pub const DESTINATION_CITY: &str = "destination_city";
    pub const DESTINATION_REGION: &str = "destination_region";
    pub const AVAILABLE_DATE: &str = "available_date";
    pub const OPERATING_RADIUS_KM: &str = "operating_radius_km";
    pub const IMPLEMENT_TYPE: &str = "implement_type";
    pub const WEIGHT_CAPACITY_KG: &str = "weight_capacity_kg";
    pub const VOLUME_CAPACITY_M3: &str = "volume_capacity_m3";

    pub const REQUIRED: [&str; 10] = [
        ANNOUNCEMENT_ID,
        ORIGIN_CITY,
        ORIGIN_REGION,
        DESTINATION_CITY,
        DESTINATION_REGION,
        AVAILABLE_DATE,
        OPERATING_RADIUS_KM,
        IMPLEMENT_TYPE,
        WEIGHT_CAPACITY_KG,
        VOLUME_CAPACITY_M3,
    ];
}

// ==========================================
// AnnouncementCsvLoader
// ==========================================
pub struct AnnouncementCsvLoader;

impl AnnouncementCsvLoader {
    /// 从文件加载
    pub fn load_from_path(&self, path: &Path) -> ImportResult<Vec<ReturnAnnouncement>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let announcements = self.load_from_reader(file)?;

        info!(
            path = %path.display(),
            announcements = announcements.len(),
            "回程公告 CSV 导入完成"
        );
        Ok(announcements)
    }

    /// 从任意 Reader 加载
    pub fn load_from_reader<R: Read>(&self, reader: R) -> ImportResult<Vec<ReturnAnnouncement>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        for column in columns::REQUIRED {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }

        let mut announcements: Vec<ReturnAnnouncement> = Vec::new();
        let mut index_by_id: HashMap<String, usize> = HashMap::new();

        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_no = row_idx + 2;

            let mut row_map: HashMap<&str, &str> = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.as_str(), value.trim());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            let row = CsvRow::new(row_no, &row_map);
            let (announcement, implement) = row.to_parts()?;

            match index_by_id.get(&announcement.id) {
                Some(&idx) => {
                    let existing = &mut announcements[idx];
                    if let Some(field) = first_mismatch(existing, &announcement) {
                        return Err(ImportError::InconsistentGroup {
                            row: row_no,
                            announcement_id: announcement.id,
                            field: field.to_string(),
                        });
                    }
                    existing.implements.push(implement);
                }
                None => {
                    index_by_id.insert(announcement.id.clone(), announcements.len());
                    announcements.push(ReturnAnnouncement {
                        implements: vec![implement],
                        ..announcement
                    });
                }
            }
        }

        Ok(announcements)
    }
}

/// 返回第一个不一致的列名
fn first_mismatch(existing: &ReturnAnnouncement, row: &ReturnAnnouncement) -> Option<&'static str> {
    if existing.origin != row.origin {
        Some(columns::ORIGIN_CITY)
    } else if existing.destination != row.destination {
        Some(columns::DESTINATION_CITY)
    } else if existing.available_date != row.available_date {
        Some(columns::AVAILABLE_DATE)
    } else if existing.operating_radius_km != row.operating_radius_km {
        Some(columns::OPERATING_RADIUS_KM)
    } else {
        None
    }
}

// ==========================================
// CsvRow - 单行字段访问
// ==========================================
struct CsvRow<'a> {
    row: usize,
    values: &'a HashMap<&'a str, &'a str>,
}

impl<'a> CsvRow<'a> {
    fn new(row: usize, values: &'a HashMap<&'a str, &'a str>) -> Self {
        Self { row, values }
    }

    fn optional(&self, field: &str) -> Option<&'a str> {
        self.values.get(field).copied().filter(|v| !v.is_empty())
    }

    fn required(&self, field: &str) -> ImportResult<&'a str> {
        self.optional(field).ok_or_else(|| ImportError::FieldMissing {
            row: self.row,
            field: field.to_string(),
        })
    }

    fn number(&self, field: &str, raw: &str) -> ImportResult<f64> {
        raw.parse::<f64>()
            .map_err(|e| ImportError::TypeConversionError {
                row: self.row,
                field: field.to_string(),
                message: format!("{} ({})", raw, e),
            })
    }

    fn required_number(&self, field: &str) -> ImportResult<f64> {
        let raw = self.required(field)?;
        self.number(field, raw)
    }

    fn date(&self, field: &str) -> ImportResult<NaiveDate> {
        let raw = self.required(field)?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ImportError::DateFormatError {
            row: self.row,
            field: field.to_string(),
            value: raw.to_string(),
        })
    }

    /// 拆成 (公告头, 本行挂车); 公告头的 implements 为空
    fn to_parts(&self) -> ImportResult<(ReturnAnnouncement, Implement)> {
        let application_type = {
            let raw = self.required(columns::IMPLEMENT_TYPE)?;
            raw.parse::<ImplementApplicationType>()
                .map_err(|message| ImportError::TypeConversionError {
                    row: self.row,
                    field: columns::IMPLEMENT_TYPE.to_string(),
                    message,
                })?
        };

        let volume_capacity_m3 = match self.optional(columns::VOLUME_CAPACITY_M3) {
            Some(raw) => Some(self.number(columns::VOLUME_CAPACITY_M3, raw)?),
            None => None,
        };

        let implement = Implement {
            application_type,
            weight_capacity_kg: self.required_number(columns::WEIGHT_CAPACITY_KG)?,
            volume_capacity_m3,
        };

        let announcement = ReturnAnnouncement {
            id: self.required(columns::ANNOUNCEMENT_ID)?.to_string(),
            origin: Location::new(
                self.required(columns::ORIGIN_CITY)?,
                self.required(columns::ORIGIN_REGION)?,
            ),
            destination: Location::new(
                self.required(columns::DESTINATION_CITY)?,
                self.required(columns::DESTINATION_REGION)?,
            ),
            available_date: self.date(columns::AVAILABLE_DATE)?,
            operating_radius_km: self.required_number(columns::OPERATING_RADIUS_KM)?,
            implements: Vec::new(),
        };

        Ok((announcement, implement))
    }
}
