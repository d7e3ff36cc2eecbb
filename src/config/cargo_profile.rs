use crate::domain::types::ImplementApplicationType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 兼容表覆写（持久化对象）
///
/// 存储位置：config_kv（scope_id='global'，key='match/cargo_compatibility'）
///
/// 格式：`{"Grains": ["bulk-tanker", "dry-van"], "Glass": ["flatbed"]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoCompatibilityOverrides {
    pub rows: HashMap<String, Vec<ImplementApplicationType>>,
}

impl CargoCompatibilityOverrides {
    /// 解析 JSON；空白字符串视为空覆写
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    /// 去掉空白货物类型名
    pub fn into_rows(self) -> HashMap<String, Vec<ImplementApplicationType>> {
        self.rows
            .into_iter()
            .map(|(cargo, types)| (cargo.trim().to_string(), types))
            .filter(|(cargo, _)| !cargo.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let parsed = CargoCompatibilityOverrides::parse(
            r#"{"Glass": ["flatbed", "dry-van"], " ": ["tanker"]}"#,
        )
        .unwrap()
        .into_rows();

        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed["Glass"],
            vec![
                ImplementApplicationType::Flatbed,
                ImplementApplicationType::DryVan
            ]
        );
    }

    #[test]
    fn test_parse_blank_is_empty() {
        assert!(CargoCompatibilityOverrides::parse("  ").unwrap().rows.is_empty());
    }

    #[test]
    fn test_parse_unknown_type_is_error() {
        assert!(CargoCompatibilityOverrides::parse(r#"{"Glass": ["hovercraft"]}"#).is_err());
    }
}
