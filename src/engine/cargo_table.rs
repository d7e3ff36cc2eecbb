// ==========================================
// 货运撮合系统 - 货物/挂车兼容表
// ==========================================
// 职责: 货物类型 → 可承运的挂车用途类型集合
// 红线: 构造后不可变; 未登记的货物类型返回空集合而非报错
// ==========================================

use crate::domain::types::ImplementApplicationType;
use std::collections::{BTreeSet, HashMap};

use ImplementApplicationType::*;

/// 内置兼容表
const BUILTIN_ROWS: &[(&str, &[ImplementApplicationType])] = &[
    ("Grains", &[BulkTanker, DryVan]),
    ("Liquids", &[Tanker]),
    ("Fuel", &[Tanker]),
    ("Containers", &[ContainerChassis]),
    ("Machinery", &[Flatbed, ExtendableFlatbed]),
    ("General Cargo", &[DryVan, RefrigeratedVan, Flatbed]),
    ("Refrigerated", &[RefrigeratedVan]),
    ("Livestock", &[Livestock]),
    ("Construction Materials", &[Dump, Flatbed]),
    ("Steel Coils", &[CoilCarrier, Flatbed]),
    ("Timber", &[Forestry, Flatbed]),
];

// ==========================================
// CargoCompatibilityTable - 兼容表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoCompatibilityTable {
    rows: HashMap<String, BTreeSet<ImplementApplicationType>>,
}

impl CargoCompatibilityTable {
    /// 从自定义行构造
    pub fn from_rows<I, K, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: IntoIterator<Item = ImplementApplicationType>,
    {
        let rows = rows
            .into_iter()
            .map(|(cargo, types)| (cargo.into(), types.into_iter().collect()))
            .collect();
        Self { rows }
    }

    /// 空表 (所有货物类型均未登记)
    pub fn empty() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }

    /// 查询货物类型对应的挂车集合 (未登记 → 空集合)
    pub fn compatible_types(&self, cargo_type: &str) -> BTreeSet<ImplementApplicationType> {
        self.rows.get(cargo_type).cloned().unwrap_or_default()
    }

    /// 货物类型是否已登记
    pub fn contains(&self, cargo_type: &str) -> bool {
        self.rows.contains_key(cargo_type)
    }

    /// 叠加覆写行, 返回新表
    ///
    /// 同名货物类型整行替换, 新货物类型追加; 原表不变
    pub fn with_overrides(
        &self,
        overrides: &HashMap<String, Vec<ImplementApplicationType>>,
    ) -> Self {
        let mut rows = self.rows.clone();
        for (cargo, types) in overrides {
            rows.insert(cargo.clone(), types.iter().copied().collect());
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for CargoCompatibilityTable {
    fn default() -> Self {
        Self::from_rows(
            BUILTIN_ROWS
                .iter()
                .map(|(cargo, types)| (*cargo, types.iter().copied())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_grains_row() {
        let table = CargoCompatibilityTable::default();
        let types = table.compatible_types("Grains");
        assert!(types.contains(&BulkTanker));
        assert!(types.contains(&DryVan));
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn test_unknown_cargo_is_empty_not_error() {
        let table = CargoCompatibilityTable::default();
        assert!(table.compatible_types("Exotic Machinery Parts").is_empty());
        assert!(!table.contains("Exotic Machinery Parts"));
    }

    #[test]
    fn test_overrides_replace_and_extend_without_mutating_source() {
        let base = CargoCompatibilityTable::default();
        let mut overrides = HashMap::new();
        overrides.insert("Liquids".to_string(), vec![Tanker, BulkTanker]);
        overrides.insert("Glass".to_string(), vec![Flatbed]);

        let merged = base.with_overrides(&overrides);

        assert_eq!(merged.compatible_types("Liquids").len(), 2);
        assert!(merged.contains("Glass"));
        assert_eq!(merged.len(), base.len() + 1);
        // 原表不变
        assert_eq!(base.compatible_types("Liquids").len(), 1);
        assert!(!base.contains("Glass"));
    }
}
