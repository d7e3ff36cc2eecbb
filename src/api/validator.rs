// ==========================================
// 货运撮合系统 - 输入校验器
// ==========================================
// 职责: 引擎只接受已校验输入, 校验在调用方完成
// 规则: 收集全部违规项后一次性返回, 不在首个违规处中断
// ==========================================

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::announcement::ReturnAnnouncement;
use crate::domain::freight::{FreightRequest, Location};

/// 校验货运需求
pub fn validate_freight(freight: &FreightRequest) -> ApiResult<()> {
    let mut violations = Vec::new();
    let id = freight.id.as_str();

    if id.trim().is_empty() {
        violations.push(ValidationViolation::new(id, "id", "货运需求ID不能为空"));
    }
    check_location(id, "origin", &freight.origin, &mut violations);
    check_location(id, "destination", &freight.destination, &mut violations);

    if !(freight.weight_kg.is_finite() && freight.weight_kg > 0.0) {
        violations.push(ValidationViolation::new(
            id,
            "weightKg",
            format!("重量必须为正数, 实际 {}", freight.weight_kg),
        ));
    }
    if let Some(volume) = freight.volume_m3 {
        if !(volume.is_finite() && volume > 0.0) {
            violations.push(ValidationViolation::new(
                id,
                "volumeM3",
                format!("体积必须为正数, 实际 {}", volume),
            ));
        }
    }
    if freight.cargo_type.trim().is_empty() {
        violations.push(ValidationViolation::new(id, "cargoType", "货物类型不能为空"));
    }
    if freight.delivery_deadline < freight.pickup_deadline {
        violations.push(ValidationViolation::new(
            id,
            "deliveryDeadline",
            format!(
                "送达日期 {} 早于提货日期 {}",
                freight.delivery_deadline, freight.pickup_deadline
            ),
        ));
    }

    into_result("货运需求", violations)
}

/// 校验回程公告
pub fn validate_announcement(announcement: &ReturnAnnouncement) -> ApiResult<()> {
    let mut violations = Vec::new();
    let id = announcement.id.as_str();

    if id.trim().is_empty() {
        violations.push(ValidationViolation::new(id, "id", "公告ID不能为空"));
    }
    check_location(id, "origin", &announcement.origin, &mut violations);
    check_location(id, "destination", &announcement.destination, &mut violations);

    let radius = announcement.operating_radius_km;
    if !(radius.is_finite() && radius >= 0.0) {
        violations.push(ValidationViolation::new(
            id,
            "operatingRadiusKm",
            format!("作业半径不能为负, 实际 {}", radius),
        ));
    }

    for (idx, implement) in announcement.implements.iter().enumerate() {
        let weight = implement.weight_capacity_kg;
        if !(weight.is_finite() && weight > 0.0) {
            violations.push(ValidationViolation::new(
                id,
                format!("implements[{}].weightCapacityKg", idx),
                format!("载重必须为正数, 实际 {}", weight),
            ));
        }
        if let Some(volume) = implement.volume_capacity_m3 {
            if !(volume.is_finite() && volume > 0.0) {
                violations.push(ValidationViolation::new(
                    id,
                    format!("implements[{}].volumeCapacityM3", idx),
                    format!("容积必须为正数, 实际 {}", volume),
                ));
            }
        }
    }

    into_result("回程公告", violations)
}

fn check_location(
    id: &str,
    field: &str,
    location: &Location,
    violations: &mut Vec<ValidationViolation>,
) {
    if location.city.trim().is_empty() {
        violations.push(ValidationViolation::new(
            id,
            format!("{}.city", field),
            "城市不能为空",
        ));
    }
    if location.region.trim().is_empty() {
        violations.push(ValidationViolation::new(
            id,
            format!("{}.region", field),
            "州/地区不能为空",
        ));
    }
}

fn into_result(entity: &str, violations: Vec<ValidationViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(ApiError::ValidationFailed {
        reason: format!("{}存在{}个违规项", entity, violations.len()),
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::announcement::Implement;
    use crate::domain::types::ImplementApplicationType;
    use chrono::NaiveDate;

    fn freight() -> FreightRequest {
        FreightRequest {
            id: "F001".to_string(),
            origin: Location::new("São Paulo", "SP"),
            destination: Location::new("Rio de Janeiro", "RJ"),
            weight_kg: 15000.0,
            volume_m3: None,
            cargo_type: "Grains".to_string(),
            pickup_deadline: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            delivery_deadline: NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
        }
    }

    fn announcement() -> ReturnAnnouncement {
        ReturnAnnouncement {
            id: "A001".to_string(),
            origin: Location::new("Rio de Janeiro", "RJ"),
            destination: Location::new("São Paulo", "SP"),
            available_date: NaiveDate::from_ymd_opt(2025, 3, 18).unwrap(),
            operating_radius_km: 100.0,
            implements: vec![Implement {
                application_type: ImplementApplicationType::BulkTanker,
                weight_capacity_kg: 20000.0,
                volume_capacity_m3: None,
            }],
        }
    }

    fn violation_fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::ValidationFailed { violations, .. } => {
                violations.into_iter().map(|v| v.field).collect()
            }
            other => panic!("Expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_inputs_pass() {
        assert!(validate_freight(&freight()).is_ok());
        assert!(validate_announcement(&announcement()).is_ok());
    }

    #[test]
    fn test_freight_collects_all_violations() {
        let mut f = freight();
        f.weight_kg = 0.0;
        f.cargo_type = "  ".to_string();
        f.origin.city = String::new();
        f.delivery_deadline = NaiveDate::from_ymd_opt(2025, 3, 19).unwrap();

        let fields = violation_fields(validate_freight(&f).unwrap_err());
        assert_eq!(
            fields,
            vec!["origin.city", "weightKg", "cargoType", "deliveryDeadline"]
        );
    }

    #[test]
    fn test_freight_rejects_nan_weight_and_zero_volume() {
        let mut f = freight();
        f.weight_kg = f64::NAN;
        f.volume_m3 = Some(0.0);

        let fields = violation_fields(validate_freight(&f).unwrap_err());
        assert_eq!(fields, vec!["weightKg", "volumeM3"]);
    }

    #[test]
    fn test_same_day_delivery_is_valid() {
        let mut f = freight();
        f.delivery_deadline = f.pickup_deadline;
        assert!(validate_freight(&f).is_ok());
    }

    #[test]
    fn test_announcement_violations() {
        let mut a = announcement();
        a.operating_radius_km = -1.0;
        a.implements[0].weight_capacity_kg = -5.0;
        a.implements[0].volume_capacity_m3 = Some(0.0);

        let fields = violation_fields(validate_announcement(&a).unwrap_err());
        assert_eq!(
            fields,
            vec![
                "operatingRadiusKm",
                "implements[0].weightCapacityKg",
                "implements[0].volumeCapacityM3"
            ]
        );
    }

    #[test]
    fn test_announcement_without_implements_is_valid() {
        let mut a = announcement();
        a.implements.clear();
        assert!(validate_announcement(&a).is_ok());
    }
}
