//! Normalization of raw feed records into canonical charging points.
//!
//! The feed has shipped records in more than one shape: field values flip
//! between JSON numbers and numeric strings, and lot counts have appeared
//! both as flat `TotalLots`/`AvailableLots` fields and as nested per-charger
//! `Lots` arrays where a lot's `Status` code `"1"` means available. Every
//! accessor here tolerates both, and a record only survives if its
//! coordinates parse.

use chargemap_core::{classify, ChargingPoint};

/// Fallback display address for records without one.
const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Fallback operator label for records without one.
const UNKNOWN_OPERATOR: &str = "Unknown Operator";

/// Normalizes a raw feed page into an ordered list of valid charging points.
///
/// Records whose latitude or longitude fails to parse are silently dropped —
/// a data-quality filter, not an error. Ids are the raw positional indexes
/// and are **not** renumbered after drops, so re-fetching identical upstream
/// data yields identical ids.
#[must_use]
pub fn normalize_records(records: &[serde_json::Value]) -> Vec<ChargingPoint> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| normalize_record(index, record))
        .collect()
}

/// Normalizes a single record. Returns `None` when coordinates are missing
/// or unparseable.
fn normalize_record(index: usize, record: &serde_json::Value) -> Option<ChargingPoint> {
    let latitude = float_field(record, "Latitude")?;
    let longitude = float_field(record, "Longitude")?;

    let (total_lots, available_lots) = lot_counts(record);

    Some(ChargingPoint {
        id: index,
        serial_number: string_field(record, "SerialNumber"),
        address: string_field(record, "AddressInfo")
            .or_else(|| string_field(record, "Address"))
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        postal_code: string_field(record, "PostalCode").unwrap_or_default(),
        operator: string_field(record, "Operator")
            .unwrap_or_else(|| UNKNOWN_OPERATOR.to_string()),
        charger_type: string_field(record, "Type").unwrap_or_default(),
        latitude,
        longitude,
        total_lots,
        available_lots,
        status: classify(available_lots, total_lots),
        distance_km: None,
    })
}

/// Extracts a display string. JSON numbers are accepted (postal codes have
/// shipped as bare integers); empty and whitespace-only strings count as
/// absent.
fn string_field(record: &serde_json::Value, key: &str) -> Option<String> {
    match record.get(key)? {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extracts a floating-point field from a JSON number or a numeric string.
/// Non-finite values count as unparseable.
fn float_field(record: &serde_json::Value, key: &str) -> Option<f64> {
    let value = record.get(key)?;
    let parsed = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))?;
    parsed.is_finite().then_some(parsed)
}

/// Extracts a non-negative count from a JSON number or a numeric string.
fn count_field(record: &serde_json::Value, key: &str) -> Option<u32> {
    let value = record.get(key)?;
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u32>().ok()))
}

/// Resolves lot counts as `(total, available)`.
///
/// Flat `TotalLots`/`AvailableLots` fields win when either is present;
/// otherwise nested `Chargers[].Lots[]` arrays are flattened, counting a lot
/// as available when its `Status` code is `"1"`. Unusable counts default
/// to 0 — the classifier maps that to `Unknown` rather than failing.
fn lot_counts(record: &serde_json::Value) -> (u32, u32) {
    let flat_total = count_field(record, "TotalLots");
    let flat_available = count_field(record, "AvailableLots");
    if flat_total.is_some() || flat_available.is_some() {
        return (
            flat_total.unwrap_or(0),
            flat_available.unwrap_or(0),
        );
    }

    let Some(chargers) = record.get("Chargers").and_then(serde_json::Value::as_array) else {
        return (0, 0);
    };

    let mut total = 0u32;
    let mut available = 0u32;
    for charger in chargers {
        let Some(lots) = charger.get("Lots").and_then(serde_json::Value::as_array) else {
            continue;
        };
        for lot in lots {
            total = total.saturating_add(1);
            if lot_is_available(lot) {
                available = available.saturating_add(1);
            }
        }
    }
    (total, available)
}

/// A lot's `Status` code `"1"` (string or number) signals an open lot.
fn lot_is_available(lot: &serde_json::Value) -> bool {
    match lot.get("Status") {
        Some(serde_json::Value::String(s)) => s.trim() == "1",
        Some(serde_json::Value::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chargemap_core::Status;
    use serde_json::json;

    use super::*;

    fn valid_record() -> serde_json::Value {
        json!({
            "SerialNumber": "EVC-001",
            "AddressInfo": "1 Marina Boulevard",
            "PostalCode": "018989",
            "Operator": "SP Mobility",
            "Type": "AC Type 2",
            "Latitude": 1.2804,
            "Longitude": 103.8543,
            "TotalLots": 4,
            "AvailableLots": 2
        })
    }

    #[test]
    fn normalizes_a_complete_record() {
        let points = normalize_records(&[valid_record()]);
        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.id, 0);
        assert_eq!(p.address, "1 Marina Boulevard");
        assert_eq!(p.postal_code, "018989");
        assert_eq!(p.operator, "SP Mobility");
        assert_eq!(p.charger_type, "AC Type 2");
        assert_eq!(p.total_lots, 4);
        assert_eq!(p.available_lots, 2);
        assert_eq!(p.status, Status::Partial);
        assert!(p.distance_km.is_none());
    }

    #[test]
    fn accepts_numeric_strings_for_coordinates_and_lots() {
        let record = json!({
            "Latitude": "1.3521",
            "Longitude": "103.8198",
            "TotalLots": "6",
            "AvailableLots": "6"
        });
        let points = normalize_records(&[record]);
        assert_eq!(points.len(), 1);
        assert!((points[0].latitude - 1.3521).abs() < 1e-12);
        assert_eq!(points[0].total_lots, 6);
        assert_eq!(points[0].status, Status::Available);
    }

    #[test]
    fn drops_record_with_non_numeric_latitude() {
        let record = json!({
            "Latitude": "not-a-coordinate",
            "Longitude": 103.8198
        });
        assert!(normalize_records(&[record]).is_empty());
    }

    #[test]
    fn drops_record_with_missing_longitude() {
        let record = json!({ "Latitude": 1.3521 });
        assert!(normalize_records(&[record]).is_empty());
    }

    #[test]
    fn ids_keep_original_positions_across_drops() {
        let invalid = json!({ "Latitude": "x", "Longitude": "y" });
        let points = normalize_records(&[valid_record(), invalid, valid_record()]);
        let ids: Vec<usize> = points.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn two_valid_one_trailing_invalid_yields_first_two_ids() {
        let invalid = json!({ "Longitude": 103.0 });
        let points = normalize_records(&[valid_record(), valid_record(), invalid]);
        let ids: Vec<usize> = points.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn missing_strings_fall_back_to_defaults() {
        let record = json!({ "Latitude": 1.3, "Longitude": 103.8 });
        let points = normalize_records(&[record]);
        let p = &points[0];
        assert_eq!(p.address, "Unknown Location");
        assert_eq!(p.operator, "Unknown Operator");
        assert_eq!(p.postal_code, "");
        assert_eq!(p.charger_type, "");
        assert!(p.serial_number.is_none());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let record = json!({
            "Latitude": 1.3,
            "Longitude": 103.8,
            "AddressInfo": "   ",
            "Operator": ""
        });
        let points = normalize_records(&[record]);
        assert_eq!(points[0].address, "Unknown Location");
        assert_eq!(points[0].operator, "Unknown Operator");
    }

    #[test]
    fn numeric_postal_code_is_stringified() {
        let record = json!({
            "Latitude": 1.3,
            "Longitude": 103.8,
            "PostalCode": 18989
        });
        let points = normalize_records(&[record]);
        assert_eq!(points[0].postal_code, "18989");
    }

    #[test]
    fn unparseable_lot_counts_default_to_zero_and_unknown() {
        let record = json!({
            "Latitude": 1.3,
            "Longitude": 103.8,
            "TotalLots": "many",
            "AvailableLots": -2
        });
        let points = normalize_records(&[record]);
        assert_eq!(points[0].total_lots, 0);
        assert_eq!(points[0].available_lots, 0);
        assert_eq!(points[0].status, Status::Unknown);
    }

    #[test]
    fn nested_chargers_flatten_into_lot_counts() {
        let record = json!({
            "Latitude": 1.3,
            "Longitude": 103.8,
            "Chargers": [
                { "Type": "AC", "Lots": [ { "Status": "1" }, { "Status": "0" } ] },
                { "Type": "DC", "Lots": [ { "Status": 1 } ] }
            ]
        });
        let points = normalize_records(&[record]);
        assert_eq!(points[0].total_lots, 3);
        assert_eq!(points[0].available_lots, 2);
        assert_eq!(points[0].status, Status::Partial);
    }

    #[test]
    fn flat_lot_fields_win_over_nested_chargers() {
        let record = json!({
            "Latitude": 1.3,
            "Longitude": 103.8,
            "TotalLots": 2,
            "AvailableLots": 0,
            "Chargers": [ { "Lots": [ { "Status": "1" } ] } ]
        });
        let points = normalize_records(&[record]);
        assert_eq!(points[0].total_lots, 2);
        assert_eq!(points[0].available_lots, 0);
        assert_eq!(points[0].status, Status::Occupied);
    }

    #[test]
    fn address_fallback_field_is_accepted() {
        let record = json!({
            "Latitude": 1.3,
            "Longitude": 103.8,
            "Address": "50 Jurong Gateway Road"
        });
        let points = normalize_records(&[record]);
        assert_eq!(points[0].address, "50 Jurong Gateway Road");
    }

    #[test]
    fn infinite_coordinates_are_rejected() {
        let record = json!({
            "Latitude": "inf",
            "Longitude": 103.8
        });
        assert!(normalize_records(&[record]).is_empty());
    }
}
