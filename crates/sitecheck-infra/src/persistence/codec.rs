//! Inspection collection encoding
//!
//! A direct, order-preserving JSON array using the dashboard's field names
//! (`clientId`, `needs-attention`, ...), so collections saved by earlier
//! versions load unchanged.

use sitecheck_types::{Inspection, Result};

pub fn encode_inspections(inspections: &[Inspection]) -> Result<String> {
    Ok(serde_json::to_string(inspections)?)
}

pub fn decode_inspections(raw: &str) -> Result<Vec<Inspection>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sitecheck_types::{Area, InspectionStatus};

    fn sample(id: &str, score: u8) -> Inspection {
        let mut lobby = Area::new("Lobby").with_score(score as i64).with_notes("scuffed floor");
        lobby.photos.push("data:image/jpeg;base64,AAAA".to_string());
        Inspection {
            id: id.to_string(),
            client_id: "bcs-office".to_string(),
            site: "Main Office".to_string(),
            inspector: "Dana".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap(),
            areas: vec![lobby, Area::new("Restroom")],
            score,
            status: InspectionStatus::from_score(score),
        }
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let collection = vec![sample("3", 95), sample("2", 40), sample("1", 80)];
        let raw = encode_inspections(&collection).unwrap();
        assert_eq!(decode_inspections(&raw).unwrap(), collection);
    }

    #[test]
    fn test_wire_field_names() {
        let raw = encode_inspections(&[sample("1", 50)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["clientId"], "bcs-office");
        assert_eq!(first["status"], "needs-attention");
        assert_eq!(first["areas"][0]["notes"], "scuffed floor");
    }

    #[test]
    fn test_decode_legacy_collection() {
        let raw = r#"[{
            "id": "1767605400000",
            "clientId": "bcs-office",
            "site": "Conference Floor",
            "areas": [{"name": "Lobby", "score": 90}, {"name": "Kitchen", "score": 70, "notes": "", "photos": []}],
            "inspector": "Sam",
            "date": "2026-01-05T09:30:00.000Z",
            "score": 80,
            "status": "passed"
        }]"#;

        let decoded = decode_inspections(raw).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].areas[0].photos.len(), 0);
        assert_eq!(decoded[0].status, InspectionStatus::Passed);
        assert_eq!(decoded[0].date, Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_legacy_photo_data_survives_round_trip() {
        let raw = r#"[{
            "id": "1767605400000",
            "clientId": "bcs-office",
            "site": "Main Office",
            "areas": [{"name": "Lobby", "score": 85, "photoData": "data:image/jpeg;base64,AAAA"}],
            "inspector": "Sam",
            "date": "2026-01-05T09:30:00.000Z",
            "score": 85,
            "status": "passed"
        }]"#;

        let decoded = decode_inspections(raw).unwrap();
        assert_eq!(decoded[0].photo_count(), 1);

        let encoded = encode_inspections(&decoded).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value[0]["areas"][0]["photoData"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(decode_inspections("{\"not\": \"a list\"}").is_err());
    }
}
