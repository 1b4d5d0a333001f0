//! Core types for parsed address records and per-page fetch results.

use serde::{Deserialize, Serialize};

/// A single postal-address record extracted from a results-table row.
///
/// Produced only by parsing the upstream HTML; the `number` field holds the
/// CEP digits with all punctuation stripped (`"01310-100"` → `"01310100"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Street or place name (logradouro).
    pub place: String,
    /// Neighborhood (bairro).
    pub neighborhood: String,
    /// City, taken from the left half of the upstream's `city/state` cell.
    pub city: String,
    /// State abbreviation, from the right half of the `city/state` cell.
    pub state: String,
    /// CEP code, digits only.
    pub number: String,
}

/// The outcome of fetching one results page.
///
/// Transient: produced per fetch and consumed immediately by the
/// orchestrator. `total_count` is authoritative only on the offset-0 page;
/// the orchestrator ignores it on later chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// The record offset this page was requested at.
    pub offset: u64,
    /// The total match count reported by the page's summary element.
    pub total_count: u64,
    /// Records in the order the upstream table lists them.
    pub records: Vec<AddressRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AddressRecord {
        AddressRecord {
            place: "Avenida Paulista".into(),
            neighborhood: "Bela Vista".into(),
            city: "São Paulo".into(),
            state: "SP".into(),
            number: "01310100".into(),
        }
    }

    #[test]
    fn address_record_construction() {
        let record = sample_record();
        assert_eq!(record.city, "São Paulo");
        assert_eq!(record.number, "01310100");
    }

    #[test]
    fn address_record_serde_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).expect("serialize");
        let decoded: AddressRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, record);
    }

    #[test]
    fn address_record_serializes_diacritics() {
        let json = serde_json::to_string(&sample_record()).expect("serialize");
        assert!(json.contains("São Paulo"));
    }

    #[test]
    fn page_result_construction() {
        let page = PageResult {
            offset: 50,
            total_count: 120,
            records: vec![sample_record()],
        };
        assert_eq!(page.offset, 50);
        assert_eq!(page.total_count, 120);
        assert_eq!(page.records.len(), 1);
    }
}
