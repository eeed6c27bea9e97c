use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AddressKind, AssessmentRecord, Network, ScoreSet, Verdict};

/// Assemble an assessment record. Address and network are taken as given;
/// classification has to have succeeded before this is called.
#[allow(clippy::too_many_arguments)]
pub fn build_assessment_record(
    address: &str,
    network: Network,
    scores: ScoreSet,
    verdict: Verdict,
    analysis: impl Into<String>,
    checks_passed: u32,
    total_checks: u32,
    timestamp: Option<DateTime<Utc>>,
) -> AssessmentRecord {
    AssessmentRecord {
        id: Uuid::new_v4(),
        address: address.to_string(),
        network,
        address_type: AddressKind::Unknown,
        scores,
        verdict,
        risk_category: None,
        analysis: analysis.into(),
        token_name: None,
        symbol: None,
        checks_passed,
        total_checks,
        timestamp: timestamp.unwrap_or_else(Utc::now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_explicit_timestamp_is_kept() {
        let at = Utc.with_ymd_and_hms(2025, 4, 17, 14, 37, 0).unwrap();
        let record = build_assessment_record(
            "0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
            Network::Ethereum,
            ScoreSet::default(),
            Verdict::HighRisk,
            "No activity.",
            0,
            3,
            Some(at),
        );
        assert_eq!(record.timestamp, at);
        assert_eq!(record.verdict, Verdict::HighRisk);
        assert_eq!(record.total_checks, 3);
    }

    #[test]
    fn test_timestamp_defaults_to_now() {
        let before = Utc::now();
        let record = build_assessment_record(
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
            Network::Bitcoin,
            ScoreSet::default(),
            Verdict::LikelyRisky,
            String::from("ok"),
            1,
            3,
            None,
        );
        assert!(record.timestamp >= before);
        assert!(record.timestamp <= Utc::now());
    }

    #[test]
    fn test_record_json_flattens_scores() {
        let record = build_assessment_record(
            "0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
            Network::Polygon,
            ScoreSet {
                trust_score: 70,
                fraud_risk: Some(15),
                ..Default::default()
            },
            Verdict::LikelyRisky,
            "text",
            2,
            4,
            None,
        )
        .with_token(Some("Token".into()), Some("TKN".into()))
        .with_address_type(AddressKind::Contract);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["trustScore"], 70);
        assert_eq!(json["fraudRisk"], 15);
        assert_eq!(json["checksPassed"], 2);
        assert_eq!(json["addressType"], "contract");
        assert_eq!(json["verdict"], "Likely Risky");
        assert_eq!(json["network"], "polygon");
        assert_eq!(json["symbol"], "TKN");

        let back: AssessmentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_records_without_address_type_still_load() {
        let mut json = serde_json::to_value(build_assessment_record(
            "7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV",
            Network::Solana,
            ScoreSet::default(),
            Verdict::LikelyLegit,
            "ok",
            3,
            3,
            None,
        ))
        .unwrap();
        json.as_object_mut().unwrap().remove("addressType");

        let back: AssessmentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.address_type, AddressKind::Unknown);
    }
}
