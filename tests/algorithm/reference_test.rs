//! Custom reference tables loaded from JSON

use nutri_classify::algorithm::growth::ReferenceTableSpec;
use nutri_classify::models::types::Indicator;
use nutri_classify::standards::who_rows;
use nutri_classify::{ClassificationError, LookupMode, ReferenceTableStore, Sex};

use crate::utils::store;

fn who_specs() -> Vec<ReferenceTableSpec> {
    Indicator::ALL
        .into_iter()
        .flat_map(|indicator| [Sex::Male, Sex::Female].map(move |sex| (indicator, sex)))
        .map(|(indicator, sex)| ReferenceTableSpec {
            indicator,
            sex,
            rows: who_rows(indicator, sex).unwrap().to_vec(),
        })
        .collect()
}

fn load(specs: &[ReferenceTableSpec]) -> Result<ReferenceTableStore, ClassificationError> {
    let json = serde_json::to_string(specs).unwrap();
    ReferenceTableStore::from_json(&json, LookupMode::Nearest)
}

fn assert_invalid(result: Result<ReferenceTableStore, ClassificationError>, needle: &str) {
    match result {
        Err(ClassificationError::InvalidReferenceTable(msg)) => {
            assert!(msg.contains(needle), "unexpected message: {msg}");
        }
        other => panic!("expected InvalidReferenceTable, got {other:?}"),
    }
}

#[test]
fn test_json_store_matches_embedded_tables() {
    let custom = load(&who_specs()).unwrap();
    let embedded = store();

    // 10 months sits between the 9 and 12 month rows, nearer to 9
    let row = custom.lookup(Indicator::WeightForAge, Sex::Male, 10.0).unwrap();
    assert_eq!(row.index, 9.0);
    assert_eq!(row.median, 8.9);

    for (indicator, sex, value) in [
        (Indicator::HeightForAge, Sex::Female, 24.0),
        (Indicator::WeightForHeight, Sex::Male, 87.0),
        (Indicator::BmiForAge, Sex::Female, 198.0),
    ] {
        assert_eq!(
            custom.lookup(indicator, sex, value).unwrap(),
            embedded.lookup(indicator, sex, value).unwrap()
        );
    }
}

#[test]
fn test_json_store_requires_every_partition() {
    let mut specs = who_specs();
    specs.retain(|spec| !(spec.indicator == Indicator::BmiForAge && spec.sex == Sex::Female));
    assert_invalid(load(&specs), "missing");
}

#[test]
fn test_json_store_rejects_unsorted_rows() {
    let mut specs = who_specs();
    specs[0].rows.reverse();
    assert_invalid(load(&specs), "strictly increasing");
}

#[test]
fn test_json_store_rejects_non_positive_sd() {
    let mut specs = who_specs();
    specs[2].rows[1].sd = 0.0;
    assert_invalid(load(&specs), "sd 0");
}

#[test]
fn test_json_store_rejects_unknown_sex_partition() {
    let mut value = serde_json::to_value(who_specs()).unwrap();
    value[0]["sex"] = serde_json::Value::from("Unknown");
    let result = ReferenceTableStore::from_json(&value.to_string(), LookupMode::Nearest);
    assert_invalid(result, "partitioned by Male or Female");
}

#[test]
fn test_json_store_rejects_malformed_json() {
    let result = ReferenceTableStore::from_json("[{\"indicator\": 3}]", LookupMode::Nearest);
    assert!(matches!(result, Err(ClassificationError::Serialization(_))));
}

#[test]
fn test_json_store_from_file() {
    let path = std::env::temp_dir().join(format!("nutri-classify-tables-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_string(&who_specs()).unwrap()).unwrap();
    let loaded = ReferenceTableStore::from_json_file(&path, LookupMode::Interpolated);
    std::fs::remove_file(&path).unwrap();

    let row = loaded
        .unwrap()
        .lookup(Indicator::WeightForAge, Sex::Male, 10.5)
        .unwrap();
    // Halfway between 8.9 (9 months) and 9.6 (12 months)
    assert!((row.median - 9.25).abs() < 1e-9);

    let missing = std::env::temp_dir().join("nutri-classify-no-such-file.json");
    assert!(matches!(
        ReferenceTableStore::from_json_file(&missing, LookupMode::Nearest),
        Err(ClassificationError::Io(_))
    ));
}
