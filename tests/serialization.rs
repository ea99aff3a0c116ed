//! Serialised forms of queries and records

use std::path::PathBuf;

use genbank_reader::{read_genbank, Coordinates, GenbankRecord, Query};
use serde_json::json;

fn sample_record() -> GenbankRecord {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample.gbk");
    read_genbank(path).unwrap().record
}

#[test]
fn query_json_shape() {
    let query = Query::FetchGene("thr.*".to_string());
    assert_eq!(
        serde_json::to_value(&query).unwrap(),
        json!({ "query": "fetch_gene", "argument": "thr.*" })
    );
    assert_eq!(
        serde_json::to_value(&Query::Summary).unwrap(),
        json!({ "query": "summary" })
    );

    let parsed: Query =
        serde_json::from_str(r#"{"query":"find_sites","argument":"GAATTC"}"#).unwrap();
    assert_eq!(parsed, Query::FindSites("GAATTC".to_string()));

    let parsed: Query = serde_json::from_str(r#"{"query":"summary"}"#).unwrap();
    assert_eq!(parsed, Query::Summary);

    assert!(serde_json::from_str::<Query>(r#"{"query":"translate","argument":"x"}"#).is_err());
    assert!(serde_json::from_str::<Query>(r#"{"query":"fetch_cds"}"#).is_err());
}

#[test]
fn query_tag_is_the_query_key() {
    let queries = [
        Query::Summary,
        Query::FetchGene("g".to_string()),
        Query::FetchCds("c".to_string()),
        Query::FetchFeatures("1,2".to_string()),
        Query::FindSites("N".to_string()),
    ];
    for query in queries {
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["query"], query.key());

        let back: Query = serde_json::from_value(value).unwrap();
        assert_eq!(back, query);
    }
}

#[test]
fn record_round_trip() {
    let record = sample_record();
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["accession"], "NC_SAMPLE1");
    assert_eq!(value["genes"][0]["name"], "thrL");
    assert_eq!(
        value["genes"][0]["coordinates"],
        json!({ "first": 5, "last": 34 })
    );
    assert_eq!(value["genes"][1]["orientation"], "Reverse");
    assert_eq!(value["cdss"][1]["protein_id"], "NP_414543.1");

    let text = serde_json::to_string(&record).unwrap();
    let restored: GenbankRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, record);
}

#[test]
fn reversed_coordinates_are_rejected() {
    let ok: Coordinates = serde_json::from_value(json!({ "first": 3, "last": 9 })).unwrap();
    assert_eq!(ok, Coordinates::new(3, 9).unwrap());

    let err = serde_json::from_value::<Coordinates>(json!({ "first": 9, "last": 3 }))
        .unwrap_err();
    assert!(err.to_string().contains("start 9 lies after stop 3"));
}
