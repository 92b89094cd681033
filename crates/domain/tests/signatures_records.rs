//! Integration coverage for signatures, records, and statistics.

use sigdex_domain::{CompletionEntry, FileRecord, FunctionSignature, ScanStatistics};

#[test]
fn record_from_identical_content_is_equal() {
    let build = || {
        FileRecord::from_signatures([
            FunctionSignature::new("foo", "a, b", "app.js"),
            FunctionSignature::new("bar", "", "app.js"),
        ])
    };
    assert_eq!(build(), build());
}

#[test]
fn signature_completion_matches_label_contract() {
    let signature = FunctionSignature::new("foo", "a, b", "app.js");
    assert_eq!(
        signature.completion(),
        &CompletionEntry::new("foo(a, b)\tapp.js", "foo(${1:a}, ${2:b})")
    );
}

#[test]
fn statistics_serialize_in_camel_case() -> Result<(), serde_json::Error> {
    let stats = ScanStatistics {
        files_seen: 3,
        eligible_files: 2,
        cache_misses: 2,
        ..ScanStatistics::default()
    };
    let value = serde_json::to_value(stats)?;
    assert_eq!(value["filesSeen"], 3);
    assert_eq!(value["cacheMisses"], 2);
    assert_eq!(value["aborted"], false);
    Ok(())
}

#[test]
fn records_serialize_as_signature_lists() -> Result<(), serde_json::Error> {
    let record = FileRecord::from_signatures([FunctionSignature::new("foo", "a", "app.js")]);
    let value = serde_json::to_value(&record)?;
    assert_eq!(
        value,
        serde_json::json!([{ "name": "foo", "parameters": "a", "location": "app.js" }])
    );
    Ok(())
}
