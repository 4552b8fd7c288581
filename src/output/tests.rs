//! Tests for output module

use super::*;
use crate::decode::JsonDecoder;
use crate::engine::Message;
use crate::streams::visits_details;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn lines(writer: MessageWriter<Vec<u8>>) -> Vec<String> {
    String::from_utf8(writer.into_inner())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_writes_one_line_per_message() {
    let time = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    let records = JsonDecoder::new()
        .decode(r#"[{"idSite":1,"idVisit":100},{"idSite":1,"idVisit":101}]"#)
        .unwrap();

    let mut writer = MessageWriter::new(Vec::new());
    writer.write(&Message::schema(&visits_details())).unwrap();
    for record in records {
        writer
            .write(&Message::record("VisitsDetails", record, time))
            .unwrap();
    }
    writer.flush().unwrap();

    assert_eq!(writer.messages_written(), 3);
    assert_eq!(writer.records_written(), 2);

    let lines = lines(writer);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(r#"{"type":"SCHEMA","stream":"VisitsDetails""#));
    assert_eq!(
        lines[1],
        r#"{"type":"RECORD","stream":"VisitsDetails","record":{"idSite":1,"idVisit":100},"time_extracted":"2024-05-01T08:30:00Z"}"#
    );
}

#[test]
fn test_numbers_written_with_original_digits() {
    let time = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let record = JsonDecoder::new()
        .decode(r#"[{"revenue": 99999999999999999.99, "ratio": 1.10, "big": 123456789012345678901234567890}]"#)
        .unwrap()
        .remove(0);

    let mut writer = MessageWriter::new(Vec::new());
    writer
        .write(&Message::record("VisitsDetails", record, time))
        .unwrap();

    let line = &lines(writer)[0];
    assert!(line.contains(r#""revenue":99999999999999999.99"#));
    assert!(line.contains(r#""ratio":1.10"#));
    assert!(line.contains(r#""big":123456789012345678901234567890"#));
}

#[test]
fn test_write_json_document() {
    let mut writer = MessageWriter::new(Vec::new());
    writer
        .write_json(&serde_json::json!({"status": "SUCCEEDED"}))
        .unwrap();

    assert_eq!(writer.messages_written(), 0);
    assert_eq!(lines(writer), vec![r#"{"status":"SUCCEEDED"}"#]);
}
