//! Tests for pagination module

use super::*;
use crate::config::{MatomoConfig, PageSize, PaginationStyle};
use serde_json::{json, Value};
use test_case::test_case;

fn full_page(size: u32) -> Value {
    Value::Array((0..size).map(|i| json!({ "idVisit": i })).collect())
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[test]
fn test_cursor_query_params() {
    let offset = Cursor::Offset(40);
    assert_eq!(offset.query_param(), "filter_offset");
    assert_eq!(offset.query_value(), "40");
    assert_eq!(offset.offset(), Some(40));
    assert_eq!(offset.to_string(), "filter_offset=40");

    let token = Cursor::Token("abc".to_string());
    assert_eq!(token.query_param(), "page");
    assert_eq!(token.query_value(), "abc");
    assert_eq!(token.offset(), None);
}

// ============================================================================
// Empty Page Detection
// ============================================================================

#[test_case(json!([]) => false; "empty array")]
#[test_case(json!({}) => false; "empty object")]
#[test_case(Value::Null => false; "null")]
#[test_case(json!([{"idVisit": 1}]) => true; "non-empty array")]
#[test_case(json!({"nb_visits": 3}) => true; "non-empty object")]
fn test_offset_has_more(body: Value) -> bool {
    OffsetPaginator::new(PageSize::Limited(10)).has_more(&body)
}

#[test]
fn test_page_len() {
    assert_eq!(page_len(&json!([1, 2, 3])), 3);
    assert_eq!(page_len(&json!({"a": 1})), 1);
    assert_eq!(page_len(&json!({})), 0);
    assert_eq!(page_len(&Value::Null), 0);
}

// ============================================================================
// Offset Pagination Tests
// ============================================================================

#[test]
fn test_offset_starts_at_zero() {
    let paginator = OffsetPaginator::new(PageSize::Limited(100));
    assert_eq!(paginator.cursor(), Some(Cursor::Offset(0)));
    assert_eq!(paginator.current_offset(), 0);
    assert!(!paginator.is_finished());
    assert!(!paginator.is_disabled());
}

#[test_case(1; "page size 1")]
#[test_case(2; "page size 2")]
#[test_case(50; "page size 50")]
fn test_offset_after_n_full_pages(page_size: u32) {
    let mut paginator = OffsetPaginator::new(PageSize::Limited(page_size));
    let page = full_page(page_size);

    for n in 1..=5u64 {
        let next = paginator.advance(&page);
        assert_eq!(next, Some(Cursor::Offset(n * u64::from(page_size))));
        assert_eq!(paginator.cursor(), next);
    }
}

#[test]
fn test_offset_running_count_sequence() {
    let mut paginator = OffsetPaginator::new(PageSize::Limited(2));
    let mut requested = vec![paginator.cursor()];

    let pages = [
        json!([{"idVisit": 1}, {"idVisit": 2}]),
        json!([{"idVisit": 3}]),
        json!([]),
    ];
    for page in &pages {
        if paginator.advance(page).is_none() {
            break;
        }
        requested.push(paginator.cursor());
    }

    assert_eq!(
        requested,
        vec![
            Some(Cursor::Offset(0)),
            Some(Cursor::Offset(2)),
            Some(Cursor::Offset(3)),
        ]
    );
    assert!(paginator.is_finished());
}

#[test]
fn test_offset_get_next_is_pure() {
    let paginator = OffsetPaginator::new(PageSize::Limited(10));
    let page = full_page(10);

    assert_eq!(paginator.get_next(&page), Some(Cursor::Offset(10)));
    assert_eq!(paginator.get_next(&page), Some(Cursor::Offset(10)));
    assert_eq!(paginator.current_offset(), 0);
}

#[test]
fn test_offset_stops_on_empty_page() {
    let mut paginator = OffsetPaginator::new(PageSize::Limited(10));
    assert_eq!(paginator.get_next(&json!([])), None);
    assert_eq!(paginator.advance(&json!({})), None);
    assert!(paginator.is_finished());
}

#[test]
fn test_offset_disabled_by_unlimited_page_size() {
    let mut paginator = OffsetPaginator::new(PageSize::Unlimited);
    let page = full_page(500);

    assert!(paginator.is_disabled());
    assert_eq!(paginator.cursor(), None);
    assert!(!paginator.has_more(&page));
    assert_eq!(paginator.get_next(&page), None);
    assert_eq!(paginator.advance(&page), None);
    assert!(paginator.is_finished());
}

// ============================================================================
// Token Pagination Tests
// ============================================================================

#[test]
fn test_token_first_page_has_no_cursor() {
    let paginator = TokenPaginator::new("$.next_page", PageSize::Limited(10)).unwrap();
    assert_eq!(paginator.cursor(), None);
    assert_eq!(paginator.token_path(), "$.next_page");
}

#[test]
fn test_token_follows_next_page() {
    let mut paginator = TokenPaginator::new("$.next_page", PageSize::Limited(10)).unwrap();

    let body = json!({"data": [1, 2], "next_page": "tok-2"});
    assert!(paginator.has_more(&body));
    assert_eq!(
        paginator.advance(&body),
        Some(Cursor::Token("tok-2".to_string()))
    );
    assert_eq!(paginator.cursor(), Some(Cursor::Token("tok-2".to_string())));

    let body = json!({"data": [3], "next_page": 3});
    assert_eq!(paginator.advance(&body), Some(Cursor::Token("3".to_string())));
}

#[test_case(json!({"data": []}); "missing token")]
#[test_case(json!({"next_page": null}); "null token")]
#[test_case(json!({"next_page": ""}); "empty token")]
#[test_case(json!([{"idVisit": 1}]); "array body")]
fn test_token_exhaustion(body: Value) {
    let mut paginator = TokenPaginator::new("$.next_page", PageSize::Limited(10)).unwrap();
    assert!(!paginator.has_more(&body));
    assert_eq!(paginator.advance(&body), None);
    assert!(paginator.is_finished());
    assert_eq!(paginator.cursor(), None);
}

#[test]
fn test_token_nested_path() {
    let paginator = TokenPaginator::new("$.meta.next", PageSize::Limited(10)).unwrap();
    let body = json!({"meta": {"next": "xyz"}});
    assert_eq!(
        paginator.get_next(&body),
        Some(Cursor::Token("xyz".to_string()))
    );
}

#[test]
fn test_token_disabled_by_unlimited_page_size() {
    let paginator = TokenPaginator::new("$.next_page", PageSize::Unlimited).unwrap();
    let body = json!({"next_page": "tok"});
    assert!(paginator.is_disabled());
    assert!(!paginator.has_more(&body));
    assert_eq!(paginator.get_next(&body), None);
}

// ============================================================================
// Paginator Tests
// ============================================================================

fn config(style: &str, filter_limit: &str) -> MatomoConfig {
    MatomoConfig::from_value(json!({
        "api_url": "https://matomo.example.com/index.php",
        "token_auth": "t",
        "idSite": "1",
        "filter_limit": filter_limit,
        "pagination": style,
    }))
    .unwrap()
}

#[test]
fn test_paginator_from_config_offset() {
    let cfg = config("offset", "25");
    assert_eq!(cfg.pagination, PaginationStyle::Offset);

    let mut paginator = Paginator::from_config(&cfg).unwrap();
    assert!(matches!(paginator, Paginator::Offset(_)));
    assert_eq!(paginator.cursor(), Some(Cursor::Offset(0)));

    let next = paginator.advance(&full_page(25));
    assert_eq!(next, Some(Cursor::Offset(25)));
    assert!(!paginator.is_finished());
}

#[test]
fn test_paginator_from_config_token() {
    let paginator = Paginator::from_config(&config("token", "25")).unwrap();
    assert!(matches!(paginator, Paginator::Token(_)));
    assert_eq!(paginator.cursor(), None);
    assert!(paginator.has_more(&json!({"next_page": "p2"})));
}

#[test]
fn test_paginator_disabled_in_both_styles() {
    for style in ["offset", "token"] {
        let mut paginator = Paginator::from_config(&config(style, "-1")).unwrap();
        assert!(paginator.is_disabled());
        assert_eq!(paginator.cursor(), None);
        assert_eq!(
            paginator.advance(&json!({"next_page": "p2", "rows": [1]})),
            None
        );
        assert!(paginator.is_finished());
    }
}
