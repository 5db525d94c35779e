//! Tests for list-query planning.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::garage::{AuditStamp, Coordinates, GarageInput, GaragePatch, Location};

fn location() -> Location {
    let coordinates = Coordinates::new(1.0, 2.0).expect("valid coordinates");
    Location::new("place", coordinates).expect("valid location")
}

fn garage_with(code: i64, name: &str, created_date: i64) -> Garage {
    let input = GarageInput::new(code, name, None, None, location()).expect("valid input");
    Garage::create(Uuid::new_v4(), input, UserId::random(), created_date)
}

fn sort_by(field: SortField, order: SortOrder) -> Vec<SortSpec> {
    vec![SortSpec { field, order }]
}

fn plan_sorted(field: SortField, order: SortOrder) -> QueryPlan {
    plan(ListQuery {
        sort_by: sort_by(field, order),
        ..ListQuery::default()
    })
    .expect("valid query")
}

#[test]
fn empty_sort_specification_is_a_validation_error() {
    let err = plan(ListQuery::default()).expect_err("empty sortBy must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(None, DEFAULT_PAGE_SIZE)]
#[case(Some(0), DEFAULT_PAGE_SIZE)]
#[case(Some(5), 5)]
#[case(Some(100), MAX_PAGE_SIZE)]
#[case(Some(5_000), MAX_PAGE_SIZE)]
fn limit_defaults_and_clamps(#[case] limit: Option<u32>, #[case] expected: usize) {
    let built = plan(ListQuery {
        limit,
        sort_by: sort_by(SortField::Code, SortOrder::Asc),
        ..ListQuery::default()
    })
    .expect("valid query");
    assert_eq!(built.limit(), expected);
}

#[test]
fn empty_projection_falls_back_to_default_visible_set() {
    let built = plan_sorted(SortField::Code, SortOrder::Asc);
    assert_eq!(built.fields(), &ProjectField::default_set());
}

#[test]
fn explicit_projection_is_preserved() {
    let fields = BTreeSet::from([ProjectField::Name, ProjectField::Code]);
    let built = plan(ListQuery {
        fields: fields.clone(),
        sort_by: sort_by(SortField::Name, SortOrder::Asc),
        ..ListQuery::default()
    })
    .expect("valid query");
    assert_eq!(built.fields(), &fields);
}

#[rstest]
#[case("code", SortField::Code)]
#[case("name", SortField::Name)]
#[case("createdDate", SortField::CreatedDate)]
#[case("updatedDate", SortField::UpdatedDate)]
fn sort_fields_parse_from_wire_names(#[case] raw: &str, #[case] expected: SortField) {
    assert_eq!(SortField::from_str(raw), Ok(expected));
}

#[rstest]
#[case("isDeleted")]
#[case("price")]
#[case("")]
fn unknown_sort_fields_are_rejected(#[case] raw: &str) {
    assert!(SortField::from_str(raw).is_err());
}

#[test]
fn soft_delete_flag_is_not_projectable() {
    assert!(ProjectField::from_str("isDeleted").is_err());
}

#[rstest]
#[case("asc", SortOrder::Asc)]
#[case("DESC", SortOrder::Desc)]
fn sort_orders_parse_case_insensitively(#[case] raw: &str, #[case] expected: SortOrder) {
    assert_eq!(SortOrder::from_str(raw), Ok(expected));
}

#[test]
fn compare_orders_by_primary_field() {
    let built = plan_sorted(SortField::Code, SortOrder::Asc);
    let small = garage_with(1, "b", 10);
    let large = garage_with(2, "a", 5);
    assert_eq!(built.compare(&small, &large), Ordering::Less);
}

#[test]
fn descending_order_reverses_field_comparison() {
    let built = plan_sorted(SortField::Code, SortOrder::Desc);
    let small = garage_with(1, "b", 10);
    let large = garage_with(2, "a", 5);
    assert_eq!(built.compare(&small, &large), Ordering::Greater);
}

#[test]
fn equal_sort_keys_fall_back_to_identity() {
    let built = plan_sorted(SortField::Code, SortOrder::Desc);
    let a = garage_with(1, "same", 10);
    let b = garage_with(1, "same", 10);
    let expected = a.id().cmp(&b.id());
    assert_eq!(built.compare(&a, &b), expected);
    assert_ne!(built.compare(&a, &b), Ordering::Equal);
}

#[test]
fn secondary_sort_entry_breaks_primary_ties() {
    let built = plan(ListQuery {
        sort_by: vec![
            SortSpec {
                field: SortField::Code,
                order: SortOrder::Asc,
            },
            SortSpec {
                field: SortField::Name,
                order: SortOrder::Desc,
            },
        ],
        ..ListQuery::default()
    })
    .expect("valid query");
    let a = garage_with(1, "alpha", 10);
    let b = garage_with(1, "beta", 10);
    assert_eq!(built.compare(&a, &b), Ordering::Greater);
}

#[test]
fn never_updated_documents_order_first_ascending() {
    let built = plan_sorted(SortField::UpdatedDate, SortOrder::Asc);
    let untouched = garage_with(1, "a", 10);
    let mut touched = garage_with(2, "b", 10);
    touched.apply_patch(
        &GaragePatch::default(),
        &AuditStamp {
            by: UserId::random(),
            at: 99,
        },
    );
    assert_eq!(built.compare(&untouched, &touched), Ordering::Less);
}

#[test]
fn filters_are_conjunctive() {
    let garage = garage_with(7, "G1", 10);
    let matching = GarageFilters {
        code: Some(7),
        name: Some("G1".to_owned()),
        created_by: None,
    };
    let mismatched = GarageFilters {
        code: Some(7),
        name: Some("other".to_owned()),
        created_by: None,
    };
    assert!(matching.matches(&garage));
    assert!(!mismatched.matches(&garage));
    assert!(GarageFilters::default().matches(&garage));
}

#[test]
fn projection_keeps_only_requested_fields() {
    let garage = garage_with(7, "G1", 10);
    let fields = BTreeSet::from([ProjectField::Name, ProjectField::CreatedDate]);

    let projected = project(&garage, &fields);

    assert_eq!(projected.id, garage.id());
    assert_eq!(projected.name.as_deref(), Some("G1"));
    assert_eq!(projected.created_date, Some(10));
    assert!(projected.code.is_none());
    assert!(projected.created_by.is_none());
    assert!(projected.services.is_none());
}

#[test]
fn projection_never_carries_the_soft_delete_flag() {
    let mut garage = garage_with(7, "G1", 10);
    garage.soft_delete(&AuditStamp {
        by: UserId::random(),
        at: 20,
    });

    let projected = project(&garage, &ProjectField::default_set());
    let value = serde_json::to_value(&projected).expect("serialisable");

    assert!(value.get("isDeleted").is_none());
    assert!(value.get("is_deleted").is_none());
}

#[test]
fn default_projection_leaves_references_as_bare_ids() {
    let garage = garage_with(7, "G1", 10);
    let projected = project(&garage, &ProjectField::default_set());
    match projected.created_by {
        Some(UserRef::Id(id)) => assert_eq!(&id, garage.created_by()),
        other => panic!("expected bare id reference, got {other:?}"),
    }
    assert!(projected.updated_by.is_none());
}
