//! Tests for the in-memory garage collection, centred on the pagination
//! contract: completeness, no duplication, and stale-anchor detection.

use std::collections::BTreeSet;

use uuid::Uuid;

use super::MemoryGarageRepository;
use crate::domain::garage::{
    AuditStamp, Coordinates, Garage, GarageInput, GaragePatch, Location, ServiceInput,
};
use crate::domain::ports::{GarageRepository, GarageRepositoryError};
use crate::domain::query::{
    self, GarageFilters, ListQuery, ProjectField, QueryPlan, SortField, SortOrder, SortSpec,
};
use crate::domain::user::UserId;

fn location() -> Location {
    let coordinates = Coordinates::new(10.0, 20.0).expect("valid coordinates");
    Location::new("place-1", coordinates).expect("valid location")
}

fn garage_with(code: i64, name: &str, created_date: i64) -> Garage {
    let input = GarageInput::new(code, name, None, None, location()).expect("valid input");
    Garage::create(Uuid::new_v4(), input, UserId::random(), created_date)
}

fn stamp() -> AuditStamp {
    AuditStamp {
        by: UserId::random(),
        at: 9_000,
    }
}

fn asc_by_code() -> Vec<SortSpec> {
    vec![SortSpec {
        field: SortField::Code,
        order: SortOrder::Asc,
    }]
}

fn plan_with(sort_by: Vec<SortSpec>, limit: u32, last_id: Option<Uuid>) -> QueryPlan {
    query::plan(ListQuery {
        limit: Some(limit),
        last_id,
        sort_by,
        ..ListQuery::default()
    })
    .expect("valid query")
}

async fn seed(repo: &MemoryGarageRepository, garages: &[Garage]) {
    for garage in garages {
        repo.insert(garage.clone()).await.expect("insert succeeds");
    }
}

/// Expected full ordering of the given garages under this sort.
fn expected_order(garages: &[Garage], sort_by: Vec<SortSpec>) -> Vec<Uuid> {
    let plan = plan_with(sort_by, 1, None);
    let mut ordered: Vec<&Garage> = garages.iter().collect();
    ordered.sort_by(|a, b| plan.compare(a, b));
    ordered.iter().map(|garage| garage.id()).collect()
}

/// Walk the collection page by page, feeding each page's last id back in.
async fn paginate(
    repo: &MemoryGarageRepository,
    sort_by: Vec<SortSpec>,
    limit: u32,
) -> Vec<Uuid> {
    let mut seen = Vec::new();
    let mut last_id = None;
    for _ in 0..50 {
        let plan = plan_with(sort_by.clone(), limit, last_id);
        let page = repo.execute(&plan).await.expect("page executes");
        if page.is_empty() {
            return seen;
        }
        last_id = page.last().map(|projection| projection.id);
        seen.extend(page.into_iter().map(|projection| projection.id));
    }
    panic!("pagination did not terminate");
}

#[tokio::test]
async fn cursor_pagination_yields_every_document_exactly_once_in_order() {
    let repo = MemoryGarageRepository::new();
    // Duplicate codes force the identity tie-break to carry entire pages.
    let garages: Vec<Garage> = [5, 1, 3, 3, 3, 2, 4]
        .into_iter()
        .enumerate()
        .map(|(index, code)| garage_with(code, &format!("g{index}"), 100 + index as i64))
        .collect();
    seed(&repo, &garages).await;

    let seen = paginate(&repo, asc_by_code(), 2).await;

    assert_eq!(seen, expected_order(&garages, asc_by_code()));
}

#[tokio::test]
async fn descending_pagination_is_complete_and_duplicate_free() {
    let repo = MemoryGarageRepository::new();
    let garages: Vec<Garage> = [2, 2, 7, 1, 9]
        .into_iter()
        .enumerate()
        .map(|(index, code)| garage_with(code, &format!("g{index}"), 100))
        .collect();
    seed(&repo, &garages).await;

    let sort_by = vec![SortSpec {
        field: SortField::Code,
        order: SortOrder::Desc,
    }];
    let seen = paginate(&repo, sort_by.clone(), 2).await;

    assert_eq!(seen, expected_order(&garages, sort_by));
}

#[tokio::test]
async fn insertions_between_pages_never_duplicate_or_drop_existing_documents() {
    let repo = MemoryGarageRepository::new();
    let garages: Vec<Garage> = (1..=6)
        .map(|code| garage_with(code * 10, &format!("g{code}"), 100))
        .collect();
    seed(&repo, &garages).await;

    let first = repo
        .execute(&plan_with(asc_by_code(), 2, None))
        .await
        .expect("first page executes");
    let anchor = first.last().expect("page has entries").id;

    // One document lands before the anchor (missed by design), one after.
    let before = garage_with(5, "late-before", 200);
    let after = garage_with(35, "late-after", 200);
    seed(&repo, &[before.clone(), after.clone()]).await;

    let mut seen: Vec<Uuid> = first.iter().map(|projection| projection.id).collect();
    let mut last_id = Some(anchor);
    for _ in 0..50 {
        let page = repo
            .execute(&plan_with(asc_by_code(), 2, last_id))
            .await
            .expect("page executes");
        if page.is_empty() {
            break;
        }
        last_id = page.last().map(|projection| projection.id);
        seen.extend(page.iter().map(|projection| projection.id));
    }

    for garage in &garages {
        let count = seen.iter().filter(|id| **id == garage.id()).count();
        assert_eq!(count, 1, "document {} must appear exactly once", garage.id());
    }
    assert_eq!(seen.iter().filter(|id| **id == after.id()).count(), 1);
    assert!(!seen.contains(&before.id()));
}

#[tokio::test]
async fn deletion_of_an_unseen_document_excludes_it_from_later_pages() {
    let repo = MemoryGarageRepository::new();
    let garages: Vec<Garage> = (1..=5)
        .map(|code| garage_with(code, &format!("g{code}"), 100))
        .collect();
    seed(&repo, &garages).await;

    let order = expected_order(&garages, asc_by_code());
    let first = repo
        .execute(&plan_with(asc_by_code(), 2, None))
        .await
        .expect("first page executes");
    let anchor = first.last().expect("page has entries").id;

    let unseen = *order.last().expect("order is non-empty");
    assert!(
        repo.soft_delete(unseen, stamp()).await.expect("delete runs"),
        "target must have been live"
    );

    let rest = repo
        .execute(&plan_with(asc_by_code(), 10, Some(anchor)))
        .await
        .expect("remaining page executes");
    let rest_ids: Vec<Uuid> = rest.iter().map(|projection| projection.id).collect();

    assert!(!rest_ids.contains(&unseen));
    let mut seen: Vec<Uuid> = first.iter().map(|projection| projection.id).collect();
    seen.extend(rest_ids);
    let expected: Vec<Uuid> = order.into_iter().filter(|id| *id != unseen).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn mutating_a_non_sort_field_between_pages_keeps_documents_unique() {
    let repo = MemoryGarageRepository::new();
    let garages: Vec<Garage> = (1..=5)
        .map(|code| garage_with(code, &format!("g{code}"), 100))
        .collect();
    seed(&repo, &garages).await;

    let first = repo
        .execute(&plan_with(asc_by_code(), 2, None))
        .await
        .expect("first page executes");
    let anchor = first.last().expect("page has entries").id;

    // Rename a not-yet-seen document; code (the sort key) is untouched.
    let order = expected_order(&garages, asc_by_code());
    let target = *order.last().expect("order is non-empty");
    let patch = GaragePatch {
        name: Some("renamed".to_owned()),
        ..GaragePatch::default()
    };
    repo.update_one(target, patch, stamp())
        .await
        .expect("update runs")
        .expect("target exists");

    let mut seen: Vec<Uuid> = first.iter().map(|projection| projection.id).collect();
    let mut last_id = Some(anchor);
    loop {
        let page = repo
            .execute(&plan_with(asc_by_code(), 2, last_id))
            .await
            .expect("page executes");
        if page.is_empty() {
            break;
        }
        last_id = page.last().map(|projection| projection.id);
        seen.extend(page.iter().map(|projection| projection.id));
    }

    assert_eq!(seen, order);
}

#[tokio::test]
async fn stale_cursor_anchor_is_rejected_not_silently_restarted() {
    let repo = MemoryGarageRepository::new();
    let garage = garage_with(1, "g1", 100);
    seed(&repo, &[garage.clone()]).await;

    repo.soft_delete(garage.id(), stamp())
        .await
        .expect("delete runs");

    let err = repo
        .execute(&plan_with(asc_by_code(), 2, Some(garage.id())))
        .await
        .expect_err("deleted anchor must fail");
    assert_eq!(
        err,
        GarageRepositoryError::StaleCursor {
            last_id: garage.id()
        }
    );

    let unknown = Uuid::new_v4();
    let err = repo
        .execute(&plan_with(asc_by_code(), 2, Some(unknown)))
        .await
        .expect_err("unknown anchor must fail");
    assert_eq!(err, GarageRepositoryError::StaleCursor { last_id: unknown });
}

#[tokio::test]
async fn soft_deleted_documents_are_invisible_and_refuse_mutation() {
    let repo = MemoryGarageRepository::new();
    let garage = garage_with(1, "g1", 100);
    let survivor = garage_with(2, "g2", 100);
    seed(&repo, &[garage.clone(), survivor.clone()]).await;

    assert!(repo.soft_delete(garage.id(), stamp()).await.expect("delete runs"));

    let page = repo
        .execute(&plan_with(asc_by_code(), 10, None))
        .await
        .expect("list executes");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, survivor.id());

    let updated = repo
        .update_one(garage.id(), GaragePatch::default(), stamp())
        .await
        .expect("update runs");
    assert!(updated.is_none());

    assert!(!repo.soft_delete(garage.id(), stamp()).await.expect("delete runs"));

    let added = repo
        .add_services(garage.id(), Vec::new(), stamp())
        .await
        .expect("add runs");
    assert!(added.is_none());

    let removed = repo
        .remove_services(garage.id(), vec![Uuid::new_v4()], stamp())
        .await
        .expect("remove runs");
    assert!(removed.is_none());
}

#[tokio::test]
async fn no_matching_documents_is_an_empty_page_not_an_error() {
    let repo = MemoryGarageRepository::new();
    seed(&repo, &[garage_with(1, "g1", 100)]).await;

    let plan = query::plan(ListQuery {
        filters: GarageFilters {
            code: Some(999),
            ..GarageFilters::default()
        },
        sort_by: asc_by_code(),
        ..ListQuery::default()
    })
    .expect("valid query");

    let page = repo.execute(&plan).await.expect("list executes");
    assert!(page.is_empty());
}

#[tokio::test]
async fn pages_never_exceed_the_plan_limit() {
    let repo = MemoryGarageRepository::new();
    let garages: Vec<Garage> = (1..=10)
        .map(|code| garage_with(code, &format!("g{code}"), 100))
        .collect();
    seed(&repo, &garages).await;

    let page = repo
        .execute(&plan_with(asc_by_code(), 3, None))
        .await
        .expect("list executes");
    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn execute_applies_the_plan_projection() {
    let repo = MemoryGarageRepository::new();
    seed(&repo, &[garage_with(1, "g1", 100)]).await;

    let plan = query::plan(ListQuery {
        sort_by: asc_by_code(),
        fields: BTreeSet::from([ProjectField::Name]),
        ..ListQuery::default()
    })
    .expect("valid query");

    let page = repo.execute(&plan).await.expect("list executes");
    let projection = page.first().expect("one document");
    assert_eq!(projection.name.as_deref(), Some("g1"));
    assert!(projection.code.is_none());
    assert!(projection.created_by.is_none());
}

#[tokio::test]
async fn filters_restrict_results_conjunctively() {
    let repo = MemoryGarageRepository::new();
    let wanted = garage_with(7, "wanted", 100);
    seed(&repo, &[wanted.clone(), garage_with(7, "other", 100)]).await;

    let plan = query::plan(ListQuery {
        filters: GarageFilters {
            code: Some(7),
            name: Some("wanted".to_owned()),
            ..GarageFilters::default()
        },
        sort_by: asc_by_code(),
        ..ListQuery::default()
    })
    .expect("valid query");

    let page = repo.execute(&plan).await.expect("list executes");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, wanted.id());
}

#[tokio::test]
async fn service_add_then_remove_round_trips() {
    let repo = MemoryGarageRepository::new();
    let garage = garage_with(1, "g1", 100);
    seed(&repo, &[garage.clone()]).await;

    let s1 = ServiceInput::new("wash", 10.0, None)
        .expect("valid service")
        .into_service(Uuid::new_v4());
    let s2 = ServiceInput::new("paint", 25.0, None)
        .expect("valid service")
        .into_service(Uuid::new_v4());

    let services = repo
        .add_services(garage.id(), vec![s1.clone(), s2.clone()], stamp())
        .await
        .expect("add runs")
        .expect("garage exists");
    assert_eq!(services.len(), 2);

    let missing = Uuid::new_v4();
    let removal = repo
        .remove_services(garage.id(), vec![s1.id, missing], stamp())
        .await
        .expect("remove runs")
        .expect("garage exists");

    assert_eq!(removal.removed, vec![s1.id]);
    assert_eq!(removal.services, vec![s2]);
}
