//! Repository integration tests against in-memory SQLite.

mod common;

use chrono::{TimeZone, Utc};
use common::setup_test_db;
use lumo::error::{ErrorKind, Result};
use lumo::models::{
    new_id, GeoBounds, Link, LinkType, Lume, LumeType, Lumo, Page, RecordRef, TravelDetails,
    TravelMode,
};
use lumo::repository::{
    LinkRepository, LumeRepository, LumoRepository, SqlLinkRepository, SqlLumeRepository,
    SqlLumoRepository,
};
use uuid::Uuid;

fn page(limit: i32, offset: i32) -> Page {
    Page { limit, offset }
}

fn lumo(user_id: Uuid, title: &str) -> Lumo {
    let now = Utc::now();
    Lumo {
        id: 0,
        lumo_id: new_id(),
        user_id,
        title: title.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn lume(lumo_id: Uuid, lume_type: LumeType, name: &str, coords: Option<(f64, f64)>) -> Lume {
    let now = Utc::now();
    Lume {
        id: 0,
        lume_id: new_id(),
        lumo_id,
        lume_type,
        name: name.to_string(),
        description: String::new(),
        date_start: None,
        date_end: None,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        address: None,
        booking_link: None,
        images: vec![],
        category_tags: vec![],
        created_at: now,
        updated_at: now,
    }
}

fn link(from: Uuid, to: Uuid, link_type: LinkType) -> Link {
    let now = Utc::now();
    Link {
        id: 0,
        link_id: new_id(),
        from_lume_id: from,
        to_lume_id: to,
        link_type,
        travel: None,
        notes: None,
        sequence_index: None,
        created_at: now,
        updated_at: now,
    }
}

// ============================================================================
// Lumos
// ============================================================================

#[tokio::test]
async fn test_lumo_create_and_get_by_both_ids() -> Result<()> {
    let repo = SqlLumoRepository::new(setup_test_db().await);
    let input = lumo(Uuid::new_v4(), "Japan Trip");

    let created = repo.create(&input).await?;
    assert!(created.id > 0);
    assert_eq!(created.lumo_id, input.lumo_id);
    assert_eq!(created.created_at, input.created_at);

    let by_internal = repo.get(RecordRef::Internal(created.id)).await?;
    let by_external = repo.get(RecordRef::External(created.lumo_id)).await?;
    assert_eq!(by_internal, created);
    assert_eq!(by_external, created);

    Ok(())
}

#[tokio::test]
async fn test_lumo_missing_rows_are_not_found() -> Result<()> {
    let repo = SqlLumoRepository::new(setup_test_db().await);

    let err = repo.get(RecordRef::Internal(404)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repo.update(&lumo(Uuid::new_v4(), "ghost")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = repo.delete(RecordRef::External(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}

#[tokio::test]
async fn test_lumo_list_and_count_by_user() -> Result<()> {
    let repo = SqlLumoRepository::new(setup_test_db().await);
    let owner = Uuid::new_v4();

    for i in 0..3 {
        repo.create(&lumo(owner, &format!("Trip {}", i))).await?;
    }
    repo.create(&lumo(Uuid::new_v4(), "Someone else")).await?;

    assert_eq!(repo.count_by_user(owner).await?, 3);
    assert_eq!(repo.list_by_user(owner, page(10, 0)).await?.len(), 3);
    assert_eq!(repo.list_by_user(owner, page(2, 0)).await?.len(), 2);
    assert_eq!(repo.list_by_user(owner, page(2, 2)).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_lumo_update_and_delete() -> Result<()> {
    let repo = SqlLumoRepository::new(setup_test_db().await);
    let mut stored = repo.create(&lumo(Uuid::new_v4(), "Draft")).await?;

    stored.title = "Final".to_string();
    stored.updated_at = Utc::now();
    let updated = repo.update(&stored).await?;
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.created_at, stored.created_at);

    repo.delete(RecordRef::Internal(updated.id)).await?;
    let err = repo.get(RecordRef::External(updated.lumo_id)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}

// ============================================================================
// Lumes
// ============================================================================

#[tokio::test]
async fn test_lume_round_trips_every_field() -> Result<()> {
    let repo = SqlLumeRepository::new(setup_test_db().await);
    let start = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 4, 3, 18, 0, 0).unwrap();

    let input = Lume {
        description: "Neon and ramen".to_string(),
        date_start: Some(start),
        date_end: Some(end),
        address: Some("Shinjuku, Tokyo".to_string()),
        booking_link: Some("https://example.com/hotel".to_string()),
        images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        category_tags: vec!["nightlife".to_string()],
        ..lume(Uuid::new_v4(), LumeType::City, "Tokyo", Some((35.68, 139.69)))
    };

    let created = repo.create(&input).await?;
    let fetched = repo.get(RecordRef::External(created.lume_id)).await?;

    assert_eq!(fetched, created);
    assert_eq!(fetched.lume_type, LumeType::City);
    assert_eq!(fetched.description, "Neon and ramen");
    assert_eq!(fetched.date_start, Some(start));
    assert_eq!(fetched.latitude, Some(35.68));
    assert_eq!(fetched.images.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_lume_listing_filters() -> Result<()> {
    let repo = SqlLumeRepository::new(setup_test_db().await);
    let trip = Uuid::new_v4();

    repo.create(&lume(trip, LumeType::City, "Tokyo", Some((35.68, 139.69)))).await?;
    repo.create(&lume(trip, LumeType::City, "Osaka", Some((34.69, 135.50)))).await?;
    repo.create(&lume(trip, LumeType::Restaurant, "Ichiran", None)).await?;
    repo.create(&lume(Uuid::new_v4(), LumeType::City, "Paris", Some((48.85, 2.35)))).await?;

    let all = repo.list_by_lumo(trip, page(50, 0)).await?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].name, "Tokyo");

    let cities = repo.list_by_type(trip, LumeType::City, page(50, 0)).await?;
    assert_eq!(cities.len(), 2);

    let kansai = GeoBounds {
        min_lat: 34.0,
        max_lat: 35.0,
        min_lng: 135.0,
        max_lng: 136.0,
    };
    let found = repo.search_by_location(trip, kansai, page(50, 0)).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Osaka");

    assert_eq!(repo.count_by_lumo(trip).await?, 3);

    Ok(())
}

// ============================================================================
// Links
// ============================================================================

#[tokio::test]
async fn test_link_travel_details_round_trip() -> Result<()> {
    let repo = SqlLinkRepository::new(setup_test_db().await);
    let travel = TravelDetails {
        mode: TravelMode::Train,
        duration_sec: 8400,
        cost_estimate: 14_000.0,
        distance_meters: 515_000.0,
    };

    let input = Link {
        travel: Some(travel),
        notes: Some("Nozomi".to_string()),
        sequence_index: Some(2),
        ..link(Uuid::new_v4(), Uuid::new_v4(), LinkType::Travel)
    };
    let created = repo.create(&input).await?;
    let fetched = repo.get(RecordRef::Internal(created.id)).await?;

    assert_eq!(fetched.travel, Some(travel));
    assert_eq!(fetched.notes.as_deref(), Some("Nozomi"));
    assert_eq!(fetched.sequence_index, Some(2));

    Ok(())
}

#[tokio::test]
async fn test_link_directional_queries() -> Result<()> {
    let repo = SqlLinkRepository::new(setup_test_db().await);
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    repo.create(&link(a, b, LinkType::Travel)).await?;
    repo.create(&link(a, c, LinkType::Recommended)).await?;
    repo.create(&link(c, a, LinkType::Travel)).await?;
    repo.create(&link(a, a, LinkType::Custom)).await?;

    let all = page(10, 0);
    assert_eq!(repo.list_from(a, all).await?.len(), 3);
    assert_eq!(repo.list_to(a, all).await?.len(), 2);
    assert_eq!(repo.list_for_lume(a, all).await?.len(), 4);
    assert_eq!(repo.list_between(a, b, all).await?.len(), 1);
    assert_eq!(repo.list_between(b, a, all).await?.len(), 0);
    assert_eq!(repo.list_by_type(LinkType::Travel, all).await?.len(), 2);
    assert_eq!(
        repo.list_for_lume_by_type(c, LinkType::Travel, all).await?.len(),
        1
    );

    assert_eq!(repo.count_from(a).await?, 3);
    assert_eq!(repo.count_to(a).await?, 2);
    assert_eq!(repo.count_for_lume(a).await?, 4);

    Ok(())
}

#[tokio::test]
async fn test_link_ordering_prefers_sequence_index() -> Result<()> {
    let repo = SqlLinkRepository::new(setup_test_db().await);
    let from = Uuid::new_v4();

    let unordered = repo.create(&link(from, Uuid::new_v4(), LinkType::Travel)).await?;
    let second = repo
        .create(&Link {
            sequence_index: Some(2),
            ..link(from, Uuid::new_v4(), LinkType::Travel)
        })
        .await?;
    let first = repo
        .create(&Link {
            sequence_index: Some(1),
            ..link(from, Uuid::new_v4(), LinkType::Travel)
        })
        .await?;

    let ids: Vec<Uuid> = repo
        .list_from(from, page(10, 0))
        .await?
        .into_iter()
        .map(|l| l.link_id)
        .collect();
    assert_eq!(ids, vec![first.link_id, second.link_id, unordered.link_id]);

    Ok(())
}

#[tokio::test]
async fn test_link_delete_by_external_id() -> Result<()> {
    let repo = SqlLinkRepository::new(setup_test_db().await);
    let created = repo.create(&link(Uuid::new_v4(), Uuid::new_v4(), LinkType::Travel)).await?;

    repo.delete(RecordRef::External(created.link_id)).await?;

    let err = repo.delete(RecordRef::External(created.link_id)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    Ok(())
}
