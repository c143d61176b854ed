//! Integration tests for the playlists vertical slice
//!
//! Covers playlist CRUD, ordered membership, orphan cleanup on delete,
//! wholesale content replacement, and the idempotent-insert conflict policy.

mod test_helpers;

use drift_core::types::{CreatePlaylist, ListQuery, PlaylistSort};
use drift_storage::{playlists, tracks};
use test_helpers::*;

#[tokio::test]
async fn test_create_playlist_with_ordered_tracks() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain", "uri:thunder", "uri:wind"]).await;

    let playlist = playlists::get_by_name(pool, "Rain")
        .await
        .unwrap()
        .expect("playlist should exist");

    assert_eq!(playlist.name, "Rain");
    assert!(!playlist.shuffle);
    assert!(!playlist.is_active);
    assert!(!playlist.has_error);
    assert!((playlist.volume - 1.0).abs() < f64::EPSILON);

    let members = playlists::tracks_of(pool, "Rain").await.unwrap();
    assert_eq!(members, strings(&["uri:rain", "uri:thunder", "uri:wind"]));
}

#[tokio::test]
async fn test_create_reuses_shared_tracks() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain"]).await;
    create_test_playlist(pool, "Storm", &["uri:rain", "uri:thunder"]).await;

    // One shared track row, not two
    assert_eq!(track_count(pool).await, 2);

    let members = playlists::tracks_of(pool, "Storm").await.unwrap();
    assert_eq!(members, strings(&["uri:rain", "uri:thunder"]));
}

#[tokio::test]
async fn test_create_conflicting_name_is_ignored() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain"]).await;

    // Same name again with different flags and tracks: the whole create is a
    // no-op, nothing merges into the existing membership
    playlists::create(
        pool,
        &CreatePlaylist::new("Rain", true, strings(&["uri:thunder", "uri:wind"])),
    )
    .await
    .expect("conflicting create should not fail");

    let playlist = playlists::get_by_name(pool, "Rain").await.unwrap().unwrap();
    assert!(!playlist.shuffle, "existing row must keep its flags");
    assert_eq!(membership_count(pool, "Rain").await, 1);
    assert_eq!(
        playlists::tracks_of(pool, "Rain").await.unwrap(),
        strings(&["uri:rain"])
    );
    assert_eq!(track_count(pool).await, 1, "no stray tracks from the no-op");
}

#[tokio::test]
async fn test_quick_add_conflicting_name_leaves_existing_playlist_alone() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain", "uri:thunder"]).await;

    let entries = vec![
        ("uri:waves".to_string(), "Rain".to_string()),
        ("uri:fire".to_string(), "Fireplace".to_string()),
    ];
    playlists::create_single_track_batch(pool, &entries)
        .await
        .expect("Failed to quick-add");

    // The colliding entry is skipped wholesale, the other lands normally
    assert_eq!(
        playlists::tracks_of(pool, "Rain").await.unwrap(),
        strings(&["uri:rain", "uri:thunder"])
    );
    assert!(!tracks::exists(pool, "uri:waves").await.unwrap());
    assert_eq!(
        playlists::tracks_of(pool, "Fireplace").await.unwrap(),
        strings(&["uri:fire"])
    );
}

#[tokio::test]
async fn test_quick_add_batch_creates_single_track_playlists() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let entries = vec![
        ("uri:waves".to_string(), "Waves".to_string()),
        ("uri:fire".to_string(), "Fireplace".to_string()),
        ("uri:birds".to_string(), "Birds".to_string()),
    ];
    playlists::create_single_track_batch(pool, &entries)
        .await
        .expect("Failed to quick-add");

    let listing = playlists::list(pool, &ListQuery::default()).await.unwrap();
    assert_eq!(listing.len(), 3);
    assert!(listing.iter().all(|p| p.is_single_track));

    assert_eq!(playlists::tracks_of(pool, "Waves").await.unwrap(), strings(&["uri:waves"]));
    assert_eq!(playlists::tracks_of(pool, "Fireplace").await.unwrap(), strings(&["uri:fire"]));
}

#[tokio::test]
async fn test_delete_returns_exactly_the_orphaned_uris() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // "A" holds x and y; "B" also holds x
    create_test_playlist(pool, "A", &["uri:x", "uri:y"]).await;
    create_test_playlist(pool, "B", &["uri:x"]).await;

    let removed = playlists::delete(pool, "A").await.expect("Failed to delete");

    // y was only used by A; x is still used by B
    assert_eq!(removed, strings(&["uri:y"]));
    assert!(playlists::get_by_name(pool, "A").await.unwrap().is_none());
    assert!(tracks::exists(pool, "uri:x").await.unwrap());
    assert!(!tracks::exists(pool, "uri:y").await.unwrap());

    // B's membership is untouched
    assert_eq!(playlists::tracks_of(pool, "B").await.unwrap(), strings(&["uri:x"]));
}

#[tokio::test]
async fn test_delete_cascades_membership_rows() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain", "uri:thunder"]).await;
    playlists::delete(pool, "Rain").await.unwrap();

    assert_eq!(membership_count(pool, "Rain").await, 0);
    assert_eq!(track_count(pool).await, 0);
}

#[tokio::test]
async fn test_delete_missing_playlist_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let result = playlists::delete(pool, "Nope").await;
    assert!(result.is_err(), "deleting a missing playlist should fail");
}

#[tokio::test]
async fn test_set_contents_replaces_order_and_shuffle() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:a", "uri:b", "uri:c"]).await;
    create_test_playlist(pool, "Other", &["uri:z"]).await;

    // Same length, new order
    let removed = playlists::set_shuffle_and_contents(
        pool,
        "Rain",
        true,
        &strings(&["uri:c", "uri:a", "uri:b"]),
        None,
    )
    .await
    .expect("Failed to replace contents");

    assert!(removed.is_empty());

    let playlist = playlists::get_by_name(pool, "Rain").await.unwrap().unwrap();
    assert!(playlist.shuffle);
    assert_eq!(
        playlists::tracks_of(pool, "Rain").await.unwrap(),
        strings(&["uri:c", "uri:a", "uri:b"])
    );

    // Unrelated playlist untouched
    assert_eq!(playlists::tracks_of(pool, "Other").await.unwrap(), strings(&["uri:z"]));
}

#[tokio::test]
async fn test_set_contents_drops_orphans_and_keeps_shared() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:a", "uri:b"]).await;
    create_test_playlist(pool, "Storm", &["uri:b"]).await;

    // Drop both original members, add a new one
    let removed =
        playlists::set_shuffle_and_contents(pool, "Rain", false, &strings(&["uri:new"]), None)
            .await
            .unwrap();

    // a was exclusive to Rain; b survives in Storm
    assert_eq!(removed, strings(&["uri:a"]));
    assert!(!tracks::exists(pool, "uri:a").await.unwrap());
    assert!(tracks::exists(pool, "uri:b").await.unwrap());
    assert!(tracks::exists(pool, "uri:new").await.unwrap());
}

#[tokio::test]
async fn test_set_contents_accepts_precomputed_removable_list() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:a", "uri:b"]).await;

    // Caller already ran the unique-usage query
    let removable = tracks::exclusive_to_playlist(pool, "Rain").await.unwrap();
    assert_eq!(removable, strings(&["uri:a", "uri:b"]));

    let removed = playlists::set_shuffle_and_contents(
        pool,
        "Rain",
        false,
        &strings(&["uri:b"]),
        Some(&removable),
    )
    .await
    .unwrap();

    // b stays a member, only a is actually dropped
    assert_eq!(removed, strings(&["uri:a"]));
    assert_eq!(playlists::tracks_of(pool, "Rain").await.unwrap(), strings(&["uri:b"]));
}

#[tokio::test]
async fn test_rename_cascades_to_membership() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain", "uri:thunder"]).await;

    playlists::rename(pool, "Rain", "Monsoon").await.expect("Failed to rename");

    assert!(playlists::get_by_name(pool, "Rain").await.unwrap().is_none());
    assert_eq!(
        playlists::tracks_of(pool, "Monsoon").await.unwrap(),
        strings(&["uri:rain", "uri:thunder"])
    );
}

#[tokio::test]
async fn test_toggle_active_flips_back_and_forth() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain"]).await;

    playlists::toggle_active(pool, "Rain").await.unwrap();
    assert!(playlists::get_by_name(pool, "Rain").await.unwrap().unwrap().is_active);

    playlists::toggle_active(pool, "Rain").await.unwrap();
    assert!(!playlists::get_by_name(pool, "Rain").await.unwrap().unwrap().is_active);
}

#[tokio::test]
async fn test_set_volume_clamps_to_unit_range() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain"]).await;

    playlists::set_volume(pool, "Rain", 0.35).await.unwrap();
    let playlist = playlists::get_by_name(pool, "Rain").await.unwrap().unwrap();
    assert!((playlist.volume - 0.35).abs() < f64::EPSILON);

    playlists::set_volume(pool, "Rain", 2.5).await.unwrap();
    let playlist = playlists::get_by_name(pool, "Rain").await.unwrap().unwrap();
    assert!((playlist.volume - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_listing_sorts_and_filters() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "rainforest", &["uri:1", "uri:2"]).await;
    create_test_playlist(pool, "Beach", &["uri:3"]).await;
    create_test_playlist(pool, "Attic Rain", &["uri:4"]).await;
    playlists::toggle_active(pool, "Beach").await.unwrap();

    // Case-insensitive name ascending
    let by_name = playlists::list(pool, &ListQuery::new("", PlaylistSort::NameAsc))
        .await
        .unwrap();
    let names: Vec<&str> = by_name.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Attic Rain", "Beach", "rainforest"]);

    // Descending
    let by_name_desc = playlists::list(pool, &ListQuery::new("", PlaylistSort::NameDesc))
        .await
        .unwrap();
    let names: Vec<&str> = by_name_desc.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["rainforest", "Beach", "Attic Rain"]);

    // Active first, then name
    let active_first = playlists::list(pool, &ListQuery::new("", PlaylistSort::ActiveFirstNameAsc))
        .await
        .unwrap();
    let names: Vec<&str> = active_first.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Beach", "Attic Rain", "rainforest"]);

    // Case-insensitive free-text filter
    let filtered = playlists::list(pool, &ListQuery::new("RAIN", PlaylistSort::NameAsc))
        .await
        .unwrap();
    let names: Vec<&str> = filtered.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Attic Rain", "rainforest"]);

    // Single-track flag comes from join + count
    let by_name = playlists::list(pool, &ListQuery::new("", PlaylistSort::NameAsc))
        .await
        .unwrap();
    for summary in &by_name {
        assert_eq!(summary.is_single_track, summary.name != "rainforest");
    }
}

#[tokio::test]
async fn test_listing_filter_treats_wildcards_as_literals() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain 100%", &["uri:1"]).await;
    create_test_playlist(pool, "Rainfall", &["uri:2"]).await;
    create_test_playlist(pool, "a_b", &["uri:3"]).await;
    create_test_playlist(pool, "acb", &["uri:4"]).await;

    // "%" matches only the name that literally contains it
    let filtered = playlists::list(pool, &ListQuery::new("100%", PlaylistSort::NameAsc))
        .await
        .unwrap();
    let names: Vec<&str> = filtered.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Rain 100%"]);

    // "_" is not a single-character wildcard
    let filtered = playlists::list(pool, &ListQuery::new("a_b", PlaylistSort::NameAsc))
        .await
        .unwrap();
    let names: Vec<&str> = filtered.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a_b"]);
}

#[tokio::test]
async fn test_any_active_and_active_with_tracks() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain", "uri:thunder"]).await;
    create_test_playlist(pool, "Beach", &["uri:waves"]).await;

    assert!(!playlists::any_active(pool).await.unwrap());
    assert!(playlists::active_with_tracks(pool).await.unwrap().is_empty());

    playlists::toggle_active(pool, "Rain").await.unwrap();
    playlists::set_volume(pool, "Rain", 0.5).await.unwrap();

    assert!(playlists::any_active(pool).await.unwrap());

    let active = playlists::active_with_tracks(pool).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Rain");
    assert!((active[0].volume - 0.5).abs() < f64::EPSILON);
    assert_eq!(active[0].tracks, strings(&["uri:rain", "uri:thunder"]));
}

#[tokio::test]
async fn test_active_with_tracks_keeps_case_differing_names_apart() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    // Names differing only by case are distinct playlists and sort as equal
    // keys under NOCASE, so each must still come out as one whole group
    create_test_playlist(pool, "Rain", &["uri:a", "uri:b"]).await;
    create_test_playlist(pool, "rain", &["uri:c"]).await;
    playlists::toggle_active(pool, "Rain").await.unwrap();
    playlists::toggle_active(pool, "rain").await.unwrap();

    let active = playlists::active_with_tracks(pool).await.unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].name, "Rain");
    assert_eq!(active[0].tracks, strings(&["uri:a", "uri:b"]));
    assert_eq!(active[1].name, "rain");
    assert_eq!(active[1].tracks, strings(&["uri:c"]));
}

#[tokio::test]
async fn test_exists_and_names_for_validators() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_playlist(pool, "Rain", &["uri:rain"]).await;
    create_test_playlist(pool, "beach", &["uri:waves"]).await;

    assert!(playlists::exists(pool, "Rain").await.unwrap());
    assert!(!playlists::exists(pool, "rain").await.unwrap(), "uniqueness is exact");

    let names = playlists::names(pool).await.unwrap();
    assert_eq!(names, strings(&["beach", "Rain"]));
}
