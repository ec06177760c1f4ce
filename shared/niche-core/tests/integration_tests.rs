use chrono::{TimeZone, Utc};
use niche_core::{Channel, Item, ItemMetrics, Niche, RawChannel, RawItem, ScoredItem};

#[test]
fn test_raw_item_from_provider_json() {
    let json = r#"{
        "video_id": "v1",
        "title": "Mind blowing space facts",
        "description": "Did you know?",
        "channel_id": "c1",
        "published_at": "2024-05-30T08:00:00Z",
        "duration": "PT42S",
        "view_count": "250000",
        "like_count": 12000,
        "comment_count": "300",
        "thumbnail_url": "https://img.example/v1.jpg",
        "has_face": false,
        "face_confidence": 0.1
    }"#;

    let raw: RawItem = serde_json::from_str(json).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let item = Item::from_raw(&raw, now).unwrap();

    assert_eq!(item.id, "v1");
    assert_eq!(item.duration_seconds, 42);
    assert_eq!(item.view_count, Some(250_000));
    assert_eq!(item.like_count, Some(12_000));
    assert_eq!(item.comment_count, Some(300));
    assert!(item.has_complete_stats());
    assert_eq!(item.text(), "Mind blowing space facts Did you know?");
}

#[test]
fn test_raw_item_accepts_id_alias() {
    let raw: RawItem = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
    assert_eq!(raw.video_id.as_deref(), Some("abc"));
}

#[test]
fn test_raw_channel_from_provider_json() {
    let json = r#"{
        "channel_id": "c1",
        "title": "Facts Daily",
        "subscriber_count": "5000",
        "video_count": "12",
        "view_count": "900000",
        "created_at": "2024-05-01T00:00:00Z"
    }"#;

    let raw: RawChannel = serde_json::from_str(json).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let channel = Channel::from_raw(&raw, now).unwrap();

    assert_eq!(channel.id, "c1");
    assert_eq!(channel.video_count, 12);
    assert_eq!(channel.avg_views_per_video(), Some(75_000.0));
}

#[test]
fn test_scored_item_serializes_flat() {
    let item = Item::new("v1", "title").with_stats(10, 1, 0);
    let scored = ScoredItem::new(item, ItemMetrics::default());

    let value = serde_json::to_value(&scored).unwrap();
    assert_eq!(value["id"], "v1");
    assert_eq!(value["viral_score"], 0.0);
    assert_eq!(value["days_since_published"], 1);
}

#[test]
fn test_niche_item_ids_keep_order() {
    let items = vec![
        ScoredItem::new(Item::new("a", "first"), ItemMetrics::default()),
        ScoredItem::new(Item::new("b", "second"), ItemMetrics::default()),
    ];
    let niche = Niche::with_items("general", items);

    assert_eq!(niche.len(), 2);
    assert_eq!(niche.item_ids(), vec!["a", "b"]);
}
