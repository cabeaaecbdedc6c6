//! Integration tests for the hero carousel
//!
//! End-to-end flow: catalog source, production store on tokio's paused clock,
//! render directives and click navigation.

#![allow(clippy::unwrap_used)] // Test code

use marquee_hero::{
    AssetSlot, CatalogEventSource, ClickTarget, EventId, EventRecord, HeroCarousel, HeroConfig,
    HeroEnvironment, OverlayKind, Phase, Route, RotationState, StaticEventSource, resolve_overlay,
    route_click,
};
use marquee_testing::{RecordingNavigator, test_clock};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

const CATALOG: &str = r#"[
    { "id": 7, "title": "Opening Night", "admissionType": "Ticketed",
      "startDate": "2025-01-15", "isActive": true,
      "media": [ { "id": 70, "fileUrl": "https://cdn/7.webp", "isHomePageHeroImage": true, "startDisplayingFromDate": "2024-11-01" } ] },
    { "id": 8, "title": "Charity Run", "isRegistrationRequired": true, "isSportsEvent": true,
      "startDate": "2025-02-01", "isActive": true,
      "media": [ { "id": 80, "fileUrl": "https://cdn/8.webp", "isHomePageHeroImage": true } ] },
    { "id": 6, "title": "Cancelled", "startDate": "2025-01-10", "isActive": false,
      "media": [ { "id": 60, "fileUrl": "https://cdn/6.webp", "isHomePageHeroImage": true } ] },
    { "id": 9, "title": "Next Year", "startDate": "2025-01-20", "isActive": true, "media": [
      { "id": 90, "fileUrl": "https://cdn/9.webp", "isHomePageHeroImage": true, "startDisplayingFromDate": "2026-01-01" } ] }
]"#;

fn catalog_carousel(navigator: &RecordingNavigator) -> HeroCarousel {
    let source = CatalogEventSource::from_json(CATALOG, Arc::new(test_clock())).unwrap();
    HeroCarousel::new(HeroEnvironment::new(
        Arc::new(source),
        Arc::new(navigator.clone()),
        HeroConfig::default(),
    ))
}

fn flags(admission: &str, registration: bool, live: bool, sports: bool) -> EventRecord {
    EventRecord::new(EventId::new(1), "Case", admission, "https://cdn/1.webp")
        .with_registration_required(registration)
        .with_live(live)
        .with_sports(sports)
}

// ============================================================================
// Overlay priority
// ============================================================================

#[test]
fn test_overlay_priority_cases() {
    let kind = |event: &EventRecord| resolve_overlay(Some(event)).map(|o| o.kind);

    assert_eq!(kind(&flags("Paid Entry", true, false, false)), Some(OverlayKind::Tickets));
    assert_eq!(kind(&flags("Free", false, true, true)), Some(OverlayKind::Live));
    assert_eq!(kind(&flags("Free", false, false, false)), None);
    assert_eq!(resolve_overlay(None), None);
}

// ============================================================================
// Click routing
// ============================================================================

#[test]
fn test_default_phase_base_click_ignores_queue_position() {
    for index in 0..5 {
        let state = RotationState {
            phase: Phase::Default,
            current_index: index,
            current_event: (index % 2 == 0).then(|| flags("Paid", false, false, false)),
        };
        assert_eq!(
            route_click(&state, ClickTarget::BaseImage).route,
            Route::EventsListing
        );
    }
}

// ============================================================================
// Full flow on the production store
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_full_rotation_over_catalog() {
    let navigator = RecordingNavigator::new();
    let carousel = catalog_carousel(&navigator);
    assert_ok!(carousel.mount().await);

    // Default phase
    tokio::time::sleep(Duration::from_millis(1000)).await;
    let directive = carousel.render().await;
    assert_eq!(directive.image_url, carousel.config().default_image);
    assert!(directive.overlay.is_none());
    assert_eq!(carousel.snapshot().await.queue.len(), 3); // 7, 8, fallback

    // Slot 0: ticketed event, tickets overlay and badge
    tokio::time::sleep(Duration::from_millis(1010)).await;
    let directive = carousel.render().await;
    assert_eq!(directive.image_url, "https://cdn/7.webp");
    assert_eq!(
        directive.overlay.as_ref().map(|o| o.action_route),
        Some(Route::EventDetail(EventId::new(7)))
    );
    assert!(directive.secondary_badge.is_some());

    // Slot 1: registration outranks sports
    tokio::time::sleep(Duration::from_millis(15_000)).await;
    let directive = carousel.render().await;
    assert_eq!(directive.image_url, "https://cdn/8.webp");
    assert_eq!(
        directive.overlay.as_ref().map(|o| o.image_asset.as_str()),
        Some(OverlayKind::Registration.image_asset())
    );

    // Broken overlay image: tickets image, same route
    assert_ok!(carousel.asset_failed(AssetSlot::Overlay).await);
    let overlay = carousel.render().await.overlay.unwrap();
    assert_eq!(overlay.image_asset, OverlayKind::Tickets.image_asset());
    assert_eq!(overlay.action_route, Route::EventDetail(EventId::new(8)));

    // Slot 2: fallback, bare
    tokio::time::sleep(Duration::from_millis(15_000)).await;
    let directive = carousel.render().await;
    assert_eq!(directive.image_url, carousel.config().fallback_media_url);
    assert!(directive.overlay.is_none());
    assert!(directive.secondary_badge.is_none());
    assert_ok!(carousel.click(ClickTarget::BaseImage).await);

    // Wraps back to slot 0
    tokio::time::sleep(Duration::from_millis(15_000)).await;
    assert_eq!(carousel.rotation().await.current_index, 0);
    assert_ok!(carousel.click(ClickTarget::BaseImage).await);

    carousel.unmount().await;
    assert_eq!(
        navigator.navigations(),
        vec!["/events".to_string(), "/events/7".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_no_callbacks_after_unmount() {
    let navigator = RecordingNavigator::new();
    let carousel = catalog_carousel(&navigator);
    let mut actions = carousel.subscribe_actions();
    assert_ok!(carousel.mount().await);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    carousel.unmount().await;
    let frozen = carousel.rotation().await;

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(carousel.rotation().await, frozen);
    assert_eq!(carousel.active_tasks(), 0);
    assert_err!(carousel.click(ClickTarget::Overlay).await);
    assert_eq!(navigator.count(), 0);

    // Only the load result and the default phase timer ever fed back
    let mut fed_back = Vec::new();
    while let Ok(action) = actions.try_recv() {
        fed_back.push(action);
    }
    assert_eq!(fed_back.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_source_rotates_on_fallback_alone() {
    let navigator = RecordingNavigator::new();
    let carousel = HeroCarousel::new(HeroEnvironment::new(
        Arc::new(StaticEventSource::default()),
        Arc::new(navigator.clone()),
        HeroConfig::default().with_rotation_period(Duration::from_secs(1)),
    ));
    assert_ok!(carousel.mount().await);

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    let rotation = carousel.rotation().await;
    assert_eq!(rotation.phase, Phase::Rotating);
    assert_eq!(rotation.current_index, 0);
    assert_eq!(rotation.current_event, None);

    assert_ok!(carousel.click(ClickTarget::BaseImage).await);
    carousel.unmount().await;
    assert_eq!(navigator.last().as_deref(), Some("/events"));
}
