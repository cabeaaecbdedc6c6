//! Hero carousel demo binary
//!
//! Mounts one carousel, prints what the host would draw across a full
//! rotation, simulates clicks and unmounts.
//!
//! Timings come from the environment; `HERO_ROTATION_PERIOD_MS=1000` makes
//! the demo finish quickly. Set `HERO_EVENTS_FILE` to a catalog JSON file to
//! use real data instead of the built-in sample.

use anyhow::Context;
use marquee_core::{Navigator, SystemClock};
use marquee_hero::{
    CatalogEventSource, ClickTarget, EventId, EventRecord, EventSource, HeroCarousel, HeroConfig,
    HeroEnvironment, RenderDirective, StaticEventSource,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Navigator that only logs
struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "Navigate");
        println!("    -> navigate({path})");
    }
}

fn sample_events() -> Vec<EventRecord> {
    vec![
        EventRecord::new(
            EventId::new(101),
            "Summer Music Festival",
            "Paid Entry",
            "https://example.com/media/summer-festival.webp",
        )
        .with_registration_required(true),
        EventRecord::new(
            EventId::new(102),
            "City Derby",
            "Free",
            "https://example.com/media/city-derby.webp",
        )
        .with_live(true)
        .with_sports(true),
        EventRecord::new(
            EventId::new(103),
            "Community Cleanup",
            "Free",
            "https://example.com/media/cleanup.webp",
        ),
        EventRecord::new(
            EventId::new(104),
            "Late Addition",
            "Free",
            "https://example.com/media/late.webp",
        ),
    ]
}

async fn event_source(config: &HeroConfig) -> anyhow::Result<Arc<dyn EventSource>> {
    match &config.events_file {
        Some(path) => {
            let source = CatalogEventSource::from_file(path, Arc::new(SystemClock))
                .await
                .with_context(|| format!("loading catalog {}", path.display()))?;
            Ok(Arc::new(source))
        },
        None => Ok(Arc::new(StaticEventSource::new(sample_events()))),
    }
}

fn print_directive(label: &str, directive: &RenderDirective) {
    println!("[{label}] image: {}", directive.image_url);
    if let Some(overlay) = &directive.overlay {
        println!("    overlay: {} -> {}", overlay.image_asset, overlay.action_route);
    }
    if let Some(badge) = &directive.secondary_badge {
        println!("    badge:   {} -> {}", badge.image_asset, badge.action_route);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_hero=debug,marquee_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Hero Carousel Demo ===\n");

    let config = HeroConfig::try_from_env().context("reading HERO_* environment")?;
    println!(
        "default phase: {:?}, rotation period: {:?}\n",
        config.default_phase(),
        config.rotation_period()
    );

    let source = event_source(&config).await?;
    let carousel = HeroCarousel::new(HeroEnvironment::new(
        source,
        Arc::new(LoggingNavigator),
        config.clone(),
    ));

    carousel.mount().await?;
    print_directive("mounted", &carousel.render().await);

    println!("\n>>> Click on base image during default phase");
    carousel.click(ClickTarget::BaseImage).await?;

    // Sample each slot halfway through its period
    tokio::time::sleep(config.default_phase() + config.rotation_period() / 2).await;
    let slots = carousel.snapshot().await.queue.len();

    for step in 0..=slots {
        let rotation = carousel.rotation().await;
        print_directive(&format!("slot {}", rotation.current_index), &carousel.render().await);

        if step == 0 {
            println!("\n>>> Click on overlay, badge and base image");
            carousel.click(ClickTarget::Overlay).await?;
            carousel.click(ClickTarget::SeeAllBadge).await?;
            carousel.click(ClickTarget::BaseImage).await?;
            println!();
        }

        tokio::time::sleep(config.rotation_period()).await;
    }

    carousel.unmount().await;
    println!("\nUnmounted; active tasks: {}", carousel.active_tasks());
    println!("\n=== Demo Complete ===");
    Ok(())
}
