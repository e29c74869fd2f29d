mod common;

use common::{RecordingNotifier, RecordingTimer, seeded_config, session_with};
use glam::Vec2;
use inkburst_core::effects::glass::{self, FILL_THICKNESS};
use inkburst_core::font::{FALLBACK_WIDTH, STANDARD};
use inkburst_core::pipeline::{CancelToken, Collaborators, DrawContext};
use inkburst_core::{
    AlwaysOpen, DrawConfig, DrawSession, Effect, InstantTimer, PixelText, RecordingSink,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use stroke_canvas::{Color, Surface};

fn collaborators(sink: Arc<RecordingSink>) -> Collaborators {
    Collaborators {
        sink,
        gate: Arc::new(AlwaysOpen),
        notifier: Arc::new(RecordingNotifier::default()),
        timer: Arc::new(InstantTimer),
    }
}

#[tokio::test]
async fn test_text_effect_matches_rasterizer() {
    let text = PixelText::new("GO 4 IT!", Vec2::new(0.2, 0.4), 0.012, Color::hsl(200.0, 90.0, 50.0))
        .with_delay(0);
    let expected = STANDARD.rasterize(&text, &Surface::default());
    assert_eq!(expected, STANDARD.rasterize(&text, &Surface::default()));

    let sink = Arc::new(RecordingSink::new());
    let session = session_with(sink.clone(), Arc::new(RecordingNotifier::default()));
    session.run(&Effect::Text(text)).await.unwrap();

    assert_eq!(sink.commands(), expected.commands);
}

#[tokio::test]
async fn test_text_paces_with_configured_delay() {
    let sink = Arc::new(RecordingSink::new());
    let timer = Arc::new(RecordingTimer::default());
    let session = DrawSession::builder()
        .with_sink(sink.clone())
        .with_notifier(Arc::new(RecordingNotifier::default()))
        .with_timer(timer.clone())
        .with_config(DrawConfig {
            draw_delay_ms: 37,
            ..DrawConfig::default()
        })
        .build();
    let text = PixelText::new("HI", Vec2::new(0.1, 0.1), 0.01, Color::BLACK);

    session.run(&Effect::Text(text.clone())).await.unwrap();

    let waits = timer.waits();
    assert_eq!(waits.len(), sink.len());
    assert!(waits.iter().all(|&ms| ms == 37), "{waits:?}");

    // An explicit delay wins over the configured one.
    session.run(&Effect::Text(text.with_delay(4))).await.unwrap();
    let waits = timer.waits();
    assert_eq!(waits.last(), Some(&4));
    assert_eq!(waits.iter().filter(|&&ms| ms == 4).count(), sink.len() / 2);
}

#[test]
fn test_unsupported_characters_only_advance() {
    let size = 0.02;
    let text = PixelText::new("#", Vec2::ZERO, size, Color::BLACK).with_spacing(0.5);
    let raster = STANDARD.rasterize(&text, &Surface::default());

    assert!(raster.commands.is_empty());
    assert!((raster.end_x - (FALLBACK_WIDTH + 0.5) * size).abs() < 1e-6);
}

#[tokio::test]
async fn test_stained_glass_lightness_follows_phase() {
    let sink = Arc::new(RecordingSink::new());
    let collaborators = collaborators(sink.clone());
    let token = CancelToken::new();
    let mut ctx = DrawContext::new(
        &collaborators,
        &token,
        &seeded_config(3),
        StdRng::seed_from_u64(3),
    );
    let cells = glass::build_cells(&mut StdRng::seed_from_u64(21), 5, 4);
    let frames = 6;

    glass::animate(&mut ctx, &cells, frames).await.unwrap();

    let commands = sink.commands();
    let per_frame: usize = cells.iter().map(|c| c.triangles().count() * 2).sum();
    assert_eq!(commands.len(), per_frame * frames as usize);

    let mut emitted = commands.iter();
    for frame in 0..frames {
        for cell in &cells {
            for _ in 0..cell.triangles().count() * 2 {
                let cmd = emitted.next().unwrap();
                assert_eq!(cmd.thickness, FILL_THICKNESS);
                assert_eq!(cmd.color.hue(), Some(cell.hue.rem_euclid(360.0)));
                let expected = 40.0 + 20.0 * (cell.phase + frame as f32 * cell.speed).sin();
                let lightness = cmd.color.lightness().unwrap();
                assert!((lightness - expected).abs() < 1e-4);
            }
        }
    }
}

#[tokio::test]
async fn test_star_nova_draws_three_levels() {
    let sink = Arc::new(RecordingSink::new());
    let session = session_with(sink.clone(), Arc::new(RecordingNotifier::default()));

    let report = session.run(&Effect::RecursiveStarNova).await.unwrap();

    let n = report.stats.commands_sent;
    assert!(n == 5 * (1 + 5 + 25) || n == 7 * (1 + 7 + 49), "{n}");
    assert_eq!(sink.len(), n);
}

#[tokio::test]
async fn test_bloom_segments_stay_within_depth() {
    let sink = Arc::new(RecordingSink::new());
    let session = session_with(sink.clone(), Arc::new(RecordingNotifier::default()));

    session.run(&Effect::FractalBloomMandala).await.unwrap();

    let commands = sink.commands();
    assert!(!commands.is_empty());
    // A depth-4 child of two middle branches is the shortest segment possible.
    let shortest = 0.15 * 0.65f32.powi(3) * 0.8f32.powi(2);
    for cmd in &commands {
        assert!(cmd.thickness >= 1.0);
        assert!(cmd.length() >= shortest - 1e-4);
        assert!(cmd.length() <= 0.15 + 1e-4);
    }
}
