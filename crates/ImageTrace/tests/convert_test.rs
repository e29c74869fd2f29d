use image::{Rgb, RgbImage};
use image_trace::{ExactSize, Quality, TraceOptions, convert_file, trace};
use stroke_canvas::{Color, CommandBatch, Vec2};

const WHITE: [u8; 3] = [255, 255, 255];
const RED: [u8; 3] = [220, 30, 30];

/// A white 40x30 image with a 10x10 red block whose top-left pixel is (10, 5).
fn red_block() -> RgbImage {
    RgbImage::from_fn(40, 30, |x, y| {
        if (10..20).contains(&x) && (5..15).contains(&y) {
            Rgb(RED)
        } else {
            Rgb(WHITE)
        }
    })
}

fn on_four_decimals(v: f32) -> bool {
    let scaled = v as f64 * 10_000.0;
    (scaled - scaled.round()).abs() < 1e-3
}

#[test]
fn test_block_becomes_two_closed_rectangles() {
    let commands = trace(&red_block(), &TraceOptions::default());

    let red: Vec<_> = commands.iter().filter(|c| c.color == Color::Hex(RED)).collect();
    let white: Vec<_> = commands.iter().filter(|c| c.color == Color::Hex(WHITE)).collect();
    assert_eq!(red.len(), 4);
    assert_eq!(white.len(), 4);
    assert_eq!(commands.len(), 8);

    // Corners of the red block on the 800x630 surface.
    let corners = [
        Vec2::new(0.0125, 0.0079),
        Vec2::new(0.02375, 0.0079),
        Vec2::new(0.02375, 0.0222),
        Vec2::new(0.0125, 0.0222),
    ];
    for cmd in &red {
        assert!(corners.iter().any(|c| (cmd.start - *c).length() < 1e-4), "{:?}", cmd.start);
        assert_eq!(cmd.thickness, 2.0);
        assert!(!cmd.erase);
    }
    // The outline closes on itself.
    assert_eq!(red[3].end, red[0].start);

    for cmd in &commands {
        for v in [cmd.start.x, cmd.start.y, cmd.end.x, cmd.end.y] {
            assert!(on_four_decimals(v), "{v}");
        }
    }
}

#[test]
fn test_palette_limit_caps_colours() {
    let gradient = RgbImage::from_fn(24, 24, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 128]));

    for max_colors in [1, 3, 16] {
        let options = TraceOptions {
            max_colors,
            quality: Quality::Low,
            ..TraceOptions::default()
        };
        let mut distinct: Vec<String> = trace(&gradient, &options)
            .iter()
            .map(|c| c.color.to_string())
            .collect();
        distinct.sort();
        distinct.dedup();
        assert!(!distinct.is_empty());
        assert!(distinct.len() <= max_colors, "{} > {max_colors}", distinct.len());
    }
}

#[test]
fn test_file_conversion_round_trips_with_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("block.png");
    red_block().save(&input).unwrap();

    let options = TraceOptions {
        thickness: 5,
        exact_size: Some(ExactSize {
            width: 80.0,
            height: 60.0,
        }),
        ..TraceOptions::default()
    };
    let batch = convert_file(&input, &options).unwrap();

    assert_eq!(batch.metadata.source.as_deref(), Some("block.png"));
    assert_eq!(batch.metadata.total_commands, batch.len());
    assert_eq!(batch.metadata.estimated_draw_time, "0s");
    assert!(batch.commands.iter().all(|c| c.thickness == 5.0));
    // Doubling the size doubles the coordinates of the top-left red corner.
    assert!(
        batch
            .commands
            .iter()
            .any(|c| (c.start - Vec2::new(0.025, 0.0159)).length() < 1e-4)
    );

    let output = dir.path().join("commands.json");
    batch.write_to(&output).unwrap();
    let raw = std::fs::read_to_string(&output).unwrap();
    assert!(raw.contains(r#""original_image":"block.png""#));
    assert!(raw.contains(r#""canvas_width":800"#));

    let restored = CommandBatch::read_from(&output).unwrap();
    assert_eq!(restored.len(), batch.len());
    for (a, b) in restored.commands.iter().zip(&batch.commands) {
        assert!((a.start - b.start).length() < 1e-6);
        assert!((a.end - b.end).length() < 1e-6);
        assert_eq!(a.color, b.color);
    }
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(convert_file(dir.path().join("missing.png"), &TraceOptions::default()).is_err());
}
