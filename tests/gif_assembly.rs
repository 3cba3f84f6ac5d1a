//! Integration tests for building one GIF from a directory of JPEG frames.
//! Fixtures are real JPEGs written with the `image` crate; results are read
//! back with the `gif` decoder.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use jpeg2gif::{Dimensions, EngineConfig, GifEngine, GifOptions};

struct DecodedFrame {
    width: u16,
    height: u16,
    delay: u16,
    palette_len: usize,
    max_index: u8,
}

struct DecodedGif {
    width: u16,
    height: u16,
    frames: Vec<DecodedFrame>,
}

fn engine(options: GifOptions) -> GifEngine {
    GifEngine::new(EngineConfig {
        options,
        json_progress: true,
        ..Default::default()
    })
}

/// Write a colorful JPEG so quantization has real work to do
fn write_jpeg(path: &Path, width: u32, height: u32, seed: u8) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 7 + u32::from(seed)) as u8,
            (y * 5) as u8,
            ((x + y) * 3) as u8,
        ])
    });
    img.save(path).expect("write jpeg fixture");
}

fn decode_gif(path: &Path) -> DecodedGif {
    let file = fs::File::open(path).expect("open gif");
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(file).expect("read gif header");

    let (width, height) = (decoder.width(), decoder.height());
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().expect("read frame") {
        frames.push(DecodedFrame {
            width: frame.width,
            height: frame.height,
            delay: frame.delay,
            palette_len: frame.palette.as_ref().map_or(0, |p| p.len() / 3),
            max_index: frame.buffer.iter().copied().max().unwrap_or(0),
        });
    }

    DecodedGif {
        width,
        height,
        frames,
    }
}

#[test]
fn n_jpegs_make_n_frames_with_uniform_delay() {
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=5 {
        write_jpeg(&dir.path().join(format!("frame{}.jpg", i)), 24, 16, i * 40);
    }
    let output = dir.path().join("anim.gif");

    let options = GifOptions {
        duration_ms: 120,
        colors: 16,
        ..Default::default()
    };
    let outcome = engine(options).create_gif(dir.path(), &output).unwrap();
    assert_eq!(outcome.frame_count, 5);

    let gif = decode_gif(&output);
    assert_eq!(gif.frames.len(), 5);
    assert_eq!((gif.width, gif.height), (24, 16));
    for frame in &gif.frames {
        assert_eq!(frame.delay, 12);
        assert!(frame.palette_len <= 16, "palette has {} colors", frame.palette_len);
        assert!(frame.max_index < 16);
    }
}

#[test]
fn resize_sets_every_frame_to_requested_size() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("a1.jpg"), 40, 30, 0);
    write_jpeg(&dir.path().join("a2.JPEG"), 25, 60, 90);
    let output = dir.path().join("resized.gif");

    let options = GifOptions {
        resize: Some(Dimensions {
            width: 20,
            height: 10,
        }),
        ..Default::default()
    };
    engine(options).create_gif(dir.path(), &output).unwrap();

    let gif = decode_gif(&output);
    assert_eq!((gif.width, gif.height), (20, 10));
    assert_eq!(gif.frames.len(), 2);
    for frame in &gif.frames {
        assert_eq!((frame.width, frame.height), (20, 10));
    }
}

#[test]
fn empty_directory_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), "no frames here").unwrap();
    let output = dir.path().join("empty.gif");

    let err = engine(GifOptions::default())
        .create_gif(dir.path(), &output)
        .expect_err("empty directory must fail");

    assert!(err.to_string().contains("No JPEG images found"));
    assert!(!output.exists());
}

#[test]
fn undecodable_frames_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("f1.jpg"), b"definitely not a jpeg").unwrap();
    fs::write(dir.path().join("f2.jpeg"), b"").unwrap();
    let output = dir.path().join("broken.gif");

    let err = engine(GifOptions::default())
        .create_gif(dir.path(), &output)
        .expect_err("all frames broken must fail");

    assert!(err.to_string().contains("No frames to process"));
    assert!(!output.exists());
}

#[test]
fn frames_follow_natural_order() {
    let dir = tempfile::tempdir().unwrap();
    // Each frame has its own width so the order is observable
    write_jpeg(&dir.path().join("img10.jpg"), 30, 8, 0);
    write_jpeg(&dir.path().join("img2.jpg"), 20, 8, 0);
    write_jpeg(&dir.path().join("img1.jpg"), 10, 8, 0);
    let output = dir.path().join("ordered.gif");

    engine(GifOptions::default())
        .create_gif(dir.path(), &output)
        .unwrap();

    let widths: Vec<u16> = decode_gif(&output).frames.iter().map(|f| f.width).collect();
    assert_eq!(widths, vec![10, 20, 30]);
}

#[test]
fn loop_count_is_written() {
    let dir = tempfile::tempdir().unwrap();
    write_jpeg(&dir.path().join("f1.jpg"), 8, 8, 0);
    let output = dir.path().join("loop.gif");

    let options = GifOptions {
        loop_count: 3,
        ..Default::default()
    };
    engine(options).create_gif(dir.path(), &output).unwrap();

    // NETSCAPE2.0 application extension: sub-block 0x03 0x01 <count lo> <count hi>
    let bytes = fs::read(&output).unwrap();
    let marker = b"NETSCAPE2.0";
    let pos = bytes
        .windows(marker.len())
        .position(|w| w == marker)
        .expect("loop extension present");
    assert_eq!(&bytes[pos + marker.len()..pos + marker.len() + 4], &[3u8, 1, 3, 0]);
}
