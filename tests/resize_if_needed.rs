//! End-to-end tests of the resize pipeline against real files.
//!
//! Source images are synthesized with the `image` crate into a temp
//! directory, run through `ImageResizer` with the pure-Rust backend, and the
//! written output is decoded again to check dimensions and format.

use downscale::config::{MetadataConfig, ResizerConfig};
use downscale::imaging::{ImageRequest, OutputFormat, ResampleFilter, RustBackend};
use downscale::metadata::{ExifCopier, MetadataCopier, MetadataFailure, NoopCopier};
use downscale::naming::NamingPolicy;
use downscale::resizer::{ImageResizer, ResizeError, ResizeOutcome};
use downscale::writer::WriteOptions;
use image::{ImageFormat, RgbImage, RgbaImage};
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

struct Fixture {
    _tmp: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        let output = tmp.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        Self {
            _tmp: tmp,
            input,
            output,
        }
    }

    fn jpeg(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.input.join(name);
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 90])
        })
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
        path
    }

    fn rgba_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.input.join(name);
        RgbaImage::from_fn(width, height, |x, _| image::Rgba([0, 128, 255, (x % 256) as u8]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    fn rgb_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.input.join(name);
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, 40, (y % 256) as u8])
        })
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
        path
    }

    fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.output)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn resizer(&self) -> ImageResizer<RustBackend, NoopCopier> {
        ImageResizer::new(RustBackend::new(), NoopCopier, &self.output)
    }
}

/// Attach an ImageDescription tag, whatever container the file really is.
fn describe(path: &Path, text: &str) {
    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::ImageDescription(text.to_string()));
    let mut bytes = std::fs::read(path).unwrap();
    let container = FileExtension::auto_detect(&mut Cursor::new(&bytes)).unwrap();
    metadata.write_to_vec(&mut bytes, container).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn description(path: &Path) -> Option<String> {
    let metadata = Metadata::new_from_path(path).ok()?;
    let tag = metadata
        .get_tag(&ExifTag::ImageDescription(String::new()))
        .next()?;
    match tag {
        ExifTag::ImageDescription(text) => Some(text.trim_end_matches('\0').to_string()),
        _ => None,
    }
}

#[derive(Default)]
struct RecordingCopier {
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    fail: bool,
}

impl MetadataCopier for RecordingCopier {
    fn copy_metadata(&self, source: &Path, dest: &Path) -> io::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), dest.to_path_buf()));
        if self.fail {
            return Err(io::Error::other("copy failed"));
        }
        Ok(())
    }
}

#[test]
fn no_bounds_returns_source_and_writes_nothing() {
    let fx = Fixture::new();
    let source = fx.jpeg("big.jpg", 300, 200);

    let path = fx.resizer().resize_if_needed(&source, None, None, 50).unwrap();

    assert_eq!(path, source);
    assert!(fx.output_files().is_empty());
}

#[test]
fn wide_jpeg_scaled_to_width_bound() {
    let fx = Fixture::new();
    let source = fx.jpeg("wide.jpg", 1000, 500);

    let outcome = fx
        .resizer()
        .run(&ImageRequest::new(&source, Some(500), None, 80))
        .unwrap();

    let ResizeOutcome::Scaled { path, plan, format, .. } = outcome else {
        panic!("expected a scaled outcome");
    };
    assert_eq!((plan.width, plan.height), (500, 250));
    assert_eq!(format, OutputFormat::Lossy);
    assert_eq!(path, fx.output.join("scaled_wide.jpg"));
    assert_eq!(fx.output_files(), vec!["scaled_wide.jpg"]);

    let written = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 250));

    // Source is left alone
    assert_eq!(image::image_dimensions(&source).unwrap(), (1000, 500));
}

#[test]
fn transparent_png_is_lossless_even_at_low_quality() {
    let fx = Fixture::new();
    let source = fx.rgba_png("logo.png", 400, 200);

    let path = fx
        .resizer()
        .resize_if_needed(&source, Some(100), Some(100), 1)
        .unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&written).unwrap();
    assert!(decoded.color().has_alpha());
    assert_eq!((decoded.width(), decoded.height()), (100, 50));
}

#[test]
fn transparent_source_keeps_its_extension() {
    let fx = Fixture::new();
    let source = fx.input.join("sticker.jpg");
    RgbaImage::from_pixel(50, 50, image::Rgba([1, 2, 3, 4]))
        .save_with_format(&source, ImageFormat::Png)
        .unwrap();

    let path = fx
        .resizer()
        .resize_if_needed(&source, Some(10), None, 90)
        .unwrap();

    assert_eq!(path, fx.output.join("scaled_sticker.jpg"));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
}

#[test]
fn bounds_equal_to_dimensions_are_a_no_op() {
    let fx = Fixture::new();
    let source = fx.jpeg("exact.jpg", 640, 480);

    let path = fx
        .resizer()
        .resize_if_needed(&source, Some(640), Some(480), 90)
        .unwrap();

    assert_eq!(path, source);
    assert!(fx.output_files().is_empty());
}

#[test]
fn repeated_calls_within_bounds_stay_no_ops() {
    let fx = Fixture::new();
    let source = fx.jpeg("small.jpg", 120, 80);
    let resizer = fx.resizer();

    for _ in 0..3 {
        let path = resizer
            .resize_if_needed(&source, Some(200), Some(200), 90)
            .unwrap();
        assert_eq!(path, source);
    }
    assert!(fx.output_files().is_empty());
}

#[test]
fn height_bound_binds_for_tall_image() {
    let fx = Fixture::new();
    let source = fx.jpeg("tall.jpg", 300, 900);

    let path = fx
        .resizer()
        .resize_if_needed(&source, Some(300), Some(300), 90)
        .unwrap();

    assert_eq!(image::image_dimensions(&path).unwrap(), (100, 300));
}

#[test]
fn invalid_source_is_decode_error() {
    let fx = Fixture::new();
    let source = fx.input.join("notes.jpg");
    std::fs::write(&source, b"shopping list").unwrap();

    let err = fx
        .resizer()
        .resize_if_needed(&source, Some(10), None, 90)
        .unwrap_err();

    assert!(matches!(err, ResizeError::Decode { .. }), "{err:?}");
    assert!(fx.output_files().is_empty());
}

#[test]
fn missing_source_is_decode_error() {
    let fx = Fixture::new();
    let err = fx
        .resizer()
        .resize_if_needed(fx.input.join("ghost.png"), Some(10), None, 90)
        .unwrap_err();

    assert!(matches!(err, ResizeError::Decode { .. }), "{err:?}");
}

#[test]
fn sliver_that_would_vanish_is_invalid_dimension() {
    let fx = Fixture::new();
    let source = fx.jpeg("sliver.jpg", 400, 1);

    let err = fx
        .resizer()
        .resize_if_needed(&source, Some(100), None, 90)
        .unwrap_err();

    assert!(matches!(err, ResizeError::InvalidDimension(_)), "{err:?}");
}

#[test]
fn metadata_copier_gets_source_and_destination() {
    let fx = Fixture::new();
    let source = fx.jpeg("cam.jpg", 200, 200);
    let copier = RecordingCopier::default();
    let resizer = ImageResizer::new(RustBackend::new(), &copier, &fx.output);

    let dest = resizer
        .resize_if_needed(&source, Some(50), None, 90)
        .unwrap();

    assert_eq!(dest, fx.output.join("scaled_cam.jpg"));
    assert_eq!(
        *copier.calls.lock().unwrap(),
        vec![(source.clone(), dest.clone())]
    );
}

#[test]
fn metadata_failure_aborts_unless_downgraded() {
    let fx = Fixture::new();
    let source = fx.jpeg("cam.jpg", 200, 200);
    let copier = RecordingCopier {
        fail: true,
        ..RecordingCopier::default()
    };

    let strict = ImageResizer::new(RustBackend::new(), &copier, &fx.output);
    let err = strict
        .resize_if_needed(&source, Some(50), None, 90)
        .unwrap_err();
    assert!(matches!(err, ResizeError::Io(_)), "{err:?}");
    // The scaled file is not rolled back
    assert_eq!(fx.output_files(), vec!["scaled_cam.jpg"]);

    let tolerant = ImageResizer::new(RustBackend::new(), &copier, &fx.output)
        .with_metadata_failure(MetadataFailure::Warn);
    let path = tolerant
        .resize_if_needed(&source, Some(50), None, 90)
        .unwrap();
    assert_eq!(path, fx.output.join("scaled_cam.jpg"));
    assert_eq!(copier.calls.lock().unwrap().len(), 2);
}

#[test]
fn content_hash_naming_keeps_same_basenames_apart() {
    let fx = Fixture::new();
    let a_dir = fx.input.join("a");
    let b_dir = fx.input.join("b");
    std::fs::create_dir_all(&a_dir).unwrap();
    std::fs::create_dir_all(&b_dir).unwrap();
    let a = a_dir.join("photo.jpg");
    let b = b_dir.join("photo.jpg");
    RgbImage::from_pixel(100, 100, image::Rgb([255, 0, 0]))
        .save_with_format(&a, ImageFormat::Jpeg)
        .unwrap();
    RgbImage::from_pixel(100, 100, image::Rgb([0, 0, 255]))
        .save_with_format(&b, ImageFormat::Jpeg)
        .unwrap();

    let resizer = fx.resizer().with_write_options(WriteOptions {
        naming: NamingPolicy::ContentHash,
        atomic: true,
    });
    let out_a = resizer.resize_if_needed(&a, Some(10), None, 90).unwrap();
    let out_b = resizer.resize_if_needed(&b, Some(10), None, 90).unwrap();

    assert_ne!(out_a, out_b);
    assert_eq!(fx.output_files().len(), 2);
}

#[test]
fn overwrite_naming_lets_last_writer_win() {
    let fx = Fixture::new();
    let a_dir = fx.input.join("a");
    let b_dir = fx.input.join("b");
    std::fs::create_dir_all(&a_dir).unwrap();
    std::fs::create_dir_all(&b_dir).unwrap();
    let a = a_dir.join("photo.jpg");
    let b = b_dir.join("photo.jpg");
    RgbImage::new(100, 100)
        .save_with_format(&a, ImageFormat::Jpeg)
        .unwrap();
    RgbImage::new(100, 50)
        .save_with_format(&b, ImageFormat::Jpeg)
        .unwrap();

    let resizer = fx.resizer();
    let out_a = resizer.resize_if_needed(&a, Some(10), None, 90).unwrap();
    let out_b = resizer.resize_if_needed(&b, Some(10), None, 90).unwrap();

    assert_eq!(out_a, out_b);
    assert_eq!(image::image_dimensions(&out_b).unwrap(), (10, 5));
}

#[test]
fn resizer_from_config_uses_configured_filter_and_dir() {
    let fx = Fixture::new();
    let source = fx.jpeg("cfg.jpg", 90, 60);
    let config = ResizerConfig {
        output_dir: fx.output.clone(),
        filter: ResampleFilter::Triangle,
        metadata: MetadataConfig {
            copy: false,
            ..MetadataConfig::default()
        },
        ..ResizerConfig::default()
    };

    let resizer = ImageResizer::from_config(&config);
    let path = resizer
        .resize_if_needed(&source, None, Some(30), 90)
        .unwrap();

    assert_eq!(path, fx.output.join("scaled_cfg.jpg"));
    assert_eq!(image::image_dimensions(&path).unwrap(), (45, 30));
}

#[test]
fn exif_carried_onto_scaled_jpeg() {
    let fx = Fixture::new();
    let source = fx.jpeg("camera.jpg", 400, 300);
    describe(&source, "pier in fog");

    let resizer = ImageResizer::new(RustBackend::new(), ExifCopier, &fx.output);
    let path = resizer
        .resize_if_needed(&source, Some(200), None, 85)
        .unwrap();

    assert_eq!(path, fx.output.join("scaled_camera.jpg"));
    assert_eq!(image::image_dimensions(&path).unwrap(), (200, 150));
    assert_eq!(description(&path).as_deref(), Some("pier in fog"));
}

#[test]
fn exif_carried_when_opaque_png_becomes_jpeg_bytes() {
    let fx = Fixture::new();
    let source = fx.rgb_png("shot.png", 1000, 500);
    describe(&source, "settings screen");
    // Stock config copies EXIF and fails the call if that goes wrong
    let config = ResizerConfig {
        output_dir: fx.output.clone(),
        ..ResizerConfig::default()
    };

    let path = ImageResizer::from_config(&config)
        .resize_if_needed(&source, Some(500), None, 80)
        .unwrap();

    assert_eq!(path, fx.output.join("scaled_shot.png"));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (500, 250));
    assert_eq!(description(&path).as_deref(), Some("settings screen"));
}

#[test]
fn exif_carried_when_transparent_jpg_named_source_stays_png() {
    let fx = Fixture::new();
    let source = fx.input.join("sticker.jpg");
    RgbaImage::from_fn(120, 60, |x, _| image::Rgba([200, 10, 10, (x % 256) as u8]))
        .save_with_format(&source, ImageFormat::Png)
        .unwrap();
    describe(&source, "die-cut sticker");

    let resizer = ImageResizer::new(RustBackend::new(), ExifCopier, &fx.output);
    let path = resizer
        .resize_if_needed(&source, Some(60), None, 90)
        .unwrap();

    assert_eq!(path, fx.output.join("scaled_sticker.jpg"));
    let written = std::fs::read(&path).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&written).unwrap();
    assert!(decoded.color().has_alpha());
    assert_eq!((decoded.width(), decoded.height()), (60, 30));
    assert_eq!(description(&path).as_deref(), Some("die-cut sticker"));
}
