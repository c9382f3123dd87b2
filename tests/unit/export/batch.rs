use super::*;
use crate::export::archive::{InMemoryArchiveSink, read_zip};
use crate::export::telemetry::NoTelemetry;

fn surface(w: u32, h: u32) -> RenderedSurface {
    RenderedSurface {
        width: w,
        height: h,
        data: [40u8, 80, 120, 255].repeat((w * h) as usize),
        premultiplied: true,
    }
}

fn broken() -> RenderedSurface {
    RenderedSurface {
        width: 8,
        height: 8,
        data: vec![1, 2, 3],
        premultiplied: true,
    }
}

#[derive(Default)]
struct FailingTelemetry {
    calls: usize,
}

impl ExportTelemetry for FailingTelemetry {
    fn notify(&mut self, _caption: &str) -> BrandframeResult<()> {
        self.calls += 1;
        Err(BrandframeError::export("endpoint unreachable"))
    }
}

#[test]
fn missing_target_is_skipped_and_not_waited_for() {
    let post = surface(8, 10);
    let story = surface(9, 16);
    let targets = vec![
        (FormatId::new("POST"), Some(&post)),
        (FormatId::new("SQUARE"), None),
        (FormatId::new("STORY"), Some(&story)),
    ];
    let mut sink = InMemoryArchiveSink::new();
    let report = BatchExporter::new()
        .with_archive_prefix(Some("TEB".to_string()))
        .export("Open day", &targets, &mut NoTelemetry, &mut sink)
        .unwrap();

    assert_eq!(report.archive_name, "TEB_Open day.zip");
    assert_eq!(report.files, vec!["Open day_POST.png", "Open day_STORY.png"]);
    assert_eq!(report.skipped, vec![FormatId::new("SQUARE")]);
    assert!(report.failed.is_empty());

    assert_eq!(sink.archives().len(), 1);
    let (name, bytes) = &sink.archives()[0];
    assert_eq!(name, "TEB_Open day.zip");
    assert_eq!(report.archive_bytes, bytes.len());
    let entries = read_zip(bytes).unwrap();
    assert_eq!(entries.len(), 2);
    let img = image::load_from_memory(&entries[1].bytes).unwrap();
    assert_eq!((img.width(), img.height()), (9, 16));
}

#[test]
fn failed_encode_is_reported_and_the_rest_is_archived() {
    let ok = surface(4, 4);
    let bad = broken();
    let targets = vec![
        (FormatId::new("A"), Some(&bad)),
        (FormatId::new("B"), Some(&ok)),
    ];
    let mut sink = InMemoryArchiveSink::new();
    let report = BatchExporter::new()
        .export("", &targets, &mut NoTelemetry, &mut sink)
        .unwrap();

    assert_eq!(report.archive_name, "graphic.zip");
    assert_eq!(report.files, vec!["graphic_B.png"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, FormatId::new("A"));
    assert_eq!(sink.archives().len(), 1);
}

#[test]
fn all_encodes_failing_is_an_error_and_nothing_is_saved() {
    let bad = broken();
    let targets = vec![(FormatId::new("A"), Some(&bad))];
    let mut sink = InMemoryArchiveSink::new();
    let err = BatchExporter::new()
        .export("x", &targets, &mut NoTelemetry, &mut sink)
        .unwrap_err();
    assert!(matches!(err, BrandframeError::Export(_)));
    assert!(sink.archives().is_empty());
}

#[test]
fn nothing_exportable_is_an_error() {
    let targets = vec![(FormatId::new("A"), None)];
    let mut sink = InMemoryArchiveSink::new();
    let err = BatchExporter::new()
        .export("x", &targets, &mut NoTelemetry, &mut sink)
        .unwrap_err();
    assert!(err.to_string().starts_with("export error:"));
    assert!(sink.archives().is_empty());
}

#[test]
fn telemetry_failure_does_not_block_export() {
    let s = surface(2, 2);
    let targets = vec![(FormatId::new("WEB"), Some(&s))];
    let mut telemetry = FailingTelemetry::default();
    let mut sink = InMemoryArchiveSink::new();
    let report = BatchExporter::new()
        .with_format(ExportImageFormat::Jpeg { quality: 80 })
        .with_default_name("fallback")
        .export("?!", &targets, &mut telemetry, &mut sink)
        .unwrap();
    assert_eq!(telemetry.calls, 1);
    assert_eq!(report.files, vec!["fallback_WEB.jpg"]);
}

#[test]
fn prefix_length_is_configurable() {
    let s = surface(2, 2);
    let targets = vec![(FormatId::new("P"), Some(&s))];
    let mut sink = InMemoryArchiveSink::new();
    let report = BatchExporter::new()
        .with_prefix_chars(4)
        .export("Zapisy trwają", &targets, &mut NoTelemetry, &mut sink)
        .unwrap();
    assert_eq!(report.files, vec!["Zapi_P.png"]);
    assert_eq!(report.archive_name, "Zapi.zip");
}
