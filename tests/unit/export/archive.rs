use super::*;

fn entry(name: &str, bytes: &[u8]) -> ArchiveEntry {
    ArchiveEntry {
        name: name.to_string(),
        bytes: bytes.to_vec(),
    }
}

#[test]
fn zip_keeps_entries_in_order() {
    let entries = vec![
        entry("Open day_POST.png", b"post-bytes"),
        entry("Open day_STORY.png", b"story"),
        entry("Łódź_WEB.png", &[0, 1, 2, 3, 255]),
    ];
    let archive = build_zip(&entries).unwrap();
    assert_eq!(&archive[..2], b"PK");
    assert_eq!(read_zip(&archive).unwrap(), entries);
}

#[test]
fn empty_zip_is_valid() {
    let archive = build_zip(&[]).unwrap();
    assert!(read_zip(&archive).unwrap().is_empty());
}

#[test]
fn garbage_is_not_a_zip() {
    assert!(read_zip(b"definitely not a zip").is_err());
}

#[test]
fn directory_sink_writes_named_file() {
    let dir = PathBuf::from("target").join("unit_archive_sink");
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = DirectoryArchiveSink::new(&dir);
    sink.save("TEB_x.zip", b"abc").unwrap();
    let path = sink.last_path().unwrap().to_path_buf();
    assert_eq!(path, dir.join("TEB_x.zip"));
    assert_eq!(std::fs::read(&path).unwrap(), b"abc");
}

#[test]
fn in_memory_sink_records_saves() {
    let mut sink = InMemoryArchiveSink::new();
    sink.save("a.zip", b"1").unwrap();
    sink.save("b.zip", b"22").unwrap();
    assert_eq!(sink.archives().len(), 2);
    assert_eq!(sink.archives()[1].0, "b.zip");
    assert_eq!(sink.archives()[1].1, b"22");
}
