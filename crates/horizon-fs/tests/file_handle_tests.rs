//! Tests for file handles and the whole-file helpers built on them.

use std::fs;

use bytemuck::{Pod, Zeroable};
use horizon_fs::{
    FileErrorKind, FileHandle, OpenMode, PortableOpener, SeekOrigin, ShareMode,
    read_file_to_string, write_string_to_file,
};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("horizon_fs=trace")
        .with_test_writer()
        .try_init();
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct Record {
    id: u32,
    weight: f32,
    flags: u64,
}

#[test]
fn test_typed_round_trip() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("values.bin");
    let values: Vec<u32> = (0..1000).map(|i| i * 7 + 3).collect();

    let mut writer = FileHandle::open(&path, OpenMode::WRITE).unwrap();
    assert_eq!(writer.write_array(&values).unwrap(), values.len());
    assert_eq!(writer.size().unwrap(), (values.len() * size_of::<u32>()) as u64);
    writer.close().unwrap();

    let mut reader = FileHandle::open(&path, OpenMode::READ).unwrap();
    let mut read_back = vec![0u32; values.len()];
    assert_eq!(reader.read_array(&mut read_back).unwrap(), values.len());
    assert_eq!(read_back, values);

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(on_disk.as_slice(), bytemuck::cast_slice::<u32, u8>(&values));
}

#[test]
fn test_struct_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("records.bin");
    let records = [
        Record {
            id: 1,
            weight: 0.5,
            flags: 0xdead_beef,
        },
        Record {
            id: 2,
            weight: -3.25,
            flags: u64::MAX,
        },
    ];

    let mut file = FileHandle::open(&path, "wb+".parse().unwrap()).unwrap();
    assert_eq!(file.write_array(&records).unwrap(), 2);
    assert_eq!(file.size().unwrap(), 2 * size_of::<Record>() as u64);

    file.seek(0, SeekOrigin::Start).unwrap();
    let mut first = Record::zeroed();
    assert_eq!(file.read_object(&mut first).unwrap(), 1);
    assert_eq!(first, records[0]);

    let mut second = Record::zeroed();
    assert_eq!(file.read_object(&mut second).unwrap(), 1);
    assert_eq!(second, records[1]);

    // Nothing left.
    assert_eq!(file.read_object(&mut second).unwrap(), 0);
}

#[test]
fn test_read_past_end_returns_short_count() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.bin");
    fs::write(&path, bytemuck::cast_slice::<u16, u8>(&[10, 20, 30])).unwrap();

    let mut file = FileHandle::open(&path, OpenMode::READ).unwrap();
    let mut buffer = [0u16; 8];
    assert_eq!(file.read_array(&mut buffer).unwrap(), 3);
    assert_eq!(&buffer[..3], &[10, 20, 30]);
}

#[test]
fn test_size_does_not_change_position() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pos.bin");

    let mut file = FileHandle::open(&path, OpenMode::WRITE_READ).unwrap();
    file.write_string("hello, world").unwrap();
    file.seek(5, SeekOrigin::Start).unwrap();

    assert_eq!(file.size().unwrap(), 12);
    assert_eq!(file.tell().unwrap(), 5);

    let mut rest = [0u8; 7];
    assert_eq!(file.read_bytes(&mut rest).unwrap(), 7);
    assert_eq!(&rest, b", world");
}

#[test]
fn test_resize_shrink_and_grow() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("resize.bin");

    let mut file = FileHandle::open(&path, OpenMode::WRITE_READ).unwrap();
    file.write_bytes(&[0xAA; 100]).unwrap();

    file.resize(10).unwrap();
    assert_eq!(file.size().unwrap(), 10);

    file.resize(64).unwrap();
    assert_eq!(file.size().unwrap(), 64);
    file.close().unwrap();

    let contents = fs::read(&path).unwrap();
    assert_eq!(&contents[..10], &[0xAA; 10]);
    // Common hosts zero-fill the grown region.
    assert!(contents[10..].iter().all(|&b| b == 0));
}

#[test]
fn test_resize_read_only_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ro.bin");
    fs::write(&path, b"data").unwrap();

    let mut file = FileHandle::open(&path, OpenMode::READ).unwrap();
    assert!(file.resize(0).is_err());
    assert_eq!(fs::read(&path).unwrap(), b"data");
}

#[test]
fn test_reopen_switches_files() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.txt");
    let second = temp_dir.path().join("second.txt");
    fs::write(&first, "one").unwrap();
    fs::write(&second, "two!").unwrap();

    let mut file = FileHandle::open(&first, OpenMode::READ).unwrap();
    assert_eq!(file.size().unwrap(), 3);

    file.reopen_with(&PortableOpener, &second, OpenMode::READ, ShareMode::DenyWrite)
        .unwrap();
    assert_eq!(file.path(), second.as_path());
    assert_eq!(file.size().unwrap(), 4);
}

#[test]
fn test_drop_releases_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dropped.txt");

    {
        let mut file = FileHandle::open(&path, OpenMode::WRITE).unwrap();
        file.write_string("written before drop").unwrap();
    }

    assert_eq!(fs::read_to_string(&path).unwrap(), "written before drop");
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_handle_moves_between_owners() {
    fn finish(mut file: FileHandle) -> u64 {
        file.flush().unwrap();
        file.size().unwrap()
    }

    let temp_dir = TempDir::new().unwrap();
    let mut file = FileHandle::open(temp_dir.path().join("moved.bin"), OpenMode::WRITE).unwrap();
    file.write_bytes(&[1, 2, 3]).unwrap();
    assert_eq!(finish(file), 3);
}

#[test]
fn test_append_mode() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("log.txt");
    fs::write(&path, "line 1\n").unwrap();

    let mut file = FileHandle::open(&path, OpenMode::APPEND).unwrap();
    file.write_string("line 2\n").unwrap();
    drop(file);

    assert_eq!(fs::read_to_string(&path).unwrap(), "line 1\nline 2\n");
}

#[test]
fn test_closed_handle_reports_not_open() {
    let temp_dir = TempDir::new().unwrap();
    let mut file = FileHandle::open(temp_dir.path().join("c.bin"), OpenMode::WRITE).unwrap();
    file.close().unwrap();

    let mut buffer = [0u8; 4];
    assert_eq!(
        file.read_bytes(&mut buffer).unwrap_err().kind(),
        FileErrorKind::NotOpen
    );
    assert_eq!(file.write_bytes(b"x").unwrap_err().kind(), FileErrorKind::NotOpen);
    assert_eq!(file.tell().unwrap_err().kind(), FileErrorKind::NotOpen);
}

#[test]
fn test_string_helpers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.txt");

    write_string_to_file(&path, "first").unwrap();
    write_string_to_file(&path, "second").unwrap();
    assert_eq!(read_file_to_string(&path).unwrap(), "second");
}
