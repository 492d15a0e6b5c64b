// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tarstream::{
    CancellationToken, Error, HeaderOptions, MtimePolicy, Observer, TarWriter, WriterOptions,
    export_tree,
};
use treefs::memory::{dir, file, special, symlink};
use treefs::testing::{
    FailingDirectory, FailingReaderFile, FailingSizeFile, MisreportedFile, UnlistableDirectory,
    UnreadableSymlink,
};
use treefs::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Parsed {
    path: String,
    kind: tar::EntryType,
    size: u64,
    mode: u32,
    link: Option<String>,
    body: Vec<u8>,
}

fn parse(bytes: &[u8]) -> Vec<Parsed> {
    assert_eq!(bytes.len() % 512, 0, "archive is not block aligned");
    let mut archive = tar::Archive::new(bytes);
    archive
        .entries()
        .unwrap()
        .map(|e| {
            let mut e = e.unwrap();
            let header = e.header().clone();
            let mut body = Vec::new();
            e.read_to_end(&mut body).unwrap();
            Parsed {
                path: e.path().unwrap().to_string_lossy().into_owned(),
                kind: header.entry_type(),
                size: header.size().unwrap(),
                mode: header.mode().unwrap(),
                link: e
                    .link_name()
                    .unwrap()
                    .map(|l| l.to_string_lossy().into_owned()),
                body,
            }
        })
        .collect()
}

fn paths(entries: &[Parsed]) -> Vec<&str> {
    entries.iter().map(|e| e.path.as_str()).collect()
}

fn empty_dir() -> Node {
    dir(Vec::<(String, Node)>::new()).unwrap()
}

fn fixed_options() -> WriterOptions {
    WriterOptions {
        header: HeaderOptions {
            mtime: MtimePolicy::Fixed(1_600_000_000),
            ..HeaderOptions::default()
        },
    }
}

/// Write `root` under `path`, then close; returns the walk result and the
/// finished archive bytes.
fn write_tree(root: &Node, path: &str) -> (tarstream::Result<()>, Vec<u8>) {
    let mut writer = TarWriter::with_options(Vec::new(), fixed_options());
    let result = writer.write_node(root, path);
    let bytes = writer.close().unwrap();
    (result, bytes)
}

#[test]
fn test_reference_tree() {
    let root = dir([
        ("a", file(b"hi")),
        ("b", empty_dir()),
        ("c", symlink("a")),
    ])
    .unwrap();

    let (result, bytes) = write_tree(&root, "root");
    result.unwrap();

    let entries = parse(&bytes);
    assert_eq!(paths(&entries), vec!["root", "root/a", "root/b", "root/c"]);

    assert_eq!(entries[0].kind, tar::EntryType::Directory);
    assert_eq!(entries[0].mode, 0o777);
    assert_eq!(entries[0].size, 0);

    assert_eq!(entries[1].kind, tar::EntryType::Regular);
    assert_eq!(entries[1].mode, 0o644);
    assert_eq!(entries[1].size, 2);
    assert_eq!(entries[1].body, b"hi");

    assert_eq!(entries[2].kind, tar::EntryType::Directory);

    assert_eq!(entries[3].kind, tar::EntryType::Symlink);
    assert_eq!(entries[3].mode, 0o777);
    assert_eq!(entries[3].link.as_deref(), Some("a"));
    assert!(entries[3].body.is_empty());

    // four header blocks, one body block, two end-of-archive blocks
    assert_eq!(bytes.len(), 512 * 7);
    assert!(bytes[bytes.len() - 1024..].iter().all(|b| *b == 0));
}

#[test]
fn test_children_keep_listing_order() {
    let root = dir([
        ("zulu", file(b"z")),
        ("alpha", file(b"a")),
        ("mike", dir([("yankee", file(b"y")), ("bravo", file(b"b"))]).unwrap()),
    ])
    .unwrap();

    let (result, bytes) = write_tree(&root, "top");
    result.unwrap();
    assert_eq!(
        paths(&parse(&bytes)),
        vec!["top", "top/zulu", "top/alpha", "top/mike", "top/mike/yankee", "top/mike/bravo"]
    );
}

#[test]
fn test_root_path_is_used_verbatim() {
    let (result, bytes) = write_tree(&file(b"x"), "exports/2024/data.bin");
    result.unwrap();
    let entries = parse(&bytes);
    assert_eq!(paths(&entries), vec!["exports/2024/data.bin"]);
    assert_eq!(entries[0].body, b"x");
}

#[test]
fn test_empty_directory_is_single_entry() {
    let (result, bytes) = write_tree(&empty_dir(), "empty");
    result.unwrap();
    let entries = parse(&bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, tar::EntryType::Directory);
    assert_eq!(bytes.len(), 512 * 3);
}

#[test]
fn test_zero_byte_file() {
    let (result, bytes) = write_tree(&file(b""), "nothing");
    result.unwrap();
    let entries = parse(&bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size, 0);
    assert!(entries[0].body.is_empty());
    assert_eq!(bytes.len(), 512 * 3);
}

#[test]
fn test_iteration_failure_keeps_written_children() {
    let root = FailingDirectory::new_node(vec![
        ("one", file(b"1")),
        ("two", dir([("inner", file(b"i"))]).unwrap()),
    ]);

    let (result, bytes) = write_tree(&root, "d");
    match result {
        Err(Error::Iteration { path, source }) => {
            assert_eq!(path, "d");
            assert!(matches!(source, treefs::Error::Injected(_)));
        }
        other => panic!("expected iteration error, got {other:?}"),
    }
    assert_eq!(
        paths(&parse(&bytes)),
        vec!["d", "d/one", "d/two", "d/two/inner"]
    );
}

#[test]
fn test_unlistable_directory_after_header() {
    let root = dir([("ok", file(b"k")), ("broken", UnlistableDirectory::new_node())]).unwrap();
    let (result, bytes) = write_tree(&root, "r");
    assert!(matches!(result, Err(Error::Iteration { ref path, .. }) if path == "r/broken"));
    assert_eq!(paths(&parse(&bytes)), vec!["r", "r/ok", "r/broken"]);
}

#[test]
fn test_nested_failure_stops_siblings() {
    let root = dir([
        ("first", FailingDirectory::new_node(Vec::<(String, Node)>::new())),
        ("second", file(b"never")),
    ])
    .unwrap();
    let (result, bytes) = write_tree(&root, "r");
    assert!(matches!(result, Err(Error::Iteration { ref path, .. }) if path == "r/first"));
    assert_eq!(paths(&parse(&bytes)), vec!["r", "r/first"]);
}

#[test]
fn test_size_failure_writes_nothing_for_file() {
    let root = dir([("bad", FailingSizeFile::new_node())]).unwrap();
    let (result, bytes) = write_tree(&root, "r");
    assert!(matches!(result, Err(Error::Source { ref path, .. }) if path == "r/bad"));
    assert_eq!(paths(&parse(&bytes)), vec!["r"]);
}

#[test]
fn test_unreadable_symlink_is_source_error() {
    let (result, bytes) = write_tree(&UnreadableSymlink::new_node(), "link");
    assert!(matches!(result, Err(Error::Source { .. })));
    assert!(parse(&bytes).is_empty());
}

#[test]
fn test_read_failure_keeps_original_error() {
    let node = FailingReaderFile::new_node(vec![1u8; 2000], 1000);
    let mut writer = TarWriter::new(Vec::new());
    match writer.write_node(&node, "f") {
        Err(Error::Read { path, source }) => {
            assert_eq!(path, "f");
            assert_eq!(source.to_string(), "injected read failure");
        }
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_short_stream_is_size_mismatch() {
    let node = MisreportedFile::new_node(10, b"abc");
    let mut writer = TarWriter::new(Vec::new());
    match writer.write_node(&node, "short") {
        Err(Error::SizeMismatch {
            path,
            declared,
            actual,
        }) => {
            assert_eq!(path, "short");
            assert_eq!(declared, 10);
            assert_eq!(actual, 3);
        }
        other => panic!("expected size mismatch, got {other:?}"),
    }
}

#[test]
fn test_long_stream_is_size_mismatch() {
    let node = MisreportedFile::new_node(2, b"abcdef");
    let mut writer = TarWriter::new(Vec::new());
    assert!(matches!(
        writer.write_node(&node, "long"),
        Err(Error::SizeMismatch {
            declared: 2,
            actual: 3,
            ..
        })
    ));
}

#[test]
fn test_unsupported_kind_at_depth() {
    let root = dir([
        ("before", file(b"b")),
        ("sub", dir([("pipe", special("fifo")), ("after", file(b"a"))]).unwrap()),
    ])
    .unwrap();

    let (result, bytes) = write_tree(&root, "r");
    match result {
        Err(Error::Unsupported { path, kind }) => {
            assert_eq!(path, "r/sub/pipe");
            assert_eq!(kind, "fifo");
        }
        other => panic!("expected unsupported kind, got {other:?}"),
    }
    assert_eq!(paths(&parse(&bytes)), vec!["r", "r/before", "r/sub"]);
    let message = Error::Unsupported {
        path: "r/sub/pipe".into(),
        kind: "fifo".into(),
    }
    .to_string();
    assert!(message.contains("fifo") && message.contains("r/sub/pipe"));
}

#[test]
fn test_invalid_path_is_header_error() {
    let root = dir([("..", file(b"x"))]).unwrap();
    let (result, bytes) = write_tree(&root, "r");
    assert!(matches!(result, Err(Error::Header { ref path, .. }) if path == "r/.."));
    assert_eq!(paths(&parse(&bytes)), vec!["r"]);
}

#[test]
fn test_names_that_alias_the_parent_are_header_errors() {
    for name in ["", "."] {
        let root = dir([("a", file(b"a")), (name, file(b"x")), ("z", file(b"z"))]).unwrap();
        let (result, bytes) = write_tree(&root, "r");
        let expected = format!("r/{name}");
        assert!(
            matches!(result, Err(Error::Header { ref path, .. }) if *path == expected),
            "name {name:?}"
        );
        assert_eq!(paths(&parse(&bytes)), vec!["r", "r/a"]);
    }
}

/// Accepts `limit` bytes, then fails every write
struct LimitedSink {
    written: usize,
    limit: usize,
}

impl Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written >= self.limit {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "sink full"));
        }
        let n = buf.len().min(self.limit - self.written);
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_failure_is_write_error() {
    let root = dir([("a", file(vec![0u8; 4096])), ("b", file(b"b"))]).unwrap();
    let sink = LimitedSink {
        written: 0,
        limit: 512 * 3,
    };
    let mut writer = TarWriter::new(sink);
    match writer.write_node(&root, "r") {
        Err(Error::Write { path, source }) => {
            assert_eq!(path, "r/a");
            assert_eq!(source.kind(), io::ErrorKind::StorageFull);
        }
        other => panic!("expected write error, got {other:?}"),
    }
    assert_eq!(writer.stats().files, 0);
    assert!(matches!(writer.close(), Err(Error::Close(_))));
}

/// Stores bytes but refuses to flush
struct NoFlush(Vec<u8>);

impl Write for NoFlush {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("flush refused"))
    }
}

#[test]
fn test_flush_failure_is_write_error() {
    let mut writer = TarWriter::new(NoFlush(Vec::new()));
    // directories are not flushed
    writer.write_node(&empty_dir(), "d").unwrap();
    assert!(matches!(
        writer.write_node(&file(b"x"), "d/x"),
        Err(Error::Write { ref path, .. }) if path == "d/x"
    ));
}

#[test]
fn test_cancelled_before_start_writes_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let mut writer = TarWriter::new(Vec::new()).cancellation(token);
    assert!(matches!(
        writer.write_node(&file(b"x"), "x"),
        Err(Error::Cancelled { ref path }) if path == "x"
    ));
    assert_eq!(writer.close().unwrap().len(), 1024);
}

/// Cancels the token once the named path has been written
struct CancelAfter {
    path: &'static str,
    token: CancellationToken,
}

impl Observer for CancelAfter {
    fn on_exit(&self, path: &str, _outcome: Result<(), &Error>) {
        if path == self.path {
            self.token.cancel();
        }
    }
}

#[test]
fn test_cancellation_between_nodes() {
    let token = CancellationToken::new();
    let root = dir([("a", file(b"a")), ("b", file(b"b")), ("c", file(b"c"))]).unwrap();

    let mut writer = TarWriter::with_options(Vec::new(), fixed_options())
        .cancellation(token.clone())
        .observer(Box::new(CancelAfter {
            path: "r/a",
            token,
        }));
    assert!(matches!(
        writer.write_node(&root, "r"),
        Err(Error::Cancelled { ref path }) if path == "r/b"
    ));
    let bytes = writer.close().unwrap();
    assert_eq!(paths(&parse(&bytes)), vec!["r", "r/a"]);
}

#[derive(Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl Observer for Recorder {
    fn on_enter(&self, path: &str, node: &Node) {
        self.events
            .borrow_mut()
            .push(format!("enter {path} {}", node.kind_name()));
    }

    fn on_exit(&self, path: &str, outcome: Result<(), &Error>) {
        let status = if outcome.is_ok() { "ok" } else { "err" };
        self.events.borrow_mut().push(format!("exit {path} {status}"));
    }
}

#[test]
fn test_observer_sees_every_visit_without_changing_output() {
    let build = || {
        dir([
            ("a", file(b"hi")),
            ("b", empty_dir()),
            ("p", special("socket")),
        ])
        .unwrap()
    };

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut observed = TarWriter::with_options(Vec::new(), fixed_options()).observer(Box::new(
        Recorder {
            events: events.clone(),
        },
    ));
    let observed_result = observed.write_node(&build(), "r");
    let observed_bytes = observed.close().unwrap();

    let (plain_result, plain_bytes) = write_tree(&build(), "r");

    assert_eq!(
        observed_result.unwrap_err().to_string(),
        plain_result.unwrap_err().to_string()
    );
    assert_eq!(observed_bytes, plain_bytes);
    assert_eq!(
        *events.borrow(),
        vec![
            "enter r directory",
            "enter r/a file",
            "exit r/a ok",
            "enter r/b directory",
            "exit r/b ok",
            "enter r/p socket",
            "exit r/p err",
            "exit r err",
        ]
    );
}

#[test]
fn test_logging_observer_does_not_change_outcome() {
    diagnostics::init_diagnostics();
    let root = dir([("a", file(b"hi"))]).unwrap();
    let mut writer = TarWriter::with_options(Vec::new(), fixed_options())
        .observer(Box::new(tarstream::LoggingObserver));
    writer.write_node(&root, "r").unwrap();
    let (_, plain) = write_tree(&root, "r");
    assert_eq!(writer.close().unwrap(), plain);
}

#[test]
fn test_stats_count_entries() {
    let root = dir([
        ("a", file(b"hello")),
        ("b", dir([("c", file(b"world!")), ("l", symlink("c"))]).unwrap()),
    ])
    .unwrap();
    let mut writer = TarWriter::new(Vec::new());
    writer.write_node(&root, "r").unwrap();

    let stats = writer.stats().clone();
    assert_eq!(stats.directories, 2);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.symlinks, 1);
    assert_eq!(stats.body_bytes, 11);
    assert_eq!(stats.entries(), 5);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["body_bytes"], 11);
}

#[test]
fn test_export_tree_closes_after_failure() {
    let root = dir([("a", file(b"a")), ("bad", FailingSizeFile::new_node())]).unwrap();
    let mut buf = Vec::new();
    let result = export_tree(&root, "r", &mut buf, fixed_options());
    assert!(matches!(result, Err(Error::Source { .. })));

    // the partial archive is still terminated
    assert!(buf.len() >= 1024);
    assert!(buf[buf.len() - 1024..].iter().all(|b| *b == 0));
    assert_eq!(paths(&parse(&buf)), vec!["r", "r/a"]);
}

#[test]
fn test_export_tree_prefers_walk_error_over_close_error() {
    let root = dir([("a", file(b"abc"))]).unwrap();
    let sink = LimitedSink {
        written: 0,
        limit: 0,
    };
    let result = export_tree(&root, "r", sink, fixed_options());
    match result {
        Err(Error::Write { path, source }) => {
            assert_eq!(path, "r");
            assert_eq!(source.kind(), io::ErrorKind::StorageFull);
        }
        Err(other) => panic!("expected write error, got {other}"),
        Ok(_) => panic!("expected write error"),
    }
}

#[test]
fn test_export_runs_on_worker_thread() {
    let root = dir([("a", file(b"abc")), ("l", symlink("a"))]).unwrap();
    let worker = std::thread::spawn(move || export_tree(&root, "r", Vec::new(), fixed_options()));
    let (bytes, stats) = worker.join().unwrap().unwrap();
    assert_eq!(stats.entries(), 3);
    assert_eq!(paths(&parse(&bytes)), vec!["r", "r/a", "r/l"]);
}

#[test]
fn test_export_tree_success() {
    let root = dir([("a", file(b"abc"))]).unwrap();
    let (bytes, stats) = export_tree(&root, "r", Vec::new(), fixed_options()).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(stats.body_bytes, 3);
    assert_eq!(paths(&parse(&bytes)), vec!["r", "r/a"]);
}

#[test]
fn test_writer_options_deserialize() {
    let options: WriterOptions =
        serde_json::from_str(r#"{"header": {"mtime": {"fixed": 42}}}"#).unwrap();
    assert_eq!(options.header.mtime, MtimePolicy::Fixed(42));
    assert_eq!(options.header.file_mode, 0o644);

    let options: WriterOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, WriterOptions::default());
}

/// File of `len` generated bytes that never exist in memory at once
struct GeneratedFile {
    len: u64,
}

impl treefs::File for GeneratedFile {
    fn size(&self) -> treefs::Result<u64> {
        Ok(self.len)
    }

    fn reader(&self) -> treefs::Result<Box<dyn Read>> {
        Ok(Box::new(io::repeat(0xab).take(self.len)))
    }
}

/// Counts bytes instead of storing them
#[derive(Default)]
struct CountingSink {
    written: u64,
}

impl Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_large_file_is_streamed() {
    let len = 64 * 1024 * 1024 + 7;
    let node = Node::File(treefs::file::Handle::new(Arc::new(Mutex::new(Box::new(
        GeneratedFile { len },
    )))));

    let mut writer = TarWriter::new(CountingSink::default());
    writer.write_node(&node, "big.bin").unwrap();
    assert_eq!(writer.stats().body_bytes, len);

    let sink = writer.close().unwrap();
    let padded = len.div_ceil(512) * 512;
    assert_eq!(sink.written, 512 + padded + 1024);
}
