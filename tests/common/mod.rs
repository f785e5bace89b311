// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use suite_logger::infra::sink::{LogSink, SinkError};
use suite_logger::models::{OperationType, TestError, TestResult};

/// Writes `line 1` .. `line N` to `dir/name` and returns the path.
pub fn write_numbered_file(dir: &Path, name: &str, lines: usize) -> PathBuf {
    let path = dir.join(name);
    let content: String = (1..=lines).map(|i| format!("line {}\n", i)).collect();
    fs::write(&path, content).expect("Failed to write source file");
    path
}

/// A small test file whose third line holds the failing assertion.
pub fn write_math_test(dir: &Path) -> PathBuf {
    let path = dir.join("math.test.ts");
    let content = r#"describe('math', () => {
  it('adds numbers', () => {
    expect(add(1, 2)).toBe(4);
  });
});
"#;
    fs::write(&path, content).expect("Failed to write math.test.ts");
    path
}

/// The "adds numbers" scenario: two passes then a failure, 5 + 7 + 12 ms.
pub fn adds_numbers_results(source: &Path) -> Vec<TestResult> {
    vec![
        TestResult::passed("adds numbers", OperationType::Get)
            .with_duration(5)
            .at(source, 3),
        TestResult::passed("adds numbers", OperationType::Update)
            .with_duration(7)
            .at(source, 3),
        TestResult::failed("adds numbers", OperationType::Remove)
            .with_duration(12)
            .with_error(
                TestError::new("expected 3 to be 4").with_stack(format!(
                    "Error: expected 3 to be 4\n    at Object.<anonymous> ({}:3:23)\n    at runTest (node_modules/jest-circus/build/run.js:120:9)",
                    source.display()
                )),
            )
            .at(source, 3),
    ]
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// A cloneable in-memory writer, used to capture console sink output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A writer that always fails.
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("disk on fire"))
    }
}

/// A sink recording `(label, message)` pairs into a shared journal.
pub struct RecordingSink {
    label: String,
    journal: Arc<Mutex<Vec<(String, String)>>>,
    open: AtomicBool,
}

impl RecordingSink {
    pub fn new(label: &str, journal: Arc<Mutex<Vec<(String, String)>>>) -> Self {
        Self {
            label: label.to_string(),
            journal,
            open: AtomicBool::new(true),
        }
    }
}

impl LogSink for RecordingSink {
    fn label(&self) -> &str {
        &self.label
    }

    fn write(&self, message: &str) -> Result<(), SinkError> {
        if !self.is_open() {
            return Err(SinkError::Closed {
                sink: self.label.clone(),
            });
        }
        self.journal
            .lock()
            .unwrap()
            .push((self.label.clone(), message.to_string()));
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// A sink whose writes always fail with an I/O error.
pub struct FailingSink;

impl LogSink for FailingSink {
    fn label(&self) -> &str {
        "failing"
    }

    fn write(&self, _message: &str) -> Result<(), SinkError> {
        Err(SinkError::Io {
            sink: "failing".to_string(),
            source: io::Error::other("disk on fire"),
        })
    }

    fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        true
    }
}
