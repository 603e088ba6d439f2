//! Warnings emitted while loading and converting parameters.

use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use vf_params::{ParamSource, ParameterStore};

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
fn capture(f: impl FnOnce()) -> String {
    let buf = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buf.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn missing_file_warns_once() {
    let path = std::env::temp_dir()
        .join("vf_params_tests")
        .join("no_such_params.txt");
    let _ = std::fs::remove_file(&path);

    let output = capture(|| {
        let mut store = ParameterStore::new(ParamSource::File(path.clone()));
        assert_eq!(store.get_double("tmax", 200.0), 200.0);
        assert_eq!(store.get_int("MAXlevel", 10), 10);
        assert!(store.reload().is_err());
        assert!(store.reload().is_err());
    });

    let expected = format!("Parameter file '{}' not found. Using defaults.", path.display());
    assert_eq!(output.matches(&expected).count(), 1, "{output}");
    assert!(output.contains("WARN"));
}

#[test]
fn invalid_numbers_warn_with_key_and_default() {
    let output = capture(|| {
        let store = ParameterStore::new(ParamSource::inline([
            ("MAXlevel", "ten"),
            ("tmax", "long"),
            ("Oh", "1e-2"),
        ]));
        assert_eq!(store.get_int("MAXlevel", 10), 10);
        assert_eq!(store.get_double("tmax", 200.0), 200.0);
        assert_eq!(store.get_double("Oh", 1.0), 1e-2);
    });

    assert!(output.contains("Invalid int for 'MAXlevel' ('ten'), using default 10"), "{output}");
    assert!(output.contains("Invalid double for 'tmax' ('long'), using default 200"), "{output}");
    assert!(!output.contains("'Oh'"), "{output}");
}
