//! Driver events and obsolete option warnings as seen by a `tracing` subscriber

use std::io;
use std::sync::{Arc, Mutex};

use tracing::Level;
use zero_mysql_meta::conn_str::ConnectionStringBuilder;
use zero_mysql_meta::constant::SslMode;
use zero_mysql_meta::trace::{TraceEventType, trace_event};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.text()
}

#[test]
fn event_levels() {
    assert_eq!(TraceEventType::Error.level(), Level::ERROR);
    assert_eq!(TraceEventType::Warning.level(), Level::WARN);
    assert_eq!(TraceEventType::UsageAdvisorWarning.level(), Level::WARN);
    assert_eq!(TraceEventType::ConnectionOpened.level(), Level::DEBUG);
    assert_eq!(TraceEventType::QueryNormalized.level(), Level::DEBUG);
}

#[test]
fn event_codes() {
    assert_eq!(TraceEventType::ConnectionOpened as u8, 1);
    assert_eq!(TraceEventType::NonQuery as u8, 10);
    assert_eq!(TraceEventType::QueryNormalized as u8, 14);
}

#[test]
fn trace_event_carries_kind_and_driver() {
    let output = capture(|| {
        trace_event(TraceEventType::Error, 42, "lost connection");
        trace_event(TraceEventType::UsageAdvisorWarning, -1, "unused columns");
    });
    let mut lines = output.lines();

    let error = lines.next().unwrap();
    assert!(error.contains("ERROR"), "{error}");
    assert!(error.contains("lost connection"), "{error}");
    assert!(error.contains("event=Error"), "{error}");
    assert!(error.contains("driver_id=42"), "{error}");

    let warning = lines.next().unwrap();
    assert!(warning.contains("WARN"), "{warning}");
    assert!(warning.contains("event=UsageAdvisorWarning"), "{warning}");
    assert!(warning.contains("driver_id=-1"), "{warning}");
}

#[test]
fn obsolete_option_logs_warning() {
    let mut builder = None;
    let output = capture(|| {
        builder = Some(ConnectionStringBuilder::parse("server=localhost;encrypt=yes").unwrap());
    });
    assert!(output.contains("Encrypt is now obsolete"), "{output}");
    assert_eq!(builder.unwrap().ssl_mode().unwrap(), SslMode::Preferred);
}
