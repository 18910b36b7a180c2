use std::io::{self, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;

use super::classify::{ClientInfo, classify_user_agent};

/// One recorded page-activity event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEvent {
    /// Monotonic sequence number assigned by the consumer.
    pub seq: u64,
    /// Free-form activity message ("Page loaded", "Scrolled 50%", ...).
    pub message: String,
    /// Client classification derived from the user-agent at record time.
    pub client: ClientInfo,
}

/// Destination for recorded events.
///
/// Sinks run on the recorder's logging thread; a slow or failing sink
/// never blocks producers, which only touch the queue.
pub trait ActivitySink: Send {
    /// Appends one event.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` on write failure. The recorder drops the
    /// event and keeps going.
    fn append(&mut self, event: &ActivityEvent) -> io::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` on flush failure.
    fn flush(&mut self) -> io::Result<()>;
}

/// In-memory sink, shared behind a mutex so tests and callers can read
/// back what was recorded.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ActivityEvent>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<ActivityEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ActivitySink for MemorySink {
    fn append(&mut self, event: &ActivityEvent) -> io::Result<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Header row written by [`CsvSink`].
pub const ACTIVITY_CSV_HEADER: &str = "seq,message,browser,os,device";

/// CSV sink writing one row per event.
pub struct CsvSink<W: Write + Send> {
    wtr: csv::Writer<W>,
}

impl<W: Write + Send> CsvSink<W> {
    /// Creates a sink and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the header cannot be written.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);
        wtr.write_record(ACTIVITY_CSV_HEADER.split(','))?;
        Ok(Self { wtr })
    }
}

impl<W: Write + Send> ActivitySink for CsvSink<W> {
    fn append(&mut self, event: &ActivityEvent) -> io::Result<()> {
        self.wtr.write_record(&[
            event.seq.to_string(),
            event.message.clone(),
            event.client.browser.to_string(),
            event.client.os.to_string(),
            event.client.device.to_string(),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.wtr.flush()
    }
}

enum Command {
    Record {
        message: String,
        user_agent: Option<String>,
    },
    Flush(mpsc::SyncSender<()>),
}

/// Fire-and-forget activity recorder.
///
/// Producers push messages onto an unbounded channel; a background thread
/// classifies the user-agent, assigns sequence numbers, and appends to the
/// sink. Recording never blocks and never reports an error to the caller.
/// On shutdown the queue is drained and the sink flushed — best effort,
/// matching the page-unload policy of the original tracker.
pub struct ActivityRecorder {
    tx: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

impl ActivityRecorder {
    /// Spawns the logging thread over the given sink.
    pub fn spawn(mut sink: Box<dyn ActivitySink>) -> Self {
        let (tx, rx) = mpsc::channel::<Command>();
        let handle = thread::spawn(move || {
            let mut seq = 0u64;
            for cmd in rx {
                match cmd {
                    Command::Record {
                        message,
                        user_agent,
                    } => {
                        let event = ActivityEvent {
                            seq,
                            message,
                            client: classify_user_agent(user_agent.as_deref()),
                        };
                        seq += 1;
                        // Best effort: a failed append drops the event
                        let _ = sink.append(&event);
                    }
                    Command::Flush(ack) => {
                        let _ = sink.flush();
                        let _ = ack.send(());
                    }
                }
            }
            let _ = sink.flush();
        });
        Self { tx, handle }
    }

    /// Records an event with no user-agent (e.g. from the CLI).
    pub fn record(&self, message: impl Into<String>) {
        self.record_with_agent(message, None);
    }

    /// Records an event, classifying the given user-agent string.
    ///
    /// Silently drops the event if the logging thread is gone.
    pub fn record_with_agent(&self, message: impl Into<String>, user_agent: Option<&str>) {
        let _ = self.tx.send(Command::Record {
            message: message.into(),
            user_agent: user_agent.map(str::to_string),
        });
    }

    /// Waits until everything queued so far has been appended and flushed.
    ///
    /// Returns `false` if the timeout elapsed or the logging thread is
    /// gone — callers treat both as "sent what we could".
    pub fn flush(&self, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        if self.tx.send(Command::Flush(ack_tx)).is_err() {
            return false;
        }
        ack_rx.recv_timeout(timeout).is_ok()
    }

    /// Drains the queue, flushes the sink, and joins the logging thread.
    pub fn shutdown(self) {
        let Self { tx, handle } = self;
        drop(tx);
        let _ = handle.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn records_reach_the_sink_in_order() {
        let sink = MemorySink::new();
        let recorder = ActivityRecorder::spawn(Box::new(sink.clone()));
        recorder.record("Page loaded");
        recorder.record("Scrolled 25%");
        recorder.record("Scrolled 50%");
        assert!(recorder.flush(FLUSH_TIMEOUT));

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].message, "Page loaded");
        assert_eq!(events[2].message, "Scrolled 50%");
        let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        recorder.shutdown();
    }

    #[test]
    fn user_agent_is_classified_at_record_time() {
        let sink = MemorySink::new();
        let recorder = ActivityRecorder::spawn(Box::new(sink.clone()));
        recorder.record_with_agent(
            "Button clicked: Add Gadget",
            Some("Mozilla/5.0 (Windows NT 10.0) Chrome/120.0 Safari/537.36"),
        );
        recorder.record("cli event");
        assert!(recorder.flush(FLUSH_TIMEOUT));

        let events = sink.events();
        assert_eq!(events[0].client.browser, "Chrome");
        assert_eq!(events[0].client.os, "Windows");
        assert_eq!(events[1].client, ClientInfo::UNKNOWN);
        recorder.shutdown();
    }

    #[test]
    fn shutdown_drains_pending_events() {
        let sink = MemorySink::new();
        let recorder = ActivityRecorder::spawn(Box::new(sink.clone()));
        for i in 0..100 {
            recorder.record(format!("event {i}"));
        }
        recorder.shutdown();
        assert_eq!(sink.events().len(), 100);
    }

    #[test]
    fn csv_sink_writes_header_and_rows() {
        let mut buf = Vec::new();
        {
            let mut sink = CsvSink::new(&mut buf).expect("header write should succeed");
            sink.append(&ActivityEvent {
                seq: 0,
                message: "Page loaded".to_string(),
                client: classify_user_agent(Some("firefox on windows")),
            })
            .expect("append should succeed");
            sink.flush().expect("flush should succeed");
        }
        let csv = String::from_utf8(buf).expect("csv output should be valid UTF-8");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(ACTIVITY_CSV_HEADER));
        assert_eq!(lines.next(), Some("0,Page loaded,Firefox,Windows,Desktop"));
    }

    #[test]
    fn memory_sink_snapshot_is_independent() {
        let sink = MemorySink::new();
        let recorder = ActivityRecorder::spawn(Box::new(sink.clone()));
        recorder.record("one");
        assert!(recorder.flush(FLUSH_TIMEOUT));
        let snapshot = sink.events();
        recorder.record("two");
        assert!(recorder.flush(FLUSH_TIMEOUT));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(sink.events().len(), 2);
        recorder.shutdown();
    }
}
