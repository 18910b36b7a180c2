//! Page-activity recording.
//!
//! Two halves: a pure user-agent classifier with a fixed precedence
//! contract, and a fire-and-forget recorder that queues events to a
//! background logging thread. Neither half can fail into the engine's
//! computation path; failed writes are dropped.

/// User-agent string classification.
pub mod classify;
/// Queue-backed event recorder and sinks.
pub mod recorder;

// Re-export the main types for convenience
pub use classify::ClientInfo;
pub use classify::classify_user_agent;
pub use recorder::ActivityEvent;
pub use recorder::ActivityRecorder;
pub use recorder::ActivitySink;
pub use recorder::CsvSink;
pub use recorder::MemorySink;
