//! Touchslot Replay
//!
//! Drives raw multi-touch event streams through the engine:
//!
//! - **Sources:** recorded JSONL files, in-memory event lists, and live
//!   evdev devices on Linux
//! - **Pipeline:** routes each raw event into the engine and collects the
//!   canonical output
//! - **Writer:** JSONL or symbolic text output
//!
//! Streams are written append-only, one event per line.

pub mod backends;
pub mod pipeline;
pub mod writer;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use touchslot_common::TouchslotResult;
use touchslot_event_model::codes::{EV_SYN, SYN_REPORT};
use touchslot_event_model::InputEvent;

pub use pipeline::Pipeline;
pub use writer::{EventWriter, OutputFormat};

/// A stream of raw driver events.
pub trait EventSource {
    /// Next raw event, or `None` once the stream has ended.
    fn poll(&mut self) -> TouchslotResult<Option<InputEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Counters reported when a replay ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events_in: u64,
    pub events_out: u64,
    pub frames: u64,
    /// Raw events the engine rejected.
    pub rejected: u64,
}

/// Runs a source through a pipeline into a writer.
pub struct Replayer<W: Write> {
    source: Box<dyn EventSource>,
    pipeline: Pipeline,
    writer: EventWriter<W>,
    stop_flag: Arc<AtomicBool>,
    max_frames: Option<u64>,
    stats: ReplayStats,
}

impl<W: Write> Replayer<W> {
    pub fn new(source: Box<dyn EventSource>, pipeline: Pipeline, writer: EventWriter<W>) -> Self {
        Self {
            source,
            pipeline,
            writer,
            stop_flag: Arc::new(AtomicBool::new(false)),
            max_frames: None,
            stats: ReplayStats::default(),
        }
    }

    /// Stop after `frames` frames have been written.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Run until the source ends, the frame limit is reached or the stop
    /// flag is set.
    pub fn run(&mut self) -> TouchslotResult<ReplayStats> {
        tracing::info!(source = %self.source.name(), "Replay started");

        while !self.stop_flag.load(Ordering::Relaxed) {
            let Some(event) = self.source.poll()? else {
                break;
            };
            self.stats.events_in += 1;

            if let Err(e) = self.pipeline.process(event) {
                self.stats.rejected += 1;
                tracing::warn!(error = %e, %event, "Rejected raw event");
            }
            for out in self.pipeline.drain() {
                self.writer.write_event(&out)?;
                self.stats.events_out += 1;
            }

            if event.is(EV_SYN, SYN_REPORT) {
                self.stats.frames += 1;
                if self.max_frames.is_some_and(|max| self.stats.frames >= max) {
                    break;
                }
            }
        }

        self.writer.flush()?;
        tracing::info!(
            events_in = self.stats.events_in,
            events_out = self.stats.events_out,
            frames = self.stats.frames,
            rejected = self.stats.rejected,
            "Replay stopped"
        );
        Ok(self.stats)
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Hand back the writer, flushed.
    pub fn into_writer(self) -> TouchslotResult<W> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::VecSource;
    use touchslot_common::DeviceConfig;
    use touchslot_event_model::codes::*;

    fn device() -> DeviceConfig {
        DeviceConfig {
            st_compat: false,
            ..DeviceConfig::default()
        }
    }

    fn frames(count: usize) -> Vec<InputEvent> {
        (0..count)
            .flat_map(|i| {
                [
                    InputEvent::abs(ABS_MT_SLOT, 0),
                    InputEvent::abs(ABS_MT_TRACKING_ID, 1),
                    InputEvent::abs(ABS_MT_POSITION_X, i as i32),
                    InputEvent::syn_report(),
                ]
            })
            .collect()
    }

    fn replayer(events: Vec<InputEvent>) -> Replayer<Vec<u8>> {
        Replayer::new(
            Box::new(VecSource::new(events)),
            Pipeline::from_device_config(&device()).unwrap(),
            EventWriter::new(Vec::new(), OutputFormat::Jsonl),
        )
    }

    #[test]
    fn test_replay_counts_frames() {
        let mut replayer = replayer(frames(3));
        let stats = replayer.run().unwrap();
        assert_eq!(stats.events_in, 12);
        assert_eq!(stats.events_out, 12);
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.rejected, 0);

        let written = String::from_utf8(replayer.into_writer().unwrap()).unwrap();
        assert_eq!(written.lines().count(), 12);
    }

    #[test]
    fn test_frame_limit_stops_early() {
        let mut replayer = replayer(frames(5)).with_frame_limit(2);
        let stats = replayer.run().unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.events_in, 8);
    }

    #[test]
    fn test_stop_flag_prevents_run() {
        let mut replayer = replayer(frames(2));
        replayer.stop();
        assert!(replayer.stop_flag().load(Ordering::SeqCst));
        assert_eq!(replayer.run().unwrap(), ReplayStats::default());
    }

    #[test]
    fn test_rejected_events_are_skipped() {
        let mut events = vec![InputEvent::abs(ABS_MT_SLOT, 42)];
        events.extend(frames(1));
        let mut replayer = replayer(events);
        let stats = replayer.run().unwrap();
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.frames, 1);
        assert_eq!(replayer.pipeline().engine().touch_count(), 1);
    }
}
