//! Raw event routing around one engine instance.

use touchslot_common::{DeviceConfig, TouchslotResult};
use touchslot_event_model::codes::{self, EV_ABS, EV_SYN, SYN_DROPPED, SYN_MT_REPORT, SYN_REPORT};
use touchslot_event_model::event::TimestampUs;
use touchslot_event_model::InputEvent;
use touchslot_mt::compat;
use touchslot_mt::{Disposition, EventSink, MtEngine};

/// Feeds a raw driver stream through an [`MtEngine`] into a sink.
///
/// - in tracking mode every event is first offered to the engine's recorder
/// - `SYN_REPORT` closes the frame and is forwarded after the frame output
/// - `SYN_DROPPED` discards the partially recorded frame
/// - other multi-touch events are applied directly
/// - everything else passes through, except legacy single-touch events
///   while the engine regenerates them
///
/// Every emitted event carries the timestamp of the raw event that caused it.
pub struct Pipeline<S: EventSink = Vec<InputEvent>> {
    engine: MtEngine,
    sink: S,
    frames: u64,
}

impl Pipeline<Vec<InputEvent>> {
    /// A pipeline buffering its output; see [`Pipeline::drain`].
    pub fn buffered(engine: MtEngine) -> Self {
        Self::new(engine, Vec::new())
    }

    pub fn from_device_config(device: &DeviceConfig) -> TouchslotResult<Self> {
        Ok(Self::buffered(MtEngine::from_device_config(device)?))
    }

    /// Take everything emitted so far.
    pub fn drain(&mut self) -> std::vec::Drain<'_, InputEvent> {
        self.sink.drain(..)
    }
}

impl<S: EventSink> Pipeline<S> {
    pub fn new(engine: MtEngine, sink: S) -> Self {
        Self {
            engine,
            sink,
            frames: 0,
        }
    }

    pub fn engine(&self) -> &MtEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Frames closed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Route one raw event.
    pub fn process(&mut self, event: InputEvent) -> TouchslotResult<()> {
        let mut out = Stamped {
            sink: &mut self.sink,
            time_us: event.time_us,
        };

        if event.event_type == EV_SYN {
            match event.code {
                SYN_REPORT => {
                    self.engine.sync_frame(&mut out);
                    out.emit(event);
                    self.frames += 1;
                    return Ok(());
                }
                SYN_DROPPED => {
                    tracing::warn!(time_us = event.time_us, "events dropped, discarding frame");
                    self.engine.discard_frame();
                    return Ok(());
                }
                _ => {}
            }
        }

        if self.engine.is_tracking() {
            if self.engine.record_event(&event)? == Disposition::Consumed {
                return Ok(());
            }
        } else if is_mt_event(&event) {
            return self.engine.send_event(&mut out, event);
        }

        if self.engine.config().st_compat && compat::is_compat_event(&event) {
            tracing::trace!(%event, "device legacy event replaced by echo");
            return Ok(());
        }
        out.emit(event);
        Ok(())
    }
}

fn is_mt_event(event: &InputEvent) -> bool {
    event.is(EV_SYN, SYN_MT_REPORT) || (event.event_type == EV_ABS && codes::is_mt_code(event.code))
}

/// Forwards to the inner sink, stamping each event with one timestamp.
struct Stamped<'a, S: ?Sized> {
    sink: &'a mut S,
    time_us: TimestampUs,
}

impl<S: EventSink + ?Sized> EventSink for Stamped<'_, S> {
    fn emit(&mut self, event: InputEvent) {
        self.sink.emit(event.at(self.time_us));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchslot_common::MtProtocol;
    use touchslot_event_model::codes::*;

    fn type_b_device() -> DeviceConfig {
        DeviceConfig {
            keep_tracking_ids: true,
            st_compat: false,
            ..DeviceConfig::default()
        }
    }

    #[test]
    fn test_sync_report_follows_frame_output() {
        let mut pipeline = Pipeline::from_device_config(&type_b_device()).unwrap();
        for event in [
            InputEvent::abs(ABS_MT_SLOT, 1).at(10),
            InputEvent::abs(ABS_MT_TRACKING_ID, 3).at(10),
            InputEvent::abs(ABS_MT_POSITION_X, 7).at(11),
            InputEvent::syn_report().at(12),
        ] {
            pipeline.process(event).unwrap();
        }

        let out: Vec<InputEvent> = pipeline.drain().collect();
        assert_eq!(out.len(), 4);
        assert_eq!(out[3], InputEvent::syn_report().at(12));
        assert_eq!(out[2].time_us, 11);
        assert_eq!(pipeline.frames(), 1);
        assert_eq!(pipeline.engine().touch_count(), 1);
    }

    #[test]
    fn test_legacy_events_dropped_while_echoing() {
        let device = DeviceConfig {
            st_compat: true,
            ..type_b_device()
        };
        let mut pipeline = Pipeline::from_device_config(&device).unwrap();
        pipeline.process(InputEvent::abs(ABS_X, 100)).unwrap();
        pipeline.process(InputEvent::key(BTN_TOUCH, true)).unwrap();
        assert_eq!(pipeline.drain().count(), 0);

        pipeline.process(InputEvent::syn_report()).unwrap();
        let out: Vec<InputEvent> = pipeline.drain().collect();
        assert_eq!(out.first(), Some(&InputEvent::key(BTN_TOUCH, false)));
        assert_eq!(out.last(), Some(&InputEvent::syn_report()));
    }

    #[test]
    fn test_tracking_consumes_contact_events() {
        let device = DeviceConfig {
            protocol: MtProtocol::TypeA,
            track: true,
            st_compat: false,
            ..DeviceConfig::default()
        };
        let mut pipeline = Pipeline::from_device_config(&device).unwrap();
        pipeline.process(InputEvent::abs(ABS_MT_POSITION_X, 5)).unwrap();
        pipeline.process(InputEvent::syn_mt_report()).unwrap();
        assert_eq!(pipeline.drain().count(), 0);

        pipeline.process(InputEvent::syn_report().at(40)).unwrap();
        let out: Vec<InputEvent> = pipeline.drain().collect();
        assert_eq!(out[0], InputEvent::abs(ABS_MT_SLOT, 0).at(40));
        assert!(out.contains(&InputEvent::abs(ABS_MT_POSITION_X, 5).at(40)));
    }

    #[test]
    fn test_dropped_events_discard_frame() {
        let device = DeviceConfig {
            track: true,
            st_compat: false,
            ..DeviceConfig::default()
        };
        let mut pipeline = Pipeline::from_device_config(&device).unwrap();
        pipeline.process(InputEvent::abs(ABS_MT_SLOT, 0)).unwrap();
        pipeline.process(InputEvent::abs(ABS_MT_POSITION_X, 5)).unwrap();
        pipeline
            .process(InputEvent::new(EV_SYN, SYN_DROPPED, 0))
            .unwrap();
        pipeline.process(InputEvent::syn_report()).unwrap();

        let out: Vec<InputEvent> = pipeline.drain().collect();
        assert_eq!(out, vec![InputEvent::syn_report()]);
    }

    #[test]
    fn test_protocol_errors_surface() {
        let mut pipeline = Pipeline::from_device_config(&type_b_device()).unwrap();
        assert!(pipeline.process(InputEvent::abs(ABS_MT_SLOT, 99)).is_err());
    }
}
