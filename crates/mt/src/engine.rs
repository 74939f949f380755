//! Per-device multi-touch engine.
//!
//! Accepts contacts either as whole points ([`MtEngine::push_slot`],
//! [`MtEngine::push_frame`]) or as raw evdev events ([`MtEngine::record_event`]
//! in tracking mode, [`MtEngine::send_event`] otherwise) and emits canonical
//! slot-addressed events at [`MtEngine::sync_frame`].

use touchslot_common::{DeviceConfig, MtProtocol, TouchslotError, TouchslotResult};
use touchslot_event_model::codes::{ABS_MT_SLOT, EV_ABS, EV_SYN, SYN_MT_REPORT};
use touchslot_event_model::{InputEvent, MtAxis};

use crate::compat;
use crate::config::{self, MtCaps, MtConfig};
use crate::frame::FrameBuffer;
use crate::sink::EventSink;
use crate::slot_set::SlotSet;
use crate::state::{MtState, NO_CONTACT};
use crate::store::{SlotStore, TrackingIds};

/// What happened to a raw event offered to [`MtEngine::record_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Recorded for the next frame; do not forward it.
    Consumed,
    /// Not an event the engine handles; route it elsewhere.
    Forward,
}

#[derive(Debug, Clone)]
pub struct MtEngine {
    config: MtConfig,
    caps: MtCaps,
    store: SlotStore,
    ids: TrackingIds,
    /// Provisional records, present only in tracking mode.
    frame: Option<FrameBuffer>,
}

impl MtEngine {
    pub fn new(config: MtConfig, caps: MtCaps) -> TouchslotResult<Self> {
        caps.validate()?;
        let config = config.normalize(&caps)?;
        let slots = caps.max_slots();
        let frame = config.track.then(|| FrameBuffer::new(slots));

        tracing::debug!(
            slots,
            protocol = ?config.protocol,
            track = config.track,
            keep_tracking_ids = config.keep_tracking_ids,
            "multi-touch engine ready"
        );

        Ok(Self {
            config,
            caps,
            store: SlotStore::new(slots),
            ids: TrackingIds::default(),
            frame,
        })
    }

    pub fn from_device_config(device: &DeviceConfig) -> TouchslotResult<Self> {
        let (config, caps) = config::from_device_config(device)?;
        Self::new(config, caps)
    }

    pub fn config(&self) -> &MtConfig {
        &self.config
    }

    pub fn caps(&self) -> &MtCaps {
        &self.caps
    }

    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    pub fn max_slots(&self) -> usize {
        self.store.len()
    }

    pub fn is_tracking(&self) -> bool {
        self.frame.is_some()
    }

    /// Report one contact. `None` releases the slot (type B only).
    pub fn push_slot(
        &mut self,
        sink: &mut dyn EventSink,
        slot: usize,
        state: Option<&MtState>,
    ) -> TouchslotResult<()> {
        self.check_slot(slot)?;
        let type_a = self.config.protocol == MtProtocol::TypeA;
        if type_a && state.is_none() {
            return Err(TouchslotError::invalid_argument(
                "type A contacts cannot be released individually",
            ));
        }

        let Some(frame) = self.frame.as_mut() else {
            self.send_slot(sink, slot, state);
            return Ok(());
        };
        match state {
            Some(state) if type_a => {
                frame.stage(state);
                frame.finish_contact();
            }
            Some(state) => {
                frame.select(slot);
                frame.stage(state);
            }
            None => {
                frame.select(slot);
                frame.discard_current();
            }
        }
        Ok(())
    }

    /// Report every contact of one frame at once.
    ///
    /// Points carry driver-level tracking ids; in tracking mode those are
    /// ignored and contacts are matched by position at sync.
    pub fn push_frame(
        &mut self,
        sink: &mut dyn EventSink,
        points: &[MtState],
    ) -> TouchslotResult<()> {
        if points.len() > self.max_slots() {
            return Err(TouchslotError::invalid_argument(format!(
                "{} contacts in one frame, device has {} slots",
                points.len(),
                self.max_slots()
            )));
        }
        let Some(frame) = self.frame.as_mut() else {
            self.send_frame(sink, points);
            return Ok(());
        };
        frame.load(points);
        Ok(())
    }

    /// Record a raw event into the provisional frame (tracking mode).
    pub fn record_event(&mut self, event: &InputEvent) -> TouchslotResult<Disposition> {
        let protocol = self.config.protocol;
        let slots = self.max_slots();
        let Some(frame) = self.frame.as_mut() else {
            return Ok(Disposition::Forward);
        };

        if event.is(EV_SYN, SYN_MT_REPORT) {
            if protocol != MtProtocol::TypeA {
                return Err(TouchslotError::protocol(
                    "SYN_MT_REPORT from a slot-addressed device",
                ));
            }
            frame.finish_contact();
            return Ok(Disposition::Consumed);
        }
        if event.event_type != EV_ABS {
            return Ok(Disposition::Forward);
        }
        if event.code == ABS_MT_SLOT {
            if protocol != MtProtocol::TypeB {
                return Err(TouchslotError::protocol("ABS_MT_SLOT from a type A device"));
            }
            let slot = slot_index(event.value, slots)?;
            frame.select(slot);
            return Ok(Disposition::Consumed);
        }
        let Some(axis) = MtAxis::from_code(event.code) else {
            return Ok(Disposition::Forward);
        };

        frame.write(axis, event.value);
        if axis == MtAxis::TrackingId
            && event.value == NO_CONTACT
            && protocol == MtProtocol::TypeB
        {
            frame.discard_current();
        }
        Ok(Disposition::Consumed)
    }

    /// Apply and emit one raw event outside tracking mode.
    ///
    /// Slot selections and per-contact values update the slot store; a
    /// tracking id is replaced by the engine's own id unless ids are kept.
    pub fn send_event(
        &mut self,
        sink: &mut dyn EventSink,
        event: InputEvent,
    ) -> TouchslotResult<()> {
        if self.is_tracking() {
            return Err(TouchslotError::protocol(
                "raw events must be recorded while re-matching contacts",
            ));
        }
        if event.is(EV_ABS, ABS_MT_SLOT) {
            if !self.config.keeps_slot_state() {
                return Err(TouchslotError::protocol("ABS_MT_SLOT from a type A device"));
            }
            slot_index(event.value, self.max_slots())?;
        }
        if event.is(EV_SYN, SYN_MT_REPORT) && self.config.protocol == MtProtocol::TypeB {
            return Err(TouchslotError::protocol("SYN_MT_REPORT from a type B device"));
        }
        self.apply_event(sink, event);
        Ok(())
    }

    fn apply_event(&mut self, sink: &mut dyn EventSink, mut event: InputEvent) {
        if self.config.keeps_slot_state() && event.event_type == EV_ABS {
            if event.code == ABS_MT_SLOT {
                self.store.set_last_slot(event.value as usize);
            } else if let Some(axis) = MtAxis::from_code(event.code) {
                let slot = self.store.last_slot();
                if axis == MtAxis::TrackingId {
                    event.value = self.assign_id(slot, event.value);
                }
                self.store.set_value(slot, axis, event.value);
                self.store.mark_frame(slot);
            }
        }
        sink.emit(event);
    }

    fn send_slot(&mut self, sink: &mut dyn EventSink, slot: usize, state: Option<&MtState>) {
        if self.config.keeps_slot_state() {
            self.apply_event(sink, InputEvent::abs(ABS_MT_SLOT, slot as i32));
            let Some(state) = state else {
                self.apply_event(sink, InputEvent::abs(MtAxis::TrackingId.code(), NO_CONTACT));
                return;
            };
            self.send_values(sink, state);
        } else if let Some(state) = state {
            self.send_values(sink, state);
            sink.emit(InputEvent::syn_mt_report());
        }
    }

    fn send_values(&mut self, sink: &mut dyn EventSink, state: &MtState) {
        for axis in MtAxis::ALL {
            if self.caps.supports(axis) {
                self.apply_event(sink, InputEvent::abs(axis.code(), state[axis]));
            }
        }
    }

    /// Commit points to slots. A point whose id names an active contact
    /// continues that slot; any other point takes the first slot that is
    /// neither active nor already used in this frame.
    ///
    /// Continuing contacts are placed first, so an id minted for an
    /// anonymous point can never capture another point of the same frame.
    fn send_frame(&mut self, sink: &mut dyn EventSink, points: &[MtState]) {
        if !self.config.keeps_slot_state() {
            for point in points {
                self.send_slot(sink, 0, Some(point));
            }
            return;
        }

        // Indexes into `points`, bounded by the slot count.
        let mut placed = SlotSet::new();
        for (index, point) in points.iter().enumerate() {
            if point.tracking_id() == NO_CONTACT {
                continue;
            }
            if let Some(slot) = self.store.id_to_slot(point.tracking_id()) {
                placed.insert(index);
                self.commit_point(sink, slot, *point);
            }
        }

        for (index, point) in points.iter().enumerate() {
            if placed.contains(index) {
                continue;
            }
            let Some(slot) = self.store.first_free() else {
                tracing::trace!(id = point.tracking_id(), "no free slot, contact dropped");
                continue;
            };
            let mut point = *point;
            if point.tracking_id() == NO_CONTACT {
                point.set_tracking_id(self.anonymous_id(slot, points));
            }
            self.commit_point(sink, slot, point);
        }
    }

    /// Driver id for a contact nobody named: the slot index, unless an
    /// active contact or another point of the frame already carries it.
    fn anonymous_id(&self, slot: usize, points: &[MtState]) -> i32 {
        let taken = |id: i32| {
            self.store.id_to_slot(id).is_some() || points.iter().any(|p| p.tracking_id() == id)
        };
        let mut id = slot as i32;
        while taken(id) {
            id += 1;
        }
        id
    }

    fn commit_point(&mut self, sink: &mut dyn EventSink, slot: usize, point: MtState) {
        tracing::trace!(slot, id = point.tracking_id(), "contact committed");
        self.store.mark_frame(slot);
        self.send_slot(sink, slot, Some(&point));
    }

    /// Close the current frame: commit recorded contacts, release stale
    /// slots and echo the single-touch view.
    pub fn sync_frame(&mut self, sink: &mut dyn EventSink) {
        if let Some(mut frame) = self.frame.take() {
            frame.compact();
            frame.correlate(&self.store);
            self.send_frame(sink, frame.points());
            frame.reset();
            self.frame = Some(frame);
        }

        if self.config.autorelease {
            self.send_autorelease(sink);
        }
        if self.config.st_compat {
            compat::send_st_compat(&self.store, &self.caps, sink);
        }
        self.store.clear_frame();
    }

    /// Release every active slot that was not refreshed in this frame.
    fn send_autorelease(&mut self, sink: &mut dyn EventSink) {
        let stale = self.store.touches().difference(self.store.frame());
        for slot in stale {
            tracing::trace!(slot, "autorelease");
            self.send_slot(sink, slot, None);
        }
    }

    /// Forget everything recorded since the last sync, e.g. after the
    /// kernel reported dropped events.
    pub fn discard_frame(&mut self) {
        if let Some(frame) = &mut self.frame {
            frame.reset();
        }
        self.store.clear_frame();
    }

    /// Translate a driver tracking id for `slot` into the id reported to
    /// consumers.
    pub fn reassign_id(&mut self, slot: usize, id: i32) -> TouchslotResult<i32> {
        self.check_slot(slot)?;
        Ok(self.assign_id(slot, id))
    }

    fn assign_id(&mut self, slot: usize, id: i32) -> i32 {
        if id == NO_CONTACT {
            self.store.set_driver_id(slot, NO_CONTACT);
            return NO_CONTACT;
        }
        if self.config.keep_tracking_ids {
            self.store.set_driver_id(slot, id);
            return id;
        }

        let current = self.store.state(slot).tracking_id();
        if current != NO_CONTACT {
            debug_assert_eq!(
                self.store.driver_id(slot),
                id,
                "slot {slot} changed contact without a release"
            );
            return current;
        }

        self.store.set_driver_id(slot, id);
        let minted = self.ids.mint(&self.store);
        tracing::debug!(slot, driver_id = id, tracking_id = minted, "new contact");
        minted
    }

    /// Active slot whose contact has the given driver tracking id.
    pub fn id_to_slot(&self, id: i32) -> Option<usize> {
        self.store.id_to_slot(id)
    }

    pub fn last_slot(&self) -> usize {
        self.store.last_slot()
    }

    pub fn set_last_slot(&mut self, slot: usize) -> TouchslotResult<()> {
        self.check_slot(slot)?;
        self.store.set_last_slot(slot);
        Ok(())
    }

    pub fn value(&self, slot: usize, axis: MtAxis) -> Option<i32> {
        (slot < self.max_slots()).then(|| self.store.value(slot, axis))
    }

    /// Overwrite one stored value without emitting anything.
    pub fn set_value(&mut self, slot: usize, axis: MtAxis, value: i32) -> TouchslotResult<()> {
        self.check_slot(slot)?;
        self.store.set_value(slot, axis, value);
        Ok(())
    }

    pub fn state(&self, slot: usize) -> Option<&MtState> {
        (slot < self.max_slots()).then(|| self.store.state(slot))
    }

    pub fn touches(&self) -> SlotSet {
        self.store.touches()
    }

    pub fn touch_count(&self) -> usize {
        self.store.touches().len()
    }

    fn check_slot(&self, slot: usize) -> TouchslotResult<()> {
        if slot >= self.max_slots() {
            return Err(TouchslotError::invalid_argument(format!(
                "slot {slot} out of range, device has {} slots",
                self.max_slots()
            )));
        }
        Ok(())
    }
}

fn slot_index(value: i32, slots: usize) -> TouchslotResult<usize> {
    usize::try_from(value)
        .ok()
        .filter(|&slot| slot < slots)
        .ok_or_else(|| {
            TouchslotError::invalid_argument(format!(
                "ABS_MT_SLOT {value} out of range, device has {slots} slots"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AbsRange;
    use touchslot_event_model::codes::{
        ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_TRACKING_ID, BTN_TOUCH, EV_KEY,
        SYN_REPORT,
    };

    fn caps(slots: usize) -> MtCaps {
        MtCaps::new(slots)
            .with_axis(MtAxis::PositionX, AbsRange::new(0, 1000))
            .with_axis(MtAxis::PositionY, AbsRange::new(0, 1000))
    }

    fn engine(config: MtConfig) -> MtEngine {
        MtEngine::new(config, caps(4)).unwrap()
    }

    fn type_b() -> MtConfig {
        MtConfig {
            protocol: MtProtocol::TypeB,
            ..MtConfig::default()
        }
    }

    fn slot_of(events: &[InputEvent], id: i32) -> Option<i32> {
        let mut slot = None;
        for event in events {
            if event.is(EV_ABS, ABS_MT_SLOT) {
                slot = Some(event.value);
            }
            if event.is(EV_ABS, ABS_MT_TRACKING_ID) && event.value == id {
                return slot;
            }
        }
        None
    }

    #[test]
    fn test_push_slot_emits_slot_then_values() {
        let mut engine = engine(type_b());
        let mut out: Vec<InputEvent> = Vec::new();
        engine
            .push_slot(&mut out, 1, Some(&MtState::at(3, 4).with_tracking_id(9)))
            .unwrap();

        assert_eq!(
            out,
            vec![
                InputEvent::abs(ABS_MT_SLOT, 1),
                InputEvent::abs(ABS_MT_POSITION_X, 3),
                InputEvent::abs(ABS_MT_POSITION_Y, 4),
                InputEvent::abs(ABS_MT_TRACKING_ID, 0),
            ]
        );
        assert_eq!(engine.touches().iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(engine.id_to_slot(9), Some(1));
        assert_eq!(engine.last_slot(), 1);
    }

    #[test]
    fn test_push_slot_rejects_out_of_range() {
        let mut engine = engine(type_b());
        let mut out: Vec<InputEvent> = Vec::new();
        let err = engine.push_slot(&mut out, 4, None).unwrap_err();
        assert!(matches!(err, TouchslotError::InvalidArgument { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_push_frame_rejects_oversized_frame() {
        let mut engine = engine(type_b());
        let points = vec![MtState::at(0, 0); 5];
        assert!(engine.push_frame(&mut Vec::<InputEvent>::new(), &points).is_err());
    }

    #[test]
    fn test_type_a_release_is_invalid() {
        let config = MtConfig {
            protocol: MtProtocol::TypeA,
            ..MtConfig::default()
        };
        let mut engine = engine(config);
        assert!(engine.push_slot(&mut Vec::<InputEvent>::new(), 0, None).is_err());
    }

    #[test]
    fn test_type_a_passthrough_emits_anonymous_list() {
        let config = MtConfig {
            protocol: MtProtocol::TypeA,
            ..MtConfig::default()
        };
        let mut engine = engine(config);
        let mut out: Vec<InputEvent> = Vec::new();
        engine
            .push_frame(&mut out, &[MtState::at(1, 2), MtState::at(5, 6)])
            .unwrap();
        engine.sync_frame(&mut out);

        assert_eq!(out.iter().filter(|e| e.is(EV_SYN, SYN_MT_REPORT)).count(), 2);
        assert!(out.iter().all(|e| !e.is(EV_ABS, ABS_MT_SLOT)));
        assert_eq!(engine.touch_count(), 0);
    }

    #[test]
    fn test_kept_ids_pass_through() {
        let config = MtConfig {
            keep_tracking_ids: true,
            ..type_b()
        };
        let mut engine = engine(config);
        let mut out: Vec<InputEvent> = Vec::new();
        engine
            .push_slot(&mut out, 2, Some(&MtState::at(0, 0).with_tracking_id(77)))
            .unwrap();
        assert_eq!(engine.value(2, MtAxis::TrackingId), Some(77));
        assert_eq!(engine.reassign_id(3, 12).unwrap(), 12);
    }

    #[test]
    fn test_reassign_keeps_id_of_live_contact() {
        let mut engine = engine(type_b());
        let first = engine.reassign_id(0, 40).unwrap();
        engine.set_value(0, MtAxis::TrackingId, first).unwrap();
        assert_eq!(engine.reassign_id(0, 40).unwrap(), first);
        assert_eq!(engine.reassign_id(1, 41).unwrap(), first + 1);
        assert_eq!(engine.reassign_id(1, NO_CONTACT).unwrap(), NO_CONTACT);
    }

    #[test]
    fn test_send_event_updates_store() {
        let mut engine = engine(type_b());
        let mut out: Vec<InputEvent> = Vec::new();
        for event in [
            InputEvent::abs(ABS_MT_SLOT, 3),
            InputEvent::abs(ABS_MT_TRACKING_ID, 500),
            InputEvent::abs(ABS_MT_POSITION_X, 42),
        ] {
            engine.send_event(&mut out, event).unwrap();
        }

        assert_eq!(engine.last_slot(), 3);
        assert_eq!(engine.value(3, MtAxis::PositionX), Some(42));
        assert_eq!(engine.value(3, MtAxis::TrackingId), Some(0));
        assert_eq!(out[1], InputEvent::abs(ABS_MT_TRACKING_ID, 0));
        assert!(engine
            .send_event(&mut out, InputEvent::abs(ABS_MT_SLOT, 9))
            .is_err());
    }

    #[test]
    fn test_send_event_rejects_foreign_protocol() {
        let mut engine = engine(type_b());
        let mut out: Vec<InputEvent> = Vec::new();
        let err = engine
            .send_event(&mut out, InputEvent::syn_mt_report())
            .unwrap_err();
        assert!(matches!(err, TouchslotError::Protocol { .. }));

        let mut type_a = self::engine(MtConfig {
            protocol: MtProtocol::TypeA,
            ..MtConfig::default()
        });
        type_a
            .send_event(&mut out, InputEvent::syn_mt_report())
            .unwrap();
        assert!(type_a
            .send_event(&mut out, InputEvent::abs(ABS_MT_SLOT, 0))
            .is_err());
        assert_eq!(out, vec![InputEvent::syn_mt_report()]);
    }

    #[test]
    fn test_send_event_refused_while_tracking() {
        let mut engine = engine(MtConfig {
            track: true,
            ..type_b()
        });
        let mut out: Vec<InputEvent> = Vec::new();
        let err = engine
            .send_event(&mut out, InputEvent::abs(ABS_MT_POSITION_X, 5))
            .unwrap_err();
        assert!(matches!(err, TouchslotError::Protocol { .. }));
        assert!(out.is_empty());
        assert_eq!(engine.touch_count(), 0);
    }

    #[test]
    fn test_anonymous_point_does_not_capture_driver_id() {
        let mut engine = engine(MtConfig {
            keep_tracking_ids: true,
            ..type_b()
        });
        let mut out: Vec<InputEvent> = Vec::new();
        engine
            .push_frame(
                &mut out,
                &[MtState::at(1, 1), MtState::at(900, 900).with_tracking_id(0)],
            )
            .unwrap();
        engine.sync_frame(&mut out);

        assert_eq!(engine.touch_count(), 2);
        let xs: Vec<i32> = engine
            .touches()
            .iter()
            .filter_map(|slot| engine.value(slot, MtAxis::PositionX))
            .collect();
        assert_eq!(xs, vec![1, 900]);
        assert_eq!(engine.value(0, MtAxis::TrackingId), Some(1));
        assert_eq!(engine.value(1, MtAxis::TrackingId), Some(0));
    }

    #[test]
    fn test_continuing_contact_keeps_slot_behind_anonymous_point() {
        let mut engine = engine(MtConfig {
            keep_tracking_ids: true,
            ..type_b()
        });
        let mut out: Vec<InputEvent> = Vec::new();
        engine
            .push_frame(&mut out, &[MtState::at(5, 5).with_tracking_id(1)])
            .unwrap();
        engine.sync_frame(&mut out);
        assert_eq!(engine.id_to_slot(1), Some(0));

        engine
            .push_frame(
                &mut out,
                &[MtState::at(7, 7), MtState::at(6, 6).with_tracking_id(1)],
            )
            .unwrap();
        engine.sync_frame(&mut out);

        assert_eq!(engine.id_to_slot(1), Some(0));
        assert_eq!(engine.value(0, MtAxis::PositionX), Some(6));
        assert_eq!(engine.value(1, MtAxis::PositionX), Some(7));
        assert_eq!(engine.value(1, MtAxis::TrackingId), Some(2));
        assert_eq!(engine.touch_count(), 2);
    }

    #[test]
    fn test_record_event_outside_tracking_forwards() {
        let mut engine = engine(type_b());
        let event = InputEvent::abs(ABS_MT_POSITION_X, 1);
        assert_eq!(engine.record_event(&event).unwrap(), Disposition::Forward);
    }

    #[test]
    fn test_record_event_protocol_mismatch() {
        let mut engine = engine(MtConfig {
            track: true,
            ..type_b()
        });
        let err = engine
            .record_event(&InputEvent::syn_mt_report())
            .unwrap_err();
        assert!(matches!(err, TouchslotError::Protocol { .. }));
        assert!(engine
            .record_event(&InputEvent::abs(ABS_MT_SLOT, -1))
            .is_err());
        assert_eq!(
            engine.record_event(&InputEvent::key(BTN_TOUCH, true)).unwrap(),
            Disposition::Forward
        );
        assert_eq!(
            engine.record_event(&InputEvent::syn_report()).unwrap(),
            Disposition::Forward
        );
    }

    #[test]
    fn test_tracking_type_a_keeps_slot_for_moving_contact() {
        let mut engine = engine(MtConfig {
            protocol: MtProtocol::TypeA,
            track: true,
            ..MtConfig::default()
        });
        let mut out: Vec<InputEvent> = Vec::new();

        for frame in [[(100, 100), (800, 800)], [(805, 795), (110, 104)]] {
            for (x, y) in frame {
                engine
                    .record_event(&InputEvent::abs(ABS_MT_POSITION_X, x))
                    .unwrap();
                engine
                    .record_event(&InputEvent::abs(ABS_MT_POSITION_Y, y))
                    .unwrap();
                engine.record_event(&InputEvent::syn_mt_report()).unwrap();
            }
            engine.sync_frame(&mut out);
        }

        assert_eq!(engine.touch_count(), 2);
        assert_eq!(engine.value(0, MtAxis::PositionX), Some(110));
        assert_eq!(engine.value(1, MtAxis::PositionX), Some(805));
        assert_eq!(slot_of(&out, 0), Some(0));
        assert_eq!(slot_of(&out, 1), Some(1));
        assert!(!out.iter().any(|e| e.is(EV_ABS, ABS_MT_TRACKING_ID) && e.value == 2));
    }

    #[test]
    fn test_discard_frame_drops_recorded_contacts() {
        let mut engine = engine(MtConfig {
            track: true,
            ..type_b()
        });
        engine.record_event(&InputEvent::abs(ABS_MT_SLOT, 0)).unwrap();
        engine
            .record_event(&InputEvent::abs(ABS_MT_POSITION_X, 5))
            .unwrap();
        engine.discard_frame();

        let mut out: Vec<InputEvent> = Vec::new();
        engine.sync_frame(&mut out);
        assert!(out.is_empty());
        assert_eq!(engine.touch_count(), 0);
    }

    #[test]
    fn test_sync_echoes_single_touch_state() {
        let mut engine = engine(MtConfig {
            st_compat: true,
            ..type_b()
        });
        let mut out: Vec<InputEvent> = Vec::new();
        engine
            .push_slot(&mut out, 0, Some(&MtState::at(10, 20).with_tracking_id(1)))
            .unwrap();
        out.clear();
        engine.sync_frame(&mut out);

        assert_eq!(out[0], InputEvent::key(BTN_TOUCH, true));
        assert!(out.iter().all(|e| e.event_type == EV_KEY || e.event_type == EV_ABS));
        assert!(!out.iter().any(|e| e.is(EV_SYN, SYN_REPORT)));
    }
}
