use std::sync::Arc;

use parking_lot::Mutex;

use crate::frame::Frame;

/// What a capture worker last published for its source.
///
/// `Unavailable` means the most recent capture attempt failed; it is distinct
/// from a slot that has never been published to at all ("absent", surfaced as
/// `None` from [`LatestSlot::latest`]).
#[derive(Clone, Debug)]
pub enum SlotValue {
    Live(Arc<Frame>),
    Unavailable,
}

impl SlotValue {
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            SlotValue::Live(f) => Some(f),
            SlotValue::Unavailable => None,
        }
    }
}

/// Single-value mailbox holding the most recent publication for one source.
///
/// Publishing always overwrites; an unread value is silently dropped. This is
/// the pipeline's entire backpressure story: a producer outpacing the display
/// loses intermediate frames instead of queueing them. Reads are
/// non-consuming, so the display loop may observe the same frame on
/// consecutive ticks. Safe for one writer and one reader without any
/// caller-side locking.
#[derive(Debug, Default)]
pub struct LatestSlot {
    value: Mutex<Option<SlotValue>>,
}

impl LatestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current value unconditionally. Never blocks beyond the
    /// uncontended lock hold of the concurrent reader.
    pub fn publish(&self, value: SlotValue) {
        *self.value.lock() = Some(value);
    }

    /// Returns the current value, or `None` if nothing was ever published.
    pub fn latest(&self) -> Option<SlotValue> {
        self.value.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(w: u32, h: u32) -> SlotValue {
        SlotValue::Live(Arc::new(Frame::black(w, h)))
    }

    #[test]
    fn unpublished_slot_is_absent() {
        let slot = LatestSlot::new();
        assert!(slot.latest().is_none());
    }

    #[test]
    fn absent_is_distinct_from_unavailable() {
        let slot = LatestSlot::new();
        slot.publish(SlotValue::Unavailable);
        assert!(matches!(slot.latest(), Some(SlotValue::Unavailable)));
    }

    #[test]
    fn publish_overwrites_unread_value() {
        let slot = LatestSlot::new();
        slot.publish(live(1, 1));
        slot.publish(live(2, 1));
        slot.publish(live(3, 1));
        match slot.latest() {
            Some(SlotValue::Live(f)) => assert_eq!(f.width, 3),
            other => panic!("expected the newest frame, got {other:?}"),
        }
    }

    #[test]
    fn unavailable_replaces_a_live_frame() {
        let slot = LatestSlot::new();
        slot.publish(live(4, 4));
        slot.publish(SlotValue::Unavailable);
        assert!(matches!(slot.latest(), Some(SlotValue::Unavailable)));
    }

    #[test]
    fn reads_are_non_consuming() {
        let slot = LatestSlot::new();
        slot.publish(live(2, 2));
        assert!(slot.latest().is_some());
        assert!(slot.latest().is_some());
    }

    #[test]
    fn stale_values_never_resurface() {
        // After the k-th publish the reader sees the k-th value or newer.
        let slot = Arc::new(LatestSlot::new());
        let writer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for w in 1..=100u32 {
                    slot.publish(live(w, 1));
                }
            })
        };

        let mut last_seen = 0u32;
        for _ in 0..1000 {
            if let Some(SlotValue::Live(f)) = slot.latest() {
                assert!(f.width >= last_seen, "observed width went backwards");
                last_seen = f.width;
            }
        }
        writer.join().unwrap();
        match slot.latest() {
            Some(SlotValue::Live(f)) => assert_eq!(f.width, 100),
            other => panic!("expected final frame, got {other:?}"),
        }
    }
}
