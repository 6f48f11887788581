// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::scheduler::SchedulerSignals;
use easel_core::event::raw::{
    PointerSource, RawButtons, RawKeyAction, RawKeyEvent, RawPointer, RawPointerAction,
    RawPointerEvent,
};
use easel_core::{
    Event, EventProducer, KeyAction, KeyEvent, Modifiers, MouseAction, MouseButton, MouseEvent,
    Pointer, TouchAction, TouchEvent, CODED,
};
use std::sync::Arc;

/// What a raw notification turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOutcome {
    /// Number of events pushed into the queue.
    pub enqueued: usize,
    /// The scheduler is not looping and should be woken to drain the queue
    /// outside a frame.
    pub drain_requested: bool,
}

/// The pointer currently presented to the sketch as "the mouse".
#[derive(Debug, Clone, Copy)]
struct TrackedPointer {
    source: PointerSource,
    id: i32,
    button: MouseButton,
    press_x: f32,
    press_y: f32,
    moved: bool,
}

/// Converts raw host notifications into [`Event`]s and enqueues them.
///
/// Lives on the host's input thread. Of all active touch contacts exactly one
/// is emulated as the mouse: the first to go down while nothing is tracked.
/// Notifications about other contacts produce touch events only.
#[derive(Debug)]
pub struct InputNormalizer {
    producer: EventProducer,
    signals: Arc<SchedulerSignals>,
    click_slop: f32,
    tracked: Option<TrackedPointer>,
}

impl InputNormalizer {
    pub(crate) fn new(
        producer: EventProducer,
        signals: Arc<SchedulerSignals>,
        click_slop: f32,
    ) -> Self {
        Self {
            producer,
            signals,
            click_slop,
            tracked: None,
        }
    }

    /// Identity of the contact currently emulated as the mouse.
    pub fn tracked_pointer(&self) -> Option<i32> {
        self.tracked.map(|t| t.id)
    }

    /// Normalizes a raw pointer notification.
    pub fn on_raw_pointer_event(&mut self, raw: &RawPointerEvent) -> NormalizeOutcome {
        let mut events = Vec::new();

        match raw.action {
            RawPointerAction::HoverMove => {
                events.extend(self.hover(raw, MouseAction::Move));
            }
            RawPointerAction::HoverEnter => {
                events.extend(self.hover(raw, MouseAction::Enter));
            }
            RawPointerAction::HoverExit => {
                events.extend(self.hover(raw, MouseAction::Exit));
            }
            RawPointerAction::Scroll { delta } => {
                events.extend(self.wheel(raw, delta));
            }
            _ if raw.source == PointerSource::Touch => self.touch(raw, &mut events),
            _ => self.mouse(raw, &mut events),
        }

        self.push(events)
    }

    /// Normalizes a raw key notification.
    pub fn on_raw_key_event(&mut self, raw: &RawKeyEvent) -> NormalizeOutcome {
        let action = match raw.action {
            RawKeyAction::Down => KeyAction::Press,
            RawKeyAction::Up => KeyAction::Release,
        };
        let event = Event::Key(KeyEvent {
            timestamp: raw.timestamp,
            action,
            key: raw.character.unwrap_or(CODED),
            key_code: raw.key_code,
            is_auto_repeat: raw.action == RawKeyAction::Down && raw.repeat_count > 0,
            modifiers: raw.modifiers,
        });
        self.push(vec![event])
    }

    fn push(&self, events: Vec<Event>) -> NormalizeOutcome {
        let enqueued = events.len();
        for event in events {
            self.producer.enqueue(event);
        }
        NormalizeOutcome {
            enqueued,
            drain_requested: enqueued > 0 && !self.signals.is_looping(),
        }
    }

    fn touch(&mut self, raw: &RawPointerEvent, events: &mut Vec<Event>) {
        match raw.action {
            RawPointerAction::Down => {
                events.push(touch_event(raw.timestamp, TouchAction::Start, &raw.pointers, raw.modifiers));
                if let Some(contact) = raw.pointers.first() {
                    events.extend(self.press(raw, *contact));
                }
            }
            RawPointerAction::PointerDown { index } => {
                events.push(touch_event(raw.timestamp, TouchAction::Start, &raw.pointers, raw.modifiers));
                if let Some(contact) = raw.pointers.get(index) {
                    events.extend(self.press(raw, *contact));
                }
            }
            RawPointerAction::Move => {
                for sample in &raw.history {
                    events.push(touch_event(sample.timestamp, TouchAction::Move, &sample.pointers, raw.modifiers));
                }
                events.push(touch_event(raw.timestamp, TouchAction::Move, &raw.pointers, raw.modifiers));
                events.extend(self.drag(raw));
            }
            RawPointerAction::Up => {
                events.push(touch_event(raw.timestamp, TouchAction::End, &[], raw.modifiers));
                if let Some(contact) = raw.pointers.first() {
                    events.extend(self.release(raw, *contact));
                }
            }
            RawPointerAction::PointerUp { index } => {
                let lifted = raw.pointers.get(index).copied();
                let remaining: Vec<RawPointer> = raw
                    .pointers
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, p)| *p)
                    .collect();
                events.push(touch_event(raw.timestamp, TouchAction::End, &remaining, raw.modifiers));
                if let Some(contact) = lifted {
                    events.extend(self.release(raw, contact));
                }
            }
            _ => {
                events.push(touch_event(raw.timestamp, TouchAction::Cancel, &raw.pointers, raw.modifiers));
                events.extend(self.cancel(raw));
            }
        }
    }

    fn mouse(&mut self, raw: &RawPointerEvent, events: &mut Vec<Event>) {
        let Some(contact) = raw.pointers.first().copied() else {
            log::trace!("Dropping pointer notification without contacts.");
            return;
        };
        match raw.action {
            RawPointerAction::Down => events.extend(self.press(raw, contact)),
            RawPointerAction::Move => match self.drag(raw) {
                Some(drag) => events.push(drag),
                None => events.push(mouse_event(raw, MouseAction::Move, contact, None, 0)),
            },
            RawPointerAction::Up => events.extend(self.release(raw, contact)),
            RawPointerAction::Cancel => events.extend(self.cancel(raw)),
            // Mouse-class devices report a single contact.
            _ => {}
        }
    }

    fn press(&mut self, raw: &RawPointerEvent, contact: RawPointer) -> Option<Event> {
        if self.tracked.is_some() {
            return None;
        }
        let button = map_button(raw.buttons);
        self.tracked = Some(TrackedPointer {
            source: raw.source,
            id: contact.id,
            button,
            press_x: contact.x,
            press_y: contact.y,
            moved: false,
        });
        Some(mouse_event(raw, MouseAction::Press, contact, Some(button), 1))
    }

    fn drag(&mut self, raw: &RawPointerEvent) -> Option<Event> {
        let slop = self.click_slop;
        let tracked = self.tracked.as_mut().filter(|t| t.source == raw.source)?;
        let contact = raw.pointers.iter().find(|p| p.id == tracked.id).copied()?;

        let (dx, dy) = (contact.x - tracked.press_x, contact.y - tracked.press_y);
        if dx * dx + dy * dy > slop * slop {
            tracked.moved = true;
        }
        Some(mouse_event(raw, MouseAction::Drag, contact, Some(tracked.button), 0))
    }

    fn release(&mut self, raw: &RawPointerEvent, contact: RawPointer) -> Vec<Event> {
        let Some(tracked) = self.tracked.filter(|t| t.id == contact.id && t.source == raw.source) else {
            return Vec::new();
        };
        self.tracked = None;

        let mut events = vec![mouse_event(raw, MouseAction::Release, contact, Some(tracked.button), 1)];
        let (dx, dy) = (contact.x - tracked.press_x, contact.y - tracked.press_y);
        let slop = self.click_slop;
        if !tracked.moved && dx * dx + dy * dy <= slop * slop {
            events.push(mouse_event(raw, MouseAction::Click, contact, Some(tracked.button), 1));
        }
        events
    }

    fn cancel(&mut self, raw: &RawPointerEvent) -> Option<Event> {
        let tracked = self.tracked.take()?;
        let contact = raw
            .pointers
            .iter()
            .find(|p| p.id == tracked.id)
            .copied()
            .unwrap_or_else(|| RawPointer::at(tracked.id, tracked.press_x, tracked.press_y));
        Some(mouse_event(raw, MouseAction::Release, contact, Some(tracked.button), 1))
    }

    fn hover(&self, raw: &RawPointerEvent, action: MouseAction) -> Option<Event> {
        let contact = raw.pointers.first().copied()?;
        Some(mouse_event(raw, action, contact, None, 0))
    }

    fn wheel(&self, raw: &RawPointerEvent, delta: f32) -> Option<Event> {
        let contact = raw.pointers.first().copied()?;
        let mut count = delta.round() as i32;
        if count == 0 && delta != 0.0 {
            count = delta.signum() as i32;
        }
        Some(mouse_event(raw, MouseAction::Wheel, contact, None, count))
    }
}

/// Maps raw buttons to a [`MouseButton`]. A touch contact carries no
/// buttons and counts as the primary one.
fn map_button(buttons: RawButtons) -> MouseButton {
    if buttons.is_empty() || buttons == RawButtons::PRIMARY {
        MouseButton::Left
    } else if buttons == RawButtons::SECONDARY {
        MouseButton::Right
    } else if buttons == RawButtons::TERTIARY {
        MouseButton::Center
    } else {
        MouseButton::Other(buttons.bits())
    }
}

fn mouse_event(
    raw: &RawPointerEvent,
    action: MouseAction,
    contact: RawPointer,
    button: Option<MouseButton>,
    count: i32,
) -> Event {
    Event::Mouse(MouseEvent {
        timestamp: raw.timestamp,
        action,
        x: contact.x,
        y: contact.y,
        button,
        count,
        modifiers: raw.modifiers,
    })
}

fn touch_event(timestamp: u64, action: TouchAction, contacts: &[RawPointer], modifiers: Modifiers) -> Event {
    Event::Touch(TouchEvent {
        timestamp,
        action,
        pointers: contacts
            .iter()
            .map(|p| Pointer {
                id: p.id,
                x: p.x,
                y: p.y,
                size: p.size,
                pressure: p.pressure,
            })
            .collect(),
        modifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::event::raw::RawSample;
    use easel_core::EventQueue;

    fn setup(looping: bool) -> (EventQueue, InputNormalizer) {
        let queue = EventQueue::new();
        let signals = Arc::new(SchedulerSignals::new(looping));
        let normalizer = InputNormalizer::new(queue.producer(), signals, 8.0);
        (queue, normalizer)
    }

    fn drain(queue: &EventQueue) -> Vec<Event> {
        std::iter::from_fn(|| queue.drain_one().ok()).collect()
    }

    fn touch(action: RawPointerAction, pointers: Vec<RawPointer>) -> RawPointerEvent {
        RawPointerEvent {
            source: PointerSource::Touch,
            action,
            timestamp: 100,
            pointers,
            history: Vec::new(),
            buttons: RawButtons::empty(),
            modifiers: Modifiers::NONE,
        }
    }

    fn mouse_actions(events: &[Event]) -> Vec<MouseAction> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Mouse(m) => Some(m.action),
                _ => None,
            })
            .collect()
    }

    fn touch_actions(events: &[Event]) -> Vec<TouchAction> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Touch(t) => Some(t.action),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_contact_becomes_the_mouse() {
        let (queue, mut normalizer) = setup(true);
        let outcome = normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![RawPointer::at(4, 10.0, 20.0)]));

        assert_eq!(outcome.enqueued, 2);
        assert!(!outcome.drain_requested);
        assert_eq!(normalizer.tracked_pointer(), Some(4));

        let events = drain(&queue);
        assert_eq!(touch_actions(&events), vec![TouchAction::Start]);
        match &events[1] {
            Event::Mouse(m) => {
                assert_eq!(m.action, MouseAction::Press);
                assert_eq!((m.x, m.y), (10.0, 20.0));
                assert_eq!(m.button, Some(MouseButton::Left));
            }
            other => panic!("expected a mouse press, got {other:?}"),
        }
    }

    #[test]
    fn second_contact_does_not_steal_the_mouse() {
        let (queue, mut normalizer) = setup(true);
        let a = RawPointer::at(1, 0.0, 0.0);
        let b = RawPointer::at(2, 50.0, 50.0);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![a]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::PointerDown { index: 1 }, vec![a, b]));

        let events = drain(&queue);
        assert_eq!(mouse_actions(&events), vec![MouseAction::Press]);
        assert_eq!(touch_actions(&events), vec![TouchAction::Start, TouchAction::Start]);
        assert_eq!(normalizer.tracked_pointer(), Some(1));
    }

    #[test]
    fn moves_of_untracked_contacts_produce_no_mouse_events() {
        let (queue, mut normalizer) = setup(true);
        let a = RawPointer::at(1, 0.0, 0.0);
        let b = RawPointer::at(2, 50.0, 50.0);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![a]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::PointerDown { index: 1 }, vec![a, b]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::PointerUp { index: 0 }, vec![a, b]));
        drain(&queue);

        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Move, vec![RawPointer::at(2, 60.0, 60.0)]));

        let events = drain(&queue);
        assert!(mouse_actions(&events).is_empty());
        assert_eq!(touch_actions(&events), vec![TouchAction::Move]);
    }

    #[test]
    fn history_samples_expand_before_the_current_sample() {
        let (queue, mut normalizer) = setup(true);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![RawPointer::at(1, 0.0, 0.0)]));
        drain(&queue);

        let moved = touch(RawPointerAction::Move, vec![RawPointer::at(1, 30.0, 0.0)]).with_history(vec![
            RawSample { timestamp: 80, pointers: vec![RawPointer::at(1, 10.0, 0.0)] },
            RawSample { timestamp: 90, pointers: vec![RawPointer::at(1, 20.0, 0.0)] },
        ]);
        normalizer.on_raw_pointer_event(&moved);

        let events = drain(&queue);
        let xs: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                Event::Touch(t) => Some(t.pointers[0].x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![10.0, 20.0, 30.0]);
        let stamps: Vec<u64> = events.iter().map(Event::timestamp).collect();
        assert_eq!(stamps, vec![80, 90, 100, 100]);
        assert_eq!(mouse_actions(&events), vec![MouseAction::Drag]);
    }

    #[test]
    fn releasing_the_tracked_contact_releases_and_clicks() {
        let (queue, mut normalizer) = setup(true);
        let a = RawPointer::at(1, 5.0, 5.0);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![a]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Up, vec![a]));

        let events = drain(&queue);
        assert_eq!(
            mouse_actions(&events),
            vec![MouseAction::Press, MouseAction::Release, MouseAction::Click]
        );
        assert_eq!(touch_actions(&events), vec![TouchAction::Start, TouchAction::End]);
        assert_eq!(normalizer.tracked_pointer(), None);
    }

    #[test]
    fn moving_beyond_the_slop_suppresses_the_click() {
        let (queue, mut normalizer) = setup(true);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![RawPointer::at(1, 0.0, 0.0)]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Move, vec![RawPointer::at(1, 40.0, 0.0)]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Up, vec![RawPointer::at(1, 0.0, 0.0)]));

        let events = drain(&queue);
        assert_eq!(
            mouse_actions(&events),
            vec![MouseAction::Press, MouseAction::Drag, MouseAction::Release]
        );
    }

    #[test]
    fn pointer_up_reports_the_remaining_contacts() {
        let (queue, mut normalizer) = setup(true);
        let a = RawPointer::at(1, 0.0, 0.0);
        let b = RawPointer::at(2, 9.0, 9.0);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::PointerUp { index: 0 }, vec![a, b]));

        match drain(&queue).first() {
            Some(Event::Touch(t)) => {
                assert_eq!(t.action, TouchAction::End);
                assert_eq!(t.pointer_count(), 1);
                assert_eq!(t.pointers[0].id, 2);
            }
            other => panic!("expected a touch end, got {other:?}"),
        }
    }

    #[test]
    fn cancel_maps_to_touch_cancel_and_releases_the_mouse() {
        let (queue, mut normalizer) = setup(true);
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Down, vec![RawPointer::at(1, 0.0, 0.0)]));
        normalizer.on_raw_pointer_event(&touch(RawPointerAction::Cancel, vec![RawPointer::at(1, 0.0, 0.0)]));

        let events = drain(&queue);
        assert_eq!(touch_actions(&events), vec![TouchAction::Start, TouchAction::Cancel]);
        assert_eq!(mouse_actions(&events), vec![MouseAction::Press, MouseAction::Release]);
        assert_eq!(normalizer.tracked_pointer(), None);
    }

    #[test]
    fn mouse_buttons_map_to_sketch_buttons() {
        assert_eq!(map_button(RawButtons::PRIMARY), MouseButton::Left);
        assert_eq!(map_button(RawButtons::SECONDARY), MouseButton::Right);
        assert_eq!(map_button(RawButtons::TERTIARY), MouseButton::Center);
        assert_eq!(map_button(RawButtons::BACK), MouseButton::Other(8));
        assert_eq!(map_button(RawButtons::empty()), MouseButton::Left);
    }

    #[test]
    fn mouse_device_moves_and_drags() {
        let (queue, mut normalizer) = setup(true);
        let at = |action, x| {
            RawPointerEvent::single(PointerSource::Mouse, action, 0, RawPointer::at(0, x, 0.0))
                .with_buttons(RawButtons::SECONDARY)
        };
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Move, 1.0));
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Down, 1.0));
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Move, 2.0));
        normalizer.on_raw_pointer_event(&at(RawPointerAction::Up, 2.0));

        let events = drain(&queue);
        assert_eq!(
            mouse_actions(&events),
            vec![
                MouseAction::Move,
                MouseAction::Press,
                MouseAction::Drag,
                MouseAction::Release,
                MouseAction::Click
            ]
        );
        assert!(touch_actions(&events).is_empty());
        if let Event::Mouse(press) = &events[1] {
            assert_eq!(press.button, Some(MouseButton::Right));
        }
    }

    #[test]
    fn hover_and_scroll_become_mouse_events() {
        let (queue, mut normalizer) = setup(true);
        let pointer = RawPointer::at(0, 3.0, 4.0);
        normalizer.on_raw_pointer_event(&RawPointerEvent::single(PointerSource::Mouse, RawPointerAction::HoverEnter, 0, pointer));
        normalizer.on_raw_pointer_event(&RawPointerEvent::single(PointerSource::Mouse, RawPointerAction::Scroll { delta: 0.3 }, 0, pointer));
        normalizer.on_raw_pointer_event(&RawPointerEvent::single(PointerSource::Mouse, RawPointerAction::Scroll { delta: -2.0 }, 0, pointer));
        normalizer.on_raw_pointer_event(&RawPointerEvent::single(PointerSource::Mouse, RawPointerAction::HoverExit, 0, pointer));

        let events = drain(&queue);
        assert_eq!(
            mouse_actions(&events),
            vec![MouseAction::Enter, MouseAction::Wheel, MouseAction::Wheel, MouseAction::Exit]
        );
        let counts: Vec<i32> = events
            .iter()
            .filter_map(|e| match e {
                Event::Mouse(m) if m.action == MouseAction::Wheel => Some(m.count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![1, -2]);
    }

    #[test]
    fn key_events_carry_repeat_and_coded_keys() {
        let (queue, mut normalizer) = setup(true);
        normalizer.on_raw_key_event(&RawKeyEvent {
            action: RawKeyAction::Down,
            timestamp: 7,
            key_code: 38,
            character: None,
            repeat_count: 2,
            modifiers: Modifiers::SHIFT,
        });

        match drain(&queue).as_slice() {
            [Event::Key(k)] => {
                assert_eq!(k.key, CODED);
                assert_eq!(k.key_code, 38);
                assert!(k.is_auto_repeat);
                assert_eq!(k.action, KeyAction::Press);
                assert!(k.modifiers.contains(Modifiers::SHIFT));
            }
            other => panic!("expected one key event, got {other:?}"),
        }
    }

    #[test]
    fn input_while_not_looping_requests_a_drain() {
        let (_queue, mut normalizer) = setup(false);
        let outcome = normalizer.on_raw_key_event(&RawKeyEvent {
            action: RawKeyAction::Up,
            timestamp: 0,
            key_code: 65,
            character: Some('a'),
            repeat_count: 0,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(outcome, NormalizeOutcome { enqueued: 1, drain_requested: true });
    }
}
