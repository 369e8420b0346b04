//! Pointer and touch events in canvas coordinates.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event after touch normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => position,
        }
    }
}

/// Raw input from the host, positions relative to the canvas origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp { position: Point },
    /// Pointer left the canvas; ends any gesture.
    PointerLeave,
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    /// Lifted touches carry no position.
    TouchEnd,
}

impl InputEvent {
    /// Normalize to a pointer event. Touches follow the first contact point;
    /// events without a position reuse `last_position`.
    pub fn to_pointer(&self, last_position: Point) -> Option<PointerEvent> {
        match self {
            InputEvent::PointerDown { position } => Some(PointerEvent::Down { position: *position }),
            InputEvent::PointerMove { position } => Some(PointerEvent::Move { position: *position }),
            InputEvent::PointerUp { position } => Some(PointerEvent::Up { position: *position }),
            InputEvent::PointerLeave | InputEvent::TouchEnd => {
                Some(PointerEvent::Up { position: last_position })
            }
            InputEvent::TouchStart { touches } => touches
                .first()
                .map(|&position| PointerEvent::Down { position }),
            InputEvent::TouchMove { touches } => touches
                .first()
                .map(|&position| PointerEvent::Move { position }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_uses_first_contact() {
        let event = InputEvent::TouchStart {
            touches: vec![Point::new(1.0, 2.0), Point::new(9.0, 9.0)],
        };
        assert_eq!(
            event.to_pointer(Point::ZERO),
            Some(PointerEvent::Down { position: Point::new(1.0, 2.0) })
        );
        assert_eq!(InputEvent::TouchMove { touches: vec![] }.to_pointer(Point::ZERO), None);
    }

    #[test]
    fn test_end_events_reuse_last_position() {
        let last = Point::new(4.0, 5.0);
        assert_eq!(InputEvent::TouchEnd.to_pointer(last), Some(PointerEvent::Up { position: last }));
        assert_eq!(InputEvent::PointerLeave.to_pointer(last), Some(PointerEvent::Up { position: last }));
    }

    #[test]
    fn test_deserialize_event() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"pointer_down","position":{"x":3.0,"y":4.0}}"#).unwrap();
        assert_eq!(event, InputEvent::PointerDown { position: Point::new(3.0, 4.0) });
    }
}
