//! Input command queue
//!
//! Host event handlers only push raw `InputEvent`s. Once per frame the queue
//! is folded into an `InputIntent`, which is all the simulation ever sees.

use std::collections::VecDeque;

/// Raw input as reported by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PressLeft,
    ReleaseLeft,
    PressRight,
    ReleaseRight,
    PressJump,
    ReleaseJump,
    /// Pointer/touch went down at screen-space x
    PointerDown { x: f32 },
    PointerUp,
}

/// Continuous steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    Right,
    #[default]
    None,
}

impl Steer {
    /// -1, 0 or +1
    pub fn axis(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::Right => 1.0,
            Steer::None => 0.0,
        }
    }
}

/// Discrete lane change command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneShift {
    Left,
    Right,
}

impl LaneShift {
    pub fn delta(self) -> isize {
        match self {
            LaneShift::Left => -1,
            LaneShift::Right => 1,
        }
    }
}

/// What the player wants this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputIntent {
    /// Held direction (free movement)
    pub steer: Steer,
    /// Edge-triggered lane change (lane movement); the first press of the frame wins
    pub lane_shift: Option<LaneShift>,
    /// Jump held (free movement)
    pub jump: bool,
}

/// Which half of the screen a pointer is held on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerZone {
    Left,
    Right,
}

/// Pending events plus the held state they leave behind
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: VecDeque<InputEvent>,
    left_held: bool,
    right_held: bool,
    jump_held: bool,
    pointer: Option<PointerZone>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget held keys and queued events (focus lost, restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fold everything queued since the last frame into an intent.
    ///
    /// Pointer x below half of `viewport_width` counts as left.
    pub fn drain(&mut self, viewport_width: f32) -> InputIntent {
        let mut lane_shift = None;

        while let Some(event) = self.pending.pop_front() {
            let shift = match event {
                InputEvent::PressLeft => {
                    self.left_held = true;
                    Some(LaneShift::Left)
                }
                InputEvent::ReleaseLeft => {
                    self.left_held = false;
                    None
                }
                InputEvent::PressRight => {
                    self.right_held = true;
                    Some(LaneShift::Right)
                }
                InputEvent::ReleaseRight => {
                    self.right_held = false;
                    None
                }
                InputEvent::PressJump => {
                    self.jump_held = true;
                    None
                }
                InputEvent::ReleaseJump => {
                    self.jump_held = false;
                    None
                }
                InputEvent::PointerDown { x } => {
                    let zone = if x < viewport_width / 2.0 {
                        PointerZone::Left
                    } else {
                        PointerZone::Right
                    };
                    self.pointer = Some(zone);
                    Some(match zone {
                        PointerZone::Left => LaneShift::Left,
                        PointerZone::Right => LaneShift::Right,
                    })
                }
                InputEvent::PointerUp => {
                    self.pointer = None;
                    None
                }
            };
            if lane_shift.is_none() {
                lane_shift = shift;
            }
        }

        let left = self.left_held || self.pointer == Some(PointerZone::Left);
        let right = self.right_held || self.pointer == Some(PointerZone::Right);
        // Right overrides left when both are held
        let steer = if right {
            Steer::Right
        } else if left {
            Steer::Left
        } else {
            Steer::None
        };

        InputIntent {
            steer,
            lane_shift,
            jump: self.jump_held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_is_neutral() {
        let mut queue = InputQueue::new();
        assert_eq!(queue.drain(800.0), InputIntent::default());
    }

    #[test]
    fn test_held_key_persists_across_frames() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PressLeft);
        let first = queue.drain(800.0);
        assert_eq!(first.steer, Steer::Left);
        assert_eq!(first.lane_shift, Some(LaneShift::Left));

        // Still held, but the lane change only triggers once
        let second = queue.drain(800.0);
        assert_eq!(second.steer, Steer::Left);
        assert_eq!(second.lane_shift, None);

        queue.push(InputEvent::ReleaseLeft);
        assert_eq!(queue.drain(800.0).steer, Steer::None);
    }

    #[test]
    fn test_right_wins_when_both_held() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PressLeft);
        queue.push(InputEvent::PressRight);
        let intent = queue.drain(800.0);
        assert_eq!(intent.steer, Steer::Right);
        assert_eq!(intent.lane_shift, Some(LaneShift::Left));
    }

    #[test]
    fn test_pointer_zones() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerDown { x: 100.0 });
        let intent = queue.drain(800.0);
        assert_eq!(intent.steer, Steer::Left);
        assert_eq!(intent.lane_shift, Some(LaneShift::Left));

        queue.push(InputEvent::PointerUp);
        queue.push(InputEvent::PointerDown { x: 400.0 });
        let intent = queue.drain(800.0);
        assert_eq!(intent.steer, Steer::Right);
        assert_eq!(intent.lane_shift, Some(LaneShift::Right));

        queue.push(InputEvent::PointerUp);
        assert_eq!(queue.drain(800.0).steer, Steer::None);
    }

    #[test]
    fn test_jump_and_clear() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PressJump);
        assert!(queue.drain(800.0).jump);
        queue.push(InputEvent::PressRight);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.drain(800.0), InputIntent::default());
    }

    #[test]
    fn test_steer_axis() {
        assert_eq!(Steer::Left.axis(), -1.0);
        assert_eq!(Steer::None.axis(), 0.0);
        assert_eq!(LaneShift::Right.delta(), 1);
    }
}
