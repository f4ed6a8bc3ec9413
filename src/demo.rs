//! Scripted autopilot for headless runs
//!
//! Plays a level from a fixed route of steps. Each frame it reads the
//! latest [`Snapshot`] and answers with the intents that move the player
//! toward the current step, the way a held keyboard would.

use crate::sim::{Intent, Snapshot};

/// Close enough to a walk target
const WALK_TOLERANCE: f32 = 2.5;

/// One leg of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Wait until the player stands on something
    Settle,
    /// Walk until the player's centre is at `to_x`
    Walk { to_x: f32 },
    /// Jump, then steer by `drift` (-1 left, 1 right) once the player's
    /// feet are above `drift_above`. Done on landing.
    Jump { drift: f32, drift_above: f32 },
}

/// Level 1: drop to the bottom corridor for the coin and key, then hop up
/// two floors to the door
pub const LEVEL_1_ROUTE: &[Step] = &[
    Step::Settle,
    Step::Walk { to_x: 740.0 },
    Step::Jump {
        drift: -1.0,
        drift_above: 226.0,
    },
    Step::Walk { to_x: 606.0 },
    Step::Jump {
        drift: 1.0,
        drift_above: 354.0,
    },
    Step::Walk { to_x: 736.0 },
];

/// Known route for a built-in level
pub fn route(level_id: u32) -> Option<&'static [Step]> {
    match level_id {
        1 => Some(LEVEL_1_ROUTE),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpPhase {
    Ready,
    Pressed,
    Airborne,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    steps: &'static [Step],
    current: usize,
    /// Direction currently held: -1, 0 or 1
    held: f32,
    jump: JumpPhase,
}

impl Autopilot {
    pub fn new(steps: &'static [Step]) -> Self {
        Self {
            steps,
            current: 0,
            held: 0.0,
            jump: JumpPhase::Ready,
        }
    }

    /// Every step has been completed
    pub fn is_done(&self) -> bool {
        self.current >= self.steps.len()
    }

    /// Intents to send before the next frame
    pub fn next_intents(&mut self, snap: &Snapshot) -> Vec<Intent> {
        let mut out = Vec::new();
        let player = &snap.player;

        while let Some(&step) = self.steps.get(self.current) {
            match step {
                Step::Settle => {
                    if !player.signals.grounded {
                        break;
                    }
                }
                Step::Walk { to_x } => {
                    let dx = to_x - player.pos.x;
                    if dx.abs() > WALK_TOLERANCE {
                        self.hold(dx.signum(), &mut out);
                        break;
                    }
                    self.hold(0.0, &mut out);
                }
                Step::Jump { drift, drift_above } => {
                    let grounded = player.signals.grounded;
                    match self.jump {
                        JumpPhase::Ready => {
                            if grounded {
                                out.push(Intent::JumpOrClimbUp);
                                self.jump = JumpPhase::Pressed;
                            }
                            break;
                        }
                        JumpPhase::Pressed => {
                            if grounded {
                                break;
                            }
                            out.push(Intent::JumpOrClimbRelease);
                            self.jump = JumpPhase::Airborne;
                        }
                        JumpPhase::Airborne => {}
                    }

                    if !grounded {
                        let feet = player.pos.y - player.size.y / 2.0;
                        if feet > drift_above {
                            self.hold(drift, &mut out);
                        }
                        break;
                    }
                    self.jump = JumpPhase::Ready;
                }
            }
            self.current += 1;
        }

        if self.is_done() {
            self.hold(0.0, &mut out);
        }
        out
    }

    /// Switch the held direction, releasing the old one first
    fn hold(&mut self, direction: f32, out: &mut Vec<Intent>) {
        if direction == self.held {
            return;
        }
        if self.held < 0.0 {
            out.push(Intent::MoveLeftStop);
        } else if self.held > 0.0 {
            out.push(Intent::MoveRightStop);
        }
        if direction < 0.0 {
            out.push(Intent::MoveLeftStart);
        } else if direction > 0.0 {
            out.push(Intent::MoveRightStart);
        }
        self.held = direction;
    }
}
