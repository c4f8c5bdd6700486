//! Per-frame intents handed from the driver to the simulation.

/// Horizontal movement intent (continuous while held).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
}

/// Frame input: movement is level-triggered (`None` = stop), jump is
/// edge-triggered and only honored on the ground.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub movement: Option<MoveDir>,
    pub jump: bool,
}

impl FrameInput {
    pub fn moving(dir: MoveDir) -> Self {
        FrameInput { movement: Some(dir), jump: false }
    }

    pub fn jump() -> Self {
        FrameInput { movement: None, jump: true }
    }
}
