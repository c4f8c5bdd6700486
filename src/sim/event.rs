//! Events emitted during a simulation step.
//! The driver consumes these for logging (or animation/sound upstream).

use super::world::BodyId;

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// Body went Airborne → Grounded; `y` is the hit box bottom.
    Landed { body: BodyId, y: f32 },
    /// Body went Grounded → Airborne without jumping (walked off an edge).
    LeftGround { body: BodyId },
    /// Grounded body accepted a jump.
    Jumped { body: BodyId },
}
