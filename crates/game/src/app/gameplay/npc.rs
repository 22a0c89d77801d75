use engine::Vec2;
use thiserror::Error;

use super::entity::{step_toward, Facing};

pub(crate) const NPC_STEP: f32 = 2.0;
const WAYPOINT_ARRIVAL_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum PatrolError {
    #[error("patrol path must contain at least one waypoint")]
    EmptyPatrolPath,
}

/// Cyclic waypoint walker. `current_target_index` always indexes `patrol_path`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Npc {
    patrol_path: Vec<Vec2>,
    current_target_index: usize,
    facing: Facing,
}

impl Npc {
    pub(crate) fn new(patrol_path: Vec<Vec2>) -> Result<Self, PatrolError> {
        if patrol_path.is_empty() {
            return Err(PatrolError::EmptyPatrolPath);
        }
        Ok(Self {
            patrol_path,
            current_target_index: 0,
            facing: Facing::Down,
        })
    }

    pub(crate) fn current_target_index(&self) -> usize {
        self.current_target_index
    }

    pub(crate) fn current_target(&self) -> Vec2 {
        self.patrol_path[self.current_target_index]
    }

    pub(crate) fn facing(&self) -> Facing {
        self.facing
    }

    /// One patrol tick from `position`. Returns the new position.
    pub(crate) fn patrol_step(&mut self, position: Vec2) -> Vec2 {
        let target = self.current_target();
        if (target - position).length() <= WAYPOINT_ARRIVAL_EPSILON {
            self.current_target_index = (self.current_target_index + 1) % self.patrol_path.len();
            return position;
        }

        if let Some(facing) = Facing::dominant(target - position) {
            self.facing = facing;
        }
        let (next, _) = step_toward(position, target, NPC_STEP, WAYPOINT_ARRIVAL_EPSILON);
        next
    }
}
