use engine::{AssetError, AssetLookup, InputAction, Rect, Vec2, Visual, VisualParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct EntityId(pub(crate) u64);

#[derive(Debug, Default)]
pub(crate) struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub(crate) fn allocate(&mut self) -> EntityId {
        self.next = self.next.saturating_add(1);
        EntityId(self.next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Facing {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Facing::Down => "down",
            Facing::Up => "up",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub(crate) fn from_action(action: InputAction) -> Option<Facing> {
        match action {
            InputAction::MoveDown => Some(Facing::Down),
            InputAction::MoveUp => Some(Facing::Up),
            InputAction::MoveLeft => Some(Facing::Left),
            InputAction::MoveRight => Some(Facing::Right),
            _ => None,
        }
    }

    /// Facing along the larger component of `delta`; ties go vertical. `None` for a zero delta.
    pub(crate) fn dominant(delta: Vec2) -> Option<Facing> {
        if delta.x == 0.0 && delta.y == 0.0 {
            return None;
        }
        if delta.x.abs() > delta.y.abs() {
            Some(if delta.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            })
        } else {
            Some(if delta.y > 0.0 { Facing::Down } else { Facing::Up })
        }
    }
}

/// World-space placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Body {
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
}

impl Body {
    pub(crate) fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub(crate) fn bounding_rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FacingVisuals {
    down: Visual,
    up: Visual,
    left: Visual,
    right: Visual,
}

impl FacingVisuals {
    pub(crate) fn load(
        assets: &mut dyn AssetLookup,
        key: &str,
        frames: u32,
        ticks_per_frame: u32,
    ) -> Result<Self, AssetError> {
        let mut load = |facing: Facing| {
            assets.lookup(
                key,
                &VisualParams::animated(facing.as_token(), frames, ticks_per_frame),
            )
        };
        Ok(Self {
            down: load(Facing::Down)?,
            up: load(Facing::Up)?,
            left: load(Facing::Left)?,
            right: load(Facing::Right)?,
        })
    }

    pub(crate) fn get(&self, facing: Facing) -> &Visual {
        match facing {
            Facing::Down => &self.down,
            Facing::Up => &self.up,
            Facing::Left => &self.left,
            Facing::Right => &self.right,
        }
    }
}

/// Moves `current` toward `target` by at most `step`, snapping once within
/// `arrival_threshold` or within one step. Returns the new position and whether it arrived.
pub(crate) fn step_toward(
    current: Vec2,
    target: Vec2,
    step: f32,
    arrival_threshold: f32,
) -> (Vec2, bool) {
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    let distance_sq = dx * dx + dy * dy;
    let threshold_sq = arrival_threshold * arrival_threshold;
    if distance_sq <= threshold_sq {
        return (target, true);
    }

    let distance = distance_sq.sqrt();
    if step >= distance {
        return (target, true);
    }

    let inv_distance = distance.recip();
    (
        Vec2 {
            x: current.x + dx * inv_distance * step,
            y: current.y + dy * inv_distance * step,
        },
        false,
    )
}
