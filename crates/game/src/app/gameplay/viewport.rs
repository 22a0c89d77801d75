use engine::{InputAction, InputSnapshot, Rect, Vec2};

/// World units the origin moves per honoured scroll tick.
pub(crate) const SCROLL_STEP: f32 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HeldDirections {
    pub(crate) up: bool,
    pub(crate) down: bool,
    pub(crate) left: bool,
    pub(crate) right: bool,
}

impl HeldDirections {
    pub(crate) fn from_input(input: &InputSnapshot) -> Self {
        Self {
            up: input.is_down(InputAction::MoveUp),
            down: input.is_down(InputAction::MoveDown),
            left: input.is_down(InputAction::MoveLeft),
            right: input.is_down(InputAction::MoveRight),
        }
    }

    pub(crate) fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Camera window into the world. The origin always stays inside
/// `[0, world - view]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    origin: Vec2,
    view_size: Vec2,
    world_size: Vec2,
}

impl Viewport {
    pub(crate) fn new(origin: Vec2, view_size: Vec2, world_size: Vec2) -> Self {
        let mut viewport = Self {
            origin: Vec2::ZERO,
            view_size,
            world_size,
        };
        let max = viewport.max_origin();
        viewport.origin = Vec2::new(origin.x.clamp(0.0, max.x), origin.y.clamp(0.0, max.y));
        viewport
    }

    pub(crate) fn origin(&self) -> Vec2 {
        self.origin
    }

    pub(crate) fn max_origin(&self) -> Vec2 {
        Vec2::new(
            (self.world_size.x - self.view_size.x).max(0.0),
            (self.world_size.y - self.view_size.y).max(0.0),
        )
    }

    /// Only one direction is honoured per tick: down, then up, then right, then left.
    pub(crate) fn honoured_direction(held: HeldDirections) -> Option<ScrollDirection> {
        if held.down {
            Some(ScrollDirection::Down)
        } else if held.up {
            Some(ScrollDirection::Up)
        } else if held.right {
            Some(ScrollDirection::Right)
        } else if held.left {
            Some(ScrollDirection::Left)
        } else {
            None
        }
    }

    /// Moves the origin one step in the honoured direction when the result stays
    /// inside `[0, max - SCROLL_STEP]`; otherwise leaves it untouched.
    pub(crate) fn scroll(&mut self, held: HeldDirections) -> Vec2 {
        let Some(direction) = Self::honoured_direction(held) else {
            return self.origin;
        };
        let max = self.max_origin();
        let (candidate, axis_max) = match direction {
            ScrollDirection::Down => (self.origin.y + SCROLL_STEP, max.y),
            ScrollDirection::Up => (self.origin.y - SCROLL_STEP, max.y),
            ScrollDirection::Right => (self.origin.x + SCROLL_STEP, max.x),
            ScrollDirection::Left => (self.origin.x - SCROLL_STEP, max.x),
        };
        if candidate < 0.0 || candidate > axis_max - SCROLL_STEP {
            return self.origin;
        }
        match direction {
            ScrollDirection::Down | ScrollDirection::Up => self.origin.y = candidate,
            ScrollDirection::Right | ScrollDirection::Left => self.origin.x = candidate,
        }
        self.origin
    }

    pub(crate) fn viewport_rect(&self) -> Rect {
        Rect::from_position_size(self.origin, self.view_size)
    }

    pub(crate) fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.origin
    }

    pub(crate) fn to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.origin
    }
}
