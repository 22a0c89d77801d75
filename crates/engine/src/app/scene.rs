use crate::assets::{AssetError, AssetLookup};

use super::input::{ActionStates, InputAction};
use super::rendering::Canvas;

/// Input for one tick: keys currently held plus the key-down events seen
/// since the previous tick, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    pressed: Vec<InputAction>,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        pressed: Vec<InputAction>,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            pressed,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn pressed(&self) -> &[InputAction] {
        &self.pressed
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    /// Appends a key-down event; repeats of an action already in the batch are ignored.
    pub fn with_pressed(mut self, action: InputAction) -> Self {
        if !self.pressed.contains(&action) {
            self.pressed.push(action);
        }
        self
    }
}

pub trait Scene {
    fn load(&mut self, assets: &mut dyn AssetLookup) -> Result<(), AssetError>;
    fn update(&mut self, input: &InputSnapshot);
    /// Runs after `update` each tick, before drawing.
    fn recompute_state(&mut self) {}
    fn draw(&self, canvas: &mut Canvas<'_>);
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
    fn unload(&mut self) {}
}
