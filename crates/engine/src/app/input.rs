#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    QuitInteraction,
    Drop,
    Combine,
    Quit,
}

const ACTION_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Interact,
        InputAction::QuitInteraction,
        InputAction::Drop,
        InputAction::Combine,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Interact => 4,
            InputAction::QuitInteraction => 5,
            InputAction::Drop => 6,
            InputAction::Combine => 7,
            InputAction::Quit => 8,
        }
    }

    pub fn is_directional(self) -> bool {
        matches!(
            self,
            InputAction::MoveUp
                | InputAction::MoveDown
                | InputAction::MoveLeft
                | InputAction::MoveRight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_a_distinct_slot() {
        let mut states = ActionStates::default();
        for action in InputAction::ALL {
            states.set(action, true);
            for other in InputAction::ALL {
                assert_eq!(states.is_down(other), other == action);
            }
            states.set(action, false);
        }
    }

    #[test]
    fn only_move_actions_are_directional() {
        let directional: Vec<_> = InputAction::ALL
            .into_iter()
            .filter(|action| action.is_directional())
            .collect();
        assert_eq!(directional.len(), 4);
        assert!(!InputAction::Interact.is_directional());
    }
}
