use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

/// Current held state of the four movement directions, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSignals {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionSignals {
    pub fn is_down(&self, action: InputAction) -> bool {
        match action {
            InputAction::MoveUp => self.up,
            InputAction::MoveDown => self.down,
            InputAction::MoveLeft => self.left,
            InputAction::MoveRight => self.right,
        }
    }

    pub fn with(mut self, action: InputAction, is_down: bool) -> Self {
        self.set(action, is_down);
        self
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    fn set(&mut self, action: InputAction, is_down: bool) {
        match action {
            InputAction::MoveUp => self.up = is_down,
            InputAction::MoveDown => self.down = is_down,
            InputAction::MoveLeft => self.left = is_down,
            InputAction::MoveRight => self.right = is_down,
        }
    }
}

/// Latches arrow-key press/release events into [`DirectionSignals`].
///
/// Only the current state is kept. A press and release that both land between two samples
/// are never observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTracker {
    signals: DirectionSignals,
}

impl InputTracker {
    pub fn on_key_down(&mut self, code: KeyCode) {
        if let Some(action) = direction_for_code(code) {
            self.signals.set(action, true);
        }
    }

    pub fn on_key_up(&mut self, code: KeyCode) {
        if let Some(action) = direction_for_code(code) {
            self.signals.set(action, false);
        }
    }

    pub fn signals(&self) -> DirectionSignals {
        self.signals
    }
}

const fn direction_for_code(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::ArrowUp => Some(InputAction::MoveUp),
        KeyCode::ArrowDown => Some(InputAction::MoveDown),
        KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::ArrowRight => Some(InputAction::MoveRight),
        _ => None,
    }
}
