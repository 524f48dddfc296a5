#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GamePhase {
    Exploring,
    KeyHeld,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusMessage {
    Prompt,
    KeyAcquired,
    Escaped,
}

impl StatusMessage {
    pub(crate) fn text(self) -> &'static str {
        match self {
            Self::Prompt => STATUS_PROMPT_TEXT,
            Self::KeyAcquired => STATUS_KEY_ACQUIRED_TEXT,
            Self::Escaped => STATUS_ESCAPED_TEXT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Player {
    pub position: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct KeyItem {
    pub position: Vec2,
    pub radius: f32,
    pub taken: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Chest {
    pub position: Vec2,
    pub size: Vec2,
    pub unlock_half_extents: Vec2,
    pub opened: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Gem {
    pub position: Vec2,
    pub radius: f32,
    pub collected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Obstacle {
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
}

/// Ellipse a candidate position must fall inside for a move to be accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ContainmentRegion {
    pub center: Vec2,
    pub semi_axis_x: f32,
    pub semi_axis_y: f32,
    pub threshold: f32,
}

/// Session parameters in scene coordinates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SessionConfig {
    pub scene_size: Vec2,
    pub spawn: Vec2,
    pub player_size: Vec2,
    pub player_speed: f32,
    pub player_sprite: String,
    pub key_position: Vec2,
    pub key_radius: f32,
    pub chest_position: Vec2,
    pub chest_size: Vec2,
    pub chest_unlock_half_extents: Vec2,
    pub gems: Vec<(Vec2, f32)>,
    pub obstacles: Vec<Obstacle>,
    pub stars: Vec<Vec2>,
    pub island: ContainmentRegion,
    pub containment_enabled: bool,
    pub win_delay: Duration,
}

impl SessionConfig {
    pub(crate) fn from_layout(layout: &LayoutConfig) -> Self {
        let scale = layout.scale;
        let containment = &layout.containment;
        Self {
            scene_size: layout.design_size.scaled(scale),
            spawn: layout.player.spawn.scaled(scale),
            player_size: layout.player.size,
            player_speed: layout.player.speed,
            player_sprite: layout.player.sprite.clone(),
            key_position: layout.key.position.scaled(scale),
            key_radius: layout.key.radius * scale,
            chest_position: layout.chest.position.scaled(scale),
            chest_size: layout.chest.size.scaled(scale),
            chest_unlock_half_extents: layout.chest.unlock_half_extents.scaled(scale),
            gems: layout
                .gems
                .iter()
                .map(|gem| (gem.position.scaled(scale), gem.radius * scale))
                .collect(),
            obstacles: layout
                .obstacles
                .iter()
                .map(|obstacle| Obstacle {
                    center: obstacle.center.scaled(scale),
                    radius_x: obstacle.radius_x * scale,
                    radius_y: obstacle.radius_y * scale,
                })
                .collect(),
            stars: layout.stars.iter().map(|star| star.scaled(scale)).collect(),
            island: ContainmentRegion {
                center: containment.center.scaled(scale),
                semi_axis_x: containment.semi_axis_x * scale,
                semi_axis_y: containment.semi_axis_y * scale,
                threshold: containment.threshold,
            },
            containment_enabled: containment.enabled,
            win_delay: Duration::from_millis(layout.win_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    KeyAcquired,
    ChestUnlocked,
    GemCollected { index: usize },
    MoveRejected,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TickReport {
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub(crate) fn contains(&self, event: GameEvent) -> bool {
        self.events.contains(&event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClockEvent {
    WinShown,
    StaleWinDropped { generation: u64 },
}

/// Owned copy of everything a presenter needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GameView {
    pub player: Player,
    pub key: KeyItem,
    pub chest: Chest,
    pub gems: Vec<Gem>,
    pub obstacles: Vec<Obstacle>,
    pub has_key: bool,
    pub gems_collected: u32,
    pub status: StatusMessage,
    pub win_visible: bool,
    pub phase: GamePhase,
}

impl GameView {
    pub(crate) fn key_count(&self) -> u32 {
        u32::from(self.has_key)
    }

    pub(crate) fn gem_total(&self) -> usize {
        self.gems.len()
    }
}
