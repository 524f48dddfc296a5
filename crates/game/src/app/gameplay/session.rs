/// Complete state of one play-through. Owned by the scene; nothing here is global.
#[derive(Debug)]
pub(crate) struct GameSession {
    config: SessionConfig,
    player: Player,
    key: KeyItem,
    chest: Chest,
    gems: Vec<Gem>,
    has_key: bool,
    gems_collected: u32,
    status: StatusMessage,
    win_visible: bool,
    generation: u64,
    deferred: DeferredQueue,
}

impl GameSession {
    pub(crate) fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            player: Player {
                position: config.spawn,
                size: config.player_size,
                speed: config.player_speed,
            },
            key: KeyItem {
                position: config.key_position,
                radius: config.key_radius,
                taken: false,
            },
            chest: Chest {
                position: config.chest_position,
                size: config.chest_size,
                unlock_half_extents: config.chest_unlock_half_extents,
                opened: false,
            },
            gems: Vec::with_capacity(config.gems.len()),
            has_key: false,
            gems_collected: 0,
            status: StatusMessage::Prompt,
            win_visible: false,
            generation: 0,
            deferred: DeferredQueue::default(),
            config,
        };
        session.restore_initial_state();
        session
    }

    pub(crate) fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn pending_signal_count(&self) -> usize {
        self.deferred.len()
    }

    pub(crate) fn phase(&self) -> GamePhase {
        if self.chest.opened {
            GamePhase::Won
        } else if self.has_key {
            GamePhase::KeyHeld
        } else {
            GamePhase::Exploring
        }
    }

    /// Back to the initial layout. Signals scheduled before this call become stale.
    pub(crate) fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.restore_initial_state();
    }

    fn restore_initial_state(&mut self) {
        self.player.position = self.config.spawn;
        self.key.taken = false;
        self.chest.opened = false;
        self.gems = self
            .config
            .gems
            .iter()
            .map(|(position, radius)| Gem {
                position: *position,
                radius: *radius,
                collected: false,
            })
            .collect();
        self.has_key = false;
        self.gems_collected = 0;
        self.status = StatusMessage::Prompt;
        self.win_visible = false;
    }

    pub(crate) fn tick(&mut self, input: DirectionSignals) -> TickReport {
        let mut report = TickReport::default();
        self.move_player(input, &mut report);
        self.check_key_pickup(&mut report);
        self.check_chest_unlock(&mut report);
        self.check_gem_collection(&mut report);
        report
    }

    fn move_player(&mut self, input: DirectionSignals, report: &mut TickReport) {
        let velocity = velocity_for(input, self.player.speed);
        if velocity == Vec2::default() {
            return;
        }
        let candidate = Vec2::new(
            self.player.position.x + velocity.x,
            self.player.position.y + velocity.y,
        );
        if self.config.containment_enabled && !self.config.island.accepts(candidate) {
            report.events.push(GameEvent::MoveRejected);
            return;
        }
        self.player.position = candidate;
    }

    fn check_key_pickup(&mut self, report: &mut TickReport) {
        if self.key.taken || !within_radius(self.player.position, self.key.position, self.key.radius)
        {
            return;
        }
        self.key.taken = true;
        self.has_key = true;
        self.status = StatusMessage::KeyAcquired;
        report.events.push(GameEvent::KeyAcquired);
    }

    fn check_chest_unlock(&mut self, report: &mut TickReport) {
        if !self.has_key || self.chest.opened {
            return;
        }
        if !within_box(
            self.player.position,
            self.chest.position,
            self.chest.unlock_half_extents,
        ) {
            return;
        }
        self.chest.opened = true;
        self.status = StatusMessage::Escaped;
        self.deferred
            .schedule(self.generation, self.config.win_delay, DeferredSignal::ShowWin);
        report.events.push(GameEvent::ChestUnlocked);
    }

    fn check_gem_collection(&mut self, report: &mut TickReport) {
        let player_position = self.player.position;
        for (index, gem) in self.gems.iter_mut().enumerate() {
            if gem.collected || !within_radius(player_position, gem.position, gem.radius) {
                continue;
            }
            gem.collected = true;
            self.gems_collected = self.gems_collected.saturating_add(1);
            report.events.push(GameEvent::GemCollected { index });
        }
    }

    /// Moves simulated time forward and applies deferred signals that came due.
    pub(crate) fn advance_clock(&mut self, elapsed: Duration) -> Vec<ClockEvent> {
        self.deferred
            .advance(elapsed)
            .into_iter()
            .map(|(generation, signal)| {
                if generation != self.generation {
                    return ClockEvent::StaleWinDropped { generation };
                }
                match signal {
                    DeferredSignal::ShowWin => {
                        self.win_visible = true;
                        ClockEvent::WinShown
                    }
                }
            })
            .collect()
    }

    pub(crate) fn snapshot(&self) -> GameView {
        GameView {
            player: self.player,
            key: self.key,
            chest: self.chest,
            gems: self.gems.clone(),
            obstacles: self.config.obstacles.clone(),
            has_key: self.has_key,
            gems_collected: self.gems_collected,
            status: self.status,
            win_visible: self.win_visible,
            phase: self.phase(),
        }
    }
}
