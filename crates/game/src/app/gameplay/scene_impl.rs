#[derive(Debug, Clone, Default)]
struct EntityHandles {
    stars: Vec<EntityId>,
    gems: Vec<EntityId>,
    key: Option<EntityId>,
    chest: Option<EntityId>,
    player: Option<EntityId>,
}

/// Engine-facing wrapper: feeds ticks into the session and projects its snapshot into the world.
pub(crate) struct TreasureScene {
    session: GameSession,
    handles: EntityHandles,
    tick_counter: u64,
    last_chest_opened: Option<bool>,
}

impl TreasureScene {
    pub(crate) fn new(config: SessionConfig) -> Self {
        Self {
            session: GameSession::new(config),
            handles: EntityHandles::default(),
            tick_counter: 0,
            last_chest_opened: None,
        }
    }

    fn log_tick_report(&self, report: &TickReport) {
        let generation = self.session.generation();
        for event in &report.events {
            match event {
                GameEvent::KeyAcquired => info!(generation, "key_acquired"),
                GameEvent::ChestUnlocked => info!(
                    generation,
                    win_delay_ms = self.session.config().win_delay.as_millis() as u64,
                    "chest_unlocked"
                ),
                GameEvent::GemCollected { index } => {
                    info!(generation, gem_index = index, "gem_collected")
                }
                GameEvent::MoveRejected => debug!(generation, "move_rejected_by_containment"),
            }
        }
    }

    fn log_clock_events(&self, events: &[ClockEvent]) {
        for event in events {
            match event {
                ClockEvent::WinShown => info!(generation = self.session.generation(), "win_shown"),
                ClockEvent::StaleWinDropped { generation } => info!(
                    stale_generation = generation,
                    current_generation = self.session.generation(),
                    "stale_win_signal_dropped"
                ),
            }
        }
    }
}

impl Scene for TreasureScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.session.reset();
        self.tick_counter = 0;
        self.last_chest_opened = None;

        let config = self.session.config().clone();
        world.set_scene_size(config.scene_size);
        world.set_background(BACKGROUND_COLOR);
        world.spawn(config.island.center, island_desc(&config.island));
        for obstacle in &config.obstacles {
            world.spawn(obstacle.center, obstacle_desc(obstacle));
        }

        let view = self.session.snapshot();
        let mut handles = EntityHandles {
            stars: config
                .stars
                .iter()
                .enumerate()
                .map(|(index, star)| world.spawn(*star, star_desc(star_brightness(index, 0))))
                .collect(),
            ..EntityHandles::default()
        };
        handles.gems = view
            .gems
            .iter()
            .map(|gem| world.spawn(gem.position, gem_desc(gem.radius)))
            .collect();
        handles.key = Some(world.spawn(view.key.position, key_desc(view.key.radius)));
        handles.chest = Some(world.spawn(
            view.chest.position,
            chest_desc(view.chest.size, view.chest.opened),
        ));
        handles.player = Some(world.spawn(
            view.player.position,
            player_desc(&config.player_sprite, view.player.size),
        ));
        self.handles = handles;

        info!(
            generation = self.session.generation(),
            gems = view.gem_total(),
            obstacles = config.obstacles.len(),
            containment = config.containment_enabled,
            "treasure_scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        _world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.restart_pressed() {
            info!(
                generation = self.session.generation(),
                phase = ?self.session.phase(),
                "restart_requested"
            );
            return SceneCommand::HardReset;
        }

        let elapsed = Duration::try_from_secs_f32(fixed_dt_seconds).unwrap_or(Duration::ZERO);
        let clock_events = self.session.advance_clock(elapsed);
        self.log_clock_events(&clock_events);

        let report = self.session.tick(input.directions());
        self.log_tick_report(&report);
        self.tick_counter = self.tick_counter.wrapping_add(1);
        SceneCommand::None
    }

    fn render(&mut self, world: &mut SceneWorld) {
        let view = self.session.snapshot();

        for (index, id) in self.handles.stars.iter().enumerate() {
            if let Some(entity) = world.find_entity_mut(*id) {
                entity.renderable = star_desc(star_brightness(index, self.tick_counter));
            }
        }
        for (gem, id) in view.gems.iter().zip(&self.handles.gems) {
            if let Some(entity) = world.find_entity_mut(*id) {
                entity.visible = !gem.collected;
            }
        }
        if let Some(entity) = self.handles.key.and_then(|id| world.find_entity_mut(id)) {
            entity.visible = !view.key.taken;
        }
        if self.last_chest_opened != Some(view.chest.opened) {
            if let Some(entity) = self.handles.chest.and_then(|id| world.find_entity_mut(id)) {
                entity.renderable = chest_desc(view.chest.size, view.chest.opened);
            }
            self.last_chest_opened = Some(view.chest.opened);
        }
        if let Some(entity) = self.handles.player.and_then(|id| world.find_entity_mut(id)) {
            entity.position = view.player.position;
        }

        let hud = world.hud_mut();
        hud.lines = hud_lines(&view);
        hud.banner = view.win_visible.then(win_banner);
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        let view = self.session.snapshot();
        info!(
            generation = self.session.generation(),
            phase = ?view.phase,
            has_key = view.has_key,
            gems_collected = view.gems_collected,
            pending_signals = self.session.pending_signal_count(),
            ticks = self.tick_counter,
            "treasure_scene_unloaded"
        );
        self.handles = EntityHandles::default();
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let view = self.session.snapshot();
        Some(format!(
            "Treasure Escape | {:?} | x={:.0} y={:.0}",
            view.phase, view.player.position.x, view.player.position.y
        ))
    }
}
