/// Triangle-wave brightness in `[STAR_MIN_BRIGHTNESS, 1.0]`. Pure in `(index, tick)`;
/// each star is offset by a fixed phase so neighbours do not pulse together.
pub(crate) fn star_brightness(index: usize, tick: u64) -> f32 {
    let phase_ticks =
        tick.wrapping_add((index as u64).wrapping_mul(STAR_PHASE_STRIDE_TICKS))
            % STAR_TWINKLE_PERIOD_TICKS;
    let t = phase_ticks as f32 / STAR_TWINKLE_PERIOD_TICKS as f32;
    let wave = 1.0 - (2.0 * t - 1.0).abs();
    STAR_MIN_BRIGHTNESS + (1.0 - STAR_MIN_BRIGHTNESS) * wave
}

fn star_desc(brightness: f32) -> RenderableDesc {
    let alpha = (brightness.clamp(0.0, 1.0) * 255.0).round() as u8;
    let [r, g, b] = STAR_COLOR;
    RenderableDesc {
        kind: RenderableKind::Shapes(vec![ShapeLayer::centered(
            ShapeKind::Circle {
                radius: STAR_RADIUS,
            },
            [r, g, b, alpha],
        )]),
        debug_name: "star",
    }
}

fn island_desc(island: &ContainmentRegion) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Shapes(vec![ShapeLayer::centered(
            ShapeKind::Ellipse {
                radius_x: island.semi_axis_x,
                radius_y: island.semi_axis_y,
            },
            ISLAND_COLOR,
        )]),
        debug_name: "island",
    }
}

fn obstacle_desc(obstacle: &Obstacle) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Shapes(vec![ShapeLayer::centered(
            ShapeKind::Ellipse {
                radius_x: obstacle.radius_x,
                radius_y: obstacle.radius_y,
            },
            OBSTACLE_COLOR,
        )]),
        debug_name: "obstacle",
    }
}

fn gem_desc(radius: f32) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Shapes(vec![
            ShapeLayer::centered(ShapeKind::Circle { radius }, GEM_COLOR),
            ShapeLayer::centered(
                ShapeKind::Circle {
                    radius: radius * 0.4,
                },
                GEM_HIGHLIGHT_COLOR,
            )
            .with_offset(Vec2::new(-radius * 0.3, -radius * 0.3)),
        ]),
        debug_name: "gem",
    }
}

fn key_desc(radius: f32) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Shapes(vec![ShapeLayer::centered(
            ShapeKind::Circle { radius },
            KEY_COLOR,
        )]),
        debug_name: "key",
    }
}

/// Closed: body plus a lid band. Open: a lowered body with a row of treasure on top.
fn chest_layers(size: Vec2, opened: bool) -> Vec<ShapeLayer> {
    let (width, height) = (size.x, size.y);
    if !opened {
        let band_height = 6.0;
        return vec![
            ShapeLayer::centered(ShapeKind::Rect { width, height }, CHEST_BODY_COLOR),
            ShapeLayer::centered(
                ShapeKind::Rect {
                    width: width - 8.0,
                    height: band_height,
                },
                CHEST_BAND_COLOR,
            )
            .with_offset(Vec2::new(0.0, -height * 0.5 + 4.0 + band_height * 0.5)),
        ];
    }

    let lid_drop = 6.0;
    let mut layers = vec![ShapeLayer::centered(
        ShapeKind::Rect {
            width,
            height: height - lid_drop,
        },
        CHEST_BODY_COLOR,
    )
    .with_offset(Vec2::new(0.0, lid_drop * 0.5))];
    for i in 0..6 {
        layers.push(
            ShapeLayer::centered(ShapeKind::Circle { radius: 3.0 }, CHEST_TREASURE_COLOR)
                .with_offset(Vec2::new(
                    -width * 0.5 + 8.0 + i as f32 * 6.0,
                    -height * 0.5 + 2.0,
                )),
        );
    }
    layers
}

fn chest_desc(size: Vec2, opened: bool) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Shapes(chest_layers(size, opened)),
        debug_name: "chest",
    }
}

fn player_desc(sprite: &str, size: Vec2) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Sprite {
            location: sprite.to_string(),
            size,
        },
        debug_name: "player",
    }
}

fn hud_lines(view: &GameView) -> Vec<String> {
    vec![
        view.status.text().to_string(),
        format!("Keys: {}", view.key_count()),
        format!("Gems: {}/{}", view.gems_collected, view.gem_total()),
    ]
}

fn win_banner() -> Banner {
    Banner {
        title: WIN_BANNER_TITLE.to_string(),
        subtitle: WIN_BANNER_SUBTITLE.to_string(),
    }
}
