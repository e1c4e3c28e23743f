use anyhow::{bail, Context};
use log::{error, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use macroquad::audio::{load_sound, play_sound, PlaySoundParams};
use macroquad::prelude::*;
use std::path::Path;
use tilemap_world::{
    draw_surface, prepare_surface, Camera, EngineConfig, LevelSession, LoadError, MacroquadBackend,
    TextureCache,
};

const CONFIG_PATH: &str = "engine.json";

fn init_log(level: LevelFilter) -> anyhow::Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("stdout", Box::new(stdout)),
        )
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn window_conf() -> Conf {
    // a broken config still gets a window; run() reports the error
    EngineConfig::load(Path::new(CONFIG_PATH))
        .unwrap_or_default()
        .window_conf()
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(e) = run().await {
        error!("{e:#}");
        eprintln!("viewer: {e:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let config = EngineConfig::load(Path::new(CONFIG_PATH))
        .with_context(|| format!("Reading engine config {CONFIG_PATH}"))?;
    init_log(config.log_filter()).context("Installing logger")?;

    let mut session = LevelSession::open(config.clone())
        .with_context(|| format!("Scanning {}", config.worlds_dir.display()))?;
    let Some(first) = session.catalog().first().map(str::to_owned) else {
        bail!("No levels found in {}", config.worlds_dir.display());
    };
    let level = session
        .change_level(&first)
        .with_context(|| format!("Loading level {first}"))?;

    let mut textures = TextureCache::new(MacroquadBackend::default());
    prepare_surface(&mut textures, &level.world_surface)?;
    let background = level
        .background
        .as_ref()
        .map(|(path, img)| textures.register_image(path, img))
        .transpose()?;
    let objects = level
        .objects
        .iter()
        .map(|o| {
            let handle = textures.register_image(&o.texture, &o.image)?;
            Ok((handle, o.spawn_position(level.tile_size())))
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    if let Some(music) = &level.background_music {
        let sound = load_sound(&music.to_string_lossy())
            .await
            .with_context(|| format!("Loading music {}", music.display()))?;
        play_sound(
            &sound,
            PlaySoundParams {
                looped: true,
                volume: 0.6,
            },
        );
    }

    let (world_w, world_h) = level.world_size();
    let world = vec2(world_w as f32, world_h as f32);
    let mut camera = Camera::new(vec2(screen_width(), screen_height()));
    camera.follow(level.start_position());

    loop {
        let dt = get_frame_time();
        let mut dir = Vec2::ZERO;
        if is_key_down(KeyCode::Left) {
            dir.x -= 1.0;
        }
        if is_key_down(KeyCode::Right) {
            dir.x += 1.0;
        }
        if is_key_down(KeyCode::Up) {
            dir.y -= 1.0;
        }
        if is_key_down(KeyCode::Down) {
            dir.y += 1.0;
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        camera.viewport = vec2(screen_width(), screen_height());
        camera.pan(dir * config.camera_speed * dt);
        camera.clamp_to(world);

        clear_background(BLACK);
        set_camera(&camera.to_camera2d());

        if let Some(h) = background {
            textures.draw(h, Vec2::ZERO);
        }
        let (view_min, view_max) = camera.view_bounds();
        draw_surface(&mut textures, &level.world_surface, view_min, view_max);
        for (h, pos) in &objects {
            textures.draw(*h, *pos);
        }

        set_default_camera();
        draw_text(
            &format!("{}  FPS: {}", level.name, get_fps()),
            20.0,
            30.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
    Ok(())
}
