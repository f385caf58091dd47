use failure::Error;
use log::{info, warn, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use specs::{Builder, DispatcherBuilder, Join, World, WorldExt};
use std::time::{Duration, Instant};
use vek::Vec2;

use omoba_fog::comp::*;
use omoba_fog::config::{Setting, CONFIG};
use omoba_fog::tick;
use omoba_fog::vision::{FogOfWar, TextCanvas};

const TPS: u64 = 10;
const DEMO_TICKS: u64 = 60;
const REPORT_EVERY: u64 = 20;
const ACTIVE_FACTION: u32 = 1;

/// 讀不到 log4rs.yml 時只輸出到 console
fn init_logging() -> Result<(), Error> {
    if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
        let stdout = ConsoleAppender::builder().build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
        log4rs::init_config(config)?;
        warn!("log4rs.yml 載入失敗，改用 console: {}", e);
    }
    Ok(())
}

fn setup_world(setting: &Setting) -> Result<World, Error> {
    let terrain = TerrainMap::from_config(&setting.map);
    let mut fog = FogOfWar::new(setting.fog.clone());
    fog.init(terrain.width, terrain.height);
    fog.set_terrain(terrain.to_occlusion_map())?;
    fog.set_active_faction(ACTIVE_FACTION);

    let mut world = World::new();
    world.register::<TilePos>();
    world.register::<Sight>();
    world.register::<Watchtower>();
    world.register::<Faction>();
    world.insert(fog);
    world.insert(Tick(0));

    let (w, h) = (terrain.width as i32, terrain.height as i32);
    // 巡邏斥候
    world
        .create_entity()
        .with(TilePos(Vec2::new(2, h / 2)))
        .with(Sight { range: 5 })
        .with(Faction(ACTIVE_FACTION))
        .build();
    // 己方瞭望塔
    world
        .create_entity()
        .with(TilePos(Vec2::new(w / 4, h / 4)))
        .with(Watchtower { vision_bonus: 2 })
        .with(Faction(ACTIVE_FACTION))
        .build();
    // 敵方單位，不應揭露任何格子
    world
        .create_entity()
        .with(TilePos(Vec2::new(w - 4, h - 4)))
        .with(Sight { range: 8 })
        .with(Faction(ACTIVE_FACTION + 1))
        .build();
    Ok(world)
}

/// 斥候沿著地圖中線來回走
fn patrol(world: &World, tick: u64) {
    let width = world.read_resource::<FogOfWar>().width() as i32;
    let span = (width - 4).max(1) as u64;
    let step = (tick % (span * 2)) as i32;
    let x = if step < span as i32 { 2 + step } else { 2 + 2 * span as i32 - step };

    let sights = world.read_storage::<Sight>();
    let factions = world.read_storage::<Faction>();
    let mut positions = world.write_storage::<TilePos>();
    for (pos, _, faction) in (&mut positions, &sights, &factions).join() {
        if faction.0 == ACTIVE_FACTION {
            pos.0.x = x;
        }
    }
}

fn report(world: &World, setting: &Setting) {
    let fog = world.read_resource::<FogOfWar>();
    let mut canvas = TextCanvas::new(fog.width(), fog.height(), setting.fog.tile_size);
    let stats = fog.render(
        &mut canvas,
        0.0,
        0.0,
        1.0,
        0,
        0,
        fog.width() as i32,
        fog.height() as i32,
    );
    info!(
        "tick {} 已探索 {:.1}%，繪製 {} 格，可見 {} 格\n{}",
        world.read_resource::<Tick>().0,
        fog.get_explored_percent(),
        stats.drawn,
        stats.skipped_visible,
        canvas.to_text()
    );
}

fn main() -> std::result::Result<(), Error> {
    init_logging()?;
    let setting: &Setting = &CONFIG;
    info!(
        "omoba-fog 啟動: 地圖 {}x{}，重算間隔 {} tick",
        setting.map.width, setting.map.height, setting.fog.update_interval
    );

    let mut world = setup_world(setting)?;
    let mut dispatcher = DispatcherBuilder::new()
        .with(tick::Sys, "fog", &[])
        .build();
    dispatcher.setup(&mut world);

    let frame = Duration::from_secs_f64(1.0 / TPS as f64);
    for t in 0..DEMO_TICKS {
        let start = Instant::now();
        *world.write_resource::<Tick>() = Tick(t);
        patrol(&world, t);
        dispatcher.dispatch(&world);
        world.maintain();

        if t % REPORT_EVERY == 0 || t + 1 == DEMO_TICKS {
            report(&world, setting);
        }

        // Wait for the next tick.
        if let Some(rest) = frame.checked_sub(start.elapsed()) {
            spin_sleep::sleep(rest);
        }
    }
    Ok(())
}
