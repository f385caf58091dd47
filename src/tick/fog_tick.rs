use specs::{
    shred::{ResourceId, World}, Join, Read, ReadStorage, System, SystemData, Write,
};
use crate::comp::*;
use crate::vision::FogOfWar;

#[derive(SystemData)]
pub struct FogRead<'a> {
    tick: Read<'a, Tick>,
    pos: ReadStorage<'a, TilePos>,
    sights: ReadStorage<'a, Sight>,
    towers: ReadStorage<'a, Watchtower>,
    factions: ReadStorage<'a, Faction>,
}

#[derive(SystemData)]
pub struct FogWrite<'a> {
    fog: Write<'a, FogOfWar>,
}

/// 收集目前陣營的觀察者並更新迷霧
#[derive(Default)]
pub struct Sys;

impl<'a> System<'a> for Sys {
    type SystemData = (
        FogRead<'a>,
        FogWrite<'a>,
    );

    fn run(&mut self, (fr, mut fw): Self::SystemData) {
        let active = fw.fog.active_faction();

        // 同時有 Watchtower 的實體算建築，不重複當成單位
        let units: Vec<UnitObserver> = (&fr.pos, &fr.sights, &fr.factions, !&fr.towers)
            .join()
            .filter(|(_, _, faction, _)| faction.0 == active)
            .map(|(pos, sight, _, _)| UnitObserver::new(pos.0.x, pos.0.y, sight.range))
            .collect();
        let buildings: Vec<BuildingObserver> = (&fr.pos, &fr.towers, &fr.factions)
            .join()
            .filter(|(_, _, faction)| faction.0 == active)
            .map(|(pos, tower, _)| BuildingObserver::new(pos.0.x, pos.0.y, tower.vision_bonus))
            .collect();

        if fw.fog.update_vision(fr.tick.0, &units, &buildings) {
            log::trace!("fog tick {}: {} 單位 {} 建築", fr.tick.0, units.len(), buildings.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specs::{Builder, RunNow, WorldExt};
    use vek::Vec2;

    use crate::config::FogSetting;

    fn world() -> World {
        let mut world = World::new();
        world.register::<TilePos>();
        world.register::<Sight>();
        world.register::<Watchtower>();
        world.register::<Faction>();

        let mut fog = FogOfWar::new(FogSetting {
            update_interval: 1,
            ..FogSetting::default()
        });
        fog.init(20, 20);
        fog.set_active_faction(1);
        world.insert(fog);
        world.insert(Tick(0));
        world
    }

    #[test]
    fn test_only_active_faction_reveals() {
        let mut world = world();
        world
            .create_entity()
            .with(TilePos(Vec2::new(3, 3)))
            .with(Sight { range: 2 })
            .with(Faction(1))
            .build();
        world
            .create_entity()
            .with(TilePos(Vec2::new(15, 15)))
            .with(Sight { range: 2 })
            .with(Faction(2))
            .build();

        Sys.run_now(&world);
        world.maintain();

        let fog = world.read_resource::<FogOfWar>();
        assert!(fog.is_visible(3, 3));
        assert!(fog.is_visible(3, 5));
        assert!(!fog.is_visible(15, 15));
    }

    #[test]
    fn test_watchtower_uses_building_range() {
        let mut world = world();
        world
            .create_entity()
            .with(TilePos(Vec2::new(10, 10)))
            .with(Sight { range: 1 })
            .with(Watchtower { vision_bonus: 1 })
            .with(Faction(1))
            .build();

        Sys.run_now(&world);

        let fog = world.read_resource::<FogOfWar>();
        // 6 + 1，不是單位的 1
        assert!(fog.is_visible(10, 3));
        assert!(!fog.is_visible(10, 2));
    }

    #[test]
    fn test_reads_tick_resource() {
        let mut world = world();
        world
            .create_entity()
            .with(TilePos(Vec2::new(3, 3)))
            .with(Sight { range: 2 })
            .with(Faction(1))
            .build();

        Sys.run_now(&world);
        *world.write_resource::<Tick>() = Tick(1);
        {
            let mut fog = world.write_resource::<FogOfWar>();
            fog.reset_faction_exploration(1);
        }
        Sys.run_now(&world);

        let fog = world.read_resource::<FogOfWar>();
        assert!(fog.is_visible(3, 3));
        assert!(fog.is_explored(4, 3));
    }
}
