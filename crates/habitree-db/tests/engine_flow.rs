use chrono::{DateTime, TimeZone, Utc};
use habitree_core::{
    Completion, Config, DaySet, Engine, Error, HabitSpec, ManualClock, Storage, TreeSlot,
};
use habitree_db::Store;

fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap()
}

fn engine() -> Engine<Store, ManualClock> {
    let config = Config {
        rng_seed: Some(2024),
        ..Config::default()
    };
    Engine::open(Store::in_memory().unwrap(), ManualClock::new(monday()), config).unwrap()
}

#[test]
fn first_run_creates_garden_once() {
    let engine = engine();
    let garden = engine.storage().garden().unwrap().unwrap();
    assert_eq!(garden.level, 1);
    assert_eq!(garden.experience_required, 100);
    assert_eq!(engine.storage().weather_window().unwrap().len(), 4);

    let before = engine.storage().load().unwrap();
    engine
        .storage()
        .transact(|world| {
            assert!(!world.initialize(monday(), engine.config()));
            Ok(())
        })
        .unwrap();
    assert_eq!(engine.storage().load().unwrap(), before);
}

#[test]
fn week_of_habits() {
    let engine = engine();
    engine.plant_named("Oak").unwrap();
    engine
        .add_habit(HabitSpec::new("Meditate", 0, DaySet::every_day()))
        .unwrap();
    engine
        .add_habit(HabitSpec::new("Stretch", 3, "Mon,Wed,Fri".parse().unwrap()))
        .unwrap();

    for _ in 0..7 {
        for name in ["Meditate", "Stretch"] {
            match engine.complete_habit(name) {
                Ok(_) | Err(Error::DailyLimitReached { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        let dash = engine.dashboard().unwrap();
        assert!(dash.garden.daily_water_earned <= dash.garden.daily_pool);
        engine.clock().advance_days(1);
    }

    let dash = engine.dashboard().unwrap();
    assert!(dash.garden.level > 1);
    assert!(dash.garden.water > 0);
    assert_eq!(dash.garden.daily_water_earned, 0);
    assert!(dash.active_habits.iter().all(|h| !h.completed));
    assert_eq!(dash.weather.len(), 4);
    assert_eq!(engine.storage().weather_window().unwrap().latest().map(|d| d.day), Some(10));

    let water = dash.garden.water;
    let watering = engine.water_tree(0, water).unwrap();
    assert_eq!(watering.spent, water);
    assert_eq!(engine.storage().garden().unwrap().unwrap().water, 0);
}

#[test]
fn failed_action_leaves_store_untouched() {
    let engine = engine();
    engine.plant_tree().unwrap();
    let before = engine.storage().load().unwrap();

    let err = engine.water_tree(0, 10).unwrap_err();
    assert_eq!(err.status_code(), 403);
    let err = engine.plant_named("Elm").unwrap_err();
    assert!(matches!(err, Error::SlotLocked { slot: 1, .. }));
    let err = engine.complete_habit("Nothing").unwrap_err();
    assert_eq!(err.status_code(), 404);

    assert_eq!(engine.storage().load().unwrap(), before);
}

#[test]
fn reopening_resumes_state() {
    let engine = engine();
    engine
        .add_habit(HabitSpec::new("Read", 1, DaySet::every_day()))
        .unwrap();
    assert!(matches!(
        engine.complete_habit("Read").unwrap(),
        Completion::Rewarded { .. }
    ));
    let world = engine.storage().load().unwrap();

    let (storage, config) = (Store::in_memory().unwrap(), engine.config().clone());
    storage
        .transact(|fresh| {
            *fresh = world.clone();
            Ok(())
        })
        .unwrap();
    let reopened = Engine::open(storage, ManualClock::new(monday()), config).unwrap();

    assert_eq!(reopened.storage().load().unwrap(), world);
    assert_eq!(
        reopened.complete_habit("Read").unwrap(),
        Completion::AlreadyCompleted
    );
}

#[test]
fn dashboard_slots() {
    let engine = engine();
    engine.plant_tree().unwrap();
    let dash = engine.dashboard().unwrap();

    assert_eq!(dash.trees.len(), 10);
    match &dash.trees[0] {
        TreeSlot::Planted { tree, .. } => assert_eq!(tree.name, "My Tree"),
        other => panic!("slot 0 should be planted, got {other:?}"),
    }
    assert_eq!(dash.trees[1], TreeSlot::Locked { required_level: 2 });
}

#[test]
fn rename_tree_by_slot() {
    let engine = engine();
    engine.plant_named("Oak").unwrap();

    engine.rename_tree(0, "Old Oak").unwrap();
    assert_eq!(engine.storage().trees().unwrap()[0].name, "Old Oak");

    assert!(matches!(engine.rename_tree(1, "Elm"), Err(Error::NotFound(_))));
    assert!(matches!(
        engine.rename_tree(0, "   "),
        Err(Error::InvalidInput(_))
    ));
}
