use formats::SceneConfig;
use layers::fence::FENCE_NODE_NAME;
use patrol::{Transition, TwinEvent, TwinSession};
use scene::{SceneHost, Severity, World};

fn transitions(events: &[runtime::Event<TwinEvent>]) -> Vec<(String, Transition)> {
    events
        .iter()
        .filter_map(|e| match &e.payload {
            TwinEvent::Fence { agent, transition } => Some((agent.clone(), *transition)),
            _ => None,
        })
        .collect()
}

#[test]
fn built_in_scene_patrols_through_the_fence() {
    let mut session = TwinSession::start(World::new(), SceneConfig::default());
    assert_eq!(session.agents().count(), 2);
    assert_eq!(session.watched_agent(), Some("robot-1"));
    assert!(session.is_patrolling());

    // About 25 s of patrol at 60 fps: robot-1 walks to its track and clips
    // the fence corner on the first straight.
    let mut events = Vec::new();
    for _ in 0..1500 {
        session.update();
        events.extend(session.drain_events());
    }

    let seen = transitions(&events);
    assert!(seen.len() >= 2, "transitions: {seen:?}");
    assert!(seen.iter().all(|(agent, _)| agent == "robot-1"));
    for (i, (_, transition)) in seen.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Transition::Entered
        } else {
            Transition::Exited
        };
        assert_eq!(*transition, expected);
    }

    let world = session.scene();
    let warnings = world
        .notifications()
        .iter()
        .filter(|n| n.severity == Severity::Warning)
        .count();
    assert_eq!(warnings, seen.iter().filter(|(_, t)| *t == Transition::Entered).count());

    let samples = events
        .iter()
        .filter(|e| matches!(e.payload, TwinEvent::CameraSampled { .. }))
        .count();
    assert!(samples >= 24, "camera samples: {samples}");
}

#[test]
fn robot_zero_keeps_walking_while_robot_one_dwells() {
    let mut session = TwinSession::start(World::new(), SceneConfig::default());
    let mut entered = false;
    for _ in 0..1500 {
        session.update();
        if transitions(&session.drain_events())
            .iter()
            .any(|(_, t)| *t == Transition::Entered)
        {
            entered = true;
            break;
        }
    }
    assert!(entered);
    assert!(!session.is_patrolling());

    let before = session.model_transform("robot-0").expect("robot-0").position;
    session.run_frames(30);
    let after = session.model_transform("robot-0").expect("robot-0").position;
    assert!(before.distance(after) > 2.0);

    let fence = session.scene().lookup(FENCE_NODE_NAME).expect("fence");
    assert_eq!(
        session.scene().color(fence),
        Some(session.fence_config().alert_color)
    );
}

#[test]
fn shutdown_is_final() {
    let mut session = TwinSession::start(World::new(), SceneConfig::default());
    session.run_frames(10);
    session.shutdown();
    session.drain_events();

    let before = session.model_transform("robot-1").expect("robot-1").position;
    session.run_frames(120);
    assert!(session.drain_events().is_empty());
    assert_eq!(
        session.model_transform("robot-1").expect("robot-1").position,
        before
    );
}
