use std::collections::BTreeMap;

use formats::{
    BlendMode, CameraMonitorConfig, FenceConfig, PatrolAssignment, SceneConfig,
    SkyboxFilterConfig, SkyboxFilterPatch,
};
use foundation::color::Color;
use foundation::math::Vec3;
use layers::fence::FENCE_NODE_NAME;
use layers::skybox::SkyboxFilter;
use layers::{SceneAssembly, assemble_scene};
use runtime::{Event, EventBus, Frame, TimerId, Timers};
use scene::components::{LoopMode, Transform};
use scene::{SceneHost, Severity};
use tracing::{debug, info, warn};

use crate::camera::{CameraTween, DEFAULT_TWEEN_MS};
use crate::camera_monitor::CameraMonitor;
use crate::controller::{PatrolController, PatrolOptions};
use crate::error::{PatrolError, SessionError};
use crate::events::{PatrolEvent, Transition, TwinEvent};
use crate::geofence::GeofenceMonitor;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionTimer {
    DwellResume,
    CameraMonitor,
}

/// A controller plus what the session needs to drive its agent's clips.
#[derive(Debug)]
struct PatrolAgent {
    controller: PatrolController,
    loop_on_complete: bool,
    run_clip: String,
    idle_clip: String,
}

/// Everything a running twin owns: the scene host, its config, the patrol
/// controllers, the geofence, timers and the camera.
///
/// Drive it with [`TwinSession::update`] once per frame and drain
/// [`TwinEvent`]s afterwards. Dropping the session drops every controller and
/// pending timer with it.
pub struct TwinSession<S: SceneHost> {
    scene: S,
    config: SceneConfig,
    frame: Frame,
    agents: BTreeMap<String, PatrolAgent>,
    /// Agent whose positions drive the geofence.
    watched: Option<String>,
    /// Target of the patrol and first-person toggles: the watched agent, or
    /// else the first one by name.
    primary: Option<String>,
    geofence: GeofenceMonitor,
    timers: Timers<SessionTimer>,
    dwell: Option<TimerId>,
    camera_monitor: CameraMonitor,
    tween: Option<CameraTween>,
    skybox: SkyboxFilter,
    assembly: SceneAssembly,
    tracks_visible: bool,
    patrol_events: EventBus<PatrolEvent>,
    events: EventBus<TwinEvent>,
}

impl<S: SceneHost> TwinSession<S> {
    pub fn new(scene: S, config: SceneConfig) -> Self {
        let frame = Frame::new(0, config.frame_dt_s);
        let geofence = GeofenceMonitor::new(&config.fence.points);
        let skybox = SkyboxFilter::new(config.skybox_filter.clone());
        let mut timers = Timers::new();
        let mut camera_monitor = CameraMonitor::new(CameraMonitorConfig::default());
        camera_monitor.configure(
            config.camera.monitor.clone(),
            &mut timers,
            frame.time_ms(),
            SessionTimer::CameraMonitor,
        );
        Self {
            scene,
            config,
            frame,
            agents: BTreeMap::new(),
            watched: None,
            primary: None,
            geofence,
            timers,
            dwell: None,
            camera_monitor,
            tween: None,
            skybox,
            assembly: SceneAssembly::default(),
            tracks_visible: false,
            patrol_events: EventBus::new(),
            events: EventBus::new(),
        }
    }

    /// Builds a session from `config`, assembles the scene and starts every
    /// patrol.
    pub fn start(scene: S, config: SceneConfig) -> Self {
        let mut session = Self::new(scene, config);
        session.assemble();
        session.spawn_patrols();
        session
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn assembly(&self) -> &SceneAssembly {
        &self.assembly
    }

    pub fn geofence(&self) -> &GeofenceMonitor {
        &self.geofence
    }

    pub fn controller(&self, agent: &str) -> Option<&PatrolController> {
        self.agents.get(agent).map(|a| &a.controller)
    }

    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn primary_agent(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    pub fn watched_agent(&self) -> Option<&str> {
        self.watched.as_deref()
    }

    pub fn dwell_pending(&self) -> bool {
        self.dwell.is_some_and(|id| self.timers.is_pending(id))
    }

    pub fn camera_monitor(&self) -> &CameraMonitor {
        &self.camera_monitor
    }

    /// Places the configured camera and builds the static scene.
    pub fn assemble(&mut self) {
        self.scene.set_camera_position(self.config.camera.position);
        self.scene.set_camera_look_at(self.config.camera.look_at);
        self.assembly = assemble_scene(&self.config, &mut self.scene);
        self.tracks_visible = false;
    }

    /// Creates and runs one controller per patrol assignment. Assignments
    /// that cannot be built are logged and skipped. Returns how many started.
    pub fn spawn_patrols(&mut self) -> usize {
        let assignments: Vec<(String, PatrolAssignment)> = self
            .config
            .models
            .patrol
            .iter()
            .filter_map(|m| Some((m.name().to_string(), m.spec().patrol.clone()?)))
            .collect();

        let mut started = 0;
        let mut followers = Vec::new();
        for (agent, assignment) in assignments {
            match self.spawn_patrol(&agent, &assignment) {
                Ok(()) => {
                    started += 1;
                    if assignment.first_person {
                        followers.push(agent);
                    }
                }
                Err(err) => warn!(%agent, %err, "patrol not started"),
            }
        }
        self.primary = self
            .watched
            .clone()
            .or_else(|| self.agents.keys().next().cloned());

        // Only the primary agent may drive the camera.
        for agent in followers {
            if self.primary.as_deref() != Some(agent.as_str()) {
                warn!(%agent, "first person ignored for a non-primary agent");
                continue;
            }
            if let Some(entry) = self.agents.get_mut(&agent) {
                entry.controller.switch(true, &mut self.scene);
            }
        }
        info!(started, primary = ?self.primary, watched = ?self.watched, "patrols spawned");
        started
    }

    fn spawn_patrol(
        &mut self,
        agent: &str,
        assignment: &PatrolAssignment,
    ) -> Result<(), SessionError> {
        let waypoints = self
            .config
            .patrol_path(&assignment.path)
            .map(|p| p.points.clone())
            .ok_or_else(|| {
                SessionError::Config(formats::ConfigError::UnknownPatrolPath {
                    model: agent.to_string(),
                    path: assignment.path.clone(),
                })
            })?;
        let options = PatrolOptions {
            first_person: false,
            ..PatrolOptions::from_assignment(assignment, self.config.camera.follow_restore)
        };
        let mut controller = PatrolController::new(agent, waypoints, options)?;
        let closed = controller.path().is_closed();
        if assignment.loop_on_complete && !closed {
            debug!(%agent, path = %assignment.path, "open path, patrol stops at its last waypoint");
        }
        info!(
            %agent,
            path = %assignment.path,
            length = controller.path().length(),
            step = controller.step_length(),
            closed,
            "patrol ready"
        );
        controller.run();
        self.agents.insert(
            agent.to_string(),
            PatrolAgent {
                controller,
                loop_on_complete: assignment.loop_on_complete && closed,
                run_clip: assignment.run_clip.clone(),
                idle_clip: assignment.idle_clip.clone(),
            },
        );
        if assignment.watch_fence && self.watched.is_none() {
            self.watched = Some(agent.to_string());
        }
        Ok(())
    }

    /// Advances one frame: timers, camera tween, patrol ticks, then the
    /// reactions to what the patrols reported.
    pub fn update(&mut self) {
        self.frame = self.frame.next();
        let now = self.frame.time_ms();

        for (id, timer) in self.timers.advance(now) {
            match timer {
                SessionTimer::DwellResume => {
                    if self.dwell == Some(id) {
                        debug!("dwell elapsed");
                        if let Err(err) = self.toggle_patrol() {
                            warn!(%err, "dwell resume failed");
                        }
                    }
                }
                SessionTimer::CameraMonitor => {
                    let sample = self.camera_monitor.sample(self.scene.camera());
                    self.events.emit(
                        self.frame,
                        TwinEvent::CameraSampled {
                            position: sample.position,
                            look_at: sample.look_at,
                        },
                    );
                }
            }
        }

        if let Some(tween) = self.tween
            && tween.apply(&mut self.scene, now)
        {
            self.tween = None;
        }

        for agent in self.agents.values_mut() {
            match agent
                .controller
                .tick(&mut self.scene, self.frame, &mut self.patrol_events)
            {
                Ok(_) | Err(PatrolError::MissingAgent(_)) => {}
                Err(err) => warn!(agent = agent.controller.agent(), %err, "patrol tick failed"),
            }
        }

        for event in self.patrol_events.drain() {
            match event.payload {
                PatrolEvent::Completed { agent } => self.on_lap_completed(agent),
                PatrolEvent::Moved { agent, position } => {
                    if self.watched.as_deref() != Some(agent.as_str()) {
                        continue;
                    }
                    if let Some(transition) = self.geofence.observe(position) {
                        self.on_fence_transition(agent, transition);
                    }
                }
            }
        }
    }

    /// Runs [`Self::update`] `frames` times.
    pub fn run_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.update();
        }
    }

    fn on_lap_completed(&mut self, agent: String) {
        if let Some(entry) = self.agents.get_mut(&agent)
            && entry.loop_on_complete
        {
            entry.controller.reset();
            entry.controller.run();
        }
        debug!(%agent, "lap completed");
        self.events.emit(self.frame, TwinEvent::LapCompleted { agent });
    }

    fn on_fence_transition(&mut self, agent: String, transition: Transition) {
        let fence = self.scene.lookup(FENCE_NODE_NAME);
        match transition {
            Transition::Entered => {
                if let Some(fence) = fence {
                    self.scene.set_color(fence, self.config.fence.alert_color);
                }
                let dwell_ms = self.config.fence.dwell_ms;
                self.scene.notify_user(
                    &format!(
                        "Entered fence, pausing for {} seconds",
                        dwell_ms as f64 / 1000.0
                    ),
                    Severity::Warning,
                );
                if let Err(err) = self.toggle_patrol() {
                    warn!(%err, "could not pause on fence entry");
                }
                let id = self.timers.after(
                    self.frame.time_ms(),
                    dwell_ms,
                    SessionTimer::DwellResume,
                );
                self.dwell = Some(id);
            }
            Transition::Exited => {
                self.scene.notify_user("Left fence", Severity::Success);
                if let Some(fence) = fence {
                    self.scene.set_color(fence, self.config.fence.color);
                }
            }
        }
        info!(%agent, ?transition, "fence transition");
        self.events.emit(self.frame, TwinEvent::Fence { agent, transition });
    }

    fn cancel_dwell(&mut self) {
        if let Some(id) = self.dwell.take() {
            self.timers.cancel(id);
        }
    }

    fn primary_entry(&mut self) -> Result<(String, &mut PatrolAgent), SessionError> {
        let name = self.primary.clone().ok_or(SessionError::NoPatrol)?;
        let entry = self.agents.get_mut(&name).ok_or(SessionError::NoPatrol)?;
        Ok((name, entry))
    }

    /// Pauses the primary patrol if it runs, resumes it otherwise, and swaps
    /// its run and idle clips to match. A pending dwell resume is cancelled
    /// first, so each pause gets exactly one resume. Returns whether the
    /// patrol now runs.
    pub fn toggle_patrol(&mut self) -> Result<bool, SessionError> {
        self.cancel_dwell();
        let (name, entry) = self.primary_entry()?;
        let running = if entry.controller.is_running() {
            entry.controller.stop();
            false
        } else {
            if entry.controller.is_finished() {
                entry.controller.reset();
            }
            entry.controller.run();
            true
        };
        let (run_clip, idle_clip) = (entry.run_clip.clone(), entry.idle_clip.clone());
        self.scene.play_clip(&name, &run_clip, running, LoopMode::Repeat);
        self.scene.play_clip(&name, &idle_clip, !running, LoopMode::Repeat);
        debug!(agent = %name, running, "patrol toggled");
        self.events.emit(
            self.frame,
            TwinEvent::PatrolToggled {
                agent: name,
                running,
            },
        );
        Ok(running)
    }

    pub fn is_patrolling(&self) -> bool {
        self.primary
            .as_ref()
            .and_then(|name| self.agents.get(name))
            .is_some_and(|a| a.controller.is_running())
    }

    /// Switches first-person follow on the primary agent. Returns the new
    /// mode.
    pub fn toggle_first_person(&mut self) -> Result<bool, SessionError> {
        let enabled = !self.is_first_person();
        let name = self.primary.clone().ok_or(SessionError::NoPatrol)?;
        let entry = self.agents.get_mut(&name).ok_or(SessionError::NoPatrol)?;
        entry.controller.switch(enabled, &mut self.scene);
        if enabled {
            // Following and flying at once would fight over the camera.
            self.tween = None;
        }
        self.events
            .emit(self.frame, TwinEvent::FirstPersonChanged { enabled });
        Ok(enabled)
    }

    pub fn is_first_person(&self) -> bool {
        self.primary
            .as_ref()
            .and_then(|name| self.agents.get(name))
            .is_some_and(|a| a.controller.is_first_person())
    }

    pub fn tracks_visible(&self) -> bool {
        self.tracks_visible
    }

    pub fn set_tracks_visible(&mut self, visible: bool) {
        for &id in self.assembly.tracks.values() {
            self.scene.set_visibility(id, visible);
        }
        if self.tracks_visible != visible {
            self.tracks_visible = visible;
            self.events
                .emit(self.frame, TwinEvent::TracksVisibilityChanged { visible });
        }
    }

    pub fn toggle_tracks(&mut self) -> bool {
        let visible = !self.tracks_visible;
        self.set_tracks_visible(visible);
        visible
    }

    /// Flies the camera to `position` over `duration_ms` (3 s by default),
    /// looking at `look_at` throughout. A new flight replaces a running one.
    pub fn move_camera(&mut self, position: Vec3, look_at: Vec3, duration_ms: Option<u64>) {
        let now = self.frame.time_ms();
        let tween = CameraTween::new(
            self.scene.camera().position,
            position,
            look_at,
            now,
            duration_ms.unwrap_or(DEFAULT_TWEEN_MS),
        );
        if tween.apply(&mut self.scene, now) {
            self.tween = None;
        } else {
            self.tween = Some(tween);
        }
    }

    pub fn camera_tween(&self) -> Option<&CameraTween> {
        self.tween.as_ref()
    }

    pub fn show_model(&mut self, name: &str, visible: bool) -> Result<(), SessionError> {
        let id = self
            .scene
            .lookup(name)
            .ok_or_else(|| SessionError::UnknownNode(name.to_string()))?;
        self.scene.set_visibility(id, visible);
        Ok(())
    }

    pub fn model_transform(&self, name: &str) -> Option<Transform> {
        let id = self.scene.lookup(name)?;
        self.scene.transform(id)
    }

    pub fn set_fence_visible(&mut self, visible: bool) {
        self.config.set_fence_visible(visible);
        if let Some(id) = self.scene.lookup(FENCE_NODE_NAME) {
            self.scene.set_visibility(id, visible);
        }
    }

    /// Changes the fence's resting color. The node is recolored right away
    /// unless the watched agent is inside, where the alert color stays until
    /// it leaves.
    pub fn set_fence_color(&mut self, color: Color) {
        self.config.set_fence_color(color);
        if self.geofence.is_inside() {
            return;
        }
        if let Some(id) = self.scene.lookup(FENCE_NODE_NAME) {
            self.scene.set_color(id, color);
        }
    }

    pub fn fence_config(&self) -> &FenceConfig {
        &self.config.fence
    }

    /// Reconfigures the camera monitor; `None` keeps the current value.
    pub fn control_camera_monitor(
        &mut self,
        enabled: bool,
        interval_ms: Option<u64>,
        log_position: Option<bool>,
        log_look_at: Option<bool>,
    ) {
        let current = &self.config.camera.monitor;
        let monitor = CameraMonitorConfig {
            enabled,
            interval_ms: interval_ms.unwrap_or(current.interval_ms),
            log_position: log_position.unwrap_or(current.log_position),
            log_look_at: log_look_at.unwrap_or(current.log_look_at),
        };
        self.config.set_camera_monitor(monitor.clone());
        self.camera_monitor.configure(
            monitor,
            &mut self.timers,
            self.frame.time_ms(),
            SessionTimer::CameraMonitor,
        );
    }

    pub fn set_skybox_filter_enabled(&mut self, enabled: bool) {
        self.config.set_skybox_filter_enabled(enabled);
        self.sync_skybox();
    }

    pub fn set_skybox_filter_color(&mut self, color: Color) {
        self.config.set_skybox_filter_color(color);
        self.sync_skybox();
    }

    pub fn set_skybox_filter_intensity(&mut self, intensity: f64) {
        self.config.set_skybox_filter_intensity(intensity);
        self.sync_skybox();
    }

    pub fn set_skybox_filter_opacity(&mut self, opacity: f64) {
        self.config.set_skybox_filter_opacity(opacity);
        self.sync_skybox();
    }

    pub fn set_skybox_filter_blend_mode(&mut self, mode: BlendMode) {
        self.config.set_skybox_filter_blend_mode(mode);
        self.sync_skybox();
    }

    pub fn update_skybox_filter(&mut self, patch: &SkyboxFilterPatch) {
        self.config.update_skybox_filter(patch);
        self.sync_skybox();
    }

    pub fn skybox_filter_config(&self) -> &SkyboxFilterConfig {
        &self.config.skybox_filter
    }

    pub fn skybox_filter(&self) -> &SkyboxFilter {
        &self.skybox
    }

    fn sync_skybox(&mut self) {
        self.skybox.update(self.config.skybox_filter.clone());
    }

    pub fn drain_events(&mut self) -> Vec<Event<TwinEvent>> {
        self.events.drain()
    }

    /// Stops every patrol, cancels every timer and drops the camera flight
    /// and skybox overlay. The scene itself is left as is.
    pub fn shutdown(&mut self) {
        let cancelled = self.timers.clear();
        self.dwell = None;
        self.camera_monitor.forget();
        self.tween = None;
        for agent in self.agents.values_mut() {
            agent.controller.stop();
        }
        self.skybox.dispose();
        info!(cancelled, agents = self.agents.len(), "session shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::TwinSession;
    use crate::events::{Transition, TwinEvent};
    use formats::{
        AnimationConfig, BlendMode, CameraConfig, CameraPose, FenceConfig, ModelDescriptor,
        ModelLists, ModelSpec, PatrolAssignment, PatrolPathConfig, Placement, SceneConfig,
        SkyboxFilterConfig,
    };
    use foundation::color::Color;
    use foundation::math::Vec3;
    use layers::fence::FENCE_NODE_NAME;
    use layers::tracks::track_node_name;
    use pretty_assertions::assert_eq;
    use scene::{SceneHost, Severity, World};

    const ROVER: &str = "rover";

    /// A 10x10 fence at the origin and a rover shuttling along z = 5 from
    /// x = -5 to x = 15 and back, one unit per frame, 100 ms per frame.
    fn shuttle_config() -> SceneConfig {
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
            .map(|(x, z)| Vec3::new(x, 0.1, z))
            .to_vec();
        let start = Vec3::new(-5.0, 0.0, 5.0);
        let mut fence = FenceConfig::new(square);
        fence.dwell_ms = 500;

        SceneConfig {
            camera: CameraConfig {
                position: Vec3::new(0.0, 50.0, 50.0),
                look_at: Vec3::ZERO,
                follow_restore: CameraPose::default(),
                monitor: Default::default(),
            },
            skybox_filter: SkyboxFilterConfig::default(),
            models: ModelLists {
                patrol: vec![ModelDescriptor::Gltf(ModelSpec {
                    placement: Placement {
                        position: start,
                        ..Placement::default()
                    },
                    animation: Some(AnimationConfig {
                        clips: vec!["Run".into(), "Idle".into()],
                        autoplay: Some("Run".into()),
                    }),
                    patrol: Some(PatrolAssignment {
                        path: "shuttle".into(),
                        speed_factor: 10.0,
                        watch_fence: true,
                        ..PatrolAssignment::default()
                    }),
                    ..ModelSpec::new(ROVER, "gltf/Soldier.glb")
                })],
                ..ModelLists::default()
            },
            labels: vec![],
            fence,
            patrol_paths: vec![PatrolPathConfig {
                name: "shuttle".into(),
                points: vec![start, Vec3::new(15.0, 0.0, 5.0), start],
            }],
            frame_dt_s: 0.1,
        }
    }

    fn session() -> TwinSession<World> {
        TwinSession::start(World::new(), shuttle_config())
    }

    fn rover_x(session: &TwinSession<World>) -> f64 {
        session.model_transform(ROVER).expect("rover").position.x
    }

    fn fence_events(events: &[runtime::Event<TwinEvent>]) -> Vec<Transition> {
        events
            .iter()
            .filter_map(|e| match &e.payload {
                TwinEvent::Fence { transition, .. } => Some(*transition),
                _ => None,
            })
            .collect()
    }

    fn toggles(events: &[runtime::Event<TwinEvent>]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|e| match &e.payload {
                TwinEvent::PatrolToggled { running, .. } => Some(*running),
                _ => None,
            })
            .collect()
    }

    /// Updates until the rover enters the fence, returning the events so far.
    fn run_until_entry(session: &mut TwinSession<World>) -> Vec<runtime::Event<TwinEvent>> {
        let mut seen = Vec::new();
        for _ in 0..100 {
            session.update();
            seen.extend(session.drain_events());
            if fence_events(&seen).contains(&Transition::Entered) {
                return seen;
            }
        }
        panic!("rover never entered the fence");
    }

    #[test]
    fn spawns_the_watching_agent_as_primary() {
        let session = session();
        assert_eq!(session.primary_agent(), Some(ROVER));
        assert_eq!(session.watched_agent(), Some(ROVER));
        assert!(session.is_patrolling());
        assert!(session.geofence().has_fence());
    }

    #[test]
    fn entry_pauses_recolors_and_notifies() {
        let mut session = session();
        run_until_entry(&mut session);

        // x = 0 lies on the fence edge, which counts as inside.
        assert_eq!(rover_x(&session), 0.0);
        assert!(!session.is_patrolling());
        assert!(session.dwell_pending());

        let world = session.scene();
        let fence = world.lookup(FENCE_NODE_NAME).expect("fence");
        assert_eq!(world.color(fence), Some(session.fence_config().alert_color));
        let idle = world.clip_state(ROVER, "Idle").expect("idle");
        let run = world.clip_state(ROVER, "Run").expect("run");
        assert!(idle.playing && !run.playing);

        let last = world.notifications().last().expect("notification");
        assert_eq!(last.severity, Severity::Warning);
        assert_eq!(last.message, "Entered fence, pausing for 0.5 seconds");
    }

    #[test]
    fn dwell_resumes_exactly_once() {
        let mut session = session();
        let mut events = run_until_entry(&mut session);
        let paused_at = rover_x(&session);

        session.run_frames(4);
        assert!(!session.is_patrolling());
        assert_eq!(rover_x(&session), paused_at);

        session.run_frames(1);
        assert!(session.is_patrolling());
        session.run_frames(10);
        events.extend(session.drain_events());
        assert_eq!(toggles(&events), vec![false, true]);
    }

    #[test]
    fn manual_toggle_during_dwell_cancels_the_timer() {
        let mut session = session();
        let mut events = run_until_entry(&mut session);

        assert!(session.toggle_patrol().expect("toggle"));
        assert!(!session.dwell_pending());

        // Well past the dwell window: the timer must not toggle again.
        session.run_frames(8);
        assert!(session.is_patrolling());
        events.extend(session.drain_events());
        assert_eq!(toggles(&events), vec![false, true]);
    }

    #[test]
    fn transitions_fire_once_each_way() {
        let mut session = session();
        // Out to x = 15 and back to x = -5 with two dwells.
        session.run_frames(50);
        let events = session.drain_events();
        assert_eq!(
            fence_events(&events),
            vec![
                Transition::Entered,
                Transition::Exited,
                Transition::Entered,
                Transition::Exited
            ]
        );

        let world = session.scene();
        let fence = world.lookup(FENCE_NODE_NAME).expect("fence");
        assert_eq!(world.color(fence), Some(session.fence_config().color));
        let successes = world
            .notifications()
            .iter()
            .filter(|n| n.severity == Severity::Success)
            .count();
        assert_eq!(successes, 2);
    }

    #[test]
    fn laps_loop_when_configured() {
        let mut session = session();
        session.run_frames(120);
        let laps = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e.payload, TwinEvent::LapCompleted { .. }))
            .count();
        assert!(laps >= 2, "laps = {laps}");
        assert!(session.is_patrolling());
    }

    #[test]
    fn first_person_off_restores_default_view() {
        let mut session = session();
        assert!(session.toggle_first_person().expect("fp"));
        session.run_frames(3);
        let rover = session.model_transform(ROVER).expect("rover").position;
        assert_eq!(session.scene().camera().look_at, rover);

        assert!(!session.toggle_first_person().expect("fp"));
        let camera = session.scene().camera();
        assert_eq!(camera.position, Vec3::new(0.0, 10.0, 150.0));
        assert_eq!(camera.look_at, Vec3::ZERO);
    }

    #[test]
    fn tracks_toggle_together() {
        let mut session = session();
        let track = session
            .scene()
            .lookup(&track_node_name("shuttle"))
            .expect("track");
        assert_eq!(session.scene().is_visible(track), Some(false));
        assert!(session.toggle_tracks());
        assert_eq!(session.scene().is_visible(track), Some(true));
        assert!(!session.toggle_tracks());
        assert_eq!(session.scene().is_visible(track), Some(false));
    }

    #[test]
    fn camera_flight_supersedes_and_lands() {
        let mut session = session();
        session.move_camera(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, Some(1000));
        session.update();
        session.move_camera(Vec3::new(0.0, 20.0, 0.0), Vec3::UP, Some(200));
        assert_eq!(
            session.camera_tween().map(|t| t.target()),
            Some(Vec3::new(0.0, 20.0, 0.0))
        );
        session.run_frames(2);
        assert!(session.camera_tween().is_none());
        assert_eq!(session.scene().camera().position, Vec3::new(0.0, 20.0, 0.0));
        assert_eq!(session.scene().camera().look_at, Vec3::UP);
    }

    #[test]
    fn model_visibility_and_lookup() {
        let mut session = session();
        session.show_model(ROVER, false).expect("rover");
        let id = session.scene().lookup(ROVER).expect("rover");
        assert_eq!(session.scene().is_visible(id), Some(false));
        assert!(session.show_model("nobody", true).is_err());
        assert!(session.model_transform("nobody").is_none());
    }

    #[test]
    fn fence_visibility_updates_scene_and_config() {
        let mut session = session();
        session.set_fence_visible(false);
        assert!(!session.fence_config().visible);
        let fence = session.scene().lookup(FENCE_NODE_NAME).expect("fence");
        assert_eq!(session.scene().is_visible(fence), Some(false));
    }

    #[test]
    fn camera_monitor_samples_on_its_interval() {
        let mut session = session();
        session.control_camera_monitor(true, Some(300), Some(true), None);
        session.run_frames(9);
        let samples = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e.payload, TwinEvent::CameraSampled { .. }))
            .count();
        assert_eq!(samples, 3);

        session.control_camera_monitor(false, None, None, None);
        session.run_frames(9);
        assert!(!session
            .drain_events()
            .iter()
            .any(|e| matches!(e.payload, TwinEvent::CameraSampled { .. })));
    }

    #[test]
    fn skybox_setters_keep_config_and_overlay_in_step() {
        let mut session = session();
        assert!(!session.skybox_filter().is_active());
        session.set_skybox_filter_enabled(true);
        session.set_skybox_filter_opacity(4.0);
        session.set_skybox_filter_blend_mode(BlendMode::Screen);
        assert_eq!(session.skybox_filter_config().opacity, 1.0);
        let uniforms = session.skybox_filter().uniforms().expect("active");
        assert_eq!(uniforms.opacity, 1.0);
        assert_eq!(uniforms.blend_mode, 1);
    }

    #[test]
    fn shutdown_cancels_pending_dwell() {
        let mut session = session();
        run_until_entry(&mut session);
        session.shutdown();
        assert!(!session.dwell_pending());
        session.run_frames(20);
        assert!(!session.is_patrolling());
        assert!(session.drain_events().iter().all(|e| !matches!(
            e.payload,
            TwinEvent::PatrolToggled { .. }
        )));
    }

    #[test]
    fn no_patrol_means_toggles_fail() {
        let mut config = shuttle_config();
        config.models.patrol.clear();
        let mut session = TwinSession::start(World::new(), config);
        assert!(session.toggle_patrol().is_err());
        assert!(session.toggle_first_person().is_err());
        assert!(!session.is_patrolling());
    }

    #[test]
    fn unwatched_agents_ignore_the_fence() {
        let mut config = shuttle_config();
        if let Some(assignment) = config.models.patrol[0].spec_mut().patrol.as_mut() {
            assignment.watch_fence = false;
        }
        let mut session = TwinSession::start(World::new(), config);
        assert_eq!(session.watched_agent(), None);
        assert_eq!(session.primary_agent(), Some(ROVER));
        session.run_frames(50);
        assert!(fence_events(&session.drain_events()).is_empty());
        assert!(session.is_patrolling());
    }

    #[test]
    fn fence_color_change_survives_transitions() {
        let mut session = session();
        let blue = Color::rgb(0, 0, 255);
        let green = Color::rgb(0, 255, 0);
        let fence = session.scene().lookup(FENCE_NODE_NAME).expect("fence");

        session.set_fence_color(blue);
        assert_eq!(session.scene().color(fence), Some(blue));

        let mut events = run_until_entry(&mut session);
        let alert = session.fence_config().alert_color;
        assert_eq!(session.scene().color(fence), Some(alert));

        // Inside: the alert color stays until the rover leaves.
        session.set_fence_color(green);
        assert_eq!(session.scene().color(fence), Some(alert));
        assert_eq!(session.fence_config().color, green);

        // Dwell, resume, then out through x = 10 before turning back.
        session.run_frames(20);
        events.extend(session.drain_events());
        assert_eq!(
            fence_events(&events),
            vec![Transition::Entered, Transition::Exited]
        );
        assert_eq!(session.scene().color(fence), Some(green));
    }

    #[test]
    fn only_the_primary_agent_follows_in_first_person() {
        let mut config = shuttle_config();
        if let Some(assignment) = config.models.patrol[0].spec_mut().patrol.as_mut() {
            assignment.first_person = true;
        }
        let mut scout = config.models.patrol[0].clone();
        scout.spec_mut().name = "scout".into();
        if let Some(assignment) = scout.spec_mut().patrol.as_mut() {
            assignment.watch_fence = false;
        }
        config.models.patrol.push(scout);

        let session = TwinSession::start(World::new(), config);
        assert_eq!(session.primary_agent(), Some(ROVER));
        assert!(session.is_first_person());
        assert!(session.controller(ROVER).expect("rover").is_first_person());
        assert!(!session.controller("scout").expect("scout").is_first_person());
    }

    #[test]
    fn open_paths_stop_at_their_last_waypoint() {
        let mut config = shuttle_config();
        config.patrol_paths[0].points.pop();
        if let Some(assignment) = config.models.patrol[0].spec_mut().patrol.as_mut() {
            assignment.watch_fence = false;
        }
        let mut session = TwinSession::start(World::new(), config);
        assert!(!session.controller(ROVER).expect("rover").path().is_closed());

        session.run_frames(40);
        let laps = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e.payload, TwinEvent::LapCompleted { .. }))
            .count();
        assert_eq!(laps, 1);
        assert!(!session.is_patrolling());
        assert_eq!(rover_x(&session), 15.0);
    }
}
