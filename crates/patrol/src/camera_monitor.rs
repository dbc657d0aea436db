use formats::CameraMonitorConfig;
use foundation::math::Vec3;
use runtime::{TimerId, Timers};
use scene::Camera;
use tracing::{debug, info};

/// Periodic camera pose logging.
///
/// Owns at most one repeating timer in the session's timer set; every
/// reconfiguration cancels it before arming a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraMonitor {
    config: CameraMonitorConfig,
    timer: Option<TimerId>,
}

/// One sample, with the fields the monitor was asked to log.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraSample {
    pub position: Option<Vec3>,
    pub look_at: Option<Vec3>,
}

impl CameraMonitor {
    pub fn new(config: CameraMonitorConfig) -> Self {
        Self {
            config,
            timer: None,
        }
    }

    pub fn config(&self) -> &CameraMonitorConfig {
        &self.config
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Applies `config` and re-arms the timer at `now_ms` if enabled.
    pub fn configure<T: Clone>(
        &mut self,
        config: CameraMonitorConfig,
        timers: &mut Timers<T>,
        now_ms: u64,
        payload: T,
    ) {
        self.disarm(timers);
        self.config = config;
        if self.config.enabled {
            self.timer = Some(timers.every(now_ms, self.config.interval_ms, payload));
            debug!(interval_ms = self.config.interval_ms, "camera monitor armed");
        }
    }

    pub fn disarm<T: Clone>(&mut self, timers: &mut Timers<T>) {
        if let Some(id) = self.timer.take() {
            timers.cancel(id);
        }
    }

    /// Forgets the timer without touching a timer set that was cleared.
    pub fn forget(&mut self) {
        self.timer = None;
    }

    pub fn sample(&self, camera: Camera) -> CameraSample {
        let sample = CameraSample {
            position: self.config.log_position.then_some(camera.position),
            look_at: self.config.log_look_at.then_some(camera.look_at),
        };
        match (sample.position, sample.look_at) {
            (Some(p), Some(l)) => info!(
                x = p.x, y = p.y, z = p.z,
                look_x = l.x, look_y = l.y, look_z = l.z,
                "camera"
            ),
            (Some(p), None) => info!(x = p.x, y = p.y, z = p.z, "camera position"),
            (None, Some(l)) => info!(x = l.x, y = l.y, z = l.z, "camera look-at"),
            (None, None) => {}
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::CameraMonitor;
    use formats::CameraMonitorConfig;
    use foundation::math::Vec3;
    use runtime::Timers;
    use scene::Camera;

    fn enabled(interval_ms: u64) -> CameraMonitorConfig {
        CameraMonitorConfig {
            enabled: true,
            interval_ms,
            log_position: true,
            log_look_at: false,
        }
    }

    #[test]
    fn reconfigure_replaces_the_timer() {
        let mut timers = Timers::new();
        let mut monitor = CameraMonitor::new(CameraMonitorConfig::default());
        monitor.configure(enabled(1000), &mut timers, 0, ());
        let first = monitor.timer().expect("armed");
        monitor.configure(enabled(250), &mut timers, 0, ());
        assert!(!timers.is_pending(first));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.advance(250).len(), 1);
    }

    #[test]
    fn disabling_disarms() {
        let mut timers = Timers::new();
        let mut monitor = CameraMonitor::new(CameraMonitorConfig::default());
        monitor.configure(enabled(1000), &mut timers, 0, ());
        monitor.configure(CameraMonitorConfig::default(), &mut timers, 0, ());
        assert!(!monitor.is_armed());
        assert!(timers.is_empty());
    }

    #[test]
    fn sample_respects_flags() {
        let monitor = CameraMonitor::new(enabled(1000));
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        let sample = monitor.sample(cam);
        assert_eq!(sample.position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(sample.look_at, None);
    }
}
