//! Built-in scene used when no document can be loaded.

use foundation::color::Color;
use foundation::math::Vec3;

use crate::scene_config::{
    AnimationConfig, CameraConfig, CameraMonitorConfig, CameraPose, FenceConfig, LabelConfig,
    ModelDescriptor, ModelLists, ModelSpec, PatrolAssignment, PatrolPathConfig, Placement,
    SceneConfig, SkyboxFilterConfig,
};

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                position: Vec3::new(0.72, 3.52, 60.0),
                look_at: Vec3::ZERO,
                follow_restore: CameraPose::default(),
                monitor: CameraMonitorConfig {
                    enabled: true,
                    interval_ms: 1000,
                    log_position: true,
                    log_look_at: true,
                },
            },
            skybox_filter: SkyboxFilterConfig::default(),
            models: ModelLists {
                simple: vec![ModelDescriptor::Gltf(ModelSpec::new(
                    "office-simple",
                    "gltf/DP_BanGong01_Simply.glb",
                ))],
                detailed: vec![ModelDescriptor::Fbx(ModelSpec {
                    id: Some(2),
                    placement: Placement {
                        scale: 0.01,
                        ..Placement::default()
                    },
                    ..ModelSpec::new("greenhouse", "fbx/9999.fbx")
                })],
                patrol: vec![
                    soldier(0, "robot-0", "track-2", false),
                    soldier(1, "robot-1", "track-1", true),
                ],
            },
            labels: vec![
                label("greenhouse-label", "Half-arch greenhouse", Vec3::new(0.0, 5.0, 0.0), 1.0),
                label("controller-label", "Greenhouse controller", Vec3::new(0.0, 2.5, 42.0), 1.0),
                label("sensor-label", "Environment sensor", Vec3::new(1.68, 2.0, 5.32), 1.5),
            ],
            fence: FenceConfig::new(fence_points()),
            patrol_paths: vec![
                PatrolPathConfig {
                    name: "track-1".into(),
                    points: track_1(),
                },
                PatrolPathConfig {
                    name: "track-2".into(),
                    points: track_2(),
                },
            ],
            frame_dt_s: 1.0 / 60.0,
        }
    }
}

fn soldier(id: u32, name: &str, path: &str, watch_fence: bool) -> ModelDescriptor {
    ModelDescriptor::Gltf(ModelSpec {
        id: Some(id),
        placement: Placement {
            rotation: Vec3::new(0.0, std::f64::consts::PI, 0.0),
            ..Placement::default()
        },
        animation: Some(AnimationConfig {
            clips: vec!["Run".into(), "Idle".into()],
            autoplay: Some("Run".into()),
        }),
        patrol: Some(PatrolAssignment {
            path: path.into(),
            watch_fence,
            ..PatrolAssignment::default()
        }),
        ..ModelSpec::new(name, "gltf/Soldier.glb")
    })
}

fn label(name: &str, text: &str, position: Vec3, scale: f64) -> LabelConfig {
    LabelConfig {
        name: name.into(),
        text: text.into(),
        color: Color::from_hex(0x3ac9b0),
        position,
        scale,
    }
}

fn ground(points: &[(f64, f64)]) -> Vec<Vec3> {
    points.iter().map(|&(x, z)| Vec3::new(x, 0.1, z)).collect()
}

pub fn fence_points() -> Vec<Vec3> {
    ground(&[
        (-26.69, 14.62),
        (-15.78, 15.53),
        (-15.37, 32.6),
        (-26.99, 30.22),
        (-26.69, 14.62),
    ])
}

fn track_1() -> Vec<Vec3> {
    ground(&[
        (-55.08, 15.45),
        (-5.66, 14.78),
        (-5.3, -7.37),
        (4.15, -7.55),
        (5.03, 20.44),
        (57.4, 22.28),
        (57.19, 33.91),
        (-48.2, 30.5),
        (-55.08, 15.45),
    ])
}

fn track_2() -> Vec<Vec3> {
    ground(&[
        (-75.96, 47.16),
        (-21.6, 48.44),
        (-9.39, 48.27),
        (-6.52, 28.42),
        (-4.78, -14.94),
        (4.9, -15.0),
        (5.21, 17.41),
        (6.42, 42.17),
        (18.94, 47.78),
        (69.62, 48.31),
        (69.22, 58.25),
        (33.06, 59.59),
        (13.88, 59.29),
        (-45.34, 57.61),
        (-71.48, 56.75),
        (-75.96, 47.16),
    ])
}
