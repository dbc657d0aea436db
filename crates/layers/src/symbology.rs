use foundation::color::Color;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: Color,
    /// Height above the ground plane, in world units.
    pub lift: f64,
}

impl LayerStyle {
    pub const fn new(visible: bool, color: Color, lift: f64) -> Self {
        Self {
            visible,
            color,
            lift,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::WHITE,
            lift: 0.0,
        }
    }
}

/// Tracks are drawn in the fence's resting color, hidden until asked for.
pub const TRACK_STYLE: LayerStyle = LayerStyle::new(false, Color::rgb(51, 188, 176), 0.1);
