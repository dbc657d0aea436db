/// Whether a node is drawn. Hidden nodes keep their transform and color.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    pub const SHOWN: Visibility = Visibility { visible: true };
    pub const HIDDEN: Visibility = Visibility { visible: false };
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        Self { visible }
    }
}
