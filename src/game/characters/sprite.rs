// Render-facing sprite state owned by each entity

/// Sorting layer names the host renderer knows about
pub const DEFAULT_LAYER: &str = "Default";
pub const FOREGROUND_LAYER: &str = "Foreground";

/// Draw order that puts a sprite above all other scene content
pub const TOP_SORTING_ORDER: i32 = 100;

/// What the renderer needs to draw an entity's sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteState {
    pub visible: bool,
    /// Horizontal scale sign (+1 as drawn, -1 mirrored)
    pub scale_x: f32,
    pub sorting_layer: &'static str,
    pub sorting_order: i32,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self {
            visible: true,
            scale_x: 1.0,
            sorting_layer: DEFAULT_LAYER,
            sorting_order: 0,
        }
    }
}

impl SpriteState {
    /// Draw above everything else in the scene
    pub fn bring_to_front(&mut self) {
        self.sorting_layer = FOREGROUND_LAYER;
        self.sorting_order = TOP_SORTING_ORDER;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sprite() {
        let sprite = SpriteState::default();
        assert!(sprite.visible);
        assert_eq!(sprite.scale_x, 1.0);
        assert_eq!(sprite.sorting_layer, DEFAULT_LAYER);
    }

    #[test]
    fn test_bring_to_front() {
        let mut sprite = SpriteState::default();
        sprite.bring_to_front();
        assert_eq!(sprite.sorting_layer, FOREGROUND_LAYER);
        assert_eq!(sprite.sorting_order, TOP_SORTING_ORDER);
    }
}
