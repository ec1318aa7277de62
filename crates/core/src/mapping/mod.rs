use serde::{Deserialize, Serialize};

/// Narrowest bar the layout produces.
pub const MIN_BAR_WIDTH: u32 = 2;

/// Converts values into bar heights relative to the tallest value on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightMapping {
    pub container_height: f32,
    /// Headroom kept free above the tallest bar.
    pub padding: f32,
}

impl Default for HeightMapping {
    fn default() -> Self {
        Self {
            container_height: 400.0,
            padding: 20.0,
        }
    }
}

impl HeightMapping {
    pub fn new(container_height: f32, padding: f32) -> Self {
        Self {
            container_height,
            padding,
        }
    }

    pub fn usable_height(&self) -> f32 {
        (self.container_height - self.padding).max(0.0)
    }

    pub fn height(&self, value: u32, max_value: u32) -> f32 {
        if max_value == 0 {
            return 0.0;
        }
        value as f32 / max_value as f32 * self.usable_height()
    }
}

/// Width of each bar when `count` bars share `container_width`, one unit of
/// gap per bar.
pub fn bar_width(container_width: u32, count: usize) -> u32 {
    if count == 0 {
        return MIN_BAR_WIDTH;
    }
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    (container_width.saturating_sub(count) / count).max(MIN_BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_scale_against_the_maximum() {
        let mapping = HeightMapping::new(120.0, 20.0);
        assert_eq!(mapping.height(100, 100), 100.0);
        assert_eq!(mapping.height(25, 100), 25.0);
        assert_eq!(mapping.height(5, 0), 0.0);
    }

    #[test]
    fn bar_width_never_drops_below_minimum() {
        assert_eq!(bar_width(1000, 10), 99);
        assert_eq!(bar_width(100, 200), MIN_BAR_WIDTH);
        assert_eq!(bar_width(100, 0), MIN_BAR_WIDTH);
    }
}
