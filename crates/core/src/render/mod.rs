use crate::{AlgorithmInfo, HeightMapping, Stats};

/// Highlight classes a bar can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarClass {
    Comparing,
    Sorted,
}

/// Rendering collaborator driven by the step sink. Called on every step, so
/// implementations should be cheap and must not fail.
pub trait Renderer {
    /// Rebuilds every bar from `sequence` and drops all highlights.
    fn render(&mut self, sequence: &[u32]);
    fn highlight(&mut self, indices: &[usize], class: BarClass);
    /// Removes the comparing highlight; sorted marks stay.
    fn unhighlight(&mut self, indices: &[usize]);
    fn set_height(&mut self, index: usize, value: u32);
    fn exchange_heights(&mut self, i: usize, j: usize);
    /// Drops every highlight, including sorted marks.
    fn clear_marks(&mut self);

    fn show_stats(&mut self, _stats: &Stats) {}

    fn show_algorithm(&mut self, _info: Option<&AlgorithmInfo>) {}
}

/// Renderer for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _sequence: &[u32]) {}
    fn highlight(&mut self, _indices: &[usize], _class: BarClass) {}
    fn unhighlight(&mut self, _indices: &[usize]) {}
    fn set_height(&mut self, _index: usize, _value: u32) {}
    fn exchange_heights(&mut self, _i: usize, _j: usize) {}
    fn clear_marks(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub value: u32,
    pub height: f32,
    pub comparing: bool,
    pub sorted: bool,
}

/// In-memory bar model. Frontends draw from it after each update.
#[derive(Debug, Default, Clone)]
pub struct BarChart {
    mapping: HeightMapping,
    bars: Vec<Bar>,
    max_value: u32,
    stats: Stats,
    algorithm: Option<AlgorithmInfo>,
}

impl BarChart {
    pub fn new(mapping: HeightMapping) -> Self {
        Self {
            mapping,
            ..Default::default()
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn mapping(&self) -> HeightMapping {
        self.mapping
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn algorithm(&self) -> Option<&AlgorithmInfo> {
        self.algorithm.as_ref()
    }

    pub fn values(&self) -> Vec<u32> {
        self.bars.iter().map(|bar| bar.value).collect()
    }

    pub fn sorted_count(&self) -> usize {
        self.bars.iter().filter(|bar| bar.sorted).count()
    }

    fn bar_mut(&mut self, index: usize) -> Option<&mut Bar> {
        self.bars.get_mut(index)
    }
}

impl Renderer for BarChart {
    fn render(&mut self, sequence: &[u32]) {
        self.max_value = sequence.iter().copied().max().unwrap_or(0);
        let (mapping, max_value) = (self.mapping, self.max_value);
        self.bars = sequence
            .iter()
            .map(|&value| Bar {
                value,
                height: mapping.height(value, max_value),
                comparing: false,
                sorted: false,
            })
            .collect();
    }

    fn highlight(&mut self, indices: &[usize], class: BarClass) {
        for &index in indices {
            if let Some(bar) = self.bar_mut(index) {
                match class {
                    BarClass::Comparing => bar.comparing = true,
                    BarClass::Sorted => bar.sorted = true,
                }
            }
        }
    }

    fn unhighlight(&mut self, indices: &[usize]) {
        for &index in indices {
            if let Some(bar) = self.bar_mut(index) {
                bar.comparing = false;
            }
        }
    }

    fn set_height(&mut self, index: usize, value: u32) {
        let (mapping, max_value) = (self.mapping, self.max_value.max(value));
        if let Some(bar) = self.bar_mut(index) {
            bar.value = value;
            bar.height = mapping.height(value, max_value);
        }
    }

    fn exchange_heights(&mut self, i: usize, j: usize) {
        if i >= self.bars.len() || j >= self.bars.len() || i == j {
            return;
        }
        let (a, b) = (self.bars[i].clone(), self.bars[j].clone());
        self.bars[i].value = b.value;
        self.bars[i].height = b.height;
        self.bars[j].value = a.value;
        self.bars[j].height = a.height;
    }

    fn clear_marks(&mut self) {
        for bar in &mut self.bars {
            bar.comparing = false;
            bar.sorted = false;
        }
    }

    fn show_stats(&mut self, stats: &Stats) {
        self.stats = *stats;
    }

    fn show_algorithm(&mut self, info: Option<&AlgorithmInfo>) {
        self.algorithm = info.cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(values: &[u32]) -> BarChart {
        let mut chart = BarChart::new(HeightMapping::new(110.0, 10.0));
        chart.render(values);
        chart
    }

    #[test]
    fn render_maps_heights_against_tallest_bar() {
        let chart = chart(&[50, 100, 25]);
        let heights: Vec<f32> = chart.bars().iter().map(|bar| bar.height).collect();
        assert_eq!(heights, vec![50.0, 100.0, 25.0]);
    }

    #[test]
    fn exchange_moves_heights_but_keeps_marks() {
        let mut chart = chart(&[10, 20]);
        chart.highlight(&[0], BarClass::Sorted);
        chart.exchange_heights(0, 1);

        assert_eq!(chart.values(), vec![20, 10]);
        assert!(chart.bars()[0].sorted);
        assert!(!chart.bars()[1].sorted);
    }

    #[test]
    fn unhighlight_keeps_sorted_marks() {
        let mut chart = chart(&[1, 2, 3]);
        chart.highlight(&[0, 1], BarClass::Comparing);
        chart.highlight(&[1], BarClass::Sorted);
        chart.unhighlight(&[0, 1]);

        assert!(chart.bars().iter().all(|bar| !bar.comparing));
        assert_eq!(chart.sorted_count(), 1);

        chart.clear_marks();
        assert_eq!(chart.sorted_count(), 0);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut chart = chart(&[4]);
        chart.highlight(&[7], BarClass::Comparing);
        chart.set_height(3, 9);
        chart.exchange_heights(0, 5);
        assert_eq!(chart.values(), vec![4]);
    }
}
