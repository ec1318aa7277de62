use std::io::Write;

use sort_visualiser_core::{
    AlgorithmInfo, BarChart, BarClass, HeightMapping, Renderer, Stats,
};

const GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const COMPARING: &str = "\x1b[33m";
const SORTED: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Draws the bars as a single row of block glyphs, redrawn in place after
/// every directive.
pub struct TerminalRenderer<W> {
    chart: BarChart,
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        let levels = (GLYPHS.len() - 1) as f32;
        Self {
            chart: BarChart::new(HeightMapping::new(levels, 0.0)),
            out,
        }
    }

    fn frame(&self) -> String {
        let mut line = String::with_capacity(self.chart.bars().len() * 8 + 64);
        line.push_str("\r\x1b[2K");
        for bar in self.chart.bars() {
            let level = (bar.height.ceil() as usize).min(GLYPHS.len() - 1);
            let colour = if bar.comparing {
                Some(COMPARING)
            } else if bar.sorted {
                Some(SORTED)
            } else {
                None
            };
            match colour {
                Some(colour) => {
                    line.push_str(colour);
                    line.push(GLYPHS[level]);
                    line.push_str(RESET);
                }
                None => line.push(GLYPHS[level]),
            }
        }
        let stats = self.chart.stats();
        line.push_str(&format!(
            "  comparisons {} swaps {} time {}ms",
            stats.comparisons, stats.swaps, stats.elapsed_ms
        ));
        line
    }

    fn draw(&mut self) {
        let frame = self.frame();
        if let Err(err) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
        {
            tracing::debug!(%err, "failed to draw frame");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, sequence: &[u32]) {
        self.chart.render(sequence);
        self.draw();
    }

    fn highlight(&mut self, indices: &[usize], class: BarClass) {
        self.chart.highlight(indices, class);
        self.draw();
    }

    fn unhighlight(&mut self, indices: &[usize]) {
        self.chart.unhighlight(indices);
        self.draw();
    }

    fn set_height(&mut self, index: usize, value: u32) {
        self.chart.set_height(index, value);
        self.draw();
    }

    fn exchange_heights(&mut self, i: usize, j: usize) {
        self.chart.exchange_heights(i, j);
        self.draw();
    }

    fn clear_marks(&mut self) {
        self.chart.clear_marks();
        self.draw();
    }

    fn show_stats(&mut self, stats: &Stats) {
        self.chart.show_stats(stats);
        self.draw();
    }

    fn show_algorithm(&mut self, info: Option<&AlgorithmInfo>) {
        self.chart.show_algorithm(info);
        if let Some(info) = info {
            let header = format!(
                "\r\x1b[2K{}: {}\n  time {} | space {}\n",
                info.name, info.description, info.time, info.space
            );
            if let Err(err) = self.out.write_all(header.as_bytes()) {
                tracing::debug!(%err, "failed to draw algorithm header");
            }
            self.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_scales_bars_and_colours_marks() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&[8, 4, 0]);
        renderer.highlight(&[0], BarClass::Sorted);
        renderer.highlight(&[1], BarClass::Comparing);

        let frame = renderer.frame();
        assert!(frame.contains(&format!("{SORTED}█{RESET}")));
        assert!(frame.contains(&format!("{COMPARING}▄{RESET}")));
        assert!(frame.contains("comparisons 0 swaps 0"));
    }

    #[test]
    fn every_update_is_written_out() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&[1, 2]);
        renderer.exchange_heights(0, 1);
        renderer.show_stats(&Stats {
            comparisons: 3,
            swaps: 1,
            elapsed_ms: 40,
        });

        let written = String::from_utf8(renderer.out.clone()).unwrap();
        assert_eq!(written.matches("\r\x1b[2K").count(), 3);
        assert!(written.ends_with("comparisons 3 swaps 1 time 40ms"));
    }
}
