//! SVG chart rendering for benchmark comparisons

use std::path::{Path, PathBuf};

use crate::analysis::{self, ComparisonReport, ConditionPair};
use crate::config::ChartConfig;
use crate::records::{BenchmarkRecord, Condition};

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 4;
const MAX_X_TICKS: usize = 10;

const FONT: &str = "font-family=\"sans-serif\"";
const TEXT_COLOR: &str = "#1e293b";
const MUTED_COLOR: &str = "#64748b";
const GRID_COLOR: &str = "#cbd5e1";

/// Error type for chart output
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    Time,
    Length,
    TimePerPrompt,
    LengthPerPrompt,
    Accuracy,
    LengthByCorrectness,
}

impl ChartView {
    pub fn all() -> [ChartView; 6] {
        [
            ChartView::Time,
            ChartView::Length,
            ChartView::TimePerPrompt,
            ChartView::LengthPerPrompt,
            ChartView::Accuracy,
            ChartView::LengthByCorrectness,
        ]
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartView::Time => "time.svg",
            ChartView::Length => "length.svg",
            ChartView::TimePerPrompt => "time_per_prompt.svg",
            ChartView::LengthPerPrompt => "length_per_prompt.svg",
            ChartView::Accuracy => "accuracy.svg",
            ChartView::LengthByCorrectness => "length_by_correctness.svg",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartView::Time => "Average Response Time",
            ChartView::Length => "Average Response Length",
            ChartView::TimePerPrompt => "Time per Prompt",
            ChartView::LengthPerPrompt => "Length per Prompt",
            ChartView::Accuracy => "Accuracy",
            ChartView::LengthByCorrectness => "Length by Correctness",
        }
    }

    /// Views that only make sense once responses have been judged
    pub fn needs_correctness(&self) -> bool {
        matches!(self, ChartView::Accuracy | ChartView::LengthByCorrectness)
    }
}

/// A labelled bar; `None` renders as an empty "no data" slot
#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: Option<f64>,
    pub color: String,
}

/// A labelled line over prompt index 1..=N
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub color: String,
}

/// Renders the comparison views into a directory
pub struct ChartEmitter {
    config: ChartConfig,
}

impl ChartEmitter {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Views to render for this report
    pub fn views(report: &ComparisonReport) -> Vec<ChartView> {
        ChartView::all()
            .into_iter()
            .filter(|v| !v.needs_correctness() || report.has_correctness_data())
            .collect()
    }

    /// Render every applicable view into `dir`, creating it if needed
    pub fn emit(
        &self,
        records: &[BenchmarkRecord],
        report: &ComparisonReport,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>, ChartError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for view in Self::views(report) {
            let path = dir.join(view.file_name());
            std::fs::write(&path, self.render(view, records, report))?;
            tracing::debug!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Render a single view to SVG text
    pub fn render(&self, view: ChartView, records: &[BenchmarkRecord], report: &ComparisonReport) -> String {
        match view {
            ChartView::Time => self.bar_chart(view.title(), "Time (ms)", &self.condition_bars(&report.mean_time_ms), None),
            ChartView::Length => self.bar_chart(view.title(), "Characters", &self.condition_bars(&report.mean_length), None),
            ChartView::TimePerPrompt => self.line_chart(
                view.title(),
                "Time (ms)",
                &self.condition_series(|c| analysis::time_series(records, c)),
            ),
            ChartView::LengthPerPrompt => self.line_chart(
                view.title(),
                "Characters",
                &self.condition_series(|c| analysis::length_series(records, c)),
            ),
            ChartView::Accuracy => {
                let accuracy = report
                    .correctness
                    .as_ref()
                    .map(|c| c.accuracy_pct)
                    .unwrap_or_default();
                self.bar_chart(view.title(), "Percentage", &self.condition_bars(&accuracy), Some(100.0))
            }
            ChartView::LengthByCorrectness => {
                let bars = self.correctness_bars(report);
                self.bar_chart(view.title(), "Characters", &bars, None)
            }
        }
    }

    fn condition_bars(&self, pair: &ConditionPair) -> Vec<Bar> {
        Condition::all()
            .into_iter()
            .map(|c| Bar {
                label: c.label().to_string(),
                value: pair.get(c),
                color: self.config.color(c).to_string(),
            })
            .collect()
    }

    fn condition_series(&self, values: impl Fn(Condition) -> Vec<f64>) -> Vec<Series> {
        Condition::all()
            .into_iter()
            .map(|c| Series {
                label: c.label().to_string(),
                values: values(c),
                color: self.config.color(c).to_string(),
            })
            .collect()
    }

    fn correctness_bars(&self, report: &ComparisonReport) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(4);
        let mut palette = self.config.correctness_palette.iter();
        for condition in Condition::all() {
            let split = report
                .correctness
                .as_ref()
                .map(|c| *c.length_split(condition))
                .unwrap_or_default();
            let short = match condition {
                Condition::WithTools => "With",
                Condition::WithoutTools => "Without",
            };
            for (suffix, value) in [("Correct", split.correct), ("Wrong", split.incorrect)] {
                bars.push(Bar {
                    label: format!("{} ({})", short, suffix),
                    value,
                    color: palette.next().cloned().unwrap_or_else(|| self.config.color(condition).to_string()),
                });
            }
        }
        bars
    }

    /// Vertical bar chart; `y_max` pins the axis (e.g. 100 for percentages)
    pub fn bar_chart(&self, title: &str, y_label: &str, bars: &[Bar], y_max: Option<f64>) -> String {
        let width = self.config.width as f64;
        let height = self.config.height as f64;
        let mut svg = Svg::new(width, height);
        svg.frame(title, y_label);

        let plot = PlotArea::new(width, height);
        let max = y_max.unwrap_or_else(|| axis_max(bars.iter().filter_map(|b| b.value)));
        svg.y_axis(&plot, max);

        if !bars.is_empty() {
            let slot = plot.width / bars.len() as f64;
            let bar_width = slot * 0.6;
            for (i, bar) in bars.iter().enumerate() {
                let x = plot.left + i as f64 * slot + (slot - bar_width) / 2.0;
                let center = x + bar_width / 2.0;
                match bar.value {
                    Some(value) => {
                        let h = plot.scale(value, max);
                        let y = plot.bottom() - h;
                        svg.push(format!(
                            r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="{}" rx="2"/>"##,
                            x, y, bar_width, h, escape(&bar.color), self.config.bar_opacity
                        ));
                        svg.text(center, y - 6.0, 11, TEXT_COLOR, "middle", &format_value(value));
                    }
                    None => {
                        svg.text(center, plot.bottom() - 6.0, 11, MUTED_COLOR, "middle", "no data");
                    }
                }
                svg.text(center, plot.bottom() + 20.0, 12, TEXT_COLOR, "middle", &bar.label);
            }
        }

        svg.finish()
    }

    /// Multi-series line chart over prompt index
    pub fn line_chart(&self, title: &str, y_label: &str, series: &[Series]) -> String {
        let width = self.config.trend_width as f64;
        let height = self.config.height as f64;
        let mut svg = Svg::new(width, height);
        svg.frame(title, y_label);

        let plot = PlotArea::new(width, height);
        let max = axis_max(series.iter().flat_map(|s| s.values.iter().copied()));
        svg.y_axis(&plot, max);

        let n = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        let x_at = |i: usize| -> f64 {
            if n <= 1 {
                plot.left + plot.width / 2.0
            } else {
                plot.left + i as f64 * plot.width / (n - 1) as f64
            }
        };

        // X ticks, thinned for long runs
        let step = n.div_ceil(MAX_X_TICKS).max(1);
        for i in (0..n).step_by(step) {
            svg.text(x_at(i), plot.bottom() + 20.0, 11, MUTED_COLOR, "middle", &(i + 1).to_string());
        }
        svg.text(plot.left + plot.width / 2.0, height - 20.0, 12, MUTED_COLOR, "middle", "Prompt");

        for s in series.iter().filter(|s| !s.values.is_empty()) {
            let points: Vec<String> = s
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), plot.bottom() - plot.scale(*v, max)))
                .collect();
            svg.push(format!(
                r##"  <polyline points="{}" stroke="{}" stroke-width="2" fill="none"/>"##,
                points.join(" "),
                escape(&s.color)
            ));
        }

        // Legend
        let legend_x = width - MARGIN_RIGHT - 140.0;
        for (i, s) in series.iter().enumerate() {
            let y = MARGIN_TOP + 10.0 + i as f64 * 20.0;
            svg.push(format!(
                r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="3"/>"##,
                legend_x,
                y,
                legend_x + 20.0,
                y,
                escape(&s.color)
            ));
            svg.text(legend_x + 28.0, y + 4.0, 12, TEXT_COLOR, "start", &s.label);
        }

        svg.finish()
    }
}

struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(width: f64, height: f64) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn scale(&self, value: f64, max: f64) -> f64 {
        (value.max(0.0) / max * self.height).min(self.height)
    }
}

/// Accumulates SVG elements
struct Svg {
    width: f64,
    height: f64,
    body: Vec<String>,
}

impl Svg {
    fn new(width: f64, height: f64) -> Self {
        let mut body = Vec::new();
        body.push(format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"##,
            w = width,
            h = height
        ));
        body.push(format!(r##"  <rect width="{}" height="{}" fill="#ffffff"/>"##, width, height));
        Self { width, height, body }
    }

    fn push(&mut self, element: String) {
        self.body.push(element);
    }

    fn text(&mut self, x: f64, y: f64, size: u32, color: &str, anchor: &str, content: &str) {
        self.body.push(format!(
            r##"  <text x="{:.1}" y="{:.1}" {} font-size="{}" fill="{}" text-anchor="{}">{}</text>"##,
            x,
            y,
            FONT,
            size,
            color,
            anchor,
            escape(content)
        ));
    }

    /// Title and rotated y-axis label
    fn frame(&mut self, title: &str, y_label: &str) {
        self.body.push(format!(
            r##"  <text x="{:.1}" y="32" {} font-size="18" font-weight="bold" fill="{}" text-anchor="middle">{}</text>"##,
            self.width / 2.0,
            FONT,
            TEXT_COLOR,
            escape(title)
        ));
        let mid = self.height / 2.0;
        self.body.push(format!(
            r##"  <text x="20" y="{:.1}" {} font-size="12" fill="{}" text-anchor="middle" transform="rotate(-90 20 {:.1})">{}</text>"##,
            mid,
            FONT,
            MUTED_COLOR,
            mid,
            escape(y_label)
        ));
    }

    /// Horizontal grid lines with tick labels, plus the baseline
    fn y_axis(&mut self, plot: &PlotArea, max: f64) {
        for k in 0..=Y_TICKS {
            let value = max * k as f64 / Y_TICKS as f64;
            let y = plot.bottom() - plot.scale(value, max);
            self.body.push(format!(
                r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-opacity="0.3" stroke-dasharray="2,2"/>"##,
                plot.left,
                y,
                plot.left + plot.width,
                y,
                GRID_COLOR
            ));
            self.text(plot.left - 8.0, y + 4.0, 10, MUTED_COLOR, "end", &format_value(value));
        }
        self.body.push(format!(
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}"/>"##,
            plot.left,
            plot.bottom(),
            plot.left + plot.width,
            plot.bottom(),
            MUTED_COLOR
        ));
    }

    fn finish(mut self) -> String {
        self.body.push("</svg>".to_string());
        let mut out = self.body.join("\n");
        out.push('\n');
        out
    }
}

/// Axis ceiling with 10% headroom; 1.0 when there is nothing positive to show
fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn format_value(value: f64) -> String {
    if value.abs() >= 100.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Verdict;

    fn sample_records(judged: bool) -> Vec<BenchmarkRecord> {
        let verdicts = if judged {
            (Verdict::Correct, Verdict::Incorrect)
        } else {
            (Verdict::Unset, Verdict::Unset)
        };
        vec![
            BenchmarkRecord::new("q1", "a", "12", "1234")
                .with_durations(100, 200)
                .with_verdicts(verdicts.0, verdicts.1),
            BenchmarkRecord::new("q2", "a", "123", "12345").with_durations(150, 250),
        ]
    }

    #[test]
    fn test_views_depend_on_correctness() {
        let unjudged = ComparisonReport::from_records(&sample_records(false));
        let views = ChartEmitter::views(&unjudged);
        assert_eq!(views.len(), 4);
        assert!(!views.contains(&ChartView::Accuracy));

        let judged = ComparisonReport::from_records(&sample_records(true));
        assert_eq!(ChartEmitter::views(&judged).len(), 6);
    }

    #[test]
    fn test_emit_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("charts");
        let records = sample_records(true);
        let report = ComparisonReport::from_records(&records);

        let emitter = ChartEmitter::new(ChartConfig::default());
        let written = emitter.emit(&records, &report, &out).unwrap();

        assert_eq!(written.len(), 6);
        for path in &written {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.starts_with("<svg"));
            assert!(svg.trim_end().ends_with("</svg>"));
        }
        assert!(out.join("length_by_correctness.svg").exists());
    }

    #[test]
    fn test_missing_partition_renders_no_data() {
        let records = sample_records(true);
        let report = ComparisonReport::from_records(&records);
        let emitter = ChartEmitter::new(ChartConfig::default());

        let svg = emitter.render(ChartView::LengthByCorrectness, &records, &report);
        // With/Wrong and Without/Correct have no samples
        assert_eq!(svg.matches(">no data<").count(), 2);
        assert!(svg.contains("With (Correct)"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_empty_records_render() {
        let report = ComparisonReport::from_records(&[]);
        let emitter = ChartEmitter::new(ChartConfig::default());

        let bars = emitter.render(ChartView::Time, &[], &report);
        assert_eq!(bars.matches(">no data<").count(), 2);
        let lines = emitter.render(ChartView::TimePerPrompt, &[], &report);
        assert!(!lines.contains("<polyline"));
        assert!(!lines.contains("NaN"));
    }

    #[test]
    fn test_line_chart_uses_palette() {
        let records = sample_records(false);
        let report = ComparisonReport::from_records(&records);
        let mut config = ChartConfig::default();
        config.with_tools_color = "#112233".to_string();
        let emitter = ChartEmitter::new(config);

        let svg = emitter.render(ChartView::LengthPerPrompt, &records, &report);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(r##"stroke="#112233""##));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(150.0), "150");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(0.0), "0");
    }
}
