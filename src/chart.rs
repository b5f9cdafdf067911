//! Line charts drawn with box-drawing characters, one column per step.

pub const DEFAULT_HEIGHT: usize = 15;

pub struct PlotConfig {
    /// Rows between the lowest and the highest value
    pub height: usize,
    /// Formats the value shown next to each row
    pub format: Box<dyn Fn(f64) -> String>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            height: DEFAULT_HEIGHT,
            format: Box::new(|v| format!("{:.1} kWh", v)),
        }
    }
}

impl PlotConfig {
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    pub fn with_format(mut self, format: impl Fn(f64) -> String + 'static) -> Self {
        self.format = Box::new(format);
        self
    }
}

/// Renders `series` as a multi-line chart with a labelled vertical axis.
///
/// Non-finite values are drawn as zero. An empty series renders nothing.
pub fn plot(series: &[f64], config: &PlotConfig) -> String {
    if series.is_empty() {
        return String::new();
    }

    let values: Vec<f64> = series
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let ratio = if range > 0.0 {
        config.height.max(1) as f64 / range
    } else {
        1.0
    };

    let min2 = (min * ratio).round() as i64;
    let max2 = (max * ratio).round() as i64;
    let rows = (max2 - min2) as usize;
    let scaled: Vec<usize> = values
        .iter()
        .map(|v| ((v * ratio).round() as i64 - min2).clamp(0, rows as i64) as usize)
        .collect();

    let mut grid = vec![vec![' '; values.len() - 1]; rows + 1];
    for (x, pair) in scaled.windows(2).enumerate() {
        let (y0, y1) = (pair[0], pair[1]);
        if y0 == y1 {
            grid[rows - y0][x] = '─';
            continue;
        }

        let (from, to) = if y0 > y1 { ('╮', '╰') } else { ('╯', '╭') };
        grid[rows - y0][x] = from;
        grid[rows - y1][x] = to;
        for y in y0.min(y1) + 1..y0.max(y1) {
            grid[rows - y][x] = '│';
        }
    }

    let labels: Vec<String> = (0..=rows)
        .map(|r| {
            let value = if rows > 0 {
                max - r as f64 * range / rows as f64
            } else {
                max
            };
            (config.format)(value)
        })
        .collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let first_row = rows - scaled[0];

    labels
        .iter()
        .zip(grid)
        .enumerate()
        .map(|(r, (label, cells))| {
            let tick = if r == first_row { '┼' } else { '┤' };
            let line = format!(
                "{:>width$} {}{}",
                label,
                tick,
                cells.into_iter().collect::<String>(),
                width = width
            );
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
