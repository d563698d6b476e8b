use alttrend_data::{CandleWindow, Symbol, Timeframe};
use alttrend_notify::ChartArtifact;
use alttrend_ta::indicators::IndicatorSet;
use async_trait::async_trait;
use itertools::{Itertools, MinMaxResult};
use std::{fmt::Write, path::PathBuf};
use thiserror::Error;
use tracing::debug;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 40.0;

const CLOSE_COLOUR: &str = "#9e9e9e";
const EMA_COLOURS: [&str; 6] = ["#1e88e5", "#fb8c00", "#43a047", "#e53935", "#8e24aa", "#00acc1"];

/// Errors generated while rendering a chart. Rendering failures are soft: the alert is
/// delivered as text only.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot render a chart without any candles")]
    EmptyWindow,

    #[error("failed to write chart artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a price & indicator plot of a pair to a transient [`ChartArtifact`].
#[async_trait]
pub trait ChartRenderer {
    async fn render(
        &self,
        window: &CandleWindow,
        indicators: &IndicatorSet,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<ChartArtifact, ChartError>;
}

/// [`ChartRenderer`] writing SVG line charts of the closes overlaid with every EMA series.
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    directory: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    /// [`SvgChartRenderer`] writing into an `alttrend` folder of the OS temp directory.
    pub fn temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("alttrend"))
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }
}

#[async_trait]
impl ChartRenderer for SvgChartRenderer {
    async fn render(
        &self,
        window: &CandleWindow,
        indicators: &IndicatorSet,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<ChartArtifact, ChartError> {
        let last = window.last().ok_or(ChartError::EmptyWindow)?;
        let svg = render_svg(window, indicators, &format!("{symbol} ({timeframe})"))?;

        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(format!(
            "{symbol}_{timeframe}_{}.svg",
            last.open_time.timestamp_millis()
        ));
        tokio::fs::write(&path, svg).await?;

        debug!(%symbol, %timeframe, path = %path.display(), "rendered chart");
        Ok(ChartArtifact::new(path))
    }
}

/// Linear mapping from (candle index, price) to SVG coordinates.
struct Scale {
    len: usize,
    min: f64,
    max: f64,
}

impl Scale {
    fn x(&self, index: usize) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        if self.len <= 1 {
            return MARGIN_LEFT + plot_width / 2.0;
        }
        MARGIN_LEFT + plot_width * index as f64 / (self.len - 1) as f64
    }

    fn y(&self, price: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + plot_height * (self.max - price) / (self.max - self.min)
    }
}

/// Render the chart document. Undefined EMA values are skipped, so each EMA line starts at the
/// candle its period is first seeded.
pub fn render_svg(
    window: &CandleWindow,
    indicators: &IndicatorSet,
    title: &str,
) -> Result<String, ChartError> {
    if window.is_empty() {
        return Err(ChartError::EmptyWindow);
    }

    let closes = window.closes();
    let values = closes.iter().copied().chain(
        indicators
            .iter()
            .flat_map(|(_, series)| series.iter().flatten().copied()),
    );

    let (min, max) = match values.filter(|value| value.is_finite()).minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return Err(ChartError::EmptyWindow),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    // Pad the price axis so flat series remain visible
    let padding = ((max - min) * 0.05).max(max.abs() * 0.001).max(f64::EPSILON);
    let scale = Scale {
        len: closes.len(),
        min: min - padding,
        max: max + padding,
    };

    let mut svg = String::with_capacity(16 * 1024);
    // Writing into a String is infallible
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><rect width="100%" height="100%" fill="#ffffff"/><text x="{MARGIN_LEFT}" y="30" font-family="sans-serif" font-size="18">{}</text>"##,
        escape(title)
    );

    for price in [max, (min + max) / 2.0, min] {
        let y = scale.y(price);
        let _ = write!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#eeeeee"/><text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="11" text-anchor="end">{}</text>"##,
            WIDTH - MARGIN_RIGHT,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_price(price)
        );
    }

    write_polyline(
        &mut svg,
        closes.iter().copied().enumerate().map(|(index, close)| (index, Some(close))),
        &scale,
        CLOSE_COLOUR,
    );

    for (legend_index, (period, series)) in indicators.iter().enumerate() {
        let colour = EMA_COLOURS[legend_index % EMA_COLOURS.len()];
        write_polyline(&mut svg, series.iter().copied().enumerate(), &scale, colour);

        let legend_x = MARGIN_LEFT + 90.0 * legend_index as f64;
        let _ = write!(
            svg,
            r##"<text x="{legend_x:.2}" y="{:.2}" font-family="sans-serif" font-size="12" fill="{colour}">EMA{period}</text>"##,
            HEIGHT - 12.0
        );
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn write_polyline<Iter>(svg: &mut String, points: Iter, scale: &Scale, colour: &str)
where
    Iter: Iterator<Item = (usize, Option<f64>)>,
{
    let points = points
        .filter_map(|(index, value)| value.filter(|value| value.is_finite()).map(|v| (index, v)))
        .map(|(index, value)| format!("{:.2},{:.2}", scale.x(index), scale.y(value)))
        .join(" ");

    if points.is_empty() {
        return;
    }

    let _ = write!(
        svg,
        r#"<polyline fill="none" stroke="{colour}" stroke-width="1.5" points="{points}"/>"#
    );
}

fn format_price(price: f64) -> String {
    let magnitude = price.abs();
    if magnitude >= 100.0 {
        format!("{price:.2}")
    } else if magnitude >= 1.0 {
        format!("{price:.4}")
    } else {
        format!("{price:.8}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
