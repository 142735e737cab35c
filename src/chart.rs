//! 集計結果をグラフとして描画するモジュール
//!
//! 描画の配色やサイズはすべて`ChartTheme`で受け渡し、
//! プロセス全体で共有される可変状態は持ちません。

use crate::analyzer::{AggregateView, AnalyzerError, ChartStyle, ValueKind, ViewOutcome};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// 件数・平均のグラフで縦軸の上限に掛ける係数
const HEADROOM: f64 = 1.3;

/// 出力する画像形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

impl FromStr for ChartFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ChartFormat::Png),
            "svg" => Ok(ChartFormat::Svg),
            other => Err(format!("Unsupported chart format: {}", other)),
        }
    }
}

/// グラフの配色とサイズ
///
/// # フィールド
///
/// - `background`: 背景色
/// - `series`: 棒・折れ線の色
/// - `text`: 文字・軸・グリッドの色
/// - `width`, `height`: 画像サイズ（ピクセル）
/// - `title_font_size`: タイトルの文字サイズ
/// - `label_font_size`: 軸ラベルの文字サイズ
/// - `annotation_font_size`: 棒の上に表示する値の文字サイズ
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background: RGBColor,
    pub series: RGBColor,
    pub text: RGBColor,
    pub width: u32,
    pub height: u32,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub annotation_font_size: u32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: RGBColor(0x00, 0x6B, 0xB6),
            series: RGBColor(0xFD, 0xB9, 0x27),
            text: RGBColor(0xFF, 0xFF, 0xFF),
            width: 1000,
            height: 600,
            title_font_size: 32,
            label_font_size: 22,
            annotation_font_size: 18,
        }
    }
}

/// 縦軸の上限を求めます
///
/// 割合は常に100、件数と平均は観測された最大値の1.3倍です。
pub fn value_axis_max(view: &AggregateView) -> f64 {
    match view.kind {
        ValueKind::Percentage => 100.0,
        ValueKind::Count | ValueKind::Average => match view.max_value() {
            Some(max) if max > 0.0 => max * HEADROOM,
            _ => 1.0,
        },
    }
}

/// 棒グラフの横軸の範囲
///
/// plottersの離散軸は両端を含むため、`count`個の区間にするには終端を`count - 1`にします。
fn category_range(count: usize) -> Range<i32> {
    0..(count as i32 - 1).max(0)
}

/// タイトルと描画領域の間の余白
///
/// 縦軸の上端（割合なら100%）に届く棒の注釈がタイトルに重ならない高さを確保します。
fn annotation_headroom(theme: &ChartTheme) -> u32 {
    theme.annotation_font_size * 2 + 10
}

/// 定義済みの値が連続する区間ごとに、折れ線の点列を分割します
///
/// 未定義の値は線を途切れさせます。
fn line_segments(view: &AggregateView) -> Vec<Vec<(i32, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, point) in view.points.iter().enumerate() {
        match point.value {
            Some(v) => current.push((i as i32 + 1, v)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// 1つのビューをグラフとしてファイルに描画します
///
/// # エラー
///
/// 描画やファイルの書き込みに失敗した場合は`ChartError`を返します
pub fn render(
    view: &AggregateView,
    path: &Path,
    format: ChartFormat,
    theme: &ChartTheme,
) -> Result<(), AnalyzerError> {
    let size = (theme.width, theme.height);
    let result = match format {
        ChartFormat::Png => draw(BitMapBackend::new(path, size).into_drawing_area(), view, theme)
            .map_err(|e| e.to_string()),
        ChartFormat::Svg => draw(SVGBackend::new(path, size).into_drawing_area(), view, theme)
            .map_err(|e| e.to_string()),
    };
    result.map_err(|e| AnalyzerError::ChartError(format!("{}: {}", path.display(), e)))
}

/// 成功したすべてのビューを`dir`以下に描画し、描画したファイルのパスを返します
///
/// 失敗したビューや描画に失敗したグラフは警告を出してスキップします。
pub fn render_report(
    outcomes: &[ViewOutcome],
    dir: &Path,
    format: ChartFormat,
    theme: &ChartTheme,
) -> Result<Vec<PathBuf>, AnalyzerError> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for outcome in outcomes {
        let view = match &outcome.result {
            Ok(view) => view,
            Err(_) => continue,
        };

        let path = dir.join(format!("{}.{}", outcome.kind.slug(), format.extension()));
        match render(view, &path, format, theme) {
            Ok(()) => written.push(path),
            Err(e) => warn!("{}: {}", outcome.kind, e),
        }
    }

    info!("rendered {} chart(s) to {}", written.len(), dir.display());
    Ok(written)
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    view: &AggregateView,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&theme.background)?;
    let body = root.titled(
        &view.title,
        ("sans-serif", theme.title_font_size).into_font().color(&theme.text),
    )?;
    match view.style {
        ChartStyle::Bar => draw_bars(&body, view, theme)?,
        ChartStyle::Line => draw_line(&body, view, theme)?,
    }
    root.present()
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &AggregateView,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let labels = view.labels();

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .margin_top(annotation_headroom(theme))
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            category_range(labels.len()).into_segmented(),
            0f64..value_axis_max(view),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|label| label.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(&view.x_label)
        .y_desc(&view.y_label)
        .axis_style(&theme.text)
        .bold_line_style(&theme.text.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .label_style(("sans-serif", theme.label_font_size).into_font().color(&theme.text))
        .axis_desc_style(("sans-serif", theme.label_font_size).into_font().color(&theme.text))
        .draw()?;

    // 未定義の値は棒も注釈も描かない
    let defined: Vec<(i32, f64)> = view
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.value.map(|v| (i as i32, v)))
        .collect();

    chart.draw_series(defined.iter().map(|&(i, v)| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            theme.series.filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        bar
    }))?;

    let annotation_style = ("sans-serif", theme.annotation_font_size)
        .into_font()
        .color(&theme.text)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(defined.iter().map(|&(i, v)| {
        Text::new(
            view.kind.format(v),
            (SegmentValue::CenterOf(i), v),
            annotation_style.clone(),
        )
    }))?;

    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: &AggregateView,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let count = view.points.len() as i32;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .margin_top(annotation_headroom(theme))
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0..count + 1, 0f64..value_axis_max(view))?;

    chart
        .configure_mesh()
        .x_desc(&view.x_label)
        .y_desc(&view.y_label)
        .axis_style(&theme.text)
        .bold_line_style(&theme.text.mix(0.3))
        .light_line_style(&TRANSPARENT)
        .label_style(("sans-serif", theme.label_font_size).into_font().color(&theme.text))
        .axis_desc_style(("sans-serif", theme.label_font_size).into_font().color(&theme.text))
        .draw()?;

    for segment in line_segments(view) {
        chart.draw_series(LineSeries::new(segment.iter().copied(), &theme.series))?;
        chart.draw_series(
            segment
                .iter()
                .map(|&point| Circle::new(point, 4, theme.series.filled())),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DataPoint;
    use plotters::coord::ranged1d::DiscreteRanged;
    use plotters::coord::types::RangedCoordi32;

    fn view(kind: ValueKind, values: &[Option<f64>]) -> AggregateView {
        AggregateView {
            title: "test".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            kind,
            style: ChartStyle::Bar,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| DataPoint::new(i.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn test_value_axis_max() {
        let percentage = view(ValueKind::Percentage, &[Some(12.0), None]);
        assert_eq!(value_axis_max(&percentage), 100.0);

        let count = view(ValueKind::Count, &[Some(10.0), Some(200.0)]);
        assert!((value_axis_max(&count) - 260.0).abs() < 0.001);

        let average = view(ValueKind::Average, &[Some(5.0), None]);
        assert!((value_axis_max(&average) - 6.5).abs() < 0.001);

        let zeros = view(ValueKind::Count, &[Some(0.0)]);
        assert_eq!(value_axis_max(&zeros), 1.0);
    }

    #[test]
    fn test_line_segments_break_on_gaps() {
        let trend = view(
            ValueKind::Percentage,
            &[Some(50.0), Some(60.0), None, Some(40.0), None],
        );
        let segments = line_segments(&trend);
        assert_eq!(segments, vec![vec![(1, 50.0), (2, 60.0)], vec![(4, 40.0)]]);
    }

    #[test]
    fn test_category_range_has_one_segment_per_label() {
        for count in [1usize, 3, 6] {
            let axis: RangedCoordi32 = category_range(count).into();
            assert_eq!(axis.size(), count, "{} label(s)", count);
        }
    }

    #[test]
    fn test_annotation_headroom_clears_annotations() {
        let theme = ChartTheme::default();
        assert!(annotation_headroom(&theme) > theme.annotation_font_size);
    }

    #[test]
    fn test_chart_format_from_str() {
        assert_eq!("PNG".parse::<ChartFormat>().unwrap(), ChartFormat::Png);
        assert_eq!("svg".parse::<ChartFormat>().unwrap().extension(), "svg");
        assert!("pdf".parse::<ChartFormat>().is_err());
    }

    #[test]
    fn test_default_theme_colors() {
        let theme = ChartTheme::default();
        assert_eq!(theme.background, RGBColor(0x00, 0x6B, 0xB6));
        assert_eq!(theme.series, RGBColor(0xFD, 0xB9, 0x27));
        assert_eq!((theme.width, theme.height), (1000, 600));
    }
}
