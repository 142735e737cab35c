//! 各ビューの集計処理
//!
//! すべての関数は読み込み済みのテーブルを借用するだけの純粋関数であり、
//! 互いに状態を共有しません。

use super::category::{bucket_index, buckets_for, DefenderCoverage, DistanceCategory, Period};
use super::error::AnalyzerError;
use super::metrics::{AggregateView, ChartStyle, DataPoint, ValueKind};
use super::rate::{ratio, Tally, ZeroFill};
use super::record::{GameClock, Location, ShotRecord, ShotType};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// クラッチ判定に使う残り時間の上限
const CLUTCH_CLOCK_MINUTES: i64 = 5;
/// クラッチ判定に使う最終得点差の上限
const CLUTCH_MAX_MARGIN: i32 = 10;

fn bar_view(
    title: &str,
    x_label: &str,
    y_label: &str,
    kind: ValueKind,
    points: Vec<DataPoint>,
) -> AggregateView {
    AggregateView {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        kind,
        style: ChartStyle::Bar,
        points,
    }
}

/// 全値が未定義のビューを`EmptyResult`に変換します
fn non_empty(view_name: &'static str, view: AggregateView) -> Result<AggregateView, AnalyzerError> {
    if view.points.is_empty() || view.is_all_undefined() {
        return Err(AnalyzerError::EmptyResult(view_name));
    }
    Ok(view)
}

fn distance_tallies(records: &[ShotRecord]) -> [Tally; 4] {
    let mut tallies = [Tally::default(); 4];
    for record in records {
        tallies[DistanceCategory::from_distance(record.shot_distance).index()].record(record.is_made());
    }
    tallies
}

/// ピリオドごとに記録を振り分けます
///
/// ラベルの存在しないピリオド（0以下、または6以上）が含まれる場合は
/// 推測でラベルを付けずに`UnexpectedCategory`を返します。
fn group_by_period<'a>(
    view_name: &'static str,
    records: &'a [ShotRecord],
) -> Result<[Vec<&'a ShotRecord>; 5], AnalyzerError> {
    let mut groups: [Vec<&ShotRecord>; 5] = Default::default();
    let mut unexpected = BTreeSet::new();

    for record in records {
        match Period::from_number(record.period) {
            Some(period) => groups[period.index()].push(record),
            None => {
                unexpected.insert(record.period);
            }
        }
    }

    if !unexpected.is_empty() {
        let values: Vec<String> = unexpected.iter().map(|p| format!("period {}", p)).collect();
        return Err(AnalyzerError::UnexpectedCategory {
            view: view_name,
            value: values.join(", "),
        });
    }

    Ok(groups)
}

/// 1. 距離カテゴリごとの試投数
pub fn attempts_by_distance(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let tallies = distance_tallies(records);
    if tallies.iter().all(|t| t.attempts == 0) {
        return Err(AnalyzerError::EmptyResult("attempts_by_distance"));
    }

    let points = DistanceCategory::ALL
        .iter()
        .map(|c| DataPoint::new(c.label(), Some(tallies[c.index()].attempts as f64)))
        .collect();

    Ok(bar_view(
        "Attempts Based On Distance",
        "Distance Category",
        "Number of Attempts",
        ValueKind::Count,
        points,
    ))
}

/// 2. 距離カテゴリごとの成功率
pub fn accuracy_by_distance(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let tallies = distance_tallies(records);
    let points = DistanceCategory::ALL
        .iter()
        .map(|c| DataPoint::new(c.label(), tallies[c.index()].accuracy(ZeroFill::Undefined)))
        .collect();

    non_empty(
        "accuracy_by_distance",
        bar_view(
            "Accuracy Based On Distance",
            "Distance Category",
            "Accuracy",
            ValueKind::Percentage,
            points,
        ),
    )
}

/// 3. ピリオドごとの成功率
pub fn accuracy_by_period(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let groups = group_by_period("accuracy_by_period", records)?;

    let points = Period::ALL
        .iter()
        .map(|period| {
            let mut tally = Tally::default();
            for record in &groups[period.index()] {
                tally.record(record.is_made());
            }
            DataPoint::new(period.label(), tally.accuracy(ZeroFill::Undefined))
        })
        .collect();

    non_empty(
        "accuracy_by_period",
        bar_view(
            "Accuracy Based On Period",
            "Period",
            "Accuracy",
            ValueKind::Percentage,
            points,
        ),
    )
}

/// 4. ピリオドごとの1試合あたり平均得点
///
/// 得点の合計を、そのピリオドに試投があった試合数で割ります（試投数ではありません）。
pub fn average_points_by_period(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let groups = group_by_period("average_points_by_period", records)?;

    let points = Period::ALL
        .iter()
        .map(|period| {
            let group = &groups[period.index()];
            let total_points: u32 = group.iter().map(|r| r.points).sum();
            let games: HashSet<&str> = group.iter().map(|r| r.game_id.as_str()).collect();
            DataPoint::new(
                period.label(),
                ratio(total_points as f64, games.len() as u32, ZeroFill::Undefined),
            )
        })
        .collect();

    non_empty(
        "average_points_by_period",
        bar_view(
            "Average Points Based On Period From Field Goals",
            "Period",
            "Average Points",
            ValueKind::Average,
            points,
        ),
    )
}

/// クラッチな試投かどうかを判定します
///
/// 第4クォーターの残り5分以内で、最終得点差が10点以内の試投をクラッチとみなします。
pub fn is_clutch(record: &ShotRecord) -> bool {
    record.period == 4
        && record.game_clock <= GameClock::new(CLUTCH_CLOCK_MINUTES, 0)
        && record.final_margin.abs() <= CLUTCH_MAX_MARGIN
}

/// 5. クラッチ時の2点・3点シュート成功率
pub fn clutch_accuracy(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let mut tallies = [Tally::default(); 2];
    for record in records.iter().filter(|r| is_clutch(r)) {
        tallies[record.shot_type as usize].record(record.is_made());
    }

    let points = ShotType::ALL
        .iter()
        .map(|t| {
            DataPoint::new(
                format!("{}s", t.short_label()),
                tallies[*t as usize].accuracy(ZeroFill::Undefined),
            )
        })
        .collect();

    non_empty(
        "clutch_accuracy",
        bar_view(
            "Accuracy Of Clutch 2PTs and 3PTs",
            "Shot Type",
            "Accuracy",
            ValueKind::Percentage,
            points,
        ),
    )
}

/// 6, 7. 試合ごとの成功率の推移
///
/// 試合はテーブル上で最初に現れた順に1から番号付けされます。
pub fn accuracy_trend(
    records: &[ShotRecord],
    shot_type: ShotType,
) -> Result<AggregateView, AnalyzerError> {
    let view_name = match shot_type {
        ShotType::TwoPointer => "two_point_trend",
        ShotType::ThreePointer => "three_point_trend",
    };

    let mut games: IndexMap<&str, Tally> = IndexMap::new();
    for record in records.iter().filter(|r| r.shot_type == shot_type) {
        games
            .entry(record.game_id.as_str())
            .or_default()
            .record(record.is_made());
    }

    let points = games
        .values()
        .enumerate()
        .map(|(i, tally)| DataPoint::new((i + 1).to_string(), tally.accuracy(ZeroFill::Undefined)))
        .collect();

    non_empty(
        view_name,
        AggregateView {
            title: format!("{} Accuracy Through Games", shot_type.short_label()),
            x_label: "Game".to_string(),
            y_label: "Accuracy".to_string(),
            kind: ValueKind::Percentage,
            style: ChartStyle::Line,
            points,
        },
    )
}

/// 8. ディフェンダーとの距離ごとの3点シュート成功率
pub fn three_point_by_defender(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let mut tallies = [Tally::default(); 3];
    for record in records
        .iter()
        .filter(|r| r.shot_type == ShotType::ThreePointer)
    {
        tallies[DefenderCoverage::from_distance(record.close_def_distance).index()]
            .record(record.is_made());
    }

    let points = DefenderCoverage::ALL
        .iter()
        .map(|c| DataPoint::new(c.label(), tallies[c.index()].accuracy(ZeroFill::Undefined)))
        .collect();

    non_empty(
        "three_point_by_defender",
        bar_view(
            "3PT Accuracy Based On Defender Distance",
            "Distance Type",
            "Accuracy",
            ValueKind::Percentage,
            points,
        ),
    )
}

/// 9. ドリブル数ごとの成功率（観測された値ごと、昇順）
pub fn accuracy_by_dribbles(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let mut tallies: BTreeMap<u32, Tally> = BTreeMap::new();
    for record in records {
        tallies.entry(record.dribbles).or_default().record(record.is_made());
    }

    let points = tallies
        .iter()
        .map(|(dribbles, tally)| {
            DataPoint::new(dribbles.to_string(), tally.accuracy(ZeroFill::Undefined))
        })
        .collect();

    non_empty(
        "accuracy_by_dribbles",
        bar_view(
            "Accuracy Based On Number Of Dribbles Before Shooting",
            "Dribbles",
            "Accuracy (%)",
            ValueKind::Percentage,
            points,
        ),
    )
}

/// 10. タッチタイムごとの成功率
///
/// バケットはテーブル全体の最大タッチタイムから実行のたびに求めます。
pub fn accuracy_by_touch_time(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let max_touch_time = records.iter().map(|r| r.touch_time).fold(0.0, f64::max);
    let buckets = buckets_for(max_touch_time);

    let mut tallies = vec![Tally::default(); buckets.len()];
    for record in records {
        if let Some(index) = bucket_index(&buckets, record.touch_time) {
            tallies[index].record(record.is_made());
        }
    }

    let points = buckets
        .iter()
        .zip(&tallies)
        .map(|(bucket, tally)| DataPoint::new(bucket.to_string(), tally.accuracy(ZeroFill::Undefined)))
        .collect();

    non_empty(
        "accuracy_by_touch_time",
        bar_view(
            "Accuracy Based On Touch Time Before Shooting",
            "Touch Time (sec)",
            "Accuracy",
            ValueKind::Percentage,
            points,
        ),
    )
}

/// 11. ホーム・アウェイ別の2点・3点シュート成功率
///
/// 試投数が0の組み合わせは0%として扱います。
pub fn home_away_accuracy(records: &[ShotRecord]) -> Result<AggregateView, AnalyzerError> {
    let mut tallies = [[Tally::default(); 2]; 2];
    for record in records {
        tallies[record.shot_type as usize][record.location as usize].record(record.is_made());
    }

    let points = ShotType::ALL
        .iter()
        .flat_map(|shot_type| {
            let row = tallies[*shot_type as usize];
            Location::ALL.iter().map(move |location| {
                DataPoint::new(
                    format!("{} {}", shot_type.short_label(), location.label()),
                    row[*location as usize].accuracy(ZeroFill::Zero),
                )
            })
        })
        .collect();

    Ok(bar_view(
        "2PT and 3PT Accuracy For Home and Away Games",
        "Shot Type",
        "Accuracy",
        ValueKind::Percentage,
        points,
    ))
}
