//! シュート分析の中核となるモジュール
//!
//! このモジュールは、シュートログの集計に必要な主要なコンポーネントを提供します。
//! 分析プロセスは以下の流れで行われます：
//!
//! 1. CSVからのシュート記録の読み込み
//! 2. 距離カテゴリなどの派生カテゴリの算出
//! 3. 11種類の独立したビューの集計
//! 4. 各ビューの系列を描画・出力側へ引き渡し
//!
//! # 主要なコンポーネント
//!
//! - `ShotAnalyzer`: 分析プロセス全体を制御する主要な構造体
//! - `ViewKind`: 集計するビューの種類（表示順固定）
//! - `AggregateView`: 個々のビューの集計結果を保持する構造体

pub mod category;
mod error;
pub mod loader;
mod metrics;
pub mod rate;
pub mod record;
pub mod views;

pub use error::AnalyzerError;
pub use metrics::{AggregateView, ChartStyle, DataPoint, ValueKind};
pub use record::ShotRecord;

use rayon::prelude::*;
use record::ShotType;
use std::fmt;
use tracing::{debug, info, warn};

/// 集計するビューの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    AttemptsByDistance,
    AccuracyByDistance,
    AccuracyByPeriod,
    AveragePointsByPeriod,
    ClutchAccuracy,
    TwoPointTrend,
    ThreePointTrend,
    ThreePointByDefender,
    AccuracyByDribbles,
    AccuracyByTouchTime,
    HomeAwayAccuracy,
}

impl ViewKind {
    /// 出力順
    pub const ALL: [ViewKind; 11] = [
        ViewKind::AttemptsByDistance,
        ViewKind::AccuracyByDistance,
        ViewKind::AccuracyByPeriod,
        ViewKind::AveragePointsByPeriod,
        ViewKind::ClutchAccuracy,
        ViewKind::TwoPointTrend,
        ViewKind::ThreePointTrend,
        ViewKind::ThreePointByDefender,
        ViewKind::AccuracyByDribbles,
        ViewKind::AccuracyByTouchTime,
        ViewKind::HomeAwayAccuracy,
    ];

    /// 出力やファイル名に使う識別子
    pub fn slug(self) -> &'static str {
        match self {
            ViewKind::AttemptsByDistance => "attempts_by_distance",
            ViewKind::AccuracyByDistance => "accuracy_by_distance",
            ViewKind::AccuracyByPeriod => "accuracy_by_period",
            ViewKind::AveragePointsByPeriod => "average_points_by_period",
            ViewKind::ClutchAccuracy => "clutch_accuracy",
            ViewKind::TwoPointTrend => "two_point_trend",
            ViewKind::ThreePointTrend => "three_point_trend",
            ViewKind::ThreePointByDefender => "three_point_by_defender",
            ViewKind::AccuracyByDribbles => "accuracy_by_dribbles",
            ViewKind::AccuracyByTouchTime => "accuracy_by_touch_time",
            ViewKind::HomeAwayAccuracy => "home_away_accuracy",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// 1つのビューの集計結果（失敗した場合はエラー）
#[derive(Debug)]
pub struct ViewOutcome {
    pub kind: ViewKind,
    pub result: Result<AggregateView, AnalyzerError>,
}

/// シュート分析を実行するメインの構造体
///
/// 読み込んだテーブルを保持し、各ビューはこのテーブルを借用して集計します。
/// テーブルは読み込み後に変更されません。
///
/// # フィールド
///
/// - `records`: 読み込み済みのシュート記録
pub struct ShotAnalyzer {
    records: Vec<ShotRecord>,
}

impl ShotAnalyzer {
    /// CSVファイルからシュート記録を読み込み、新しいShotAnalyzerインスタンスを作成します
    ///
    /// # 引数
    ///
    /// - `path`: 分析対象のシュートログ（CSV）のパス
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - ファイルの読み込みに失敗
    /// - 必須列が欠けている、または有効な行が1行もない
    pub fn new(path: impl AsRef<std::path::Path>) -> Result<Self, AnalyzerError> {
        Self::from_records(loader::load_from_path(path)?)
    }

    /// 読み込み済みの記録から作成します
    ///
    /// # エラー
    ///
    /// 記録が空の場合は`MissingData`を返します
    pub fn from_records(records: Vec<ShotRecord>) -> Result<Self, AnalyzerError> {
        if records.is_empty() {
            return Err(AnalyzerError::MissingData("shot table has zero rows".to_string()));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ShotRecord] {
        &self.records
    }

    /// 指定されたビューを集計します
    pub fn view(&self, kind: ViewKind) -> Result<AggregateView, AnalyzerError> {
        let records = &self.records;
        match kind {
            ViewKind::AttemptsByDistance => views::attempts_by_distance(records),
            ViewKind::AccuracyByDistance => views::accuracy_by_distance(records),
            ViewKind::AccuracyByPeriod => views::accuracy_by_period(records),
            ViewKind::AveragePointsByPeriod => views::average_points_by_period(records),
            ViewKind::ClutchAccuracy => views::clutch_accuracy(records),
            ViewKind::TwoPointTrend => views::accuracy_trend(records, ShotType::TwoPointer),
            ViewKind::ThreePointTrend => views::accuracy_trend(records, ShotType::ThreePointer),
            ViewKind::ThreePointByDefender => views::three_point_by_defender(records),
            ViewKind::AccuracyByDribbles => views::accuracy_by_dribbles(records),
            ViewKind::AccuracyByTouchTime => views::accuracy_by_touch_time(records),
            ViewKind::HomeAwayAccuracy => views::home_away_accuracy(records),
        }
    }

    /// すべてのビューを集計します
    ///
    /// 各ビューは互いに独立しているため並列に集計されますが、
    /// 結果は常に`ViewKind::ALL`の順に並びます。
    /// あるビューの失敗は他のビューの集計を妨げません。
    pub fn analyze(&self) -> Vec<ViewOutcome> {
        info!("analyzing {} shot record(s)", self.records.len());

        let outcomes: Vec<ViewOutcome> = ViewKind::ALL
            .par_iter()
            .map(|&kind| ViewOutcome {
                kind,
                result: self.view(kind),
            })
            .collect();

        for outcome in &outcomes {
            match &outcome.result {
                Ok(view) => debug!("{}: {} point(s)", outcome.kind, view.points.len()),
                Err(e) => warn!("{}: {}", outcome.kind, e),
            }
        }

        outcomes
    }
}
