//! バスケットボールのシュートログ分析ツール
//!
//! このクレートは、1人の選手の1シーズン分のフィールドゴール試投記録を読み込み、
//! 距離・ピリオド・ディフェンダーとの距離などの観点から
//! シュート成功率や平均得点を集計し、グラフとして描画する機能を提供します。
//!
//! # 主な機能
//!
//! - シュートログ（CSV）の読み込みと検証
//! - 11種類の集計ビューの算出
//! - 集計結果のグラフ描画（PNG / SVG）
//!
//! # 使用例
//!
//! ```no_run
//! use shot_analyzer::ShotAnalyzer;
//!
//! let analyzer = ShotAnalyzer::new("curry_shot_logs.csv").unwrap();
//!
//! for outcome in analyzer.analyze() {
//!     println!("{}: {:?}", outcome.kind, outcome.result.map(|v| v.values()));
//! }
//! ```

pub mod analyzer;
pub mod chart;
pub use analyzer::{ShotAnalyzer, ViewKind, ViewOutcome};
