//! 成功率の計算を一元化するモジュール
//!
//! すべてのビューは`Tally`で試投数と成功数を数え、
//! `ZeroFill`ポリシーに従って成功率に変換します。

/// 試投数が0のグループの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroFill {
    /// 未定義（`None`）として扱い、描画時は欠損になる
    Undefined,
    /// 明示的に0として扱う
    Zero,
}

/// 試投数と成功数の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub made: u32,
    pub attempts: u32,
}

impl Tally {
    pub fn record(&mut self, made: bool) {
        self.attempts += 1;
        if made {
            self.made += 1;
        }
    }

    /// 成功率（%）を返します
    ///
    /// 試投数が0の場合は`policy`に従い、`None`または`Some(0.0)`を返します。
    pub fn accuracy(&self, policy: ZeroFill) -> Option<f64> {
        ratio(self.made as f64, self.attempts, policy).map(|r| r * 100.0)
    }
}

/// `numerator / denominator`を計算します（分母が0の場合はポリシーに従う）
pub fn ratio(numerator: f64, denominator: u32, policy: ZeroFill) -> Option<f64> {
    if denominator == 0 {
        return match policy {
            ZeroFill::Undefined => None,
            ZeroFill::Zero => Some(0.0),
        };
    }
    Some(numerator / denominator as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_accuracy() {
        let mut tally = Tally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        tally.record(true);

        assert_eq!(tally.attempts, 4);
        assert_eq!(tally.made, 3);
        assert!((tally.accuracy(ZeroFill::Undefined).unwrap() - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_attempts() {
        let tally = Tally::default();
        assert_eq!(tally.accuracy(ZeroFill::Undefined), None);
        assert_eq!(tally.accuracy(ZeroFill::Zero), Some(0.0));
    }

    #[test]
    fn test_ratio() {
        assert!((ratio(7.0, 2, ZeroFill::Undefined).unwrap() - 3.5).abs() < 0.001);
        assert_eq!(ratio(7.0, 0, ZeroFill::Undefined), None);
    }
}
