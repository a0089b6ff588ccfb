// ==========================================
// 空压机节能改造 - 数值舍入
// ==========================================
// 红线: 所有中间量按固定小数位舍入,保证跨实现结果一致
// 口径: 按浮点数的精确十进制值舍入,恰好居中时取偶
// ==========================================

/// 按小数位舍入
///
/// 经由精确十进制格式化实现,与 2.675 → 2.67 这类二进制表示偏差保持一致。
pub fn round_to(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", digits, value).parse::<f64>().unwrap_or(value)
}

/// 舍入为整数（恰好居中时取偶）
pub fn round_to_int(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// 浮点数展示（整数值保留一位小数,如 10.0）
///
/// 绝对值小于 1e-4 或不小于 1e16 时用科学计数法,指数带符号且至少两位（1e-05、1.5e+16）。
pub fn display_f64(value: f64) -> String {
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_digits() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(13.3799999, 2), 13.38);
        assert_eq!(round_to(-0.00004, 4), -0.0);
        // 2.675 的二进制值略小于 2.675
        assert_eq!(round_to(2.675, 2), 2.67);
    }

    #[test]
    fn test_round_to_int_ties_even() {
        assert_eq!(round_to_int(2.5), 2);
        assert_eq!(round_to_int(3.5), 4);
        assert_eq!(round_to_int(-2.5), -2);
        assert_eq!(round_to_int(80280.4), 80280);
    }

    #[test]
    fn test_display_f64() {
        assert_eq!(display_f64(10.0), "10.0");
        assert_eq!(display_f64(9.75), "9.75");
        assert_eq!(display_f64(0.0001), "0.0001");
    }

    #[test]
    fn test_display_f64_exponent_form() {
        assert_eq!(display_f64(0.00001), "1e-05");
        assert_eq!(display_f64(-0.000025), "-2.5e-05");
        assert_eq!(display_f64(1.5e-120), "1.5e-120");
        assert_eq!(display_f64(1e16), "1e+16");
        assert_eq!(display_f64(1.5e16), "1.5e+16");
    }
}
