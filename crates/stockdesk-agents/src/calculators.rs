//! Small financial calculations exposed to specialists as tools.

pub fn accuracy(correct: i64, total: i64) -> String {
    if total == 0 {
        return "Cannot calculate accuracy: total is 0.".to_string();
    }
    let pct = correct as f64 / total as f64 * 100.0;
    format!("Accuracy: {pct:.2}% ({correct}/{total})")
}

pub fn profit_and_loss(entry_price: f64, current_price: f64, quantity: i64) -> String {
    if entry_price == 0.0 {
        return "Entry price is 0 -- cannot calculate P&L percentage.".to_string();
    }
    let pnl = (current_price - entry_price) * quantity as f64;
    let pnl_pct = (current_price - entry_price) / entry_price * 100.0;
    format!(
        "P&L: ${} ({pnl_pct:+.2}%) | Entry: ${entry_price:.2} | Current: ${current_price:.2} | Qty: {quantity}",
        with_thousands(pnl)
    )
}

pub fn risk_reward(entry_price: f64, stop_loss: f64, take_profit: f64) -> String {
    let risk = (entry_price - stop_loss).abs();
    let reward = (take_profit - entry_price).abs();
    if risk == 0.0 {
        return "Risk is 0 -- cannot calculate ratio.".to_string();
    }
    let ratio = reward / risk;
    format!(
        "Risk/Reward Ratio: 1:{ratio:.2} | Risk: ${risk:.2} | Reward: ${reward:.2} | \
         Entry: ${entry_price:.2} | SL: ${stop_loss:.2} | TP: ${take_profit:.2}"
    )
}

/// `-1234.5` -> `-1,234.50`
fn with_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac_part}", group_digits(int_part))
}

/// `1234567` -> `1,234,567`
pub fn thousands(n: i64) -> String {
    let sign = if n < 0 { "-" } else { "" };
    format!("{sign}{}", group_digits(&n.unsigned_abs().to_string()))
}

/// Comma between every three digits, counted from the right.
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_formats_two_decimals() {
        assert_eq!(accuracy(41, 60), "Accuracy: 68.33% (41/60)");
        assert_eq!(accuracy(0, 0), "Cannot calculate accuracy: total is 0.");
    }

    #[test]
    fn pnl_uses_grouping_and_signed_percent() {
        assert_eq!(
            profit_and_loss(100.0, 112.5, 150),
            "P&L: $1,875.00 (+12.50%) | Entry: $100.00 | Current: $112.50 | Qty: 150"
        );
        assert_eq!(
            profit_and_loss(2500.0, 2400.0, 20),
            "P&L: $-2,000.00 (-4.00%) | Entry: $2500.00 | Current: $2400.00 | Qty: 20"
        );
    }

    #[test]
    fn integer_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(-12_345_678), "-12,345,678");
    }

    #[test]
    fn pnl_guards_zero_entry() {
        assert!(profit_and_loss(0.0, 10.0, 1).contains("cannot calculate"));
    }

    #[test]
    fn risk_reward_ratio() {
        assert_eq!(
            risk_reward(100.0, 95.0, 115.0),
            "Risk/Reward Ratio: 1:3.00 | Risk: $5.00 | Reward: $15.00 | \
             Entry: $100.00 | SL: $95.00 | TP: $115.00"
        );
        assert_eq!(risk_reward(50.0, 50.0, 60.0), "Risk is 0 -- cannot calculate ratio.");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(with_thousands(0.0), "0.00");
        assert_eq!(with_thousands(999.999), "1,000.00");
        assert_eq!(with_thousands(1234567.891), "1,234,567.89");
        assert_eq!(with_thousands(-0.001), "0.00");
    }
}
