use crate::rates::Currency;

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// en-US style money: symbol, grouped integer part, two decimals.
pub fn money(amount: f64, currency: Currency) -> String {
    if !amount.is_finite() {
        return format!("{}{amount}", currency.symbol());
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{}{}.{:02}",
        currency.symbol(),
        thousands(cents / 100),
        cents % 100
    )
}

/// Compact axis label: `120k`, `1.5M`.
pub fn compact(amount: f64) -> String {
    let abs = amount.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}k", amount / 1_000.0)
    } else {
        format!("{amount:.0}")
    }
}
