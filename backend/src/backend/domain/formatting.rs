//! Display helpers for currency, durations and ratings.

/// Format as US dollars with thousands separators, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Compact duration: `45m`, `2h`, `2h 5m`
pub fn format_time(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, remaining)
    }
}

/// Clock-style duration: `02:05:00`
pub fn format_time_detailed(minutes: u64) -> String {
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

/// `★8.5/10`; whole ratings drop the decimal (`★8/10`)
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("★{:.0}/10", rating)
    } else {
        format!("★{}/10", rating)
    }
}
