//! Pure aggregation of entries into derived metrics.
//!
//! Every function here is total: empty input and zero denominators produce
//! zeros, never NaN or infinity. Inputs are trusted to have been validated by
//! the services before they were stored.

use std::collections::{HashMap, HashSet};

use super::models::{CalculatedMetrics, DataEntry, Girl, GirlWithMetrics, GlobalStats};

/// Round half-up to a number of decimal places, i.e. `round(x * 10^d) / 10^d`
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Currency and ratio rounding
pub fn round_currency(value: f64) -> f64 {
    round_to(value, 2)
}

/// Running sums over a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Totals {
    pub spent: f64,
    pub nuts: u64,
    pub time: u64,
    pub entries: usize,
}

impl Totals {
    pub fn add(&mut self, entry: &DataEntry) {
        self.spent += entry.amount_spent;
        self.nuts += u64::from(entry.number_of_nuts);
        self.time += u64::from(entry.duration_minutes);
        self.entries += 1;
    }

    pub fn cost_per_nut(&self) -> f64 {
        if self.nuts > 0 {
            self.spent / self.nuts as f64
        } else {
            0.0
        }
    }

    pub fn time_per_nut(&self) -> f64 {
        if self.nuts > 0 {
            self.time as f64 / self.nuts as f64
        } else {
            0.0
        }
    }

    pub fn cost_per_hour(&self) -> f64 {
        if self.time > 0 {
            self.spent / (self.time as f64 / 60.0)
        } else {
            0.0
        }
    }
}

impl<'a> FromIterator<&'a DataEntry> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a DataEntry>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for entry in iter {
            totals.add(entry);
        }
        totals
    }
}

/// Fold entries into rounded metrics.
///
/// The caller decides the scope: pass one girl's entries for per-girl
/// metrics, or everything for global totals.
pub fn calculate_metrics<'a, I>(entries: I) -> CalculatedMetrics
where
    I: IntoIterator<Item = &'a DataEntry>,
{
    let totals: Totals = entries.into_iter().collect();
    if totals.entries == 0 {
        return CalculatedMetrics::default();
    }

    CalculatedMetrics {
        total_spent: round_currency(totals.spent),
        total_nuts: totals.nuts,
        total_time: totals.time,
        cost_per_nut: round_currency(totals.cost_per_nut()),
        time_per_nut: round_currency(totals.time_per_nut()),
        cost_per_hour: round_currency(totals.cost_per_hour()),
    }
}

/// Attach metrics to a girl. `entries` must already be filtered to her.
pub fn girl_with_metrics<'a, I>(girl: Girl, entries: I) -> GirlWithMetrics
where
    I: IntoIterator<Item = &'a DataEntry>,
{
    let entries: Vec<&DataEntry> = entries.into_iter().collect();
    GirlWithMetrics {
        girl,
        metrics: calculate_metrics(entries.iter().copied()),
        total_entries: entries.len(),
    }
}

/// Build [`GirlWithMetrics`] for every girl from a mixed entry list,
/// keeping the order of `girls`
pub fn girls_with_metrics(girls: &[Girl], entries: &[DataEntry]) -> Vec<GirlWithMetrics> {
    let mut by_girl: HashMap<&str, Vec<&DataEntry>> = HashMap::new();
    for entry in entries {
        by_girl.entry(entry.girl_id.as_str()).or_default().push(entry);
    }

    girls
        .iter()
        .map(|girl| {
            let own = by_girl.get(girl.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            girl_with_metrics(girl.clone(), own.iter().copied())
        })
        .collect()
}

/// Totals across every girl and entry
pub fn global_stats(girls: &[Girl], all_entries: &[DataEntry]) -> GlobalStats {
    let with_entries: HashSet<&str> = all_entries.iter().map(|e| e.girl_id.as_str()).collect();
    let active_girls = girls
        .iter()
        .filter(|girl| with_entries.contains(girl.id.as_str()))
        .count();

    let totals: Totals = all_entries.iter().collect();

    let average_rating = if girls.is_empty() {
        0.0
    } else {
        girls.iter().map(|g| g.rating).sum::<f64>() / girls.len() as f64
    };

    GlobalStats {
        total_girls: girls.len(),
        active_girls,
        total_spent: round_currency(totals.spent),
        total_nuts: totals.nuts,
        total_time: totals.time,
        average_rating: round_to(average_rating, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn girl(id: &str, rating: f64) -> Girl {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Girl {
            id: id.to_string(),
            name: format!("Girl {}", id),
            age: 25,
            nationality: None,
            ethnicity: None,
            hair_color: None,
            rating,
            created_at: created,
            updated_at: created,
        }
    }

    fn entry(girl_id: &str, spent: f64, minutes: u32, nuts: u32) -> DataEntry {
        let created = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        DataEntry {
            id: DataEntry::generate_id(),
            girl_id: girl_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            amount_spent: spent,
            duration_minutes: minutes,
            number_of_nuts: nuts,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_empty_entries_give_zero_metrics() {
        let none: Vec<DataEntry> = Vec::new();
        let metrics = calculate_metrics(&none);
        assert_eq!(metrics, CalculatedMetrics::default());
        assert_eq!(metrics.cost_per_nut, 0.0);
        assert_eq!(metrics.cost_per_hour, 0.0);
    }

    #[test]
    fn test_totals_are_exact_sums() {
        let entries = vec![
            entry("g1", 50.25, 30, 1),
            entry("g1", 20.50, 45, 2),
            entry("g2", 0.0, 90, 0),
        ];
        let metrics = calculate_metrics(&entries);
        assert_eq!(metrics.total_spent, 70.75);
        assert_eq!(metrics.total_nuts, 3);
        assert_eq!(metrics.total_time, 165);
    }

    #[test]
    fn test_zero_denominators_are_guarded() {
        let no_nuts = calculate_metrics(&[entry("g1", 80.0, 60, 0)]);
        assert_eq!(no_nuts.cost_per_nut, 0.0);
        assert_eq!(no_nuts.time_per_nut, 0.0);
        assert_eq!(no_nuts.cost_per_hour, 80.0);

        let no_time = calculate_metrics(&[entry("g1", 80.0, 0, 2)]);
        assert_eq!(no_time.cost_per_hour, 0.0);
        assert_eq!(no_time.cost_per_nut, 40.0);

        for value in [no_nuts.cost_per_nut, no_nuts.time_per_nut, no_time.cost_per_hour] {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_ratios_are_rounded_to_cents() {
        let entries = vec![entry("g1", 100.0, 50, 3)];
        let metrics = calculate_metrics(&entries);

        let raw_cost_per_nut = 100.0 / 3.0;
        let raw_time_per_nut = 50.0 / 3.0;
        let raw_cost_per_hour = 100.0 / (50.0 / 60.0);

        assert!((metrics.cost_per_nut - (raw_cost_per_nut * 100.0_f64).round() / 100.0).abs() < 1e-9);
        assert!((metrics.time_per_nut - (raw_time_per_nut * 100.0_f64).round() / 100.0).abs() < 1e-9);
        assert!((metrics.cost_per_hour - (raw_cost_per_hour * 100.0_f64).round() / 100.0).abs() < 1e-9);
        assert_eq!(metrics.cost_per_nut, 33.33);
        assert_eq!(metrics.time_per_nut, 16.67);
        assert_eq!(metrics.cost_per_hour, 120.0);
    }

    #[test]
    fn test_round_to_is_half_up() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(7.25, 1), 7.3);
        assert_eq!(round_to(26.666_666, 2), 26.67);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_global_stats_example() {
        let girls = vec![girl("g1", 6.0), girl("g2", 9.0)];
        let entries = vec![entry("g2", 60.0, 30, 3), entry("g2", 40.0, 30, 1)];

        let stats = global_stats(&girls, &entries);
        assert_eq!(stats.total_girls, 2);
        assert_eq!(stats.active_girls, 1);
        assert_eq!(stats.average_rating, 7.5);
        assert_eq!(stats.total_nuts, 4);
        assert_eq!(stats.total_spent, 100.0);
        assert_eq!(stats.total_time, 60);

        let per_girl = girls_with_metrics(&girls, &entries);
        assert_eq!(per_girl[1].metrics.cost_per_nut, 25.0);
        assert_eq!(per_girl[1].total_entries, 2);
    }

    #[test]
    fn test_global_stats_without_girls() {
        let stats = global_stats(&[], &[]);
        assert_eq!(stats, GlobalStats::default());
    }

    #[test]
    fn test_average_rating_rounds_to_one_decimal() {
        let girls = vec![girl("a", 5.0), girl("b", 5.5), girl("c", 10.0)];
        // 20.5 / 3 = 6.8333...
        assert_eq!(global_stats(&girls, &[]).average_rating, 6.8);
    }

    #[test]
    fn test_girls_with_metrics_keeps_girl_order_and_scopes_entries() {
        let girls = vec![girl("b", 7.0), girl("a", 8.0), girl("idle", 5.0)];
        let entries = vec![
            entry("a", 10.0, 10, 1),
            entry("b", 30.0, 20, 1),
            entry("a", 20.0, 10, 1),
        ];

        let result = girls_with_metrics(&girls, &entries);
        let ids: Vec<&str> = result.iter().map(|g| g.girl.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "idle"]);
        assert_eq!(result[0].metrics.total_spent, 30.0);
        assert_eq!(result[1].metrics.total_spent, 30.0);
        assert_eq!(result[1].total_entries, 2);
        assert_eq!(result[2].total_entries, 0);
        assert_eq!(result[2].metrics, CalculatedMetrics::default());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let girls = vec![girl("g1", 6.0), girl("g2", 9.5)];
        let entries = vec![entry("g1", 33.3, 17, 3), entry("g2", 12.0, 0, 0)];

        assert_eq!(calculate_metrics(&entries), calculate_metrics(&entries));
        assert_eq!(global_stats(&girls, &entries), global_stats(&girls, &entries));
        assert_eq!(girls_with_metrics(&girls, &entries), girls_with_metrics(&girls, &entries));
    }
}
