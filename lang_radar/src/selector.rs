use crate::api::LanguageTotals;
use std::cmp::Ordering;

pub const DEFAULT_TOP_LANGUAGES: usize = 5;

/// Top languages by share of bytes, always exactly `n` entries long.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSeries {
    /// `(label, percentage)` in descending percentage order, padded with placeholders.
    pub series: Vec<(String, f64)>,
    /// Languages ranked past `n`, same descending order, labels only.
    pub overflow_labels: Vec<String>,
}

impl RankedSeries {
    pub fn labels(&self) -> Vec<String> {
        self.series.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.series.iter().map(|(_, value)| *value).collect()
    }
}

pub fn placeholder_label(position: usize) -> String {
    format!("Linguagem {}", position)
}

/// Ranks languages by percentage of `totals.total_bytes`.
///
/// Equal byte counts are ordered alphabetically by language name. With no
/// detectable code at all every slot is a placeholder with value 0.
pub fn select_top(totals: &LanguageTotals, n: usize) -> RankedSeries {
    if totals.is_empty() {
        return RankedSeries {
            series: (1..=n).map(|position| (placeholder_label(position), 0.0)).collect(),
            overflow_labels: Vec::new(),
        };
    }

    let mut ranked: Vec<(&String, u64)> = totals.bytes.iter().map(|(lang, bytes)| (lang, *bytes)).collect();
    ranked.sort_by(|(lang_a, bytes_a), (lang_b, bytes_b)| match bytes_b.cmp(bytes_a) {
        Ordering::Equal => lang_a.cmp(lang_b),
        ordering => ordering,
    });

    let total = totals.total_bytes as f64;
    let mut series: Vec<(String, f64)> = ranked
        .iter()
        .take(n)
        .map(|(lang, bytes)| (lang.to_string(), 100.0 * *bytes as f64 / total))
        .collect();
    let overflow_labels = ranked.iter().skip(n).map(|(lang, _)| lang.to_string()).collect();

    while series.len() < n {
        series.push((placeholder_label(series.len() + 1), 0.0));
    }

    RankedSeries { series, overflow_labels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LanguageByteMap;

    fn totals(languages: &[(&str, u64)]) -> LanguageTotals {
        let map: LanguageByteMap = languages.iter().map(|(lang, bytes)| (lang.to_string(), *bytes)).collect();
        std::iter::once(map).collect()
    }

    fn series(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(label, value)| (label.to_string(), *value)).collect()
    }

    #[test]
    fn empty_profile_fallback_test() {
        let ranked = select_top(&LanguageTotals::default(), DEFAULT_TOP_LANGUAGES);
        assert_eq!(
            ranked.series,
            series(&[
                ("Linguagem 1", 0.0),
                ("Linguagem 2", 0.0),
                ("Linguagem 3", 0.0),
                ("Linguagem 4", 0.0),
                ("Linguagem 5", 0.0),
            ])
        );
        assert!(ranked.overflow_labels.is_empty());
    }

    #[test]
    fn zero_bytes_fallback_test() {
        let ranked = select_top(&totals(&[("Shell", 0), ("Makefile", 0)]), DEFAULT_TOP_LANGUAGES);
        assert_eq!(ranked.labels()[0], "Linguagem 1");
        assert!(ranked.values().iter().all(|value| *value == 0.0));
        assert!(ranked.overflow_labels.is_empty());
    }

    #[test]
    fn ordering_and_padding_test() {
        let ranked = select_top(&totals(&[("A", 300), ("B", 100), ("C", 600)]), DEFAULT_TOP_LANGUAGES);
        assert_eq!(
            ranked.series,
            series(&[
                ("C", 60.0),
                ("A", 30.0),
                ("B", 10.0),
                ("Linguagem 4", 0.0),
                ("Linguagem 5", 0.0),
            ])
        );
        assert!(ranked.overflow_labels.is_empty());
    }

    #[test]
    fn overflow_test() {
        let ranked = select_top(
            &totals(&[
                ("Rust", 700),
                ("Go", 600),
                ("C", 500),
                ("Python", 400),
                ("Shell", 300),
                ("Lua", 200),
                ("Nix", 100),
            ]),
            DEFAULT_TOP_LANGUAGES,
        );
        assert_eq!(ranked.labels(), vec!["Rust", "Go", "C", "Python", "Shell"]);
        assert_eq!(ranked.overflow_labels, vec!["Lua", "Nix"]);
    }

    #[test]
    fn ties_are_alphabetical_test() {
        let ranked = select_top(&totals(&[("Zig", 100), ("Ada", 100), ("Rust", 200)]), 2);
        assert_eq!(ranked.labels(), vec!["Rust", "Ada"]);
        assert_eq!(ranked.overflow_labels, vec!["Zig"]);
    }

    #[test]
    fn series_length_test() {
        let many: Vec<(String, u64)> = (0..40).map(|i| (format!("lang_{}", i), i + 1)).collect();
        let many: Vec<(&str, u64)> = many.iter().map(|(lang, bytes)| (lang.as_str(), *bytes)).collect();
        for n in [1, 3, 5, 8] {
            assert_eq!(select_top(&LanguageTotals::default(), n).series.len(), n);
            assert_eq!(select_top(&totals(&[("Rust", 1)]), n).series.len(), n);
            let ranked = select_top(&totals(&many), n);
            assert_eq!(ranked.series.len(), n);
            assert_eq!(ranked.overflow_labels.len(), 40 - n);
        }
    }
}
