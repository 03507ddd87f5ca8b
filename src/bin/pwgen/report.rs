//! Distribution analysis for verbose output.

use std::collections::HashMap;

use pwgen::RuleSet;

/// Tallies every generated character per class and per character, and prints
/// the observed distribution once all passwords are out.
pub(crate) struct DistributionReport<'a> {
    rules: &'a RuleSet,
    class_counts: Vec<usize>,
    char_counts: Vec<HashMap<char, usize>>,
}

impl<'a> DistributionReport<'a> {
    pub(crate) fn new(rules: &'a RuleSet) -> DistributionReport<'a> {
        let char_counts = rules
            .requirements()
            .iter()
            .map(|r| r.class.chars().iter().map(|&ch| (ch, 0)).collect())
            .collect();
        DistributionReport {
            rules,
            class_counts: vec![0; rules.requirements().len()],
            char_counts,
        }
    }

    /// Tally one generated password.
    ///
    /// A character is charged to the first class in rule-set order that
    /// contains it. When classes overlap, that attribution is ambiguous and
    /// later classes get undercounted.
    pub(crate) fn record(&mut self, password: &str) {
        for ch in password.chars() {
            let class = self
                .rules
                .requirements()
                .iter()
                .position(|r| r.class.chars().contains(&ch));
            if let Some(i) = class {
                self.class_counts[i] += 1;
                *self.char_counts[i].entry(ch).or_insert(0) += 1;
            }
        }
    }

    pub(crate) fn print(&self) {
        let total: usize = self.class_counts.iter().sum();

        println!();
        println!("PASSWORD REQUIREMENTS");
        for requirement in self.rules.requirements() {
            println!(
                "{} (min {}): {}",
                requirement.class.name(),
                requirement.min_count,
                requirement.class.chars().iter().collect::<String>()
            );
        }
        println!();

        for (i, requirement) in self.rules.requirements().iter().enumerate() {
            println!(
                "== {} [{:.2}%] ==",
                requirement.class.name(),
                percent(self.class_counts[i], total)
            );
            let mut by_count: Vec<(char, usize)> =
                self.char_counts[i].iter().map(|(&ch, &n)| (ch, n)).collect();
            by_count.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            for (ch, count) in by_count {
                println!("{ch} - {count} [{:.2}%]", percent(count, self.class_counts[i]));
            }
            println!();
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
