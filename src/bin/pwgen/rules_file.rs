//! Loading a rule set from a YAML file.
//!
//! The file is a list of class entries:
//!
//! ```yaml
//! - name: letters
//!   chars: abcdefghijklmnopqrstuvwxyz
//!   min: 2
//! - name: digits
//!   chars: "0123456789"
//!   min: 1
//! ```

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use pwgen::{CharacterClass, Requirement, RuleSet};

#[derive(Deserialize)]
struct ClassRule {
    name: String,
    chars: String,
    #[serde(default)]
    min: usize,
}

pub(crate) fn load(path: &Path) -> anyhow::Result<RuleSet> {
    use anyhow::Context;

    let file = File::open(path).context("failed to open the rules file")?;
    let entries: Vec<ClassRule> =
        serde_yaml::from_reader(file).context("failed to parse the rules file")?;

    let mut rules = RuleSet::new();
    for entry in entries {
        let class = CharacterClass::new(entry.name.clone(), entry.chars.chars())?;
        if !rules.try_add(Requirement::new(class, entry.min)) {
            anyhow::bail!("duplicate class name {:?} in the rules file", entry.name);
        }
    }
    if !rules.is_valid() {
        anyhow::bail!("the rules file defines no character classes");
    }
    Ok(rules)
}
