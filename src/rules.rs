//! Character classes and the rule set governing one generation request.

/// A named, immutable set of candidate characters.
///
/// Nothing stops two classes from sharing characters; the generator doesn't
/// care, but attributing a generated character back to "its" class becomes
/// ambiguous when they overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterClass {
    name: String,
    chars: Vec<char>,
}

impl CharacterClass {
    pub fn new(
        name: impl Into<String>,
        chars: impl IntoIterator<Item = char>,
    ) -> Result<CharacterClass, RuleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RuleError::EmptyName);
        }
        let chars: Vec<char> = chars.into_iter().collect();
        if chars.is_empty() {
            return Err(RuleError::EmptyClass(name));
        }
        Ok(CharacterClass { name, chars })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn lowercase() -> CharacterClass {
        CharacterClass {
            name: "lowercase".to_owned(),
            chars: ('a'..='z').collect(),
        }
    }

    pub fn uppercase() -> CharacterClass {
        CharacterClass {
            name: "uppercase".to_owned(),
            chars: ('A'..='Z').collect(),
        }
    }

    pub fn digits() -> CharacterClass {
        CharacterClass {
            name: "digits".to_owned(),
            chars: ('0'..='9').collect(),
        }
    }

    pub fn special() -> CharacterClass {
        CharacterClass {
            name: "special".to_owned(),
            chars: r"+-=_@#$%^&;:,.<>/~\[](){}?!|".chars().collect(),
        }
    }
}

/// A character class plus the minimum number of positions that must be drawn
/// from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub class: CharacterClass,
    pub min_count: usize,
}

impl Requirement {
    pub fn new(class: CharacterClass, min_count: usize) -> Requirement {
        Requirement { class, min_count }
    }
}

/// The full collection of requirements for one generation request.
///
/// Requirements are unique by class name and keep their insertion order.
/// Mutable while the CLI assembles it; the generator only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    requirements: Vec<Requirement>,
}

impl RuleSet {
    pub fn new() -> RuleSet {
        RuleSet {
            requirements: Vec::new(),
        }
    }

    /// Build a rule set from a sequence of requirements, keeping the last
    /// requirement seen for any repeated class name.
    pub fn from_requirements(requirements: impl IntoIterator<Item = Requirement>) -> RuleSet {
        let mut rules = RuleSet::new();
        for requirement in requirements {
            rules.add_or_replace(requirement);
        }
        rules
    }

    /// The classic four-class policy: at least one lowercase letter, one
    /// uppercase letter, one digit, and one special character.
    pub fn default_rules() -> RuleSet {
        RuleSet::from_requirements([
            Requirement::new(CharacterClass::lowercase(), 1),
            Requirement::new(CharacterClass::uppercase(), 1),
            Requirement::new(CharacterClass::digits(), 1),
            Requirement::new(CharacterClass::special(), 1),
        ])
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Add a requirement. Returns `false` (and leaves the set unchanged) if a
    /// requirement for that class name is already present.
    pub fn try_add(&mut self, requirement: Requirement) -> bool {
        if self.position_of(requirement.class.name()).is_some() {
            return false;
        }
        self.requirements.push(requirement);
        true
    }

    /// Remove the requirement for the same class name, if any. Returns
    /// whether one existed.
    pub fn try_remove(&mut self, requirement: &Requirement) -> bool {
        match self.position_of(requirement.class.name()) {
            Some(i) => {
                self.requirements.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn add_or_replace(&mut self, requirement: Requirement) {
        self.try_remove(&requirement);
        self.try_add(requirement);
    }

    /// A rule set drives generation only if it has at least one requirement.
    pub fn is_valid(&self) -> bool {
        !self.requirements.is_empty()
    }

    /// The shortest password that can satisfy every minimum.
    pub fn min_length(&self) -> usize {
        self.requirements.iter().map(|r| r.min_count).sum()
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.requirements.iter().position(|r| r.class.name() == name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("a character class must have a name")]
    EmptyName,
    #[error("character class {0:?} has no characters")]
    EmptyClass(String),
}
