//! Constrained password generation.
//!
//! A password is built in two phases. Phase one fills every position by
//! picking a requirement uniformly at random and then a character from its
//! class uniformly at random, which is maximally uniform but usually leaves
//! some classes short of their minimum. Phase two repairs that: while any
//! class is short, a random position is taken from a random over-quota class
//! and regenerated from a random under-quota class. The total assigned count
//! never changes, so whenever a class is under quota some other class must be
//! over quota and the repair always terminates.

use rand::{CryptoRng, RngCore};

use crate::random::{RandomError, UnbiasedRandom};
use crate::rules::{CharacterClass, RuleSet};
use crate::secret::SecretBuffer;

/// Generate a password of exactly `length` characters satisfying every
/// minimum in `rules`, drawing all randomness from `random`.
///
/// Fails before touching any buffer if the rule set is empty or `length` is
/// shorter than the sum of the minimums. A failure of the underlying entropy
/// source aborts generation; the partial buffer is dropped (and zeroized),
/// never returned.
pub fn generate<R>(
    rules: &RuleSet,
    length: usize,
    random: &mut UnbiasedRandom<R>,
) -> Result<SecretBuffer, GenerateError>
where
    R: RngCore + CryptoRng,
{
    if !rules.is_valid() {
        return Err(GenerateError::InvalidRuleSet);
    }
    let required = rules.min_length();
    if length < required {
        return Err(GenerateError::InvalidLength {
            requested: length,
            required,
        });
    }

    let mut progress: Vec<ClassProgress<'_>> = rules
        .requirements()
        .iter()
        .map(|r| ClassProgress {
            class: &r.class,
            min_count: r.min_count,
            positions: Vec::new(),
        })
        .collect();

    let mut buffer = SecretBuffer::with_capacity(length);
    for position in 0..length {
        let chosen = random.next(progress.len())?;
        let ch = pick_char(progress[chosen].class, random)?;
        buffer.push(ch);
        progress[chosen].positions.push(position);
    }

    repair_deficits(&mut progress, &mut buffer, random)?;

    buffer.seal();
    Ok(buffer)
}

/// Per-requirement bookkeeping for one generation: which buffer positions are
/// currently assigned to the class.
struct ClassProgress<'a> {
    class: &'a CharacterClass,
    min_count: usize,
    positions: Vec<usize>,
}

impl ClassProgress<'_> {
    fn is_deficient(&self) -> bool {
        self.positions.len() < self.min_count
    }

    fn is_surplus(&self) -> bool {
        self.positions.len() > self.min_count
    }
}

/// Reassign positions from surplus classes to deficient ones until every
/// class meets its minimum. Returns the number of repair iterations.
///
/// The deficient and surplus sets are recomputed at the top of every
/// iteration; each step changes two classes' counts, so a stale view of
/// either set would pick the wrong donor or target.
fn repair_deficits<R>(
    progress: &mut [ClassProgress<'_>],
    buffer: &mut SecretBuffer,
    random: &mut UnbiasedRandom<R>,
) -> Result<usize, GenerateError>
where
    R: RngCore + CryptoRng,
{
    let mut iterations = 0;
    loop {
        let deficient: Vec<usize> = indices_where(progress, |p| p.is_deficient());
        if deficient.is_empty() {
            return Ok(iterations);
        }
        let surplus: Vec<usize> = indices_where(progress, |p| p.is_surplus());
        debug_assert!(!surplus.is_empty(), "deficit without surplus");

        let donor = surplus[random.next(surplus.len())?];
        let taken = random.next(progress[donor].positions.len())?;
        let position = progress[donor].positions.swap_remove(taken);

        let target = deficient[random.next(deficient.len())?];
        let ch = pick_char(progress[target].class, random)?;
        buffer.set(position, ch);
        progress[target].positions.push(position);

        iterations += 1;
    }
}

fn pick_char<R>(class: &CharacterClass, random: &mut UnbiasedRandom<R>) -> Result<char, RandomError>
where
    R: RngCore + CryptoRng,
{
    let chars = class.chars();
    Ok(chars[random.next(chars.len())?])
}

fn indices_where(progress: &[ClassProgress<'_>], pred: fn(&ClassProgress<'_>) -> bool) -> Vec<usize> {
    progress
        .iter()
        .enumerate()
        .filter(|(_, p)| pred(p))
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("the rule set has no requirements")]
    InvalidRuleSet,
    #[error(
        "length {requested} is shorter than what is needed to meet the requirements ({required})"
    )]
    InvalidLength { requested: usize, required: usize },
    #[error(transparent)]
    Random(#[from] RandomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Requirement;

    fn thread_random() -> UnbiasedRandom<rand::rngs::ThreadRng> {
        UnbiasedRandom::new(rand::thread_rng())
    }

    fn count_in(buffer: &SecretBuffer, class: &CharacterClass) -> usize {
        buffer
            .chars()
            .iter()
            .filter(|c| class.chars().contains(c))
            .count()
    }

    #[test]
    fn empty_rule_set_is_rejected() {
        let result = generate(&RuleSet::new(), 12, &mut thread_random());
        assert!(matches!(result, Err(GenerateError::InvalidRuleSet)));
    }

    #[test]
    fn too_short_length_is_rejected() {
        let rules = RuleSet::from_requirements([Requirement::new(CharacterClass::digits(), 5)]);
        let result = generate(&rules, 4, &mut thread_random());
        match result {
            Err(GenerateError::InvalidLength {
                requested,
                required,
            }) => {
                assert_eq!(requested, 4);
                assert_eq!(required, 5);
            }
            other => panic!("expected InvalidLength, got {other:?}"),
        }
    }

    #[test]
    fn default_rules_twelve_characters() {
        let rules = RuleSet::default_rules();
        for _ in 0..50 {
            let buffer = generate(&rules, 12, &mut thread_random()).unwrap();
            assert_eq!(buffer.len(), 12);
            assert!(buffer.is_sealed());
            for requirement in rules.requirements() {
                assert!(
                    count_in(&buffer, &requirement.class) >= requirement.min_count,
                    "class {:?} under its minimum",
                    requirement.class.name()
                );
            }
            // Every character must come from some class.
            for ch in buffer.chars() {
                assert!(rules
                    .requirements()
                    .iter()
                    .any(|r| r.class.chars().contains(ch)));
            }
        }
    }

    #[test]
    fn zero_slack_password_is_all_one_class() {
        let rules = RuleSet::from_requirements([Requirement::new(CharacterClass::digits(), 5)]);
        for _ in 0..20 {
            let buffer = generate(&rules, 5, &mut thread_random()).unwrap();
            assert_eq!(buffer.len(), 5);
            assert!(buffer.chars().iter().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn minimums_hold_with_heavy_constraints() {
        // Slack of 2 over three classes with steep minimums forces repairs
        // almost every run.
        let rules = RuleSet::from_requirements([
            Requirement::new(CharacterClass::lowercase(), 4),
            Requirement::new(CharacterClass::digits(), 4),
            Requirement::new(CharacterClass::special(), 4),
        ]);
        for _ in 0..50 {
            let buffer = generate(&rules, 14, &mut thread_random()).unwrap();
            for requirement in rules.requirements() {
                assert!(count_in(&buffer, &requirement.class) >= requirement.min_count);
            }
        }
    }

    #[test]
    fn zero_min_classes_are_still_drawn_from() {
        let rules = RuleSet::from_requirements([
            Requirement::new(CharacterClass::lowercase(), 1),
            Requirement::new(CharacterClass::digits(), 0),
        ]);
        let buffer = generate(&rules, 40, &mut thread_random()).unwrap();
        assert_eq!(buffer.len(), 40);
        assert!(count_in(&buffer, &CharacterClass::lowercase()) >= 1);
    }

    #[test]
    fn repair_is_a_no_op_when_no_class_is_deficient() {
        let lowercase = CharacterClass::lowercase();
        let digits = CharacterClass::digits();
        let mut buffer = SecretBuffer::with_capacity(3);
        for ch in ['a', 'b', '1'] {
            buffer.push(ch);
        }
        let mut progress = vec![
            ClassProgress {
                class: &lowercase,
                min_count: 2,
                positions: vec![0, 1],
            },
            ClassProgress {
                class: &digits,
                min_count: 0,
                positions: vec![2],
            },
        ];
        // An empty entropy script: any draw at all would fail the test.
        let mut random = UnbiasedRandom::new(crate::random::tests::ScriptedBytes::new(vec![]));
        let iterations = repair_deficits(&mut progress, &mut buffer, &mut random).unwrap();
        assert_eq!(iterations, 0);
        assert_eq!(buffer.chars(), &['a', 'b', '1']);
    }

    #[test]
    fn repair_moves_exactly_the_deficit() {
        let lowercase = CharacterClass::lowercase();
        let digits = CharacterClass::digits();
        let mut buffer = SecretBuffer::with_capacity(4);
        for ch in ['a', 'b', 'c', 'd'] {
            buffer.push(ch);
        }
        let mut progress = vec![
            ClassProgress {
                class: &lowercase,
                min_count: 1,
                positions: vec![0, 1, 2, 3],
            },
            ClassProgress {
                class: &digits,
                min_count: 2,
                positions: vec![],
            },
        ];
        let mut random = thread_random();
        let iterations = repair_deficits(&mut progress, &mut buffer, &mut random).unwrap();
        assert_eq!(iterations, 2);
        assert_eq!(progress[0].positions.len(), 2);
        assert_eq!(progress[1].positions.len(), 2);
        assert_eq!(
            buffer
                .chars()
                .iter()
                .filter(|c| c.is_ascii_digit())
                .count(),
            2
        );
    }

    #[test]
    fn entropy_failure_never_yields_a_buffer() {
        // Enough bytes to start phase one, not enough to finish it.
        let script = crate::random::tests::ScriptedBytes::new(vec![0, 1, 2]);
        let mut random = UnbiasedRandom::new(script);
        let rules = RuleSet::default_rules();
        let result = generate(&rules, 12, &mut random);
        assert!(matches!(
            result,
            Err(GenerateError::Random(RandomError::Entropy(_)))
        ));
    }
}
