//! Spelling a word with letter dice, translated into cardinality
//! constraints.
//!
//! Each (die, letter) pair gets a variable meaning "this die is used to
//! show this letter"; a die can also be "used for nothing", which is
//! modelled as showing a null letter. The rules then fall out as exact
//! cardinalities: each letter is shown as many times as the word needs
//! it, and each die does exactly one thing. Treating unused dice as
//! showing the null letter keeps the second rule uniform.

use std::collections::HashMap;

use serde::Deserialize;

use crate::solver::{
    heuristics::GuessStrategy,
    state::State,
};

/// A die with a letter on each face.
#[derive(Debug, Clone, Deserialize)]
pub struct Die {
    pub faces: String,
    #[serde(default)]
    pub comment: String,
}

impl Die {
    /// Parses the `"FACES optional comment"` line format of the dice
    /// files. Blank lines parse to `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let faces = parts.next().filter(|faces| !faces.is_empty())?;
        Some(Self {
            faces: faces.to_string(),
            comment: parts.next().unwrap_or("").trim().to_string(),
        })
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.comment.is_empty() {
            f.write_str(&self.faces)
        } else {
            write!(f, "{} {}", self.faces, self.comment)
        }
    }
}

/// Variable payload: die `die` shows `letter`, or nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shows {
    pub die: usize,
    pub letter: Option<char>,
}

/// Constraint payload naming the rule it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The letter is shown exactly as often as the word contains it.
    Letter(char),
    /// Exactly the spare dice are unused.
    Unused,
    /// The die shows exactly one thing (a letter or nothing).
    Die(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum SpellingError {
    #[error("cannot spell {word:?}: only {usable} usable dice for {needed} letters")]
    NotEnoughDice {
        word: String,
        usable: usize,
        needed: usize,
    },
    #[error("the current assignment does not spell {word:?}")]
    NotASolution { word: String },
    #[error(transparent)]
    Solver(#[from] crate::error::Error),
}

/// A word, dice and letters: one die index per letter of the word.
pub type Spelling = Vec<(char, usize)>;

#[derive(Debug)]
pub struct SpellingProblem {
    word: String,
    dice: Vec<Die>,
    state: State<Shows, Rule>,
}

impl SpellingProblem {
    /// Translates the puzzle into variables and constraints. Dice with no
    /// useful face are dropped; impossible (die, letter) pairs are seeded
    /// False up front.
    pub fn build(word: &str, dice: &[Die]) -> Result<Self, SpellingError> {
        let mut letters: Vec<char> = Vec::new();
        for letter in word.chars() {
            if !letters.contains(&letter) {
                letters.push(letter);
            }
        }

        let dice: Vec<Die> = dice
            .iter()
            .filter(|die| letters.iter().any(|&letter| die.faces.contains(letter)))
            .cloned()
            .collect();
        let needed = word.chars().count();
        if dice.len() < needed {
            return Err(SpellingError::NotEnoughDice {
                word: word.to_string(),
                usable: dice.len(),
                needed,
            });
        }

        let mut state: State<Shows, Rule> = State::new();

        let mut letter_rules = HashMap::new();
        for &letter in &letters {
            let appearances = word.chars().filter(|&c| c == letter).count();
            let rule =
                state.new_constraint(appearances, Some(appearances), Rule::Letter(letter))?;
            letter_rules.insert(letter, rule);
        }
        // A die being unused is "showing the null letter"; the word
        // leaves exactly this many dice idle.
        let spare = dice.len() - needed;
        let unused_rule = state.new_constraint(spare, Some(spare), Rule::Unused)?;

        for (die_index, die) in dice.iter().enumerate() {
            let die_rule = state.new_constraint(1, Some(1), Rule::Die(die_index))?;
            for &letter in &letters {
                let var = state.new_var(Shows {
                    die: die_index,
                    letter: Some(letter),
                });
                state.add_member(letter_rules[&letter], var)?;
                state.add_member(die_rule, var)?;
                if !die.faces.contains(letter) {
                    let _ = state.set(var, false)?;
                }
            }
            let unused = state.new_var(Shows {
                die: die_index,
                letter: None,
            });
            state.add_member(unused_rule, unused)?;
            state.add_member(die_rule, unused)?;
        }

        Ok(Self {
            word: word.to_string(),
            dice,
            state,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// The usable dice, in the order the variables refer to them.
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn state(&self) -> &State<Shows, Rule> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State<Shows, Rule> {
        &mut self.state
    }

    /// Reads a spelling off a solved state: one die per letter of the
    /// word, in word order. Fails if the state is not parked on a
    /// solution for this word.
    pub fn read_spelling(
        word: &str,
        state: &State<Shows, Rule>,
    ) -> Result<Spelling, SpellingError> {
        let mut letter_dice: HashMap<char, Vec<usize>> = HashMap::new();
        for var in state.var_ids() {
            let shows = *state.payload(var);
            if let Some(letter) = shows.letter {
                if bool::try_from(state.value(var))? {
                    letter_dice.entry(letter).or_default().push(shows.die);
                }
            }
        }
        word.chars()
            .map(|letter| {
                letter_dice
                    .get_mut(&letter)
                    .and_then(Vec::pop)
                    .map(|die| (letter, die))
                    .ok_or_else(|| SpellingError::NotASolution {
                        word: word.to_string(),
                    })
            })
            .collect()
    }

    /// Collects every spelling (or just the first, with `multi = false`)
    /// found under the given strategy.
    pub fn solutions(
        &mut self,
        strategy: Box<dyn GuessStrategy<Shows, Rule>>,
        multi: bool,
    ) -> Result<Vec<Spelling>, SpellingError> {
        let word = self.word.clone();
        let mut spellings = Vec::new();
        let mut outcomes = self.state.outcomes(strategy, multi);
        while let Some(outcome) = outcomes.next() {
            if outcome?.is_solution() {
                spellings.push(Self::read_spelling(&word, outcomes.state())?);
            }
        }
        Ok(spellings)
    }
}
