//! Porter-style suffix stripping.
//!
//! Implements the first group of reduction passes from the classic Porter
//! algorithm: plural removal (step 1a), past-tense/gerund removal with
//! restoration rules (step 1b), and the final `y` → `i` substitution
//! (step 1c). All helpers are pure value-to-value functions.
//!
//! Words of length ≤ 2 are returned unchanged apart from case folding.

/// Is the character at `i` a consonant?
///
/// `y` is classified recursively: it is a consonant at position 0 and
/// otherwise takes the opposite class of the preceding character.
fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => {
            if i == 0 {
                true
            } else {
                !is_consonant(word, i - 1)
            }
        }
        _ => true,
    }
}

/// Porter "measure": count of consonant-run → vowel-run transitions.
fn measure(word: &[char]) -> usize {
    let mut m = 0;
    let mut prev_consonant = true;
    for i in 0..word.len() {
        let consonant = is_consonant(word, i);
        if prev_consonant && !consonant {
            m += 1;
        }
        prev_consonant = consonant;
    }
    m
}

fn has_vowel(word: &[char]) -> bool {
    (0..word.len()).any(|i| !is_consonant(word, i))
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Ends consonant-vowel-consonant, final consonant not `w`, `x`, or `y`.
fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    if n < 3 {
        return false;
    }
    is_consonant(word, n - 1)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 3)
        && !matches!(word[n - 1], 'w' | 'x' | 'y')
}

fn ends_with(word: &[char], suffix: &str) -> bool {
    let suffix: Vec<char> = suffix.chars().collect();
    word.len() >= suffix.len() && word[word.len() - suffix.len()..] == suffix[..]
}

/// Step 1a: plural reduction.
///
/// `sses` → `ss`; `ies` → `i`; a bare trailing `ss` is left untouched;
/// otherwise a single trailing `s` is dropped.
fn step_1a(word: &mut Vec<char>) {
    if ends_with(word, "sses") {
        word.truncate(word.len() - 2);
    } else if ends_with(word, "ies") {
        word.truncate(word.len() - 2);
    } else if ends_with(word, "ss") {
        // leave as-is
    } else if ends_with(word, "s") {
        word.pop();
    }
}

/// Step 1b: past tense and gerund reduction.
fn step_1b(word: &mut Vec<char>) {
    if ends_with(word, "eed") {
        if measure(&word[..word.len() - 3]) > 0 {
            word.pop();
        }
        return;
    }

    let strips_ed = ends_with(word, "ed") && has_vowel(&word[..word.len() - 2]);
    let strips_ing = ends_with(word, "ing") && has_vowel(&word[..word.len() - 3]);
    if !strips_ed && !strips_ing {
        return;
    }
    if strips_ed {
        word.truncate(word.len() - 2);
    } else {
        word.truncate(word.len() - 3);
    }

    // Restoration rules on the remaining stem.
    if ends_with(word, "at") || ends_with(word, "bl") || ends_with(word, "iz") {
        word.push('e');
    } else if ends_double_consonant(word)
        && !ends_with(word, "l")
        && !ends_with(word, "s")
        && !ends_with(word, "z")
    {
        word.pop();
    } else if measure(word) == 1 && ends_cvc(word) {
        word.push('e');
    }
}

/// Step 1c: terminal `y` → `i` when the preceding stem contains a vowel.
fn step_1c(word: &mut [char]) {
    let n = word.len();
    if n >= 1 && word[n - 1] == 'y' && has_vowel(&word[..n - 1]) {
        word[n - 1] = 'i';
    }
}

/// Stem a word using the Porter reduction passes.
///
/// Input is case-folded first; words of length ≤ 2 skip stemming entirely.
pub fn stem(word: &str) -> String {
    let lowered = word.to_lowercase();
    if lowered.chars().count() <= 2 {
        return lowered;
    }

    let mut chars: Vec<char> = lowered.chars().collect();
    step_1a(&mut chars);
    step_1b(&mut chars);
    step_1c(&mut chars);
    chars.into_iter().collect()
}
