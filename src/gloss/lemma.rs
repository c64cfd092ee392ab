/*!
 * Rule-based English lemmatizer.
 *
 * Reduces an inflected word to its dictionary form. The verb sense is tried first
 * (`running` -> `run`, `made` -> `make`); when it leaves the word unchanged the
 * noun sense is tried (`children` -> `child`). Irregular forms come from tables,
 * regular ones from suffix rules with consonant undoubling and silent-e
 * restoration. Anything the rules do not recognise is returned unchanged.
 */

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Irregular verb forms and regular forms the suffix rules get wrong
static IRREGULAR_VERBS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("went", "go"), ("gone", "go"), ("goes", "go"),
        ("done", "do"), ("made", "make"), ("said", "say"), ("saw", "see"), ("seen", "see"),
        ("took", "take"), ("taken", "take"), ("came", "come"), ("gave", "give"), ("given", "give"),
        ("got", "get"), ("gotten", "get"), ("knew", "know"), ("known", "know"),
        ("thought", "think"), ("told", "tell"), ("found", "find"), ("left", "leave"),
        ("felt", "feel"), ("brought", "bring"), ("bought", "buy"), ("began", "begin"),
        ("begun", "begin"), ("kept", "keep"), ("held", "hold"), ("wrote", "write"),
        ("written", "write"), ("stood", "stand"), ("heard", "hear"), ("meant", "mean"),
        ("met", "meet"), ("ran", "run"), ("paid", "pay"), ("sat", "sit"), ("spoke", "speak"),
        ("spoken", "speak"), ("led", "lead"), ("fed", "feed"), ("grew", "grow"), ("grown", "grow"),
        ("lost", "lose"), ("fell", "fall"), ("fallen", "fall"), ("sent", "send"),
        ("built", "build"), ("understood", "understand"), ("drew", "draw"), ("drawn", "draw"),
        ("broke", "break"), ("broken", "break"), ("spent", "spend"), ("taught", "teach"),
        ("ate", "eat"), ("eaten", "eat"), ("drank", "drink"), ("drunk", "drink"),
        ("drove", "drive"), ("driven", "drive"), ("flew", "fly"), ("flown", "fly"),
        ("slept", "sleep"), ("sold", "sell"), ("swam", "swim"), ("won", "win"),
        ("wore", "wear"), ("worn", "wear"), ("chose", "choose"), ("chosen", "choose"),
        ("choosing", "choose"), ("forgot", "forget"), ("forgotten", "forget"),
        ("fought", "fight"), ("caught", "catch"), ("threw", "throw"), ("thrown", "throw"),
        ("sang", "sing"), ("sung", "sing"), ("rode", "ride"), ("ridden", "ride"),
        ("hid", "hide"), ("hidden", "hide"), ("shook", "shake"), ("woke", "wake"),
        ("lying", "lie"), ("lied", "lie"), ("lies", "lie"), ("dying", "die"), ("died", "die"),
        ("dies", "die"), ("tying", "tie"), ("tied", "tie"), ("ties", "tie"),
        ("agreed", "agree"), ("freed", "free"), ("using", "use"), ("used", "use"), ("uses", "use"),
        ("adding", "add"), ("added", "add"), ("creating", "create"), ("created", "create"),
        ("raising", "raise"), ("raised", "raise"), ("pleasing", "please"), ("pleased", "please"),
        ("causing", "cause"), ("caused", "cause"), ("increasing", "increase"),
        ("increased", "increase"), ("releasing", "release"), ("released", "release"),
        ("echoes", "echo"), ("vetoes", "veto"),
    ])
});

/// Irregular noun plurals
static IRREGULAR_NOUNS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("children", "child"), ("men", "man"), ("women", "woman"), ("mice", "mouse"),
        ("feet", "foot"), ("teeth", "tooth"), ("geese", "goose"), ("oxen", "ox"),
        ("knives", "knife"), ("wives", "wife"), ("wolves", "wolf"), ("halves", "half"),
        ("shelves", "shelf"), ("thieves", "thief"), ("loaves", "loaf"), ("calves", "calf"),
        ("elves", "elf"), ("potatoes", "potato"), ("tomatoes", "tomato"), ("heroes", "hero"),
        ("movies", "movie"), ("cookies", "cookie"), ("calories", "calorie"),
        ("zombies", "zombie"), ("brownies", "brownie"), ("selfies", "selfie"),
    ])
});

/// Words that look inflected but are base forms
static UNINFLECTED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "during", "morning", "evening", "nothing", "something", "anything", "everything",
        "ceiling", "pudding", "hundred", "sacred", "naked", "wicked", "kindred",
        "yes", "gas", "always", "perhaps", "sometimes", "news", "series", "species",
        "physics", "mathematics", "politics", "economics", "lens", "its", "christmas",
        "chaos", "canvas", "atlas", "bias", "alias", "whereas", "besides", "towards",
        "afterwards", "upwards", "downwards",
    ])
});

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| is_vowel(c) || c == 'y')
}

/// Reduce a lowercase word to its base form, verb sense first
pub fn lemmatize(word: &str) -> String {
    let verb = lemmatize_verb(word);
    if verb != word {
        return verb;
    }
    lemmatize_noun(word)
}

/// Verb-sense lemma of a lowercase word
pub fn lemmatize_verb(word: &str) -> String {
    if word.len() < 3 || !word.chars().all(|c| c.is_ascii_lowercase()) {
        return word.to_string();
    }
    if let Some(base) = IRREGULAR_VERBS.get(word) {
        return base.to_string();
    }
    if IRREGULAR_NOUNS.contains_key(word) || UNINFLECTED.contains(word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 2 && has_vowel(stem) {
            return restore_stem(stem);
        }
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ied") {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
    }

    if word.ends_with("eed") {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ed") {
        if stem.len() >= 2 && has_vowel(stem) {
            return restore_stem(stem);
        }
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
    }

    if let Some(stem) = word.strip_suffix("es") {
        if ["ss", "x", "zz", "ch", "sh"].iter().any(|ending| stem.ends_with(ending)) {
            return stem.to_string();
        }
    }

    if let Some(stem) = word.strip_suffix('s') {
        if !["ss", "us", "is"].iter().any(|ending| word.ends_with(ending)) {
            return stem.to_string();
        }
    }

    word.to_string()
}

/// Noun-sense lemma of a lowercase word
pub fn lemmatize_noun(word: &str) -> String {
    if let Some(base) = IRREGULAR_NOUNS.get(word) {
        return base.to_string();
    }
    if let Some(stem) = word.strip_suffix("men") {
        if stem.len() >= 2 && word != "women" {
            return format!("{}man", stem);
        }
    }
    word.to_string()
}

/// Turn the stem left after removing `-ing`/`-ed` back into a base form
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];

    // running -> run, stopped -> stop; calling, passing, buzzing keep the pair
    if n >= 3 && last == chars[n - 2] && !is_vowel(last) && !matches!(last, 'l' | 's' | 'f' | 'z') {
        return chars[..n - 1].iter().collect();
    }

    if needs_silent_e(&chars) {
        return format!("{}e", stem);
    }

    stem.to_string()
}

/// Whether a stem lost a final silent `e` (mak -> make, danc -> dance)
fn needs_silent_e(chars: &[char]) -> bool {
    let n = chars.len();
    let last = chars[n - 1];
    let before = chars[n - 2];

    if is_vowel(last) || matches!(last, 'y' | 'w' | 'x') {
        return false;
    }

    match last {
        'v' | 'c' => return true,
        'z' if is_vowel(before) => return true,
        'g' if matches!(before, 'd' | 'r') => return true,
        _ => {}
    }

    let tail: String = chars[n.saturating_sub(3)..].iter().collect();
    if n >= 5 && (tail.ends_with("ang") || tail.ends_with("ut") || tail.ends_with("ur")) {
        return true;
    }
    if n >= 5 && tail.ends_with("at") && !is_vowel(chars[n - 3]) {
        return true;
    }
    if tail.ends_with("ir") && !tail.ends_with("air") && !tail.ends_with("eir") {
        return true;
    }
    if tail.ends_with("is") && n >= 4 && !is_vowel(chars[n - 3]) {
        return true;
    }

    // consonant + single vowel + consonant
    let single_vowel = n >= 3
        && (is_vowel(before) || before == 'y')
        && !is_vowel(chars[n - 3]);

    if single_vowel && last == 'd' {
        return true;
    }

    single_vowel && n <= 4 && !is_vowel(chars[0]) && !tail.ends_with("en")
}
