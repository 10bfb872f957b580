//! Porter (1980) suffix-stripping stemmer.
//!
//! Operates on lowercase ASCII words. Words of two characters or fewer, and
//! words containing anything outside `a-z`, are returned unchanged.

const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Stem a single word.
pub fn stem(word: &str) -> String {
    if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return word.to_string();
    }
    let mut w = word.as_bytes().to_vec();
    step1a(&mut w);
    step1b(&mut w);
    step1c(&mut w);
    replace_first(&mut w, STEP2, 0);
    replace_first(&mut w, STEP3, 0);
    step4(&mut w);
    step5(&mut w);
    // only ASCII bytes were ever written
    String::from_utf8(w).unwrap_or_else(|_| word.to_string())
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `w`.
fn measure(w: &[u8]) -> usize {
    let n = w.len();
    let mut i = 0;
    let mut m = 0;
    while i < n && is_consonant(w, i) {
        i += 1;
    }
    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }
        if i >= n {
            return m;
        }
        while i < n && is_consonant(w, i) {
            i += 1;
        }
        m += 1;
    }
}

fn has_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant, where the last consonant is not w, x or y.
fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 1)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 3)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

fn stem_len(w: &[u8], suffix: &str) -> Option<usize> {
    if w.ends_with(suffix.as_bytes()) {
        Some(w.len() - suffix.len())
    } else {
        None
    }
}

fn set_suffix(w: &mut Vec<u8>, stem: usize, replacement: &str) {
    w.truncate(stem);
    w.extend_from_slice(replacement.as_bytes());
}

fn step1a(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        let n = w.len();
        w.truncate(n - 2);
    } else if w.ends_with(b"s") && !w.ends_with(b"ss") {
        w.pop();
    }
}

fn step1b(w: &mut Vec<u8>) {
    if let Some(stem) = stem_len(w, "eed") {
        if measure(&w[..stem]) > 0 {
            w.pop();
        }
        return;
    }
    let stem = match stem_len(w, "ed").or_else(|| stem_len(w, "ing")) {
        Some(stem) if has_vowel(&w[..stem]) => stem,
        _ => return,
    };
    w.truncate(stem);
    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if ends_double_consonant(w) {
        if !matches!(w[w.len() - 1], b'l' | b's' | b'z') {
            w.pop();
        }
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push(b'e');
    }
}

fn step1c(w: &mut [u8]) {
    let n = w.len();
    if w.ends_with(b"y") && has_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

/// Apply the first rule whose suffix matches, if the stem measure exceeds `min_measure`.
fn replace_first(w: &mut Vec<u8>, rules: &[(&str, &str)], min_measure: usize) {
    for (suffix, replacement) in rules {
        if let Some(stem) = stem_len(w, suffix) {
            if measure(&w[..stem]) > min_measure {
                set_suffix(w, stem, replacement);
            }
            return;
        }
    }
}

fn step4(w: &mut Vec<u8>) {
    for suffix in STEP4 {
        let Some(stem) = stem_len(w, suffix) else { continue };
        if *suffix == "ion" && !(stem > 0 && matches!(w[stem - 1], b's' | b't')) {
            continue;
        }
        if measure(&w[..stem]) > 1 {
            w.truncate(stem);
        }
        return;
    }
}

fn step5(w: &mut Vec<u8>) {
    if let Some(stem) = stem_len(w, "e") {
        let m = measure(&w[..stem]);
        if m > 1 || (m == 1 && !ends_cvc(&w[..stem])) {
            w.truncate(stem);
        }
    }
    if measure(w) > 1 && ends_double_consonant(w) && w.ends_with(b"l") {
        w.pop();
    }
}
