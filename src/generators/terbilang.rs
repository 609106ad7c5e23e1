//! Terbilang: Indonesian amount-in-words for Rupiah totals.
//!
//! `to_words(1_111_000)` gives `"Satu Juta Seratus Sebelas Ribu Rupiah"`.

const UNITS: [&str; 12] = [
    "", "satu", "dua", "tiga", "empat", "lima", "enam", "tujuh", "delapan", "sembilan", "sepuluh",
    "sebelas",
];

const CURRENCY: &str = "rupiah";

/// Word form of zero, returned as-is without title casing.
pub const ZERO_WORDS: &str = "nol rupiah";

/// Prefix for negative amounts.
pub const NEGATIVE_PREFIX: &str = "minus";

/// Convert an amount to its Indonesian word form with the currency unit.
pub fn to_words(amount: i64) -> String {
    if amount == 0 {
        return ZERO_WORDS.to_string();
    }
    if amount < 0 {
        return format!("{} {}", NEGATIVE_PREFIX, words_for_magnitude(amount.unsigned_abs()));
    }
    words_for_magnitude(amount as u64)
}

fn words_for_magnitude(n: u64) -> String {
    title_case(&format!("{} {}", spell(n), CURRENCY))
}

fn spell(x: u64) -> String {
    match x {
        0..=11 => UNITS[x as usize].to_string(),
        12..=19 => format!("{} belas", spell(x - 10)),
        20..=99 => band(spell(x / 10), "puluh", x % 10),
        100..=199 => irregular("seratus", x - 100),
        200..=999 => band(spell(x / 100), "ratus", x % 100),
        1_000..=1_999 => irregular("seribu", x - 1_000),
        2_000..=999_999 => band(spell(x / 1_000), "ribu", x % 1_000),
        1_000_000..=999_999_999 => band(spell(x / 1_000_000), "juta", x % 1_000_000),
        _ => band(spell(x / 1_000_000_000), "milyar", x % 1_000_000_000),
    }
}

fn band(count: String, suffix: &str, remainder: u64) -> String {
    with_remainder(format!("{count} {suffix}"), remainder)
}

fn irregular(word: &str, remainder: u64) -> String {
    with_remainder(word.to_string(), remainder)
}

fn with_remainder(head: String, remainder: u64) -> String {
    if remainder == 0 {
        head
    } else {
        format!("{} {}", head, spell(remainder))
    }
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
