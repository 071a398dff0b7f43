//! French cardinal number spelling ("montant en lettres").
//!
//! Converts integers to their French word form, as printed next to an
//! amount in figures on a termsheet ("1.500.000 € (un million cinq cent
//! mille euros)").
//!
//! Follows traditional orthography: `quatre-vingts` keeps its final `s`
//! only when nothing follows, `cent` is never pluralized before trailing
//! tens or units, and `mille` is invariant. Rectified-spelling hyphens
//! are not applied.

const UNITS: [&str; 10] = [
    "", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf",
];

const TEENS: [&str; 10] = [
    "dix",
    "onze",
    "douze",
    "treize",
    "quatorze",
    "quinze",
    "seize",
    "dix-sept",
    "dix-huit",
    "dix-neuf",
];

const TENS: [&str; 10] = [
    "",
    "",
    "vingt",
    "trente",
    "quarante",
    "cinquante",
    "soixante",
    "soixante-dix",
    "quatre-vingt",
    "quatre-vingt-dix",
];

/// Convert an integer to French words.
///
/// Negative values are prefixed with `moins`. Magnitudes of 10^12 and
/// above have no scale word here and come out garbled; callers are
/// expected to stay below the billions.
///
/// # Examples
///
/// ```
/// use libelle::lettres::convert;
///
/// assert_eq!(convert(0), "zéro");
/// assert_eq!(convert(71), "soixante et onze");
/// assert_eq!(convert(1_500_000), "un million cinq cent mille");
/// ```
pub fn convert(number: i64) -> String {
    if number < 0 {
        return format!("moins {}", spell(number.unsigned_abs()));
    }
    spell(number as u64)
}

fn spell(mut number: u64) -> String {
    if number == 0 {
        return "zéro".to_string();
    }

    let mut parts: Vec<String> = Vec::with_capacity(4);

    if number >= 1_000_000_000 {
        let billions = number / 1_000_000_000;
        if billions == 1 {
            parts.push("un milliard".to_string());
        } else {
            parts.push(format!("{} milliards", under_thousand(billions % 1_000)));
        }
        number %= 1_000_000_000;
    }

    if number >= 1_000_000 {
        let millions = number / 1_000_000;
        if millions == 1 {
            parts.push("un million".to_string());
        } else {
            parts.push(format!("{} millions", under_thousand(millions)));
        }
        number %= 1_000_000;
    }

    if number >= 1_000 {
        let thousands = number / 1_000;
        if thousands == 1 {
            // "mille", never "un mille"
            parts.push("mille".to_string());
        } else {
            parts.push(format!("{} mille", under_thousand(thousands)));
        }
        number %= 1_000;
    }

    if number > 0 {
        parts.push(under_thousand(number));
    }

    parts.join(" ")
}

/// Spell a value in 1..=999.
fn under_thousand(mut number: u64) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(2);

    if number >= 100 {
        let hundreds = number / 100;
        if hundreds == 1 {
            parts.push("cent".to_string());
        } else {
            parts.push(format!("{} cent", UNITS[hundreds as usize]));
        }
        number %= 100;
    }

    if number >= 20 {
        let tens = number / 10;
        let units = number % 10;
        let word = match tens {
            // 70–79 ride on "soixante" plus the teen words
            7 => match units {
                0 => "soixante-dix".to_string(),
                1 => "soixante et onze".to_string(),
                _ => format!("soixante-{}", TEENS[units as usize]),
            },
            // 90–99 ride on "quatre-vingt" plus the teen words, no "et"
            9 => match units {
                0 => "quatre-vingt-dix".to_string(),
                _ => format!("quatre-vingt-{}", TEENS[units as usize]),
            },
            8 if units == 0 => "quatre-vingts".to_string(),
            _ => {
                let tens_word = TENS[tens as usize];
                match units {
                    0 => tens_word.to_string(),
                    // 81 is "quatre-vingt-un", not "quatre-vingt et un"
                    1 if tens != 8 => format!("{tens_word} et un"),
                    _ => format!("{}-{}", tens_word, UNITS[units as usize]),
                }
            },
        };
        parts.push(word);
    } else if number >= 10 {
        parts.push(TEENS[(number - 10) as usize].to_string());
    } else if number > 0 {
        parts.push(UNITS[number as usize].to_string());
    }

    parts.join(" ")
}
