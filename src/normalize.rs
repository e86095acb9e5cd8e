// src/normalize.rs
//! Lexical normalizer: demojize, case-fold, camel-case split, strip to `[a-z ]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Longest emoji sequence (in code points) we try to match.
const MAX_EMOJI_CHARS: usize = 10;
const EMOJI_DELIMITER: char = ':';

static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel regex"));
static NON_ALPHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s]").expect("non-alpha regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct NormalizerOptions {
    /// Run the camel-case split before lower-casing. The default keeps the
    /// historical order (split after lower-casing), which never matches.
    #[serde(default)]
    pub split_camel_case_before_lowercase: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    opts: NormalizerOptions,
}

impl Normalizer {
    pub fn new(opts: NormalizerOptions) -> Self {
        Self { opts }
    }

    /// Total function: any input yields a string over `[a-z ]` with single
    /// spaces and no leading/trailing whitespace (possibly empty).
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = demojize(raw).replace(EMOJI_DELIMITER, " ");

        if self.opts.split_camel_case_before_lowercase {
            text = split_camel_case(&text);
            text = text.to_lowercase();
        } else {
            text = text.to_lowercase();
            text = split_camel_case(&text);
        }

        let stripped = NON_ALPHA.replace_all(&text, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Normalize with default options.
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

fn split_camel_case(text: &str) -> String {
    CAMEL_BOUNDARY.replace_all(text, "$1 $2").into_owned()
}

/// Replace emoji glyphs with `:their_name:`; other characters pass through.
pub fn demojize(text: &str) -> String {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let start = chars[i].0;
        let longest = (chars.len() - i).min(MAX_EMOJI_CHARS);
        let mut matched = None;

        for len in (1..=longest).rev() {
            let end = chars.get(i + len).map(|(b, _)| *b).unwrap_or(text.len());
            if let Some(e) = emojis::get(&text[start..end]) {
                matched = Some((e, len));
                break;
            }
        }

        match matched {
            Some((e, len)) => {
                out.push(EMOJI_DELIMITER);
                out.push_str(&emoji_name(e.name()));
                out.push(EMOJI_DELIMITER);
                i += len;
            }
            None => {
                out.push(chars[i].1);
                i += 1;
            }
        }
    }
    out
}

fn emoji_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ':' | ','))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
