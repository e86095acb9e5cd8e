// src/antonym/wordnet.rs
//! Reader for Princeton WordNet 3.0 dict files (`index.*`, `data.*`, `*.exc`).
//!
//! Only what antonym lookup needs: lemma → synset offsets, the synset records
//! themselves, and morphological base forms. Synsets are visited in the order
//! noun, verb, adjective, adverb; within a part of speech, base forms come from
//! the exception list first, then the word itself, then suffix detachment.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::info;

use super::AntonymSource;
use crate::error::{AnalyzerError, Result};

const ANTONYM_POINTER: &str = "!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

const POS_ORDER: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

impl Pos {
    fn idx(self) -> usize {
        match self {
            Pos::Noun => 0,
            Pos::Verb => 1,
            Pos::Adj => 2,
            Pos::Adv => 3,
        }
    }

    fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }

    /// Satellite adjectives (`s`) live in the adjective files.
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "n" => Some(Pos::Noun),
            "v" => Some(Pos::Verb),
            "a" | "s" => Some(Pos::Adj),
            "r" => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Inflectional suffix rules, applied in this order.
    fn substitutions(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Pos::Noun => &[
                ("s", ""),
                ("ses", "s"),
                ("ves", "f"),
                ("xes", "x"),
                ("zes", "z"),
                ("ches", "ch"),
                ("shes", "sh"),
                ("men", "man"),
                ("ies", "y"),
            ],
            Pos::Verb => &[
                ("s", ""),
                ("ies", "y"),
                ("es", "e"),
                ("es", ""),
                ("ed", "e"),
                ("ed", ""),
                ("ing", "e"),
                ("ing", ""),
            ],
            Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
            Pos::Adv => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pointer {
    symbol: String,
    offset: u64,
    pos: Pos,
    /// 1-based lemma numbers; 0 means the pointer relates whole synsets.
    source: usize,
    target: usize,
}

#[derive(Debug, Clone)]
struct Synset {
    lemmas: Vec<String>,
    pointers: Vec<Pointer>,
}

/// In-memory WordNet database. Data files are kept as text and synset
/// records are parsed on demand by byte offset.
pub struct WordNet {
    index: HashMap<String, [Vec<u64>; 4]>,
    data: [String; 4],
    exceptions: [HashMap<String, Vec<String>>; 4],
}

impl WordNet {
    /// Open a WordNet `dict/` directory. `index.*` and `data.*` are required
    /// for all four parts of speech; `*.exc` files are optional.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut index: HashMap<String, [Vec<u64>; 4]> = HashMap::new();
        let mut data: [String; 4] = Default::default();
        let mut exceptions: [HashMap<String, Vec<String>>; 4] = Default::default();

        for pos in POS_ORDER {
            let idx_path = dir.join(format!("index.{}", pos.file_suffix()));
            let raw = read_required(&idx_path)?;
            for line in raw.lines() {
                if let Some((lemma, offsets)) = parse_index_line(line) {
                    index.entry(lemma).or_default()[pos.idx()] = offsets;
                }
            }

            let data_path = dir.join(format!("data.{}", pos.file_suffix()));
            data[pos.idx()] = read_required(&data_path)?;

            let exc_path = dir.join(format!("{}.exc", pos.file_suffix()));
            if let Ok(raw) = fs::read_to_string(&exc_path) {
                exceptions[pos.idx()] = parse_exceptions(&raw);
            }
        }

        info!(dir = %dir.display(), lemmas = index.len(), "wordnet loaded");
        Ok(Self {
            index,
            data,
            exceptions,
        })
    }

    fn offsets(&self, form: &str, pos: Pos) -> &[u64] {
        self.index
            .get(form)
            .map(|per_pos| per_pos[pos.idx()].as_slice())
            .unwrap_or(&[])
    }

    fn is_indexed(&self, form: &str, pos: Pos) -> bool {
        !self.offsets(form, pos).is_empty()
    }

    /// Base forms of `word` for `pos` that exist in the index.
    fn morphy(&self, word: &str, pos: Pos) -> Vec<String> {
        let filter = |forms: Vec<String>| -> Vec<String> {
            let mut seen = HashSet::new();
            forms
                .into_iter()
                .filter(|f| self.is_indexed(f, pos) && seen.insert(f.clone()))
                .collect()
        };

        if let Some(bases) = self.exceptions[pos.idx()].get(word) {
            let mut forms = vec![word.to_string()];
            forms.extend(bases.iter().cloned());
            return filter(forms);
        }

        let mut forms = apply_rules(&[word.to_string()], pos);
        let mut first = vec![word.to_string()];
        first.extend(forms.iter().cloned());
        let found = filter(first);
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms, pos);
            let found = filter(forms.clone());
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    fn synset_ids(&self, word: &str) -> Vec<(Pos, u64)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for pos in POS_ORDER {
            for form in self.morphy(word, pos) {
                for &offset in self.offsets(&form, pos) {
                    if seen.insert((pos, offset)) {
                        out.push((pos, offset));
                    }
                }
            }
        }
        out
    }

    fn synset(&self, pos: Pos, offset: u64) -> Option<Synset> {
        let text = &self.data[pos.idx()];
        let start = usize::try_from(offset).ok()?;
        let rest = text.get(start..)?;
        let line = rest.split('\n').next()?;
        parse_data_line(line, offset)
    }

    /// Every antonym lemma name reachable from `word`, in traversal order.
    pub fn antonyms(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let mut out: Vec<String> = Vec::new();
        for (pos, offset) in self.synset_ids(&word) {
            let Some(synset) = self.synset(pos, offset) else {
                continue;
            };
            for lemma_no in 1..=synset.lemmas.len() {
                // first antonym pointer of each lemma only
                let Some(ptr) = synset
                    .pointers
                    .iter()
                    .find(|p| p.symbol == ANTONYM_POINTER && p.source == lemma_no)
                else {
                    continue;
                };
                let name = self
                    .synset(ptr.pos, ptr.offset)
                    .and_then(|t| t.lemmas.get(ptr.target.wrapping_sub(1)).cloned())
                    .map(|n| n.to_lowercase());
                if let Some(name) = name {
                    if !out.contains(&name) {
                        out.push(name);
                    }
                }
            }
        }
        out
    }
}

impl AntonymSource for WordNet {
    fn antonym_of(&self, word: &str) -> Option<String> {
        self.antonyms(word).into_iter().next()
    }

    fn name(&self) -> &'static str {
        "wordnet"
    }
}

fn read_required(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| AnalyzerError::artifact(path.display().to_string(), e))
}

fn apply_rules(forms: &[String], pos: Pos) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (old, new) in pos.substitutions() {
            if let Some(stem) = form.strip_suffix(old) {
                let candidate = format!("{stem}{new}");
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
    }
    out
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt offset...`
fn parse_index_line(line: &str) -> Option<(String, Vec<u64>)> {
    if line.starts_with(' ') {
        return None; // license header
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    let lemma = fields.first()?.to_string();
    let synset_cnt: usize = fields.get(2)?.parse().ok()?;
    let p_cnt: usize = fields.get(3)?.parse().ok()?;
    let first_offset = 4 + p_cnt + 2;
    let offsets = fields
        .get(first_offset..first_offset + synset_cnt)?
        .iter()
        .map(|s| s.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .ok()?;
    Some((lemma, offsets))
}

/// `inflected base [base...]`
fn parse_exceptions(raw: &str) -> HashMap<String, Vec<String>> {
    let mut out = HashMap::new();
    for line in raw.lines() {
        let mut parts = line.split_whitespace();
        if let Some(inflected) = parts.next() {
            let bases: Vec<String> = parts.map(str::to_string).collect();
            if !bases.is_empty() {
                out.insert(inflected.to_string(), bases);
            }
        }
    }
    out
}

/// `offset lex_filenum ss_type w_cnt word lex_id [...] p_cnt [ptr...] [frames] | gloss`
fn parse_data_line(line: &str, expected_offset: u64) -> Option<Synset> {
    let head = line.split('|').next()?;
    let fields: Vec<&str> = head.split_whitespace().collect();
    if fields.first()?.parse::<u64>().ok()? != expected_offset {
        return None;
    }

    let w_cnt = usize::from_str_radix(fields.get(3)?, 16).ok()?;
    let mut lemmas = Vec::with_capacity(w_cnt);
    for i in 0..w_cnt {
        lemmas.push(strip_adj_marker(fields.get(4 + i * 2)?).to_string());
    }

    let p_at = 4 + w_cnt * 2;
    let p_cnt: usize = fields.get(p_at)?.parse().ok()?;
    let mut pointers = Vec::with_capacity(p_cnt);
    for i in 0..p_cnt {
        let base = p_at + 1 + i * 4;
        let st = fields.get(base + 3)?;
        if st.len() != 4 {
            return None;
        }
        pointers.push(Pointer {
            symbol: fields.get(base)?.to_string(),
            offset: fields.get(base + 1)?.parse().ok()?,
            pos: Pos::from_tag(fields.get(base + 2)?)?,
            source: usize::from_str_radix(&st[..2], 16).ok()?,
            target: usize::from_str_radix(&st[2..], 16).ok()?,
        });
    }
    Some(Synset { lemmas, pointers })
}

/// Adjective lemmas may carry a syntactic marker such as `long(a)`.
fn strip_adj_marker(word: &str) -> &str {
    match word.find('(') {
        Some(i) if word.ends_with(')') => &word[..i],
        _ => word,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    type Ptr = (&'static str, &'static str, char, u8, u8);
    type Entry = (&'static str, Vec<&'static str>, Vec<Ptr>);

    fn render(key_offsets: &HashMap<&str, u64>, off: u64, ss: char, words: &[&str], ptrs: &[Ptr]) -> String {
        let words_s = words
            .iter()
            .map(|w| format!("{w} 0"))
            .collect::<Vec<_>>()
            .join(" ");
        let ptrs_s = ptrs
            .iter()
            .map(|(sym, key, pos, s, t)| {
                let o = key_offsets.get(key).copied().unwrap_or(0);
                format!(" {sym} {o:08} {pos} {s:02x}{t:02x}")
            })
            .collect::<String>();
        format!(
            "{off:08} 00 {ss} {:02x} {words_s} {:03}{ptrs_s} | gloss\n",
            words.len(),
            ptrs.len()
        )
    }

    /// Write a tiny dict with correct byte offsets. Keys must be unique
    /// across files; line lengths do not depend on offset values.
    pub(crate) fn write_dict(dir: &Path, files: &[(&str, char, Vec<Entry>)], exc: &[(&str, &str)]) {
        let zero: HashMap<&str, u64> = HashMap::new();
        let mut offsets: HashMap<&str, u64> = HashMap::new();
        for (_, ss, entries) in files {
            let mut pos = 0u64;
            for (key, words, ptrs) in entries {
                offsets.insert(*key, pos);
                pos += render(&zero, 0, *ss, words, ptrs).len() as u64;
            }
        }

        for suffix in ["noun", "verb", "adj", "adv"] {
            let file = files.iter().find(|(s, _, _)| *s == suffix);
            let mut data = String::new();
            let mut index: HashMap<&str, Vec<u64>> = HashMap::new();
            let mut order: Vec<&str> = Vec::new();
            if let Some((_, ss, entries)) = file {
                for (key, words, ptrs) in entries {
                    let off = offsets[key];
                    data.push_str(&render(&offsets, off, *ss, words, ptrs));
                    for w in words.iter() {
                        let lemma = strip_adj_marker(w);
                        if !index.contains_key(lemma) {
                            order.push(lemma);
                        }
                        index.entry(lemma).or_default().push(off);
                    }
                }
            }
            let tag = &suffix[..1];
            let mut idx = String::from("  1 license header line\n");
            for lemma in order {
                let offs = &index[lemma];
                let list = offs.iter().map(|o| format!("{o:08}")).collect::<Vec<_>>().join(" ");
                idx.push_str(&format!("{lemma} {tag} {n} 1 ! {n} 0 {list}\n", n = offs.len()));
            }
            fs::write(dir.join(format!("index.{suffix}")), idx).unwrap();
            fs::write(dir.join(format!("data.{suffix}")), data).unwrap();
        }

        let adj_exc = exc.iter().map(|(a, b)| format!("{a} {b}\n")).collect::<String>();
        fs::write(dir.join("adj.exc"), adj_exc).unwrap();
    }

    pub(crate) fn sample_dict(dir: &Path) {
        write_dict(
            dir,
            &[
                (
                    "noun",
                    'n',
                    vec![
                        ("n_good", vec!["good", "goodness"], vec![("!", "n_evil", 'n', 1, 1), ("!", "n_bad", 'n', 2, 1)]),
                        ("n_evil", vec!["evil"], vec![("!", "n_good", 'n', 1, 1)]),
                        ("n_bad", vec!["badness"], vec![]),
                        ("n_movie", vec!["movie", "film"], vec![("@", "n_evil", 'n', 0, 0)]),
                    ],
                ),
                (
                    "verb",
                    'v',
                    vec![
                        ("v_love", vec!["love"], vec![("!", "v_hate", 'v', 1, 1)]),
                        ("v_hate", vec!["hate"], vec![("!", "v_love", 'v', 1, 1)]),
                    ],
                ),
                (
                    "adj",
                    'a',
                    vec![
                        ("a_good", vec!["good"], vec![("!", "a_bad", 'a', 1, 1)]),
                        ("a_bad", vec!["bad"], vec![("!", "a_good", 'a', 1, 1)]),
                        ("a_happy", vec!["happy(a)"], vec![("!", "a_unhappy", 'a', 1, 1)]),
                        ("a_unhappy", vec!["unhappy"], vec![("!", "a_happy", 'a', 1, 1)]),
                        ("a_empty", vec!["empty"], vec![("!", "a_full", 'a', 1, 1)]),
                        ("a_full", vec!["full"], vec![("!", "a_empty", 'a', 1, 1)]),
                    ],
                ),
            ],
            &[("happier", "happy")],
        );
    }

    #[test]
    fn data_line_parsing() {
        let line = "00001740 03 a 02 able(a) 0 capable 0 002 ! 00002098 a 0101 + 05207437 n 0101 | (usually followed by `to')";
        let s = parse_data_line(line, 1740).unwrap();
        assert_eq!(s.lemmas, vec!["able", "capable"]);
        assert_eq!(s.pointers.len(), 2);
        assert_eq!(s.pointers[0].symbol, "!");
        assert_eq!(s.pointers[0].offset, 2098);
        assert_eq!((s.pointers[0].source, s.pointers[0].target), (1, 1));
        assert_eq!(s.pointers[1].pos, Pos::Noun);
        assert!(parse_data_line(line, 99).is_none());
    }

    #[test]
    fn index_line_parsing() {
        let (lemma, offs) = parse_index_line("good a 2 3 ! & ^ 2 1 01123148 01129977").unwrap();
        assert_eq!(lemma, "good");
        assert_eq!(offs, vec![1123148, 1129977]);
        assert!(parse_index_line("  1 This software and database").is_none());
    }

    #[test]
    fn antonyms_follow_pos_order() {
        let dir = tempfile::tempdir().unwrap();
        sample_dict(dir.path());
        let wn = WordNet::open(dir.path()).unwrap();
        // noun synsets come first: good→evil, goodness→badness, then the adjective
        assert_eq!(wn.antonyms("good"), vec!["evil", "badness", "bad"]);
        assert_eq!(wn.antonym_of("good").as_deref(), Some("evil"));
        assert_eq!(wn.antonym_of("happy").as_deref(), Some("unhappy"));
        assert_eq!(wn.antonym_of("movie"), None);
        assert_eq!(wn.antonym_of("the"), None);
    }

    #[test]
    fn base_forms_are_resolved() {
        let dir = tempfile::tempdir().unwrap();
        sample_dict(dir.path());
        let wn = WordNet::open(dir.path()).unwrap();
        assert_eq!(wn.antonym_of("loving").as_deref(), Some("hate"));
        assert_eq!(wn.antonym_of("loves").as_deref(), Some("hate"));
        assert_eq!(wn.antonym_of("happier").as_deref(), Some("unhappy"));
        assert_eq!(wn.antonym_of("films"), None);
    }

    #[test]
    fn missing_files_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = WordNet::open(dir.path()).err().unwrap();
        assert!(matches!(err, AnalyzerError::ArtifactLoad { .. }));
    }
}
