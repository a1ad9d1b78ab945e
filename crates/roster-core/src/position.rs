//! Position taxonomy — maps free-form position labels onto four canonical
//! categories.
//!
//! Labels reach the marketplace in many spellings ("Volante Central",
//! "LATERAL DERECHO", "cb", "Mediapunta"). Classification is keyword based:
//! each [`KeywordRule`] ties a keyword to a category, and a label matches a
//! rule when the normalized label contains the keyword. Because the keyword
//! lists overlap, three disambiguation steps run before the surviving
//! categories are reported:
//!
//! 1. **Substring shadowing** — a match whose keyword is a strict substring
//!    of another category's matched keyword is dropped ("punta" inside
//!    "mediapunta", "lw" inside "lwb").
//! 2. **Overlap tie-break** — when two categories' keyword occurrences
//!    overlap in the label, the higher-precedence (longer) keyword wins.
//!    Equal precedence keeps both.
//! 3. **Named exceptions** — the explicit table in [`EXCEPTIONS`]. The only
//!    entry today is `volante-central`.
//!
//! A label may legitimately land in more than one category; every surviving
//! category is returned and none is picked arbitrarily.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

// ─── Categories ──────────────────────────────────────────────────────────────

/// The canonical position buckets used for search and filtering.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PositionCategory {
  Goalkeeper,
  Defender,
  Midfielder,
  Forward,
}

impl PositionCategory {
  pub const ALL: [PositionCategory; 4] = [
    PositionCategory::Goalkeeper,
    PositionCategory::Defender,
    PositionCategory::Midfielder,
    PositionCategory::Forward,
  ];

  pub const fn as_str(self) -> &'static str {
    match self {
      PositionCategory::Goalkeeper => "goalkeeper",
      PositionCategory::Defender => "defender",
      PositionCategory::Midfielder => "midfielder",
      PositionCategory::Forward => "forward",
    }
  }
}

impl fmt::Display for PositionCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown position category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for PositionCategory {
  type Err = UnknownCategory;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PositionCategory::ALL
      .into_iter()
      .find(|c| c.as_str() == s.trim().to_ascii_lowercase())
      .ok_or_else(|| UnknownCategory(s.to_owned()))
  }
}

// ─── Rule tables ─────────────────────────────────────────────────────────────

/// One keyword of the taxonomy. Keywords are stored already normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
  pub keyword:    &'static str,
  pub category:   PositionCategory,
  /// Used by the overlap tie-break; the keyword's length.
  pub precedence: usize,
}

const fn rule(keyword: &'static str, category: PositionCategory) -> KeywordRule {
  KeywordRule { keyword, category, precedence: keyword.len() }
}

use PositionCategory::{Defender, Forward, Goalkeeper, Midfielder};

/// The keyword taxonomy, grouped by category.
pub static RULES: &[KeywordRule] = &[
  rule("arquero", Goalkeeper),
  rule("portero", Goalkeeper),
  rule("guardameta", Goalkeeper),
  rule("golero", Goalkeeper),
  rule("goleiro", Goalkeeper),
  rule("goalkeeper", Goalkeeper),
  rule("keeper", Goalkeeper),
  rule("gk", Goalkeeper),
  rule("defensa", Defender),
  rule("defensor", Defender),
  rule("defender", Defender),
  rule("zaguero", Defender),
  rule("zagueiro", Defender),
  rule("lateral", Defender),
  rule("central", Defender),
  rule("libero", Defender),
  rule("carrilero", Defender),
  rule("stopper", Defender),
  rule("marcador", Defender),
  rule("back", Defender),
  rule("lwb", Defender),
  rule("rwb", Defender),
  rule("cb", Defender),
  rule("rb", Defender),
  rule("lb", Defender),
  rule("volante", Midfielder),
  rule("medio", Midfielder),
  rule("mediocampista", Midfielder),
  rule("centrocampista", Midfielder),
  rule("mediapunta", Midfielder),
  rule("pivote", Midfielder),
  rule("enganche", Midfielder),
  rule("interior", Midfielder),
  rule("contencion", Midfielder),
  rule("midfielder", Midfielder),
  rule("cdm", Midfielder),
  rule("cam", Midfielder),
  rule("cm", Midfielder),
  rule("delantero", Forward),
  rule("centrodelantero", Forward),
  rule("atacante", Forward),
  rule("extremo", Forward),
  rule("punta", Forward),
  rule("ariete", Forward),
  rule("striker", Forward),
  rule("forward", Forward),
  rule("winger", Forward),
  rule("cf", Forward),
  rule("lw", Forward),
  rule("rw", Forward),
];

/// A hand-written override for a known conflict between keyword lists.
#[derive(Debug, Clone, Copy)]
pub struct NamedException {
  pub name:     &'static str,
  /// The exception applies when the normalized label contains every one of
  /// these.
  pub triggers: &'static [&'static str],
  /// Dropped from the result whenever the exception applies.
  pub suppress: PositionCategory,
}

impl NamedException {
  pub fn applies_to(&self, normalized: &str) -> bool {
    self.triggers.iter().all(|t| normalized.contains(t))
  }
}

pub static EXCEPTIONS: &[NamedException] = &[NamedException {
  name:     "volante-central",
  triggers: &["volante", "central"],
  suppress: Defender,
}];

// ─── Normalization ───────────────────────────────────────────────────────────

/// Replace the accented Latin letters common in Spanish and Portuguese
/// labels with their base letter. Expects lowercase input.
pub fn fold_diacritics(s: &str) -> String {
  s.chars()
    .map(|c| match c {
      'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
      'é' | 'è' | 'ê' | 'ë' => 'e',
      'í' | 'ì' | 'î' | 'ï' => 'i',
      'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
      'ú' | 'ù' | 'û' | 'ü' => 'u',
      'ñ' => 'n',
      'ç' => 'c',
      other => other,
    })
    .collect()
}

/// Case-fold, trim, fold diacritics and collapse internal whitespace.
pub fn normalize_label(label: &str) -> String {
  fold_diacritics(&label.to_lowercase())
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

// ─── Classification ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Hit {
  rule:  &'static KeywordRule,
  start: usize,
  end:   usize,
}

impl Hit {
  fn overlaps(&self, other: &Hit) -> bool {
    self.start < other.end && other.start < self.end
  }
}

/// The keyword rules that survive disambiguation for `label`, in table order
/// and without duplicates. Useful for explaining a classification.
pub fn matched_rules(label: &str) -> Vec<&'static KeywordRule> {
  let normalized = normalize_label(label);
  if normalized.is_empty() {
    return Vec::new();
  }

  let hits: Vec<Hit> = RULES
    .iter()
    .flat_map(|rule| {
      normalized.match_indices(rule.keyword).map(move |(start, kw)| Hit {
        rule,
        start,
        end: start + kw.len(),
      })
    })
    .collect();

  // Substring shadowing across categories.
  let matched: Vec<&KeywordRule> = hits.iter().map(|h| h.rule).collect();
  let unshadowed: Vec<Hit> = hits
    .iter()
    .copied()
    .filter(|h| {
      !matched.iter().any(|other| {
        other.category != h.rule.category
          && other.keyword.len() > h.rule.keyword.len()
          && other.keyword.contains(h.rule.keyword)
      })
    })
    .collect();

  // Overlap tie-break across categories.
  let mut survivors: Vec<Hit> = unshadowed
    .iter()
    .copied()
    .filter(|h| {
      !unshadowed.iter().any(|other| {
        other.rule.category != h.rule.category
          && other.overlaps(h)
          && other.rule.precedence > h.rule.precedence
      })
    })
    .collect();

  for exception in EXCEPTIONS {
    if exception.applies_to(&normalized) {
      survivors.retain(|h| h.rule.category != exception.suppress);
    }
  }

  let mut rules: Vec<&'static KeywordRule> = Vec::new();
  for rule in RULES {
    if survivors.iter().any(|h| std::ptr::eq(h.rule, rule)) {
      rules.push(rule);
    }
  }
  rules
}

/// Every category `label` belongs to. Empty when nothing matches.
pub fn classify(label: &str) -> BTreeSet<PositionCategory> {
  matched_rules(label).into_iter().map(|r| r.category).collect()
}

/// `true` if `label` classifies into `category`.
pub fn matches_category(label: &str, category: PositionCategory) -> bool {
  classify(label).contains(&category)
}

/// Union of the categories of every label in `positions`.
pub fn classify_all<S: AsRef<str>>(positions: &[S]) -> BTreeSet<PositionCategory> {
  positions.iter().flat_map(|p| classify(p.as_ref())).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn set(categories: &[PositionCategory]) -> BTreeSet<PositionCategory> {
    categories.iter().copied().collect()
  }

  const REFERENCE: &[(&str, &[PositionCategory])] = &[
    ("Arquero", &[Goalkeeper]),
    ("portero suplente", &[Goalkeeper]),
    ("GK", &[Goalkeeper]),
    ("Defensa Central", &[Defender]),
    ("Lateral Derecho", &[Defender]),
    ("Líbero", &[Defender]),
    ("CB", &[Defender]),
    ("LWB", &[Defender]),
    ("Volante Central", &[Midfielder]),
    ("volante  CENTRAL ", &[Midfielder]),
    ("Volante", &[Midfielder]),
    ("Mediocampista", &[Midfielder]),
    ("Centrocampista", &[Midfielder]),
    ("Pivote", &[Midfielder]),
    ("Mediapunta", &[Midfielder]),
    ("Contención", &[Midfielder]),
    ("Delantero Centro", &[Forward]),
    ("Centrodelantero", &[Forward]),
    ("Extremo Izquierdo", &[Forward]),
    ("Punta", &[Forward]),
    ("LW", &[Forward]),
    ("Lateral Volante", &[Defender, Midfielder]),
    ("Central / Volante", &[Midfielder]),
    ("Utilero", &[]),
    ("", &[]),
  ];

  #[test]
  fn reference_table() {
    for (label, expected) in REFERENCE {
      assert_eq!(classify(label), set(expected), "label {label:?}");
    }
  }

  #[test]
  fn volante_with_central_is_never_defender() {
    for label in [
      "Volante Central",
      "central volante",
      "VOLANTE CENTRAL DERECHO",
      "volante-central",
      "Volante (central)",
    ] {
      let categories = classify(label);
      assert!(!categories.contains(&Defender), "label {label:?}");
      assert!(categories.contains(&Midfielder), "label {label:?}");
    }
  }

  #[test]
  fn volante_central_outweighs_other_defender_keywords() {
    for label in [
      "Defensa Central / Volante",
      "Volante Central, ex Lateral",
      "Zaguero central y volante",
      "volante central (stopper)",
    ] {
      assert_eq!(classify(label), set(&[Midfielder]), "label {label:?}");
    }
    // Without "central" the defender keyword stands.
    assert_eq!(classify("Lateral Volante"), set(&[Defender, Midfielder]));
  }

  #[test]
  fn central_alone_is_defender() {
    assert_eq!(classify("Central"), set(&[Defender]));
  }

  #[test]
  fn shorter_keyword_of_other_category_is_shadowed() {
    let rules: Vec<&str> = matched_rules("mediapunta").iter().map(|r| r.keyword).collect();
    assert_eq!(rules, vec!["mediapunta"]);
    assert_eq!(classify("rwb"), set(&[Defender]));
  }

  #[test]
  fn overlapping_occurrences_prefer_the_longer_keyword() {
    // "punta" and "arquero" share the "a".
    assert_eq!(classify("puntarquero"), set(&[Goalkeeper]));
    // Same precedence on both sides of the shared "e": keep both.
    assert_eq!(classify("volantextremo"), set(&[Midfielder, Forward]));
    // Same-category overlaps are never tie-broken.
    assert_eq!(classify("centrocampista"), set(&[Midfielder]));
  }

  #[test]
  fn matches_category_is_built_on_classify() {
    assert!(matches_category("Volante Central", Midfielder));
    assert!(!matches_category("Volante Central", Defender));
    assert!(!matches_category("utilero", Forward));
  }

  #[test]
  fn classify_all_unions_positions() {
    let positions = ["Arquero", "Delantero"];
    assert_eq!(classify_all(&positions), set(&[Goalkeeper, Forward]));
  }

  #[test]
  fn category_parses() {
    assert_eq!("Midfielder".parse::<PositionCategory>().unwrap(), Midfielder);
    assert!("libero".parse::<PositionCategory>().is_err());
  }
}
