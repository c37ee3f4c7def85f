//! Rule-based query parser.
//!
//! Turns a freeform request like "I want a Mexican vegan dish with
//! tomatoes and without onions" into a [`ParsedQuery`]. Recognition is a
//! fixed keyword vocabulary with exact, case-insensitive matching; no
//! stemming, no fuzzy matching, deliberately not an NLP model.

use sous_core::defaults::{CUISINES, DIETS, STOP_WORDS};
use sous_core::{Difficulty, Error, ParsedQuery, Result};

/// Tokens that switch subsequent ingredients into the exclusion list.
const EXCLUSION_MARKERS: &[&str] = &["without", "no", "except"];

/// Tokens that switch back to the inclusion list.
const INCLUSION_MARKERS: &[&str] = &["with", "including", "plus"];

/// Measurement words consumed by the numeric-filter rules.
const MEASURE_WORDS: &[&str] = &[
    "minutes", "minute", "min", "mins", "calories", "calorie", "kcal", "serves", "servings",
    "people", "under", "within", "below", "less", "than", "max", "maximum",
];

/// Parse a freeform recipe request into structured attributes.
///
/// Fails with [`Error::EmptyQuery`] when the trimmed input is empty.
pub fn parse(raw: &str) -> Result<ParsedQuery> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyQuery);
    }

    let tokens = tokenize(trimmed);
    let mut parsed = ParsedQuery::default();
    let mut excluding = false;

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();

        if EXCLUSION_MARKERS.contains(&token) {
            excluding = true;
            i += 1;
            continue;
        }
        if INCLUSION_MARKERS.contains(&token) {
            excluding = false;
            i += 1;
            continue;
        }

        // Vocabulary keywords never fall through to the ingredient
        // lists; the first occurrence wins, later ones are dropped.
        if CUISINES.contains(&token) {
            parsed.cuisine.get_or_insert_with(|| token.to_string());
            i += 1;
            continue;
        }
        if DIETS.contains(&token) {
            parsed
                .dietary_restriction
                .get_or_insert_with(|| token.to_string());
            i += 1;
            continue;
        }
        if let Some(difficulty) = Difficulty::parse(token) {
            parsed.difficulty.get_or_insert(difficulty);
            i += 1;
            continue;
        }

        if let Ok(n) = token.parse::<u32>() {
            let consumed = apply_numeric(&mut parsed, n, &tokens, i);
            i += consumed;
            continue;
        }

        // "serves" reads the following number directly.
        if (token == "serves" || token == "for") && i + 1 < tokens.len() {
            if let Ok(n) = tokens[i + 1].parse::<u32>() {
                parsed.servings = Some(n);
                // Skip a trailing "people"/"servings" if present.
                let extra = tokens
                    .get(i + 2)
                    .map(|t| t == "people" || t == "servings")
                    .unwrap_or(false);
                i += if extra { 3 } else { 2 };
                continue;
            }
        }

        if STOP_WORDS.contains(&token) || MEASURE_WORDS.contains(&token) {
            i += 1;
            continue;
        }

        let target = if excluding {
            &mut parsed.exclusions
        } else {
            &mut parsed.ingredients
        };
        if !target.contains(&token.to_string()) {
            target.push(token.to_string());
        }
        i += 1;
    }

    Ok(parsed)
}

/// Lowercase word tokens. Hyphens survive so "gluten-free" stays one token.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Attach a bare number to a numeric filter based on the following token.
/// Returns how many tokens were consumed.
fn apply_numeric(parsed: &mut ParsedQuery, n: u32, tokens: &[String], i: usize) -> usize {
    match tokens.get(i + 1).map(String::as_str) {
        Some("minutes") | Some("minute") | Some("min") | Some("mins") => {
            parsed.max_total_minutes = Some(n);
            2
        }
        Some("calories") | Some("calorie") | Some("kcal") => {
            parsed.max_calories = Some(n);
            2
        }
        Some("people") | Some("servings") => {
            parsed.servings = Some(n);
            2
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_fails() {
        assert!(matches!(parse(""), Err(Error::EmptyQuery)));
        assert!(matches!(parse("   \t\n "), Err(Error::EmptyQuery)));
    }

    #[test]
    fn test_mexican_vegan_with_tomatoes_without_onions() {
        let parsed = parse("I want a Mexican vegan dish with tomatoes and without onions").unwrap();
        assert_eq!(parsed.cuisine.as_deref(), Some("mexican"));
        assert_eq!(parsed.dietary_restriction.as_deref(), Some("vegan"));
        assert_eq!(parsed.ingredients, vec!["tomatoes"]);
        assert_eq!(parsed.exclusions, vec!["onions"]);
    }

    #[test]
    fn test_cuisine_keyword_is_lowercased() {
        for raw in ["ITALIAN pasta", "Italian pasta", "italian pasta"] {
            let parsed = parse(raw).unwrap();
            assert_eq!(parsed.cuisine.as_deref(), Some("italian"));
        }
    }

    #[test]
    fn test_no_marker_routes_to_exclusions() {
        let parsed = parse("a curry no peanuts").unwrap();
        assert_eq!(parsed.exclusions, vec!["peanuts"]);
        assert!(!parsed.ingredients.contains(&"peanuts".to_string()));
    }

    #[test]
    fn test_exclusion_persists_across_and() {
        let parsed = parse("soup without onions and garlic").unwrap();
        assert_eq!(parsed.exclusions, vec!["onions", "garlic"]);
    }

    #[test]
    fn test_with_resets_exclusion_mode() {
        let parsed = parse("pasta without mushrooms with basil").unwrap();
        assert_eq!(parsed.exclusions, vec!["mushrooms"]);
        assert_eq!(parsed.ingredients, vec!["pasta", "basil"]);
    }

    #[test]
    fn test_minutes_filter() {
        let parsed = parse("thai noodles in 30 minutes").unwrap();
        assert_eq!(parsed.max_total_minutes, Some(30));
        assert!(!parsed.ingredients.contains(&"30".to_string()));
    }

    #[test]
    fn test_serves_filter() {
        let parsed = parse("lasagna that serves 6").unwrap();
        assert_eq!(parsed.servings, Some(6));
    }

    #[test]
    fn test_for_n_people_filter() {
        let parsed = parse("a stew for 4 people").unwrap();
        assert_eq!(parsed.servings, Some(4));
    }

    #[test]
    fn test_calories_filter() {
        let parsed = parse("salad under 500 calories").unwrap();
        assert_eq!(parsed.max_calories, Some(500));
    }

    #[test]
    fn test_difficulty_keyword() {
        let parsed = parse("an easy japanese dinner").unwrap();
        assert_eq!(parsed.difficulty, Some(Difficulty::Easy));
        assert_eq!(parsed.cuisine.as_deref(), Some("japanese"));
    }

    #[test]
    fn test_hyphenated_diet_survives_tokenization() {
        let parsed = parse("a gluten-free breakfast").unwrap();
        assert_eq!(parsed.dietary_restriction.as_deref(), Some("gluten-free"));
    }

    #[test]
    fn test_ingredients_are_deduplicated() {
        let parsed = parse("chicken with chicken and rice").unwrap();
        assert_eq!(parsed.ingredients, vec!["chicken", "rice"]);
    }

    #[test]
    fn test_stop_words_are_not_ingredients() {
        let parsed = parse("I would like to make some food").unwrap();
        assert!(parsed.ingredients.is_empty());
        assert!(parsed.is_unconstrained());
    }

    #[test]
    fn test_first_cuisine_wins() {
        let parsed = parse("mexican or italian tacos").unwrap();
        assert_eq!(parsed.cuisine.as_deref(), Some("mexican"));
        // The second cuisine keyword is not treated as an ingredient.
        assert_eq!(parsed.ingredients, vec!["tacos"]);
    }
}
