//! Match finder: pure ranking over candidate recipes.
//!
//! Candidates arrive pre-filtered by the repository (approved, not
//! deleted, free of excluded ingredients); this module scores them
//! against the parsed query and classifies the outcome. Scoring is a
//! plain count of satisfied attributes, so adding one more satisfied
//! attribute can never lower a recipe's rank.

use sous_core::defaults::MAX_ALTERNATIVES;
use sous_core::{ParsedQuery, Recipe};

/// A candidate recipe with its match score.
#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub recipe: Recipe,
    /// Number of requested attributes this recipe satisfies.
    pub score: u32,
    /// True when every requested attribute is satisfied.
    pub exact: bool,
}

/// Outcome of matching a parsed query against stored recipes.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// A recipe satisfies every requested attribute. Alternatives are the
    /// next-best matches, capped.
    Exact {
        recipe: Recipe,
        alternatives: Vec<Recipe>,
    },
    /// Partial matches only, best first.
    Close { recipes: Vec<Recipe> },
    /// Nothing satisfied even one attribute; the pipeline falls through
    /// to generation.
    None,
}

/// Number of attributes the query actually constrains.
pub fn requested_attributes(query: &ParsedQuery) -> u32 {
    let mut n = 0;
    n += query.cuisine.is_some() as u32;
    n += query.dietary_restriction.is_some() as u32;
    n += query.ingredients.len() as u32;
    n += query.max_total_minutes.is_some() as u32;
    n += query.servings.is_some() as u32;
    n += query.max_calories.is_some() as u32;
    n += query.difficulty.is_some() as u32;
    n
}

/// Number of requested attributes `recipe` satisfies.
pub fn score(query: &ParsedQuery, recipe: &Recipe) -> u32 {
    let mut s = 0;

    if let Some(cuisine) = &query.cuisine {
        if recipe.cuisines.iter().any(|c| c.eq_ignore_ascii_case(cuisine)) {
            s += 1;
        }
    }
    if let Some(diet) = &query.dietary_restriction {
        if recipe.diets.iter().any(|d| d.eq_ignore_ascii_case(diet)) {
            s += 1;
        }
    }
    for ingredient in &query.ingredients {
        if recipe.contains_ingredient(ingredient) {
            s += 1;
        }
    }
    // Caps compare in i64 so a u32 from the parser never truncates.
    if let Some(max) = query.max_total_minutes {
        if i64::from(recipe.total_minutes()) <= i64::from(max) {
            s += 1;
        }
    }
    if let Some(servings) = query.servings {
        if i64::from(recipe.servings) == i64::from(servings) {
            s += 1;
        }
    }
    if let Some(max) = query.max_calories {
        if recipe
            .nutritional_info
            .as_ref()
            .map(|n| i64::from(n.calories) <= i64::from(max))
            .unwrap_or(false)
        {
            s += 1;
        }
    }
    if let Some(difficulty) = query.difficulty {
        if recipe.difficulty == difficulty {
            s += 1;
        }
    }

    s
}

/// Rank candidates by score, best first. Zero-score candidates and any
/// recipe that still contains an excluded ingredient are dropped. Ties
/// break by creation time, newest first.
pub fn rank_candidates(query: &ParsedQuery, candidates: Vec<Recipe>) -> Vec<RankedMatch> {
    let total = requested_attributes(query);
    let mut ranked: Vec<RankedMatch> = candidates
        .into_iter()
        .filter(|r| !query.exclusions.iter().any(|e| r.contains_ingredient(e)))
        .filter_map(|recipe| {
            let s = score(query, &recipe);
            (s > 0).then(|| RankedMatch {
                exact: s == total,
                score: s,
                recipe,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.recipe.created_at.cmp(&a.recipe.created_at))
    });
    ranked
}

/// Classify the match outcome for a parsed query.
pub fn find_matches(query: &ParsedQuery, candidates: Vec<Recipe>) -> MatchOutcome {
    if query.is_unconstrained() {
        return MatchOutcome::None;
    }

    let mut ranked = rank_candidates(query, candidates).into_iter();
    match ranked.next() {
        Some(best) if best.exact => MatchOutcome::Exact {
            recipe: best.recipe,
            alternatives: ranked
                .take(MAX_ALTERNATIVES)
                .map(|m| m.recipe)
                .collect(),
        },
        Some(best) => {
            let mut recipes = vec![best.recipe];
            recipes.extend(ranked.map(|m| m.recipe));
            MatchOutcome::Close { recipes }
        }
        None => MatchOutcome::None,
    }
}
