//! Recipe repository implementation.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use sous_core::{
    CreateRecipeRequest, Difficulty, Error, ListRecipesRequest, ListRecipesResponse, ParsedQuery,
    Recipe, RecipeRepository, RecipeSummary, Result, SimilarRecipe, UpdateRecipeRequest,
};

/// PostgreSQL implementation of RecipeRepository.
///
/// Recipes live in a single `recipe` table: ingredient lines and steps as
/// JSONB, the attribute sets as text arrays, and the embedding in a
/// pgvector column sized to `vector_dimension`.
pub struct PgRecipeRepository {
    pool: Pool<Postgres>,
    vector_dimension: usize,
}

impl PgRecipeRepository {
    /// Create a new PgRecipeRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self::with_dimension(pool, sous_core::defaults::EMBEDDING_DIMENSION)
    }

    /// Create a repository expecting a custom vector column dimension.
    pub fn with_dimension(pool: Pool<Postgres>, vector_dimension: usize) -> Self {
        Self {
            pool,
            vector_dimension,
        }
    }

    /// The vector column dimension this repository enforces.
    pub fn vector_dimension(&self) -> usize {
        self.vector_dimension
    }

    fn row_to_recipe(row: &PgRow) -> Result<Recipe> {
        let ingredients: serde_json::Value = row.get("ingredients");
        let steps: serde_json::Value = row.get("steps");
        let nutritional_info: Option<serde_json::Value> = row.get("nutritional_info");
        let difficulty: String = row.get("difficulty");

        Ok(Recipe {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            ingredients: serde_json::from_value(ingredients)?,
            steps: serde_json::from_value(steps)?,
            nutritional_info: nutritional_info
                .map(serde_json::from_value)
                .transpose()?,
            allergy_disclaimer: row.get("allergy_disclaimer"),
            cuisines: row.get("cuisines"),
            diets: row.get("diets"),
            appliances: row.get("appliances"),
            tags: row.get("tags"),
            images: row.get("images"),
            difficulty: Difficulty::parse(&difficulty).unwrap_or_default(),
            prep_time_minutes: row.get("prep_time_minutes"),
            cook_time_minutes: row.get("cook_time_minutes"),
            servings: row.get("servings"),
            approved: row.get("approved"),
            embedding: row.get("embedding"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    const RECIPE_COLUMNS: &'static str = "id, title, description, ingredients, steps, \
         nutritional_info, allergy_disclaimer, cuisines, diets, appliances, tags, images, \
         difficulty, prep_time_minutes, cook_time_minutes, servings, approved, embedding, \
         created_at, updated_at";
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn insert(&self, req: CreateRecipeRequest) -> Result<Uuid> {
        let id = Uuid::now_v7();
        let ingredients = serde_json::to_value(&req.ingredients)?;
        let steps = serde_json::to_value(&req.steps)?;
        let nutritional_info = req
            .nutritional_info
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            "INSERT INTO recipe (id, title, description, ingredients, steps, nutritional_info, \
             allergy_disclaimer, cuisines, diets, appliances, tags, images, difficulty, \
             prep_time_minutes, cook_time_minutes, servings, approved, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             now(), now())",
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(ingredients)
        .bind(steps)
        .bind(nutritional_info)
        .bind(&req.allergy_disclaimer)
        .bind(&req.cuisines)
        .bind(&req.diets)
        .bind(&req.appliances)
        .bind(&req.tags)
        .bind(&req.images)
        .bind(req.difficulty.as_str())
        .bind(req.prep_time_minutes)
        .bind(req.cook_time_minutes)
        .bind(req.servings)
        .bind(req.approved)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "recipes",
            op = "insert",
            recipe_id = %id,
            "Recipe inserted"
        );
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Recipe> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM recipe WHERE id = $1 AND deleted_at IS NULL",
            Self::RECIPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::RecipeNotFound(id))?;

        Self::row_to_recipe(&row)
    }

    async fn list(&self, req: ListRecipesRequest) -> Result<ListRecipesResponse> {
        let limit = req.limit.unwrap_or(sous_core::defaults::LIST_LIMIT);
        let offset = req.offset.unwrap_or(0);
        let approved_clause = if req.approved_only {
            "AND approved = true"
        } else {
            ""
        };

        let rows = sqlx::query(&format!(
            "SELECT id, title, difficulty, prep_time_minutes, cook_time_minutes, servings, \
             approved, created_at \
             FROM recipe WHERE deleted_at IS NULL {} \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            approved_clause
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM recipe WHERE deleted_at IS NULL {}",
            approved_clause
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let recipes = rows
            .into_iter()
            .map(|row| {
                let difficulty: String = row.get("difficulty");
                RecipeSummary {
                    id: row.get("id"),
                    title: row.get("title"),
                    difficulty: Difficulty::parse(&difficulty).unwrap_or_default(),
                    prep_time_minutes: row.get("prep_time_minutes"),
                    cook_time_minutes: row.get("cook_time_minutes"),
                    servings: row.get("servings"),
                    approved: row.get("approved"),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok(ListRecipesResponse { recipes, total })
    }

    async fn update(&self, id: Uuid, req: UpdateRecipeRequest) -> Result<()> {
        // Read-modify-write keeps the partial-update logic in one place
        // instead of a dynamic SET builder.
        let mut recipe = self.fetch(id).await?;

        if let Some(title) = req.title {
            recipe.title = title;
        }
        if let Some(description) = req.description {
            recipe.description = description;
        }
        if let Some(ingredients) = req.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(steps) = req.steps {
            recipe.steps = steps;
        }
        if let Some(info) = req.nutritional_info {
            recipe.nutritional_info = Some(info);
        }
        if let Some(disclaimer) = req.allergy_disclaimer {
            recipe.allergy_disclaimer = Some(disclaimer);
        }
        if let Some(cuisines) = req.cuisines {
            recipe.cuisines = cuisines;
        }
        if let Some(diets) = req.diets {
            recipe.diets = diets;
        }
        if let Some(appliances) = req.appliances {
            recipe.appliances = appliances;
        }
        if let Some(tags) = req.tags {
            recipe.tags = tags;
        }
        if let Some(images) = req.images {
            recipe.images = images;
        }
        if let Some(difficulty) = req.difficulty {
            recipe.difficulty = difficulty;
        }
        if let Some(v) = req.prep_time_minutes {
            recipe.prep_time_minutes = v;
        }
        if let Some(v) = req.cook_time_minutes {
            recipe.cook_time_minutes = v;
        }
        if let Some(v) = req.servings {
            recipe.servings = v;
        }
        if let Some(v) = req.approved {
            recipe.approved = v;
        }

        let ingredients = serde_json::to_value(&recipe.ingredients)?;
        let steps = serde_json::to_value(&recipe.steps)?;
        let nutritional_info = recipe
            .nutritional_info
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            "UPDATE recipe SET title = $2, description = $3, ingredients = $4, steps = $5, \
             nutritional_info = $6, allergy_disclaimer = $7, cuisines = $8, diets = $9, \
             appliances = $10, tags = $11, images = $12, difficulty = $13, \
             prep_time_minutes = $14, cook_time_minutes = $15, servings = $16, \
             approved = $17, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(ingredients)
        .bind(steps)
        .bind(nutritional_info)
        .bind(&recipe.allergy_disclaimer)
        .bind(&recipe.cuisines)
        .bind(&recipe.diets)
        .bind(&recipe.appliances)
        .bind(&recipe.tags)
        .bind(&recipe.images)
        .bind(recipe.difficulty.as_str())
        .bind(recipe.prep_time_minutes)
        .bind(recipe.cook_time_minutes)
        .bind(recipe.servings)
        .bind(recipe.approved)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE recipe SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::RecipeNotFound(id));
        }
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM recipe WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(exists)
    }

    #[instrument(skip(self, query), fields(subsystem = "db", component = "recipes", op = "fetch_candidates"))]
    async fn fetch_candidates(&self, query: &ParsedQuery, limit: i64) -> Result<Vec<Recipe>> {
        // Exclusions are filtered here; attribute ranking happens in the
        // caller over the returned candidates.
        let exclusions: Vec<String> = query.exclusions.iter().map(|e| e.to_lowercase()).collect();

        let rows = sqlx::query(&format!(
            "SELECT {} FROM recipe r \
             WHERE r.approved = true AND r.deleted_at IS NULL \
             AND NOT EXISTS ( \
                 SELECT 1 \
                 FROM jsonb_array_elements(r.ingredients) elem, \
                      unnest($1::text[]) excl \
                 WHERE lower(elem->>'name') LIKE '%' || excl || '%' \
             ) \
             ORDER BY r.created_at DESC \
             LIMIT $2",
            Self::RECIPE_COLUMNS
        ))
        .bind(&exclusions)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let candidates: Result<Vec<Recipe>> = rows.iter().map(Self::row_to_recipe).collect();
        let candidates = candidates?;

        debug!(result_count = candidates.len(), "Fetched match candidates");
        Ok(candidates)
    }

    async fn store_embedding(&self, id: Uuid, vector: &Vector, model: &str) -> Result<()> {
        let dim = vector.as_slice().len();
        if dim != self.vector_dimension {
            return Err(Error::InvalidInput(format!(
                "embedding dimension {} does not match vector column dimension {}",
                dim, self.vector_dimension
            )));
        }

        let result = sqlx::query(
            "UPDATE recipe SET embedding = $2, embedding_model = $3, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(vector)
        .bind(model)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::RecipeNotFound(id));
        }
        Ok(())
    }

    async fn find_similar(&self, query_vec: &Vector, limit: i64) -> Result<Vec<SimilarRecipe>> {
        let rows = sqlx::query(
            "SELECT id, title, 1.0 - (embedding <=> $1::vector) AS score \
             FROM recipe \
             WHERE embedding IS NOT NULL AND approved = true AND deleted_at IS NULL \
             ORDER BY embedding <=> $1::vector \
             LIMIT $2",
        )
        .bind(query_vec)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let results = rows
            .into_iter()
            .map(|row| SimilarRecipe {
                recipe_id: row.get("id"),
                title: row.get("title"),
                score: row.get::<f64, _>("score") as f32,
            })
            .collect();

        Ok(results)
    }
}
