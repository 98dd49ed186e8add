use std::collections::HashMap;

use axum::{Extension, Json, extract::State};
use uuid::Uuid;

use tabdeel_ledger::{LedgerError, items};
use tabdeel_types::api::{
    Claims, ItemFilter, RecommendedItemResponse, SuggestListingRequest, SuggestListingResponse,
};
use tabdeel_types::models::Item;

use crate::auth::AppState;
use crate::error::{ApiError, blocking};

/// The "Recommended For You" feed. The oracle sees the caller's profile,
/// their own active listings, and everyone else's; its answer is an
/// unordered (id, label) set that gets merged back onto the item data here.
/// Ids the oracle invented are dropped.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<RecommendedItemResponse>>, ApiError> {
    let db = state.clone();
    let (profile, user_items, candidates) = blocking(move || {
        let profile = db
            .db
            .get_user(claims.sub)?
            .ok_or(LedgerError::NotFound("user"))?;
        let all_active = items::list_active(&db.db, &ItemFilter::default())?;
        let (user_items, candidates): (Vec<Item>, Vec<Item>) = all_active
            .into_iter()
            .partition(|item| item.owner_id == claims.sub);
        Ok((profile, user_items, candidates))
    })
    .await?;

    let picks = state
        .recommender
        .recommend_items(&profile, &user_items, &candidates)
        .await?;

    let mut by_id: HashMap<Uuid, Item> =
        candidates.into_iter().map(|item| (item.id, item)).collect();

    let response = picks
        .into_iter()
        .filter_map(|pick| {
            by_id.remove(&pick.item_id).map(|item| RecommendedItemResponse {
                item,
                match_strength: pick.match_strength,
            })
        })
        .collect();

    Ok(Json(response))
}

/// Listing-form helper: category, polished description, desired category.
pub async fn suggest_listing(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<SuggestListingRequest>,
) -> Result<Json<SuggestListingResponse>, ApiError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(LedgerError::Validation("title is required".into()).into());
    }

    let suggestion = state
        .recommender
        .suggest_listing(title, req.description.as_deref())
        .await?;
    Ok(Json(suggestion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tabdeel_db::Database;
    use tabdeel_recommend::{Recommendation, StaticRecommender};
    use tabdeel_types::api::CreateItemRequest;
    use tabdeel_types::models::{Condition, User};

    use crate::notify::Notifier;

    fn state_with(db: Database, recommender: StaticRecommender) -> AppState {
        Arc::new(crate::auth::AppStateInner {
            db,
            jwt_secret: "test-secret".to_string(),
            notifier: Notifier::new(),
            recommender: Arc::new(recommender),
        })
    }

    fn register(db: &Database, username: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            name: format!("{username} full"),
            city: "Karachi".to_string(),
            avatar_url: None,
            preferred_categories: vec![],
            created_at: chrono::Utc::now(),
        };
        db.insert_user(&user, "hash").unwrap();
        user
    }

    fn claims(user: &User) -> Claims {
        Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: usize::MAX,
        }
    }

    fn list(db: &Database, owner: &User, title: &str) -> Item {
        items::create_item(
            db,
            owner.id,
            CreateItemRequest {
                title: title.to_string(),
                description: "Solid piece in good shape, ready to trade.".to_string(),
                images: vec![],
                category: "Books".to_string(),
                condition: Condition::Good,
                city: owner.city.clone(),
                desired_keywords: "anything".to_string(),
                desired_categories: vec![],
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn oracle_picks_are_merged_onto_item_data() {
        let db = Database::open_in_memory().unwrap();
        let me = register(&db, "ahmed");
        let other = register(&db, "zainab");
        let mine = list(&db, &me, "Cricket bat");
        let theirs = list(&db, &other, "Guitar");

        // Oracle answers with one real candidate, one invented id, and the
        // caller's own item, which was never a candidate to begin with.
        let recommender = StaticRecommender::with_recommendations(vec![
            Recommendation {
                item_id: theirs.id,
                match_strength: "Good match".to_string(),
            },
            Recommendation {
                item_id: Uuid::new_v4(),
                match_strength: "Nearby".to_string(),
            },
            Recommendation {
                item_id: mine.id,
                match_strength: "Mutual interest".to_string(),
            },
        ]);
        let state = state_with(db, recommender);

        let Json(recs) = get_recommendations(State(state.clone()), Extension(claims(&me)))
            .await
            .unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item.id, theirs.id);
        assert_eq!(recs[0].match_strength, "Good match");
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let user = register(&db, "ahmed");
        let state = state_with(db, StaticRecommender::default());

        let err = suggest_listing(
            State(state),
            Extension(claims(&user)),
            Json(SuggestListingRequest {
                title: "   ".to_string(),
                description: None,
            }),
        )
        .await;
        assert!(matches!(
            err,
            Err(ApiError::Ledger(LedgerError::Validation(_)))
        ));
    }
}
