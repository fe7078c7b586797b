use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::{read_records, write_records, SharedStore};

pub const COLLECTION: &str = "onboarding";

const BASE_PRICE: f64 = 30.0;
const PRICE_PER_KG: f64 = 2.0;
const DAILY_GRAMS_PER_KG: f64 = 20.0;
const CONTENTS_PER_PLAN: usize = 5;

const FOOD_CONTENTS: [&str; 20] = [
    "Free-Range Kangaroo",
    "Wild-Caught Salmon",
    "Grass-Fed New Zealand Lamb",
    "Free-Range Duck",
    "Organic Turkey",
    "Australian Sweet Potato",
    "Tasmanian Kelp",
    "Ancient Grains Blend",
    "Green-Lipped Mussels",
    "Organic Pumpkin",
    "Fresh Blueberries",
    "Chia Seeds",
    "Coconut Oil",
    "Turmeric Root",
    "Bone Broth",
    "Organic Kale",
    "Free-Range Eggs",
    "Quinoa",
    "Raw Honey",
    "Probiotic Goat's Milk",
];

const BENEFITS: [&str; 7] = [
    "Personalized portions for your dog's size",
    "Human-grade, exotic ingredients",
    "Vet-approved recipe with superfoods",
    "Free delivery to your door",
    "Ethically sourced proteins",
    "Rich in natural omega-3s",
    "No artificial preservatives",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogProfile {
    pub name: String,
    pub age: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecommendation {
    pub daily_portion_grams: f64,
    pub monthly_amount: f64,
    pub price_per_month: f64,
    pub contents: Vec<String>,
    pub benefits: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// A priced recommendation keyed by id; consumed once when a subscription is
/// materialized from it, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingEntry {
    pub id: Uuid,
    pub dog_profile: DogProfile,
    pub recommendation: MealRecommendation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub id: Uuid,
    pub daily_portion_grams: f64,
    pub monthly_amount: f64,
    pub price_per_month: f64,
    pub contents: Vec<String>,
    pub benefits: Vec<String>,
}

#[derive(Clone)]
pub struct OnboardingService {
    store: SharedStore,
}

impl OnboardingService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Weight-based linear pricing and portioning: 20g of food per kg of dog
    /// per day, $30 base plus $2 per kg per month. Five ingredients are drawn
    /// at random from the fixed list for variety.
    pub async fn calculate_meal_plan(&self, profile: DogProfile) -> AppResult<MealPlanResponse> {
        validate_profile(&profile)?;

        let daily_portion_grams = profile.weight * DAILY_GRAMS_PER_KG;
        let monthly_amount = daily_portion_grams * 30.0;
        let price_per_month = round_cents(BASE_PRICE + profile.weight * PRICE_PER_KG);

        let mut pool = FOOD_CONTENTS.to_vec();
        pool.shuffle(&mut rand::thread_rng());
        let contents: Vec<String> = pool
            .into_iter()
            .take(CONTENTS_PER_PLAN)
            .map(str::to_string)
            .collect();

        let entry = OnboardingEntry {
            id: Uuid::new_v4(),
            dog_profile: profile,
            recommendation: MealRecommendation {
                daily_portion_grams,
                monthly_amount,
                price_per_month,
                contents,
                benefits: BENEFITS.iter().map(|benefit| benefit.to_string()).collect(),
                timestamp: Utc::now(),
            },
        };

        let mut entries: Vec<OnboardingEntry> =
            read_records(self.store.as_ref(), COLLECTION).await?;
        entries.push(entry.clone());
        write_records(self.store.as_ref(), COLLECTION, &entries).await?;

        Ok(MealPlanResponse {
            id: entry.id,
            daily_portion_grams: entry.recommendation.daily_portion_grams,
            monthly_amount: entry.recommendation.monthly_amount,
            price_per_month: entry.recommendation.price_per_month,
            contents: entry.recommendation.contents,
            benefits: entry.recommendation.benefits,
        })
    }

    pub async fn find_entry(&self, id: Uuid) -> AppResult<Option<OnboardingEntry>> {
        let entries: Vec<OnboardingEntry> = read_records(self.store.as_ref(), COLLECTION).await?;
        Ok(entries.into_iter().find(|entry| entry.id == id))
    }
}

fn validate_profile(profile: &DogProfile) -> AppResult<()> {
    if profile.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name required".into()));
    }
    if !(0.0..=30.0).contains(&profile.age) {
        return Err(AppError::BadRequest("Age must be between 0 and 30".into()));
    }
    if !(1.0..=100.0).contains(&profile.weight) {
        return Err(AppError::BadRequest(
            "Weight must be between 1 and 100 kg".into(),
        ));
    }
    Ok(())
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub async fn calculate_meal_plan(
    Extension(store): Extension<SharedStore>,
    Json(profile): Json<DogProfile>,
) -> AppResult<Json<MealPlanResponse>> {
    let plan = OnboardingService::new(store)
        .calculate_meal_plan(profile)
        .await?;
    Ok(Json(plan))
}
