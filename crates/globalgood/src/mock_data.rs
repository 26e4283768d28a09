use chrono::{Duration, Utc};
use uuid::Uuid;

use globalgood_core::catalog::{to_item, BlogContent, BlogPost, Collection, Product, Review};
use globalgood_core::storage::{DocumentStore, RepositoryError, Tables, WriteCondition};

fn product(
    collection: Collection,
    name: &str,
    description: &str,
    price: f64,
    country_of_origin: &str,
    materials: &[&str],
    availability: u32,
) -> Product {
    Product {
        collection,
        name: name.to_string(),
        description: description.to_string(),
        img: format!("{}.png", name.to_lowercase().replace(' ', "-")),
        price,
        country_of_origin: country_of_origin.to_string(),
        materials: materials.iter().map(|m| m.to_string()).collect(),
        availability,
    }
}

/// Demo catalogue, two products per collection.
pub fn generate_mock_products() -> Vec<Product> {
    vec![
        product(
            Collection::ClothingAccessories,
            "Alpaca Wool Scarf",
            "Hand-loomed by a women's cooperative near Cusco",
            48.0,
            "Peru",
            &["alpaca wool"],
            12,
        ),
        product(
            Collection::ClothingAccessories,
            "Kente Cloth Tote",
            "Strip-woven kente panels on a canvas tote",
            35.0,
            "Ghana",
            &["cotton", "canvas"],
            0,
        ),
        product(
            Collection::HomeLiving,
            "Woven Bolga Basket",
            "Elephant grass market basket with a leather handle",
            45.0,
            "Ghana",
            &["elephant grass", "leather"],
            8,
        ),
        product(
            Collection::HomeLiving,
            "Talavera Serving Bowl",
            "Hand-painted tin-glazed earthenware from Puebla",
            62.0,
            "Mexico",
            &["clay"],
            3,
        ),
        product(
            Collection::BeautyWellness,
            "Raw Shea Butter",
            "Unrefined shea butter pressed by the Tungteiya collective",
            14.0,
            "Ghana",
            &["shea nuts"],
            40,
        ),
        product(
            Collection::BeautyWellness,
            "Argan Oil",
            "Cold-pressed argan oil from a Berber women's cooperative",
            22.5,
            "Morocco",
            &["argan kernels"],
            15,
        ),
        product(
            Collection::FoodBeverages,
            "Single Origin Coffee Beans",
            "Washed Yirgacheffe beans, medium roast",
            18.0,
            "Ethiopia",
            &["arabica coffee"],
            25,
        ),
        product(
            Collection::FoodBeverages,
            "Cacao Nibs",
            "Fermented and sun-dried nacional cacao",
            11.0,
            "Ecuador",
            &["cacao"],
            0,
        ),
    ]
}

/// Demo blog posts featuring two of the demo products.
pub fn generate_mock_blog_posts() -> Vec<BlogPost> {
    let now = Utc::now();
    vec![
        BlogPost {
            theme: "Woven Bolga Basket".to_string(),
            created_at: (now - Duration::days(14)).timestamp_millis(),
            title: "The Weavers of Bolgatanga".to_string(),
            content: BlogContent::Structured {
                introduction: "Every basket starts as a bundle of elephant grass.".to_string(),
                story: "In the Upper East Region weaving is passed from parent to child, \
                        and a single basket takes three days to finish."
                    .to_string(),
                fair_trade_impact: "Fair prices fund school fees for forty families."
                    .to_string(),
            },
            img: "woven-bolga-basket.png".to_string(),
            product_collection: Some(Collection::HomeLiving.to_string()),
            likes: Vec::new(),
            comments: Vec::new(),
        },
        BlogPost {
            theme: "Raw Shea Butter".to_string(),
            created_at: (now - Duration::days(3)).timestamp_millis(),
            title: "From Nut to Balm".to_string(),
            content: BlogContent::Freeform {
                paragraphs: vec![
                    "Shea nuts are gathered by hand at the start of the rainy season.".to_string(),
                    "Crushing, roasting and kneading turn them into butter.".to_string(),
                ],
            },
            img: "raw-shea-butter.png".to_string(),
            product_collection: Some(Collection::BeautyWellness.to_string()),
            likes: Vec::new(),
            comments: Vec::new(),
        },
    ]
}

fn review(
    product_name: &str,
    collection: Collection,
    days_ago: i64,
    username: &str,
    rating: u8,
    title: &str,
    text: &str,
) -> Review {
    Review {
        product_name: product_name.to_string(),
        created_at: (Utc::now() - Duration::days(days_ago)).timestamp_millis(),
        product_collection: collection,
        review_id: Uuid::new_v4(),
        username: username.to_string(),
        rating,
        review_title: title.to_string(),
        review_text: text.to_string(),
    }
}

/// Demo reviews for the demo catalogue.
pub fn generate_mock_reviews() -> Vec<Review> {
    vec![
        review(
            "Woven Bolga Basket",
            Collection::HomeLiving,
            10,
            "amara",
            5,
            "Sturdy and beautiful",
            "Carries a week of groceries without losing its shape.",
        ),
        review(
            "Woven Bolga Basket",
            Collection::HomeLiving,
            4,
            "diego",
            4,
            "Lovely colours",
            "Slightly smaller than I expected but very well made.",
        ),
        review(
            "Raw Shea Butter",
            Collection::BeautyWellness,
            2,
            "amara",
            5,
            "Best for dry skin",
            "Melts right in and lasts all winter.",
        ),
    ]
}

fn serialization(err: serde_json::Error) -> RepositoryError {
    RepositoryError::Serialization(err.to_string())
}

/// Writes the demo products, posts and reviews to `store`.
pub async fn seed(store: &dyn DocumentStore, tables: &Tables) -> Result<(), RepositoryError> {
    for product in generate_mock_products() {
        let item = to_item(&product).map_err(serialization)?;
        store
            .put_item(&tables.products, item, WriteCondition::Always)
            .await?;
    }
    for post in generate_mock_blog_posts() {
        let item = to_item(&post).map_err(serialization)?;
        store
            .put_item(&tables.blog_posts, item, WriteCondition::Always)
            .await?;
    }
    for review in generate_mock_reviews() {
        let item = to_item(&review).map_err(serialization)?;
        store
            .put_item(&tables.reviews, item, WriteCondition::Always)
            .await?;
    }

    tracing::info!("Seeded demo catalogue");
    Ok(())
}
