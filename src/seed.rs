//! Demo-data seeding for first-time deployments.
//!
//! Inserts a handful of accounts and listings so a fresh install has
//! something to browse. Refuses to touch a database that already has users.

use anyhow::Result;
use tracing::info;

use crate::auth;
use crate::config::AuthConfig;
use crate::db::{IdentityWrite, ListingFields, NewUser, Store};

const DEMO_PASSWORD: &str = "demo123";

struct DemoUser {
    username: &'static str,
    email: &'static str,
    school: &'static str,
    phone: &'static str,
}

struct DemoListing {
    title: &'static str,
    description: &'static str,
    price: i64,
    category: &'static str,
    condition: &'static str,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        username: "ming",
        email: "ming@student.edu",
        school: "National Taiwan University",
        phone: "0912345678",
    },
    DemoUser {
        username: "hua",
        email: "hua@student.edu",
        school: "Tsing Hua University",
        phone: "0923456789",
    },
    DemoUser {
        username: "mei",
        email: "mei@student.edu",
        school: "Chiao Tung University",
        phone: "0934567890",
    },
    DemoUser {
        username: "jie",
        email: "jie@student.edu",
        school: "Cheng Kung University",
        phone: "0945678901",
    },
    DemoUser {
        username: "ling",
        email: "ling@student.edu",
        school: "Chengchi University",
        phone: "0956789012",
    },
];

const DEMO_LISTINGS: &[DemoListing] = &[
    DemoListing {
        title: "Calculus Textbook (3rd edition)",
        description: "Nearly new, highlights in the first few chapters only. Solutions booklet included.",
        price: 350,
        category: "textbooks",
        condition: "like-new",
    },
    DemoListing {
        title: "General Chemistry",
        description: "First-year assigned text, no torn pages, full lab appendix.",
        price: 400,
        category: "textbooks",
        condition: "good",
    },
    DemoListing {
        title: "Principles of Economics (2 volumes)",
        description: "Sold as a pair. Some margin notes but fully readable.",
        price: 600,
        category: "textbooks",
        condition: "good",
    },
    DemoListing {
        title: "AirPods Pro 2",
        description: "Three months of use, complete box and accessories, still under warranty.",
        price: 5800,
        category: "electronics",
        condition: "like-new",
    },
    DemoListing {
        title: "Kindle Paperwhite 8GB",
        description: "Waterproof model, easy on the eyes, weeks of battery per charge.",
        price: 3200,
        category: "electronics",
        condition: "like-new",
    },
    DemoListing {
        title: "Mechanical keyboard, blue switches",
        description: "Great typing feel, RGB backlight, no keycap wear.",
        price: 1800,
        category: "electronics",
        condition: "good",
    },
    DemoListing {
        title: "LAMY fountain pen gift set",
        description: "Classic model with ink and case, barely used.",
        price: 1200,
        category: "stationery",
        condition: "like-new",
    },
    DemoListing {
        title: "A4 file organizer box",
        description: "Clear drawer style, holds twenty folders, no damage.",
        price: 400,
        category: "stationery",
        condition: "good",
    },
    DemoListing {
        title: "Electric kettle, stainless steel",
        description: "1.8L, fast boil, auto power-off. Dorm essential.",
        price: 400,
        category: "household",
        condition: "good",
    },
    DemoListing {
        title: "LED desk lamp",
        description: "Adjustable brightness and color temperature, USB powered, clamp mount.",
        price: 600,
        category: "household",
        condition: "like-new",
    },
    DemoListing {
        title: "Yoga mat, 10mm",
        description: "Thick NBR mat with strap and carry bag.",
        price: 500,
        category: "sports",
        condition: "like-new",
    },
    DemoListing {
        title: "Board game: Werewolf deluxe",
        description: "8-18 players, complete components, party favorite.",
        price: 600,
        category: "other",
        condition: "like-new",
    },
];

/// Seed demo users and listings. Returns the number of each inserted;
/// `(0, 0)` means the database already had data and was left alone.
pub async fn seed_demo_data(store: &Store, auth_config: &AuthConfig) -> Result<(usize, usize)> {
    if store.user_count().await? > 0 {
        info!("Database already has users; skipping seed");
        return Ok((0, 0));
    }

    let config = auth_config.clone();
    let password_hash =
        tokio::task::spawn_blocking(move || auth::hash_password(DEMO_PASSWORD, Some(&config)))
            .await??;

    let mut user_ids = Vec::with_capacity(DEMO_USERS.len());
    for demo in DEMO_USERS {
        let outcome = store
            .create_user(NewUser {
                username: demo.username.to_string(),
                email: demo.email.to_string(),
                password_hash: password_hash.clone(),
                school: Some(demo.school.to_string()),
                phone: Some(demo.phone.to_string()),
            })
            .await?;

        match outcome {
            IdentityWrite::Ok(user) => user_ids.push(user.id),
            IdentityWrite::Conflict => anyhow::bail!("Seed user collided with existing data"),
        }
    }

    for (i, demo) in DEMO_LISTINGS.iter().enumerate() {
        let seller_id = user_ids[i % user_ids.len()];
        store
            .insert_listing(
                seller_id,
                ListingFields {
                    title: demo.title.to_string(),
                    description: demo.description.to_string(),
                    price: demo.price,
                    category: demo.category.to_string(),
                    condition: demo.condition.to_string(),
                    image: None,
                },
            )
            .await?;
    }

    info!(
        "Seeded {} users and {} listings (demo password: {})",
        DEMO_USERS.len(),
        DEMO_LISTINGS.len(),
        DEMO_PASSWORD
    );

    Ok((DEMO_USERS.len(), DEMO_LISTINGS.len()))
}
