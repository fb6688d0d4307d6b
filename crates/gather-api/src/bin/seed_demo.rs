// Seed demo data for local development and demos.
//
// Usage: cargo run --bin seed-demo
//
// Requires DATABASE_URL. Skips seeding when the database already
// contains users, so it is safe to run repeatedly.

use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use gather_api::services::{AdmissionService, ClubService};
use gather_core::{AdmissionOutcome, UserRole};
use gather_storage::password::hash_password;
use gather_storage::{CreateClub, CreateEvent, CreateUser, StorageBackend, UserRow};

const DEMO_PASSWORD: &str = "gather-demo";

/// Generated attendee accounts used to fill events to a realistic level.
const ATTENDEE_POOL_SIZE: usize = 56;

struct NamedUser {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    city: &'static str,
    role: UserRole,
    interests: &'static [&'static str],
}

const NAMED_USERS: &[NamedUser] = &[
    NamedUser {
        email: "admin@gather.dev",
        first_name: "Avery",
        last_name: "Quinn",
        city: "Berlin",
        role: UserRole::Admin,
        interests: &["sustainable", "cultural"],
    },
    NamedUser {
        email: "maya@gather.dev",
        first_name: "Maya",
        last_name: "Lindgren",
        city: "Berlin",
        role: UserRole::ClubManager,
        interests: &["sustainable"],
    },
    NamedUser {
        email: "noah@gather.dev",
        first_name: "Noah",
        last_name: "Becker",
        city: "Hamburg",
        role: UserRole::ClubManager,
        interests: &["cultural", "entertainment"],
    },
    NamedUser {
        email: "lena@gather.dev",
        first_name: "Lena",
        last_name: "Hoffmann",
        city: "Munich",
        role: UserRole::ClubManager,
        interests: &["entertainment"],
    },
    NamedUser {
        email: "omar@gather.dev",
        first_name: "Omar",
        last_name: "Haddad",
        city: "Berlin",
        role: UserRole::User,
        interests: &["sustainable", "entertainment"],
    },
    NamedUser {
        email: "sofia@gather.dev",
        first_name: "Sofia",
        last_name: "Rossi",
        city: "Hamburg",
        role: UserRole::User,
        interests: &["cultural"],
    },
    NamedUser {
        email: "jonas@gather.dev",
        first_name: "Jonas",
        last_name: "Weber",
        city: "Munich",
        role: UserRole::User,
        interests: &["entertainment"],
    },
    NamedUser {
        email: "petra@gather.dev",
        first_name: "Petra",
        last_name: "Novak",
        city: "Berlin",
        role: UserRole::User,
        interests: &["sustainable", "cultural"],
    },
];

struct ClubSeed {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    city: &'static str,
    manager_email: &'static str,
}

const CLUBS: &[ClubSeed] = &[
    ClubSeed {
        name: "Green City Collective",
        description: "Neighbourhood projects around urban gardening, repair cafes and zero-waste living.",
        category: "sustainable",
        city: "Berlin",
        manager_email: "maya@gather.dev",
    },
    ClubSeed {
        name: "Riverbank Cleanup Crew",
        description: "Monthly cleanups along the river followed by coffee and planning the next one.",
        category: "sustainable",
        city: "Hamburg",
        manager_email: "maya@gather.dev",
    },
    ClubSeed {
        name: "Open Stage Collective",
        description: "A welcoming stage for musicians, poets and storytellers of every level.",
        category: "cultural",
        city: "Hamburg",
        manager_email: "noah@gather.dev",
    },
    ClubSeed {
        name: "Museum After Hours",
        description: "Guided evening visits to museums and galleries, with discussion over drinks afterwards.",
        category: "cultural",
        city: "Berlin",
        manager_email: "noah@gather.dev",
    },
    ClubSeed {
        name: "Board Game Nights",
        description: "Weekly tables for strategy games, party games and everything in between.",
        category: "entertainment",
        city: "Munich",
        manager_email: "lena@gather.dev",
    },
    ClubSeed {
        name: "Outdoor Cinema Club",
        description: "Pop-up film screenings in parks and courtyards all summer long.",
        category: "entertainment",
        city: "Berlin",
        manager_email: "lena@gather.dev",
    },
];

struct EventSeed {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    city: &'static str,
    location: &'static str,
    club_index: usize,
    days_out: i64,
    price_cents: i64,
}

const EVENTS: &[EventSeed] = &[
    EventSeed {
        title: "Community Garden Spring Planting",
        description: "Hands-on planting day at the community garden. Tools and seedlings provided, bring gloves if you have them.",
        category: "sustainable",
        city: "Berlin",
        location: "Prinzessinnengarten, Kreuzberg",
        club_index: 0,
        days_out: 5,
        price_cents: 0,
    },
    EventSeed {
        title: "Repair Cafe: Electronics Edition",
        description: "Bring your broken toasters, lamps and headphones. Volunteer fixers will help you repair instead of replace.",
        category: "sustainable",
        city: "Berlin",
        location: "Nachbarschaftshaus Urbanstrasse",
        club_index: 0,
        days_out: 12,
        price_cents: 500,
    },
    EventSeed {
        title: "Riverbank Cleanup and Brunch",
        description: "Two hours of cleanup along the Elbe followed by a shared brunch. Grabbers and bags provided.",
        category: "sustainable",
        city: "Hamburg",
        location: "Elbstrand Oevelgoenne",
        club_index: 1,
        days_out: 8,
        price_cents: 0,
    },
    EventSeed {
        title: "Open Mic: Songs and Stories",
        description: "Five-minute slots for anyone who wants the stage. Sign up at the door, audience members always welcome.",
        category: "cultural",
        city: "Hamburg",
        location: "Kulturhaus Eppendorf",
        club_index: 2,
        days_out: 3,
        price_cents: 800,
    },
    EventSeed {
        title: "Late Night at the Kunsthalle",
        description: "Private evening tour of the new exhibition with the curator, followed by discussion in the cafe.",
        category: "cultural",
        city: "Hamburg",
        location: "Hamburger Kunsthalle",
        club_index: 3,
        days_out: 15,
        price_cents: 1800,
    },
    EventSeed {
        title: "Gallery Walk: Mitte Edition",
        description: "A guided walk through five independent galleries in Mitte with short talks from the gallerists.",
        category: "cultural",
        city: "Berlin",
        location: "Auguststrasse, Mitte",
        club_index: 3,
        days_out: 21,
        price_cents: 0,
    },
    EventSeed {
        title: "Strategy Night: Heavy Euros",
        description: "An evening of longer strategy games. Beginners get a teaching table, veterans get the tournament room.",
        category: "entertainment",
        city: "Munich",
        location: "Spielecafe Glockenbach",
        club_index: 4,
        days_out: 4,
        price_cents: 0,
    },
    EventSeed {
        title: "Party Games Marathon",
        description: "Fast rounds, big tables, loud laughter. We rotate games every thirty minutes so everyone plays everything.",
        category: "entertainment",
        city: "Munich",
        location: "Spielecafe Glockenbach",
        club_index: 4,
        days_out: 18,
        price_cents: 600,
    },
    EventSeed {
        title: "Open Air Cinema: Classics Night",
        description: "A classic on the big inflatable screen at sundown. Blankets and popcorn available, rain date announced on the day.",
        category: "entertainment",
        city: "Berlin",
        location: "Volkspark Friedrichshain",
        club_index: 5,
        days_out: 10,
        price_cents: 1200,
    },
    EventSeed {
        title: "Short Film Evening Under the Stars",
        description: "A curated hour of local short films followed by a Q&A with two of the directors.",
        category: "entertainment",
        city: "Berlin",
        location: "Hof des Kulturzentrums Wedding",
        club_index: 5,
        days_out: 27,
        price_cents: 0,
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("seed_demo=info".parse().unwrap()),
        )
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;
    let storage = StorageBackend::postgres(&database_url)
        .await
        .context("Failed to connect to database")?;
    storage.migrate().await.context("Failed to run migrations")?;
    let storage = Arc::new(storage);

    if storage.count_users().await? > 0 {
        tracing::info!("Database already contains users, skipping seed");
        return Ok(());
    }

    let mut rng = rand::thread_rng();

    // One shared hash for the shared demo password.
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let mut users: Vec<UserRow> = Vec::new();
    for seed in NAMED_USERS {
        let user = storage
            .create_user(CreateUser {
                email: seed.email.to_string(),
                password_hash: password_hash.clone(),
                first_name: seed.first_name.to_string(),
                last_name: seed.last_name.to_string(),
                role: seed.role,
                bio: None,
                city: Some(seed.city.to_string()),
                interests: seed.interests.iter().map(|s| s.to_string()).collect(),
            })
            .await?;
        users.push(user);
    }
    tracing::info!(count = users.len(), "Created named demo users");

    let cities = ["Berlin", "Hamburg", "Munich"];
    for n in 1..=ATTENDEE_POOL_SIZE {
        let city = cities[n % cities.len()];
        let user = storage
            .create_user(CreateUser {
                email: format!("attendee{n:02}@gather.dev"),
                password_hash: password_hash.clone(),
                first_name: "Demo".to_string(),
                last_name: format!("Attendee {n:02}"),
                role: UserRole::User,
                bio: None,
                city: Some(city.to_string()),
                interests: Vec::new(),
            })
            .await?;
        users.push(user);
    }
    tracing::info!(count = ATTENDEE_POOL_SIZE, "Created attendee pool");

    let clubs_service = ClubService::new(storage.clone());
    let mut clubs = Vec::new();
    for seed in CLUBS {
        let manager = users
            .iter()
            .find(|u| u.email == seed.manager_email)
            .context("Club manager missing from seeded users")?;
        let club = clubs_service
            .create(
                CreateClub {
                    name: seed.name.to_string(),
                    description: seed.description.to_string(),
                    city: seed.city.to_string(),
                    category: seed.category.to_string(),
                    manager_id: manager.id,
                    image_url: None,
                },
                UserRole::from(manager.role.as_str()),
            )
            .await?;
        clubs.push(club);
    }
    tracing::info!(count = clubs.len(), "Created clubs");

    // Everyone except the managers joins a few random clubs.
    let mut memberships = 0usize;
    for user in &users {
        if UserRole::from(user.role.as_str()) != UserRole::User {
            continue;
        }
        let joins = rng.gen_range(1..=3);
        for club in clubs.choose_multiple(&mut rng, joins) {
            storage.join_club(user.id, club.id).await?;
            memberships += 1;
        }
    }
    tracing::info!(count = memberships, "Created memberships");

    let admission = AdmissionService::new(storage.clone());
    let mut registrations = 0usize;
    for seed in EVENTS {
        let club = &clubs[seed.club_index];
        let capacity: i32 = rng.gen_range(15..=80);
        let event = storage
            .create_event(CreateEvent {
                title: seed.title.to_string(),
                description: seed.description.to_string(),
                category: seed.category.to_string(),
                starts_at: Utc::now() + Duration::days(seed.days_out),
                location: seed.location.to_string(),
                city: seed.city.to_string(),
                price_cents: seed.price_cents,
                capacity,
                image_url: None,
                creator_id: club.manager_id,
                club_id: Some(club.id),
            })
            .await?;

        // Fill 50 to 80 percent of capacity through the admission path.
        let percent = rng.gen_range(50..=80);
        let target = (capacity as usize * percent / 100).min(users.len());
        let mut admitted = 0usize;
        for user in users.choose_multiple(&mut rng, target) {
            match admission.register(user.id, event.id).await? {
                AdmissionOutcome::Admitted { .. } => admitted += 1,
                AdmissionOutcome::EventFull => break,
                _ => {}
            }
        }
        registrations += admitted;
        tracing::info!(
            title = seed.title,
            capacity,
            admitted,
            "Created event with registrations"
        );
    }

    tracing::info!(
        users = users.len(),
        clubs = clubs.len(),
        events = EVENTS.len(),
        registrations,
        "Seed complete"
    );
    tracing::info!("Demo password for every seeded account: {DEMO_PASSWORD}");
    Ok(())
}
