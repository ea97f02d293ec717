use chrono::{Duration, Local, NaiveTime, Utc};
use dotenvy::dotenv;
use learning_penguin::config::AppConfig;
use learning_penguin::infrastructure::database;
use learning_penguin::models::NewEvent;
use learning_penguin::services::event_service::EventService;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_events=info,learning_penguin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🌱 Seeding sample calendar events...");

    let config = AppConfig::from_env();
    let db = database::setup_database(&config.database_url).await?;
    let service = EventService::new(db.clone());

    let outcome = service.replace_all(sample_events()).await;
    match &outcome {
        Ok(created) => {
            for event in created {
                info!("   - {} ({} → {})", event.title, event.starts_at, event.ends_at);
            }
            info!("✅ Created {} sample events.", created.len());
        }
        Err(e) => error!("❌ Error creating sample events: {}", e),
    }

    database::close_database(db).await;

    outcome?;
    Ok(())
}

fn sample_events() -> Vec<NewEvent> {
    let now = Utc::now();
    let today_at = |hour: u32| {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
        Local::now()
            .date_naive()
            .and_time(time)
            .and_local_timezone(Local)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now)
    };
    let in_days = |days: i64| now + Duration::days(days);

    vec![
        NewEvent {
            title: "Math Study Session".to_string(),
            description: Some("Review calculus and linear algebra".to_string()),
            start: today_at(10),
            end: today_at(12),
            color: Some("#3788d8".to_string()),
            all_day: false,
        },
        NewEvent {
            title: "Programming Workshop".to_string(),
            description: Some("Learn React and Node.js".to_string()),
            start: in_days(1),
            end: in_days(1),
            color: Some("#28a745".to_string()),
            all_day: true,
        },
        NewEvent {
            title: "Group Project Meeting".to_string(),
            description: Some("Discuss project progress and next steps".to_string()),
            start: in_days(2),
            end: in_days(2),
            color: Some("#dc3545".to_string()),
            all_day: true,
        },
        NewEvent {
            title: "Language Practice".to_string(),
            description: Some("Spanish conversation practice".to_string()),
            start: in_days(3),
            end: in_days(3),
            color: Some("#ffc107".to_string()),
            all_day: true,
        },
    ]
}
