#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, commands::ExpenseCmd, events::EventSender};
use migration::MigratorTrait;

pub const USERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

async fn migrated_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn register_all(engine: &Engine) {
    for name in USERS {
        engine
            .register_user(name, &format!("{name}@example.com"), "password")
            .await
            .unwrap();
    }
}

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = migrated_db().await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    register_all(&engine).await;
    (engine, db)
}

pub async fn engine_with_events(events: EventSender) -> (Engine, DatabaseConnection) {
    let db = migrated_db().await;
    let engine = Engine::builder()
        .database(db.clone())
        .events(events)
        .build()
        .await
        .unwrap();
    register_all(&engine).await;
    (engine, db)
}

/// Creates a group owned by the first member and adds the others.
pub async fn group_with(engine: &Engine, name: &str, members: &[&str]) -> Uuid {
    let owner = members[0];
    let group = engine.create_group(name, None, owner).await.unwrap();
    for member in &members[1..] {
        engine.add_member(group.id, member, owner).await.unwrap();
    }
    group.id
}

pub async fn pay(engine: &Engine, group_id: Uuid, payer: &str, amount_minor: i64) {
    engine
        .create_expense(ExpenseCmd::new(group_id, payer, amount_minor, Utc::now()))
        .await
        .unwrap();
}

pub async fn count_rows(db: &DatabaseConnection, table: &str, group_id: Uuid) -> i64 {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {table} WHERE group_id = ?"),
            vec![group_id.to_string().into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}
