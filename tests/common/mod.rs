#![allow(dead_code)]

use derby_backend::config::PayPalConfig;
use derby_backend::entities::{
    bird_entity as birds, breeder_entity as breeders, event_entity as events,
    event_inventory_entity as inventories, event_inventory_item_entity as inventory_items,
    fee_scheme_entity as fee_schemes, perch_fee_entity as perch_fees,
};
use derby_backend::external::PayPalService;
use sea_orm::{ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Set};

const SCHEMA: &[&str] = &[
    "CREATE TABLE breeders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        breeder_no BIGINT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE birds (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_breeder BIGINT NOT NULL,
        band_country TEXT NOT NULL,
        band_year INTEGER NOT NULL,
        band_series TEXT NOT NULL,
        band_no TEXT NOT NULL,
        rf_id TEXT NOT NULL UNIQUE,
        name TEXT,
        color TEXT,
        sex TEXT NOT NULL DEFAULT 'unknown',
        is_lost BOOLEAN NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE fee_schemes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        entry_fee_cents BIGINT NOT NULL DEFAULT 0,
        max_bird_count INTEGER NOT NULL,
        max_backup_bird_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT
    )",
    "CREATE TABLE perch_fees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_fee_scheme BIGINT NOT NULL,
        slot_no INTEGER NOT NULL,
        fee_cents BIGINT NOT NULL,
        UNIQUE (id_fee_scheme, slot_no)
    )",
    "CREATE TABLE events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        season_year INTEGER NOT NULL,
        id_fee_scheme BIGINT NOT NULL,
        is_open BOOLEAN NOT NULL DEFAULT 1,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE prize_schemes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_event BIGINT NOT NULL,
        name TEXT NOT NULL,
        rank_from INTEGER NOT NULL,
        rank_to INTEGER NOT NULL,
        amount_cents BIGINT NOT NULL
    )",
    "CREATE TABLE event_inventories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_event BIGINT NOT NULL,
        id_breeder BIGINT NOT NULL,
        created_at TEXT
    )",
    "CREATE TABLE event_inventory_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_event_inventory BIGINT NOT NULL,
        id_bird BIGINT NOT NULL,
        perch_fee_cents BIGINT NOT NULL,
        entry_fee_cents BIGINT NOT NULL
    )",
    "CREATE TABLE payments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_breeder BIGINT NOT NULL,
        id_event_inventory BIGINT NOT NULL,
        order_id TEXT NOT NULL UNIQUE,
        capture_id TEXT,
        amount_cents BIGINT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE races (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_event BIGINT NOT NULL,
        race_type TEXT NOT NULL,
        race_no INTEGER NOT NULL,
        name TEXT,
        start_time TEXT NOT NULL,
        distance_m BIGINT,
        weather TEXT,
        release_point TEXT,
        created_at TEXT
    )",
    "CREATE TABLE baskets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_race BIGINT NOT NULL,
        basket_no INTEGER NOT NULL,
        is_race_basket BOOLEAN NOT NULL DEFAULT 0,
        capacity INTEGER NOT NULL
    )",
    "CREATE TABLE race_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_race BIGINT NOT NULL,
        id_bird BIGINT NOT NULL,
        is_dist_basketed BOOLEAN NOT NULL DEFAULT 0,
        id_race_basket BIGINT,
        id_dist_basket BIGINT,
        race_basket_time TEXT,
        is_lost BOOLEAN NOT NULL DEFAULT 0
    )",
    "CREATE TABLE race_item_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        id_race_item BIGINT NOT NULL UNIQUE,
        arrival_time TEXT NOT NULL,
        elapsed_seconds BIGINT NOT NULL,
        speed_m_per_min DOUBLE,
        created_at TEXT,
        updated_at TEXT
    )",
];

/// In-memory database with the full schema. A single connection keeps
/// every query on the same sqlite instance.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);

    let db = Database::connect(opts)
        .await
        .expect("failed to open in-memory database");

    for ddl in SCHEMA {
        db.execute_unprepared(ddl).await.expect("failed to run DDL");
    }

    db
}

pub fn paypal_config(base_url: &str) -> PayPalConfig {
    PayPalConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        base_url: base_url.to_string(),
        currency: "EUR".to_string(),
        return_url: "https://derby.test/checkout/return".to_string(),
        cancel_url: "https://derby.test/checkout/cancel".to_string(),
        timeout_secs: 5,
    }
}

pub fn paypal_service(base_url: &str) -> PayPalService {
    PayPalService::new(paypal_config(base_url))
}

pub async fn create_breeder(db: &DatabaseConnection, no: i64, email: &str) -> breeders::Model {
    breeders::ActiveModel {
        breeder_no: Set(no),
        name: Set(format!("Breeder {}", no)),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        is_admin: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert breeder")
}

pub async fn create_bird(db: &DatabaseConnection, breeder_id: i64, rf_id: &str) -> birds::Model {
    birds::ActiveModel {
        id_breeder: Set(breeder_id),
        band_country: Set("MKD".to_string()),
        band_year: Set(2025),
        band_series: Set("S1".to_string()),
        band_no: Set(rf_id.to_string()),
        rf_id: Set(rf_id.to_string()),
        name: Set(None),
        color: Set(Some("blue".to_string())),
        sex: Set("unknown".to_string()),
        is_lost: Set(false),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert bird")
}

pub async fn create_fee_scheme(
    db: &DatabaseConnection,
    entry_fee_cents: i64,
    max_bird_count: i32,
    max_backup_bird_count: i32,
    perch_fees_cents: &[i64],
) -> fee_schemes::Model {
    let scheme = fee_schemes::ActiveModel {
        name: Set("Standard".to_string()),
        entry_fee_cents: Set(entry_fee_cents),
        max_bird_count: Set(max_bird_count),
        max_backup_bird_count: Set(max_backup_bird_count),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert fee scheme");

    for (i, &fee) in perch_fees_cents.iter().enumerate() {
        perch_fees::ActiveModel {
            id_fee_scheme: Set(scheme.id),
            slot_no: Set(i as i32 + 1),
            fee_cents: Set(fee),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("failed to insert perch fee");
    }

    scheme
}

pub async fn create_event(
    db: &DatabaseConnection,
    scheme_id: i64,
    is_open: bool,
) -> events::Model {
    events::ActiveModel {
        name: Set("Derby 2026".to_string()),
        season_year: Set(2026),
        id_fee_scheme: Set(scheme_id),
        is_open: Set(is_open),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert event")
}

/// Inventory + items seeded directly, bypassing the gateway, for race
/// logistics tests.
pub async fn seed_inventory(
    db: &DatabaseConnection,
    event_id: i64,
    breeder_id: i64,
    bird_ids: &[i64],
) -> inventories::Model {
    let inventory = inventories::ActiveModel {
        id_event: Set(event_id),
        id_breeder: Set(breeder_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert inventory");

    for &bird_id in bird_ids {
        inventory_items::ActiveModel {
            id_event_inventory: Set(inventory.id),
            id_bird: Set(bird_id),
            perch_fee_cents: Set(1000),
            entry_fee_cents: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("failed to insert inventory item");
    }

    inventory
}

pub const TOKEN_BODY: &str =
    r#"{"access_token":"test-token","token_type":"Bearer","expires_in":32400}"#;

pub fn order_body(order_id: &str) -> String {
    format!(r#"{{"id":"{}","status":"CREATED"}}"#, order_id)
}

pub fn capture_body(order_id: &str, status: &str, capture_id: &str) -> String {
    format!(
        r#"{{"id":"{}","status":"{}","purchase_units":[{{"payments":{{"captures":[{{"id":"{}","status":"{}"}}]}}}}]}}"#,
        order_id, status, capture_id, status
    )
}
