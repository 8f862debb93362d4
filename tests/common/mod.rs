#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use rankwire::api;
use rankwire::api::handlers::{health_handler, public_feed_handler};
use rankwire::api::middleware::auth;
use rankwire::application::services::auth_service::hash_token;
use rankwire::application::services::{
    AuthService, EntityService, FeedService, PressReleaseService,
};
use rankwire::domain::entities::{
    Entity, EntityProfile, NewPressRelease, PressRelease, PressReleaseWithEntity, ReleaseContent,
    ReleaseStatus,
};
use rankwire::infrastructure::cache::{CacheService, NullCache};
use rankwire::infrastructure::persistence::{
    PgEntityRepository, PgPressReleaseRepository, PgTokenRepository,
};
use rankwire::infrastructure::syndication::{DryRunSubmitter, FeedSubmitter, SubmissionOutcome};
use rankwire::state::AppState;
use rankwire::web;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";
pub const TEST_BASE_URL: &str = "https://press.example.com";
pub const TEST_USER: &str = "user-alice";
pub const TEST_TOKEN: &str = "alice-token-0123456789abcdefghijklmnopqrstuvwxyz";
pub const OTHER_USER: &str = "user-bob";
pub const OTHER_TOKEN: &str = "bob-token-0123456789abcdefghijklmnopqrstuvwxyz";

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub async fn create_test_user(pool: &PgPool, id: &str) {
    sqlx::query("INSERT INTO users (id, name, email) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(format!("Name of {id}"))
        .bind(format!("{id}@example.com"))
        .execute(pool)
        .await
        .unwrap();
}

/// Inserts a token for `user_id` hashed the way the server verifies it.
pub async fn create_test_token(pool: &PgPool, user_id: &str, name: &str, token: &str) {
    sqlx::query("INSERT INTO api_tokens (user_id, name, token_hash) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(name)
        .bind(hash_token(TEST_SIGNING_SECRET, token))
        .execute(pool)
        .await
        .unwrap();
}

/// Registers Alice and Bob, each with one token.
pub async fn seed_accounts(pool: &PgPool) {
    create_test_user(pool, TEST_USER).await;
    create_test_user(pool, OTHER_USER).await;
    create_test_token(pool, TEST_USER, "alice", TEST_TOKEN).await;
    create_test_token(pool, OTHER_USER, "bob", OTHER_TOKEN).await;
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// ─── State and servers ───────────────────────────────────────────────────────

/// Records every submission and answers with a fixed outcome.
#[derive(Default)]
pub struct RecordingSubmitter {
    pub submissions: Mutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl FeedSubmitter for RecordingSubmitter {
    async fn submit(&self, rss: &str, endpoint: Option<String>) -> SubmissionOutcome {
        self.submissions
            .lock()
            .unwrap()
            .push((rss.to_string(), endpoint));
        SubmissionOutcome::succeeded("recorded")
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    create_test_state_with(pool, Arc::new(NullCache), Arc::new(DryRunSubmitter))
}

pub fn create_test_state_with(
    pool: PgPool,
    cache: Arc<dyn CacheService>,
    submitter: Arc<dyn FeedSubmitter>,
) -> AppState {
    let pool = Arc::new(pool);

    let entity_repo = Arc::new(PgEntityRepository::new(pool.clone()));
    let release_repo = Arc::new(PgPressReleaseRepository::new(pool.clone()));
    let token_repo = Arc::new(PgTokenRepository::new(pool.clone()));

    AppState {
        entity_service: Arc::new(EntityService::new(entity_repo.clone())),
        press_release_service: Arc::new(PressReleaseService::new(
            release_repo.clone(),
            entity_repo.clone(),
        )),
        feed_service: Arc::new(FeedService::new(
            release_repo,
            entity_repo,
            cache.clone(),
            submitter,
            TEST_BASE_URL.to_string(),
            300,
        )),
        auth_service: Arc::new(AuthService::new(
            token_repo,
            TEST_SIGNING_SECRET.to_string(),
        )),
        cache,
        db: pool,
    }
}

/// Full route table without rate limiting, which needs a peer address.
pub fn app(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .route("/feed.xml", get(public_feed_handler))
        .merge(web::routes::public_routes())
        .nest("/api", api_router)
        .with_state(state)
}

pub fn make_server(pool: PgPool) -> TestServer {
    TestServer::new(app(create_test_state(pool))).unwrap()
}

// ─── In-memory releases ──────────────────────────────────────────────────────

pub fn release(id: &str, content: ReleaseContent, status: ReleaseStatus, at: DateTime<Utc>) -> PressRelease {
    let mut release = PressRelease::draft(
        NewPressRelease {
            id: id.to_string(),
            user_id: TEST_USER.to_string(),
            entity_id: None,
            content,
        },
        None,
        at,
    );
    release.transition_to(status, at).unwrap();
    release
}

pub fn entity(id: &str, company_name: &str, industry: Option<&str>) -> Entity {
    let at = Utc::now();
    Entity::new(
        id.to_string(),
        TEST_USER.to_string(),
        EntityProfile {
            company_name: company_name.to_string(),
            industry: industry.map(str::to_string),
            ..Default::default()
        },
        at,
        at,
    )
}

pub fn joined(release: PressRelease, entity: Option<Entity>) -> PressReleaseWithEntity {
    PressReleaseWithEntity::new(release, entity)
}

// ─── Feed parsing ────────────────────────────────────────────────────────────

/// A reparsed RSS document, reduced to what the tests inspect.
#[derive(Debug, Default)]
pub struct ParsedFeed {
    pub rss_attributes: Vec<(String, String)>,
    pub channel: Vec<(String, String)>,
    pub items: Vec<ParsedItem>,
}

impl ParsedFeed {
    pub fn channel_field(&self, name: &str) -> Option<&str> {
        lookup(&self.channel, name)
    }

    pub fn rss_attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.rss_attributes, name)
    }
}

/// Child elements of one `<item>`, in document order, with decoded text.
#[derive(Debug, Default)]
pub struct ParsedItem {
    pub fields: Vec<(String, String)>,
    pub guid_is_permalink: Option<String>,
}

impl ParsedItem {
    pub fn field(&self, name: &str) -> Option<&str> {
        lookup(&self.fields, name)
    }

    pub fn all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Parses a generated feed with a real XML parser.
///
/// Panics on malformed XML. Adjacent CDATA sections are concatenated, so a
/// split `]]>` reads back as the original text.
pub fn parse_feed(xml: &str) -> ParsedFeed {
    let mut reader = Reader::from_str(xml);
    let mut feed = ParsedFeed::default();
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut item: Option<ParsedItem> = None;

    loop {
        match reader.read_event().expect("feed must be well-formed XML") {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

                if name == "rss" {
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        feed.rss_attributes.push((
                            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                            attr.unescape_value().unwrap().into_owned(),
                        ));
                    }
                }
                if name == "item" {
                    item = Some(ParsedItem::default());
                }
                if name == "guid"
                    && let Some(current) = item.as_mut()
                    && let Some(attr) = e.try_get_attribute("isPermaLink").unwrap()
                {
                    current.guid_is_permalink =
                        Some(attr.unescape_value().unwrap().into_owned());
                }

                stack.push(name);
                text.clear();
            }
            Event::Text(e) => text.push_str(&e.unescape().unwrap()),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::End(_) => {
                let name = stack.pop().unwrap();
                let value = std::mem::take(&mut text);

                if name == "item" {
                    feed.items.push(item.take().unwrap());
                } else if let Some(current) = item.as_mut() {
                    current.fields.push((name, value));
                } else if stack.last().map(String::as_str) == Some("channel") {
                    feed.channel.push((name, value));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    assert!(stack.is_empty(), "unclosed elements: {stack:?}");
    feed
}
