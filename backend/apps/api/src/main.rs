//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use affiliate::application::AffiliateConfig;
use affiliate::presentation::handlers::AffiliateAppState;
use affiliate::{PgPartnerRepository, affiliate_router};
use auth::application::config::AuthConfig;
use auth::application::token::TokenService;
use auth::presentation::handlers::AuthAppState;
use auth::{PgAccountRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::captcha::CaptchaVerifier;
use platform::cookie::CookieConfig;
use platform::notify::{SmtpConfig, SmtpGateway, TemplateStore};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,affiliate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Token signing configuration
    let auth_config = Arc::new(load_auth_config()?);
    let tokens = Arc::new(TokenService::new(&auth_config));

    // Captcha: enforcement is an explicit wiring decision
    let captcha = match env::var("RECAPTCHA_SECRET") {
        Ok(secret) if !secret.is_empty() => Arc::new(CaptchaVerifier::enabled(secret)),
        _ => {
            tracing::warn!("RECAPTCHA_SECRET not set, captcha verification disabled");
            Arc::new(CaptchaVerifier::Disabled)
        }
    };

    // Outbound mail; delivery failures are logged and swallowed downstream
    let gateway = Arc::new(SmtpGateway::new(SmtpConfig {
        host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
        username: env::var("SMTP_USERNAME").unwrap_or_default(),
        password: env::var("SMTP_PASSWORD").unwrap_or_default(),
        from_address: env::var("SMTP_FROM")
            .unwrap_or_else(|_| "no-reply@localhost".to_string()),
    })?);

    let templates = Arc::new(TemplateStore::with_defaults());

    let affiliate_config = Arc::new(AffiliateConfig {
        admin_notice_address: env::var("ADMIN_NOTICE_EMAIL").ok(),
        ..Default::default()
    });

    let accounts = Arc::new(PgAccountRepository::new(pool.clone()));
    let partners = Arc::new(PgPartnerRepository::new(pool.clone()));

    let auth_state = AuthAppState {
        repo: accounts.clone(),
        gateway: gateway.clone(),
        templates: templates.clone(),
        config: auth_config.clone(),
        tokens: tokens.clone(),
    };

    let affiliate_state = AffiliateAppState {
        partners,
        accounts,
        gateway,
        templates,
        captcha,
        auth_config,
        config: affiliate_config,
        tokens,
        cookie: Arc::new(CookieConfig::default()),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api", affiliate_router(affiliate_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Load token signing secrets
///
/// Debug builds use random per-process secrets; production requires both
/// secrets in the environment, base64-encoded.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        let access_b64 = env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in production");
        let refresh_b64 = env::var("REFRESH_TOKEN_SECRET")
            .expect("REFRESH_TOKEN_SECRET must be set in production");

        AuthConfig {
            access_token_secret: Engine::decode(&general_purpose::STANDARD, &access_b64)?,
            refresh_token_secret: Engine::decode(&general_purpose::STANDARD, &refresh_b64)?,
            ..Default::default()
        }
    };

    if let Ok(base_url) = env::var("PORTAL_BASE_URL") {
        config.portal_base_url = base_url;
    }

    Ok(config)
}
