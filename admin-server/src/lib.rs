//! Hive Admin Server - RBAC admin dashboard backend
//!
//! # Architecture overview
//!
//! - **Auth** (`auth`): JWT + Argon2 authentication, request-scoped user
//!   context, permission/role gates
//! - **Database** (`db`): SQLite storage (sqlx), migrations, seeding
//! - **Services** (`services`): permission facade over the store, SMTP
//!   contact mailer
//! - **HTTP API** (`api`): RESTful routes and handlers
//!
//! # Module structure
//!
//! ```text
//! admin-server/src/
//! ├── core/          # Config, state, server
//! ├── auth/          # JWT, current user, middleware
//! ├── db/            # Pool, migrations, repositories, seed
//! ├── services/      # Permission facade, mailer
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Validation, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use crate::auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

// Security logging macro - structured events for auth failures and denials
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging. Call once, before anything else.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   / / / (_)   _____
  / /_/ / / | / / _ \
 / __  / /| |/ /  __/
/_/ /_/_/ |___/\___/
   ___       __          _
  /   | ____/ /___ ___  (_)___
 / /| |/ __  / __ `__ \/ / __ \
/ ___ / /_/ / / / / / / / / / /
/_/  |_\__,_/_/ /_/ /_/_/_/ /_/
    "#
    );
}
