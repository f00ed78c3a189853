//! Server state - shared handles for all services

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{self, DbService};
use crate::services::{MailerService, PermissionService};

/// Server state holding shared references to every service
///
/// Cloning is cheap: the pool and the JWT service are reference counted.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Configuration (immutable) |
/// | pool | SQLite connection pool |
/// | jwt_service | Token generation/validation |
/// | mailer | SMTP contact mailer |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT service (shared ownership)
    pub jwt_service: Arc<JwtService>,
    /// Contact form mailer
    pub mailer: MailerService,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// In order:
    /// 1. working directory structure
    /// 2. database pool + migrations
    /// 3. seed data (permission catalog, roles, superuser)
    /// 4. services (JWT, mailer)
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or seeded; there is no
    /// useful way to continue without storage.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        db::seed::run(&pool, config)
            .await
            .expect("Failed to seed database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let mailer = MailerService::new(&config.mail);

        Self {
            config: config.clone(),
            pool,
            jwt_service,
            mailer,
        }
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Permission facade bound to this state's pool
    pub fn permissions(&self) -> PermissionService {
        PermissionService::new(self.pool.clone())
    }
}
