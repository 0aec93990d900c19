pub mod error;
pub mod model;
pub mod repository;
pub mod timezones;
pub mod types;

pub use error::GatewayError;
pub use model::Model;
pub use repository::Repository;

use std::sync::Arc;

use chrono::NaiveDate;

use self::timezones::TimezoneTable;

/// Everything the trip actions need from the outside world
#[derive(Clone)]
pub struct Environment {
    pub model: Model,
    pub repository: Repository,
    today: Arc<dyn Fn() -> NaiveDate + Send + Sync>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish()
    }
}

impl Environment {
    pub fn new(model: Model, repository: Repository) -> Self {
        Self {
            model,
            repository,
            today: Arc::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Pin "today" for the list filters
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Arc::new(move || today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    pub fn timezones(&self) -> &TimezoneTable {
        self.repository.timezones()
    }
}
