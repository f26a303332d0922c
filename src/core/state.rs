use std::sync::Arc;

use sqlx::PgPool;

use crate::core::config::Settings;
use crate::services::question_gen::QuestionGenerator;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    generator: QuestionGenerator,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool, generator: QuestionGenerator) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, generator }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn generator(&self) -> &QuestionGenerator {
        &self.inner.generator
    }
}
