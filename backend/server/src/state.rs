use std::sync::Arc;

use minijinja::{Environment, Value};

use super::{config::Config, error::AppError, store::Store, views::templates};

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub templates: Environment<'static>,
}

impl AppState {
    /// Loads the data directory, so call it off the async runtime.
    pub fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let templates = templates()?;
        let store = Store::open(config.data_dir.clone());

        Ok(Arc::new(Self {
            config,
            store,
            templates,
        }))
    }

    pub fn render(&self, name: &str, context: Value) -> Result<String, AppError> {
        Ok(self.templates.get_template(name)?.render(context)?)
    }
}
