// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::{path::PathBuf, sync::Arc};

/// Transport level knobs the router needs at construction time.
#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub allowed_origins: Vec<String>,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".into()],
            uploads_dir: PathBuf::from("uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub settings: HttpSettings,
}
