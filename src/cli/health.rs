use crate::{backend::Backend, config, success, warning};

pub async fn health() {
    let backend = Backend::new(config::backend_url());
    match backend.health().await {
        Ok(true) => success!("Backend at {} is healthy.", backend.url()),
        Ok(false) => warning!("Backend at {} answered but is not healthy.", backend.url()),
        Err(e) => warning!(
            "Cannot connect to backend at {}. Please ensure it is running. ({})",
            backend.url(),
            e
        ),
    }
}
