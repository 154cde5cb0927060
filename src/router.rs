use axum::{Router, routing::any};

use crate::config::LOGIN_ROUTE;
use crate::db::SharedDirectory;
use crate::handlers::login::parent_login_handler;

#[derive(Clone)]
pub struct LoginState {
    pub directory: SharedDirectory,
}

impl LoginState {
    pub fn new(directory: SharedDirectory) -> Self {
        Self { directory }
    }
}

pub fn login_router(state: LoginState) -> Router {
    Router::new()
        .route(LOGIN_ROUTE, any(parent_login_handler))
        .with_state(state)
}
