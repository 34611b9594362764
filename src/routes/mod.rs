use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::PgPool;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{events, health_check, tickets, users};

pub fn create_routes(pool: PgPool) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/seats", get(events::available_seats))
        .route(
            "/events/:id/tickets",
            post(tickets::purchase_ticket).delete(tickets::cancel_ticket),
        )
        .route("/events/:id/participants", get(events::list_participants))
        .route("/users", get(users::list_users).post(users::register_user))
        .route("/users/:id", delete(users::delete_user))
        .route("/users/:id/role", put(users::update_user_role))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(pool)
}
