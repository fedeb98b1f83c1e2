pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agent::handlers as agent_handlers;
use crate::state::AppState;
use crate::tickets::handlers as ticket_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Complaint analysis
        .route("/api/ai/analyze", post(agent_handlers::handle_analyze))
        // Tickets
        .route(
            "/api/tickets",
            post(ticket_handlers::handle_create_ticket).get(ticket_handlers::handle_list_tickets),
        )
        .route("/api/tickets/:id", get(ticket_handlers::handle_get_ticket))
        .with_state(state)
}
