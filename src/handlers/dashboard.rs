use crate::dashboard::{Dashboard, DashboardInputs, build_dashboard};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{Json, extract::State, response::Html};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = load_dashboard(&state).await;
    Html(render_index(&dashboard))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(load_dashboard(&state).await)
}

async fn load_dashboard(state: &AppState) -> Dashboard {
    let records = &state.records;
    let inputs = DashboardInputs {
        moods: records.load().await,
        water: records.load().await,
        sleep: records.load().await,
        meals: records.load().await,
    };
    build_dashboard(&inputs, &state.config.goals)
}
