use crate::handlers::{dashboard, fitness, journal, meal, mood, sleep, stretch, timers, water, weight};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/mood", get(mood::get_mood).post(mood::save_mood))
        .route("/api/mood/:date", delete(mood::delete_mood))
        .route("/api/water", get(water::get_water).post(water::add_water))
        .route("/api/sleep", get(sleep::get_sleep).post(sleep::save_sleep))
        .route("/api/sleep/:date", delete(sleep::delete_sleep))
        .route("/api/meal", get(meal::get_meals).post(meal::add_meal))
        .route("/api/meal/:date/:meal_id", delete(meal::remove_meal))
        .route("/api/fitness", get(fitness::get_routines).post(fitness::create_routine))
        .route(
            "/api/fitness/:id/exercises/:exercise_id",
            put(fitness::edit_exercise).delete(fitness::delete_exercise),
        )
        .route(
            "/api/fitness/:id/exercises/:exercise_id/toggle",
            post(fitness::toggle_exercise),
        )
        .route("/api/fitness/:id/complete", post(fitness::complete_routine))
        .route("/api/fitness/:id/reset", post(fitness::reset_routine))
        .route("/api/stretch", get(stretch::get_sequences).post(stretch::create_sequence))
        .route(
            "/api/stretch/:id/stretches/:stretch_id",
            put(stretch::edit_stretch).delete(stretch::delete_stretch),
        )
        .route("/api/stretch/:id/reorder", post(stretch::reorder_stretches))
        .route("/api/stretch/:id/complete", post(stretch::complete_sequence))
        .route("/api/mental", get(journal::get_journal).post(journal::save_entry))
        .route("/api/mental/:id", delete(journal::delete_entry))
        .route("/api/weight", get(weight::get_weight).post(weight::save_weight))
        .route("/api/weight/:date", delete(weight::delete_weight))
        .route("/api/timers/breathing", get(timers::get_breathing))
        .route("/api/timers/breathing/start", post(timers::start_breathing))
        .route("/api/timers/breathing/pause", post(timers::pause_breathing))
        .route("/api/timers/breathing/reset", post(timers::reset_breathing))
        .route("/api/timers/exercise", get(timers::get_exercise))
        .route("/api/timers/exercise/start", post(timers::start_exercise))
        .route("/api/timers/exercise/stop", post(timers::stop_exercise))
        .route("/api/timers/stretch", get(timers::get_stretch))
        .route("/api/timers/stretch/start", post(timers::start_stretch))
        .route("/api/timers/stretch/pause", post(timers::pause_stretch))
        .route("/api/timers/stretch/resume", post(timers::resume_stretch))
        .route("/api/timers/stretch/stop", post(timers::stop_stretch))
        .with_state(state)
}
