use serde_json::json;

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::render_status;

pub const API_UNREACHABLE: &str = "Cannot reach the shop API. Please check your connection.";

/// Calls `GET /` and prints the API's message.
pub async fn status(ctx: &AppContext) -> ConsoleResult<String> {
    let message = ctx
        .api
        .health()
        .await
        .map_err(|e| ConsoleError::from_client(e, API_UNREACHABLE))?;

    let base_url = ctx.api.base_url();
    ctx.emit(&json!({ "api": base_url, "message": message }), |p| {
        render_status(base_url, &message, p)
    })
}
