use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::db::AppState;
use crate::error::AppError;
use crate::jwt::unauthenticated;
use crate::util::extract_bearer_token;

/// Require a valid caller token and attach the [`CallerIdentity`] to the request.
///
/// [`CallerIdentity`]: crate::jwt::CallerIdentity
pub async fn caller_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers()).ok_or_else(unauthenticated)?;
    let caller = state.caller_keys.verify(token)?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
