/// Post handlers - list, create and delete on the board
///
/// Each request resolves its tracking token first, then dispatches on the
/// method. A freshly issued token is written back as a cookie on whatever
/// response the dispatch produces, redirects included.
use crate::error::{AppError, Result};
use crate::handlers::{form::form_field, util};
use crate::middleware::{can_delete_post, AuthenticatedUser};
use crate::models::PostView;
use crate::services::{DeleteOutcome, PostService};
use crate::views::BoardView;
use actix_web::cookie::{time::OffsetDateTime, Cookie};
use actix_web::http::{header, Method};
use actix_web::{web, HttpRequest, HttpResponse};
use crypto_core::{TrackingToken, TrackingTokenManager, TRACKING_COOKIE_NAME};

/// Route of the list page; every write redirects here
pub const POSTS_PATH: &str = "/posts";

/// Route of the delete endpoint
pub const DELETE_PATH: &str = "/posts/delete";

/// GET lists posts, POST creates one
pub async fn handle_list(
    req: HttpRequest,
    body: web::Bytes,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    tokens: web::Data<TrackingTokenManager>,
    view: web::Data<BoardView>,
) -> Result<HttpResponse> {
    let token = resolve_tracking_token(&req, &tokens, &user);

    let response = if *req.method() == Method::GET {
        list_posts(&posts, &view, &user).await?
    } else if *req.method() == Method::POST {
        create_post(&posts, &user, &token, &body).await?
    } else {
        util::handle_bad_request().await
    };

    with_tracking_cookie(response, &token)
}

/// POST deletes a post when the requester is its author or the administrator
///
/// Unknown ids and unauthorized attempts are silent no-ops that still redirect.
pub async fn handle_delete(
    req: HttpRequest,
    body: web::Bytes,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    tokens: web::Data<TrackingTokenManager>,
) -> Result<HttpResponse> {
    let token = resolve_tracking_token(&req, &tokens, &user);

    let response = if *req.method() == Method::POST {
        delete_post(&posts, &user, &body).await?
    } else {
        util::handle_bad_request().await
    };

    with_tracking_cookie(response, &token)
}

async fn list_posts(
    posts: &PostService,
    view: &BoardView,
    user: &AuthenticatedUser,
) -> Result<HttpResponse> {
    let views: Vec<PostView> = posts
        .list_posts()
        .await?
        .iter()
        .map(|post| PostView::new(post, can_delete_post(user.name(), post)))
        .collect();

    let page = view.render_posts(user.name(), &views)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

async fn create_post(
    posts: &PostService,
    user: &AuthenticatedUser,
    token: &TrackingToken,
    body: &[u8],
) -> Result<HttpResponse> {
    let body = String::from_utf8_lossy(body);
    let content = form_field(&body, "content").unwrap_or_default();

    posts.create_post(&content, user.name(), &token.value).await?;

    Ok(redirect_to_posts())
}

async fn delete_post(
    posts: &PostService,
    user: &AuthenticatedUser,
    body: &[u8],
) -> Result<HttpResponse> {
    let body = String::from_utf8_lossy(body);
    let post_id = form_field(&body, "id").and_then(|id| id.trim().parse::<i64>().ok());

    match post_id {
        Some(post_id) => {
            let outcome = posts.delete_post(post_id, user.name()).await?;
            if outcome != DeleteOutcome::Deleted {
                tracing::debug!(post_id, ?outcome, "delete was a no-op");
            }
        }
        None => {
            tracing::info!(user = %user.name(), "delete request without a valid id ignored");
        }
    }

    Ok(redirect_to_posts())
}

/// 303 so the client follows up with a GET instead of replaying the POST
fn redirect_to_posts() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, POSTS_PATH))
        .finish()
}

fn resolve_tracking_token(
    req: &HttpRequest,
    tokens: &TrackingTokenManager,
    user: &AuthenticatedUser,
) -> TrackingToken {
    let incoming = req
        .cookie(TRACKING_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string());

    tokens.ensure_token(incoming.as_deref(), user.name())
}

fn with_tracking_cookie(
    mut response: HttpResponse,
    token: &TrackingToken,
) -> Result<HttpResponse> {
    let Some(cookie) = tracking_cookie(token)? else {
        return Ok(response);
    };

    response
        .add_cookie(&cookie)
        .map_err(|e| AppError::Internal(format!("failed to set tracking cookie: {}", e)))?;

    Ok(response)
}

/// Cookie for a freshly issued token; `None` when the token is reused
fn tracking_cookie(token: &TrackingToken) -> Result<Option<Cookie<'static>>> {
    let Some(expires_at) = token.expires_at.filter(|_| token.is_fresh) else {
        return Ok(None);
    };

    let expires = OffsetDateTime::from_unix_timestamp(expires_at.timestamp())
        .map_err(|e| AppError::Internal(format!("invalid cookie expiration: {}", e)))?;

    let cookie = Cookie::build(TRACKING_COOKIE_NAME, token.value.clone())
        .path("/")
        .http_only(true)
        .expires(expires)
        .finish();

    Ok(Some(cookie))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_reused_token_sets_no_cookie() {
        let token = TrackingToken {
            value: "1_abc".to_string(),
            is_fresh: false,
            expires_at: None,
        };
        assert!(tracking_cookie(&token).unwrap().is_none());
    }

    #[test]
    fn test_fresh_token_cookie_expires_with_token() {
        let expires_at = Utc::now() + Duration::hours(24);
        let token = TrackingToken {
            value: "1_abc".to_string(),
            is_fresh: true,
            expires_at: Some(expires_at),
        };

        let cookie = tracking_cookie(&token).unwrap().unwrap();
        assert_eq!(cookie.name(), TRACKING_COOKIE_NAME);
        assert_eq!(cookie.value(), "1_abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.expires_datetime().map(|t| t.unix_timestamp()),
            Some(expires_at.timestamp())
        );
    }

    #[test]
    fn test_redirect_is_see_other() {
        let response = redirect_to_posts();
        assert_eq!(response.status(), 303);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), POSTS_PATH);
    }
}
