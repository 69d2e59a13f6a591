//! Anime record API handlers.
//!
//! ```text
//! GET    /records
//! GET    /records/{id}
//! POST   /records        {"name":"Mushishi"}
//! POST   /records/batch  [{"name":"A"},{"name":"B"}]
//! PUT    /records/{id}   {"name":"Mushishi Zoku Shou"}
//! DELETE /records/{id}
//! ```
//!
//! Handlers only translate between JSON and the anime driving ports. Role
//! checks happen in the access-control middleware before they run.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Anime, AnimeDraft, AnimeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentPrincipal;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;

/// Request body for creating or replacing a record.
///
/// `id` is accepted for compatibility but ignored: new records get a
/// store-assigned id and `PUT` uses the id from the path. A missing `name`
/// is treated like an empty one.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AnimePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 7)]
    pub id: Option<i32>,
    #[serde(default)]
    #[schema(example = "Tensei Shitara Slime Datta Ken")]
    pub name: String,
}

impl AnimePayload {
    /// Payload carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl From<AnimePayload> for AnimeDraft {
    fn from(value: AnimePayload) -> Self {
        AnimeDraft::new(value.name)
    }
}

/// List every stored record in id order.
#[utoipa::path(
    get,
    path = "/records",
    responses(
        (status = 200, description = "All records", body = [Anime]),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 403, description = "Missing USER or ADMIN role", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["records"],
    operation_id = "listRecords"
)]
#[get("/records")]
pub async fn list_animes(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Anime>>> {
    let animes = state.animes.find_all().await?;
    Ok(web::Json(animes))
}

/// Fetch one record.
#[utoipa::path(
    get,
    path = "/records/{id}",
    params(("id" = i32, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record", body = Anime),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 403, description = "Missing USER or ADMIN role", body = ErrorBody),
        (status = 404, description = "Anime not found", body = ErrorBody)
    ),
    tags = ["records"],
    operation_id = "getRecord"
)]
#[get("/records/{id}")]
pub async fn get_anime(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Anime>> {
    let anime = state.animes.find_by_id(AnimeId::new(path.into_inner())).await?;
    Ok(web::Json(anime))
}

/// Create a record and return it with its assigned id.
#[utoipa::path(
    post,
    path = "/records",
    request_body = AnimePayload,
    responses(
        (status = 201, description = "Created record", body = Anime),
        (status = 400, description = "Invalid Name", body = ErrorBody),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 403, description = "Missing ADMIN role", body = ErrorBody)
    ),
    tags = ["records"],
    operation_id = "createRecord"
)]
#[post("/records")]
pub async fn create_anime(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    payload: web::Json<AnimePayload>,
) -> ApiResult<HttpResponse> {
    let anime = state
        .anime_commands
        .save(payload.into_inner().into())
        .await?;
    info!(actor = principal.0.username(), id = %anime.id(), "anime created");
    Ok(HttpResponse::Created().json(anime))
}

/// Create several records at once.
///
/// Either every record is stored or, when any name is invalid, none is.
#[utoipa::path(
    post,
    path = "/records/batch",
    request_body = [AnimePayload],
    responses(
        (status = 201, description = "Created records in request order", body = [Anime]),
        (status = 400, description = "Invalid Name; nothing was stored", body = ErrorBody),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 403, description = "Missing ADMIN role", body = ErrorBody)
    ),
    tags = ["records"],
    operation_id = "createRecords"
)]
#[post("/records/batch")]
pub async fn create_animes(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    payload: web::Json<Vec<AnimePayload>>,
) -> ApiResult<HttpResponse> {
    let drafts = payload.into_inner().into_iter().map(AnimeDraft::from).collect();
    let animes = state.anime_commands.save_all(drafts).await?;
    info!(actor = principal.0.username(), count = animes.len(), "anime batch created");
    Ok(HttpResponse::Created().json(animes))
}

/// Replace the name of an existing record.
#[utoipa::path(
    put,
    path = "/records/{id}",
    params(("id" = i32, Path, description = "Record identifier; wins over any id in the body")),
    request_body = AnimePayload,
    responses(
        (status = 204, description = "Record replaced"),
        (status = 400, description = "Invalid Name", body = ErrorBody),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 403, description = "Missing ADMIN role", body = ErrorBody),
        (status = 404, description = "Anime not found", body = ErrorBody)
    ),
    tags = ["records"],
    operation_id = "replaceRecord"
)]
#[put("/records/{id}")]
pub async fn replace_anime(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i32>,
    payload: web::Json<AnimePayload>,
) -> ApiResult<HttpResponse> {
    let id = AnimeId::new(path.into_inner());
    state
        .anime_commands
        .update(id, payload.into_inner().into())
        .await?;
    info!(actor = principal.0.username(), %id, "anime replaced");
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a record.
#[utoipa::path(
    delete,
    path = "/records/{id}",
    params(("id" = i32, Path, description = "Record identifier")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Authentication required", body = ErrorBody),
        (status = 403, description = "Missing ADMIN role", body = ErrorBody),
        (status = 404, description = "Anime not found", body = ErrorBody)
    ),
    tags = ["records"],
    operation_id = "deleteRecord"
)]
#[delete("/records/{id}")]
pub async fn delete_anime(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = AnimeId::new(path.into_inner());
    state.anime_commands.delete(id).await?;
    info!(actor = principal.0.username(), %id, "anime deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "animes_tests.rs"]
mod tests;
