use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AuthUser, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use domain_geo::{ClassifiedResult, DeleteConfirmation};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    CreateRegion, GeometryInput, NearQuery, PointQuery, RegionResponse, RegionWithDistance,
    UpdateRegion,
};
use crate::repository::RegionRepository;
use crate::service::RegionService;

/// OpenAPI documentation for the Regions API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_regions,
        create_region,
        regions_containing,
        regions_near,
        get_region,
        update_region,
        delete_region
    ),
    components(
        schemas(
            RegionResponse,
            RegionWithDistance,
            CreateRegion,
            UpdateRegion,
            GeometryInput,
            DeleteConfirmation
        ),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Regions", description = "Owned polygons with containment and proximity queries")
    )
)]
pub struct ApiDoc;

/// Create the regions router. Writes require a bearer token; reads are public.
pub fn router<R: RegionRepository + 'static>(service: RegionService<R>, auth: JwtAuth) -> Router {
    let protected = Router::new()
        .route("/", post(create_region))
        .route("/{id}", put(update_region).delete(delete_region))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/", get(list_regions))
        .route("/containing", get(regions_containing))
        .route("/near", get(regions_near))
        .route("/{id}", get(get_region))
        .merge(protected)
        .with_state(Arc::new(service))
}

/// List all regions
#[utoipa::path(
    get,
    path = "",
    tag = "Regions",
    responses(
        (status = 200, description = "List of regions", body = Vec<RegionResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_regions<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
) -> ClassifiedResult<Json<Vec<RegionResponse>>> {
    let regions = service.get_all_regions().await?;
    Ok(Json(regions))
}

/// Create a region owned by the caller
#[utoipa::path(
    post,
    path = "",
    tag = "Regions",
    request_body = CreateRegion,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Region created successfully", body = RegionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_region<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
    caller: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateRegion>,
) -> ClassifiedResult<impl IntoResponse> {
    let region = service.create_region(input, &caller.id).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

/// Regions containing a point
#[utoipa::path(
    get,
    path = "/containing",
    tag = "Regions",
    params(PointQuery),
    responses(
        (status = 200, description = "Regions containing the point", body = Vec<RegionResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn regions_containing<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
    Query(query): Query<PointQuery>,
) -> ClassifiedResult<Json<Vec<RegionResponse>>> {
    let regions = service.get_regions_containing(query).await?;
    Ok(Json(regions))
}

/// A user's regions near a point, nearest first
#[utoipa::path(
    get,
    path = "/near",
    tag = "Regions",
    params(NearQuery),
    responses(
        (status = 200, description = "Regions with their distance in meters", body = Vec<RegionWithDistance>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn regions_near<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
    Query(query): Query<NearQuery>,
) -> ClassifiedResult<Json<Vec<RegionWithDistance>>> {
    let regions = service.get_regions_near(query).await?;
    Ok(Json(regions))
}

/// Get a region by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Regions",
    params(
        ("id" = String, Path, description = "Region ID")
    ),
    responses(
        (status = 200, description = "Region found", body = RegionResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_region<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
    Path(id): Path<String>,
) -> ClassifiedResult<Json<RegionResponse>> {
    let region = service.get_region_by_id(&id).await?;
    Ok(Json(region))
}

/// Update a region
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Regions",
    params(
        ("id" = String, Path, description = "Region ID")
    ),
    request_body = UpdateRegion,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Region updated successfully", body = RegionResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_region<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateRegion>,
) -> ClassifiedResult<Json<RegionResponse>> {
    let region = service.update_region(&id, input).await?;
    Ok(Json(region))
}

/// Delete a region
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Regions",
    params(
        ("id" = String, Path, description = "Region ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Region deleted", body = DeleteConfirmation),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_region<R: RegionRepository>(
    State(service): State<Arc<RegionService<R>>>,
    Path(id): Path<String>,
) -> ClassifiedResult<Json<DeleteConfirmation>> {
    let confirmation = service.delete_region(&id).await?;
    Ok(Json(confirmation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRegionRepository;
    use axum::{body::Body, http::Request};
    use axum_helpers::JwtConfig;
    use domain_geo::Coordinates;
    use domain_users::{InMemoryUserRepository, User, UserRepository};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        token: String,
        owner: String,
    }

    async fn app() -> TestApp {
        let users = Arc::new(InMemoryUserRepository::new());
        let owner = users
            .create(User::new(
                "A".to_string(),
                "a@x.com".to_string(),
                "hash".to_string(),
                "Curitiba, Brazil".to_string(),
                Coordinates::new(-49.2733, -25.4284),
            ))
            .await
            .unwrap()
            .id
            .to_string();

        let auth = JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!"));
        let token = auth.issue_token(&owner).unwrap();
        let service = RegionService::new(InMemoryRegionRepository::new(), users);

        TestApp {
            router: Router::new().nest("/regions", router(service, auth)),
            token,
            owner,
        }
    }

    fn florida() -> Value {
        json!({
            "name": "Florida",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-80.87, 24.54],
                    [-87.63, 24.54],
                    [-87.63, 31.0],
                    [-80.87, 31.0],
                    [-80.87, 24.54]
                ]]
            }
        })
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let app = app().await;

        let response = app
            .router
            .oneshot(json_request("POST", "/regions", None, florida()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["eror"], "Token is missing");
    }

    #[tokio::test]
    async fn test_invalid_token_is_401() {
        let app = app().await;

        let response = app
            .router
            .oneshot(json_request("POST", "/regions", Some("garbage"), florida()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["eror"], "Invalid token");
    }

    #[tokio::test]
    async fn test_create_then_containing() {
        let app = app().await;

        let created = app
            .router
            .clone()
            .oneshot(json_request("POST", "/regions", Some(&app.token), florida()))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        assert_eq!(created["user"], app.owner.as_str());

        let response = app
            .router
            .oneshot(get_request("/regions/containing?longitude=-81.3792&latitude=28.5383"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let found = body_json(response).await;
        assert_eq!(found[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_create_self_intersecting_polygon_is_400() {
        let app = app().await;
        let bowtie = json!({
            "name": "Bowtie",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [1, 1], [1, 0], [0, 1], [0, 0]]]
            }
        });

        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/regions", Some(&app.token), bowtie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["eror"],
            "Polygon rings must not self-intersect"
        );

        let listed = app.router.oneshot(get_request("/regions")).await.unwrap();
        assert_eq!(body_json(listed).await, json!([]));
    }

    #[tokio::test]
    async fn test_containing_nothing_is_404() {
        let app = app().await;

        let response = app
            .router
            .oneshot(get_request("/regions/containing?longitude=10&latitude=10"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_near_with_missing_distance_is_400() {
        let app = app().await;

        let response = app
            .router
            .oneshot(get_request(&format!(
                "/regions/near?longitude=-81.3&latitude=28.5&userId={}",
                app.owner
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["eror"], "maxDistance is required");
    }

    #[tokio::test]
    async fn test_near_returns_distance() {
        let app = app().await;
        app.router
            .clone()
            .oneshot(json_request("POST", "/regions", Some(&app.token), florida()))
            .await
            .unwrap();

        let response = app
            .router
            .oneshot(get_request(&format!(
                "/regions/near?longitude=-81.3792&latitude=28.5383&maxDistance=10000&userId={}",
                app.owner
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let found = body_json(response).await;
        assert_eq!(found[0]["name"], "Florida");
        assert_eq!(found[0]["distance"], 0.0);
    }

    #[tokio::test]
    async fn test_reads_are_public_and_delete_is_protected() {
        let app = app().await;
        let created = app
            .router
            .clone()
            .oneshot(json_request("POST", "/regions", Some(&app.token), florida()))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_str().unwrap().to_string();
        let uri = format!("/regions/{id}");

        let read = app.router.clone().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(read.status(), StatusCode::OK);

        let anonymous = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(&uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let deleted = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(&uri)
                    .header("authorization", format!("Bearer {}", app.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);
        assert_eq!(body_json(deleted).await, json!({ "deleted": true }));

        let gone = app.router.oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_renames_region() {
        let app = app().await;
        let created = app
            .router
            .clone()
            .oneshot(json_request("POST", "/regions", Some(&app.token), florida()))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_str().unwrap().to_string();

        let response = app
            .router
            .oneshot(json_request(
                "PUT",
                &format!("/regions/{id}"),
                Some(&app.token),
                json!({ "name": "Sunshine State" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Sunshine State");
    }
}
