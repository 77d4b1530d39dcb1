use actix_web::{web, App, HttpServer, HttpResponse, Result as ActixResult};
use actix_cors::Cors;
use relata_core::{Error, ExtensionConfig, Options, RecordId};
use relata_similarity::{RelatedContent, RelatedResponse};
use relata_storage::ContentStore;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Shared state of the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub config: Arc<ExtensionConfig>,
}

impl AppState {
    pub fn new(store: Arc<ContentStore>, config: Arc<ExtensionConfig>) -> Self {
        Self { store, config }
    }
}

#[derive(Deserialize)]
struct RelatedQuery {
    limit: Option<u64>,
    #[serde(default)]
    explain: bool,
}

#[derive(Deserialize, Default)]
struct RelatedRequest {
    #[serde(default)]
    options: Options,
    #[serde(default)]
    explain: bool,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(Self::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/related/{contenttype}/{id}", web::get().to(get_related))
            .route("/related/{contenttype}/{id}", web::post().to(post_related));
    }
}

async fn health(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "records": state.store.count()
    })))
}

async fn get_related(
    state: web::Data<AppState>,
    path: web::Path<(String, u64)>,
    query: web::Query<RelatedQuery>,
) -> ActixResult<HttpResponse> {
    let (contenttype, id) = path.into_inner();

    let mut options = Options::new();
    if let Some(limit) = query.limit {
        options.insert("limit".to_string(), limit.into());
    }

    Ok(related_response(&state, RecordId::new(contenttype, id), &options, query.explain))
}

async fn post_related(
    state: web::Data<AppState>,
    path: web::Path<(String, u64)>,
    req: Option<web::Json<RelatedRequest>>,
) -> ActixResult<HttpResponse> {
    let (contenttype, id) = path.into_inner();
    let req = req.map(web::Json::into_inner).unwrap_or_default();

    Ok(related_response(&state, RecordId::new(contenttype, id), &req.options, req.explain))
}

fn related_response(state: &AppState, id: RecordId, options: &Options, explain: bool) -> HttpResponse {
    let Some(record) = state.store.get(&id) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": Error::RecordNotFound(id.to_string()).to_string()
        }));
    };

    let engine = RelatedContent::new(state.store.as_ref(), state.config.as_ref(), state.store.schema());
    let entries = engine.related_explained(&record, options);
    debug!(record = %id, results = entries.len(), "related request served");

    if explain {
        HttpResponse::Ok().json(RelatedResponse::new(entries))
    } else {
        let records: Vec<_> = entries.into_iter().map(|e| e.record).collect();
        HttpResponse::Ok().json(serde_json::json!({
            "result": records
        }))
    }
}
