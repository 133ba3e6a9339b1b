//! Preview HTTP server
//!
//! Serves the endpoint index with the access matrix, one details page per
//! endpoint and the stylesheet. The model is built once before serving and
//! only read afterwards.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::doc::context::DocContext;
use crate::error::Result;
use crate::preview::model::PreviewModel;

const PAGE_TEMPLATE: &str = include_str!("templates/page.hbs");
const INDEX_TEMPLATE: &str = include_str!("templates/index.hbs");
const ENDPOINT_TEMPLATE: &str = include_str!("templates/endpoint.hbs");
const FIELDS_PARTIAL: &str = include_str!("templates/fields.hbs");
const STYLE_CSS: &str = include_str!("templates/style.css");

#[derive(Serialize)]
struct Page<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct DetailsQuery {
    id: Option<String>,
}

/// Compiled templates together with the model they render
#[derive(Clone)]
pub struct PreviewServer {
    templates: Arc<Handlebars<'static>>,
    model: Arc<PreviewModel>,
}

impl PreviewServer {
    pub fn new(model: PreviewModel) -> Result<Self> {
        let mut templates = Handlebars::new();
        templates.register_template_string("page", PAGE_TEMPLATE)?;
        templates.register_template_string("index", INDEX_TEMPLATE)?;
        templates.register_template_string("endpoint", ENDPOINT_TEMPLATE)?;
        templates.register_partial("fields", FIELDS_PARTIAL)?;
        Ok(PreviewServer {
            templates: Arc::new(templates),
            model: Arc::new(model),
        })
    }

    pub fn model(&self) -> &PreviewModel {
        &self.model
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/style.css", get(style_css))
            .route("/endpoint-details", get(endpoint_details))
            .with_state(self.clone())
    }

    /// Full index page
    pub fn render_index(&self) -> Result<String> {
        let content = self.templates.render("index", self.model.as_ref())?;
        self.wrap_in_page(&content)
    }

    /// Details page of an endpoint, the index when the id is missing or unknown
    pub fn render_endpoint(&self, id: Option<&str>) -> Result<String> {
        let Some(endpoint) = id.and_then(|id| self.model.find_endpoint(id)) else {
            return self.render_index();
        };
        let content = self.templates.render("endpoint", endpoint)?;
        self.wrap_in_page(&content)
    }

    fn wrap_in_page(&self, content: &str) -> Result<String> {
        Ok(self.templates.render("page", &Page { content })?)
    }

    /// Serves on an already bound listener until the process ends
    pub async fn run(self, listener: TcpListener) -> Result<()> {
        let router = self.router();
        axum::serve(listener, router).await?;
        Ok(())
    }

    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Documentation server started and listening on {}", addr);
        println!("Documentation server started and listening on port: {}", addr.port());
        self.run(listener).await
    }
}

/// Builds the preview of a finished context and serves it on a local port
pub async fn start_preview(dc: &DocContext, port: u16) -> Result<()> {
    let server = PreviewServer::new(PreviewModel::from_context(dc))?;
    server.serve(SocketAddr::from(([127, 0, 0, 1], port))).await
}

async fn index(State(server): State<PreviewServer>) -> Response {
    html_response(server.render_index())
}

async fn endpoint_details(
    State(server): State<PreviewServer>,
    Query(query): Query<DetailsQuery>,
) -> Response {
    html_response(server.render_endpoint(query.id.as_deref()))
}

async fn style_css() -> Response {
    ([(header::CONTENT_TYPE, "text/css")], STYLE_CSS).into_response()
}

fn html_response(page: Result<String>) -> Response {
    match page {
        Ok(page) => Html(page).into_response(),
        Err(err) => {
            tracing::error!("Failed to render preview page: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
