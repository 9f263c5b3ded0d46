use contract_table_unifier::{Conversion, XLSX_CONTENT_TYPE, XLSX_FILE_NAME};
use serde::Serialize;
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::error::ApiError;
use crate::ui;
use crate::upload;
use crate::xlsx_pipeline;

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    Router::new()
        .get("/", index_route)
        .post_async("/api/v1/preview", preview_route)
        .post_async("/api/v1/xlsx", xlsx_route)
        .run(req, env)
        .await
}

fn index_route(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    let mut response = Response::from_html(ui::upload_page())?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

async fn preview_route(mut req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    match preview_response(&mut req).await {
        Ok(response) => Ok(response),
        Err(error) => error.into_response(),
    }
}

async fn xlsx_route(mut req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    match xlsx_response(&mut req).await {
        Ok(response) => Ok(response),
        Err(error) => error.into_response(),
    }
}

async fn preview_response(req: &mut Request) -> Result<Response, ApiError> {
    let upload = upload::read_pdf_upload(req).await?;
    let outcome = xlsx_pipeline::unify_upload(&upload)?;
    let mut response = json_response(&xlsx_pipeline::preview_response(&outcome))?;
    if let Some(table) = outcome.table() {
        response
            .headers_mut()
            .set("X-Row-Count", &table.row_count().to_string())?;
    }
    Ok(response)
}

async fn xlsx_response(req: &mut Request) -> Result<Response, ApiError> {
    let upload = upload::read_pdf_upload(req).await?;
    let (table, xlsx) = match xlsx_pipeline::convert_upload(&upload)? {
        Conversion::NoMatchingTables(_) => return Err(ApiError::no_matching_tables()),
        Conversion::Converted { table, xlsx, .. } => (table, xlsx),
    };

    let mut response = Response::from_bytes(xlsx)?;
    response.headers_mut().set("Content-Type", XLSX_CONTENT_TYPE)?;
    response
        .headers_mut()
        .set("Content-Disposition", &content_disposition())?;
    response
        .headers_mut()
        .set("X-Row-Count", &table.row_count().to_string())?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

pub fn content_disposition() -> String {
    format!("attachment; filename=\"{XLSX_FILE_NAME}\"")
}

fn json_response<T>(payload: &T) -> Result<Response, ApiError>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}
