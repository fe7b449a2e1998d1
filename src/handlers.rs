// src/handlers.rs
use crate::services::quote::{add_on_catalog, add_on_price, calculate_quote, pricing_tiers};
use crate::{AppState, errors::VectorQuoteError, models::*};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures_util::TryStreamExt;
use log::info;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub session_id: Option<Uuid>,
}

pub async fn upload_image(
    mut payload: Multipart,
    query: web::Query<UploadQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (session_id, require_existing) = match query.session_id {
        Some(id) if data.store.contains(&id) => (id, true),
        Some(id) => return Err(VectorQuoteError::SessionNotFound(id.to_string()).into()),
        None => (Uuid::new_v4(), false),
    };

    while let Some(mut field) = payload.try_next().await? {
        let Some(filename) = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_string())
        else {
            continue;
        };

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        data.image_processor.validate_content_type(&content_type)?;

        // Stop reading as soon as the ceiling is crossed.
        let mut image_data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            image_data.extend_from_slice(&chunk);
            data.image_processor.validate_size(image_data.len())?;
        }

        let image = UploadedImage {
            id: Uuid::new_v4(),
            filename,
            content_type,
            size: image_data.len(),
            data: image_data,
            uploaded_at: chrono::Utc::now(),
        };

        let file = FileInfo::from(&image);
        // The session may have been cleared while the body was streaming.
        let attempt_id = data.analysis.start(session_id, require_existing, image)?;

        info!(
            "Session {} analyzing {} ({} bytes), attempt {}",
            session_id, file.filename, file.size, attempt_id
        );

        return Ok(HttpResponse::Accepted().json(serde_json::json!({
            "sessionId": session_id,
            "attemptId": attempt_id,
            "status": "analyzing",
            "file": file,
        })));
    }

    Err(VectorQuoteError::Validation("No file provided".to_string()).into())
}

pub async fn get_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, VectorQuoteError> {
    let snapshot = data.store.snapshot(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn clear_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, VectorQuoteError> {
    let session_id = path.into_inner();
    data.store.remove(&session_id)?;
    info!("Session {} cleared", session_id);
    Ok(HttpResponse::NoContent().finish())
}

fn validate_add_ons(ids: &[String]) -> Result<(), VectorQuoteError> {
    match ids.iter().find(|id| add_on_price(id).is_none()) {
        Some(unknown) => Err(VectorQuoteError::Validation(format!(
            "Unknown add-on: {}",
            unknown
        ))),
        None => Ok(()),
    }
}

fn quote_for(
    data: &AppState,
    session_id: &Uuid,
    request: &QuoteRequest,
) -> Result<Quote, VectorQuoteError> {
    validate_add_ons(&request.add_ons)?;
    let analysis = data.store.analysis_result(session_id)?;
    Ok(calculate_quote(
        &analysis,
        request.image_count,
        request.add_ons.as_slice(),
    ))
}

pub async fn quote_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, VectorQuoteError> {
    let quote = quote_for(&data, &path.into_inner(), &body)?;
    Ok(HttpResponse::Ok().json(quote))
}

pub async fn create_order(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<QuoteRequest>,
) -> Result<HttpResponse, VectorQuoteError> {
    let session_id = path.into_inner();
    let quote = quote_for(&data, &session_id, &body)?;
    let order = data.store.open_order(&session_id, Order::new(quote))?;

    info!(
        "Order {} opened for session {} at ${}",
        order.id, session_id, order.quote.total
    );
    Ok(HttpResponse::Created().json(order))
}

pub async fn get_order(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, VectorQuoteError> {
    let order = data.store.order(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn submit_order_details(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
    body: web::Json<CustomerDetails>,
) -> Result<HttpResponse, VectorQuoteError> {
    let session_id = path.into_inner();
    let details = body.into_inner();
    let order = data
        .store
        .update_order(&session_id, |order| order.submit_details(details))?;
    let instructions =
        order.payment_instructions(&data.config.payment_email, &data.config.support_email)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "order": order,
        "payment": instructions,
    })))
}

pub async fn confirm_order(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, VectorQuoteError> {
    let session_id = path.into_inner();
    let order = data.store.update_order(&session_id, |order| order.confirm())?;

    info!("Order {} confirmed for session {}", order.id, session_id);
    Ok(HttpResponse::Ok().json(order))
}

pub async fn close_order(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, VectorQuoteError> {
    let session_id = path.into_inner();
    let order = data.store.close_order(&session_id)?;
    info!("Order {} closed at step {}", order.id, order.step.as_str());
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_add_ons() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "addOns": add_on_catalog() }))
}

pub async fn list_pricing() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "tiers": pricing_tiers() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_add_on_is_rejected() {
        let ids = vec!["rush".to_string(), "giftWrap".to_string()];
        assert_eq!(
            validate_add_ons(&ids),
            Err(VectorQuoteError::Validation("Unknown add-on: giftWrap".to_string()))
        );
        assert!(validate_add_ons(&["rush".to_string(), "priority".to_string()]).is_ok());
        assert!(validate_add_ons(&[]).is_ok());
    }
}
