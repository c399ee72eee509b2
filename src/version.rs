use actix_web::HttpResponse;
use serde_json::json;

use crate::{CARGO_NAME, CARGO_VERSION};

pub(crate) async fn get() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": CARGO_NAME,
        "version": CARGO_VERSION,
    }))
}
