use actix_web::HttpResponse;

pub(crate) async fn get() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN_UTF_8)
        .body("OK\n")
}
