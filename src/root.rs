use std::collections::HashMap;
use std::error::Error;

use actix_web::{HttpResponse, http};

use crate::SITE_CSS;
use crate::template::{PLAYGROUND_TEMPLATE, render, render_page};
use crate::{API_ENDPOINT, CARGO_HOME_PAGE, CARGO_NAME, CARGO_VERSION};

pub(crate) async fn get() -> Result<HttpResponse, Box<dyn Error>> {
    let mut vars = HashMap::new();
    vars.insert("name", CARGO_NAME.to_string());
    vars.insert("version", CARGO_VERSION.to_string());
    vars.insert("endpoint", API_ENDPOINT.to_string());
    vars.insert("homepage", CARGO_HOME_PAGE.to_string());

    let content = render(PLAYGROUND_TEMPLATE, vars);
    let html = render_page(
        &format!("Icon Metadata Service - {CARGO_NAME} {CARGO_VERSION}"),
        SITE_CSS,
        &content,
    );

    Ok(HttpResponse::Ok()
        .insert_header(http::header::ContentType(mime::TEXT_HTML_UTF_8))
        .body(html))
}
