use actix_web::{HttpResponse, web};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::error::{self, IcondError};

pub struct Metrics {
    pub registry: Registry,
    operations_total: IntCounterVec,
    icons_created_total: IntCounter,
    store_icons: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let operations_total = IntCounterVec::new(
            Opts::new("icond_operations_total", "API operations handled"),
            &["operation", "status"],
        )?;

        let icons_created_total = IntCounter::new(
            "icond_icons_created_total",
            "Icons created since startup",
        )?;

        let store_icons = IntGauge::new(
            "icond_store_icons",
            "Icon records currently in the store",
        )?;

        registry.register(Box::new(operations_total.clone()))?;
        registry.register(Box::new(icons_created_total.clone()))?;
        registry.register(Box::new(store_icons.clone()))?;

        Ok(Metrics {
            registry,
            operations_total,
            icons_created_total,
            store_icons,
        })
    }

    pub fn record(&self, operation: &str, status: &str) {
        self.operations_total
            .with_label_values(&[operation, status])
            .inc();
    }

    pub fn icons_created(&self, count: u64, store_len: usize) {
        self.icons_created_total.inc_by(count);
        self.store_icons.set(store_len as i64);
    }

    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = vec![];
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }
}

pub async fn handler(metrics: web::Data<Metrics>) -> actix_web::Result<HttpResponse> {
    let body = metrics.render();
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}

pub fn initialize() -> Result<Metrics, IcondError> {
    Metrics::new().map_err(|e| {
        error::ServerError::Startup {
            reason: format!("Failed to create prometheus metrics: {e}"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_operations_show_up_in_exposition() {
        let metrics = Metrics::new().unwrap();
        metrics.record("createIcon", "ok");
        metrics.record("createIcon", "ok");
        metrics.icons_created(2, 2);

        let rendered = metrics.render();
        assert!(rendered.contains(
            "icond_operations_total{operation=\"createIcon\",status=\"ok\"} 2"
        ));
        assert!(rendered.contains("icond_icons_created_total 2"));
        assert!(rendered.contains("icond_store_icons 2"));
    }
}
