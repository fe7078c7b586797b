use once_cell::sync::Lazy;

/// Address the HTTP server should bind to. Defaults to `0.0.0.0`.
pub static BIND_ADDRESS: Lazy<String> =
    Lazy::new(|| std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()));

/// Port the HTTP server should listen on. Defaults to `3000`.
pub static BIND_PORT: Lazy<u16> = Lazy::new(|| {
    std::env::var("BIND_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000)
});

/// Path of the JSON database file. Defaults to `data/db.json`.
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/db.json".to_string()));

/// Simulated payment-gateway pause applied per charge, in milliseconds.
/// Defaults to `500`.
pub static PAYMENT_GATEWAY_DELAY_MS: Lazy<u64> = Lazy::new(|| {
    std::env::var("PAYMENT_GATEWAY_DELAY_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(500)
});
