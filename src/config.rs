use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Requester emails must end with this suffix to submit a reservation.
    pub allowed_email_domain: String,
    /// Outbound mail endpoint. Notifications are silently disabled when unset.
    pub email_function_url: Option<String>,
    pub email_api_key: Option<String>,
    pub email_from: String,
    /// Internal address receiving the new-order notice.
    pub notify_email: String,
    pub store_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let allowed_email_domain = env::var("ALLOWED_EMAIL_DOMAIN")
            .unwrap_or_else(|_| "@vellummortgage.com".to_string());
        let email_function_url = env::var("EMAIL_FUNCTION_URL").ok();
        let email_api_key = env::var("EMAIL_API_KEY").ok();
        let email_from = env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "Event Items Store <events@vellummortgage.com>".to_string());
        let notify_email =
            env::var("NOTIFY_EMAIL").unwrap_or_else(|_| "events@vellummortgage.com".to_string());
        let store_url =
            env::var("STORE_URL").unwrap_or_else(|_| "https://eventitemstore.vercel.app".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            allowed_email_domain,
            email_function_url,
            email_api_key,
            email_from,
            notify_email,
            store_url,
        })
    }
}
