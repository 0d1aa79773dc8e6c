use std::env;
use std::path::PathBuf;

/// Process configuration, resolved once at startup and passed into the
/// components that need it. Nothing in the library re-reads the environment
/// per call.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote KV REST endpoint. When set, the durable remote store is used.
    pub kv_rest_url: Option<String>,
    pub kv_rest_token: Option<String>,
    /// Local JSON data file. Used when no remote KV is configured.
    pub data_path: Option<PathBuf>,
    /// Display name stamped onto transfers and outgoing mail.
    pub platform_name: String,
    /// Address that receives the "transfer initiated" notification.
    pub owner_email: Option<String>,
    /// Verified sender, e.g. `PayGlobal <noreply@example.com>`.
    pub email_from: String,
    pub resend_api_key: Option<String>,
    /// Platform secret key for the read-only balance probe.
    pub stripe_secret_key: Option<String>,
}

impl Config {
    /// Reads configuration from the environment (after `dotenvy` has loaded
    /// any `.env` file in `main`). Missing optional values stay `None`; the
    /// caller decides which backends that selects.
    pub fn from_env() -> Self {
        let email_user = env::var("EMAIL_USER").ok();
        let email_from = env::var("EMAIL_FROM").unwrap_or_else(|_| {
            format!(
                "\"PayGlobal Payouts\" <{}>",
                email_user.clone().unwrap_or_else(|| "noreply@payglobal.com".into())
            )
        });

        Self {
            kv_rest_url: env::var("KV_REST_API_URL").ok(),
            kv_rest_token: env::var("KV_REST_API_TOKEN").ok(),
            data_path: env::var("DATA_PATH").ok().map(PathBuf::from),
            platform_name: env::var("PLATFORM_NAME")
                .unwrap_or_else(|_| "PayGlobal Platform".into()),
            owner_email: env::var("OWNER_EMAIL").ok().or(email_user),
            email_from,
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
        }
    }

    /// Whether the platform key points at a live-mode account.
    pub fn is_live(&self) -> bool {
        self.stripe_secret_key
            .as_deref()
            .is_some_and(|k| k.starts_with("sk_live"))
    }
}
