//! App configuration.
//!
//! Sourced from the process environment (with `.env` support) or the
//! command line; flags win over environment variables.

use std::path::PathBuf;

use clap::Parser;

/// Storefront runtime configuration.
#[derive(Debug, Clone, Parser)]
pub struct StorefrontConfig {
    /// WhatsApp number receiving order messages, digits only with country
    /// code.
    #[arg(long, env = "VITRINE_WHATSAPP_RECIPIENT", default_value = "5599984680391")]
    pub whatsapp_recipient: String,

    /// Unsigned image upload endpoint.
    #[arg(long, env = "VITRINE_UPLOAD_URL")]
    pub upload_url: String,

    /// Upload preset sent with every image.
    #[arg(long, env = "VITRINE_UPLOAD_PRESET", default_value = "banners_unsigned")]
    pub upload_preset: String,

    /// Directory for on-device profile data.
    #[arg(long, env = "VITRINE_DATA_DIR")]
    pub data_dir: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration, reading a `.env` file first when present.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] when a required value is missing or
    /// malformed.
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
