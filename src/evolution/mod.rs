//! Evolution API interaction module
//!
//! Credentials and the HTTP transport used to talk to an Evolution API
//! deployment.
//!
//! # Module Structure
//!
//! - [`credentials`] - Server URL and API key, as stored by the host
//! - [`http`] - reqwest transport and user-facing error formatting
//!
//! # Example
//!
//! ```ignore
//! use evonode::evolution::{credentials::Credentials, http::EvolutionHttpClient};
//! use evonode::node::{dispatch, host::StaticParameters};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let credentials = Credentials::new("https://evo.example.com", "api-key");
//!     let client = EvolutionHttpClient::new()?;
//!     let params = StaticParameters::new().with("instanceName", "bot1".into());
//!     let items = dispatch("instances-api", "connection-state", &params, &credentials, &client).await?;
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod http;
