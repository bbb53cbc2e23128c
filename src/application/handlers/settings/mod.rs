//! Owner settings handlers.

mod save_gateway_credentials;

pub use save_gateway_credentials::{SaveGatewayCredentialsCommand, SaveGatewayCredentialsHandler};
