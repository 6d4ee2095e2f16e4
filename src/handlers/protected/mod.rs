// handlers/protected/mod.rs - endpoints that act on behalf of an account
//
// Handlers stay thin: pull the context and access layer from the request,
// call one access-layer operation, publish any resulting event.
pub mod accounts;
pub mod threads;
pub mod visits;

use crate::bml::Bml;
use crate::context::RequestContext;
use crate::error::{Error, Result};

/// Parse and validate message markup supplied by a client
pub(crate) fn parse_message_text(ctx: &RequestContext, text: &str) -> Result<Bml> {
    let bml = Bml::parse(text)
        .and_then(|bml| bml.validate().map(|_| bml))
        .map_err(|e| {
            Error::not_supported(ctx, format!("The message could not be read: {}.", e))
        })?;
    if bml.plain_text().trim().is_empty() {
        return Err(Error::not_supported(ctx, "Messages cannot be empty."));
    }
    Ok(bml)
}
