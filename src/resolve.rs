use std::collections::BTreeMap;

use aws_sdk_cloudformation::types::SdkError;
use futures::StreamExt;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Service error occurred: {0}")]
    ServiceError(String),

    #[error("Stack {0} not found")]
    NotFound(String),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

/// Name to value mapping built from a stack's resources and outputs plus the
/// account's exports. Ordered so the --verbose dump is stable.
pub type ResolvedIdentifiers = BTreeMap<String, String>;

/// Gather every value a placeholder may reference. With a stack name the
/// sources are, in order, resource physical IDs, stack outputs, and account
/// exports; without one only the exports are listed. Later sources win on
/// name collisions.
pub async fn identifiers(
    client: &aws_sdk_cloudformation::Client,
    stack: Option<&str>,
) -> Result<ResolvedIdentifiers, Error> {
    let mut sources = Vec::new();

    if let Some(stack) = stack {
        sources.push(stack_resources(client, stack).await?);
        sources.push(stack_outputs(client, stack).await?);
    }
    sources.push(exports(client).await?);

    return Ok(merge(sources));
}

fn merge(sources: Vec<Vec<(String, String)>>) -> ResolvedIdentifiers {
    let mut ids = ResolvedIdentifiers::new();
    for pairs in sources {
        for (name, value) in pairs {
            ids.insert(name, value);
        }
    }
    return ids;
}

async fn stack_resources(
    client: &aws_sdk_cloudformation::Client,
    stack: &str,
) -> Result<Vec<(String, String)>, Error> {
    let mut pairs = Vec::new();

    let mut pages = client
        .list_stack_resources()
        .stack_name(stack)
        .into_paginator()
        .send();
    while let Some(result) = pages.next().await {
        let page = match result {
            Ok(page) => page,
            Err(error) => return Err(control_plane_error(error)),
        };
        for resource in page.stack_resource_summaries().unwrap_or_default() {
            if let (Some(logical), Some(physical)) =
                (resource.logical_resource_id(), resource.physical_resource_id())
            {
                pairs.push((logical.to_string(), physical.to_string()));
            }
        }
    }

    tracing::debug!(stack, count = pairs.len(), "listed stack resources");
    return Ok(pairs);
}

async fn stack_outputs(
    client: &aws_sdk_cloudformation::Client,
    stack: &str,
) -> Result<Vec<(String, String)>, Error> {
    let result = client.describe_stacks().stack_name(stack).send().await;
    let description = match result {
        Ok(data) => data,
        Err(error) => return Err(control_plane_error(error)),
    };

    let stacks = description.stacks().unwrap_or_default();
    let described = match stacks.first() {
        Some(described) => described,
        None => return Err(Error::NotFound(stack.to_string())),
    };

    let mut pairs = Vec::new();
    for output in described.outputs().unwrap_or_default() {
        if let (Some(key), Some(value)) = (output.output_key(), output.output_value()) {
            pairs.push((key.to_string(), value.to_string()));
        }
    }

    tracing::debug!(stack, count = pairs.len(), "described stack outputs");
    return Ok(pairs);
}

async fn exports(
    client: &aws_sdk_cloudformation::Client,
) -> Result<Vec<(String, String)>, Error> {
    let mut pairs = Vec::new();

    let mut pages = client.list_exports().into_paginator().send();
    while let Some(result) = pages.next().await {
        let page = match result {
            Ok(page) => page,
            Err(error) => return Err(control_plane_error(error)),
        };
        for export in page.exports().unwrap_or_default() {
            if let (Some(name), Some(value)) = (export.name(), export.value()) {
                pairs.push((name.to_string(), value.to_string()));
            }
        }
    }

    tracing::debug!(count = pairs.len(), "listed exports");
    return Ok(pairs);
}

fn control_plane_error<E>(error: SdkError<E>) -> Error
where
    E: std::fmt::Display,
    SdkError<E>: std::fmt::Display,
{
    match error {
        SdkError::ServiceError { err, .. } => Error::ServiceError(err.to_string()),
        other => Error::Unknown(other.to_string()),
    }
}
