//! Retry presets around the generic executor

use oscflow_api::{Client, Operation};
use oscflow_cloud::{Result, RetryConfig, RetryOn, retry_transient};

/// Run `Op` retrying only what `retry_on` lists.
pub(crate) async fn execute_with<Op: Operation>(
    client: &Client,
    config: &RetryConfig,
    retry_on: &RetryOn,
    input: Op::Input,
) -> Result<Op::Output> {
    retry_transient(config, retry_on, Op::NAME, move || client.call::<Op>(input.clone())).await
}

/// Mutating call: throttling retried for up to five minutes.
pub(crate) async fn mutate<Op: Operation>(client: &Client, input: Op::Input) -> Result<Op::Output> {
    execute_with::<Op>(client, &RetryConfig::mutation(), &RetryOn::throttling(), input).await
}

/// Single-object read: throttling retried for up to a minute.
pub(crate) async fn read<Op: Operation>(client: &Client, input: Op::Input) -> Result<Op::Output> {
    execute_with::<Op>(client, &RetryConfig::read(), &RetryOn::throttling(), input).await
}

/// Listing: throttling retried for up to thirty seconds.
pub(crate) async fn list<Op: Operation>(client: &Client, input: Op::Input) -> Result<Op::Output> {
    execute_with::<Op>(client, &RetryConfig::list(), &RetryOn::throttling(), input).await
}
