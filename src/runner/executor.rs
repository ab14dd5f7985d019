use crate::Result;
use crate::collection::{Collection, RequestTemplate, find_by_name, requests};
use crate::http::{HttpClient, RequestBuilder, Transport};
use crate::runner::types::{Exchange, RunResult};
use crate::script::ScriptInterpreter;
use crate::variable::{TemplateResolver, VariableStore};
use std::time::Instant;

/// Replays requests from one collection, threading a single store through
/// every exchange.
pub struct CollectionRunner<T: Transport = HttpClient> {
    collection: Collection,
    store: VariableStore,
    transport: T,
}

impl<T: Transport> CollectionRunner<T> {
    /// Collection variables are added for keys `store` does not already hold.
    pub fn new(collection: Collection, mut store: VariableStore, transport: T) -> Self {
        for (key, value) in &collection.variables {
            if !store.contains(key) {
                store.set(key.clone(), value.clone());
            }
        }

        Self {
            collection,
            store,
            transport,
        }
    }

    /// Variables as they stand after the requests sent so far
    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    /// Look up `name`, send it, and apply its test script to the store
    pub async fn find_and_send(&mut self, name: &str) -> Result<Exchange> {
        let template = find_by_name(&self.collection.items, name)?;
        execute(&self.transport, &mut self.store, template).await
    }

    /// Run the named requests in the given order.
    ///
    /// With `bail`, the run stops after the first failed request.
    pub async fn run_named(&mut self, names: &[String], bail: bool) -> Vec<RunResult> {
        let mut results = Vec::new();

        for (index, name) in names.iter().enumerate() {
            let request_number = index + 1;
            let start = Instant::now();

            let result = match find_by_name(&self.collection.items, name) {
                Ok(template) => {
                    run_one(&self.transport, &mut self.store, template, request_number).await
                }
                Err(e) => RunResult::error(
                    request_number,
                    name.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    e.to_string(),
                    start.elapsed(),
                ),
            };

            let failed = !result.success;
            results.push(result);
            if bail && failed {
                tracing::info!("Stopping run after failed request '{}'", name);
                break;
            }
        }

        results
    }

    /// Run every request leaf in pre-order
    pub async fn run_all(&mut self, bail: bool) -> Vec<RunResult> {
        let mut results = Vec::new();

        for (index, template) in requests(&self.collection.items).into_iter().enumerate() {
            let result = run_one(&self.transport, &mut self.store, template, index + 1).await;
            let failed = !result.success;
            results.push(result);
            if bail && failed {
                tracing::info!("Stopping run after failed request '{}'", template.name);
                break;
            }
        }

        results
    }
}

async fn run_one<T: Transport>(
    transport: &T,
    store: &mut VariableStore,
    template: &RequestTemplate,
    request_number: usize,
) -> RunResult {
    let start = Instant::now();

    match execute(transport, store, template).await {
        Ok(exchange) => RunResult::success(request_number, exchange),
        Err(e) => RunResult::error(
            request_number,
            template.name.clone(),
            template.method.clone(),
            TemplateResolver::resolve(&template.url, store),
            e.to_string(),
            start.elapsed(),
        ),
    }
}

async fn execute<T: Transport>(
    transport: &T,
    store: &mut VariableStore,
    template: &RequestTemplate,
) -> Result<Exchange> {
    // 1. build against the current store
    let built = RequestBuilder::build(template, store)?;
    let method = built.request.method.to_string();
    let url = built.request.url.to_string();

    // 2. exchange
    tracing::info!("{} {} ({})", method, url, template.name);
    let response = transport.execute(built.request).await?;
    tracing::debug!(
        "'{}' answered {} in {}ms",
        template.name,
        response.status.code(),
        response.duration.as_millis()
    );

    // 3. decode; scripts only see valid JSON
    let json = response.json()?;

    // 4. feed the test script back into the store
    ScriptInterpreter::apply(template.test_script(), &json, store);

    Ok(Exchange {
        name: template.name.clone(),
        method,
        url,
        response,
        json,
        warnings: built.warnings,
    })
}
