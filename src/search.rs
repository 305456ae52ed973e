// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running a parse in the background and hearing about its items as they arrive.
//!
//! `start` takes a freshly created response handler and the future that will deliver the response
//! body, and spawns a task that waits for the body and feeds it through the handler. Every item
//! the handler builds is passed to the `SearchListener` right away, in document order, on the
//! spawned task. Once the body is finished, the listener gets exactly one more call: `completed`
//! if everything parsed, or `failed` with the error that stopped it.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nestling::error::Error;
//! use nestling::handler::{ResponseHandler, StatusHandler};
//! use nestling::parser::Format;
//! use nestling::search::{self, SearchListener};
//! use nestling::tweet::Tweet;
//!
//! struct Printer;
//!
//! impl SearchListener<Tweet> for Printer {
//!     fn item_found(&self, tweet: &Tweet) {
//!         println!("{}", tweet.content().unwrap_or(""));
//!     }
//!
//!     fn completed(&self) {
//!         println!("done");
//!     }
//!
//!     fn failed(&self, err: &Error) {
//!         println!("failed: {}", err);
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! # let body = futures::future::ready(Ok(b"[]".to_vec()));
//! let listener: Arc<dyn SearchListener<Tweet>> = Arc::new(Printer);
//! let task = search::start(StatusHandler::default(), Format::Json, body, listener);
//! let handler = task.await.unwrap();
//! println!("{} tweets", handler.results().len());
//! # }
//! ```
//!
//! Nothing is shared between two running operations: each one owns its handler, and the handler
//! comes back through the join handle when the task ends, holding whatever it had parsed.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::handler::ResponseHandler;
use crate::parser::{self, Format};

/// Receives the items of a running operation as they're parsed.
pub trait SearchListener<T>: Send + Sync {
    /// Called once for every item, in document order.
    fn item_found(&self, item: &T);

    /// Called once after the last item, if the whole response parsed.
    fn completed(&self);

    /// Called once if the operation failed, instead of `completed`.
    fn failed(&self, err: &Error);
}

/// Spawns a task that waits for `body`, parses it with `handler` and reports to `listener`.
///
/// Must be called from within a tokio runtime.
pub fn start<H, F>(
    mut handler: H,
    format: Format,
    body: F,
    listener: Arc<dyn SearchListener<H::Item>>,
) -> JoinHandle<H>
where
    H: ResponseHandler + Send + 'static,
    H::Item: 'static,
    F: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    handler.set_listener(listener.clone());

    tokio::spawn(async move {
        let outcome = match body.await {
            Ok(bytes) => {
                debug!(len = bytes.len(), ?format, "response body received");
                parser::parse(format, &bytes, &mut handler)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                debug!(count = handler.results().len(), "operation completed");
                listener.completed();
            }
            Err(e) => {
                warn!(error = %e, parsed = handler.results().len(), "operation failed");
                listener.failed(&e);
            }
        }

        handler
    })
}
