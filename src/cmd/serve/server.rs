// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::cmd::serve::get::confirm_clear_handler;
use crate::cmd::serve::get::confirm_delete_handler;
use crate::cmd::serve::get::get_handler;
use crate::cmd::serve::get::not_found;
use crate::cmd::serve::get::problem_handler;
use crate::cmd::serve::post::add_handler;
use crate::cmd::serve::post::clear_handler;
use crate::cmd::serve::post::complete_handler;
use crate::cmd::serve::post::delete_handler;
use crate::cmd::serve::state::MutableState;
use crate::cmd::serve::state::ServerState;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::state::Update;
use crate::store::feed::ChangeEvent;
use crate::store::watch;

pub struct ServeOptions {
    pub port: u16,
    pub open_browser: bool,
}

pub async fn start_server(coll: Collection, options: ServeOptions) -> Fallible<()> {
    let app = coll.state()?;
    log::debug!("Loaded {} problems.", app.problems().len());
    let Collection {
        config,
        store,
        today_override,
        ..
    } = coll;
    let state = ServerState {
        port: options.port,
        today: today_override,
        store: Arc::new(store),
        mutable: Arc::new(Mutex::new(MutableState::new(app))),
    };

    let watcher = watch(state.store.clone(), config.poll_interval());
    let (stop_refresher, stopped) = oneshot::channel();
    let refresher = refresh(state.clone(), stopped);

    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/problem/{id}", get(problem_handler));
    let app = app.route("/add", post(add_handler));
    let app = app.route("/complete/{id}", post(complete_handler));
    let app = app.route("/delete/{id}", get(confirm_delete_handler).post(delete_handler));
    let app = app.route("/clear", get(confirm_clear_handler).post(clear_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("127.0.0.1:{}", state.port);

    if options.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let target = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&target).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    println!("Serving on http://{bind}/");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    watcher.abort();
    let _ = stop_refresher.send(());
    if let Err(e) = refresher.await {
        log::error!("Refresher failed: {e}");
    }
    log::debug!("Server stopped.");
    served?;
    Ok(())
}

/// Reload the snapshot whenever another process changes the data, until
/// `stop` fires or the store goes away.
fn refresh(state: ServerState, mut stop: oneshot::Receiver<()>) -> JoinHandle<()> {
    let mut subscription = state.store.subscribe();
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                event = subscription.next() => event,
                _ = &mut stop => None,
            };
            let Some(event) = event else {
                break;
            };
            if event != ChangeEvent::External {
                continue;
            }
            match state.store.list() {
                Ok(problems) => {
                    log::debug!("Reloading after external change.");
                    state.acquire().apply(Update::Loaded(problems));
                }
                Err(e) => log::error!("Failed to reload problems: {e}"),
            }
        }
        subscription.unsubscribe();
        log::debug!("Refresher stopped.");
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    not_found()
}
