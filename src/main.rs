use std::{io, process, sync::Arc};

use postsync::{
    application::{error::AppError, store::PostStore},
    config::{self, Command},
    domain::posts::{Post, PostDraft, PostId},
    infra::{error::InfraError, http::HttpPostService, telemetry},
    presentation::{
        terminal::{TerminalView, confirm},
        views,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let service = HttpPostService::from_settings(&settings.api)?;
    info!(
        collection = %service.collection_url(),
        stale_policy = ?settings.store.stale_policy,
        "postsync starting"
    );
    let store = PostStore::with_policy(Arc::new(service), settings.store.stale_policy);
    let (view, _subscription) = TerminalView::attach(&store);

    store.fetch_all().await;

    let command = cli_args.command.unwrap_or(Command::List);
    let result = apply_intent(&store, command).await;

    if cli_args.json {
        let out = views::render_json(&store.state()).map_err(|e| AppError::render(e.to_string()))?;
        println!("{out}");
    } else {
        print!("{}", view.frame());
    }

    result
}

/// Map a user intent onto a store command.
async fn apply_intent(store: &PostStore, command: Command) -> Result<(), AppError> {
    match command {
        Command::List => {}
        Command::Create { title, body } => {
            store.add(PostDraft::new(title, body)).await?;
        }
        Command::Update { id, title, body } => {
            store.update(edited(store, id, title, body)).await?;
        }
        Command::Delete { id, yes } => {
            if yes || ask_delete(&id)? {
                store.delete(id).await?;
            } else {
                info!(%id, "delete cancelled");
            }
        }
    }
    Ok(())
}

/// The cached record with new title and body, so fields the client does not
/// model survive the full-record replacement.
fn edited(store: &PostStore, id: PostId, title: String, body: String) -> Post {
    let mut post = store
        .read(|state| state.find(&id).cloned())
        .unwrap_or_else(|| Post::new(id, String::new(), String::new()));
    post.title = title;
    post.body = body;
    post
}

fn ask_delete(id: &PostId) -> Result<bool, AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    confirm(&format!("Delete post {id}?"), &mut input, &mut output)
        .map_err(|err| AppError::from(InfraError::from(err)))
}
