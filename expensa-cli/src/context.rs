use std::{path::PathBuf, rc::Rc};

use anyhow::{Context, Result, bail};
use client::{ApiClient, FileStorage, PersistedSession, Session, SessionEvent, SessionStore};
use shared::config::{ClientConfig, parse_base_url};
use tracing::debug;

use crate::{GlobalArgs, commands::session::describe_logout, logging::initialize_tracing};

/// Everything a command needs to talk to the backend.
#[derive(Debug)]
pub struct AppContext {
    pub session_path: PathBuf,
    pub store: SessionStore,
    pub json: bool,
}

impl AppContext {
    /// Resolves configuration, installs logging and restores the stored
    /// session, if any.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let mut config = ClientConfig::load_config(global.config.as_deref())
            .context("failed to load configuration")?;
        if let Some(server) = &global.server {
            config.api_base_url = parse_base_url(server).context("invalid --server URL")?;
        }
        initialize_tracing(&config);

        let session_path = config.session_file();
        let storage = Rc::new(FileStorage::new(&session_path));
        let api = ApiClient::from_config(&config, storage)?;
        let store = SessionStore::new(api);
        store.subscribe(|event, _| {
            if let SessionEvent::LoggedOut(reason) = event {
                if reason != client::LogoutReason::UserRequested {
                    eprintln!("warning: {}", describe_logout(reason));
                }
            }
        });
        if let Err(err) = store.restore() {
            eprintln!(
                "warning: discarding unreadable session at {}: {err}",
                session_path.display()
            );
            PersistedSession::clear(store.api().storage().as_ref()).with_context(|| {
                format!("failed to clear stored session at {}", session_path.display())
            })?;
        }
        debug!(server = %config.api_base_url, session = %session_path.display(), "client ready");

        Ok(Self {
            session_path,
            store,
            json: global.json,
        })
    }

    pub fn api(&self) -> &ApiClient {
        self.store.api()
    }

    /// Current session, failing when nobody is signed in.
    pub fn require_session(&self) -> Result<Session> {
        let session = self.store.snapshot();
        if !session.is_authenticated() {
            bail!("no active session found; run `expensa session login` first");
        }
        Ok(session)
    }
}
