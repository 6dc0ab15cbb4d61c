//! Application state and the actions bound to keys.

use std::{path::Path, sync::Arc};

use tokio::runtime::Runtime;

use medsearch_analytics::{Dashboard, UploadInbox};
use medsearch_auth::{gate, SessionContext, StaticAuthenticator, DEFAULT_EMAIL};
use medsearch_catalog::InMemoryCatalog;
use medsearch_contracts::{error::MedSearchError, navigation::Route, upload::UploadReceipt};
use medsearch_core::{DrugDetails, MedSearchConfig, SearchWorkflow, SubmitOutcome};

// ── View-local state ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub field: LoginField,
    pub error: Option<String>,
}

/// Which list of the search view arrow keys and Enter act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    Suggestions,
    Results,
    Insurance,
    Ndc,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Query => Focus::Suggestions,
            Focus::Suggestions => Focus::Results,
            Focus::Results => Focus::Insurance,
            Focus::Insurance => Focus::Ndc,
            Focus::Ndc => Focus::Query,
        }
    }
}

pub struct SearchView {
    pub workflow: SearchWorkflow,
    pub focus: Focus,
    /// Highlighted row of the focused list.
    pub cursor: usize,
}

pub struct UploadForm {
    pub path: String,
    pub message: Option<Result<String, String>>,
}

pub enum Screen {
    Login(LoginForm),
    Search(SearchView),
    Details(Result<DrugDetails, MedSearchError>),
    Dashboard(Result<Dashboard, MedSearchError>),
    Upload(UploadForm),
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub runtime: Runtime,
    pub config: MedSearchConfig,
    pub catalog: Arc<InMemoryCatalog>,
    pub auth: StaticAuthenticator,
    pub session: SessionContext,
    pub inbox: UploadInbox,
    pub route: Route,
    pub screen: Screen,
}

impl App {
    pub fn new(runtime: Runtime, config: MedSearchConfig, catalog: InMemoryCatalog) -> Self {
        let auth = StaticAuthenticator::from_settings(&config.auth);
        let inbox = UploadInbox::new(config.upload.clone());
        let mut app = Self {
            runtime,
            config,
            catalog: Arc::new(catalog),
            auth,
            session: SessionContext::new(),
            inbox,
            route: Route::Login,
            screen: Screen::Login(login_form()),
        };
        app.open(Route::Root);
        app
    }

    /// Switch views through the gate. Leaving the search view tears down its
    /// workflow so nothing still in flight lands afterwards.
    pub fn open(&mut self, requested: Route) {
        let route = gate::guard(&self.session, requested);
        if let Screen::Search(view) = &mut self.screen {
            view.workflow.teardown();
        }

        self.screen = match &route {
            Route::Root | Route::Search => Screen::Search(SearchView {
                workflow: SearchWorkflow::new(self.catalog.clone(), &self.config.search),
                focus: Focus::Query,
                cursor: 0,
            }),
            Route::Login => Screen::Login(login_form()),
            Route::DrugDetails { drug_id, ndc } => {
                let request = medsearch_contracts::navigation::NavigationRequest {
                    drug_id: drug_id.clone(),
                    ndc: ndc.clone(),
                };
                let catalog = self.catalog.clone();
                Screen::Details(
                    self.runtime
                        .block_on(async move { DrugDetails::load(catalog.as_ref(), &request).await }),
                )
            }
            Route::Dashboard => {
                let catalog = self.catalog.clone();
                Screen::Dashboard(
                    self.runtime
                        .block_on(async move { Dashboard::load(catalog.as_ref()).await }),
                )
            }
            Route::Upload => Screen::Upload(UploadForm {
                path: String::new(),
                message: None,
            }),
        };
        self.route = route;
    }

    /// Apply lookup results that arrived since the last frame.
    pub fn tick(&mut self) {
        if let Screen::Search(view) = &mut self.screen {
            view.workflow.drain_events();
            let len = list_len(view);
            if view.cursor >= len {
                view.cursor = len.saturating_sub(1);
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.clear();
        self.open(Route::Login);
    }

    // ── Login ─────────────────────────────────────────────────────────────────

    pub fn submit_login(&mut self) {
        let Screen::Login(form) = &mut self.screen else {
            return;
        };
        let (email, password) = (form.email.clone(), form.password.clone());
        let result = self
            .runtime
            .block_on(self.session.login(&self.auth, &email, &password));
        match result {
            Ok(next) => self.open(next),
            Err(e) => {
                form.password.clear();
                form.error = Some(match e {
                    MedSearchError::InvalidCredentials => "Invalid credentials".to_string(),
                    other => other.to_string(),
                });
            }
        }
    }

    // ── Search ────────────────────────────────────────────────────────────────

    pub fn type_char(&mut self, c: char) {
        if let Screen::Search(view) = &mut self.screen {
            let mut query = view.workflow.session().query().to_string();
            query.push(c);
            view.workflow.input(query);
        }
    }

    pub fn backspace(&mut self) {
        if let Screen::Search(view) = &mut self.screen {
            let mut query = view.workflow.session().query().to_string();
            if query.pop().is_some() {
                view.workflow.input(query);
            }
        }
    }

    pub fn cycle_focus(&mut self) {
        if let Screen::Search(view) = &mut self.screen {
            view.focus = view.focus.next();
            view.cursor = 0;
        }
    }

    pub fn move_cursor(&mut self, down: bool) {
        if let Screen::Search(view) = &mut self.screen {
            let len = list_len(view);
            if len == 0 {
                return;
            }
            view.cursor = if down {
                (view.cursor + 1).min(len - 1)
            } else {
                view.cursor.saturating_sub(1)
            };
        }
    }

    /// Enter in the search view: act on the focused list, or run the search
    /// action from the query field.
    pub fn activate(&mut self) {
        let Screen::Search(view) = &mut self.screen else {
            return;
        };
        let wf = &mut view.workflow;
        let cursor = view.cursor;

        // Failures are recorded in `wf.error()` and rendered from there.
        match view.focus {
            Focus::Query => {
                if let SubmitOutcome::Navigate(request) = self.runtime.block_on(wf.submit()) {
                    self.open(request.route());
                }
                return;
            }
            Focus::Suggestions => {
                if wf.select_suggestion(cursor).is_ok() {
                    view.focus = Focus::Insurance;
                }
            }
            Focus::Results => {
                if wf.select_result(cursor).is_ok() {
                    view.focus = Focus::Insurance;
                }
            }
            Focus::Insurance => {
                let selected = wf.session().insurance_options().get(cursor).map(|i| i.id.clone());
                if let Some(id) = selected {
                    if wf.select_insurance(&id).is_ok() {
                        view.focus = Focus::Ndc;
                    }
                }
            }
            Focus::Ndc => {
                let code = wf
                    .session()
                    .selected_drug()
                    .and_then(|d| d.ndc.get(cursor).cloned());
                if let Some(code) = code {
                    if wf.select_ndc(&code).is_ok() {
                        view.focus = Focus::Query;
                    }
                }
            }
        }
        view.cursor = 0;
    }

    // ── Upload ────────────────────────────────────────────────────────────────

    pub fn upload_edit(&mut self, c: Option<char>) {
        if let Screen::Upload(form) = &mut self.screen {
            match c {
                Some(c) => form.path.push(c),
                None => {
                    form.path.pop();
                }
            }
        }
    }

    pub fn submit_upload(&mut self) {
        let Screen::Upload(form) = &mut self.screen else {
            return;
        };
        let path = form.path.trim();
        if path.is_empty() {
            return;
        }
        form.message = Some(match self.inbox.accept_file(Path::new(path)) {
            Ok(receipt) => {
                form.path.clear();
                Ok(format!("Uploaded {} ({} bytes)", receipt.file_name, receipt.size_bytes))
            }
            Err(e) => Err(e.to_string()),
        });
    }

    pub fn receipts(&self) -> Result<Vec<UploadReceipt>, MedSearchError> {
        self.inbox.receipts()
    }
}

fn login_form() -> LoginForm {
    LoginForm {
        email: DEFAULT_EMAIL.to_string(),
        password: String::new(),
        field: LoginField::Password,
        error: None,
    }
}

/// Rows in the list the search view currently focuses.
pub fn list_len(view: &SearchView) -> usize {
    let session = view.workflow.session();
    match view.focus {
        Focus::Query => 0,
        Focus::Suggestions => session.suggestions().len(),
        Focus::Results => session.results().len(),
        Focus::Insurance => session.insurance_options().len(),
        Focus::Ndc => session.selected_drug().map_or(0, |d| d.ndc.len()),
    }
}
