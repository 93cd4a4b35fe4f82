//! Application state and key handling.
//!
//! One `App` value owns the whole UI state: which screen is showing, the
//! loaded todos, the form buffers, and the current status notice. Every
//! network round-trip goes through `round_trip`, which collapses transport
//! failures and API errors into the uniform user-facing notice and drops
//! back to the login screen when the session is rejected.

use std::cmp::min;

use crossterm::event::KeyCode;
use mytodo_core::{
    ApiClient, ApiError, HttpRequest, HttpResponse, LoginRequest, Session, SessionStore,
    SignupRequest, TodoItem,
};
use tracing::{info, warn};

use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Tasks,
    AddTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Password,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient status-line message, replaced by the next action's outcome.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

pub struct App<T: Transport> {
    pub client: ApiClient,
    store: SessionStore,
    transport: T,
    pub screen: Screen,
    pub todos: Vec<TodoItem>,
    pub selected: Option<usize>,
    pub notice: Option<Notice>,
    pub focus: Field,
    pub username: String,
    pub email: String,
    pub password: String,
    pub content: String,
    editing: Option<TodoItem>,
}

impl<T: Transport> App<T> {
    /// A stored, unexpired session goes straight to the task screen and
    /// fetches the list; otherwise the user lands on the login form.
    pub fn new(mut client: ApiClient, store: SessionStore, transport: T) -> Self {
        let screen = match store.load() {
            Some(session) => {
                client.set_token(session.token);
                Screen::Tasks
            }
            None => Screen::Login,
        };
        let mut app = Self {
            client,
            store,
            transport,
            screen,
            todos: Vec::new(),
            selected: None,
            notice: None,
            focus: Field::Email,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            content: String::new(),
            editing: None,
        };
        if app.screen == Screen::Tasks {
            app.reload();
        }
        app
    }

    /// Handle a key press. Returns `true` when the app should quit.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        match self.screen {
            Screen::Tasks => match code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('j') | KeyCode::Down => self.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
                KeyCode::Char('a') => {
                    self.content.clear();
                    self.focus = Field::Content;
                    self.screen = Screen::AddTask;
                }
                KeyCode::Char('e') => self.open_edit(),
                KeyCode::Char('d') => self.delete_selected(),
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
                KeyCode::Char('r') => self.reload(),
                KeyCode::Char('L') => self.logout(),
                _ => {}
            },
            Screen::Login => match code {
                KeyCode::Esc => return true,
                KeyCode::Tab | KeyCode::Down => self.cycle_focus(true),
                KeyCode::BackTab | KeyCode::Up => self.cycle_focus(false),
                KeyCode::Enter => self.submit_login(),
                KeyCode::Right => {
                    self.screen = Screen::Signup;
                    self.focus = Field::Username;
                    self.notice = None;
                }
                KeyCode::Char(c) => self.input_char(c),
                KeyCode::Backspace => self.input_backspace(),
                _ => {}
            },
            Screen::Signup => match code {
                KeyCode::Esc => return true,
                KeyCode::Tab | KeyCode::Down => self.cycle_focus(true),
                KeyCode::BackTab | KeyCode::Up => self.cycle_focus(false),
                KeyCode::Enter => self.submit_signup(),
                KeyCode::Left => {
                    self.screen = Screen::Login;
                    self.focus = Field::Email;
                    self.notice = None;
                }
                KeyCode::Char(c) => self.input_char(c),
                KeyCode::Backspace => self.input_backspace(),
                _ => {}
            },
            Screen::AddTask | Screen::EditTask => match code {
                KeyCode::Esc => {
                    self.editing = None;
                    self.screen = Screen::Tasks;
                }
                KeyCode::Enter => {
                    if self.screen == Screen::AddTask {
                        self.submit_add();
                    } else {
                        self.submit_edit();
                    }
                }
                KeyCode::Char(c) => self.input_char(c),
                KeyCode::Backspace => self.input_backspace(),
                _ => {}
            },
        }
        false
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub fn reload(&mut self) {
        if let Some(mut todos) =
            self.round_trip(self.client.build_list_todos(), |c, r| c.parse_list_todos(r))
        {
            todos.sort_by_key(|t| t.id);
            self.selected = match (self.selected, todos.len()) {
                (_, 0) => None,
                (None, _) => Some(0),
                (Some(i), len) => Some(min(i, len - 1)),
            };
            self.todos = todos;
        }
    }

    pub fn submit_login(&mut self) {
        let input = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        if input.email.is_empty() || input.password.is_empty() {
            self.error("Email and password are required");
            return;
        }
        let req = match self.client.build_login(&input) {
            Ok(req) => req,
            Err(err) => return self.error(&err.user_message()),
        };
        if let Some(token) = self.round_trip(req, |c, r| c.parse_login(r)) {
            if let Err(err) = self.store.save(&Session::new(token.access_token.clone())) {
                warn!(error = %err, "failed to persist session");
            }
            self.client.set_token(token.access_token);
            self.password.clear();
            self.screen = Screen::Tasks;
            self.success("Login successful");
            info!("logged in");
            self.reload();
        }
    }

    pub fn submit_signup(&mut self) {
        let input = SignupRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
            self.error("Username, email and password are required");
            return;
        }
        let req = match self.client.build_signup(&input) {
            Ok(req) => req,
            Err(err) => return self.error(&err.user_message()),
        };
        if self.round_trip(req, |c, r| c.parse_signup(r)).is_some() {
            self.password.clear();
            self.screen = Screen::Login;
            self.focus = Field::Email;
            self.success("Account created successfully");
        }
    }

    pub fn submit_add(&mut self) {
        let req = match self.client.build_create_todo(&self.content) {
            Ok(req) => req,
            // Validation failed client-side; nothing was sent.
            Err(err) => return self.error(&err.user_message()),
        };
        if self.round_trip(req, |c, r| c.parse_create_todo(r)).is_some() {
            self.content.clear();
            self.screen = Screen::Tasks;
            self.success("Todo added successfully");
            self.reload();
        }
    }

    pub fn open_edit(&mut self) {
        let Some(todo) = self.selected_todo().cloned() else {
            return;
        };
        self.content = todo.content.clone();
        self.editing = Some(todo);
        self.focus = Field::Content;
        self.screen = Screen::EditTask;
    }

    pub fn submit_edit(&mut self) {
        let Some(editing) = self.editing.clone() else {
            return;
        };
        let req = match self
            .client
            .build_update_todo(editing.id, &self.content, editing.is_completed)
        {
            Ok(req) => req,
            Err(err) => return self.error(&err.user_message()),
        };
        if self.round_trip(req, |c, r| c.parse_update_todo(r)).is_some() {
            self.editing = None;
            self.content.clear();
            self.screen = Screen::Tasks;
            self.success("Todo updated successfully");
            self.reload();
        }
    }

    /// Flip the selected todo's completion flag, once per invocation.
    pub fn toggle_selected(&mut self) {
        let Some(todo) = self.selected_todo().cloned() else {
            return;
        };
        let req = match self
            .client
            .build_toggle_status(todo.id, &todo.content, todo.is_completed)
        {
            Ok(req) => req,
            Err(err) => return self.error(&err.user_message()),
        };
        if self.round_trip(req, |c, r| c.parse_update_todo(r)).is_some() {
            self.success("Status changed successfully");
            self.reload();
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(todo) = self.selected_todo().cloned() else {
            return;
        };
        let req = self.client.build_delete_todo(todo.id);
        if let Some(message) = self.round_trip(req, |c, r| c.parse_delete_todo(r)) {
            self.success(&message);
            self.reload();
        }
    }

    /// Purely local: drop the stored token. Subsequent requests carry no
    /// bearer header.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear session file");
        }
        self.client.clear_token();
        self.todos.clear();
        self.selected = None;
        self.screen = Screen::Login;
        self.focus = Field::Email;
        self.success("Logged out successfully");
        info!("logged out");
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    /// Execute a built request and parse the response. Transport failures and
    /// API errors collapse into the uniform error notice; a rejected session
    /// drops back to the login screen.
    fn round_trip<R>(
        &mut self,
        req: HttpRequest,
        parse: fn(&ApiClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Option<R> {
        let response = match self.transport.execute(&req) {
            Ok(response) => response,
            Err(err) => {
                warn!(method = req.method.as_str(), url = %req.url, error = %err, "transport failure");
                self.error("Something went wrong");
                return None;
            }
        };
        match parse(&self.client, response) {
            Ok(value) => Some(value),
            Err(ApiError::Unauthorized(detail)) => {
                info!("session rejected, returning to login");
                if let Err(err) = self.store.clear() {
                    warn!(error = %err, "failed to clear session file");
                }
                self.client.clear_token();
                self.screen = Screen::Login;
                self.focus = Field::Email;
                self.error(&detail);
                None
            }
            Err(err) => {
                warn!(method = req.method.as_str(), url = %req.url, error = %err, "request failed");
                self.error(&err.user_message());
                None
            }
        }
    }

    pub fn selected_todo(&self) -> Option<&TodoItem> {
        self.selected.and_then(|i| self.todos.get(i))
    }

    fn select_next(&mut self) {
        let len = self.todos.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
    }

    fn select_prev(&mut self) {
        let len = self.todos.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        });
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order: &[Field] = match self.screen {
            Screen::Login => &[Field::Email, Field::Password],
            Screen::Signup => &[Field::Username, Field::Email, Field::Password],
            _ => return,
        };
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (i + 1) % order.len()
        } else {
            (i + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn focused_buffer(&mut self) -> &mut String {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::Content => &mut self.content,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.focused_buffer().push(c);
    }

    pub fn input_backspace(&mut self) {
        self.focused_buffer().pop();
    }

    fn success(&mut self, message: &str) {
        self.notice = Some(Notice {
            kind: NoticeKind::Success,
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: &str) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            message: message.to_string(),
        });
    }
}
